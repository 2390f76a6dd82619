use bitflags::bitflags;

pub(crate) const LCDC: u16 = 0xFF40;
pub(crate) const STAT: u16 = 0xFF41;
pub(crate) const SCY: u16 = 0xFF42;
pub(crate) const SCX: u16 = 0xFF43;
pub(crate) const LY: u16 = 0xFF44;
pub(crate) const LYC: u16 = 0xFF45;
pub(crate) const DMA: u16 = 0xFF46;
pub(crate) const BGP: u16 = 0xFF47;
pub(crate) const OBP0: u16 = 0xFF48;
pub(crate) const OBP1: u16 = 0xFF49;
pub(crate) const WY: u16 = 0xFF4A;
pub(crate) const WX: u16 = 0xFF4B;

bitflags! {
    /// LCD control register (FF40).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Lcdc: u8 {
        const BG_WINDOW_ENABLE = 0x01;
        const OBJ_ENABLE = 0x02;
        const OBJ_TALL = 0x04;
        const BG_MAP_9C00 = 0x08;
        const TILE_DATA_8000 = 0x10;
        const WINDOW_ENABLE = 0x20;
        const WINDOW_MAP_9C00 = 0x40;
        const LCD_ENABLE = 0x80;
    }
}

bitflags! {
    /// Interrupt sources selectable in STAT (FF41) bits 3-6.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StatIrq: u8 {
        const HBLANK = 0x08;
        const VBLANK = 0x10;
        const OAM = 0x20;
        const LYC = 0x40;
    }
}

/// STAT bit 2, set while LY == LYC.
pub(crate) const STAT_LYC_EQUAL: u8 = 0x04;

impl Lcdc {
    pub(crate) fn bg_map(self) -> u16 {
        if self.contains(Lcdc::BG_MAP_9C00) {
            0x9C00
        } else {
            0x9800
        }
    }

    pub(crate) fn window_map(self) -> u16 {
        if self.contains(Lcdc::WINDOW_MAP_9C00) {
            0x9C00
        } else {
            0x9800
        }
    }

    /// Address of the first byte of background/window tile `index`.
    pub(crate) fn tile_data(self, index: u8) -> u16 {
        if self.contains(Lcdc::TILE_DATA_8000) {
            0x8000 + u16::from(index) * 16
        } else {
            // Signed indices around 0x9000.
            0x8800 + u16::from(index.wrapping_add(128)) * 16
        }
    }

    pub(crate) fn obj_height(self) -> u8 {
        if self.contains(Lcdc::OBJ_TALL) {
            16
        } else {
            8
        }
    }
}

/// Shade (0..=3) a palette register assigns to color index `index`.
#[inline]
pub(crate) fn shade(palette: u8, index: u8) -> usize {
    ((palette >> (index * 2)) & 0x03) as usize
}
