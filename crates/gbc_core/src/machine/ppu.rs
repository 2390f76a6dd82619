mod dma;
mod fetcher;
mod fifo;
mod lcd;

pub(crate) use dma::OamDma;
pub use lcd::{Lcdc, StatIrq};
pub(crate) use lcd::{BGP, DMA, LCDC, LY, LYC, OBP0, OBP1, SCX, SCY, STAT, WX, WY};

use fetcher::{Fetcher, OamEntry};
use fifo::PixelFifo;
use lcd::STAT_LYC_EQUAL;

use crate::config::DEFAULT_PALETTE;
use crate::cpu::Interrupts;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const DOTS_PER_LINE: u32 = 456;
pub const OAM_SCAN_DOTS: u32 = 80;
pub const LINES_PER_FRAME: u8 = 154;
pub const VISIBLE_LINES: u8 = SCREEN_HEIGHT as u8;

/// Mode numbers as reported in STAT bits 0-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpuMode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    PixelTransfer = 3,
}

#[derive(Debug, Clone)]
pub(crate) struct Ppu {
    lcdc: Lcdc,
    stat_irq: StatIrq,
    scy: u8,
    scx: u8,
    ly: u8,
    lyc: u8,
    bgp: u8,
    obp0: u8,
    obp1: u8,
    wy: u8,
    wx: u8,

    mode: PpuMode,
    /// Dots elapsed on the current line.
    line_ticks: u32,
    frame: u64,
    /// Window rows drawn so far this frame.
    window_line: u8,
    fetcher: Fetcher,
    fifo: PixelFifo,
    line_sprites: Vec<OamEntry>,
    /// Object height latched when `line_sprites` was filled.
    sprite_height: u8,
    palette: [u32; 4],
    frame_buffer: Vec<u32>,
    pub(crate) dma: OamDma,
}

impl Default for Ppu {
    fn default() -> Self {
        Self {
            lcdc: Lcdc::empty(),
            stat_irq: StatIrq::empty(),
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            bgp: 0,
            obp0: 0,
            obp1: 0,
            wy: 0,
            wx: 0,
            mode: PpuMode::HBlank,
            line_ticks: 0,
            frame: 0,
            window_line: 0,
            fetcher: Fetcher::default(),
            fifo: PixelFifo::default(),
            line_sprites: Vec::with_capacity(10),
            sprite_height: 8,
            palette: DEFAULT_PALETTE.map(|c| c.to_argb()),
            frame_buffer: vec![DEFAULT_PALETTE[0].to_argb(); SCREEN_WIDTH * SCREEN_HEIGHT],
            dma: OamDma::default(),
        }
    }
}

impl Ppu {
    /// Post-boot state: LCD on, line 0 starting in OAM scan.
    pub(crate) fn power_on(palette: [u32; 4]) -> Self {
        Self {
            lcdc: Lcdc::from_bits_retain(0x91),
            stat_irq: StatIrq::empty(),
            bgp: 0xFC,
            obp0: 0xFF,
            obp1: 0xFF,
            mode: PpuMode::OamScan,
            palette,
            frame_buffer: vec![palette[0]; SCREEN_WIDTH * SCREEN_HEIGHT],
            ..Self::default()
        }
    }

    pub(crate) fn mode(&self) -> PpuMode {
        self.mode
    }

    pub(crate) fn ly(&self) -> u8 {
        self.ly
    }

    pub(crate) fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn frame_buffer(&self) -> &[u32] {
        &self.frame_buffer
    }

    pub(crate) fn lcd_enabled(&self) -> bool {
        self.lcdc.contains(Lcdc::LCD_ENABLE)
    }

    pub(crate) fn read_register(&self, addr: u16) -> u8 {
        match addr {
            LCDC => self.lcdc.bits(),
            STAT => {
                let lyc = if self.ly == self.lyc { STAT_LYC_EQUAL } else { 0 };
                let mode = if self.lcd_enabled() { self.mode as u8 } else { 0 };
                0x80 | self.stat_irq.bits() | lyc | mode
            }
            SCY => self.scy,
            SCX => self.scx,
            LY => self.ly,
            LYC => self.lyc,
            DMA => self.dma.source(),
            BGP => self.bgp,
            OBP0 => self.obp0,
            OBP1 => self.obp1,
            WY => self.wy,
            WX => self.wx,
            _ => 0xFF,
        }
    }

    pub(crate) fn write_register(&mut self, addr: u16, value: u8) {
        match addr {
            LCDC => self.write_lcdc(value),
            STAT => self.stat_irq = StatIrq::from_bits_truncate(value),
            SCY => self.scy = value,
            SCX => self.scx = value,
            // LY is read-only.
            LY => {}
            LYC => self.lyc = value,
            DMA => self.dma.start(value),
            BGP => self.bgp = value,
            OBP0 => self.obp0 = value,
            OBP1 => self.obp1 = value,
            WY => self.wy = value,
            WX => self.wx = value,
            _ => {}
        }
    }

    fn write_lcdc(&mut self, value: u8) {
        let was_enabled = self.lcd_enabled();
        self.lcdc = Lcdc::from_bits_retain(value);
        match (was_enabled, self.lcd_enabled()) {
            (true, false) => {
                log::debug!("LCD off at LY={}", self.ly);
                self.ly = 0;
                self.line_ticks = 0;
                self.window_line = 0;
                self.mode = PpuMode::HBlank;
                self.fifo.clear();
            }
            (false, true) => {
                log::debug!("LCD on");
                self.ly = 0;
                self.line_ticks = 0;
                self.mode = PpuMode::OamScan;
            }
            _ => {}
        }
    }

    /// Advance one dot.
    pub(crate) fn tick(&mut self, vram: &[u8], oam: &[u8], interrupts: &mut Interrupts) {
        if !self.lcd_enabled() {
            return;
        }

        self.line_ticks += 1;
        match self.mode {
            PpuMode::OamScan => self.tick_oam_scan(oam),
            PpuMode::PixelTransfer => self.tick_pixel_transfer(vram, interrupts),
            PpuMode::HBlank => self.tick_hblank(interrupts),
            PpuMode::VBlank => self.tick_vblank(interrupts),
        }
    }

    fn tick_oam_scan(&mut self, oam: &[u8]) {
        if self.line_ticks == 1 {
            self.select_line_sprites(oam);
        }
        if self.line_ticks >= OAM_SCAN_DOTS {
            self.mode = PpuMode::PixelTransfer;
            self.fetcher.start_line();
            self.fifo.clear();
        }
    }

    fn tick_pixel_transfer(&mut self, vram: &[u8], interrupts: &mut Interrupts) {
        self.pipeline_tick(vram);
        if self.fetcher.pushed_x >= SCREEN_WIDTH {
            self.fifo.clear();
            self.enter_mode(PpuMode::HBlank, interrupts);
        }
    }

    fn tick_hblank(&mut self, interrupts: &mut Interrupts) {
        if self.line_ticks < DOTS_PER_LINE {
            return;
        }
        self.line_ticks = 0;
        if self.fetcher.window_drawn {
            self.window_line = self.window_line.wrapping_add(1);
        }
        self.set_ly(self.ly + 1, interrupts);

        if self.ly >= VISIBLE_LINES {
            self.enter_mode(PpuMode::VBlank, interrupts);
            interrupts.insert(Interrupts::VBLANK);
            self.frame += 1;
        } else {
            self.enter_mode(PpuMode::OamScan, interrupts);
        }
    }

    fn tick_vblank(&mut self, interrupts: &mut Interrupts) {
        if self.line_ticks < DOTS_PER_LINE {
            return;
        }
        self.line_ticks = 0;
        if self.ly + 1 >= LINES_PER_FRAME {
            self.window_line = 0;
            self.set_ly(0, interrupts);
            self.enter_mode(PpuMode::OamScan, interrupts);
        } else {
            self.set_ly(self.ly + 1, interrupts);
        }
    }

    fn set_ly(&mut self, ly: u8, interrupts: &mut Interrupts) {
        self.ly = ly;
        if self.ly == self.lyc && self.stat_irq.contains(StatIrq::LYC) {
            log::trace!("STAT LYC match at LY={}", self.ly);
            interrupts.insert(Interrupts::LCD_STAT);
        }
    }

    fn enter_mode(&mut self, mode: PpuMode, interrupts: &mut Interrupts) {
        self.mode = mode;
        let source = match mode {
            PpuMode::HBlank => StatIrq::HBLANK,
            PpuMode::VBlank => StatIrq::VBLANK,
            PpuMode::OamScan => StatIrq::OAM,
            PpuMode::PixelTransfer => return,
        };
        if self.stat_irq.contains(source) {
            log::trace!("STAT {:?} at LY={}", mode, self.ly);
            interrupts.insert(Interrupts::LCD_STAT);
        }
    }
}
