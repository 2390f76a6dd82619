use crate::machine::bus::OAM_SIZE;

/// Dots between the FF46 write and the first copied byte.
pub(crate) const DMA_START_DELAY: u8 = 2;

/// OAM DMA controller. The bus performs the copy; this only tracks where the
/// transfer is.
#[derive(Debug, Clone, Default)]
pub(crate) struct OamDma {
    active: bool,
    source: u8,
    offset: u8,
    delay: u8,
}

impl OamDma {
    pub(crate) fn start(&mut self, source: u8) {
        log::debug!("OAM DMA from {:04X}", u16::from(source) << 8);
        self.active = true;
        self.source = source;
        self.offset = 0;
        self.delay = DMA_START_DELAY;
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    /// Last value written to FF46.
    pub(crate) fn source(&self) -> u8 {
        self.source
    }

    /// Advance one dot. Returns the source address and OAM index of the byte
    /// to copy during this dot, if any.
    pub(crate) fn tick(&mut self) -> Option<(u16, usize)> {
        if !self.active {
            return None;
        }
        if self.delay > 0 {
            self.delay -= 1;
            return None;
        }

        let index = self.offset as usize;
        let source = (u16::from(self.source) << 8) | u16::from(self.offset);
        self.offset += 1;
        if self.offset as usize >= OAM_SIZE {
            self.active = false;
        }
        Some((source, index))
    }
}
