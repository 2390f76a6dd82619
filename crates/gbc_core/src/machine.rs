mod bus;
mod cartridge;
mod gameboy;
mod ppu;
mod serial;
mod timer;

pub use bus::{GameBoyBus, JoypadButton};
pub use cartridge::{header_checksum, Cartridge, CartridgeHeader, MbcKind, BOOT_LOGO};
pub use gameboy::{GameBoy, MCYCLES_PER_FRAME};
pub use ppu::{Lcdc, PpuMode, StatIrq};

/// Hardware model being emulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameBoyModel {
    #[default]
    Dmg,
    Cgb,
}

impl GameBoyModel {
    pub fn is_cgb(self) -> bool {
        self == GameBoyModel::Cgb
    }
}
