mod header;
mod mbc;

pub use header::{header_checksum, CartridgeHeader, BOOT_LOGO};
pub use mbc::{BankController, MbcKind};

use crate::error::{BankError, CartridgeError};

/// A loaded cartridge: parsed header plus the bank controller that owns the
/// ROM image and external RAM.
#[derive(Debug, Clone)]
pub struct Cartridge {
    header: CartridgeHeader,
    mbc: BankController,
}

impl Cartridge {
    /// Parse and validate `rom`. With `verify` unset the boot logo and
    /// header checksum are not checked.
    pub fn from_bytes(rom: &[u8], verify: bool) -> Result<Self, CartridgeError> {
        let header = CartridgeHeader::parse(rom)?;
        if verify {
            header::verify(rom, &header)?;
        }

        let kind = MbcKind::from_type(header.cartridge_type)?;
        let rom_banks = header.rom_banks()?;
        let ram_banks = header.ram_banks()?;
        let declared = rom_banks as usize * mbc::ROM_BANK_SIZE;
        if rom.len() < declared {
            return Err(CartridgeError::TooShort { len: rom.len() });
        }

        Ok(Cartridge {
            mbc: BankController::new(kind, rom[..declared].to_vec(), rom_banks, ram_banks),
            header,
        })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn mbc(&self) -> &BankController {
        &self.mbc
    }

    #[inline]
    pub(crate) fn read_rom(&self, addr: u16) -> u8 {
        self.mbc.read_rom(addr)
    }

    #[inline]
    pub(crate) fn write_control(&mut self, addr: u16, value: u8) -> Result<(), BankError> {
        self.mbc.write_control(addr, value)
    }

    #[inline]
    pub(crate) fn read_ram(&self, addr: u16) -> u8 {
        self.mbc.read_ram(addr)
    }

    #[inline]
    pub(crate) fn write_ram(&mut self, addr: u16, value: u8) {
        self.mbc.write_ram(addr, value)
    }
}
