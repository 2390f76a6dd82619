//! Memory bank controllers.
//!
//! One state struct covers every supported controller; `MbcKind` decides how
//! writes to 0x0000-0x7FFF are decoded. The 0x4000-0x7FFF window always shows
//! `rom_bank` and 0xA000-0xBFFF shows `ram_bank`.

use crate::error::{BankError, CartridgeError};

pub(crate) const ROM_BANK_SIZE: usize = 0x4000;
pub(crate) const RAM_BANK_SIZE: usize = 0x2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MbcKind {
    RomOnly,
    Mbc1,
    Mbc3,
    Mbc5,
}

impl MbcKind {
    /// Decode the cartridge type byte at 0x0147.
    pub fn from_type(code: u8) -> Result<Self, CartridgeError> {
        match code {
            0x00 | 0x08 | 0x09 => Ok(MbcKind::RomOnly),
            0x01..=0x03 => Ok(MbcKind::Mbc1),
            0x0F..=0x13 => Ok(MbcKind::Mbc3),
            0x19..=0x1E => Ok(MbcKind::Mbc5),
            other => Err(CartridgeError::UnsupportedType(other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BankController {
    kind: MbcKind,
    rom: Vec<u8>,
    ram: Vec<u8>,
    rom_banks: u16,
    /// Banks backed by `ram`; at least one.
    ram_banks: u8,
    rom_bank: u16,
    ram_bank: u8,
    ram_enabled: bool,
    // MBC1 registers.
    bank_low: u8,
    bank_high: u8,
    ram_banking_mode: bool,
}

impl BankController {
    pub fn new(kind: MbcKind, rom: Vec<u8>, rom_banks: u16, ram_banks: u8) -> Self {
        let ram_banks = ram_banks.max(1);
        Self {
            kind,
            rom,
            ram: vec![0xFF; ram_banks as usize * RAM_BANK_SIZE],
            rom_banks: rom_banks.max(1),
            ram_banks,
            rom_bank: 1.min(rom_banks.saturating_sub(1)),
            ram_bank: 0,
            ram_enabled: false,
            bank_low: 1,
            bank_high: 0,
            ram_banking_mode: false,
        }
    }

    pub fn kind(&self) -> MbcKind {
        self.kind
    }

    pub fn rom_bank(&self) -> u16 {
        self.rom_bank
    }

    pub fn ram_bank(&self) -> u8 {
        self.ram_bank
    }

    pub fn ram_enabled(&self) -> bool {
        self.ram_enabled
    }

    /// Map ROM bank `bank` into 0x4000-0x7FFF.
    ///
    /// A bank register value of 0 selects bank 1, except on MBC5 where bank 0
    /// can be mapped twice. Out-of-range banks are rejected and the current
    /// mapping is kept.
    pub fn switch_rom_bank(&mut self, bank: u16) -> Result<(), BankError> {
        let bank = if bank == 0 && self.kind != MbcKind::Mbc5 {
            1
        } else {
            bank
        };
        if bank >= self.rom_banks {
            return Err(BankError::RomBankOutOfRange {
                bank,
                count: self.rom_banks,
            });
        }
        self.rom_bank = bank;
        Ok(())
    }

    pub fn switch_ram_bank(&mut self, bank: u8) -> Result<(), BankError> {
        if bank >= self.ram_banks {
            return Err(BankError::RamBankOutOfRange {
                bank,
                count: self.ram_banks,
            });
        }
        self.ram_bank = bank;
        Ok(())
    }

    pub(crate) fn read_rom(&self, addr: u16) -> u8 {
        let bank = if addr < 0x4000 { 0 } else { self.rom_bank };
        let index = bank as usize * ROM_BANK_SIZE + (addr as usize & (ROM_BANK_SIZE - 1));
        self.rom.get(index).copied().unwrap_or(0xFF)
    }

    /// Handle a write to the control registers at 0x0000-0x7FFF.
    pub(crate) fn write_control(&mut self, addr: u16, value: u8) -> Result<(), BankError> {
        match (self.kind, addr) {
            (MbcKind::RomOnly, _) => Ok(()),
            (_, 0x0000..=0x1FFF) => {
                self.ram_enabled = value & 0x0F == 0x0A;
                Ok(())
            }

            (MbcKind::Mbc1, 0x2000..=0x3FFF) => {
                self.bank_low = value & 0x1F;
                self.apply_mbc1_banks()
            }
            (MbcKind::Mbc1, 0x4000..=0x5FFF) => {
                self.bank_high = value & 0x03;
                self.apply_mbc1_banks()
            }
            (MbcKind::Mbc1, 0x6000..=0x7FFF) => {
                self.ram_banking_mode = value & 0x01 != 0;
                self.apply_mbc1_banks()
            }

            (MbcKind::Mbc3, 0x2000..=0x3FFF) => self.switch_rom_bank((value & 0x7F).into()),
            (MbcKind::Mbc3, 0x4000..=0x5FFF) => match value {
                0x00..=0x03 => self.switch_ram_bank(value),
                0x08..=0x0C => {
                    log::warn!("MBC3 RTC register {value:#04X} selected; RTC is not emulated");
                    Ok(())
                }
                _ => Err(BankError::RamBankOutOfRange {
                    bank: value,
                    count: self.ram_banks,
                }),
            },
            // RTC latch.
            (MbcKind::Mbc3, _) => Ok(()),

            (MbcKind::Mbc5, 0x2000..=0x2FFF) => {
                self.switch_rom_bank((self.rom_bank & 0x100) | u16::from(value))
            }
            (MbcKind::Mbc5, 0x3000..=0x3FFF) => {
                self.switch_rom_bank((self.rom_bank & 0xFF) | (u16::from(value & 0x01) << 8))
            }
            (MbcKind::Mbc5, 0x4000..=0x5FFF) => self.switch_ram_bank(value & 0x0F),
            _ => Ok(()),
        }
    }

    /// MBC1 combines the 5-bit bank register with the 2-bit register in mode
    /// 0. In mode 1 the 2-bit register selects the RAM bank instead.
    fn apply_mbc1_banks(&mut self) -> Result<(), BankError> {
        let low = u16::from(self.bank_low.max(1));
        let (rom_bank, ram_bank) = if self.ram_banking_mode {
            (low, self.bank_high)
        } else {
            (low | (u16::from(self.bank_high) << 5), 0)
        };
        let ram = self.switch_ram_bank(ram_bank);
        self.switch_rom_bank(rom_bank)?;
        ram
    }

    fn ram_index(&self, addr: u16) -> usize {
        self.ram_bank as usize * RAM_BANK_SIZE + (addr as usize & (RAM_BANK_SIZE - 1))
    }

    fn ram_accessible(&self) -> bool {
        self.kind == MbcKind::RomOnly || self.ram_enabled
    }

    pub(crate) fn read_ram(&self, addr: u16) -> u8 {
        if !self.ram_accessible() {
            return 0xFF;
        }
        self.ram.get(self.ram_index(addr)).copied().unwrap_or(0xFF)
    }

    pub(crate) fn write_ram(&mut self, addr: u16, value: u8) {
        if !self.ram_accessible() {
            return;
        }
        let index = self.ram_index(addr);
        if let Some(byte) = self.ram.get_mut(index) {
            *byte = value;
        }
    }
}
