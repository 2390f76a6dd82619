use crate::error::CartridgeError;

/// Logo bitmap every licensed cartridge carries at 0x0104-0x0133.
pub const BOOT_LOGO: [u8; 48] = [
    0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D,
    0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99,
    0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
];

const LOGO_START: usize = 0x0104;
const TITLE_START: usize = 0x0134;
const TITLE_END: usize = 0x0144;
const CGB_FLAG: usize = 0x0143;
const CARTRIDGE_TYPE: usize = 0x0147;
const ROM_SIZE: usize = 0x0148;
const RAM_SIZE: usize = 0x0149;
const HEADER_CHECKSUM: usize = 0x014D;
const HEADER_END: usize = 0x0150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub title: String,
    pub cgb_flag: u8,
    pub cartridge_type: u8,
    pub rom_size_code: u8,
    pub ram_size_code: u8,
    pub header_checksum: u8,
}

impl CartridgeHeader {
    pub fn parse(rom: &[u8]) -> Result<Self, CartridgeError> {
        if rom.len() < HEADER_END {
            return Err(CartridgeError::TooShort { len: rom.len() });
        }

        let cgb_flag = rom[CGB_FLAG];
        // CGB titles give up their last byte to the CGB flag.
        let title_end = if cgb_flag & 0x80 != 0 {
            CGB_FLAG
        } else {
            TITLE_END
        };
        let title = rom[TITLE_START..title_end]
            .iter()
            .take_while(|&&b| b != 0)
            .filter(|b| b.is_ascii_graphic() || **b == b' ')
            .map(|&b| b as char)
            .collect::<String>()
            .trim_end()
            .to_string();

        Ok(CartridgeHeader {
            title,
            cgb_flag,
            cartridge_type: rom[CARTRIDGE_TYPE],
            rom_size_code: rom[ROM_SIZE],
            ram_size_code: rom[RAM_SIZE],
            header_checksum: rom[HEADER_CHECKSUM],
        })
    }

    /// `1 << (rom_size_code + 1)` banks of 16 KiB.
    pub fn rom_banks(&self) -> Result<u16, CartridgeError> {
        match self.rom_size_code {
            code @ 0x00..=0x08 => Ok(1 << (code + 1)),
            code => Err(CartridgeError::InvalidRomSize(code)),
        }
    }

    /// Number of 8 KiB external RAM banks.
    pub fn ram_banks(&self) -> Result<u8, CartridgeError> {
        match self.ram_size_code {
            0x00 => Ok(0),
            // 2 KiB parts, rounded up to one bank.
            0x01 => Ok(1),
            0x02 => Ok(1),
            0x03 => Ok(4),
            0x04 => Ok(16),
            0x05 => Ok(8),
            code => Err(CartridgeError::InvalidRamSize(code)),
        }
    }
}

/// Checksum the boot ROM computes over 0x0134-0x014C. Missing bytes are
/// skipped.
pub fn header_checksum(rom: &[u8]) -> u8 {
    rom.get(TITLE_START..HEADER_CHECKSUM)
        .unwrap_or_default()
        .iter()
        .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1))
}

pub(super) fn verify(rom: &[u8], header: &CartridgeHeader) -> Result<(), CartridgeError> {
    if rom[LOGO_START..LOGO_START + BOOT_LOGO.len()] != BOOT_LOGO {
        return Err(CartridgeError::MissingLogo);
    }
    let computed = header_checksum(rom);
    if computed != header.header_checksum {
        return Err(CartridgeError::HeaderChecksum {
            expected: header.header_checksum,
            computed,
        });
    }
    Ok(())
}
