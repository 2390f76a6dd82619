use thiserror::Error;

use crate::cpu::{Kind, Mode};

/// Errors that stop the instruction stream.
///
/// Both variants point at a gap in the interpreter rather than a bug in the
/// guest program, so the CPU locks up and keeps reporting the same error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("unsupported opcode {opcode:#04X} at {pc:#06X}")]
    UnsupportedOpcode { opcode: u8, pc: u16 },
    #[error("{kind:?} cannot use addressing mode {mode:?} (opcode {opcode:#04X} at {pc:#06X})")]
    UnsupportedMode {
        kind: Kind,
        mode: Mode,
        opcode: u8,
        pc: u16,
    },
}

/// Bank-controller rejections. The bus logs these and ignores the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("ROM bank {bank} out of range (cartridge has {count} banks)")]
    RomBankOutOfRange { bank: u16, count: u16 },
    #[error("RAM bank {bank} out of range (cartridge has {count} banks)")]
    RamBankOutOfRange { bank: u8, count: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartridgeError {
    #[error("ROM is too short: {len} bytes")]
    TooShort { len: usize },
    #[error("boot logo signature does not match")]
    MissingLogo,
    #[error("header checksum mismatch: header says {expected:#04X}, computed {computed:#04X}")]
    HeaderChecksum { expected: u8, computed: u8 },
    #[error("unsupported cartridge type {0:#04X}")]
    UnsupportedType(u8),
    #[error("invalid ROM size code {0:#04X}")]
    InvalidRomSize(u8),
    #[error("invalid RAM size code {0:#04X}")]
    InvalidRamSize(u8),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to load cartridge")]
    Cartridge(#[from] CartridgeError),
    #[error(transparent)]
    Cpu(#[from] CpuError),
}
