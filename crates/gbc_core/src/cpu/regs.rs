use bitflags::bitflags;

use crate::machine::GameBoyModel;

bitflags! {
    /// The F register. Bits 0-3 do not exist on hardware, so any value
    /// built through `from_bits_truncate` keeps them clear.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Flags: u8 {
        const ZERO = 0x80;
        const SUBTRACT = 0x40;
        const HALF_CARRY = 0x20;
        const CARRY = 0x10;
    }
}

impl Flags {
    #[inline]
    pub fn compose(zero: bool, subtract: bool, half_carry: bool, carry: bool) -> Self {
        let mut flags = Flags::empty();
        flags.set(Flags::ZERO, zero);
        flags.set(Flags::SUBTRACT, subtract);
        flags.set(Flags::HALF_CARRY, half_carry);
        flags.set(Flags::CARRY, carry);
        flags
    }
}

/// Register selector used by the instruction tables.
///
/// `None` marks an unused operand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    None,
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

impl Reg {
    #[inline]
    pub const fn is_wide(self) -> bool {
        matches!(
            self,
            Reg::AF | Reg::BC | Reg::DE | Reg::HL | Reg::SP | Reg::PC
        )
    }
}

/// Registers for the Game Boy CPU (SM83).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub f: Flags,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    /// Register contents the boot ROM leaves behind when it jumps to 0x0100.
    pub fn power_on(model: GameBoyModel) -> Self {
        let mut regs = Registers {
            sp: 0xFFFE,
            pc: 0x0100,
            ..Registers::default()
        };
        match model {
            GameBoyModel::Dmg => {
                regs.set_af(0x01B0);
                regs.set_bc(0x0013);
                regs.set_de(0x00D8);
                regs.set_hl(0x014D);
            }
            GameBoyModel::Cgb => {
                regs.set_af(0x1180);
                regs.set_bc(0x0000);
                regs.set_de(0xFF56);
                regs.set_hl(0x000D);
            }
        }
        regs
    }

    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f.bits()])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        self.f = Flags::from_bits_truncate(f);
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        [self.b, self.c] = value.to_be_bytes();
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        [self.d, self.e] = value.to_be_bytes();
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        [self.h, self.l] = value.to_be_bytes();
    }

    /// Mutable access to one of the plain 8-bit registers. F is excluded
    /// because its low nibble must stay clear.
    pub fn byte_mut(&mut self, reg: Reg) -> Option<&mut u8> {
        match reg {
            Reg::A => Some(&mut self.a),
            Reg::B => Some(&mut self.b),
            Reg::C => Some(&mut self.c),
            Reg::D => Some(&mut self.d),
            Reg::E => Some(&mut self.e),
            Reg::H => Some(&mut self.h),
            Reg::L => Some(&mut self.l),
            _ => None,
        }
    }

    pub fn get(&self, reg: Reg) -> u16 {
        match reg {
            Reg::None => 0,
            Reg::A => self.a.into(),
            Reg::F => self.f.bits().into(),
            Reg::B => self.b.into(),
            Reg::C => self.c.into(),
            Reg::D => self.d.into(),
            Reg::E => self.e.into(),
            Reg::H => self.h.into(),
            Reg::L => self.l.into(),
            Reg::AF => self.af(),
            Reg::BC => self.bc(),
            Reg::DE => self.de(),
            Reg::HL => self.hl(),
            Reg::SP => self.sp,
            Reg::PC => self.pc,
        }
    }

    /// Write `value` to `reg`; 8-bit registers take the low byte.
    pub fn set(&mut self, reg: Reg, value: u16) {
        match reg {
            Reg::None => {}
            Reg::F => self.f = Flags::from_bits_truncate(value as u8),
            Reg::AF => self.set_af(value),
            Reg::BC => self.set_bc(value),
            Reg::DE => self.set_de(value),
            Reg::HL => self.set_hl(value),
            Reg::SP => self.sp = value,
            Reg::PC => self.pc = value,
            narrow => {
                if let Some(byte) = self.byte_mut(narrow) {
                    *byte = value as u8;
                }
            }
        }
    }
}
