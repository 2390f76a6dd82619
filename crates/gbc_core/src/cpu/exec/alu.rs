use crate::cpu::instructions::AluOp;
use crate::cpu::regs::Flags;
use crate::cpu::Cpu;

impl Cpu {
    pub(in crate::cpu) fn alu(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(value, false),
            AluOp::Adc => self.alu_add(value, true),
            AluOp::Sub => self.regs.a = self.alu_sub(value, false),
            AluOp::Sbc => self.regs.a = self.alu_sub(value, true),
            AluOp::And => {
                self.regs.a &= value;
                self.regs.f = Flags::compose(self.regs.a == 0, false, true, false);
            }
            AluOp::Xor => {
                self.regs.a ^= value;
                self.regs.f = Flags::compose(self.regs.a == 0, false, false, false);
            }
            AluOp::Or => {
                self.regs.a |= value;
                self.regs.f = Flags::compose(self.regs.a == 0, false, false, false);
            }
            AluOp::Cp => {
                self.alu_sub(value, false);
            }
        }
    }

    fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a;
        let carry = u8::from(use_carry && self.flag(Flags::CARRY));
        let result = a.wrapping_add(value).wrapping_add(carry);
        self.regs.f = Flags::compose(
            result == 0,
            false,
            (a & 0x0F) + (value & 0x0F) + carry > 0x0F,
            u16::from(a) + u16::from(value) + u16::from(carry) > 0xFF,
        );
        self.regs.a = result;
    }

    /// A - value (- carry). Sets flags and returns the result without
    /// storing it, so CP can share the path.
    fn alu_sub(&mut self, value: u8, use_carry: bool) -> u8 {
        let a = self.regs.a;
        let carry = u8::from(use_carry && self.flag(Flags::CARRY));
        let result = a.wrapping_sub(value).wrapping_sub(carry);
        self.regs.f = Flags::compose(
            result == 0,
            true,
            (a & 0x0F) < (value & 0x0F) + carry,
            u16::from(a) < u16::from(value) + u16::from(carry),
        );
        result
    }

    pub(in crate::cpu) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        let carry = self.flag(Flags::CARRY);
        self.regs.f = Flags::compose(result == 0, false, value & 0x0F == 0x0F, carry);
        result
    }

    pub(in crate::cpu) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        let carry = self.flag(Flags::CARRY);
        self.regs.f = Flags::compose(result == 0, true, value & 0x0F == 0, carry);
        result
    }

    /// ADD HL,rr. Z is preserved.
    pub(in crate::cpu) fn alu_add16_hl(&mut self, value: u16) -> u16 {
        let hl = self.regs.hl();
        let zero = self.flag(Flags::ZERO);
        self.regs.f = Flags::compose(
            zero,
            false,
            (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF,
            u32::from(hl) + u32::from(value) > 0xFFFF,
        );
        hl.wrapping_add(value)
    }

    /// SP + e8, shared by ADD SP,e8 and LD HL,SP+e8. Carries come from the
    /// low byte.
    pub(in crate::cpu) fn alu_add_sp(&mut self, offset: u8) -> u16 {
        let sp = self.regs.sp;
        let low = sp & 0x00FF;
        let offset16 = u16::from(offset);
        self.regs.f = Flags::compose(
            false,
            false,
            (low & 0x0F) + (offset16 & 0x0F) > 0x0F,
            low + offset16 > 0xFF,
        );
        sp.wrapping_add(offset as i8 as u16)
    }

    pub(in crate::cpu) fn alu_daa(&mut self) {
        let mut a = self.regs.a;
        let mut carry = self.flag(Flags::CARRY);
        let half = self.flag(Flags::HALF_CARRY);
        let subtract = self.flag(Flags::SUBTRACT);

        if subtract {
            if half {
                a = a.wrapping_sub(0x06);
            }
            if carry {
                a = a.wrapping_sub(0x60);
            }
        } else {
            if carry || a > 0x99 {
                a = a.wrapping_add(0x60);
                carry = true;
            }
            if half || (a & 0x0F) > 0x09 {
                a = a.wrapping_add(0x06);
            }
        }

        self.regs.a = a;
        self.regs.f = Flags::compose(a == 0, subtract, false, carry);
    }
}
