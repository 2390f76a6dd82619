use crate::cpu::instructions::ShiftOp;
use crate::cpu::regs::Flags;
use crate::cpu::Cpu;

impl Cpu {
    /// Rotate or shift `value`, setting Z/C from the result and clearing N/H.
    pub(in crate::cpu) fn alu_shift(&mut self, op: ShiftOp, value: u8) -> u8 {
        let carry_in = u8::from(self.flag(Flags::CARRY));
        let (result, carry_out) = match op {
            ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            ShiftOp::Rl => ((value << 1) | carry_in, value & 0x80 != 0),
            ShiftOp::Rr => ((value >> 1) | (carry_in << 7), value & 0x01 != 0),
            ShiftOp::Sla => (value << 1, value & 0x80 != 0),
            ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            ShiftOp::Swap => (value.rotate_left(4), false),
            ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
        };
        self.regs.f = Flags::compose(result == 0, false, false, carry_out);
        result
    }

    pub(in crate::cpu) fn alu_bit(&mut self, bit: u8, value: u8) {
        let carry = self.flag(Flags::CARRY);
        self.regs.f = Flags::compose(value & (1 << bit) == 0, false, true, carry);
    }
}
