use crate::cpu::instructions::{Cond, Instruction, Kind};
use crate::cpu::regs::Flags;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    fn condition_met(&self, cond: Cond) -> bool {
        match cond {
            Cond::Always => true,
            Cond::NotZero => !self.flag(Flags::ZERO),
            Cond::Zero => self.flag(Flags::ZERO),
            Cond::NotCarry => !self.flag(Flags::CARRY),
            Cond::Carry => self.flag(Flags::CARRY),
        }
    }

    /// JR/JP/CALL/RET. Returns whether the branch was taken.
    pub(in crate::cpu) fn exec_branch<B: Bus>(
        &mut self,
        bus: &mut B,
        instr: &Instruction,
        operand: u16,
    ) -> bool {
        if !self.condition_met(instr.cond) {
            return false;
        }
        match instr.kind {
            Kind::Jr => {
                let offset = operand as u8 as i8;
                self.regs.pc = self.regs.pc.wrapping_add(offset as u16);
            }
            Kind::Jp => self.regs.pc = operand,
            Kind::Call => {
                let ret = self.regs.pc;
                self.push16(bus, ret);
                self.regs.pc = operand;
            }
            Kind::Ret => self.regs.pc = self.pop16(bus),
            _ => return false,
        }
        true
    }
}
