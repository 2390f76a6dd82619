use super::instructions::{Instruction, Mode};
use super::{Bus, Cpu};

/// Resolved operand of one instruction.
///
/// `dest` is set when the instruction writes memory; the write itself is
/// performed by the execute stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Operands {
    pub value: u16,
    pub dest: Option<u16>,
}

impl Operands {
    fn value(value: u16) -> Self {
        Operands { value, dest: None }
    }

    fn write(value: u16, dest: u16) -> Self {
        Operands {
            value,
            dest: Some(dest),
        }
    }
}

impl Cpu {
    pub(super) fn resolve_operands<B: Bus>(&mut self, bus: &mut B, instr: &Instruction) -> Operands {
        let target = self.regs.get(instr.target);
        let source = self.regs.get(instr.source);
        let high_page = |offset: u8| 0xFF00 | u16::from(offset);

        match instr.mode {
            Mode::Implied => Operands::default(),
            Mode::Reg => Operands::value(target),
            Mode::RegToReg => Operands::value(source),
            Mode::D8 | Mode::D8ToReg | Mode::SpD8ToReg => {
                Operands::value(self.fetch8(bus).into())
            }
            Mode::D16 | Mode::D16ToReg => Operands::value(self.fetch16(bus)),
            Mode::MemToReg => Operands::value(bus.read8(source).into()),
            Mode::RegToMem => Operands::write(source, target),
            Mode::D8ToMem => Operands::write(self.fetch8(bus).into(), target),
            Mode::A16ToReg => {
                let addr = self.fetch16(bus);
                Operands::value(bus.read8(addr).into())
            }
            Mode::RegToA16 => Operands::write(source, self.fetch16(bus)),
            Mode::IoA8ToReg => {
                let addr = high_page(self.fetch8(bus));
                Operands::value(bus.read8(addr).into())
            }
            Mode::RegToIoA8 => Operands::write(source, high_page(self.fetch8(bus))),
            Mode::IoCToReg => Operands::value(bus.read8(high_page(self.regs.c)).into()),
            Mode::RegToIoC => Operands::write(source, high_page(self.regs.c)),
            Mode::Mem => Operands::write(bus.read8(target).into(), target),
            Mode::Param => Operands::value(instr.param.into()),
        }
    }

    /// Commit `value` to the instruction's destination: the pending memory
    /// address if there is one, otherwise the target register.
    pub(super) fn store<B: Bus>(
        &mut self,
        bus: &mut B,
        instr: &Instruction,
        operands: &Operands,
        value: u16,
    ) {
        match operands.dest {
            // LD (a16),SP is the only wide memory store.
            Some(addr) if instr.source.is_wide() => bus.write16(addr, value),
            Some(addr) => bus.write8(addr, value as u8),
            None => self.regs.set(instr.target, value),
        }
    }
}
