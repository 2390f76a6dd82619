mod alu;
mod bits;
mod control;
mod stack;

use super::instructions::{Instruction, Kind, Mode};
use super::operands::Operands;
use super::regs::{Flags, Reg};
use super::{Bus, Cpu};
use crate::error::CpuError;

impl Cpu {
    /// Execute a decoded instruction with its resolved operands and return
    /// the cycles it took.
    pub(super) fn execute<B: Bus>(
        &mut self,
        bus: &mut B,
        instr: &Instruction,
        operands: Operands,
    ) -> Result<u32, CpuError> {
        let mut cycles = u32::from(instr.cycles);
        let value = operands.value;

        match instr.kind {
            Kind::Nop => {}
            Kind::Ld => self.exec_ld(bus, instr, &operands)?,
            Kind::Ldi | Kind::Ldd => {
                self.exec_ld(bus, instr, &operands)?;
                let hl = self.regs.hl();
                let hl = if instr.kind == Kind::Ldi {
                    hl.wrapping_add(1)
                } else {
                    hl.wrapping_sub(1)
                };
                self.regs.set_hl(hl);
            }
            Kind::Inc | Kind::Dec => {
                let increment = instr.kind == Kind::Inc;
                let result = match instr.mode {
                    Mode::Reg if instr.target.is_wide() => {
                        if increment {
                            value.wrapping_add(1)
                        } else {
                            value.wrapping_sub(1)
                        }
                    }
                    Mode::Reg | Mode::Mem if increment => self.alu_inc8(value as u8).into(),
                    Mode::Reg | Mode::Mem => self.alu_dec8(value as u8).into(),
                    _ => return Err(self.unsupported_mode(instr)),
                };
                self.store(bus, instr, &operands, result);
            }
            Kind::Alu(op) => {
                if instr.target != Reg::A {
                    return Err(self.unsupported_mode(instr));
                }
                self.alu(op, value as u8);
            }
            Kind::AddHl => {
                let result = self.alu_add16_hl(value);
                self.regs.set_hl(result);
            }
            Kind::AddSp => {
                self.regs.sp = self.alu_add_sp(value as u8);
            }
            Kind::RotateA(op) => {
                let result = self.alu_shift(op, self.regs.a);
                self.regs.a = result;
                self.regs.f.remove(Flags::ZERO);
            }
            Kind::Daa => self.alu_daa(),
            Kind::Cpl => {
                self.regs.a = !self.regs.a;
                self.regs.f.insert(Flags::SUBTRACT | Flags::HALF_CARRY);
            }
            Kind::Scf => {
                self.regs.f.remove(Flags::SUBTRACT | Flags::HALF_CARRY);
                self.regs.f.insert(Flags::CARRY);
            }
            Kind::Ccf => {
                self.regs.f.remove(Flags::SUBTRACT | Flags::HALF_CARRY);
                self.regs.f.toggle(Flags::CARRY);
            }
            Kind::Jr | Kind::Jp | Kind::Call | Kind::Ret => {
                if self.exec_branch(bus, instr, value) {
                    cycles = u32::from(instr.branch_cycles);
                }
            }
            Kind::Reti => {
                self.regs.pc = self.pop16(bus);
                self.ime = true;
            }
            Kind::Rst => {
                let pc = self.regs.pc;
                self.push16(bus, pc);
                self.regs.pc = value;
            }
            Kind::Push => self.push16(bus, value),
            Kind::Pop => {
                let popped = self.pop16(bus);
                self.regs.set(instr.target, popped);
            }
            Kind::Di => {
                self.ime = false;
                self.ei_pending = false;
                self.ei_delay = false;
            }
            Kind::Ei => self.ei_pending = true,
            Kind::Halt => self.halted = true,
            Kind::Stop => {
                // Skip the padding byte.
                self.regs.pc = self.regs.pc.wrapping_add(1);
                if bus.speed_switch() {
                    log::debug!("speed switch at {:04X}", self.instr_pc);
                }
            }
            Kind::Shift(op) => {
                let result = self.alu_shift(op, value as u8);
                self.store(bus, instr, &operands, result.into());
            }
            Kind::Bit => self.alu_bit(instr.param, value as u8),
            Kind::Res => {
                let result = value & !(1 << instr.param);
                self.store(bus, instr, &operands, result);
            }
            Kind::Set => {
                let result = value | (1 << instr.param);
                self.store(bus, instr, &operands, result);
            }
            Kind::Prefix | Kind::Invalid => {
                return Err(CpuError::UnsupportedOpcode {
                    opcode: self.opcode,
                    pc: self.instr_pc,
                })
            }
        }

        Ok(cycles)
    }

    fn exec_ld<B: Bus>(
        &mut self,
        bus: &mut B,
        instr: &Instruction,
        operands: &Operands,
    ) -> Result<(), CpuError> {
        let value = match instr.mode {
            Mode::SpD8ToReg => self.alu_add_sp(operands.value as u8),
            Mode::Implied | Mode::Reg | Mode::Mem | Mode::D8 | Mode::D16 | Mode::Param => {
                return Err(self.unsupported_mode(instr));
            }
            _ => operands.value,
        };
        self.store(bus, instr, operands, value);
        Ok(())
    }
}
