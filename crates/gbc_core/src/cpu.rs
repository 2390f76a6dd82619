mod exec;
mod instructions;
mod interrupts;
mod operands;
mod regs;

pub use instructions::{AluOp, Cond, Instruction, Kind, Mode, ShiftOp, CB_OPCODES, OPCODES};
pub use interrupts::Interrupts;
pub use regs::{Flags, Reg, Registers};

use crate::error::CpuError;
use crate::machine::GameBoyModel;

/// Abstraction over the Game Boy bus (memory and IO).
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr);
        let hi = self.read8(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo);
        self.write8(addr.wrapping_add(1), hi);
    }

    /// Advance bus-side peripherals by `cycles` machine cycles.
    ///
    /// The CPU calls this once at the end of every step with the cycles it
    /// just consumed.
    fn tick(&mut self, _cycles: u32) {}

    /// STOP hook for the CGB speed switch. Returns `true` when an armed
    /// switch was performed.
    fn speed_switch(&mut self) -> bool {
        false
    }
}

/// Cycles charged for dispatching an interrupt.
pub const INTERRUPT_CYCLES: u32 = 5;

#[derive(Debug, Clone)]
pub struct Cpu {
    pub regs: Registers,
    /// Interrupt master enable.
    pub ime: bool,
    pub halted: bool,
    /// Set by EI; becomes `ei_delay` at the end of the same step.
    ei_pending: bool,
    /// Promoted to IME at the end of the step after EI.
    ei_delay: bool,
    /// Address and opcode of the instruction being executed.
    instr_pc: u16,
    opcode: u8,
    locked: Option<CpuError>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new(GameBoyModel::Dmg)
    }
}

impl Cpu {
    pub fn new(model: GameBoyModel) -> Self {
        Self {
            regs: Registers::power_on(model),
            ime: false,
            halted: false,
            ei_pending: false,
            ei_delay: false,
            instr_pc: 0x0100,
            opcode: 0x00,
            locked: None,
        }
    }

    pub fn reset(&mut self, model: GameBoyModel) {
        *self = Self::new(model);
    }

    /// The error that locked the CPU, if any.
    pub fn locked(&self) -> Option<CpuError> {
        self.locked
    }

    /// Execute one step and return the machine cycles it took.
    ///
    /// A step is one of: an idle HALT cycle, an interrupt dispatch, or one
    /// complete instruction. The bus is ticked with the step's cycles
    /// before returning.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        if let Some(err) = self.locked {
            return Err(err);
        }

        let pending = self.pending_interrupts(bus);
        if self.halted {
            if pending.is_empty() {
                bus.tick(1);
                return Ok(1);
            }
            self.halted = false;
        }

        if self.ime && !pending.is_empty() {
            self.service_interrupt(bus, pending);
            bus.tick(INTERRUPT_CYCLES);
            return Ok(INTERRUPT_CYCLES);
        }

        let cycles = match self.execute_next(bus) {
            Ok(cycles) => cycles,
            Err(err) => {
                log::error!("{err}; CPU locked");
                self.locked = Some(err);
                return Err(err);
            }
        };
        self.apply_ime_delay();
        bus.tick(cycles);
        Ok(cycles)
    }

    fn execute_next<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        self.instr_pc = self.regs.pc;
        let mut opcode = self.fetch8(bus);
        let instr = if opcode == 0xCB {
            opcode = self.fetch8(bus);
            &CB_OPCODES[opcode as usize]
        } else {
            &OPCODES[opcode as usize]
        };
        self.opcode = opcode;

        if matches!(instr.kind, Kind::Invalid | Kind::Prefix) {
            return Err(CpuError::UnsupportedOpcode {
                opcode,
                pc: self.instr_pc,
            });
        }

        log::trace!(
            "{:04X}: {:02X} {:?} {:?} {:?},{:?}",
            self.instr_pc,
            opcode,
            instr.kind,
            instr.mode,
            instr.target,
            instr.source
        );

        let operands = self.resolve_operands(bus, instr);
        self.execute(bus, instr, operands)
    }

    fn apply_ime_delay(&mut self) {
        if self.ei_delay {
            self.ime = true;
            self.ei_delay = false;
        }
        if self.ei_pending {
            self.ei_pending = false;
            self.ei_delay = true;
        }
    }

    #[inline]
    fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    #[inline]
    fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    fn flag(&self, flag: Flags) -> bool {
        self.regs.f.contains(flag)
    }

    fn unsupported_mode(&self, instr: &Instruction) -> CpuError {
        CpuError::UnsupportedMode {
            kind: instr.kind,
            mode: instr.mode,
            opcode: self.opcode,
            pc: self.instr_pc,
        }
    }
}

#[cfg(test)]
mod tests;
