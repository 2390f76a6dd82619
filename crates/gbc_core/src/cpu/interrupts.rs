use bitflags::bitflags;

use super::{Bus, Cpu};

pub(crate) const IF_ADDR: u16 = 0xFF0F;
pub(crate) const IE_ADDR: u16 = 0xFFFF;

bitflags! {
    /// Interrupt sources as laid out in IE (FFFF) and IF (FF0F). Bit order is
    /// also dispatch priority, lowest bit first.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Interrupts: u8 {
        const VBLANK = 0x01;
        const LCD_STAT = 0x02;
        const TIMER = 0x04;
        const SERIAL = 0x08;
        const JOYPAD = 0x10;
    }
}

impl Interrupts {
    /// Highest-priority source in the set.
    pub fn highest(self) -> Option<Interrupts> {
        let bits = self.bits();
        (bits != 0).then(|| Interrupts::from_bits_truncate(bits & bits.wrapping_neg()))
    }

    /// Dispatch address of the highest-priority source in the set.
    pub fn vector(self) -> u16 {
        0x40 + 8 * self.bits().trailing_zeros() as u16
    }
}

impl Cpu {
    /// Sources that are both requested and enabled.
    pub(super) fn pending_interrupts<B: Bus>(&self, bus: &mut B) -> Interrupts {
        let requested = bus.read8(IF_ADDR);
        let enabled = bus.read8(IE_ADDR);
        Interrupts::from_bits_truncate(requested & enabled)
    }

    pub(super) fn service_interrupt<B: Bus>(&mut self, bus: &mut B, pending: Interrupts) {
        let Some(source) = pending.highest() else {
            return;
        };
        self.ime = false;
        self.ei_pending = false;
        self.ei_delay = false;

        let pc = self.regs.pc;
        self.push16(bus, pc);
        self.regs.pc = source.vector();

        let requested = bus.read8(IF_ADDR);
        bus.write8(IF_ADDR, requested & !source.bits());
        log::trace!("dispatch {:?} -> {:04X}", source, self.regs.pc);
    }
}
