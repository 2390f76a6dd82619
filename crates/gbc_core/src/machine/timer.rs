//! Timer / divider unit (FF04-FF07).
//!
//! Time is counted in dots. The 16-bit divider runs freely and DIV exposes
//! its high byte; TIMA counts at one of four rates while TAC bit 2 is set.

use crate::cpu::Interrupts;

pub(crate) const DIV: u16 = 0xFF04;
pub(crate) const TIMA: u16 = 0xFF05;
pub(crate) const TMA: u16 = 0xFF06;
pub(crate) const TAC: u16 = 0xFF07;

/// Dots per TIMA increment, indexed by TAC[1:0].
const TIMA_PERIODS: [u32; 4] = [1024, 16, 64, 256];

#[derive(Debug, Clone, Default)]
pub(crate) struct Timer {
    div: u16,
    tima: u8,
    tma: u8,
    tac: u8,
    /// Dots accumulated towards the next TIMA increment.
    tima_ticks: u32,
}

impl Timer {
    /// State at PC=0x0100 after the boot ROM: DIV reads 0xAB.
    pub(crate) fn power_on() -> Self {
        Timer {
            div: 0xAB00,
            ..Timer::default()
        }
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    #[inline]
    fn period(&self) -> u32 {
        TIMA_PERIODS[(self.tac & 0x03) as usize]
    }

    pub(crate) fn tick(&mut self, dots: u32, interrupts: &mut Interrupts) {
        self.div = self.div.wrapping_add(dots as u16);
        if !self.enabled() {
            return;
        }

        self.tima_ticks += dots;
        let period = self.period();
        while self.tima_ticks >= period {
            self.tima_ticks -= period;
            self.increment_tima(interrupts);
        }
    }

    fn increment_tima(&mut self, interrupts: &mut Interrupts) {
        let (next, overflow) = self.tima.overflowing_add(1);
        if overflow {
            self.tima = self.tma;
            interrupts.insert(Interrupts::TIMER);
            log::trace!("TIMA overflow, reload {:02X}", self.tma);
        } else {
            self.tima = next;
        }
    }

    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            DIV => (self.div >> 8) as u8,
            TIMA => self.tima,
            TMA => self.tma,
            // Upper five bits are unused and read as 1.
            TAC => self.tac | 0xF8,
            _ => 0xFF,
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            DIV => {
                self.div = 0;
                self.tima_ticks = 0;
            }
            TIMA => self.tima = value,
            TMA => self.tma = value,
            TAC => self.tac = value & 0x07,
            _ => {}
        }
    }
}
