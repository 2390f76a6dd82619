use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::GameBoyBus;
use crate::cpu::Interrupts;

impl GameBoyBus {
    /// I/O state the boot ROM leaves behind at PC=0x0100. Timer, serial and
    /// PPU registers are seeded by their own `power_on` constructors.
    pub(super) fn apply_power_on_io(&mut self) {
        // IF has VBlank pending when the boot ROM hands over.
        self.interrupt_flag = Interrupts::VBLANK;
        self.interrupt_enable = 0x00;

        // Sound registers are not emulated but their defaults are visible.
        const SOUND_DEFAULTS: [(u16, u8); 21] = [
            (0xFF10, 0x80),
            (0xFF11, 0xBF),
            (0xFF12, 0xF3),
            (0xFF13, 0xFF),
            (0xFF14, 0xBF),
            (0xFF16, 0x3F),
            (0xFF17, 0x00),
            (0xFF18, 0xFF),
            (0xFF19, 0xBF),
            (0xFF1A, 0x7F),
            (0xFF1B, 0xFF),
            (0xFF1C, 0x9F),
            (0xFF1D, 0xFF),
            (0xFF1E, 0xBF),
            (0xFF20, 0xFF),
            (0xFF21, 0x00),
            (0xFF22, 0x00),
            (0xFF23, 0xBF),
            (0xFF24, 0x77),
            (0xFF25, 0xF3),
            (0xFF26, 0xF1),
        ];
        for (addr, value) in SOUND_DEFAULTS {
            self.io[(addr - 0xFF00) as usize] = value;
        }
    }

    /// WRAM/HRAM hold garbage at power-on. A seeded generator keeps runs
    /// reproducible.
    pub(super) fn randomize_internal_ram(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        rng.fill_bytes(&mut self.wram[..]);
        rng.fill_bytes(&mut self.hram[..]);
    }
}
