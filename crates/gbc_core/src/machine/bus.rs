mod init;
mod joypad;
mod mmio;

pub use joypad::JoypadButton;

use joypad::Joypad;

use super::cartridge::Cartridge;
use super::ppu::Ppu;
use super::serial::Serial;
use super::timer::Timer;
use super::GameBoyModel;
use crate::config::EngineConfig;
use crate::cpu::{Bus, Interrupts};
use crate::DOTS_PER_MCYCLE;

pub(crate) const VRAM_BANK_SIZE: usize = 0x2000;
pub(crate) const WRAM_SIZE: usize = 0x2000;
pub(crate) const OAM_SIZE: usize = 0xA0;
pub(crate) const HRAM_SIZE: usize = 0x80;
pub(crate) const IO_SIZE: usize = 0x80;

/// System bus: owns every memory region and peripheral the CPU can reach.
#[derive(Debug, Clone)]
pub struct GameBoyBus {
    model: GameBoyModel,
    cartridge: Option<Cartridge>,
    /// One 8 KiB bank on DMG, two on CGB.
    vram: Vec<u8>,
    vram_bank: u8,
    wram: Box<[u8; WRAM_SIZE]>,
    oam: [u8; OAM_SIZE],
    hram: [u8; HRAM_SIZE],
    /// Plain storage for I/O registers without side effects.
    io: [u8; IO_SIZE],
    interrupt_flag: Interrupts,
    interrupt_enable: u8,
    /// CGB speed switch register (FF4D).
    key1: u8,
    timer: Timer,
    pub(crate) ppu: Ppu,
    serial: Serial,
    joypad: Joypad,
}

impl Default for GameBoyBus {
    fn default() -> Self {
        Self::new(GameBoyModel::Dmg, &EngineConfig::default())
    }
}

impl GameBoyBus {
    pub fn new(model: GameBoyModel, config: &EngineConfig) -> Self {
        let vram_banks = if model.is_cgb() { 2 } else { 1 };
        let palette = config.palette.map(|color| color.to_argb());
        let mut bus = Self {
            model,
            cartridge: None,
            vram: vec![0; VRAM_BANK_SIZE * vram_banks],
            vram_bank: 0,
            wram: Box::new([0; WRAM_SIZE]),
            oam: [0; OAM_SIZE],
            hram: [0; HRAM_SIZE],
            io: [0; IO_SIZE],
            interrupt_flag: Interrupts::empty(),
            interrupt_enable: 0,
            key1: 0,
            timer: Timer::power_on(),
            ppu: Ppu::power_on(palette),
            serial: Serial::power_on(),
            joypad: Joypad::default(),
        };
        bus.apply_power_on_io();
        if config.randomize_ram {
            bus.randomize_internal_ram(config.ram_seed);
        }
        bus
    }

    pub fn model(&self) -> GameBoyModel {
        self.model
    }

    pub fn load_cartridge(&mut self, cartridge: Cartridge) {
        self.cartridge = Some(cartridge);
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    pub fn oam(&self) -> &[u8] {
        &self.oam
    }

    pub fn serial_output(&self) -> &[u8] {
        self.serial.output()
    }

    pub fn interrupt_flag(&self) -> Interrupts {
        self.interrupt_flag
    }

    pub fn request_interrupt(&mut self, source: Interrupts) {
        self.interrupt_flag.insert(source);
    }

    /// Front-end input path. A fresh press requests the joypad interrupt.
    pub fn set_button(&mut self, button: JoypadButton, pressed: bool) {
        if self.joypad.set(button, pressed) {
            self.interrupt_flag.insert(Interrupts::JOYPAD);
        }
    }

    /// Advance DMA and the PPU by one dot.
    pub(crate) fn tick_dot(&mut self) {
        if let Some((source, index)) = self.ppu.dma.tick() {
            let byte = self.read(source);
            self.oam[index] = byte;
        }
        self.ppu.tick(
            &self.vram[..VRAM_BANK_SIZE],
            &self.oam,
            &mut self.interrupt_flag,
        );
    }

    /// Advance timer, DMA and PPU by `dots`.
    pub(crate) fn tick_dots(&mut self, dots: u32) {
        self.timer.tick(dots, &mut self.interrupt_flag);
        for _ in 0..dots {
            self.tick_dot();
        }
    }
}

impl Bus for GameBoyBus {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        self.write(addr, value)
    }

    fn tick(&mut self, cycles: u32) {
        self.tick_dots(cycles * DOTS_PER_MCYCLE);
    }

    fn speed_switch(&mut self) -> bool {
        if !self.model.is_cgb() || self.key1 & 0x01 == 0 {
            return false;
        }
        self.key1 = (self.key1 & 0x80) ^ 0x80;
        true
    }
}
