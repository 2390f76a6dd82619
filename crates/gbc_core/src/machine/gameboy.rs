use gbc_common::key::Key;

use super::bus::JoypadButton;
use super::cartridge::Cartridge;
use super::{GameBoyBus, GameBoyModel};
use crate::config::EngineConfig;
use crate::cpu::Cpu;
use crate::error::{CoreError, CpuError};

/// Machine cycles in one 154-line frame (70224 dots).
pub const MCYCLES_PER_FRAME: u32 = 17_556;

/// The emulated console: CPU plus the bus that owns everything else.
///
/// Each `GameBoy` is fully independent; nothing is shared between
/// instances.
pub struct GameBoy {
    pub cpu: Cpu,
    pub(crate) bus: GameBoyBus,
    config: EngineConfig,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GameBoy {
    pub fn new(config: EngineConfig) -> Self {
        let model = config.model.resolve(0);
        Self {
            cpu: Cpu::new(model),
            bus: GameBoyBus::new(model, &config),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn model(&self) -> GameBoyModel {
        self.bus.model()
    }

    pub fn bus(&self) -> &GameBoyBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut GameBoyBus {
        &mut self.bus
    }

    /// Validate `rom` and power the machine on with it inserted.
    ///
    /// On error the machine is left exactly as it was.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), CoreError> {
        let cartridge = Cartridge::from_bytes(rom, self.config.verify_header)?;
        let header = cartridge.header();
        let model = self.config.model.resolve(header.cgb_flag);
        log::info!(
            "loaded \"{}\": type {:#04X} ({:?}), {} ROM banks, {} RAM banks, {:?}",
            header.title,
            header.cartridge_type,
            cartridge.mbc().kind(),
            header.rom_banks().unwrap_or_default(),
            header.ram_banks().unwrap_or_default(),
            model,
        );

        self.cpu = Cpu::new(model);
        self.bus = GameBoyBus::new(model, &self.config);
        self.bus.load_cartridge(cartridge);
        Ok(())
    }

    /// Power-cycle, keeping the inserted cartridge.
    pub fn reset(&mut self) {
        let model = self.bus.model();
        let cartridge = self.bus.cartridge().cloned();
        self.cpu = Cpu::new(model);
        self.bus = GameBoyBus::new(model, &self.config);
        if let Some(cartridge) = cartridge {
            self.bus.load_cartridge(cartridge);
        }
    }

    /// Run one CPU step (with its peripheral ticks) and return the machine
    /// cycles it took.
    pub fn step(&mut self) -> Result<u32, CpuError> {
        self.cpu.step(&mut self.bus)
    }

    /// Run until the PPU finishes a frame.
    ///
    /// With the LCD off no VBlank arrives, so this stops after one frame's
    /// worth of cycles instead.
    pub fn step_frame(&mut self) -> Result<(), CpuError> {
        let start = self.bus.ppu.frame();
        let mut cycles = 0u32;
        while self.bus.ppu.frame() == start && cycles < MCYCLES_PER_FRAME * 2 {
            cycles += self.step()?;
            if !self.bus.ppu.lcd_enabled() && cycles >= MCYCLES_PER_FRAME {
                break;
            }
        }
        Ok(())
    }

    /// Frames completed so far.
    pub fn frame_count(&self) -> u64 {
        self.bus.ppu.frame()
    }

    /// 160x144 pixels, packed `0xAARRGGBB`.
    pub fn frame_buffer(&self) -> &[u32] {
        self.bus.ppu.frame_buffer()
    }

    /// Copy the frame into an RGB24 buffer of `160 * 144 * 3` bytes.
    pub fn video_frame(&self, buffer: &mut [u8]) {
        for (dst, &pixel) in buffer.chunks_exact_mut(3).zip(self.frame_buffer()) {
            let [_, r, g, b] = pixel.to_be_bytes();
            dst.copy_from_slice(&[r, g, b]);
        }
    }

    pub fn serial_output(&self) -> &[u8] {
        self.bus.serial_output()
    }

    /// Map a front-end key onto the joypad:
    /// arrows are the d-pad, Z => A, X => B, Backspace => Select,
    /// Enter => Start.
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        let button = match key {
            Key::Right => JoypadButton::Right,
            Key::Left => JoypadButton::Left,
            Key::Up => JoypadButton::Up,
            Key::Down => JoypadButton::Down,
            Key::Z => JoypadButton::A,
            Key::X => JoypadButton::B,
            Key::Backspace => JoypadButton::Select,
            Key::Enter => JoypadButton::Start,
            _ => return,
        };
        self.bus.set_button(button, pressed);
    }
}
