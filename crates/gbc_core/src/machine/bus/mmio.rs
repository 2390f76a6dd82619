use super::{GameBoyBus, VRAM_BANK_SIZE};
use crate::cpu::Interrupts;
use crate::machine::ppu;
use crate::machine::serial::{SB, SC};
use crate::machine::timer::{DIV, TAC};

const JOYP: u16 = 0xFF00;
const IF: u16 = 0xFF0F;
const KEY1: u16 = 0xFF4D;
const VBK: u16 = 0xFF4F;

impl GameBoyBus {
    fn vram_index(&self, addr: u16) -> usize {
        usize::from(self.vram_bank) * VRAM_BANK_SIZE + usize::from(addr - 0x8000)
    }

    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            // Cartridge ROM, bank 0 and the switchable bank.
            0x0000..=0x7FFF => self
                .cartridge
                .as_ref()
                .map_or(0xFF, |cart| cart.read_rom(addr)),
            0x8000..=0x9FFF => self.vram[self.vram_index(addr)],
            // External RAM behind the bank controller.
            0xA000..=0xBFFF => self
                .cartridge
                .as_ref()
                .map_or(0xFF, |cart| cart.read_ram(addr)),
            0xC000..=0xDFFF => self.wram[usize::from(addr - 0xC000)],
            // Echo RAM mirrors C000-DDFF.
            0xE000..=0xFDFF => self.wram[usize::from(addr - 0x2000 - 0xC000)],
            // OAM is blocked while DMA owns it.
            0xFE00..=0xFE9F if self.ppu.dma.is_active() => 0xFF,
            0xFE00..=0xFE9F => self.oam[usize::from(addr - 0xFE00)],
            // Unusable.
            0xFEA0..=0xFEFF => 0x00,
            0xFF00..=0xFF7F => self.read_io(addr),
            0xFF80..=0xFFFE => self.hram[usize::from(addr - 0xFF80)],
            0xFFFF => self.interrupt_enable,
        }
    }

    fn read_io(&self, addr: u16) -> u8 {
        match addr {
            JOYP => self.joypad.read(),
            SB | SC => self.serial.read(addr),
            DIV..=TAC => self.timer.read(addr),
            // Bits 5-7 are unused and read as 1.
            IF => 0xE0 | self.interrupt_flag.bits(),
            ppu::LCDC..=ppu::WX => self.ppu.read_register(addr),
            KEY1 if self.model.is_cgb() => 0x7E | self.key1,
            VBK if self.model.is_cgb() => 0xFE | self.vram_bank,
            _ => self.io[usize::from(addr - 0xFF00)],
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // Bank controller registers.
            0x0000..=0x7FFF => {
                if let Some(cart) = self.cartridge.as_mut() {
                    if let Err(err) = cart.write_control(addr, value) {
                        log::warn!("ignored write {value:#04X} to {addr:#06X}: {err}");
                    }
                }
            }
            0x8000..=0x9FFF => {
                let index = self.vram_index(addr);
                self.vram[index] = value;
            }
            0xA000..=0xBFFF => {
                if let Some(cart) = self.cartridge.as_mut() {
                    cart.write_ram(addr, value);
                }
            }
            0xC000..=0xDFFF => self.wram[usize::from(addr - 0xC000)] = value,
            0xE000..=0xFDFF => self.wram[usize::from(addr - 0x2000 - 0xC000)] = value,
            0xFE00..=0xFE9F => {
                if !self.ppu.dma.is_active() {
                    self.oam[usize::from(addr - 0xFE00)] = value;
                }
            }
            0xFEA0..=0xFEFF => {}
            0xFF00..=0xFF7F => self.write_io(addr, value),
            0xFF80..=0xFFFE => self.hram[usize::from(addr - 0xFF80)] = value,
            0xFFFF => self.interrupt_enable = value,
        }
    }

    fn write_io(&mut self, addr: u16, value: u8) {
        match addr {
            JOYP => self.joypad.write(value),
            SB | SC => self.serial.write(addr, value, &mut self.interrupt_flag),
            // Any DIV write resets the divider.
            DIV..=TAC => self.timer.write(addr, value),
            IF => self.interrupt_flag = Interrupts::from_bits_truncate(value),
            // LCD registers, including the DMA trigger at FF46.
            ppu::LCDC..=ppu::WX => self.ppu.write_register(addr, value),
            // Only the prepare bit is writable.
            KEY1 if self.model.is_cgb() => self.key1 = (self.key1 & 0x80) | (value & 0x01),
            VBK if self.model.is_cgb() => self.vram_bank = value & 0x01,
            _ => self.io[usize::from(addr - 0xFF00)] = value,
        }
    }
}
