#![allow(dead_code)]

use gbc_core::machine::{header_checksum, BOOT_LOGO};
use gbc_core::{EngineConfig, GameBoy};
use once_cell::sync::OnceCell;

/// Address the entry point jumps to; test programs start here.
pub const PROGRAM_START: u16 = 0x0150;

static IDLE_LOOP: OnceCell<Vec<u8>> = OnceCell::new();

/// `JR -2`
pub fn idle_loop_program() -> &'static [u8] {
    &[0x18, 0xFE]
}

/// ROM whose program spins on `JR -2` forever.
pub fn idle_loop() -> &'static [u8] {
    IDLE_LOOP.get_or_init(|| rom_with_program(idle_loop_program()))
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 32 KiB ROM-only image with a valid header. The entry point at 0x0100
/// jumps to `program` at 0x0150.
pub fn build_rom(program: &[u8], cgb_flag: u8) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    // NOP; JP 0x0150
    rom[0x0100..0x0104].copy_from_slice(&[0x00, 0xC3, 0x50, 0x01]);
    rom[0x0104..0x0134].copy_from_slice(&BOOT_LOGO);
    rom[0x0134..0x013C].copy_from_slice(b"GBC TEST");
    rom[0x0143] = cgb_flag;
    rom[0x0147] = 0x00;
    rom[0x0148] = 0x00;
    rom[0x0149] = 0x00;
    rom[0x014D] = header_checksum(&rom);

    let start = PROGRAM_START as usize;
    rom[start..start + program.len()].copy_from_slice(program);
    rom
}

pub fn rom_with_program(program: &[u8]) -> Vec<u8> {
    build_rom(program, 0x00)
}

/// Engine with `rom` inserted, stopped at the first program instruction.
pub fn boot(rom: &[u8], config: EngineConfig) -> GameBoy {
    init_logger();
    let mut gb = GameBoy::new(config);
    gb.load_rom(rom).expect("test ROM should load");
    // NOP, JP
    for _ in 0..2 {
        gb.step().expect("entry point should execute");
    }
    assert_eq!(gb.cpu.regs.pc, PROGRAM_START);
    gb
}
