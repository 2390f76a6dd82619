use super::*;

struct TestBus {
    memory: [u8; 0x10000],
    ticked: u32,
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
            ticked: 0,
        }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }

    fn tick(&mut self, cycles: u32) {
        self.ticked += cycles;
    }
}

/// CPU at the post-boot PC with `program` placed at 0x0100.
fn setup(program: &[u8]) -> (Cpu, TestBus) {
    let mut bus = TestBus::default();
    bus.memory[0x0100..0x0100 + program.len()].copy_from_slice(program);
    let mut cpu = Cpu::default();
    cpu.regs.f = Flags::empty();
    (cpu, bus)
}

fn step(cpu: &mut Cpu, bus: &mut TestBus) -> u32 {
    cpu.step(bus).expect("instruction should be supported")
}

#[test]
fn register_pairs_round_trip_in_big_endian_order() {
    let mut regs = Registers::default();
    for value in [0x0000u16, 0x00FF, 0x1234, 0xABCD, 0xFF00, 0xFFFF] {
        regs.set(Reg::BC, value);
        regs.set(Reg::DE, value);
        regs.set(Reg::HL, value);
        assert_eq!(regs.get(Reg::BC), value);
        assert_eq!(regs.get(Reg::DE), value);
        assert_eq!(regs.get(Reg::HL), value);
        assert_eq!(u16::from_be_bytes([regs.b, regs.c]), value);
        assert_eq!(u16::from_be_bytes([regs.d, regs.e]), value);
        assert_eq!(u16::from_be_bytes([regs.h, regs.l]), value);

        regs.set(Reg::AF, value);
        assert_eq!(regs.get(Reg::AF), value & 0xFFF0);
        assert_eq!(regs.a, (value >> 8) as u8);
    }
}

#[test]
fn eight_bit_selectors_touch_only_their_register() {
    let mut regs = Registers::default();
    regs.set(Reg::H, 0x12);
    regs.set(Reg::L, 0x34);
    assert_eq!(regs.hl(), 0x1234);
    assert_eq!(regs.get(Reg::H), 0x12);

    regs.set(Reg::F, 0xFF);
    assert_eq!(regs.f.bits(), 0xF0);
    assert!(regs.byte_mut(Reg::F).is_none());
    assert!(regs.byte_mut(Reg::HL).is_none());
    if let Some(a) = regs.byte_mut(Reg::A) {
        *a = 0x99;
    }
    assert_eq!(regs.a, 0x99);
}

#[test]
fn power_on_registers_match_boot_rom_handoff() {
    let dmg = Registers::power_on(GameBoyModel::Dmg);
    assert_eq!(
        (dmg.af(), dmg.bc(), dmg.de(), dmg.hl(), dmg.sp, dmg.pc),
        (0x01B0, 0x0013, 0x00D8, 0x014D, 0xFFFE, 0x0100)
    );
    let cgb = Registers::power_on(GameBoyModel::Cgb);
    assert_eq!(cgb.af(), 0x1180);
    assert_eq!(cgb.de(), 0xFF56);
}

#[test]
fn add_sets_flags_for_every_byte_pair() {
    let mut cpu = Cpu::default();
    for a in 0..=255u8 {
        for b in 0..=255u8 {
            cpu.regs.a = a;
            cpu.regs.f = Flags::empty();
            cpu.alu(AluOp::Add, b);

            let sum = u16::from(a) + u16::from(b);
            assert_eq!(cpu.regs.a, sum as u8);
            assert_eq!(cpu.flag(Flags::ZERO), sum & 0xFF == 0, "{a:02X}+{b:02X}");
            assert_eq!(cpu.flag(Flags::CARRY), sum > 0xFF, "{a:02X}+{b:02X}");
            assert_eq!(
                cpu.flag(Flags::HALF_CARRY),
                (a & 0x0F) + (b & 0x0F) > 0x0F,
                "{a:02X}+{b:02X}"
            );
            assert!(!cpu.flag(Flags::SUBTRACT));
        }
    }
}

#[test]
fn sub_sets_flags_for_every_byte_pair() {
    let mut cpu = Cpu::default();
    for a in 0..=255u8 {
        for b in 0..=255u8 {
            cpu.regs.a = a;
            cpu.regs.f = Flags::empty();
            cpu.alu(AluOp::Sub, b);

            assert_eq!(cpu.regs.a, a.wrapping_sub(b));
            assert_eq!(cpu.flag(Flags::ZERO), a == b);
            assert_eq!(cpu.flag(Flags::CARRY), a < b);
            assert_eq!(cpu.flag(Flags::HALF_CARRY), (a & 0x0F) < (b & 0x0F));
            assert!(cpu.flag(Flags::SUBTRACT));
        }
    }
}

#[test]
fn adc_and_sbc_include_carry() {
    let mut cpu = Cpu::default();
    cpu.regs.a = 0x0F;
    cpu.regs.f = Flags::CARRY;
    cpu.alu(AluOp::Adc, 0x00);
    assert_eq!(cpu.regs.a, 0x10);
    assert!(cpu.flag(Flags::HALF_CARRY));
    assert!(!cpu.flag(Flags::CARRY));

    cpu.regs.a = 0x00;
    cpu.regs.f = Flags::CARRY;
    cpu.alu(AluOp::Sbc, 0x00);
    assert_eq!(cpu.regs.a, 0xFF);
    assert!(cpu.flag(Flags::CARRY));
    assert!(cpu.flag(Flags::HALF_CARRY));
}

#[test]
fn cp_leaves_accumulator_alone() {
    let mut cpu = Cpu::default();
    cpu.regs.a = 0x42;
    cpu.alu(AluOp::Cp, 0x42);
    assert_eq!(cpu.regs.a, 0x42);
    assert!(cpu.flag(Flags::ZERO));
    assert!(cpu.flag(Flags::SUBTRACT));
}

#[test]
fn nop_advances_pc_and_ticks_bus() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    assert_eq!(step(&mut cpu, &mut bus), 1);
    assert_eq!(cpu.regs.pc, 0x0101);
    assert_eq!(bus.ticked, 1);
}

#[test]
fn conditional_jr_costs_two_not_taken_and_three_taken() {
    // JR NZ,+5
    let (mut cpu, mut bus) = setup(&[0x20, 0x05]);
    cpu.regs.f = Flags::ZERO;
    assert_eq!(step(&mut cpu, &mut bus), 2);
    assert_eq!(cpu.regs.pc, 0x0102);

    let (mut cpu, mut bus) = setup(&[0x20, 0x05]);
    assert_eq!(step(&mut cpu, &mut bus), 3);
    assert_eq!(cpu.regs.pc, 0x0107);

    // JR -2 loops on itself.
    let (mut cpu, mut bus) = setup(&[0x18, 0xFE]);
    assert_eq!(step(&mut cpu, &mut bus), 3);
    assert_eq!(cpu.regs.pc, 0x0100);
}

#[test]
fn conditional_jp_call_ret_timing() {
    // JP NZ,0x2000
    let (mut cpu, mut bus) = setup(&[0xC2, 0x00, 0x20]);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x2000);
    let (mut cpu, mut bus) = setup(&[0xC2, 0x00, 0x20]);
    cpu.regs.f = Flags::ZERO;
    assert_eq!(step(&mut cpu, &mut bus), 3);
    assert_eq!(cpu.regs.pc, 0x0103);

    // CALL C,0x2000
    let (mut cpu, mut bus) = setup(&[0xDC, 0x00, 0x20]);
    cpu.regs.f = Flags::CARRY;
    assert_eq!(step(&mut cpu, &mut bus), 6);
    assert_eq!(cpu.regs.pc, 0x2000);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.memory[0xFFFC], 0x03);
    assert_eq!(bus.memory[0xFFFD], 0x01);
    let (mut cpu, mut bus) = setup(&[0xDC, 0x00, 0x20]);
    assert_eq!(step(&mut cpu, &mut bus), 3);
    assert_eq!(cpu.regs.sp, 0xFFFE);

    // RET Z
    let (mut cpu, mut bus) = setup(&[0xC8]);
    cpu.regs.sp = 0xFFFC;
    bus.memory[0xFFFC] = 0x34;
    bus.memory[0xFFFD] = 0x12;
    cpu.regs.f = Flags::ZERO;
    assert_eq!(step(&mut cpu, &mut bus), 5);
    assert_eq!(cpu.regs.pc, 0x1234);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    let (mut cpu, mut bus) = setup(&[0xC8]);
    assert_eq!(step(&mut cpu, &mut bus), 2);
    assert_eq!(cpu.regs.pc, 0x0101);
}

#[test]
fn not_taken_branches_are_always_cheaper() {
    for (opcode, instr) in OPCODES.iter().enumerate() {
        if instr.is_conditional() {
            assert!(
                instr.cycles < instr.branch_cycles,
                "opcode {opcode:02X} has {} / {}",
                instr.cycles,
                instr.branch_cycles
            );
        }
    }
}

#[test]
fn push_then_pop_restores_value_and_sp() {
    for value in [0x0000u16, 0x1234, 0x8001, 0xFFFF] {
        // PUSH BC; POP DE
        let (mut cpu, mut bus) = setup(&[0xC5, 0xD1]);
        cpu.regs.set_bc(value);
        assert_eq!(step(&mut cpu, &mut bus), 4);
        assert_eq!(cpu.regs.sp, 0xFFFC);
        assert_eq!(step(&mut cpu, &mut bus), 3);
        assert_eq!(cpu.regs.de(), value);
        assert_eq!(cpu.regs.sp, 0xFFFE);
    }
}

#[test]
fn pop_af_masks_low_flag_bits() {
    let (mut cpu, mut bus) = setup(&[0xF1]);
    cpu.regs.sp = 0xC000;
    bus.memory[0xC000] = 0xFF;
    bus.memory[0xC001] = 0x12;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(cpu.regs.f.bits(), 0xF0);
}

#[test]
fn ei_takes_effect_after_the_following_instruction() {
    let (mut cpu, mut bus) = setup(&[0xFB, 0x00, 0x00]);
    bus.memory[0xFFFF] = 0x01;
    bus.memory[0xFF0F] = 0x01;

    step(&mut cpu, &mut bus);
    assert!(!cpu.ime);
    step(&mut cpu, &mut bus);
    assert!(cpu.ime);
    assert_eq!(cpu.regs.pc, 0x0102, "instruction after EI must run first");

    assert_eq!(step(&mut cpu, &mut bus), INTERRUPT_CYCLES);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert!(!cpu.ime);
    assert_eq!(bus.memory[0xFF0F] & 0x01, 0);
    assert_eq!(bus.memory[0xFFFC], 0x02);
    assert_eq!(bus.memory[0xFFFD], 0x01);
}

#[test]
fn di_cancels_pending_ei() {
    let (mut cpu, mut bus) = setup(&[0xFB, 0xF3, 0x00]);
    for _ in 0..3 {
        step(&mut cpu, &mut bus);
    }
    assert!(!cpu.ime);
}

#[test]
fn interrupts_dispatch_in_priority_order() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    cpu.ime = true;
    bus.memory[0xFFFF] = 0x1F;
    bus.memory[0xFF0F] = (Interrupts::TIMER | Interrupts::JOYPAD).bits();

    assert_eq!(step(&mut cpu, &mut bus), INTERRUPT_CYCLES);
    assert_eq!(cpu.regs.pc, 0x0050);
    assert_eq!(bus.memory[0xFF0F], Interrupts::JOYPAD.bits());
}

#[test]
fn interrupt_vectors_follow_bit_index() {
    let sources = [
        Interrupts::VBLANK,
        Interrupts::LCD_STAT,
        Interrupts::TIMER,
        Interrupts::SERIAL,
        Interrupts::JOYPAD,
    ];
    for (index, source) in sources.into_iter().enumerate() {
        assert_eq!(source.vector(), 0x40 + 8 * index as u16);
    }
    assert_eq!(Interrupts::all().highest(), Some(Interrupts::VBLANK));
    assert_eq!(Interrupts::empty().highest(), None);
}

#[test]
fn disabled_interrupts_are_not_dispatched() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    cpu.ime = true;
    bus.memory[0xFF0F] = 0x1F;
    bus.memory[0xFFFF] = 0x00;
    assert_eq!(step(&mut cpu, &mut bus), 1);
    assert_eq!(cpu.regs.pc, 0x0101);
}

#[test]
fn halt_idles_until_an_enabled_interrupt_is_pending() {
    let (mut cpu, mut bus) = setup(&[0x76, 0x00]);
    assert_eq!(step(&mut cpu, &mut bus), 1);
    assert!(cpu.halted);

    for _ in 0..10 {
        assert_eq!(step(&mut cpu, &mut bus), 1);
        assert!(cpu.halted);
        assert_eq!(cpu.regs.pc, 0x0101);
    }

    // Requested but not enabled: still halted.
    bus.memory[0xFF0F] = 0x04;
    step(&mut cpu, &mut bus);
    assert!(cpu.halted);

    // With IME clear the CPU just resumes.
    bus.memory[0xFFFF] = 0x04;
    step(&mut cpu, &mut bus);
    assert!(!cpu.halted);
    assert_eq!(cpu.regs.pc, 0x0102);
}

#[test]
fn halt_with_ime_services_the_interrupt() {
    let (mut cpu, mut bus) = setup(&[0x76, 0x00]);
    cpu.ime = true;
    step(&mut cpu, &mut bus);
    bus.memory[0xFFFF] = 0x04;
    bus.memory[0xFF0F] = 0x04;
    assert_eq!(step(&mut cpu, &mut bus), INTERRUPT_CYCLES);
    assert!(!cpu.halted);
    assert_eq!(cpu.regs.pc, 0x0050);
    assert_eq!(bus.memory[0xFFFC], 0x01);
    assert_eq!(bus.memory[0xFFFD], 0x01);
}

#[test]
fn unsupported_opcode_locks_the_cpu() {
    let (mut cpu, mut bus) = setup(&[0xD3]);
    let expected = CpuError::UnsupportedOpcode {
        opcode: 0xD3,
        pc: 0x0100,
    };
    assert_eq!(cpu.step(&mut bus), Err(expected));
    assert_eq!(cpu.step(&mut bus), Err(expected));
    assert_eq!(cpu.locked(), Some(expected));
    assert_eq!(bus.ticked, 0);
}

#[test]
fn only_the_documented_holes_are_invalid() {
    let holes = [
        0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
    ];
    for (opcode, instr) in OPCODES.iter().enumerate() {
        assert_eq!(
            instr.kind == Kind::Invalid,
            holes.contains(&(opcode as u8)),
            "opcode {opcode:02X}"
        );
    }
    assert!(CB_OPCODES.iter().all(|instr| instr.kind != Kind::Invalid));
}

#[test]
fn table_lengths_and_cycles_match_the_timing_table() {
    assert_eq!(OPCODES[0x01].length, 3);
    assert_eq!(OPCODES[0x10].length, 2);
    assert_eq!(OPCODES[0xE0].length, 2);
    assert_eq!(OPCODES[0xEA].length, 3);
    assert_eq!(OPCODES[0x7E].length, 1);
    assert!(CB_OPCODES.iter().all(|instr| instr.length == 2));

    assert_eq!((OPCODES[0x20].cycles, OPCODES[0x20].branch_cycles), (2, 3));
    assert_eq!((OPCODES[0xC2].cycles, OPCODES[0xC2].branch_cycles), (3, 4));
    assert_eq!((OPCODES[0xC4].cycles, OPCODES[0xC4].branch_cycles), (3, 6));
    assert_eq!((OPCODES[0xC0].cycles, OPCODES[0xC0].branch_cycles), (2, 5));
    assert_eq!(OPCODES[0xE9].cycles, 1);
    assert_eq!(OPCODES[0xFF].cycles, 4);
    assert_eq!(OPCODES[0xFF].param, 0x38);
    assert_eq!(CB_OPCODES[0x00].cycles, 2);
    assert_eq!(CB_OPCODES[0x46].cycles, 3);
    assert_eq!(CB_OPCODES[0x86].cycles, 4);
    assert_eq!(CB_OPCODES[0x7E].param, 7);
}

#[test]
fn daa_corrects_after_addition_and_subtraction() {
    // LD A,0x15; ADD A,0x27; DAA
    let (mut cpu, mut bus) = setup(&[0x3E, 0x15, 0xC6, 0x27, 0x27]);
    for _ in 0..3 {
        step(&mut cpu, &mut bus);
    }
    assert_eq!(cpu.regs.a, 0x42);
    assert!(!cpu.flag(Flags::CARRY));

    // LD A,0x42; SUB 0x15; DAA
    let (mut cpu, mut bus) = setup(&[0x3E, 0x42, 0xD6, 0x15, 0x27]);
    for _ in 0..3 {
        step(&mut cpu, &mut bus);
    }
    assert_eq!(cpu.regs.a, 0x27);
    assert!(cpu.flag(Flags::SUBTRACT));

    // LD A,0x99; ADD A,0x01; DAA -> 0x00 with carry
    let (mut cpu, mut bus) = setup(&[0x3E, 0x99, 0xC6, 0x01, 0x27]);
    for _ in 0..3 {
        step(&mut cpu, &mut bus);
    }
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.flag(Flags::ZERO));
    assert!(cpu.flag(Flags::CARRY));
}

#[test]
fn cpl_scf_ccf_flag_bits() {
    let (mut cpu, mut bus) = setup(&[0x2F, 0x37, 0x3F]);
    cpu.regs.a = 0x0F;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0xF0);
    assert!(cpu.flag(Flags::SUBTRACT) && cpu.flag(Flags::HALF_CARRY));
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.f, Flags::CARRY);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.f, Flags::empty());
}

#[test]
fn inc_dec_on_bytes_update_flags_but_pairs_do_not() {
    // INC (HL)
    let (mut cpu, mut bus) = setup(&[0x34]);
    cpu.regs.set_hl(0xC000);
    cpu.regs.f = Flags::CARRY;
    bus.memory[0xC000] = 0x0F;
    assert_eq!(step(&mut cpu, &mut bus), 3);
    assert_eq!(bus.memory[0xC000], 0x10);
    assert_eq!(cpu.regs.f, Flags::HALF_CARRY | Flags::CARRY);

    // DEC B to zero
    let (mut cpu, mut bus) = setup(&[0x05]);
    cpu.regs.b = 0x01;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.b, 0);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::SUBTRACT);

    // INC BC, DEC SP
    let (mut cpu, mut bus) = setup(&[0x03, 0x3B]);
    cpu.regs.f = Flags::all();
    cpu.regs.set_bc(0xFFFF);
    assert_eq!(step(&mut cpu, &mut bus), 2);
    assert_eq!(cpu.regs.bc(), 0x0000);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.sp, 0xFFFD);
    assert_eq!(cpu.regs.f, Flags::all());
}

#[test]
fn sixteen_bit_arithmetic_flags() {
    // ADD HL,BC keeps Z
    let (mut cpu, mut bus) = setup(&[0x09]);
    cpu.regs.set_hl(0x0FFF);
    cpu.regs.set_bc(0x0001);
    cpu.regs.f = Flags::ZERO;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::HALF_CARRY);

    // LD HL,SP+8
    let (mut cpu, mut bus) = setup(&[0xF8, 0x08]);
    cpu.regs.sp = 0xFFF8;
    assert_eq!(step(&mut cpu, &mut bus), 3);
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert_eq!(cpu.regs.f, Flags::HALF_CARRY | Flags::CARRY);

    // ADD SP,-1
    let (mut cpu, mut bus) = setup(&[0xE8, 0xFF]);
    cpu.regs.sp = 0x0000;
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.sp, 0xFFFF);
    assert_eq!(cpu.regs.f, Flags::empty());
}

#[test]
fn memory_loads_route_through_pending_write_address() {
    // LD (0xC100),SP
    let (mut cpu, mut bus) = setup(&[0x08, 0x00, 0xC1]);
    cpu.regs.sp = 0xBEEF;
    assert_eq!(step(&mut cpu, &mut bus), 5);
    assert_eq!(bus.memory[0xC100], 0xEF);
    assert_eq!(bus.memory[0xC101], 0xBE);
    assert_eq!(cpu.regs.pc, 0x0103);

    // LD (HL+),A; LD A,(HL-)
    let (mut cpu, mut bus) = setup(&[0x22, 0x3A]);
    cpu.regs.set_hl(0xC000);
    cpu.regs.a = 0x42;
    step(&mut cpu, &mut bus);
    assert_eq!(bus.memory[0xC000], 0x42);
    assert_eq!(cpu.regs.hl(), 0xC001);
    bus.memory[0xC001] = 0x77;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x77);
    assert_eq!(cpu.regs.hl(), 0xC000);

    // LDH (0x80),A; LD (C),A
    let (mut cpu, mut bus) = setup(&[0xE0, 0x80, 0xE2]);
    cpu.regs.a = 0x5A;
    cpu.regs.c = 0x81;
    assert_eq!(step(&mut cpu, &mut bus), 3);
    assert_eq!(step(&mut cpu, &mut bus), 2);
    assert_eq!(bus.memory[0xFF80], 0x5A);
    assert_eq!(bus.memory[0xFF81], 0x5A);

    // LD (HL),0x99
    let (mut cpu, mut bus) = setup(&[0x36, 0x99]);
    cpu.regs.set_hl(0xD000);
    assert_eq!(step(&mut cpu, &mut bus), 3);
    assert_eq!(bus.memory[0xD000], 0x99);
}

#[test]
fn rotates_on_a_always_clear_zero() {
    let (mut cpu, mut bus) = setup(&[0x07, 0xCB, 0x00]);
    cpu.regs.a = 0x00;
    cpu.regs.b = 0x00;
    step(&mut cpu, &mut bus);
    assert!(!cpu.flag(Flags::ZERO));
    assert_eq!(step(&mut cpu, &mut bus), 2);
    assert!(cpu.flag(Flags::ZERO));

    // RLA pulls the old carry into bit 0.
    let (mut cpu, mut bus) = setup(&[0x17]);
    cpu.regs.a = 0x80;
    cpu.regs.f = Flags::CARRY;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x01);
    assert_eq!(cpu.regs.f, Flags::CARRY);
}

#[test]
fn prefixed_bit_res_set_and_swap() {
    // SWAP A
    let (mut cpu, mut bus) = setup(&[0xCB, 0x37]);
    cpu.regs.a = 0xF1;
    assert_eq!(step(&mut cpu, &mut bus), 2);
    assert_eq!(cpu.regs.a, 0x1F);
    assert_eq!(cpu.regs.pc, 0x0102);

    // BIT 0,(HL); SET 7,(HL); RES 0,B
    let (mut cpu, mut bus) = setup(&[0xCB, 0x46, 0xCB, 0xFE, 0xCB, 0x80]);
    cpu.regs.set_hl(0xC000);
    cpu.regs.f = Flags::CARRY;
    cpu.regs.b = 0xFF;
    bus.memory[0xC000] = 0x01;
    assert_eq!(step(&mut cpu, &mut bus), 3);
    assert_eq!(cpu.regs.f, Flags::HALF_CARRY | Flags::CARRY);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(bus.memory[0xC000], 0x81);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.b, 0xFE);

    // SRA keeps the sign bit, SRL does not.
    let (mut cpu, mut bus) = setup(&[0xCB, 0x2F, 0xCB, 0x3F]);
    cpu.regs.a = 0x81;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0xC0);
    assert!(cpu.flag(Flags::CARRY));
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x60);
    assert!(!cpu.flag(Flags::CARRY));
}

#[test]
fn rst_and_reti() {
    // RST 0x28
    let (mut cpu, mut bus) = setup(&[0xEF]);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0028);
    assert_eq!(cpu.regs.sp, 0xFFFC);

    let (mut cpu, mut bus) = setup(&[0xD9]);
    cpu.regs.sp = 0xFFFC;
    bus.memory[0xFFFC] = 0x00;
    bus.memory[0xFFFD] = 0x02;
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0200);
    assert!(cpu.ime);
}

#[test]
fn stop_skips_padding_byte() {
    let (mut cpu, mut bus) = setup(&[0x10, 0x00, 0x00]);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc, 0x0102);
}
