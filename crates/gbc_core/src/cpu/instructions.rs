//! Opcode tables.
//!
//! Every opcode maps to an [`Instruction`] descriptor. The execute stage only
//! looks at the descriptor, so timing, operand routing and flag behaviour for
//! a given opcode all come from here plus the per-kind semantics.

use lazy_static::lazy_static;

use super::regs::Reg;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Nop,
    Ld,
    /// Load then increment HL.
    Ldi,
    /// Load then decrement HL.
    Ldd,
    Inc,
    Dec,
    /// 8-bit arithmetic and logic on A.
    Alu(AluOp),
    /// ADD HL,rr.
    AddHl,
    /// ADD SP,e8.
    AddSp,
    /// RLCA/RRCA/RLA/RRA. Same as the CB rotates except Z is always cleared.
    RotateA(ShiftOp),
    Daa,
    Cpl,
    Scf,
    Ccf,
    Jr,
    Jp,
    Call,
    Ret,
    Reti,
    Rst,
    Push,
    Pop,
    Di,
    Ei,
    Halt,
    Stop,
    Prefix,
    Shift(ShiftOp),
    Bit,
    Res,
    Set,
    Invalid,
}

/// Addressing modes. `*ToMem`/`*ToA16`/`*ToIo*`/`Mem` modes produce a pending
/// write address instead of writing during operand resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Implied,
    /// Value of the target register.
    Reg,
    /// Target register receives the source register.
    RegToReg,
    D8,
    D16,
    D8ToReg,
    D16ToReg,
    /// Target register receives the byte at the address in the source pair.
    MemToReg,
    /// Byte at the address in the target pair receives the source register.
    RegToMem,
    D8ToMem,
    A16ToReg,
    RegToA16,
    IoA8ToReg,
    RegToIoA8,
    IoCToReg,
    RegToIoC,
    /// Read-modify-write of the byte at the address in the target pair.
    Mem,
    /// LD HL,SP+e8.
    SpD8ToReg,
    /// Fixed parameter carried by the descriptor (restart vector).
    Param,
}

impl Mode {
    /// Immediate bytes that follow the opcode.
    pub const fn operand_len(self) -> u8 {
        match self {
            Mode::D8
            | Mode::D8ToReg
            | Mode::D8ToMem
            | Mode::IoA8ToReg
            | Mode::RegToIoA8
            | Mode::SpD8ToReg => 1,
            Mode::D16 | Mode::D16ToReg | Mode::A16ToReg | Mode::RegToA16 => 2,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    Always,
    NotZero,
    Zero,
    NotCarry,
    Carry,
}

/// Static description of one opcode. Cycle counts are machine cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub kind: Kind,
    pub mode: Mode,
    pub target: Reg,
    pub source: Reg,
    pub cond: Cond,
    /// Bit index for BIT/RES/SET, vector for RST.
    pub param: u8,
    /// Total encoded length, including the 0xCB prefix byte.
    pub length: u8,
    pub cycles: u8,
    /// Cost when a conditional branch is taken.
    pub branch_cycles: u8,
}

impl Instruction {
    fn new(kind: Kind, mode: Mode) -> Self {
        Instruction {
            kind,
            mode,
            target: Reg::None,
            source: Reg::None,
            cond: Cond::Always,
            param: 0,
            length: 1 + mode.operand_len(),
            cycles: 1,
            branch_cycles: 1,
        }
    }

    fn target(mut self, reg: Reg) -> Self {
        self.target = reg;
        self
    }

    fn source(mut self, reg: Reg) -> Self {
        self.source = reg;
        self
    }

    fn cond(mut self, cond: Cond) -> Self {
        self.cond = cond;
        self
    }

    fn param(mut self, param: u8) -> Self {
        self.param = param;
        self
    }

    fn length(mut self, length: u8) -> Self {
        self.length = length;
        self
    }

    fn cycles(mut self, cycles: u8) -> Self {
        self.cycles = cycles;
        self.branch_cycles = cycles;
        self
    }

    fn taken(mut self, cycles: u8) -> Self {
        self.branch_cycles = cycles;
        self
    }

    pub fn is_conditional(&self) -> bool {
        self.cond != Cond::Always
    }
}

lazy_static! {
    /// Primary opcode table.
    pub static ref OPCODES: [Instruction; 256] = std::array::from_fn(|op| decode(op as u8));
    /// Opcodes following the 0xCB prefix.
    pub static ref CB_OPCODES: [Instruction; 256] = std::array::from_fn(|op| decode_cb(op as u8));
}

/// Operand order used by the opcode encoding: B, C, D, E, H, L, (HL), A.
/// `HL` at index 6 stands for the byte at (HL).
const R8: [Reg; 8] = [Reg::B, Reg::C, Reg::D, Reg::E, Reg::H, Reg::L, Reg::HL, Reg::A];
const R16: [Reg; 4] = [Reg::BC, Reg::DE, Reg::HL, Reg::SP];
const R16_STACK: [Reg; 4] = [Reg::BC, Reg::DE, Reg::HL, Reg::AF];
const CONDS: [Cond; 4] = [Cond::NotZero, Cond::Zero, Cond::NotCarry, Cond::Carry];
const ALU: [AluOp; 8] = [
    AluOp::Add,
    AluOp::Adc,
    AluOp::Sub,
    AluOp::Sbc,
    AluOp::And,
    AluOp::Xor,
    AluOp::Or,
    AluOp::Cp,
];
const SHIFTS: [ShiftOp; 8] = [
    ShiftOp::Rlc,
    ShiftOp::Rrc,
    ShiftOp::Rl,
    ShiftOp::Rr,
    ShiftOp::Sla,
    ShiftOp::Sra,
    ShiftOp::Swap,
    ShiftOp::Srl,
];

fn decode(opcode: u8) -> Instruction {
    use Instruction as I;
    use Kind::*;

    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = (y >> 1) as usize;
    let r_y = R8[y as usize];
    let r_z = R8[z as usize];

    match opcode {
        0x00 => I::new(Nop, Mode::Implied),
        0x10 => I::new(Stop, Mode::Implied).length(2),
        0x76 => I::new(Halt, Mode::Implied),
        0xF3 => I::new(Di, Mode::Implied),
        0xFB => I::new(Ei, Mode::Implied),
        0xCB => I::new(Prefix, Mode::Implied),

        // 16-bit loads and arithmetic.
        0x01 | 0x11 | 0x21 | 0x31 => I::new(Ld, Mode::D16ToReg).target(R16[p]).cycles(3),
        0x03 | 0x13 | 0x23 | 0x33 => I::new(Inc, Mode::Reg).target(R16[p]).cycles(2),
        0x0B | 0x1B | 0x2B | 0x3B => I::new(Dec, Mode::Reg).target(R16[p]).cycles(2),
        0x09 | 0x19 | 0x29 | 0x39 => I::new(AddHl, Mode::RegToReg)
            .target(Reg::HL)
            .source(R16[p])
            .cycles(2),
        0x08 => I::new(Ld, Mode::RegToA16).source(Reg::SP).cycles(5),
        0xE8 => I::new(AddSp, Mode::D8ToReg).target(Reg::SP).cycles(4),
        0xF8 => I::new(Ld, Mode::SpD8ToReg).target(Reg::HL).cycles(3),
        0xF9 => I::new(Ld, Mode::RegToReg)
            .target(Reg::SP)
            .source(Reg::HL)
            .cycles(2),

        // Indirect accumulator loads.
        0x02 | 0x12 => I::new(Ld, Mode::RegToMem)
            .target(R16[p])
            .source(Reg::A)
            .cycles(2),
        0x0A | 0x1A => I::new(Ld, Mode::MemToReg)
            .target(Reg::A)
            .source(R16[p])
            .cycles(2),
        0x22 => I::new(Ldi, Mode::RegToMem).target(Reg::HL).source(Reg::A).cycles(2),
        0x32 => I::new(Ldd, Mode::RegToMem).target(Reg::HL).source(Reg::A).cycles(2),
        0x2A => I::new(Ldi, Mode::MemToReg).target(Reg::A).source(Reg::HL).cycles(2),
        0x3A => I::new(Ldd, Mode::MemToReg).target(Reg::A).source(Reg::HL).cycles(2),
        0xE0 => I::new(Ld, Mode::RegToIoA8).source(Reg::A).cycles(3),
        0xF0 => I::new(Ld, Mode::IoA8ToReg).target(Reg::A).cycles(3),
        0xE2 => I::new(Ld, Mode::RegToIoC).source(Reg::A).cycles(2),
        0xF2 => I::new(Ld, Mode::IoCToReg).target(Reg::A).cycles(2),
        0xEA => I::new(Ld, Mode::RegToA16).source(Reg::A).cycles(4),
        0xFA => I::new(Ld, Mode::A16ToReg).target(Reg::A).cycles(4),

        // 8-bit INC/DEC/LD d8 on B, C, D, E, H, L, (HL), A.
        0x34 => I::new(Inc, Mode::Mem).target(Reg::HL).cycles(3),
        0x35 => I::new(Dec, Mode::Mem).target(Reg::HL).cycles(3),
        0x36 => I::new(Ld, Mode::D8ToMem).target(Reg::HL).cycles(3),
        op if op < 0x40 && z == 4 => I::new(Inc, Mode::Reg).target(r_y),
        op if op < 0x40 && z == 5 => I::new(Dec, Mode::Reg).target(r_y),
        op if op < 0x40 && z == 6 => I::new(Ld, Mode::D8ToReg).target(r_y).cycles(2),

        0x07 => I::new(RotateA(ShiftOp::Rlc), Mode::Implied),
        0x0F => I::new(RotateA(ShiftOp::Rrc), Mode::Implied),
        0x17 => I::new(RotateA(ShiftOp::Rl), Mode::Implied),
        0x1F => I::new(RotateA(ShiftOp::Rr), Mode::Implied),
        0x27 => I::new(Daa, Mode::Implied),
        0x2F => I::new(Cpl, Mode::Implied),
        0x37 => I::new(Scf, Mode::Implied),
        0x3F => I::new(Ccf, Mode::Implied),

        // Relative jumps.
        0x18 => I::new(Jr, Mode::D8).cycles(3),
        0x20 | 0x28 | 0x30 | 0x38 => I::new(Jr, Mode::D8)
            .cond(CONDS[(y - 4) as usize])
            .cycles(2)
            .taken(3),

        // LD r,r' block; (HL) on either side costs an extra cycle.
        0x40..=0x7F if z == 6 => I::new(Ld, Mode::MemToReg)
            .target(r_y)
            .source(Reg::HL)
            .cycles(2),
        0x40..=0x7F if y == 6 => I::new(Ld, Mode::RegToMem)
            .target(Reg::HL)
            .source(r_z)
            .cycles(2),
        0x40..=0x7F => I::new(Ld, Mode::RegToReg).target(r_y).source(r_z),

        // ALU A,r block.
        0x80..=0xBF if z == 6 => I::new(Alu(ALU[y as usize]), Mode::MemToReg)
            .target(Reg::A)
            .source(Reg::HL)
            .cycles(2),
        0x80..=0xBF => I::new(Alu(ALU[y as usize]), Mode::RegToReg)
            .target(Reg::A)
            .source(r_z),
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
            I::new(Alu(ALU[y as usize]), Mode::D8ToReg)
                .target(Reg::A)
                .cycles(2)
        }

        // Control flow.
        0xC3 => I::new(Jp, Mode::D16).cycles(4),
        0xE9 => I::new(Jp, Mode::Reg).target(Reg::HL),
        0xC2 | 0xCA | 0xD2 | 0xDA => I::new(Jp, Mode::D16)
            .cond(CONDS[y as usize])
            .cycles(3)
            .taken(4),
        0xCD => I::new(Call, Mode::D16).cycles(6),
        0xC4 | 0xCC | 0xD4 | 0xDC => I::new(Call, Mode::D16)
            .cond(CONDS[y as usize])
            .cycles(3)
            .taken(6),
        0xC9 => I::new(Ret, Mode::Implied).cycles(4),
        0xD9 => I::new(Reti, Mode::Implied).cycles(4),
        0xC0 | 0xC8 | 0xD0 | 0xD8 => I::new(Ret, Mode::Implied)
            .cond(CONDS[y as usize])
            .cycles(2)
            .taken(5),
        op if op >= 0xC0 && z == 7 => I::new(Rst, Mode::Param).param(y * 8).cycles(4),

        // Stack.
        0xC1 | 0xD1 | 0xE1 | 0xF1 => I::new(Pop, Mode::Reg).target(R16_STACK[p]).cycles(3),
        0xC5 | 0xD5 | 0xE5 | 0xF5 => I::new(Push, Mode::Reg).target(R16_STACK[p]).cycles(4),

        _ => I::new(Invalid, Mode::Implied),
    }
}

fn decode_cb(opcode: u8) -> Instruction {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;

    let kind = match x {
        0 => Kind::Shift(SHIFTS[y as usize]),
        1 => Kind::Bit,
        2 => Kind::Res,
        _ => Kind::Set,
    };
    let on_memory = z == 6;
    let cycles = match (on_memory, kind) {
        (false, _) => 2,
        (true, Kind::Bit) => 3,
        (true, _) => 4,
    };
    let mode = if on_memory { Mode::Mem } else { Mode::Reg };

    Instruction::new(kind, mode)
        .target(R8[z as usize])
        .param(if x == 0 { 0 } else { y })
        .length(2)
        .cycles(cycles)
}
