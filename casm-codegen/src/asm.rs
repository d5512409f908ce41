//! x86 Assembly Instruction Definitions
//!
//! This module defines the small slice of the 32-bit x86 instruction set the
//! code generator emits, the register model, and the NASM text rendering.

use std::fmt;

/// x86 32-bit general purpose registers reachable from CASM source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    Eax,
    Ebx,
    Ecx,
    Edx,
    Esi,
    Edi,
    Ebp,
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg::Eax => "eax",
            Reg::Ebx => "ebx",
            Reg::Ecx => "ecx",
            Reg::Edx => "edx",
            Reg::Esi => "esi",
            Reg::Edi => "edi",
            Reg::Ebp => "ebp",
        };
        write!(f, "{name}")
    }
}

/// Registers loaded, in order, with system call and call arguments
pub const ARG_REGISTERS: [Reg; 7] = [
    Reg::Eax,
    Reg::Ebx,
    Reg::Ecx,
    Reg::Edx,
    Reg::Esi,
    Reg::Edi,
    Reg::Ebp,
];

/// Map a CASM register spelling (`&1`, `r1`, `a`, ...) to an x86 register
pub fn translate_register(name: &str) -> Option<Reg> {
    let reg = match name {
        "&1" | "r1" | "a" => Reg::Eax,
        "&2" | "r2" | "b" => Reg::Ebx,
        "&3" | "r3" | "c" => Reg::Ecx,
        "&4" | "r4" | "d" => Reg::Edx,
        "&5" | "r5" => Reg::Esi,
        "&6" | "r6" => Reg::Edi,
        "&7" | "r7" => Reg::Ebp,
        _ => return None,
    };
    Some(reg)
}

/// Instruction operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    /// Immediate, kept in its source spelling (`42`, `0x80`)
    Imm(String),
    /// Data or code label
    Label(String),
    /// Name with no register mapping, written verbatim
    Raw(String),
}

impl Operand {
    /// Register operand for a source name; unmapped names pass through
    pub fn register(name: &str) -> Self {
        match translate_register(name) {
            Some(reg) => Operand::Reg(reg),
            None => Operand::Raw(name.to_string()),
        }
    }

    pub fn imm(value: impl fmt::Display) -> Self {
        Operand::Imm(value.to_string())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => write!(f, "{reg}"),
            Operand::Imm(text) | Operand::Label(text) | Operand::Raw(text) => write!(f, "{text}"),
        }
    }
}

/// NASM output lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum X86Inst {
    // Data movement and arithmetic
    Mov(Operand, Operand),
    Add(Operand, Operand),
    Sub(Operand, Operand),
    Cmp(Operand, Operand),
    Xor(Operand, Operand),

    // Control flow
    Jmp(String),
    Je(String),
    Jne(String),
    Int(String),
    Ret,

    // Assembler directives
    Section(String),
    Global(String),
    /// `label db literal, 0`
    Data { label: String, literal: String },
    Label(String),
    Comment(String),
    Blank,
}

impl fmt::Display for X86Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            X86Inst::Mov(dst, src) => write!(f, "    mov {}, {}", dst, src),
            X86Inst::Add(dst, src) => write!(f, "    add {}, {}", dst, src),
            X86Inst::Sub(dst, src) => write!(f, "    sub {}, {}", dst, src),
            X86Inst::Cmp(lhs, rhs) => write!(f, "    cmp {}, {}", lhs, rhs),
            X86Inst::Xor(dst, src) => write!(f, "    xor {}, {}", dst, src),

            X86Inst::Jmp(target) => write!(f, "    jmp {}", target),
            X86Inst::Je(target) => write!(f, "    je {}", target),
            X86Inst::Jne(target) => write!(f, "    jne {}", target),
            X86Inst::Int(vector) => write!(f, "    int {}", vector),
            X86Inst::Ret => write!(f, "    ret"),

            X86Inst::Section(name) => write!(f, "section {}", name),
            X86Inst::Global(name) => write!(f, "global {}", name),
            X86Inst::Data { label, literal } => write!(f, "    {} db {}, 0", label, literal),
            X86Inst::Label(name) => write!(f, "{}:", name),
            X86Inst::Comment(text) => write!(f, "    ; {}", text),
            X86Inst::Blank => Ok(()),
        }
    }
}

/// Render instructions as NASM source, one per line
pub fn render(instructions: &[X86Inst]) -> String {
    let mut out = String::new();
    for inst in instructions {
        out.push_str(&inst.to_string());
        out.push('\n');
    }
    out
}
