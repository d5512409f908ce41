//! CASM Compiler - x86 NASM Code Generation
//!
//! This crate turns the parsed CASM program into 32-bit NASM source:
//!
//! - `asm`: x86 instruction and register model, register name table
//! - `strings`: string literal registry with scoped length-of lookup
//! - `calls`: call-site registry assigning return labels
//! - `session`: options and per-compilation state
//! - `emit`: the pre-scan and emission passes

pub mod asm;
pub mod calls;
pub mod emit;
pub mod session;
pub mod strings;

pub use asm::{translate_register, Operand, Reg, X86Inst, ARG_REGISTERS};
pub use calls::{CallRegistry, CallSite};
pub use emit::{generate_nasm, CodegenOutput, Emitter};
pub use session::{CodegenOptions, CompileSession, MAX_SYSCALL_PARAMS};
pub use strings::{decoded_length, nasm_literal, ScopeId, StringEntry, StringRegistry};
