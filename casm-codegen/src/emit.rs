//! NASM emission
//!
//! Code generation runs in two steps over an immutable [`Ast`]:
//!
//! 1. A pre-scan registers every string literal (opening a new scope at each
//!    `move` and system call) and every `caller -> callee` call pair, so
//!    forward calls and global length-of fallbacks see complete tables.
//! 2. A single walk emits one routine per function. The data section is
//!    rendered from the string registry once the walk is done and placed in
//!    front of the text section.
//!
//! Nothing in here fails: anomalies become warnings on the session and the
//! output is always a complete best-effort program.

use crate::asm::{render, Operand, Reg, X86Inst, ARG_REGISTERS};
use crate::session::{CodegenOptions, CompileSession, MAX_SYSCALL_PARAMS};
use crate::strings::{decoded_length, nasm_literal};
use casm_common::{CompilerError, Diagnostic, Severity};
use casm_frontend::{Ast, NodeId, NodeKind};
use log::{debug, info, trace};
use std::io::Write;

/// Generated program text plus the non-fatal diagnostics raised on the way
#[derive(Debug, Clone)]
pub struct CodegenOutput {
    pub assembly: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl CodegenOutput {
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), CompilerError> {
        writer.write_all(self.assembly.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Main entry point for code generation
pub fn generate_nasm(ast: &Ast, options: &CodegenOptions) -> CodegenOutput {
    Emitter::new(ast, CompileSession::new(options.clone())).emit_program()
}

/// Per-function emission state
struct FunctionContext {
    name: String,
    is_entry: bool,
    /// Some caller registered a return label for this function
    returns_to_caller: bool,
    /// An early `return` jumped to the epilogue label
    epilogue_referenced: bool,
}

pub struct Emitter<'a> {
    ast: &'a Ast,
    session: CompileSession,
    text: Vec<X86Inst>,
}

impl<'a> Emitter<'a> {
    pub fn new(ast: &'a Ast, session: CompileSession) -> Self {
        Self {
            ast,
            session,
            text: Vec::new(),
        }
    }

    pub fn emit_program(mut self) -> CodegenOutput {
        self.collect_strings();
        self.collect_calls();
        debug!(
            "pre-scan found {} string(s) and {} call site(s)",
            self.session.strings.len(),
            self.session.calls.len()
        );

        let ast = self.ast;
        let start = self.session.options.start_label.clone();
        let exit = self.session.options.exit_label.clone();
        let entry = self.session.options.entry_function.clone();

        self.text.push(X86Inst::Section(".text".to_string()));
        self.text.push(X86Inst::Global(start.clone()));
        self.emit_exit_routine();

        let has_entry = ast.function(&entry).is_some();
        if has_entry {
            self.begin_routine(&start);
            self.text.push(X86Inst::Jmp(entry));
        }

        for function in ast.functions() {
            self.emit_function(function);
        }

        if !has_entry {
            self.begin_routine(&start);
            self.text.push(X86Inst::Comment(
                "no entry function, exiting directly".to_string(),
            ));
            self.text.push(X86Inst::Jmp(exit));
        }

        let mut program = self.data_section();
        program.append(&mut self.text);

        info!(
            "generated {} line(s), {} string(s), {} warning(s)",
            program.len(),
            self.session.strings.len(),
            self.session.warning_count()
        );

        CodegenOutput {
            assembly: render(&program),
            diagnostics: self.session.into_diagnostics(),
        }
    }

    // ===== Pre-scan =====

    fn collect_strings(&mut self) {
        let ast = self.ast;
        for function in ast.functions() {
            for stmt in ast.siblings(ast.body(function)) {
                let node = ast.node(stmt);
                let scope = match node.kind {
                    NodeKind::Move | NodeKind::Syscall => self.session.strings.enter_scope(),
                    _ => self.session.strings.current_scope(),
                };
                self.session.set_scope(stmt, scope);

                let operands: Vec<NodeId> = match node.kind {
                    NodeKind::Move => node.second_child.into_iter().collect(),
                    NodeKind::Syscall => ast
                        .siblings(node.first_child)
                        .take(MAX_SYSCALL_PARAMS)
                        .collect(),
                    NodeKind::Call => ast
                        .siblings(node.second_child)
                        .take(MAX_SYSCALL_PARAMS)
                        .collect(),
                    _ => Vec::new(),
                };

                for operand in operands {
                    let literal = ast.node(operand);
                    if literal.kind == NodeKind::Str {
                        self.session.bind_string(operand, &literal.text);
                    }
                }
            }
        }
    }

    fn collect_calls(&mut self) {
        let ast = self.ast;
        for function in ast.functions() {
            let caller = &ast.node(function).text;
            for stmt in ast.siblings(ast.body(function)) {
                let node = ast.node(stmt);
                if node.kind != NodeKind::Call {
                    continue;
                }
                if let Some(target) = node.first_child {
                    let target = ast.node(target);
                    if target.kind == NodeKind::Label {
                        self.session.calls.register(caller, &target.text);
                    }
                }
            }
        }
    }

    // ===== Program structure =====

    fn data_section(&self) -> Vec<X86Inst> {
        let mut data = vec![X86Inst::Section(".data".to_string())];
        for entry in self.session.strings.entries() {
            data.push(X86Inst::Data {
                label: entry.label.clone(),
                literal: nasm_literal(&entry.literal),
            });
        }
        data.push(X86Inst::Blank);
        data
    }

    fn begin_routine(&mut self, label: &str) {
        self.text.push(X86Inst::Blank);
        self.text.push(X86Inst::Label(label.to_string()));
    }

    fn emit_exit_routine(&mut self) {
        let exit = self.session.options.exit_label.clone();
        self.begin_routine(&exit);
        self.text.push(X86Inst::Mov(Operand::Reg(Reg::Eax), Operand::imm(1)));
        self.text.push(X86Inst::Xor(Operand::Reg(Reg::Ebx), Operand::Reg(Reg::Ebx)));
        self.text.push(X86Inst::Int("0x80".to_string()));
    }

    fn emit_function(&mut self, function: NodeId) {
        let ast = self.ast;
        let node = ast.node(function);
        let mut ctx = FunctionContext {
            is_entry: node.text == self.session.options.entry_function,
            returns_to_caller: self.session.calls.has_pending(&node.text),
            epilogue_referenced: false,
            name: node.text.clone(),
        };
        debug!(
            "emitting function '{}' (entry: {}, returns to caller: {})",
            ctx.name, ctx.is_entry, ctx.returns_to_caller
        );

        self.begin_routine(&node.text);
        for stmt in ast.siblings(ast.body(function)) {
            self.emit_statement(stmt, &mut ctx);
        }
        self.emit_epilogue(function, &ctx);
    }

    /// Exit jump for the entry function, otherwise a jump back to the
    /// oldest unclaimed caller, otherwise `ret`
    fn emit_epilogue(&mut self, function: NodeId, ctx: &FunctionContext) {
        if ctx.epilogue_referenced {
            let label = self.session.options.epilogue_label(&ctx.name);
            self.text.push(X86Inst::Label(label));
        }

        if ctx.is_entry {
            let exit = self.session.options.exit_label.clone();
            self.text.push(X86Inst::Jmp(exit));
        } else if let Some(return_label) = self.session.calls.consume_one_pending(&ctx.name) {
            self.text.push(X86Inst::Jmp(return_label));
        } else {
            self.text.push(X86Inst::Ret);
        }

        let unclaimed = self.session.calls.pending_count(&ctx.name);
        if unclaimed > 0 {
            let span = &self.ast.node(function).span;
            self.session.warn_with_note(
                format!(
                    "function '{}' is called from {} more site(s) whose return label is never jumped to",
                    ctx.name, unclaimed
                ),
                "a function has a single epilogue, which returns to its first registered caller"
                    .to_string(),
                Some(span),
            );
        }
    }

    // ===== Statements =====

    fn emit_statement(&mut self, stmt: NodeId, ctx: &mut FunctionContext) {
        let ast = self.ast;
        let node = ast.node(stmt);
        trace!("{}: {} {}", node.span.start, node.kind, stmt);

        match node.kind {
            NodeKind::Move => self.emit_move(stmt),
            NodeKind::Add => self.emit_arithmetic(stmt, X86Inst::Add),
            NodeKind::Sub => self.emit_arithmetic(stmt, X86Inst::Sub),
            NodeKind::Compare => self.emit_arithmetic(stmt, X86Inst::Cmp),
            NodeKind::Jump => self.emit_jump(stmt, X86Inst::Jmp),
            NodeKind::JumpEqual => self.emit_jump(stmt, X86Inst::Je),
            NodeKind::JumpNotEqual => self.emit_jump(stmt, X86Inst::Jne),
            NodeKind::Return => self.emit_return(stmt, ctx),
            NodeKind::Call => self.emit_call(stmt, ctx),
            NodeKind::Syscall => {
                self.load_arguments(stmt, node.first_child, "system call");
                self.text.push(X86Inst::Int("0x80".to_string()));
            }
            other => self.session.warn(
                format!("unsupported {} node in function '{}' skipped", other, ctx.name),
                Some(&node.span),
            ),
        }
    }

    fn binary_operands(&mut self, stmt: NodeId) -> Option<(NodeId, NodeId)> {
        let node = self.ast.node(stmt);
        match (node.first_child, node.second_child) {
            (Some(lhs), Some(rhs)) => Some((lhs, rhs)),
            _ => {
                self.session.warn(
                    format!("'{}' is missing an operand, skipped", node.text),
                    Some(&node.span),
                );
                None
            }
        }
    }

    fn emit_move(&mut self, stmt: NodeId) {
        let Some((dst, src)) = self.binary_operands(stmt) else {
            return;
        };
        let ast = self.ast;
        let source = ast.node(src);

        let value = match source.kind {
            NodeKind::Strlen => Operand::imm(self.resolve_statement_length(stmt)),
            NodeKind::Str => Operand::Label(self.string_label(src)),
            NodeKind::Number => Operand::Imm(source.text.clone()),
            _ => Operand::register(&source.text),
        };
        self.text
            .push(X86Inst::Mov(Operand::register(&ast.node(dst).text), value));
    }

    fn emit_arithmetic(&mut self, stmt: NodeId, make: fn(Operand, Operand) -> X86Inst) {
        let Some((lhs, rhs)) = self.binary_operands(stmt) else {
            return;
        };
        let ast = self.ast;
        let rhs = ast.node(rhs);

        let value = match rhs.kind {
            NodeKind::Number => Operand::Imm(rhs.text.clone()),
            _ => Operand::register(&rhs.text),
        };
        self.text
            .push(make(Operand::register(&ast.node(lhs).text), value));
    }

    fn emit_jump(&mut self, stmt: NodeId, make: fn(String) -> X86Inst) {
        let ast = self.ast;
        let node = ast.node(stmt);
        match node.first_child {
            Some(target) => self.text.push(make(ast.node(target).text.clone())),
            None => self.session.warn(
                format!("'{}' has no target, skipped", node.text),
                Some(&node.span),
            ),
        }
    }

    fn emit_return(&mut self, stmt: NodeId, ctx: &mut FunctionContext) {
        if ctx.is_entry {
            let exit = self.session.options.exit_label.clone();
            self.text.push(X86Inst::Jmp(exit));
        } else if ctx.returns_to_caller {
            // The last statement falls straight into the epilogue
            if self.ast.node(stmt).next.is_some() {
                ctx.epilogue_referenced = true;
                let label = self.session.options.epilogue_label(&ctx.name);
                self.text.push(X86Inst::Jmp(label));
            }
        } else {
            self.text.push(X86Inst::Ret);
        }
    }

    fn emit_call(&mut self, stmt: NodeId, ctx: &FunctionContext) {
        let ast = self.ast;
        let node = ast.node(stmt);

        let Some(target) = node.first_child else {
            self.text.push(X86Inst::Int("0x80".to_string()));
            return;
        };
        let target = ast.node(target);

        match target.kind {
            NodeKind::Number => self.text.push(X86Inst::Int(target.text.clone())),
            NodeKind::Label => {
                let callee = &target.text;
                let known = self
                    .session
                    .calls
                    .resolve_return_label(&ctx.name, callee)
                    .map(str::to_string);
                let return_label = match known {
                    Some(label) => label,
                    None => {
                        self.session.warn(
                            format!("call from '{}' to '{}' was not pre-registered", ctx.name, callee),
                            Some(&node.span),
                        );
                        self.session.calls.register(&ctx.name, callee).to_string()
                    }
                };

                self.load_arguments(stmt, node.second_child, "call");
                self.text.push(X86Inst::Jmp(callee.clone()));

                if self.session.define_return_label(&return_label) {
                    self.text.push(X86Inst::Label(return_label));
                } else {
                    self.session.warn(
                        format!(
                            "repeated call from '{}' to '{}' reuses {}, which is only defined at the first call",
                            ctx.name, callee, return_label
                        ),
                        Some(&node.span),
                    );
                }
            }
            _ => self.session.warn(
                format!("cannot call '{}', skipped", target.text),
                Some(&node.span),
            ),
        }
    }

    /// Load system call / call arguments into the argument registers in order
    fn load_arguments(&mut self, stmt: NodeId, head: Option<NodeId>, what: &str) {
        let ast = self.ast;
        let params: Vec<NodeId> = ast.siblings(head).collect();

        if params.len() > MAX_SYSCALL_PARAMS {
            self.session.warn(
                format!(
                    "{} has {} parameters, only the first {} are passed",
                    what,
                    params.len(),
                    MAX_SYSCALL_PARAMS
                ),
                Some(&ast.node(stmt).span),
            );
        }
        let params = &params[..params.len().min(MAX_SYSCALL_PARAMS)];

        for (index, (&param, reg)) in params.iter().zip(ARG_REGISTERS).enumerate() {
            let node = ast.node(param);
            let value = match node.kind {
                NodeKind::Str => Operand::Label(self.string_label(param)),
                NodeKind::Strlen => Operand::imm(self.resolve_argument_length(stmt, params, index)),
                NodeKind::Number => Operand::Imm(node.text.clone()),
                NodeKind::Label => Operand::Label(node.text.clone()),
                _ => Operand::register(&node.text),
            };
            self.text.push(X86Inst::Mov(Operand::Reg(reg), value));
        }
    }

    // ===== String lookups =====

    /// Data label bound to a literal node, registering it if the pre-scan
    /// did not reach it
    fn string_label(&mut self, node: NodeId) -> String {
        if let Some(label) = self.session.string_label(node) {
            return label.to_string();
        }
        let literal = &self.ast.node(node).text;
        debug!("late registration of {}", literal);
        self.session.bind_string(node, literal)
    }

    fn literal_length(&mut self, node: NodeId) -> usize {
        let label = self.string_label(node);
        self.session
            .strings
            .length_of(&label)
            .unwrap_or_else(|| decoded_length(&self.ast.node(node).text))
    }

    /// Length-of in a `move`: nearest earlier literal move or system call in
    /// the same block, then the registry
    fn resolve_statement_length(&mut self, stmt: NodeId) -> usize {
        let ast = self.ast;
        for prev in ast.preceding(stmt) {
            let node = ast.node(prev);
            let literal = match node.kind {
                NodeKind::Move => node
                    .second_child
                    .filter(|&src| ast.node(src).kind == NodeKind::Str),
                NodeKind::Syscall => ast
                    .siblings(node.first_child)
                    .find(|&param| ast.node(param).kind == NodeKind::Str),
                _ => None,
            };
            if let Some(literal) = literal {
                return self.literal_length(literal);
            }
        }
        self.registry_length(stmt)
    }

    /// Length-of in an argument list: nearest earlier string argument, then
    /// the nearest later one, then the registry
    fn resolve_argument_length(&mut self, stmt: NodeId, params: &[NodeId], index: usize) -> usize {
        let ast = self.ast;
        let is_string = |id: &&NodeId| ast.node(**id).kind == NodeKind::Str;

        let literal = params[..index]
            .iter()
            .rev()
            .find(is_string)
            .or_else(|| params[index + 1..].iter().find(is_string))
            .copied();

        match literal {
            Some(literal) => self.literal_length(literal),
            None => self.registry_length(stmt),
        }
    }

    fn registry_length(&mut self, stmt: NodeId) -> usize {
        let scope = self.session.scope_of(stmt);
        if let Some(entry) = self.session.strings.most_recent(scope) {
            trace!("length-of at {} resolved to {} via {}", stmt, entry.label, scope);
            return entry.length;
        }

        self.session.warn(
            "no string found for length-of operand, defaulting to length 0".to_string(),
            Some(&self.ast.node(stmt).span),
        );
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casm_common::SourceSpan;
    use pretty_assertions::assert_eq;

    /// Hand-built AST: one function whose body is the given statements
    struct Builder {
        ast: Ast,
        functions: Vec<NodeId>,
    }

    impl Builder {
        fn new() -> Self {
            Self {
                ast: Ast::new(),
                functions: Vec::new(),
            }
        }

        fn leaf(&mut self, kind: NodeKind, text: &str) -> NodeId {
            self.ast.push(kind, text, SourceSpan::dummy())
        }

        fn binary(&mut self, kind: NodeKind, lhs: (NodeKind, &str), rhs: (NodeKind, &str)) -> NodeId {
            let stmt = self.leaf(kind, "stmt");
            let lhs = self.leaf(lhs.0, lhs.1);
            let rhs = self.leaf(rhs.0, rhs.1);
            let node = self.ast.node_mut(stmt);
            node.first_child = Some(lhs);
            node.second_child = Some(rhs);
            stmt
        }

        fn syscall(&mut self, params: &[(NodeKind, &str)]) -> NodeId {
            let stmt = self.leaf(NodeKind::Syscall, "sys_call");
            let ids: Vec<NodeId> = params.iter().map(|&(k, t)| self.leaf(k, t)).collect();
            let head = self.ast.chain(&ids);
            self.ast.node_mut(stmt).first_child = head;
            stmt
        }

        fn function(&mut self, name: &str, statements: &[NodeId]) {
            let func = self.leaf(NodeKind::Function, name);
            let block = self.leaf(NodeKind::Block, "{");
            let head = self.ast.chain(statements);
            self.ast.node_mut(block).first_child = head;
            self.ast.node_mut(func).first_child = Some(block);
            self.functions.push(func);
        }

        fn finish(mut self) -> Ast {
            let head = self.ast.chain(&self.functions);
            self.ast.set_head(head);
            self.ast.link_siblings();
            self.ast
        }
    }

    fn body_of(output: &CodegenOutput, label: &str) -> Vec<String> {
        output
            .assembly
            .lines()
            .skip_while(|line| *line != format!("{}:", label))
            .skip(1)
            .take_while(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_move_strlen_uses_previous_move() {
        let mut b = Builder::new();
        let m1 = b.binary(NodeKind::Move, (NodeKind::Register, "&1"), (NodeKind::Str, "\"hello\""));
        let m2 = b.binary(NodeKind::Move, (NodeKind::Register, "&2"), (NodeKind::Strlen, "&strlen&"));
        b.function("main", &[m1, m2]);

        let output = generate_nasm(&b.finish(), &CodegenOptions::default());
        assert_eq!(
            body_of(&output, "main"),
            vec!["    mov eax, str_0", "    mov ebx, 5", "    jmp _exit"]
        );
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_move_strlen_uses_previous_syscall_literal() {
        let mut b = Builder::new();
        let sys = b.syscall(&[
            (NodeKind::Number, "4"),
            (NodeKind::Number, "1"),
            (NodeKind::Str, "\"abc\\n\""),
        ]);
        let mv = b.binary(NodeKind::Move, (NodeKind::Register, "r3"), (NodeKind::Strlen, "&strlen&"));
        b.function("main", &[sys, mv]);

        let output = generate_nasm(&b.finish(), &CodegenOptions::default());
        assert_eq!(
            body_of(&output, "main"),
            vec![
                "    mov eax, 4",
                "    mov ebx, 1",
                "    mov ecx, str_0",
                "    int 0x80",
                "    mov ecx, 4",
                "    jmp _exit",
            ]
        );
        assert!(output.assembly.contains("    str_0 db `abc\\n`, 0\n"));
    }

    #[test]
    fn test_strlen_falls_back_to_registry() {
        // The literal lives in another function, so the backward scan misses it
        let mut b = Builder::new();
        let m1 = b.binary(NodeKind::Move, (NodeKind::Register, "a"), (NodeKind::Str, "\"four\""));
        b.function("first", &[m1]);
        let m2 = b.binary(NodeKind::Move, (NodeKind::Register, "b"), (NodeKind::Strlen, "&strlen&"));
        b.function("main", &[m2]);

        let output = generate_nasm(&b.finish(), &CodegenOptions::default());
        assert_eq!(body_of(&output, "main")[0], "    mov ebx, 4");
    }

    #[test]
    fn test_strlen_without_string_defaults_to_zero() {
        let mut b = Builder::new();
        let mv = b.binary(NodeKind::Move, (NodeKind::Register, "&2"), (NodeKind::Strlen, "&strlen&"));
        b.function("main", &[mv]);

        let output = generate_nasm(&b.finish(), &CodegenOptions::default());
        assert_eq!(body_of(&output, "main")[0], "    mov ebx, 0");
        assert_eq!(output.warning_count(), 1);
        assert!(output.diagnostics[0].message.contains("defaulting to length 0"));
    }

    #[test]
    fn test_syscall_strlen_searches_parameters() {
        let mut b = Builder::new();
        let sys = b.syscall(&[
            (NodeKind::Number, "4"),
            (NodeKind::Strlen, "&strlen&"),
            (NodeKind::Str, "\"later\""),
        ]);
        b.function("main", &[sys]);

        let output = generate_nasm(&b.finish(), &CodegenOptions::default());
        let body = body_of(&output, "main");
        assert_eq!(
            body[..3].to_vec(),
            vec!["    mov eax, 4", "    mov ebx, 5", "    mov ecx, str_0"]
        );
    }

    #[test]
    fn test_syscall_parameters_beyond_seven_are_dropped() {
        let mut b = Builder::new();
        let params: Vec<(NodeKind, &str)> = (0..9).map(|_| (NodeKind::Number, "1")).collect();
        let sys = b.syscall(&params);
        b.function("main", &[sys]);

        let output = generate_nasm(&b.finish(), &CodegenOptions::default());
        let body = body_of(&output, "main");
        assert_eq!(body.iter().filter(|l| l.starts_with("    mov ")).count(), 7);
        assert_eq!(body[6], "    mov ebp, 1");
        assert_eq!(output.warning_count(), 1);
    }

    #[test]
    fn test_arithmetic_and_jumps() {
        let mut b = Builder::new();
        let add = b.binary(NodeKind::Add, (NodeKind::Register, "r1"), (NodeKind::Number, "2"));
        let sub = b.binary(NodeKind::Sub, (NodeKind::Register, "r1"), (NodeKind::Register, "r2"));
        let cmp = b.binary(NodeKind::Compare, (NodeKind::Register, "r1"), (NodeKind::Register, "esp"));
        let jne = b.leaf(NodeKind::JumpNotEqual, "jump_not_equal");
        let target = b.leaf(NodeKind::Label, "loop");
        b.ast.node_mut(jne).first_child = Some(target);
        b.function("main", &[add, sub, cmp, jne]);

        let output = generate_nasm(&b.finish(), &CodegenOptions::default());
        assert_eq!(
            body_of(&output, "main"),
            vec![
                "    add eax, 2",
                "    sub eax, ebx",
                "    cmp eax, esp",
                "    jne loop",
                "    jmp _exit",
            ]
        );
    }

    #[test]
    fn test_unknown_node_kind_is_skipped() {
        let mut b = Builder::new();
        let stray = b.leaf(NodeKind::Number, "42");
        let ret = b.leaf(NodeKind::Return, "return");
        b.function("helper", &[stray, ret]);

        let output = generate_nasm(&b.finish(), &CodegenOptions::default());
        assert_eq!(body_of(&output, "helper"), vec!["    ret", "    ret"]);
        assert_eq!(output.warning_count(), 1);
    }

    #[test]
    fn test_no_entry_function_gets_default_start() {
        let mut b = Builder::new();
        let ret = b.leaf(NodeKind::Return, "return");
        b.function("helper", &[ret]);

        let output = generate_nasm(&b.finish(), &CodegenOptions::default());
        assert!(output.assembly.ends_with(
            "_start:\n    ; no entry function, exiting directly\n    jmp _exit\n"
        ));
    }

    #[test]
    fn test_custom_entry_function() {
        let mut b = Builder::new();
        let ret = b.leaf(NodeKind::Return, "return");
        b.function("begin", &[ret]);

        let options = CodegenOptions::default().with_entry("begin");
        let output = generate_nasm(&b.finish(), &options);
        assert_eq!(body_of(&output, "_start"), vec!["    jmp begin"]);
        assert_eq!(body_of(&output, "begin"), vec!["    jmp _exit", "    jmp _exit"]);
    }

    #[test]
    fn test_write_to() {
        let output = generate_nasm(&Ast::new(), &CodegenOptions::default());
        let mut buffer = Vec::new();
        output.write_to(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), output.assembly);
        assert!(output.assembly.starts_with("section .data\n\nsection .text\nglobal _start\n"));
    }
}
