//! Function, block, statement and operand parsing

use crate::ast::{NodeId, NodeKind};
use crate::lexer::TokenKind;
use crate::parser::Parser;
use casm_common::CompilerError;
use log::trace;

/// AST node kind produced by a statement keyword
fn statement_kind(kind: TokenKind) -> Option<NodeKind> {
    Some(match kind {
        TokenKind::Move => NodeKind::Move,
        TokenKind::Add => NodeKind::Add,
        TokenKind::Sub => NodeKind::Sub,
        TokenKind::Compare => NodeKind::Compare,
        TokenKind::Jump => NodeKind::Jump,
        TokenKind::JumpEqual => NodeKind::JumpEqual,
        TokenKind::JumpNotEqual => NodeKind::JumpNotEqual,
        TokenKind::Return => NodeKind::Return,
        TokenKind::Call => NodeKind::Call,
        TokenKind::Syscall => NodeKind::Syscall,
        _ => return None,
    })
}

fn operand_kind(kind: TokenKind) -> Option<NodeKind> {
    Some(match kind {
        TokenKind::Number => NodeKind::Number,
        TokenKind::Register => NodeKind::Register,
        TokenKind::LabelName => NodeKind::Label,
        TokenKind::String => NodeKind::Str,
        TokenKind::Strlen => NodeKind::Strlen,
        _ => return None,
    })
}

impl Parser {
    /// `('func' | 'label') NAME block`
    pub fn parse_function(&mut self) -> Result<NodeId, CompilerError> {
        self.expect(TokenKind::FuncKw, "to start a function")?;

        let name = match self.peek_kind() {
            TokenKind::LabelName | TokenKind::Register => self.advance(),
            _ => None,
        }
        .ok_or_else(|| self.unexpected("function name".to_string()))?;

        let function = self.ast.push(NodeKind::Function, name.text, name.span);
        let block = self.parse_block()?;
        self.ast.node_mut(function).first_child = Some(block);

        trace!("parsed function '{}'", self.ast.node(function).text);
        Ok(function)
    }

    /// `'{' ( statement ';' )* '}'`
    pub fn parse_block(&mut self) -> Result<NodeId, CompilerError> {
        let open = self.expect(TokenKind::LeftBrace, "to open function body")?;
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::EndOfFile) {
            statements.push(self.parse_statement()?);
            self.expect(TokenKind::Semicolon, "after statement")?;
        }
        self.expect(TokenKind::RightBrace, "to close function body")?;

        let block = self.ast.push(NodeKind::Block, open.text, open.span);
        let head = self.ast.chain(&statements);
        self.ast.node_mut(block).first_child = head;
        Ok(block)
    }

    /// Parse one statement, without its terminating `;`
    pub fn parse_statement(&mut self) -> Result<NodeId, CompilerError> {
        let kind = statement_kind(self.peek_kind())
            .ok_or_else(|| self.unexpected("statement".to_string()))?;
        let keyword = self
            .advance()
            .ok_or_else(|| self.unexpected("statement".to_string()))?;
        let stmt = self.ast.push(kind, keyword.text, keyword.span);

        match kind {
            NodeKind::Move | NodeKind::Add | NodeKind::Sub | NodeKind::Compare => {
                self.expect(TokenKind::LeftParen, "after instruction")?;
                let lhs = self.parse_operand()?;
                self.expect(TokenKind::Comma, "between operands")?;
                let rhs = self.parse_operand()?;
                self.expect(TokenKind::RightParen, "after operands")?;

                let node = self.ast.node_mut(stmt);
                node.first_child = Some(lhs);
                node.second_child = Some(rhs);
            }

            NodeKind::Jump | NodeKind::JumpEqual | NodeKind::JumpNotEqual => {
                self.expect(TokenKind::LeftParen, "after jump")?;
                let target = self.parse_operand()?;
                self.expect(TokenKind::RightParen, "after jump target")?;
                self.ast.node_mut(stmt).first_child = Some(target);
            }

            NodeKind::Return => {
                if self.match_token(TokenKind::LeftParen) {
                    self.expect(TokenKind::RightParen, "after 'return('")?;
                }
            }

            NodeKind::Syscall => {
                let params = self.parse_operand_list("system call")?;
                let head = self.ast.chain(&params);
                self.ast.node_mut(stmt).first_child = head;
            }

            NodeKind::Call => {
                let mut operands = self.parse_operand_list("call")?.into_iter();
                let target = operands.next();
                let args: Vec<NodeId> = operands.collect();
                let args_head = self.ast.chain(&args);

                let node = self.ast.node_mut(stmt);
                node.first_child = target;
                node.second_child = args_head;
            }

            _ => {}
        }

        Ok(stmt)
    }

    /// `'(' [ operand ( ',' operand )* ] ')'`
    fn parse_operand_list(&mut self, context: &str) -> Result<Vec<NodeId>, CompilerError> {
        self.expect(TokenKind::LeftParen, &format!("after {}", context))?;

        let mut operands = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                operands.push(self.parse_operand()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightParen, &format!("to close {} operands", context))?;
        Ok(operands)
    }

    /// `NUMBER | REGISTER | LABEL_NAME | STRING | STRLEN | '(' operand ')'`
    pub fn parse_operand(&mut self) -> Result<NodeId, CompilerError> {
        if self.match_token(TokenKind::LeftParen) {
            let inner = self.parse_operand()?;
            self.expect(TokenKind::RightParen, "after parenthesized operand")?;
            return Ok(inner);
        }

        let kind = operand_kind(self.peek_kind())
            .ok_or_else(|| self.unexpected("operand".to_string()))?;
        let token = self
            .advance()
            .ok_or_else(|| self.unexpected("operand".to_string()))?;

        Ok(self.ast.push(kind, token.text, token.span))
    }
}
