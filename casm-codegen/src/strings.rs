//! String registry
//!
//! Every string literal in the program gets a data-section label and its
//! decoded byte length. Entries are tagged with the scope that was open when
//! they were registered so a later length-of operand can find "the most
//! recently relevant string" without looking at source text again.

use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic id bounding the fallback search for length-of resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const OUTERMOST: ScopeId = ScopeId(0);

    pub fn is_outermost(self) -> bool {
        self == Self::OUTERMOST
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringEntry {
    pub label: String,
    /// Decoded length in bytes, quotes and escapes resolved
    pub length: usize,
    /// Literal as written in the source, quotes included
    pub literal: String,
    pub scope: ScopeId,
}

/// Byte length of a literal once its quotes are stripped and each `\X`
/// escape pair collapsed to one byte. A trailing lone `\` is not counted.
/// Text without surrounding quotes is measured as-is.
pub fn decoded_length(literal: &str) -> usize {
    let Some(inner) = strip_quotes(literal) else {
        return literal.len();
    };

    let mut length = 0;
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if chars.next().is_some() {
                length += 1;
            }
        } else {
            length += ch.len_utf8();
        }
    }
    length
}

fn strip_quotes(literal: &str) -> Option<&str> {
    if literal.len() >= 2 && literal.starts_with('"') && literal.ends_with('"') {
        Some(&literal[1..literal.len() - 1])
    } else {
        None
    }
}

/// Spelling of a literal in a NASM `db` directive.
///
/// Plain literals keep their double quotes. Literals with escapes become
/// backquoted strings with every escape pair written so that it assembles
/// to a single byte, matching the length computed by [`decoded_length`].
pub fn nasm_literal(literal: &str) -> String {
    let Some(inner) = strip_quotes(literal) else {
        return format!("\"{}\"", literal);
    };

    if !inner.contains('\\') {
        return literal.to_string();
    }

    let mut out = String::with_capacity(inner.len() + 2);
    out.push('`');
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_escape(&mut out, escaped);
                }
            }
            '`' => out.push_str("\\`"),
            _ => out.push(ch),
        }
    }
    out.push('`');
    out
}

/// Write the NASM form of the escape pair `\<escaped>` as exactly one byte.
///
/// NASM reads up to three octal digits after `\0`-`\7` and treats `\x`,
/// `\u` and `\U` as multi-character introducers, so those are rewritten:
/// octal digits become a full three-digit escape, introducers lose the
/// backslash.
fn push_escape(out: &mut String, escaped: char) {
    match escaped {
        '\'' | '"' | '`' | '\\' | '?' | 'a' | 'b' | 't' | 'n' | 'v' | 'f' | 'r' | 'e' => {
            out.push('\\');
            out.push(escaped);
        }
        '0'..='7' => {
            out.push_str("\\00");
            out.push(escaped);
        }
        c if c.is_ascii() => out.push(c),
        c => {
            let mut buf = [0u8; 4];
            let first = c.encode_utf8(&mut buf).as_bytes()[0];
            out.push_str(&format!("\\x{:02x}", first));
        }
    }
}

/// Registry of string literals for one compilation
#[derive(Debug, Clone)]
pub struct StringRegistry {
    prefix: String,
    entries: Vec<StringEntry>,
    current_scope: ScopeId,
}

impl StringRegistry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Vec::new(),
            current_scope: ScopeId::OUTERMOST,
        }
    }

    /// Open a fresh scope; ids are never reused
    pub fn enter_scope(&mut self) -> ScopeId {
        self.current_scope = ScopeId(self.current_scope.0 + 1);
        self.current_scope
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current_scope
    }

    /// Append an entry for `literal` under the current scope and return its label.
    /// Repeated literals get a new entry each time.
    pub fn register(&mut self, literal: &str) -> &StringEntry {
        let label = format!("{}{}", self.prefix, self.entries.len());
        let entry = StringEntry {
            length: decoded_length(literal),
            literal: literal.to_string(),
            scope: self.current_scope,
            label,
        };
        trace!(
            "registered {} = {} ({} bytes, {})",
            entry.label,
            entry.literal,
            entry.length,
            entry.scope
        );
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn get(&self, label: &str) -> Option<&StringEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Decoded length of the literal registered under `label`
    pub fn length_of(&self, label: &str) -> Option<usize> {
        self.get(label).map(|e| e.length)
    }

    /// Most recent entry whose scope is at or before `context`; outside the
    /// outermost scope, falls back to the most recent entry overall.
    pub fn most_recent(&self, context: ScopeId) -> Option<&StringEntry> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.scope <= context)
            .or_else(|| {
                if context.is_outermost() {
                    None
                } else {
                    self.entries.last()
                }
            })
    }

    /// Entries in registration order
    pub fn entries(&self) -> &[StringEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
