//! Parser for the supported notation subset.
//!
//! Recognized: `\frac{..}{..}`, `^`/`_` scripts with a braced group or a
//! single token, Greek letters, and common operators. Anything else becomes
//! a [`MathNode::Literal`] so rendering never fails.

use serde::{Deserialize, Serialize};
use std::iter::Peekable;
use std::str::Chars;

/// A node of a parsed expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MathNode {
    /// Plain symbols
    Text {
        /// Symbols, with commands already replaced by characters
        text: String,
    },
    /// Construct outside the supported subset, kept verbatim
    Literal {
        /// Source text
        text: String,
    },
    /// Fraction
    Fraction {
        /// Numerator
        num: Vec<MathNode>,
        /// Denominator
        den: Vec<MathNode>,
    },
    /// Superscript
    Sup {
        /// Base
        base: Vec<MathNode>,
        /// Exponent
        sup: Vec<MathNode>,
    },
    /// Subscript
    Sub {
        /// Base
        base: Vec<MathNode>,
        /// Index
        sub: Vec<MathNode>,
    },
    /// Subscript and superscript on one base
    SubSup {
        /// Base
        base: Vec<MathNode>,
        /// Index
        sub: Vec<MathNode>,
        /// Exponent
        sup: Vec<MathNode>,
    },
}

impl MathNode {
    fn text(s: impl Into<String>) -> Self {
        MathNode::Text { text: s.into() }
    }

    /// Check whether the whole tree contains any literal fallback.
    pub fn has_literal(&self) -> bool {
        match self {
            MathNode::Text { .. } => false,
            MathNode::Literal { .. } => true,
            MathNode::Fraction { num, den } => any_literal(num) || any_literal(den),
            MathNode::Sup { base, sup } => any_literal(base) || any_literal(sup),
            MathNode::Sub { base, sub } => any_literal(base) || any_literal(sub),
            MathNode::SubSup { base, sub, sup } => {
                any_literal(base) || any_literal(sub) || any_literal(sup)
            }
        }
    }
}

fn any_literal(nodes: &[MathNode]) -> bool {
    nodes.iter().any(MathNode::has_literal)
}

/// Map a command name to a Greek letter or operator.
pub fn symbol_for(command: &str) -> Option<&'static str> {
    let symbol = match command {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" => "ε",
        "theta" => "θ",
        "lambda" => "λ",
        "mu" => "μ",
        "pi" => "π",
        "sigma" => "σ",
        "phi" => "φ",
        "omega" => "ω",
        "Delta" => "Δ",
        "Sigma" => "Σ",
        "Omega" => "Ω",
        "times" => "×",
        "div" => "÷",
        "pm" => "±",
        "leq" | "le" => "≤",
        "geq" | "ge" => "≥",
        "neq" | "ne" => "≠",
        "approx" => "≈",
        "infty" => "∞",
        "cdot" => "·",
        "partial" => "∂",
        "nabla" => "∇",
        "sum" => "∑",
        "int" => "∫",
        "prod" => "∏",
        "rightarrow" | "to" => "→",
        _ => return None,
    };
    Some(symbol)
}

/// Commands whose braced argument is shown as plain text.
fn is_text_wrapper(command: &str) -> bool {
    matches!(
        command,
        "mathrm" | "text" | "textbf" | "textit" | "mathbf" | "mathit" | "operatorname"
    )
}

/// Parse notation, with or without `$` delimiters, into nodes.
pub fn parse_expression(source: &str) -> Vec<MathNode> {
    let body = source.trim().trim_matches('$').trim();
    let mut chars = body.chars().peekable();
    parse_sequence(&mut chars, false)
}

struct Builder {
    nodes: Vec<MathNode>,
    text: String,
}

impl Builder {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            text: String::new(),
        }
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            self.nodes.push(MathNode::text(std::mem::take(&mut self.text)));
        }
    }

    fn push(&mut self, node: MathNode) {
        self.flush();
        self.nodes.push(node);
    }

    /// Take the base for a script: the last symbol, or the last node.
    fn take_base(&mut self) -> Vec<MathNode> {
        if let Some(c) = self.text.pop() {
            return vec![MathNode::text(c.to_string())];
        }
        match self.nodes.pop() {
            Some(node) => vec![node],
            None => Vec::new(),
        }
    }

    fn finish(mut self) -> Vec<MathNode> {
        self.flush();
        self.nodes
    }
}

fn parse_sequence(chars: &mut Peekable<Chars<'_>>, in_group: bool) -> Vec<MathNode> {
    let mut out = Builder::new();

    while let Some(c) = chars.next() {
        match c {
            '}' if in_group => break,
            '{' => {
                let inner = parse_sequence(chars, true);
                out.flush();
                out.nodes.extend(inner);
            }
            '\\' => parse_command(chars, &mut out),
            '^' | '_' => {
                let base = out.take_base();
                let script = parse_argument(chars);
                let node = attach_script(base, c, script);
                out.push(node);
            }
            c => out.text.push(c),
        }
    }

    out.finish()
}

fn attach_script(mut base: Vec<MathNode>, marker: char, script: Vec<MathNode>) -> MathNode {
    if marker == '_' {
        return MathNode::Sub { base, sub: script };
    }
    // x_{i}^{2}: fold the exponent onto the preceding subscript.
    if base.len() == 1 && matches!(base[0], MathNode::Sub { .. }) {
        if let Some(MathNode::Sub { base, sub }) = base.pop() {
            return MathNode::SubSup {
                base,
                sub,
                sup: script,
            };
        }
    }
    MathNode::Sup { base, sup: script }
}

fn parse_command(chars: &mut Peekable<Chars<'_>>, out: &mut Builder) {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphabetic() {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }

    if name.is_empty() {
        // Escaped symbol or spacing command.
        match chars.next() {
            Some('{') => out.text.push('{'),
            Some('}') => out.text.push('}'),
            Some('%') => out.text.push('%'),
            Some('$') => out.text.push('$'),
            Some(',') | Some(';') | Some(' ') | Some(':') | Some('!') => out.text.push(' '),
            Some(other) => out.push(MathNode::Literal {
                text: format!("\\{}", other),
            }),
            None => out.push(MathNode::Literal {
                text: "\\".to_string(),
            }),
        }
        return;
    }

    if matches!(name.as_str(), "frac" | "dfrac" | "tfrac") {
        skip_whitespace(chars);
        if chars.peek() == Some(&'{') {
            let num = parse_argument(chars);
            skip_whitespace(chars);
            if chars.peek() == Some(&'{') {
                let den = parse_argument(chars);
                out.push(MathNode::Fraction { num, den });
                return;
            }
            out.push(MathNode::Literal {
                text: format!("\\{}", name),
            });
            out.flush();
            out.nodes.extend(num);
            return;
        }
        out.push(MathNode::Literal {
            text: format!("\\{}", name),
        });
        return;
    }

    if is_text_wrapper(&name) {
        skip_whitespace(chars);
        if chars.peek() == Some(&'{') {
            let inner = parse_argument(chars);
            out.flush();
            out.nodes.extend(inner);
            return;
        }
    }

    match symbol_for(&name) {
        Some(symbol) => out.text.push_str(symbol),
        None => out.push(MathNode::Literal {
            text: format!("\\{}", name),
        }),
    }
}

/// A braced group, or the single following token.
fn parse_argument(chars: &mut Peekable<Chars<'_>>) -> Vec<MathNode> {
    skip_whitespace(chars);
    match chars.peek().copied() {
        Some('{') => {
            chars.next();
            parse_sequence(chars, true)
        }
        Some('\\') => {
            chars.next();
            let mut single = Builder::new();
            parse_command(chars, &mut single);
            single.finish()
        }
        Some(c) => {
            chars.next();
            vec![MathNode::text(c.to_string())]
        }
        None => Vec::new(),
    }
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}
