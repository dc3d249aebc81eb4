//! Math notation detection, cleaning, and validation.
//!
//! OCR output wraps notation in LaTeX. Formula regions keep it verbatim for
//! equation rendering; everywhere else the markup is an artifact and is
//! rewritten into plain text.

mod expr;

pub use expr::{parse_expression, MathNode};

use crate::model::NativeLabel;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Command tokens that mark content as mathematical.
pub const MATH_INDICATORS: &[&str] = &[
    r"\frac", r"\sum", r"\int", r"\prod", r"\sqrt", r"\alpha", r"\beta", r"\gamma", r"\delta",
    r"\pi", r"\times", r"\div", r"\pm", r"\leq", r"\geq", r"\infty", r"\partial", r"\nabla",
    r"\cdot",
];

/// Font used for equation text and literal fallbacks.
pub const MATH_FONT: &str = "Cambria Math";

/// Upper bound on cleaning passes.
const MAX_CLEAN_PASSES: usize = 16;

/// Matches kept per artifact kind.
const MAX_ARTIFACT_MATCHES: usize = 3;

static INLINE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[^$]+\$").expect("Invalid inline span regex"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static CLEAN_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\$\s*([^$]+?)\s*\$", "${1}"),
        (r"\^\{\s*\\mathrm\s*\{\s*([^}]+)\s*\}\s*\}", "${1}"),
        (r"\^\{\s*([^}]+)\s*\}", "${1}"),
        (r"_\{\s*([^}]+)\s*\}", "${1}"),
        (r"\\(?:mathrm|textbf|textit|text)\s*\{\s*([^}]+)\s*\}", "${1}"),
        (
            r"\\frac\s*\{\s*([^}]+)\s*\}\s*\{\s*([^}]+)\s*\}",
            "${1}/${2}",
        ),
        (r"\$\s*", ""),
        (r"\s*\$", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("Invalid cleaning regex"),
            replacement,
        )
    })
    .collect()
});

static ARTIFACT_RULES: Lazy<Vec<(ArtifactKind, Regex)>> = Lazy::new(|| {
    [
        (ArtifactKind::InlineMath, r"\$[^$]+\$"),
        (ArtifactKind::Command, r"\\[a-zA-Z]+\s*\{"),
        (ArtifactKind::Fraction, r"\\frac\s*\{"),
        (ArtifactKind::Mathrm, r"\\mathrm\s*\{"),
        (ArtifactKind::Superscript, r"\^\s*\{"),
        (ArtifactKind::Subscript, r"_\s*\{"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("Invalid artifact regex")))
    .collect()
});

/// Kind of leftover notation found in non-formula text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// `$...$` delimiters
    InlineMath,
    /// Any `\command{`
    Command,
    /// `\frac{`
    Fraction,
    /// `\mathrm{`
    Mathrm,
    /// `^{`
    Superscript,
    /// `_{`
    Subscript,
}

impl ArtifactKind {
    /// Stable name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::InlineMath => "latex_inline",
            ArtifactKind::Command => "latex_command",
            ArtifactKind::Fraction => "latex_frac",
            ArtifactKind::Mathrm => "latex_mathrm",
            ArtifactKind::Superscript => "latex_superscript",
            ArtifactKind::Subscript => "latex_subscript",
        }
    }
}

/// Leftover notation recorded for manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotationIssue {
    /// Page number (1-indexed)
    pub page: u32,
    /// Region index within the page
    pub region_index: u32,
    /// Kind of artifact
    pub kind: ArtifactKind,
    /// First few matching snippets
    pub matches: Vec<String>,
}

/// Region text after math handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedText {
    /// Cleaned text, or the original notation for math content
    pub text: String,
    /// Content is mathematical and should render as an equation
    pub is_math: bool,
}

/// Check for indicator tokens outside inline `$...$` spans.
///
/// Inline-delimited notation inside prose is an OCR artifact; only bare
/// commands mark a region as an equation.
pub fn contains_math_indicators(content: &str) -> bool {
    let bare = INLINE_SPAN.replace_all(content, " ");
    MATH_INDICATORS.iter().any(|token| bare.contains(token))
}

/// Check whether a region's content is mathematical.
pub fn is_mathematical(content: &str, native_label: &NativeLabel) -> bool {
    native_label.is_formula() || contains_math_indicators(content)
}

/// Remove notation artifacts until the text stops changing, then collapse
/// whitespace.
pub fn clean_notation(text: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..MAX_CLEAN_PASSES {
        let mut next = current.clone();
        for (pattern, replacement) in CLEAN_RULES.iter() {
            next = pattern.replace_all(&next, *replacement).into_owned();
        }
        if next == current {
            break;
        }
        current = next;
    }
    WHITESPACE.replace_all(&current, " ").trim().to_string()
}

/// Classify and, for non-math content, clean a region's text.
pub fn prepare_content(content: &str, native_label: &NativeLabel) -> PreparedText {
    if is_mathematical(content, native_label) {
        PreparedText {
            text: content.to_string(),
            is_math: true,
        }
    } else {
        PreparedText {
            text: clean_notation(content),
            is_math: false,
        }
    }
}

/// Find notation that survived cleaning.
pub fn find_artifacts(text: &str) -> Vec<(ArtifactKind, Vec<String>)> {
    ARTIFACT_RULES
        .iter()
        .filter_map(|(kind, pattern)| {
            let matches: Vec<String> = pattern
                .find_iter(text)
                .take(MAX_ARTIFACT_MATCHES)
                .map(|m| m.as_str().to_string())
                .collect();
            (!matches.is_empty()).then_some((*kind, matches))
        })
        .collect()
}
