//! Inline emphasis markup to styled runs.

use crate::model::{Run, RunStyle};
use once_cell::sync::Lazy;
use regex::Regex;

/// Bold+italic, bold, italic, plain text, or a stray asterisk; first wins.
static EMPHASIS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*\*(.+?)\*\*\*|\*\*(.+?)\*\*|\*(.+?)\*|([^*]+)|(\*)")
        .expect("Invalid emphasis regex")
});

/// Split `**bold**`, `*italic*`, and `***both***` markup into runs.
///
/// Plain text takes its bold flag from `base` and is never italic. Marker
/// pairs are removed; an asterisk that closes nothing stays as text, so the
/// concatenated runs equal the input with paired markers removed.
pub fn split_runs(text: &str, base: &RunStyle) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();

    for caps in EMPHASIS.captures_iter(text) {
        let (piece, bold, italic) = if let Some(m) = caps.get(1) {
            (m.as_str(), true, true)
        } else if let Some(m) = caps.get(2) {
            (m.as_str(), true, false)
        } else if let Some(m) = caps.get(3) {
            (m.as_str(), false, true)
        } else if let Some(m) = caps.get(4).or_else(|| caps.get(5)) {
            (m.as_str(), base.bold, false)
        } else {
            continue;
        };

        let style = RunStyle {
            bold,
            italic,
            ..base.clone()
        };

        match runs.last_mut() {
            Some(last) if last.style == style && !italic && bold == base.bold => {
                last.text.push_str(piece);
            }
            _ => runs.push(Run::styled(piece, style)),
        }
    }

    runs
}

/// Apply a uniform style to every run, keeping each run's emphasis.
pub fn restyle(runs: &mut [Run], apply: impl Fn(&mut RunStyle)) {
    for run in runs {
        apply(&mut run.style);
    }
}
