//! Style resolution: native-label defaults plus per-region overrides.

use crate::error::Result;
use crate::model::{Alignment, EffectiveStyle, NativeLabel, Region, StyleOverride};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Expanded field name and its short spelling.
const FIELD_ALIASES: &[(&str, &str)] = &[
    ("font_size_pt", "fs"),
    ("bold", "b"),
    ("alignment", "a"),
    ("color_rgb", "c"),
    ("bg_rgb", "bg"),
    ("font_family", "ff"),
    ("space_before_pt", "sb"),
    ("space_after_pt", "sa"),
    ("line_spacing", "ls"),
    ("table_header", "th"),
    ("border_style", "bs"),
    ("text_box", "tb"),
    ("border", "bd"),
    ("region_index", "i"),
];

/// Default style for a native label; unknown labels use the body text row.
pub fn default_style(label: &NativeLabel) -> EffectiveStyle {
    match label {
        NativeLabel::DocTitle => EffectiveStyle::body(18.0)
            .bold()
            .aligned(Alignment::Center)
            .spaced(12.0, 6.0),
        NativeLabel::ParagraphTitle => EffectiveStyle::body(14.0).bold().spaced(12.0, 6.0),
        NativeLabel::FigureTitle => EffectiveStyle::body(10.0).aligned(Alignment::Center),
        NativeLabel::VisionFootnote | NativeLabel::ReferenceContent | NativeLabel::Table => {
            EffectiveStyle::body(9.0)
        }
        NativeLabel::DisplayFormula => EffectiveStyle::body(11.0)
            .aligned(Alignment::Center)
            .spaced(6.0, 6.0),
        NativeLabel::Text
        | NativeLabel::InlineFormula
        | NativeLabel::Abstract
        | NativeLabel::VerticalText
        | NativeLabel::Other(_) => EffectiveStyle::body(11.0),
    }
}

/// Resolve a region's effective style.
pub fn resolve_style(region: &Region, style: Option<&StyleOverride>) -> EffectiveStyle {
    let defaults = default_style(&region.native_label);
    match style {
        Some(o) => o.apply(defaults),
        None => defaults,
    }
}

/// Style overrides for one page, keyed by region index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleTable {
    entries: HashMap<u32, StyleOverride>,
}

impl StyleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse style hints.
    ///
    /// Accepts a list of entries carrying `region_index` (or `i`), or an
    /// object keyed by region index. Malformed entries are skipped with a
    /// warning; only invalid JSON is an error.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(value))
    }

    /// Build a table from already-parsed JSON.
    pub fn from_value(value: Value) -> Self {
        let mut table = Self::new();
        match value {
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(mut map) => {
                            normalize_fields(&mut map);
                            match map.remove("region_index").and_then(|v| index_of(&v)) {
                                Some(index) => table.insert_value(index, Value::Object(map)),
                                None => log::warn!("Style entry without region index skipped"),
                            }
                        }
                        other => log::warn!("Style entry is not an object: {}", other),
                    }
                }
            }
            Value::Object(map) => {
                for (key, item) in map {
                    match key.trim().parse::<u32>() {
                        Ok(index) => {
                            let item = match item {
                                Value::Object(mut inner) => {
                                    normalize_fields(&mut inner);
                                    inner.remove("region_index");
                                    Value::Object(inner)
                                }
                                other => other,
                            };
                            table.insert_value(index, item);
                        }
                        Err(_) => log::warn!("Style key '{}' is not a region index", key),
                    }
                }
            }
            Value::Null => {}
            other => log::warn!("Unexpected style document: {}", other),
        }
        table
    }

    fn insert_value(&mut self, index: u32, value: Value) {
        let value = match value {
            Value::Object(map) => Value::Object(parsable_fields(index, map)),
            other => other,
        };
        match serde_json::from_value::<StyleOverride>(value) {
            Ok(style) => {
                self.entries.insert(index, style);
            }
            Err(e) => log::warn!("Style entry for region {} skipped: {}", index, e),
        }
    }

    /// Insert or replace an override.
    pub fn insert(&mut self, region_index: u32, style: StyleOverride) {
        self.entries.insert(region_index, style);
    }

    /// Get the override for a region.
    pub fn get(&self, region_index: u32) -> Option<&StyleOverride> {
        self.entries.get(&region_index)
    }

    /// Resolve a region's effective style.
    pub fn resolve(&self, region: &Region) -> EffectiveStyle {
        resolve_style(region, self.get(region.index))
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no overrides.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(u32, StyleOverride)> for StyleTable {
    fn from_iter<I: IntoIterator<Item = (u32, StyleOverride)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Rename short field names to their expanded form; expanded wins.
fn normalize_fields(map: &mut Map<String, Value>) {
    for (expanded, short) in FIELD_ALIASES {
        if let Some(value) = map.remove(*short) {
            if !map.contains_key(*expanded) {
                map.insert((*expanded).to_string(), value);
            }
        }
    }
}

/// Keep only the fields that parse on their own; a bad field is dropped
/// with a warning and its siblings still apply.
fn parsable_fields(index: u32, map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter(|(key, value)| {
            let mut single = Map::new();
            single.insert(key.clone(), value.clone());
            match serde_json::from_value::<StyleOverride>(Value::Object(single)) {
                Ok(_) => true,
                Err(e) => {
                    log::warn!("Style field '{}' for region {} skipped: {}", key, index, e);
                    false
                }
            }
        })
        .collect()
}

fn index_of(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
