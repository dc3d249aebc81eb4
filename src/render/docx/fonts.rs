//! Generic family to concrete Latin/CJK font pairs.

use crate::model::{FontFamily, PageGeometry};

/// Latin and CJK face names for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontPair<'a> {
    /// Face for Latin text (`w:ascii`, `w:hAnsi`)
    pub latin: &'a str,
    /// Face for CJK text (`w:eastAsia`)
    pub cjk: &'a str,
}

impl FontPair<'static> {
    /// Concrete faces for a generic family.
    pub fn for_family(family: FontFamily) -> Self {
        match family {
            FontFamily::Serif => FontPair {
                latin: "Times New Roman",
                cjk: "SimSun",
            },
            FontFamily::Sans => FontPair {
                latin: "Arial",
                cjk: "SimHei",
            },
            FontFamily::Mono => FontPair {
                latin: "Courier New",
                cjk: "SimSun",
            },
        }
    }
}

/// Faces for a paragraph: its family if set, else the page defaults.
pub fn resolve_fonts(family: Option<FontFamily>, geometry: &PageGeometry) -> FontPair<'_> {
    match family {
        Some(family) => FontPair::for_family(family),
        None => FontPair {
            latin: &geometry.font_latin,
            cjk: &geometry.font_cjk,
        },
    }
}

/// Check for CJK ideographs or CJK punctuation.
pub fn has_cjk(text: &str) -> bool {
    text.chars()
        .any(|c| ('\u{4E00}'..='\u{9FFF}').contains(&c) || ('\u{3000}'..='\u{303F}').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_mapping() {
        assert_eq!(FontPair::for_family(FontFamily::Sans).cjk, "SimHei");
        assert_eq!(FontPair::for_family(FontFamily::Mono).latin, "Courier New");
    }

    #[test]
    fn test_page_defaults_without_family() {
        let mut geometry = PageGeometry::a4();
        geometry.font_latin = "Calibri".to_string();
        let fonts = resolve_fonts(None, &geometry);
        assert_eq!(fonts.latin, "Calibri");
        assert_eq!(fonts.cjk, "SimSun");
        assert_eq!(
            resolve_fonts(Some(FontFamily::Serif), &geometry).latin,
            "Times New Roman"
        );
    }

    #[test]
    fn test_has_cjk() {
        assert!(has_cjk("报告"));
        assert!(has_cjk("a、b"));
        assert!(!has_cjk("Report"));
        assert!(!has_cjk("한국어"));
    }
}
