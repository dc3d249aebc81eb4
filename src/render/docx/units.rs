//! Length conversions between points, twips, EMU, and the normalized
//! 0-1000 page space.

use crate::model::{PageGeometry, NORMALIZED_EXTENT};

/// Twentieths of a point per point.
pub const TWIPS_PER_PT: f32 = 20.0;

/// English Metric Units per point.
pub const EMU_PER_PT: f32 = 12_700.0;

/// English Metric Units per inch.
pub const EMU_PER_INCH: f32 = 914_400.0;

/// Points to twips.
pub fn pt_to_twips(pt: f32) -> i64 {
    (pt * TWIPS_PER_PT).round() as i64
}

/// Centimeters to twips.
pub fn cm_to_twips(cm: f32) -> i64 {
    (cm / 2.54 * 1440.0).round() as i64
}

/// Inches to EMU.
pub fn inches_to_emu(inches: f32) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Points to EMU.
pub fn pt_to_emu(pt: f32) -> i64 {
    (pt * EMU_PER_PT).round() as i64
}

/// Normalized horizontal coordinate to points on this page.
pub fn norm_x_pt(x: f32, geometry: &PageGeometry) -> f32 {
    x / NORMALIZED_EXTENT * geometry.width_pt
}

/// Normalized vertical coordinate to points on this page.
pub fn norm_y_pt(y: f32, geometry: &PageGeometry) -> f32 {
    y / NORMALIZED_EXTENT * geometry.height_pt
}

/// Width between the side margins, in twips.
pub fn text_width_twips(geometry: &PageGeometry) -> i64 {
    let width = pt_to_twips(geometry.width_pt)
        - cm_to_twips(geometry.margins.left)
        - cm_to_twips(geometry.margins.right);
    width.max(1)
}

/// Usable image width in inches: the page width less a fixed margin budget.
pub fn usable_width_in(geometry: &PageGeometry, margin_budget_pt: f32) -> f32 {
    ((geometry.width_pt - margin_budget_pt) / 72.0).max(0.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_conversions() {
        assert_eq!(pt_to_twips(12.0), 240);
        assert_eq!(cm_to_twips(2.54), 1440);
        assert_eq!(cm_to_twips(1.27), 720);
        assert_eq!(inches_to_emu(1.0), 914_400);
        assert_eq!(pt_to_emu(72.0), 914_400);
    }

    #[test]
    fn test_normalized_coordinates() {
        let geometry = PageGeometry::with_size(600.0, 800.0);
        assert_eq!(norm_x_pt(500.0, &geometry), 300.0);
        assert_eq!(norm_y_pt(250.0, &geometry), 200.0);
        assert_eq!(pt_to_twips(norm_x_pt(1000.0, &geometry)), 12_000);
    }

    #[test]
    fn test_usable_widths() {
        let geometry = PageGeometry::with_size(612.0, 792.0);
        assert_eq!(usable_width_in(&geometry, 72.0), 7.5);
        // 612pt minus two 1.27cm margins
        assert_eq!(text_width_twips(&geometry), 12_240 - 1_440);
    }
}
