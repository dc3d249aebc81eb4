//! Floating layout detection.
//!
//! Regions are claimed in three layers: text boxes first, then side-by-side
//! clusters among what is left, then everything else flows. A region claimed
//! by an earlier layer is never looked at again.
//!
//! Text boxes only ever group text regions. Images get a layer of their own:
//! an image whose bbox center lies inside a text-box group's union box is
//! lifted out of flow and emitted after the frames, anchored at its own page
//! offset. Images outside every group stay inline in flow.

use crate::model::{BBox, Region, StructuralLabel};
use std::collections::HashSet;

/// Detection thresholds in normalized units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingConfig {
    /// Minimum overlap, as a fraction of the narrower width, to stack text boxes
    pub textbox_min_overlap: f32,

    /// Maximum vertical gap between stacked text boxes (exclusive)
    pub textbox_max_gap: f32,

    /// Maximum difference of top edges for side-by-side regions (exclusive)
    pub side_by_side_max_dy: f32,
}

impl Default for FloatingConfig {
    fn default() -> Self {
        Self {
            textbox_min_overlap: 0.5,
            textbox_max_gap: 80.0,
            side_by_side_max_dy: 50.0,
        }
    }
}

/// Result of classifying one page's regions.
#[derive(Debug, Clone, Default)]
pub struct FloatingLayout<'a> {
    /// Text-box groups, each sorted top to bottom
    pub text_boxes: Vec<Vec<&'a Region>>,

    /// Side-by-side clusters in (top, left) order; singletons included
    pub side_by_side: Vec<Vec<&'a Region>>,

    /// Image regions anchored inside a text-box group, in original order
    pub floating_images: Vec<&'a Region>,

    /// Unclaimed regions in original order
    pub flow: Vec<&'a Region>,
}

impl<'a> FloatingLayout<'a> {
    /// Classify regions. `is_text_box` reports the boxed flag of a region's
    /// effective style.
    pub fn detect(
        regions: &'a [Region],
        is_text_box: impl Fn(&Region) -> bool,
        config: &FloatingConfig,
    ) -> Self {
        let boxed: Vec<&Region> = regions
            .iter()
            .filter(|r| r.is_text() && r.bbox.is_some() && is_text_box(r))
            .collect();
        let text_boxes = group_text_boxes(boxed, config);

        let mut claimed: HashSet<u32> = text_boxes
            .iter()
            .flatten()
            .map(|r| r.index)
            .collect();

        let candidates: Vec<&Region> = regions
            .iter()
            .filter(|r| r.is_text() && r.bbox.is_some() && !claimed.contains(&r.index))
            .collect();
        let flagged = detect_side_by_side(&candidates, config);
        let side_by_side = chain_side_by_side(flagged, config);
        claimed.extend(side_by_side.iter().flatten().map(|r| r.index));

        let frames: Vec<BBox> = text_boxes
            .iter()
            .filter_map(|group| BBox::union_all(group.iter().filter_map(|r| r.bbox.as_ref())))
            .collect();
        let floating_images: Vec<&Region> = regions
            .iter()
            .filter(|r| r.label == StructuralLabel::Image)
            .filter(|r| {
                r.bbox.is_some_and(|b| {
                    let (cx, cy) = ((b.x1 + b.x2) / 2.0, (b.y1 + b.y2) / 2.0);
                    frames
                        .iter()
                        .any(|f| (f.x1..=f.x2).contains(&cx) && (f.y1..=f.y2).contains(&cy))
                })
            })
            .collect();
        claimed.extend(floating_images.iter().map(|r| r.index));

        let flow = regions
            .iter()
            .filter(|r| !claimed.contains(&r.index))
            .collect();

        if !text_boxes.is_empty() || !side_by_side.is_empty() {
            log::debug!(
                "Floating layout: {} text-box group(s), {} side-by-side group(s)",
                text_boxes.len(),
                side_by_side.len()
            );
        }

        Self {
            text_boxes,
            side_by_side,
            floating_images,
            flow,
        }
    }

    /// Check whether a region was claimed by a floating layer.
    pub fn is_floating(&self, region_index: u32) -> bool {
        self.text_boxes
            .iter()
            .chain(self.side_by_side.iter())
            .flatten()
            .chain(self.floating_images.iter())
            .any(|r| r.index == region_index)
    }
}

fn bbox(region: &Region) -> BBox {
    region.bbox.unwrap_or(BBox::new(0.0, 0.0, 0.0, 0.0))
}

fn by_top_left(a: &&Region, b: &&Region) -> std::cmp::Ordering {
    let (ba, bb) = (bbox(a), bbox(b));
    ba.y1
        .total_cmp(&bb.y1)
        .then_with(|| ba.x1.total_cmp(&bb.x1))
}

/// Stack boxed regions. A candidate joins the first group containing any
/// member it overlaps horizontally and sits just below.
fn group_text_boxes<'a>(
    mut boxed: Vec<&'a Region>,
    config: &FloatingConfig,
) -> Vec<Vec<&'a Region>> {
    boxed.sort_by(by_top_left);

    let mut groups: Vec<Vec<&'a Region>> = Vec::new();
    for region in boxed {
        let b = bbox(region);
        let target = groups.iter().position(|group| {
            group.iter().any(|member| {
                let m = bbox(member);
                let min_width = b.width().min(m.width());
                let overlap = if min_width > 0.0 {
                    b.horizontal_overlap(&m) / min_width
                } else {
                    0.0
                };
                let gap = b.y1 - m.y2;
                overlap > config.textbox_min_overlap
                    && (0.0..config.textbox_max_gap).contains(&gap)
            })
        });
        match target {
            Some(i) => groups[i].push(region),
            None => groups.push(vec![region]),
        }
    }

    for group in &mut groups {
        group.sort_by(|a, b| bbox(a).y1.total_cmp(&bbox(b).y1));
    }
    groups
}

/// Regions with a horizontally disjoint partner starting at about the same
/// height.
fn detect_side_by_side<'a>(
    candidates: &[&'a Region],
    config: &FloatingConfig,
) -> Vec<&'a Region> {
    candidates
        .iter()
        .enumerate()
        .filter(|(i, region)| {
            let b = bbox(region);
            candidates.iter().enumerate().any(|(j, other)| {
                let o = bbox(other);
                *i != j
                    && (b.y1 - o.y1).abs() < config.side_by_side_max_dy
                    && b.is_horizontally_disjoint(&o)
            })
        })
        .map(|(_, region)| *region)
        .collect()
}

/// Chain flagged regions in (top, left) order, comparing each only with the
/// previous member of the current group.
fn chain_side_by_side<'a>(
    mut flagged: Vec<&'a Region>,
    config: &FloatingConfig,
) -> Vec<Vec<&'a Region>> {
    flagged.sort_by(by_top_left);

    let mut groups: Vec<Vec<&'a Region>> = Vec::new();
    for region in flagged {
        let joins = groups
            .last()
            .and_then(|group| group.last())
            .is_some_and(|prev| (bbox(prev).y1 - bbox(region).y1).abs() < config.side_by_side_max_dy);
        match groups.last_mut() {
            Some(group) if joins => group.push(region),
            _ => groups.push(vec![region]),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NativeLabel;

    fn text(index: u32, b: [f32; 4]) -> Region {
        Region::text(index, format!("r{}", index)).with_bbox(b)
    }

    fn indices(group: &[&Region]) -> Vec<u32> {
        group.iter().map(|r| r.index).collect()
    }

    #[test]
    fn test_two_columns_grouped() {
        let regions = vec![
            text(0, [100.0, 200.0, 400.0, 260.0]),
            text(1, [500.0, 210.0, 900.0, 270.0]),
        ];
        let layout = FloatingLayout::detect(&regions, |_| false, &FloatingConfig::default());
        assert_eq!(layout.side_by_side.len(), 1);
        assert_eq!(indices(&layout.side_by_side[0]), vec![0, 1]);
        assert!(layout.flow.is_empty());
        assert!(layout.is_floating(0));
    }

    #[test]
    fn test_stacked_regions_flow() {
        let regions = vec![
            text(0, [100.0, 100.0, 900.0, 150.0]),
            text(1, [100.0, 300.0, 900.0, 350.0]),
        ];
        let layout = FloatingLayout::detect(&regions, |_| false, &FloatingConfig::default());
        assert!(layout.side_by_side.is_empty());
        assert_eq!(indices(&layout.flow), vec![0, 1]);
    }

    #[test]
    fn test_text_boxes_stack_against_any_member() {
        // 2 sits under 0 but far below 1; it still joins the group through 0.
        let regions = vec![
            text(0, [100.0, 100.0, 300.0, 200.0]),
            text(1, [120.0, 220.0, 320.0, 400.0]),
            text(2, [110.0, 250.0, 290.0, 270.0]),
            text(3, [700.0, 100.0, 900.0, 150.0]),
        ];
        let boxed = |r: &Region| r.index != 3;
        let layout = FloatingLayout::detect(&regions, boxed, &FloatingConfig::default());
        assert_eq!(layout.text_boxes.len(), 1);
        assert_eq!(indices(&layout.text_boxes[0]), vec![0, 1, 2]);
    }

    #[test]
    fn test_text_box_gap_bounds() {
        let regions = vec![
            text(0, [100.0, 100.0, 300.0, 200.0]),
            // Gap of exactly 80 starts a new group.
            text(1, [100.0, 280.0, 300.0, 300.0]),
        ];
        let layout = FloatingLayout::detect(&regions, |_| true, &FloatingConfig::default());
        assert_eq!(layout.text_boxes.len(), 2);
    }

    #[test]
    fn test_text_box_claims_are_final() {
        // 0 is boxed; 1 would pair with 0 side by side but has no other partner.
        let regions = vec![
            text(0, [100.0, 200.0, 400.0, 260.0]),
            text(1, [500.0, 210.0, 900.0, 270.0]),
        ];
        let layout =
            FloatingLayout::detect(&regions, |r| r.index == 0, &FloatingConfig::default());
        assert_eq!(layout.text_boxes.len(), 1);
        assert!(layout.side_by_side.is_empty());
        assert_eq!(indices(&layout.flow), vec![1]);
    }

    #[test]
    fn test_non_text_never_boxed() {
        let mut image = text(0, [100.0, 100.0, 300.0, 200.0]);
        image.label = StructuralLabel::Image;
        image.native_label = NativeLabel::from("image");
        let regions = vec![image];
        let layout = FloatingLayout::detect(&regions, |_| true, &FloatingConfig::default());
        assert!(layout.text_boxes.is_empty());
        assert_eq!(layout.flow.len(), 1);
    }

    #[test]
    fn test_side_by_side_single_link_chain() {
        // Tops at 100, 140, 180: each within 50 of the previous member only.
        let regions = vec![
            text(0, [0.0, 100.0, 200.0, 120.0]),
            text(1, [300.0, 140.0, 500.0, 160.0]),
            text(2, [600.0, 180.0, 800.0, 200.0]),
        ];
        let layout = FloatingLayout::detect(&regions, |_| false, &FloatingConfig::default());
        assert_eq!(layout.side_by_side.len(), 1);
        assert_eq!(indices(&layout.side_by_side[0]), vec![0, 1, 2]);
    }

    #[test]
    fn test_image_inside_text_box_floats() {
        let inside = Region::new(2, StructuralLabel::Image, NativeLabel::from("image"))
            .with_bbox([120.0, 120.0, 280.0, 180.0]);
        let outside = Region::new(3, StructuralLabel::Image, NativeLabel::from("image"))
            .with_bbox([500.0, 500.0, 700.0, 700.0]);
        let regions = vec![text(0, [100.0, 100.0, 300.0, 200.0]), inside, outside];
        let layout =
            FloatingLayout::detect(&regions, |r| r.index == 0, &FloatingConfig::default());
        assert_eq!(indices(&layout.floating_images), vec![2]);
        assert!(layout.is_floating(2));
        assert_eq!(indices(&layout.flow), vec![3]);
    }

    #[test]
    fn test_regions_without_bbox_flow() {
        let regions = vec![
            Region::text(0, "no box"),
            text(1, [0.0, 100.0, 200.0, 120.0]),
        ];
        let layout = FloatingLayout::detect(&regions, |_| true, &FloatingConfig::default());
        assert_eq!(indices(&layout.flow), vec![0]);
        assert_eq!(layout.text_boxes.len(), 1);
    }
}
