//! Integration tests for page tree building from OCR JSON.

use proptest::prelude::*;
use redocx::build::{
    default_style, resolve_style, BuildOptions, PageBuilder, PageSource, StyleTable,
};
use redocx::model::{
    Alignment, BorderStyle, EffectiveStyle, FontFamily, NativeLabel, Node, Page, Region, Rgb,
    StructuralLabel, StyleOverride,
};

fn build(regions: &str, styles: Option<&str>) -> Page {
    let source = PageSource::from_json(regions, styles).unwrap();
    let options = BuildOptions::default();
    PageBuilder::new(&options).build(1, &source).page
}

fn kinds(page: &Page) -> Vec<&'static str> {
    page.nodes.iter().map(Node::kind).collect()
}

#[test]
fn test_title_override_keeps_default_size() {
    let page = build(
        r#"[{"index": 0, "label": "text", "native_label": "doc_title", "content": "Report"}]"#,
        Some(r#"[{"region_index": 0, "alignment": "right"}]"#),
    );

    match &page.nodes[0] {
        Node::Heading(h) => {
            assert_eq!(h.level, 1);
            assert_eq!(h.style.alignment, Alignment::Right);
            assert_eq!(h.runs[0].style.font_size, 18.0);
        }
        other => panic!("expected heading, got {}", other.kind()),
    }
}

#[test]
fn test_short_and_expanded_style_names_agree() {
    let region = Region::text(3, "x");
    let short = StyleTable::from_json(r#"[{"i": 3, "fs": 14, "b": true, "c": [255, 0, 0]}]"#)
        .unwrap();
    let long = StyleTable::from_json(
        r#"[{"region_index": 3, "font_size_pt": 14, "bold": true, "color_rgb": [255, 0, 0]}]"#,
    )
    .unwrap();

    assert_eq!(short.resolve(&region), long.resolve(&region));
    let style = short.resolve(&region);
    assert_eq!(style.font_size, 14.0);
    assert!(style.bold);
    assert_eq!(style.color, Rgb(255, 0, 0));
}

#[test]
fn test_absent_fields_stay_default() {
    let region = Region::text(0, "x");
    let defaults = resolve_style(&region, None);
    let override_ = StyleOverride {
        space_after: Some(4.0),
        ..Default::default()
    };
    let resolved = resolve_style(&region, Some(&override_));

    assert_eq!(resolved.space_after, 4.0);
    assert_eq!(
        resolved,
        EffectiveStyle {
            space_after: 4.0,
            ..defaults
        }
    );
}

#[test]
fn test_side_by_side_columns() {
    let page = build(
        r#"[
            {"index": 0, "label": "text", "bbox_2d": [100, 200, 400, 260], "content": "left one\nleft two"},
            {"index": 1, "label": "text", "bbox_2d": [500, 210, 900, 270], "content": "right"}
        ]"#,
        None,
    );

    assert_eq!(kinds(&page), vec!["side_by_side"]);
    match &page.nodes[0] {
        Node::SideBySide(group) => {
            assert_eq!(group.columns.len(), 2);
            assert_eq!(group.columns[0].len(), 2);
            assert_eq!(group.row_count(), 2);
            assert_eq!(group.columns[1][0].plain_text(), "right");
        }
        other => panic!("expected side-by-side group, got {}", other.kind()),
    }
}

#[test]
fn test_emission_order_is_fixed() {
    let page = build(
        r#"[
            {"index": 0, "label": "text", "bbox_2d": [100, 100, 400, 150], "content": "left"},
            {"index": 1, "label": "text", "bbox_2d": [600, 110, 900, 160], "content": "right"},
            {"index": 2, "label": "text", "bbox_2d": [100, 400, 900, 500], "content": "boxed"},
            {"index": 3, "label": "image", "bbox_2d": [300, 420, 700, 480]},
            {"index": 4, "label": "text", "content": "flowing"}
        ]"#,
        Some(r#"{"2": {"tb": true, "bd": true}}"#),
    );

    assert_eq!(
        kinds(&page),
        vec!["paragraph", "side_by_side", "text_frame", "image"]
    );
    match &page.nodes[2] {
        Node::TextFrame(frame) => {
            assert!(frame.border);
            assert_eq!(frame.paragraphs[0].plain_text(), "boxed");
        }
        other => panic!("expected text frame, got {}", other.kind()),
    }
    match &page.nodes[3] {
        Node::Image(image) => {
            assert!(image.floating);
            assert_eq!(image.asset.relative_path(), "imgs/cropped_page0_idx0.jpg");
        }
        other => panic!("expected image, got {}", other.kind()),
    }
}

#[test]
fn test_table_cell_cascade() {
    let markup = "<table>\
        <tr><th>A</th><th>B</th><th>C</th><th>D</th></tr>\
        <tr><td>1</td><td>2</td><td>3</td><td>4</td></tr>\
        <tr><td>5</td><td>6</td><td>7</td><td>Revenue grew 12% in Q3</td></tr>\
        </table>";
    let regions = serde_json::json!([
        {"index": 0, "label": "table", "native_label": "table", "bbox_2d": [0, 0, 1000, 300], "content": markup}
    ])
    .to_string();
    let styles = r#"[{"i": 0, "cell_overrides": {
        "row_colors": [{"row": 2, "bg": [200, 200, 200], "c": [0, 0, 255]}],
        "cell_colors": [{"row": 2, "col": 3, "c": [255, 0, 0]}],
        "keyword_styles": [{"row": 2, "col": 3, "keyword": "12%", "bold": true, "text_bg": [255, 255, 0]}]
    }}]"#;

    let page = build(&regions, Some(styles));
    let table = match &page.nodes[0] {
        Node::Table(t) => t,
        other => panic!("expected table, got {}", other.kind()),
    };
    assert_eq!((table.rows, table.columns), (3, 4));
    assert!(table.header_row);

    let cell = table.cell_at(2, 3).unwrap();
    assert_eq!(cell.background, Some(Rgb(200, 200, 200)));
    assert_eq!(cell.color, Rgb(255, 0, 0));

    let texts: Vec<&str> = cell.runs.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["Revenue grew ", "12%", " in Q3"]);
    assert_eq!(cell.runs[1].style.highlight, Some(Rgb(255, 255, 0)));
    assert!(cell.runs[1].style.bold);
    assert_eq!(texts.concat(), cell.text);

    let neighbor = table.cell_at(2, 0).unwrap();
    assert_eq!(neighbor.color, Rgb(0, 0, 255));
}

#[test]
fn test_inline_math_cleaned_outside_formulas() {
    let page = build(
        r#"[
            {"index": 0, "label": "text", "native_label": "text", "content": "$\\frac{a}{b}$"},
            {"index": 1, "label": "formula", "native_label": "display_formula", "content": "$\\frac{a}{b}$"}
        ]"#,
        None,
    );

    match (&page.nodes[0], &page.nodes[1]) {
        (Node::Paragraph(text), Node::Paragraph(formula)) => {
            assert_eq!(text.plain_text(), "a/b");
            assert!(!text.is_formula());
            assert_eq!(formula.math_source.as_deref(), Some(r"$\frac{a}{b}$"));
        }
        _ => panic!("expected two paragraphs"),
    }
}

#[test]
fn test_bad_regions_are_skipped() {
    let page = build(
        r#"[
            {"index": 0, "label": "table", "content": "<p>no rows</p>"},
            {"index": 1, "label": "chart", "content": "ignored"},
            {"index": 2, "label": "text", "content": "   "},
            {"index": 3, "label": "text", "content": "kept"}
        ]"#,
        Some(r#"[{"i": 3, "fs": "large"}, {"no_index": true}]"#),
    );

    assert_eq!(kinds(&page), vec!["paragraph"]);
    assert_eq!(page.plain_text(), "kept");
}

#[test]
fn test_null_content_does_not_fail_page() {
    let page = build(
        r#"[
            {"index": 0, "label": "text", "content": "ok"},
            {"index": 1, "label": "image", "bbox_2d": [100, 300, 600, 500], "content": null},
            {"index": 2, "label": "text", "content": null}
        ]"#,
        None,
    );

    assert_eq!(kinds(&page), vec!["paragraph", "image"]);
    assert_eq!(page.nodes[0].plain_text(), "ok");
}

fn rgb() -> impl Strategy<Value = Rgb> {
    any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Rgb(r, g, b))
}

fn style_override() -> impl Strategy<Value = StyleOverride> {
    let text = (
        prop::option::of(1.0f32..72.0),
        prop::option::of(any::<bool>()),
        prop::option::of(prop::sample::select(vec![
            Alignment::Left,
            Alignment::Center,
            Alignment::Right,
            Alignment::Justify,
        ])),
        prop::option::of(rgb()),
        prop::option::of(rgb()),
        prop::option::of(prop::sample::select(vec![
            FontFamily::Serif,
            FontFamily::Sans,
            FontFamily::Mono,
        ])),
        prop::option::of(0.0f32..48.0),
    );
    let layout = (
        prop::option::of(0.0f32..48.0),
        prop::option::of(0.5f32..3.0),
        prop::option::of(any::<bool>()),
        prop::option::of(prop::sample::select(vec![
            BorderStyle::Single,
            BorderStyle::Double,
            BorderStyle::None,
        ])),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
    );
    (text, layout).prop_map(
        |(
            (font_size, bold, alignment, color, background, font_family, space_before),
            (space_after, line_spacing, table_header, border_style, text_box, border),
        )| StyleOverride {
            font_size,
            bold,
            alignment,
            color,
            background,
            font_family,
            space_before,
            space_after,
            line_spacing,
            table_header,
            border_style,
            text_box,
            border,
            cell_overrides: None,
        },
    )
}

proptest! {
    #[test]
    fn prop_override_replaces_exactly_present_fields(
        label in prop::sample::select(vec![
            "doc_title",
            "paragraph_title",
            "text",
            "figure_title",
            "vision_footnote",
        ]),
        o in style_override(),
    ) {
        let region = Region::new(0, StructuralLabel::Text, NativeLabel::from(label));
        let defaults = default_style(&region.native_label);
        let resolved = resolve_style(&region, Some(&o));

        let expected = EffectiveStyle {
            font_size: o.font_size.unwrap_or(defaults.font_size),
            bold: o.bold.unwrap_or(defaults.bold),
            alignment: o.alignment.unwrap_or(defaults.alignment),
            color: o.color.unwrap_or(defaults.color),
            background: o.background.or(defaults.background),
            font_family: o.font_family.unwrap_or(defaults.font_family),
            space_before: o.space_before.unwrap_or(defaults.space_before),
            space_after: o.space_after.unwrap_or(defaults.space_after),
            line_spacing: o.line_spacing.unwrap_or(defaults.line_spacing),
            table_header: o.table_header.unwrap_or(defaults.table_header),
            border_style: o.border_style.unwrap_or(defaults.border_style),
            text_box: o.text_box.unwrap_or(defaults.text_box),
            border: o.border.unwrap_or(defaults.border),
            ..defaults.clone()
        };
        prop_assert_eq!(&resolved, &expected);

        if label == "doc_title" && o.bold.is_none() {
            prop_assert!(resolved.bold);
        }
        if o.is_empty() {
            prop_assert_eq!(&resolved, &defaults);
        }
    }
}
