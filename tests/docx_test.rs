//! Integration tests for DOCX assembly: open the package and inspect parts.

use redocx::build::PageSource;
use redocx::convert::{ConvertOptions, Converter};
use redocx::error::Error;
use redocx::model::{Page, PageGeometry, Paragraph};
use redocx::render::{DocxAssembler, RenderOptions};
use std::io::{Cursor, Read};
use std::path::Path;
use tempfile::TempDir;

fn convert(regions: &str, styles: Option<&str>, options: ConvertOptions) -> redocx::ConvertResult {
    let page = PageSource::from_json(regions, styles).unwrap();
    Converter::new(options.sequential()).to_docx(&[page]).unwrap()
}

fn part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn document_xml(bytes: &[u8]) -> String {
    part(bytes, "word/document.xml")
}

fn write_asset(dir: &Path, page_index: u32, counter: u32) {
    let imgs = dir.join("imgs");
    std::fs::create_dir_all(&imgs).unwrap();
    let path = imgs.join(format!("cropped_page{}_idx{}.jpg", page_index, counter));
    image::RgbImage::new(80, 40).save(path).unwrap();
}

#[test]
fn test_package_parts_present() {
    let result = convert(
        r#"[{"index": 0, "label": "text", "content": "Hello"}]"#,
        None,
        ConvertOptions::default(),
    );

    let archive = zip::ZipArchive::new(Cursor::new(result.bytes())).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    for expected in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/document.xml",
        "word/styles.xml",
        "word/_rels/document.xml.rels",
        "docProps/core.xml",
        "docProps/app.xml",
    ] {
        assert!(names.contains(&expected), "missing part {}", expected);
    }
    assert!(document_xml(result.bytes()).contains(">Hello</w:t>"));
}

#[test]
fn test_headings_use_heading_styles() {
    let result = convert(
        r#"[
            {"index": 0, "label": "text", "native_label": "doc_title", "content": "Title"},
            {"index": 1, "label": "text", "native_label": "paragraph_title", "content": "Section"}
        ]"#,
        None,
        ConvertOptions::default(),
    );

    let xml = document_xml(result.bytes());
    assert!(xml.contains("<w:pStyle w:val=\"Heading1\"/>"));
    assert!(xml.contains("<w:pStyle w:val=\"Heading2\"/>"));
    assert_eq!(result.stats().headings, 2);

    let styles = part(result.bytes(), "word/styles.xml");
    assert!(styles.contains("w:styleId=\"Heading1\""));
}

#[test]
fn test_merged_table_cells() {
    let markup = "<table><tr><th colspan=\"2\">Wide</th><th rowspan=\"2\">Tall</th></tr>\
                  <tr><td>a</td><td>b</td></tr></table>";
    let regions = serde_json::json!([
        {"index": 0, "label": "table", "native_label": "table", "bbox_2d": [100, 100, 900, 300], "content": markup}
    ])
    .to_string();
    let result = convert(&regions, Some(r#"[{"i": 0, "bs": "double"}]"#), ConvertOptions::default());

    let xml = document_xml(result.bytes());
    assert!(xml.contains("<w:tbl>"));
    assert!(xml.contains("<w:gridSpan w:val=\"2\"/>"));
    assert!(xml.contains("<w:vMerge w:val=\"restart\"/>"));
    assert!(xml.contains("<w:vMerge w:val=\"continue\"/>"));
    assert!(xml.contains("<w:tblHeader/>"));
    assert!(xml.contains("w:val=\"double\""));
    assert_eq!(result.stats().tables, 1);
}

#[test]
fn test_formula_renders_as_equation() {
    let result = convert(
        r#"[{"index": 0, "label": "formula", "native_label": "display_formula", "content": "$\\frac{a}{b}$"}]"#,
        None,
        ConvertOptions::default(),
    );

    let xml = document_xml(result.bytes());
    assert!(xml.contains("<m:oMath>"));
    assert!(xml.contains("<m:f>"));
    assert!(!xml.contains("\\frac"));
    assert_eq!(result.stats().equations, 1);
}

#[test]
fn test_text_box_is_framed() {
    let result = convert(
        r#"[{"index": 0, "label": "text", "bbox_2d": [100, 100, 500, 200], "content": "Boxed"}]"#,
        Some(r#"[{"i": 0, "tb": true, "bd": true}]"#),
        ConvertOptions::default(),
    );

    let xml = document_xml(result.bytes());
    assert!(xml.contains("<w:framePr"));
    assert!(xml.contains("w:hAnchor=\"page\""));
    assert!(xml.contains("<w:pBdr>"));
    assert_eq!(result.stats().text_frames, 1);
}

#[test]
fn test_missing_image_writes_placeholder() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let result = convert(
        r#"[{"index": 0, "label": "image", "bbox_2d": [100, 100, 600, 400]}]"#,
        None,
        ConvertOptions::default().with_asset_dir(dir.path()),
    );

    let xml = document_xml(result.bytes());
    assert!(xml.contains("[Image missing: imgs/cropped_page0_idx0.jpg]"));
    assert!(!xml.contains("<w:drawing>"));
    assert_eq!(result.stats().missing_images, 1);
    assert_eq!(result.stats().images, 0);
}

#[test]
fn test_image_embedded_from_asset_dir() {
    init_logging();
    let empty = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    write_asset(dir.path(), 0, 0);

    let options = ConvertOptions::default()
        .with_asset_dir(empty.path())
        .with_asset_dir(dir.path());
    let result = convert(
        r#"[{"index": 0, "label": "image", "bbox_2d": [100, 100, 600, 400]}]"#,
        None,
        options,
    );

    let xml = document_xml(result.bytes());
    assert!(xml.contains("<wp:inline"));
    assert!(xml.contains("r:embed=\"rIdImage1\""));
    assert_eq!(result.stats().images, 1);

    let rels = part(result.bytes(), "word/_rels/document.xml.rels");
    assert!(rels.contains("Target=\"media/image1.jpeg\""));
    let types = part(result.bytes(), "[Content_Types].xml");
    assert!(types.contains("Extension=\"jpeg\""));

    let mut archive = zip::ZipArchive::new(Cursor::new(result.bytes())).unwrap();
    assert!(archive.by_name("word/media/image1.jpeg").unwrap().size() > 0);
}

#[test]
fn test_floating_image_is_anchored() {
    let dir = TempDir::new().unwrap();
    write_asset(dir.path(), 0, 0);

    let result = convert(
        r#"[
            {"index": 0, "label": "text", "bbox_2d": [100, 100, 900, 500], "content": "Caption box"},
            {"index": 1, "label": "image", "bbox_2d": [300, 200, 700, 400]}
        ]"#,
        Some(r#"[{"i": 0, "tb": true}]"#),
        ConvertOptions::default().with_asset_dir(dir.path()),
    );

    let xml = document_xml(result.bytes());
    assert!(xml.contains("<wp:anchor"));
    assert!(xml.contains("<wp:wrapSquare wrapText=\"bothSides\"/>"));
    assert_eq!(result.stats().images, 1);
}

#[test]
fn test_landscape_section() {
    let result = convert(
        r#"[{"index": 0, "label": "text", "content": "wide"}]"#,
        None,
        ConvertOptions::default().with_geometry(PageGeometry::with_size(842.0, 595.0)),
    );
    let xml = document_xml(result.bytes());
    assert!(xml.contains("w:orient=\"landscape\""));
}

#[test]
fn test_pages_separated_by_breaks() {
    let pages: Vec<PageSource> = (1..=3)
        .map(|i| {
            PageSource::from_json(
                &format!(r#"[{{"index": 0, "label": "text", "content": "page {}"}}]"#, i),
                None,
            )
            .unwrap()
        })
        .collect();
    let result = Converter::new(ConvertOptions::default()).to_docx(&pages).unwrap();

    let xml = document_xml(result.bytes());
    assert_eq!(xml.matches("<w:br w:type=\"page\"/>").count(), 2);
    let first = xml.find("page 1").unwrap();
    let second = xml.find("page 2").unwrap();
    let third = xml.find("page 3").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn test_assembler_rejects_out_of_order_pages() {
    let mut assembler = DocxAssembler::new(RenderOptions::default()).unwrap();
    let mut page = Page::new(2, PageGeometry::default());
    page.add_node(redocx::Node::Paragraph(Paragraph::with_text("two")));
    assembler.push_page(&page).unwrap();

    let earlier = Page::new(1, PageGeometry::default());
    let err = assembler.push_page(&earlier).unwrap_err();
    assert!(matches!(
        err,
        Error::PageOrder {
            expected_after: 2,
            got: 1
        }
    ));
}

#[test]
fn test_write_docx_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.docx");
    let page = PageSource::from_json(r#"[{"index": 0, "label": "text", "content": "saved"}]"#, None)
        .unwrap();

    let result = Converter::default().write_docx(&[page], &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), result.output.len());
    assert!(document_xml(&bytes).contains("saved"));
}
