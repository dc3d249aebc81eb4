//! ZIP package parts around `word/document.xml`.

use super::drawing::MediaStore;
use super::units::pt_to_twips;
use super::xml::XmlSink;
use super::NS_W;
use crate::error::Result;
use crate::model::{Metadata, PageGeometry};
use crate::render::AssemblyStats;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_APP: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";
const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";

/// Build the complete package.
pub(super) fn write_package(
    document: Vec<u8>,
    media: &MediaStore,
    geometry: &PageGeometry,
    metadata: &Metadata,
    stats: &AssemblyStats,
) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", content_types(media)?),
        ("_rels/.rels", package_rels()?),
        ("word/document.xml", document),
        ("word/styles.xml", styles(geometry)?),
        ("word/_rels/document.xml.rels", document_rels(media)?),
        ("docProps/core.xml", core_properties(metadata)?),
        ("docProps/app.xml", app_properties(stats)?),
    ];
    for (name, bytes) in parts {
        zip.start_file(name, options)?;
        zip.write_all(&bytes)?;
    }
    for item in media.items() {
        zip.start_file(format!("word/media/{}", item.name), options)?;
        zip.write_all(&item.data)?;
    }

    let cursor = zip.finish()?;
    log::debug!(
        "Package written: {} media file(s), {} bytes",
        media.items().len(),
        cursor.get_ref().len()
    );
    Ok(cursor.into_inner())
}

fn content_types(media: &MediaStore) -> Result<Vec<u8>> {
    let mut sink = XmlSink::new()?;
    sink.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    sink.empty("Default", &[("Extension", "rels"), ("ContentType", CT_RELS)])?;
    sink.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

    let extensions: BTreeMap<&str, &str> = media
        .items()
        .iter()
        .map(|item| (item.media_type.extension(), item.media_type.mime_type()))
        .collect();
    for (extension, mime) in extensions {
        sink.empty("Default", &[("Extension", extension), ("ContentType", mime)])?;
    }

    for (part, content_type) in [
        ("/word/document.xml", CT_DOCUMENT),
        ("/word/styles.xml", CT_STYLES),
        ("/docProps/core.xml", CT_CORE),
        ("/docProps/app.xml", CT_APP),
    ] {
        sink.empty(
            "Override",
            &[("PartName", part), ("ContentType", content_type)],
        )?;
    }
    sink.end("Types")?;
    Ok(sink.into_bytes())
}

fn relationship(sink: &mut XmlSink, id: &str, kind: &str, target: &str) -> Result<()> {
    sink.empty(
        "Relationship",
        &[("Id", id), ("Type", kind), ("Target", target)],
    )
}

fn package_rels() -> Result<Vec<u8>> {
    let mut sink = XmlSink::new()?;
    sink.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    relationship(
        &mut sink,
        "rId1",
        &format!("{}/officeDocument", REL_BASE),
        "word/document.xml",
    )?;
    relationship(
        &mut sink,
        "rId2",
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
        "docProps/core.xml",
    )?;
    relationship(
        &mut sink,
        "rId3",
        &format!("{}/extended-properties", REL_BASE),
        "docProps/app.xml",
    )?;
    sink.end("Relationships")?;
    Ok(sink.into_bytes())
}

fn document_rels(media: &MediaStore) -> Result<Vec<u8>> {
    let mut sink = XmlSink::new()?;
    sink.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    relationship(
        &mut sink,
        "rId1",
        &format!("{}/styles", REL_BASE),
        "styles.xml",
    )?;
    let image_rel = format!("{}/image", REL_BASE);
    for item in media.items() {
        let target = format!("media/{}", item.name);
        relationship(&mut sink, &item.rel_id, &image_rel, &target)?;
    }
    sink.end("Relationships")?;
    Ok(sink.into_bytes())
}

struct HeadingStyle {
    id: &'static str,
    name: &'static str,
    outline: &'static str,
    size_pt: f32,
    before_pt: f32,
    after_pt: f32,
}

const HEADINGS: [HeadingStyle; 2] = [
    HeadingStyle {
        id: "Heading1",
        name: "heading 1",
        outline: "0",
        size_pt: 18.0,
        before_pt: 12.0,
        after_pt: 6.0,
    },
    HeadingStyle {
        id: "Heading2",
        name: "heading 2",
        outline: "1",
        size_pt: 14.0,
        before_pt: 12.0,
        after_pt: 6.0,
    },
];

fn styles(geometry: &PageGeometry) -> Result<Vec<u8>> {
    let mut sink = XmlSink::new()?;
    sink.start("w:styles", &[("xmlns:w", NS_W)])?;

    sink.start("w:docDefaults", &[])?;
    sink.start("w:rPrDefault", &[])?;
    sink.start("w:rPr", &[])?;
    sink.empty(
        "w:rFonts",
        &[
            ("w:ascii", geometry.font_latin.as_str()),
            ("w:hAnsi", geometry.font_latin.as_str()),
            ("w:eastAsia", geometry.font_cjk.as_str()),
        ],
    )?;
    sink.empty("w:sz", &[("w:val", "22")])?;
    sink.empty("w:szCs", &[("w:val", "22")])?;
    sink.end("w:rPr")?;
    sink.end("w:rPrDefault")?;
    sink.start("w:pPrDefault", &[])?;
    sink.start("w:pPr", &[])?;
    sink.empty(
        "w:spacing",
        &[("w:after", "0"), ("w:line", "240"), ("w:lineRule", "auto")],
    )?;
    sink.end("w:pPr")?;
    sink.end("w:pPrDefault")?;
    sink.end("w:docDefaults")?;

    sink.start(
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    sink.empty("w:name", &[("w:val", "Normal")])?;
    sink.empty("w:qFormat", &[])?;
    sink.end("w:style")?;

    for heading in &HEADINGS {
        let before = pt_to_twips(heading.before_pt).to_string();
        let after = pt_to_twips(heading.after_pt).to_string();
        let size = ((heading.size_pt * 2.0) as i64).to_string();

        sink.start("w:style", &[("w:type", "paragraph"), ("w:styleId", heading.id)])?;
        sink.empty("w:name", &[("w:val", heading.name)])?;
        sink.empty("w:basedOn", &[("w:val", "Normal")])?;
        sink.empty("w:next", &[("w:val", "Normal")])?;
        sink.empty("w:qFormat", &[])?;
        sink.start("w:pPr", &[])?;
        sink.empty("w:keepNext", &[])?;
        sink.empty(
            "w:spacing",
            &[("w:before", before.as_str()), ("w:after", after.as_str())],
        )?;
        sink.empty("w:outlineLvl", &[("w:val", heading.outline)])?;
        sink.end("w:pPr")?;
        sink.start("w:rPr", &[])?;
        sink.empty("w:b", &[])?;
        sink.empty("w:color", &[("w:val", "000000")])?;
        sink.empty("w:sz", &[("w:val", size.as_str())])?;
        sink.empty("w:szCs", &[("w:val", size.as_str())])?;
        sink.end("w:rPr")?;
        sink.end("w:style")?;
    }

    sink.start("w:style", &[("w:type", "table"), ("w:styleId", "TableGrid")])?;
    sink.empty("w:name", &[("w:val", "Table Grid")])?;
    sink.start("w:tblPr", &[])?;
    sink.start("w:tblBorders", &[])?;
    for side in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
        sink.empty(
            side,
            &[
                ("w:val", "single"),
                ("w:sz", "4"),
                ("w:space", "0"),
                ("w:color", "auto"),
            ],
        )?;
    }
    sink.end("w:tblBorders")?;
    sink.end("w:tblPr")?;
    sink.end("w:style")?;

    sink.end("w:styles")?;
    Ok(sink.into_bytes())
}

fn w3c_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn core_properties(metadata: &Metadata) -> Result<Vec<u8>> {
    let now = Utc::now();
    let created = w3c_date(metadata.created.unwrap_or(now));
    let modified = w3c_date(metadata.modified.or(metadata.created).unwrap_or(now));

    let mut sink = XmlSink::new()?;
    sink.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    let fields = [
        ("dc:title", &metadata.title),
        ("dc:subject", &metadata.subject),
        ("dc:creator", &metadata.author),
        ("cp:keywords", &metadata.keywords),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            sink.leaf(name, &[], value)?;
        }
    }
    sink.leaf(
        "dcterms:created",
        &[("xsi:type", "dcterms:W3CDTF")],
        &created,
    )?;
    sink.leaf(
        "dcterms:modified",
        &[("xsi:type", "dcterms:W3CDTF")],
        &modified,
    )?;
    sink.end("cp:coreProperties")?;
    Ok(sink.into_bytes())
}

fn app_properties(stats: &AssemblyStats) -> Result<Vec<u8>> {
    let mut sink = XmlSink::new()?;
    sink.start(
        "Properties",
        &[
            (
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            ),
            (
                "xmlns:vt",
                "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
            ),
        ],
    )?;
    sink.leaf("Application", &[], concat!("redocx ", env!("CARGO_PKG_VERSION")))?;
    sink.leaf("Pages", &[], &stats.pages.to_string())?;
    sink.end("Properties")?;
    Ok(sink.into_bytes())
}
