//! Embedded images: media collection and DrawingML markup.

use super::fonts::resolve_fonts;
use super::text::{write_paragraph, ParagraphProps};
use super::units::{inches_to_emu, norm_x_pt, norm_y_pt, pt_to_emu, usable_width_in};
use super::xml::XmlSink;
use super::{PageWriter, NS_PIC};
use crate::error::Result;
use crate::model::{Alignment, BBox, ImageNode, MediaType, PageGeometry, Run};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Natural resolution assumed for images without a bounding box.
const NATURAL_DPI: f32 = 72.0;

/// Aspect ratio (height / width) used when neither the file nor the box gives one.
const FALLBACK_ASPECT: f32 = 0.75;

/// An image stored in `word/media/`.
#[derive(Debug, Clone)]
pub(crate) struct MediaItem {
    /// File name under `word/media/`
    pub name: String,
    /// Relationship id in `word/_rels/document.xml.rels`
    pub rel_id: String,
    pub media_type: MediaType,
    pub data: Vec<u8>,
}

/// Images collected while assembling, deduplicated by source path.
#[derive(Debug, Default)]
pub(crate) struct MediaStore {
    items: Vec<MediaItem>,
    by_path: HashMap<PathBuf, usize>,
    next_drawing_id: u32,
}

impl MediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store image bytes and return the stored item.
    pub fn add(&mut self, path: &Path, data: Vec<u8>, media_type: MediaType) -> &MediaItem {
        let index = match self.by_path.get(path) {
            Some(&index) => index,
            None => {
                let n = self.items.len() + 1;
                self.items.push(MediaItem {
                    name: format!("image{}.{}", n, media_type.extension()),
                    rel_id: format!("rIdImage{}", n),
                    media_type,
                    data,
                });
                self.by_path.insert(path.to_path_buf(), n - 1);
                n - 1
            }
        };
        &self.items[index]
    }

    /// Unique `wp:docPr` id.
    pub fn drawing_id(&mut self) -> u32 {
        self.next_drawing_id += 1;
        self.next_drawing_id
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }
}

/// Display size of an image in inches.
pub(crate) fn image_extent(
    bbox: Option<&BBox>,
    pixels: Option<(u32, u32)>,
    geometry: &PageGeometry,
    margin_budget_pt: f32,
) -> (f32, f32) {
    let usable = usable_width_in(geometry, margin_budget_pt);
    let pixels = pixels.filter(|&(w, h)| w > 0 && h > 0);

    let width = match (bbox, pixels) {
        (Some(bbox), _) => (bbox.width_fraction() * usable).clamp(0.01, usable),
        (None, Some((w, _))) => (w as f32 / NATURAL_DPI).min(usable),
        (None, None) => usable,
    };

    let aspect = pixels
        .map(|(w, h)| h as f32 / w as f32)
        .or_else(|| {
            bbox.filter(|b| b.width() > 0.0 && b.height() > 0.0).map(|b| {
                norm_y_pt(b.height(), geometry) / norm_x_pt(b.width(), geometry)
            })
        })
        .unwrap_or(FALLBACK_ASPECT);

    (width, width * aspect)
}

fn read_asset(path: &Path) -> Option<(Vec<u8>, MediaType)> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Failed to read image asset {}: {}", path.display(), e);
            return None;
        }
    };
    match MediaType::detect(&data) {
        Some(media_type) => Some((data, media_type)),
        None => {
            log::warn!("Unrecognized image format: {}", path.display());
            None
        }
    }
}

struct Placement {
    cx: i64,
    cy: i64,
    /// Page offset in EMU for anchored images
    offset: Option<(i64, i64)>,
}

impl PageWriter<'_> {
    pub(super) fn image(&mut self, node: &ImageNode) -> Result<()> {
        let reference = node.asset.relative_path();
        let loaded = self
            .options
            .locate_asset(&reference)
            .and_then(|path| read_asset(&path).map(|(data, kind)| (path, data, kind)));

        let Some((path, data, media_type)) = loaded else {
            log::warn!("Image asset missing, writing placeholder: {}", reference);
            self.stats.missing_images += 1;
            let text = self.options.placeholder(&reference);
            let props = ParagraphProps::compact(Some(Alignment::Center));
            let fonts = resolve_fonts(None, self.geometry);
            return write_paragraph(self.sink, &props, &[Run::new(text)], fonts);
        };

        let pixels = ::image::image_dimensions(&path).ok();
        let (width_in, height_in) = image_extent(
            node.bbox.as_ref(),
            pixels,
            self.geometry,
            self.options.margin_budget_pt,
        );
        let offset = match (&node.bbox, node.floating) {
            (Some(bbox), true) => Some((
                pt_to_emu(norm_x_pt(bbox.x1, self.geometry)),
                pt_to_emu(norm_y_pt(bbox.y1, self.geometry)),
            )),
            _ => None,
        };
        let placement = Placement {
            cx: inches_to_emu(width_in),
            cy: inches_to_emu(height_in),
            offset,
        };

        let id = self.media.drawing_id();
        let item = self.media.add(&path, data, media_type);
        self.stats.images += 1;

        let props = ParagraphProps {
            before_pt: 1.0,
            after_pt: 1.0,
            alignment: Some(node.alignment),
            ..Default::default()
        };
        self.sink.start("w:p", &[])?;
        props.write(self.sink)?;
        self.sink.start("w:r", &[])?;
        self.sink.start("w:drawing", &[])?;
        write_drawing(self.sink, &placement, id, item, &reference)?;
        self.sink.end("w:drawing")?;
        self.sink.end("w:r")?;
        self.sink.end("w:p")
    }
}

fn write_drawing(
    sink: &mut XmlSink,
    placement: &Placement,
    id: u32,
    item: &MediaItem,
    reference: &str,
) -> Result<()> {
    let cx = placement.cx.to_string();
    let cy = placement.cy.to_string();
    let id = id.to_string();
    let name = format!("Picture {}", id);

    let wrapper = match placement.offset {
        None => {
            sink.start(
                "wp:inline",
                &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
            )?;
            "wp:inline"
        }
        Some((x, y)) => {
            sink.start(
                "wp:anchor",
                &[
                    ("distT", "0"),
                    ("distB", "0"),
                    ("distL", "114300"),
                    ("distR", "114300"),
                    ("simplePos", "0"),
                    ("relativeHeight", id.as_str()),
                    ("behindDoc", "0"),
                    ("locked", "0"),
                    ("layoutInCell", "1"),
                    ("allowOverlap", "1"),
                ],
            )?;
            sink.empty("wp:simplePos", &[("x", "0"), ("y", "0")])?;
            sink.start("wp:positionH", &[("relativeFrom", "page")])?;
            sink.leaf("wp:posOffset", &[], &x.to_string())?;
            sink.end("wp:positionH")?;
            sink.start("wp:positionV", &[("relativeFrom", "page")])?;
            sink.leaf("wp:posOffset", &[], &y.to_string())?;
            sink.end("wp:positionV")?;
            "wp:anchor"
        }
    };

    sink.empty("wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    sink.empty(
        "wp:effectExtent",
        &[("l", "0"), ("t", "0"), ("r", "0"), ("b", "0")],
    )?;
    if placement.offset.is_some() {
        sink.empty("wp:wrapSquare", &[("wrapText", "bothSides")])?;
    }
    sink.empty(
        "wp:docPr",
        &[("id", id.as_str()), ("name", name.as_str()), ("descr", reference)],
    )?;
    sink.start("wp:cNvGraphicFramePr", &[])?;
    sink.empty("a:graphicFrameLocks", &[("noChangeAspect", "1")])?;
    sink.end("wp:cNvGraphicFramePr")?;

    sink.start("a:graphic", &[])?;
    sink.start("a:graphicData", &[("uri", NS_PIC)])?;
    sink.start("pic:pic", &[])?;
    sink.start("pic:nvPicPr", &[])?;
    sink.empty("pic:cNvPr", &[("id", "0"), ("name", item.name.as_str())])?;
    sink.empty("pic:cNvPicPr", &[])?;
    sink.end("pic:nvPicPr")?;
    sink.start("pic:blipFill", &[])?;
    sink.empty("a:blip", &[("r:embed", item.rel_id.as_str())])?;
    sink.start("a:stretch", &[])?;
    sink.empty("a:fillRect", &[])?;
    sink.end("a:stretch")?;
    sink.end("pic:blipFill")?;
    sink.start("pic:spPr", &[])?;
    sink.start("a:xfrm", &[])?;
    sink.empty("a:off", &[("x", "0"), ("y", "0")])?;
    sink.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    sink.end("a:xfrm")?;
    sink.start("a:prstGeom", &[("prst", "rect")])?;
    sink.empty("a:avLst", &[])?;
    sink.end("a:prstGeom")?;
    sink.end("pic:spPr")?;
    sink.end("pic:pic")?;
    sink.end("a:graphicData")?;
    sink.end("a:graphic")?;
    sink.end(wrapper)
}
