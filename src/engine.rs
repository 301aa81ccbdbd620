use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;

use crate::emit::{escape_pdf_string, PdfEmitter};
use crate::error::{PdfError, Result};
use crate::layout::{Margins, Orientation, PageLayout, PageSize, Unit};
use crate::objects::{ObjId, PdfObject};

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const FONT_HELV_OBJ: ObjId = ObjId(3, 0);
const FIRST_DYNAMIC_OBJ: u32 = 4;

/// Default resolution in DPI.
pub const DEFAULT_RESOLUTION: u32 = 1200;

/// Where the engine sends its bytes. Chosen at construction, immutable
/// afterwards.
enum Output<'a> {
    /// File opened by the engine; closed when the engine drops.
    OwnedFile(BufWriter<File>),
    /// Caller-owned stream; left open when the engine drops.
    Stream(&'a mut dyn Write),
}

impl Write for Output<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Output::OwnedFile(f) => f.write(buf),
            Output::Stream(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Output::OwnedFile(f) => f.flush(),
            Output::Stream(s) => s.flush(),
        }
    }
}

struct PageInProgress {
    width_pt: f64,
    height_pt: f64,
    content: Vec<u8>,
}

/// The PDF engine: the single source of truth for the current page
/// layout, resolution, and document metadata, and the component that
/// serializes pages into the output byte stream.
///
/// Layout mutators never report errors. The engine applies its own
/// acceptance rules (rejecting invalid page sizes, clamping margins)
/// and callers detect partial acceptance by re-reading
/// [`page_layout`](Self::page_layout).
///
/// Pages are written incrementally: each `new_page` call flushes the
/// previous page's objects to the output, so memory stays flat for
/// documents with many pages.
pub struct PdfEngine<'a> {
    emitter: PdfEmitter<Output<'a>>,
    layout: PageLayout,
    resolution: u32,
    title: String,
    creator: String,
    page_obj_ids: Vec<ObjId>,
    current_page: Option<PageInProgress>,
    next_obj_num: u32,
    started: bool,
    finished: bool,
}

impl PdfEngine<'static> {
    /// Create an engine writing to a new file at `path`. The file
    /// handle is owned by the engine and released when it drops.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_output(Output::OwnedFile(BufWriter::new(file))))
    }
}

impl<'a> PdfEngine<'a> {
    /// Create an engine writing to a caller-owned stream. The stream
    /// is borrowed for the engine's lifetime and left open on drop.
    pub fn from_stream(stream: &'a mut dyn Write) -> PdfEngine<'a> {
        Self::with_output(Output::Stream(stream))
    }

    fn with_output(output: Output<'a>) -> PdfEngine<'a> {
        PdfEngine {
            emitter: PdfEmitter::new(output),
            layout: PageLayout::default(),
            resolution: DEFAULT_RESOLUTION,
            title: String::new(),
            creator: String::new(),
            page_obj_ids: Vec::new(),
            current_page: None,
            next_obj_num: FIRST_DYNAMIC_OBJ,
            started: false,
            finished: false,
        }
    }

    // ── Page layout ───────────────────────────────────────────────────

    /// The authoritative current layout.
    pub fn page_layout(&self) -> PageLayout {
        self.layout.clone()
    }

    /// Replace the whole layout. Each part goes through the same
    /// acceptance rules as the individual setters.
    pub fn set_page_layout(&mut self, layout: &PageLayout) {
        self.set_page_size(layout.page_size());
        self.set_page_orientation(layout.orientation());
        self.set_page_margins(layout.margins(), layout.unit());
    }

    /// Set the page size. A size with a non-positive dimension is
    /// rejected and the previous size kept. Margins are re-clamped
    /// against the new dimensions.
    pub fn set_page_size(&mut self, size: PageSize) {
        if !size.is_valid() {
            return;
        }
        self.layout.set_page_size(size);
        self.reclamp_margins();
    }

    /// Set the page orientation. Always accepted; margins are
    /// re-clamped against the rotated dimensions.
    pub fn set_page_orientation(&mut self, orientation: Orientation) {
        self.layout.set_orientation(orientation);
        self.reclamp_margins();
    }

    /// Set the margins, expressed in `unit`. Negative components are
    /// clamped to zero and no side may exceed half the corresponding
    /// oriented page dimension, so the paint rect never inverts.
    pub fn set_page_margins(&mut self, margins: Margins, unit: Unit) {
        self.layout.set_unit(unit);
        let clamped = self.clamp_margins(margins, unit);
        self.layout.set_margins(clamped);
    }

    fn reclamp_margins(&mut self) {
        let clamped =
            self.clamp_margins(self.layout.margins(), self.layout.unit());
        self.layout.set_margins(clamped);
    }

    fn clamp_margins(&self, margins: Margins, unit: Unit) -> Margins {
        let full = self.layout.full_rect_pt();
        let k = unit.points_per_unit();
        let max_x = full.width / 2.0 / k;
        let max_y = full.height / 2.0 / k;
        Margins::new(
            margins.left.clamp(0.0, max_x),
            margins.top.clamp(0.0, max_y),
            margins.right.clamp(0.0, max_x),
            margins.bottom.clamp(0.0, max_y),
        )
    }

    // ── Resolution and metadata ───────────────────────────────────────

    /// Set the resolution in DPI. Callers pass a positive value.
    pub fn set_resolution(&mut self, resolution: u32) {
        self.resolution = resolution;
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn set_creator(&mut self, creator: &str) {
        self.creator = creator.to_string();
    }

    // ── Page control and content ──────────────────────────────────────

    /// Start a new page sized from the current layout. The first call
    /// opens the first page; later calls flush the previous page to
    /// the output before opening the next one.
    pub fn new_page(&mut self) -> Result<()> {
        if self.finished {
            return Err(PdfError::Finished);
        }
        self.ensure_started()?;
        self.end_current_page()?;

        let full = self.layout.full_rect_pt();
        debug!(
            "starting page {} ({} x {} pt)",
            self.page_obj_ids.len() + 1,
            full.width,
            full.height,
        );
        self.current_page = Some(PageInProgress {
            width_pt: full.width,
            height_pt: full.height,
            content: Vec::new(),
        });
        Ok(())
    }

    /// Place text on the open page at (x, y) in points, bottom-left
    /// origin, using the builtin Helvetica font.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font_size: f64,
    ) -> Result<()> {
        if self.finished {
            return Err(PdfError::Finished);
        }
        let page =
            self.current_page.as_mut().ok_or(PdfError::NoOpenPage)?;
        let ops = format!(
            "BT\n/F1 {} Tf\n{} {} Td\n({}) Tj\nET\n",
            format_coord(font_size),
            format_coord(x),
            format_coord(y),
            escape_pdf_string(text),
        );
        page.content.extend_from_slice(ops.as_bytes());
        Ok(())
    }

    /// Finish the document: close any open page, write the info
    /// dictionary, pages tree, catalog, xref, and trailer. Idempotent.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finish_inner()
    }

    /// Number of pages flushed or currently open.
    pub fn page_count(&self) -> usize {
        self.page_obj_ids.len() + usize::from(self.current_page.is_some())
    }

    // ── Emission internals ────────────────────────────────────────────

    fn ensure_started(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.emitter.write_header()?;
        let font = PdfObject::dict(vec![
            ("Type", PdfObject::name("Font")),
            ("Subtype", PdfObject::name("Type1")),
            ("BaseFont", PdfObject::name("Helvetica")),
        ]);
        self.emitter.write_object(FONT_HELV_OBJ, &font)?;
        self.started = true;
        Ok(())
    }

    fn alloc_obj(&mut self) -> ObjId {
        let id = ObjId(self.next_obj_num, 0);
        self.next_obj_num += 1;
        id
    }

    /// Flush the page being built, if any, to the output.
    fn end_current_page(&mut self) -> Result<()> {
        let page = match self.current_page.take() {
            Some(p) => p,
            None => return Ok(()),
        };

        let mut encoder =
            ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&page.content)?;
        let compressed = encoder.finish()?;

        let content_id = self.alloc_obj();
        let page_id = self.alloc_obj();

        let content_stream = PdfObject::stream(
            vec![("Filter", PdfObject::name("FlateDecode"))],
            compressed,
        );
        self.emitter.write_object(content_id, &content_stream)?;

        let page_dict = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(PAGES_OBJ)),
            (
                "MediaBox",
                PdfObject::rect(0.0, 0.0, page.width_pt, page.height_pt),
            ),
            ("Contents", PdfObject::Reference(content_id)),
            (
                "Resources",
                PdfObject::dict(vec![(
                    "Font",
                    PdfObject::dict(vec![(
                        "F1",
                        PdfObject::Reference(FONT_HELV_OBJ),
                    )]),
                )]),
            ),
        ]);
        self.emitter.write_object(page_id, &page_dict)?;
        self.page_obj_ids.push(page_id);
        Ok(())
    }

    fn finish_inner(&mut self) -> Result<()> {
        self.ensure_started()?;
        self.end_current_page()?;

        let info_id = if !self.title.is_empty() || !self.creator.is_empty() {
            let id = self.alloc_obj();
            let mut entries = Vec::new();
            if !self.title.is_empty() {
                entries.push((
                    "Title".to_string(),
                    PdfObject::literal_string(&self.title),
                ));
            }
            if !self.creator.is_empty() {
                entries.push((
                    "Creator".to_string(),
                    PdfObject::literal_string(&self.creator),
                ));
            }
            self.emitter
                .write_object(id, &PdfObject::Dictionary(entries))?;
            Some(id)
        } else {
            None
        };

        let kids: Vec<PdfObject> = self
            .page_obj_ids
            .iter()
            .map(|id| PdfObject::Reference(*id))
            .collect();
        let page_count = self.page_obj_ids.len() as i64;
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(page_count)),
        ]);
        self.emitter.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        self.emitter.write_object(CATALOG_OBJ, &catalog)?;

        self.emitter.write_xref_and_trailer(CATALOG_OBJ, info_id)?;
        self.emitter.flush()?;
        self.finished = true;
        debug!("finished document: {} page(s)", self.page_obj_ids.len());
        Ok(())
    }
}

impl Drop for PdfEngine<'_> {
    /// A started but unfinished document is finalized best-effort so
    /// the output is still structurally complete. Errors during
    /// teardown are discarded; callers who care call `finish`.
    fn drop(&mut self) {
        if self.started && !self.finished {
            let _ = self.finish_inner();
        }
    }
}

/// Format a coordinate for content-stream operators.
pub(crate) fn format_coord(v: f64) -> String {
    if v == v.floor() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        let s = s.trim_end_matches('0');
        let s = s.trim_end_matches('.');
        s.to_string()
    }
}
