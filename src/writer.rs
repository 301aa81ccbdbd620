use std::io::Write;
use std::path::Path;

use crate::engine::PdfEngine;
use crate::error::Result;
use crate::layout::{Margins, Orientation, PageLayout, PageSize, PageSizeId, Unit};

/// High-level paged PDF writer.
///
/// Owns a [`PdfEngine`] and mirrors its page layout. Every layout
/// mutator forwards the request to the engine, refreshes the mirror
/// from the engine's authoritative layout, and returns whether the
/// result is equivalent to the request. A `false` return means the
/// engine clamped or rejected part of the request; re-read
/// [`page_layout`](Self::page_layout) to learn what was actually
/// applied.
///
/// Layout changes should happen before the affected page is started:
/// they apply to pages opened by later [`new_page`](Self::new_page)
/// calls, never to the page currently being written.
///
/// Not safe for concurrent use; callers serialize access.
pub struct PdfWriter<'a> {
    engine: PdfEngine<'a>,
    layout: PageLayout,
}

impl PdfWriter<'static> {
    /// Create a writer that owns a new file at `path`. The file is
    /// released when the writer is dropped.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<PdfWriter<'static>> {
        let engine = PdfEngine::create(path)?;
        let layout = engine.page_layout();
        Ok(PdfWriter { engine, layout })
    }
}

impl<'a> PdfWriter<'a> {
    /// Create a writer over a caller-owned stream. The stream stays
    /// owned by the caller and is left open when the writer drops.
    pub fn from_stream(stream: &'a mut dyn Write) -> PdfWriter<'a> {
        let engine = PdfEngine::from_stream(stream);
        let layout = engine.page_layout();
        PdfWriter { engine, layout }
    }

    // ── Page layout ───────────────────────────────────────────────────

    /// Set the full page layout. Returns true only if the engine
    /// adopted a layout equivalent to the request.
    pub fn set_page_layout(&mut self, layout: &PageLayout) -> bool {
        self.engine.set_page_layout(layout);
        self.layout = self.engine.page_layout();
        self.layout.is_equivalent_to(layout)
    }

    /// Set the page size. Returns true only if the engine adopted an
    /// equivalent size.
    pub fn set_page_size(&mut self, size: PageSize) -> bool {
        self.engine.set_page_size(size);
        self.layout = self.engine.page_layout();
        self.layout.page_size().is_equivalent_to(&size)
    }

    /// Set the page orientation. Returns true only if the engine
    /// adopted it.
    pub fn set_page_orientation(&mut self, orientation: Orientation) -> bool {
        self.engine.set_page_orientation(orientation);
        self.layout = self.engine.page_layout();
        self.layout.orientation() == orientation
    }

    /// Set the margins in the current layout units. Returns true only
    /// if the engine adopted them unchanged.
    pub fn set_page_margins(&mut self, margins: Margins) -> bool {
        let unit = self.engine.page_layout().unit();
        self.set_page_margins_with_unit(margins, unit)
    }

    /// Set the margins expressed in `unit`. Returns true only if the
    /// engine adopted both the margins and the unit unchanged.
    pub fn set_page_margins_with_unit(
        &mut self,
        margins: Margins,
        unit: Unit,
    ) -> bool {
        self.engine.set_page_margins(margins, unit);
        self.layout = self.engine.page_layout();
        self.layout.margins() == margins && self.layout.unit() == unit
    }

    /// The current layout, read from the engine.
    pub fn page_layout(&self) -> PageLayout {
        self.engine.page_layout()
    }

    // ── Deprecated convenience setters ────────────────────────────────

    /// Set the page size by standard identifier.
    #[deprecated(note = "use set_page_size(PageSize::from_id(id))")]
    pub fn set_page_size_id(&mut self, id: PageSizeId) -> bool {
        self.set_page_size(PageSize::from_id(id))
    }

    /// Set the page size from dimensions in millimeters.
    #[deprecated(note = "use set_page_size with an explicit PageSize")]
    pub fn set_page_size_mm(&mut self, width: f64, height: f64) -> bool {
        self.set_page_size(PageSize::new(width, height, Unit::Millimeter))
    }

    /// Set the margins in millimeters.
    #[deprecated(note = "use set_page_margins_with_unit(margins, Unit::Millimeter)")]
    pub fn set_margins_mm(&mut self, margins: Margins) -> bool {
        self.set_page_margins_with_unit(margins, Unit::Millimeter)
    }

    // ── Resolution and metadata ───────────────────────────────────────

    /// Set the resolution in DPI. Zero is ignored silently.
    pub fn set_resolution(&mut self, resolution: u32) {
        if resolution > 0 {
            self.engine.set_resolution(resolution);
        }
    }

    /// The resolution in DPI.
    pub fn resolution(&self) -> u32 {
        self.engine.resolution()
    }

    /// The document title.
    pub fn title(&self) -> &str {
        self.engine.title()
    }

    /// Set the document title, written to the PDF info dictionary.
    pub fn set_title(&mut self, title: &str) {
        self.engine.set_title(title);
    }

    /// The document creator.
    pub fn creator(&self) -> &str {
        self.engine.creator()
    }

    /// Set the document creator, written to the PDF info dictionary.
    pub fn set_creator(&mut self, creator: &str) {
        self.engine.set_creator(creator);
    }

    // ── Device metrics ────────────────────────────────────────────────

    /// Paintable width in device pixels at the current resolution.
    pub fn width_pixels(&self) -> u32 {
        self.engine
            .page_layout()
            .paint_rect_pixels(self.engine.resolution())
            .width as u32
    }

    /// Paintable height in device pixels at the current resolution.
    pub fn height_pixels(&self) -> u32 {
        self.engine
            .page_layout()
            .paint_rect_pixels(self.engine.resolution())
            .height as u32
    }

    // ── Page control and content ──────────────────────────────────────

    /// Start a new page with the current layout. Delegates to the
    /// engine; its result is returned unchanged.
    pub fn new_page(&mut self) -> Result<()> {
        self.engine.new_page()
    }

    /// Place text on the open page; see [`PdfEngine::draw_text`].
    pub fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font_size: f64,
    ) -> Result<()> {
        self.engine.draw_text(text, x, y, font_size)
    }

    /// Number of pages written or open so far.
    pub fn page_count(&self) -> usize {
        self.engine.page_count()
    }

    /// Finalize the document and release the writer. Dropping the
    /// writer without calling this also finalizes a started document,
    /// but discards any I/O error.
    pub fn finish(mut self) -> Result<()> {
        self.engine.finish()
    }
}
