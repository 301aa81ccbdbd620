use pdf_paged::{
    Margins, Orientation, PageLayout, PageSize, PageSizeId, PdfWriter, Unit,
};

#[test]
fn accepted_size_returns_true_and_matches() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    assert!(w.set_page_size(PageSize::from_id(PageSizeId::Letter)));
    let layout = w.page_layout();
    assert_eq!(layout.page_size().id(), PageSizeId::Letter);
    assert_eq!(layout.page_size().size_pt(), (612.0, 792.0));
}

#[test]
fn rejected_size_returns_false_and_keeps_previous() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    assert!(!w.set_page_size(PageSize::from_id(PageSizeId::Custom)));
    // Layout reflects the engine's state, not the request.
    assert_eq!(w.page_layout().page_size().id(), PageSizeId::A4);
}

#[test]
fn zero_dimension_size_is_rejected() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    assert!(!w.set_page_size(PageSize::new(0.0, 297.0, Unit::Millimeter)));
    assert_eq!(w.page_layout().page_size().id(), PageSizeId::A4);
}

#[test]
fn accepted_margins_return_true() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    let margins = Margins::new(36.0, 36.0, 36.0, 36.0);
    assert!(w.set_page_margins(margins));
    assert_eq!(w.page_layout().margins(), margins);
}

#[test]
fn clamped_margins_return_false_and_mirror_adjusted_value() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    let request = Margins::new(-5.0, 20.0, 20.0, 20.0);
    assert!(!w.set_page_margins(request));
    let adjusted = w.page_layout().margins();
    // Neither the request nor the prior default, but the clamped value.
    assert_eq!(adjusted, Margins::new(0.0, 20.0, 20.0, 20.0));
}

#[test]
fn oversized_margins_return_false() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    assert!(!w.set_page_margins(Margins::new(1000.0, 10.0, 10.0, 10.0)));
    // Clamped to half the A4 width.
    assert_eq!(w.page_layout().margins().left, 297.5);
}

#[test]
fn margins_with_unit_set_both() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    assert!(w.set_page_margins_with_unit(
        Margins::uniform(12.7),
        Unit::Millimeter,
    ));
    let layout = w.page_layout();
    assert_eq!(layout.unit(), Unit::Millimeter);
    assert_eq!(layout.margins(), Margins::uniform(12.7));
}

#[test]
fn orientation_returns_true() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    assert!(w.set_page_orientation(Orientation::Landscape));
    assert_eq!(w.page_layout().orientation(), Orientation::Landscape);
}

#[test]
fn full_layout_accepted_across_units() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    let request = PageLayout::new(
        PageSize::new(210.0, 297.0, Unit::Millimeter),
        Orientation::Landscape,
        Margins::uniform(10.0),
        Unit::Millimeter,
    );
    assert!(w.set_page_layout(&request));
    let layout = w.page_layout();
    assert_eq!(layout.orientation(), Orientation::Landscape);
    assert_eq!(layout.page_size().id(), PageSizeId::A4);
}

#[test]
fn full_layout_with_bad_margins_applies_rest() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    let request = PageLayout::new(
        PageSize::from_id(PageSizeId::Letter),
        Orientation::Landscape,
        Margins::new(-1.0, 10.0, 10.0, 10.0),
        Unit::Point,
    );
    assert!(!w.set_page_layout(&request));
    let layout = w.page_layout();
    // Size and orientation went through; the margin was clamped.
    assert_eq!(layout.page_size().id(), PageSizeId::Letter);
    assert_eq!(layout.orientation(), Orientation::Landscape);
    assert_eq!(layout.margins().left, 0.0);
}

#[test]
fn resolution_defaults_and_filters_zero() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    assert_eq!(w.resolution(), 1200);
    w.set_resolution(0);
    assert_eq!(w.resolution(), 1200);
    w.set_resolution(600);
    assert_eq!(w.resolution(), 600);
}

#[test]
fn pixel_metrics_follow_resolution() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    w.set_page_margins(Margins::uniform(0.0));
    w.set_resolution(72);
    assert_eq!(w.width_pixels(), 595);
    assert_eq!(w.height_pixels(), 842);
    w.set_resolution(144);
    assert_eq!(w.width_pixels(), 1190);
}

#[test]
#[allow(deprecated)]
fn deprecated_size_setters_match_canonical() {
    let mut buf_a = Vec::new();
    let mut a = PdfWriter::from_stream(&mut buf_a);
    assert!(a.set_page_size_id(PageSizeId::A5));

    let mut buf_b = Vec::new();
    let mut b = PdfWriter::from_stream(&mut buf_b);
    assert!(b.set_page_size(PageSize::from_id(PageSizeId::A5)));

    assert!(a.page_layout().is_equivalent_to(&b.page_layout()));

    let mut buf_c = Vec::new();
    let mut c = PdfWriter::from_stream(&mut buf_c);
    assert!(c.set_page_size_mm(148.0, 210.0));
    assert_eq!(c.page_layout().page_size().id(), PageSizeId::A5);
    assert!(c.page_layout().is_equivalent_to(&a.page_layout()));
}

#[test]
#[allow(deprecated)]
fn deprecated_margins_mm_translate_to_canonical() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    assert!(w.set_margins_mm(Margins::uniform(20.0)));
    let layout = w.page_layout();
    assert_eq!(layout.unit(), Unit::Millimeter);
    assert_eq!(layout.margins(), Margins::uniform(20.0));
}

#[test]
fn title_and_creator_pass_through() {
    let mut buf = Vec::new();
    let mut w = PdfWriter::from_stream(&mut buf);
    assert_eq!(w.title(), "");
    w.set_title("Quarterly Report");
    w.set_creator("pdf-paged");
    assert_eq!(w.title(), "Quarterly Report");
    assert_eq!(w.creator(), "pdf-paged");
}

#[test]
fn metadata_appears_in_output() {
    let mut buf = Vec::new();
    {
        let mut w = PdfWriter::from_stream(&mut buf);
        w.set_title("Quarterly Report");
        w.set_creator("pdf-paged");
        w.new_page().unwrap();
        w.finish().unwrap();
    }
    let output = String::from_utf8_lossy(&buf);
    assert!(output.contains("(Quarterly Report)"));
    assert!(output.contains("(pdf-paged)"));
}

fn run_ops(w: &mut PdfWriter<'_>) {
    w.set_title("Identity Check");
    w.set_page_size(PageSize::from_id(PageSizeId::Letter));
    w.set_page_orientation(Orientation::Landscape);
    w.set_page_margins(Margins::uniform(36.0));
    w.new_page().unwrap();
    w.draw_text("first page", 72.0, 72.0, 12.0).unwrap();
    w.new_page().unwrap();
    w.draw_text("second page", 72.0, 144.0, 10.5).unwrap();
}

#[test]
fn file_and_stream_targets_produce_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");
    {
        let mut w = PdfWriter::create(&path).unwrap();
        run_ops(&mut w);
        w.finish().unwrap();
    }
    let file_bytes = std::fs::read(&path).unwrap();

    let mut stream_bytes = Vec::new();
    {
        let mut w = PdfWriter::from_stream(&mut stream_bytes);
        run_ops(&mut w);
        w.finish().unwrap();
    }

    assert_eq!(file_bytes, stream_bytes);
}

#[test]
fn drop_finalizes_started_document() {
    let mut buf = Vec::new();
    {
        let mut w = PdfWriter::from_stream(&mut buf);
        w.new_page().unwrap();
        // No finish: drop must complete the document.
    }
    let output = String::from_utf8_lossy(&buf);
    assert!(output.starts_with("%PDF-1.7"));
    assert!(output.ends_with("%%EOF\n"));
    assert!(output.contains("/Count 1"));
}

#[test]
fn drop_without_pages_writes_nothing() {
    let mut buf = Vec::new();
    {
        let mut w = PdfWriter::from_stream(&mut buf);
        w.set_page_size(PageSize::from_id(PageSizeId::A3));
        w.set_title("never started");
    }
    assert!(buf.is_empty());
}

#[test]
fn borrowed_stream_stays_usable_after_drop() {
    use std::io::Write;

    let mut buf = Vec::new();
    {
        let mut w = PdfWriter::from_stream(&mut buf);
        w.new_page().unwrap();
        w.finish().unwrap();
    }
    let len = buf.len();
    buf.write_all(b"trailing").unwrap();
    assert_eq!(buf.len(), len + 8);
}

#[test]
fn file_is_complete_after_writer_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dropped.pdf");
    {
        let mut w = PdfWriter::create(&path).unwrap();
        w.new_page().unwrap();
    }
    let bytes = std::fs::read(&path).unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.starts_with("%PDF-1.7"));
    assert!(output.ends_with("%%EOF\n"));
}
