/// Measurement units for page dimensions and margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Millimeter,
    Point,
    Inch,
    Pica,
    Didot,
    Cicero,
}

impl Unit {
    /// Number of PostScript points in one of this unit.
    pub fn points_per_unit(self) -> f64 {
        match self {
            Unit::Millimeter => 2.83464566929,
            Unit::Point => 1.0,
            Unit::Inch => 72.0,
            Unit::Pica => 12.0,
            Unit::Didot => 1.065826771,
            Unit::Cicero => 12.789921257,
        }
    }
}

/// Identifiers for standard page sizes.
///
/// `Custom` marks a size that matches no standard definition; it has
/// no canonical dimensions of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSizeId {
    A3,
    A4,
    A5,
    B4,
    B5,
    Letter,
    Legal,
    Executive,
    Tabloid,
    Custom,
}

impl PageSizeId {
    /// Canonical portrait dimensions in points, or `None` for `Custom`.
    pub fn dimensions_pt(self) -> Option<(f64, f64)> {
        match self {
            PageSizeId::A3 => Some((842.0, 1191.0)),
            PageSizeId::A4 => Some((595.0, 842.0)),
            PageSizeId::A5 => Some((420.0, 595.0)),
            PageSizeId::B4 => Some((709.0, 1001.0)),
            PageSizeId::B5 => Some((499.0, 709.0)),
            PageSizeId::Letter => Some((612.0, 792.0)),
            PageSizeId::Legal => Some((612.0, 1008.0)),
            PageSizeId::Executive => Some((540.0, 720.0)),
            PageSizeId::Tabloid => Some((792.0, 1224.0)),
            PageSizeId::Custom => None,
        }
    }

    const STANDARD: [PageSizeId; 9] = [
        PageSizeId::A3,
        PageSizeId::A4,
        PageSizeId::A5,
        PageSizeId::B4,
        PageSizeId::B5,
        PageSizeId::Letter,
        PageSizeId::Legal,
        PageSizeId::Executive,
        PageSizeId::Tabloid,
    ];

    /// Find the standard id whose dimensions match (width, height) in
    /// points, after rounding to whole points.
    fn match_points(width_pt: f64, height_pt: f64) -> Option<PageSizeId> {
        let w = width_pt.round();
        let h = height_pt.round();
        PageSizeId::STANDARD.iter().copied().find(|id| {
            let (sw, sh) = id.dimensions_pt().unwrap_or((0.0, 0.0));
            sw == w && sh == h
        })
    }
}

/// A page size: a standard identifier plus its dimensions in a unit.
///
/// Dimensions are always the portrait (unrotated) size; orientation is
/// applied by [`PageLayout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    id: PageSizeId,
    width: f64,
    height: f64,
    unit: Unit,
}

impl PageSize {
    /// The canonical size for a standard identifier.
    ///
    /// `PageSizeId::Custom` has no canonical dimensions and yields an
    /// invalid (zero-sized) page size.
    pub fn from_id(id: PageSizeId) -> PageSize {
        match id.dimensions_pt() {
            Some((w, h)) => PageSize {
                id,
                width: w,
                height: h,
                unit: Unit::Point,
            },
            None => PageSize {
                id: PageSizeId::Custom,
                width: 0.0,
                height: 0.0,
                unit: Unit::Point,
            },
        }
    }

    /// A size from explicit dimensions. If the rounded point size
    /// coincides with a standard definition, that id is adopted;
    /// otherwise the size is `Custom`.
    pub fn new(width: f64, height: f64, unit: Unit) -> PageSize {
        let k = unit.points_per_unit();
        let id = PageSizeId::match_points(width * k, height * k)
            .unwrap_or(PageSizeId::Custom);
        PageSize {
            id,
            width,
            height,
            unit,
        }
    }

    pub fn id(&self) -> PageSizeId {
        self.id
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Portrait dimensions in points.
    pub fn size_pt(&self) -> (f64, f64) {
        let k = self.unit.points_per_unit();
        (self.width * k, self.height * k)
    }

    /// A size is valid when both dimensions are positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Two sizes are equivalent when their rounded point dimensions
    /// match; the identifier is ignored.
    pub fn is_equivalent_to(&self, other: &PageSize) -> bool {
        let (aw, ah) = self.size_pt();
        let (bw, bh) = other.size_pt();
        aw.round() == bw.round() && ah.round() == bh.round()
    }
}

/// Page margins: left, top, right, bottom, in the layout's unit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margins {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Margins {
        Margins {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same value on all four sides.
    pub fn uniform(value: f64) -> Margins {
        Margins::new(value, value, value, value)
    }
}

/// Page orientation. Landscape swaps the portrait width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// An axis-aligned rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The aggregate page layout: size, orientation, margins, and the unit
/// the margins are expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    page_size: PageSize,
    orientation: Orientation,
    margins: Margins,
    unit: Unit,
}

impl Default for PageLayout {
    /// A4 portrait with 10 pt margins.
    fn default() -> Self {
        PageLayout {
            page_size: PageSize::from_id(PageSizeId::A4),
            orientation: Orientation::Portrait,
            margins: Margins::uniform(10.0),
            unit: Unit::Point,
        }
    }
}

impl PageLayout {
    pub fn new(
        page_size: PageSize,
        orientation: Orientation,
        margins: Margins,
        unit: Unit,
    ) -> PageLayout {
        PageLayout {
            page_size,
            orientation,
            margins,
            unit,
        }
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    /// Change the unit, converting the stored margins so they keep the
    /// same physical size.
    pub fn set_unit(&mut self, unit: Unit) {
        if unit != self.unit {
            self.margins = self.margins_in(unit);
            self.unit = unit;
        }
    }

    /// The margins converted into the given unit.
    pub fn margins_in(&self, unit: Unit) -> Margins {
        let k = self.unit.points_per_unit() / unit.points_per_unit();
        Margins::new(
            self.margins.left * k,
            self.margins.top * k,
            self.margins.right * k,
            self.margins.bottom * k,
        )
    }

    /// The oriented page rectangle in points.
    pub fn full_rect_pt(&self) -> Rect {
        let (w, h) = self.page_size.size_pt();
        let (width, height) = match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        };
        Rect {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    /// The paintable rectangle in points: the full rect inset by the
    /// margins.
    pub fn paint_rect_pt(&self) -> Rect {
        let full = self.full_rect_pt();
        let m = self.margins_in(Unit::Point);
        Rect {
            x: m.left,
            y: m.top,
            width: full.width - m.left - m.right,
            height: full.height - m.top - m.bottom,
        }
    }

    /// The full rect in device pixels at the given resolution (DPI),
    /// rounded to whole pixels.
    pub fn full_rect_pixels(&self, resolution: u32) -> Rect {
        scale_to_pixels(self.full_rect_pt(), resolution)
    }

    /// The paint rect in device pixels at the given resolution (DPI),
    /// rounded to whole pixels.
    pub fn paint_rect_pixels(&self, resolution: u32) -> Rect {
        scale_to_pixels(self.paint_rect_pt(), resolution)
    }

    /// Two layouts are equivalent when their oriented full rects and
    /// their margins match after rounding to whole points. Units and
    /// size identifiers are ignored.
    pub fn is_equivalent_to(&self, other: &PageLayout) -> bool {
        let a = self.full_rect_pt();
        let b = other.full_rect_pt();
        if a.width.round() != b.width.round() || a.height.round() != b.height.round() {
            return false;
        }
        rounded_margins_pt(self) == rounded_margins_pt(other)
    }
}

fn rounded_margins_pt(layout: &PageLayout) -> (i64, i64, i64, i64) {
    let m = layout.margins_in(Unit::Point);
    (
        m.left.round() as i64,
        m.top.round() as i64,
        m.right.round() as i64,
        m.bottom.round() as i64,
    )
}

fn scale_to_pixels(rect: Rect, resolution: u32) -> Rect {
    let scale = f64::from(resolution) / 72.0;
    Rect {
        x: (rect.x * scale).round(),
        y: (rect.y * scale).round(),
        width: (rect.width * scale).round(),
        height: (rect.height * scale).round(),
    }
}
