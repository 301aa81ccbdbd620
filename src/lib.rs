pub mod emit;
pub mod engine;
pub mod error;
pub mod layout;
pub mod objects;
pub mod writer;

pub use engine::PdfEngine;
pub use error::{PdfError, Result};
pub use layout::{Margins, Orientation, PageLayout, PageSize, PageSizeId, Rect, Unit};
pub use writer::PdfWriter;
