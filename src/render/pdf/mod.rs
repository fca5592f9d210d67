//! PDF export.
//!
//! Rendering happens in two steps: [`layout`] positions every line on A4
//! pages, then [`write`] serializes that plan. Nothing is returned unless
//! both steps succeed.

mod layout;
mod metrics;
mod writer;

pub use layout::{layout, layout_with, Cursor, PageGeometry, PdfPage, PdfPlan, TextLine};
pub use metrics::{text_width_mm, wrap};
pub use writer::write;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::Document;

pub fn render(doc: &Document, generated_on: NaiveDate) -> Result<Vec<u8>> {
    let plan = layout(doc, generated_on);
    tracing::debug!("Laid out PDF on {} page(s)", plan.pages.len());
    write(&plan)
}
