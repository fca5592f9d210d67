//! Page layout: turns a document into positioned lines of text.
//!
//! The whole plan is computed before anything is written, so a document that
//! fails to lay out never produces a partial file.

use chrono::NaiveDate;

use super::metrics;
use crate::models::schema;
use crate::models::{Document, FieldMap, SectionKey};
use crate::render::format_date;

/// Page size and spacing, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub line_height: f32,
    /// Extra space after every text block.
    pub block_gap: f32,
}

impl PageGeometry {
    pub const A4: PageGeometry = PageGeometry {
        width: 210.0,
        height: 297.0,
        margin: 20.0,
        line_height: 7.0,
        block_gap: 3.0,
    };

    pub fn printable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// One line of text. `y` is the baseline, measured from the top of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub bold: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    pub lines: Vec<TextLine>,
}

/// The fully laid out document.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfPlan {
    pub geometry: PageGeometry,
    pub title: String,
    pub pages: Vec<PdfPage>,
}

const TITLE_SIZE: f32 = 20.0;
const DATE_SIZE: f32 = 10.0;
const SECTION_SIZE: f32 = 16.0;
const ENTRY_SIZE: f32 = 14.0;
const NAME_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 11.0;

const SECTION_GAP: f32 = 10.0;
const ENTRY_GAP: f32 = 5.0;

/// Sections laid out generically from their schema, after the three
/// hand-ordered ones.
const SCHEMA_SECTIONS: [SectionKey; 8] = [
    SectionKey::Design,
    SectionKey::Database,
    SectionKey::Environment,
    SectionKey::Testing,
    SectionKey::Deployment,
    SectionKey::VersionControl,
    SectionKey::Security,
    SectionKey::Compliance,
];

/// A vertical cursor over a growing list of pages.
pub struct Cursor {
    geometry: PageGeometry,
    pages: Vec<PdfPage>,
    y: f32,
}

impl Cursor {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![PdfPage::default()],
            y: geometry.margin,
        }
    }

    /// Emit `text` wrapped to the printable width, one line per line
    /// height, breaking pages as needed, followed by the block gap.
    pub fn add_text(&mut self, text: &str, font_size: f32, bold: bool) {
        let g = self.geometry;
        for line in metrics::wrap(text, g.printable_width(), font_size, bold) {
            if self.y + g.line_height > g.height - g.margin {
                self.pages.push(PdfPage::default());
                self.y = g.margin;
            }
            if let Some(page) = self.pages.last_mut() {
                page.lines.push(TextLine {
                    text: line,
                    x: g.margin,
                    y: self.y,
                    font_size,
                    bold,
                });
            }
            self.y += g.line_height;
        }
        self.y += g.block_gap;
    }

    pub fn skip(&mut self, mm: f32) {
        self.y += mm;
    }

    pub fn finish(self, title: String) -> PdfPlan {
        PdfPlan {
            geometry: self.geometry,
            title,
            pages: self.pages,
        }
    }
}

/// Lay out `doc` on A4 pages.
pub fn layout(doc: &Document, generated_on: NaiveDate) -> PdfPlan {
    layout_with(doc, generated_on, PageGeometry::A4)
}

pub fn layout_with(doc: &Document, generated_on: NaiveDate, geometry: PageGeometry) -> PdfPlan {
    let mut cursor = Cursor::new(geometry);

    cursor.add_text("PROJECT DOCUMENTATION", TITLE_SIZE, true);
    cursor.add_text(&format!("Generated on {}", format_date(generated_on)), DATE_SIZE, false);
    cursor.skip(SECTION_GAP);

    layout_overview(&mut cursor, doc);
    layout_personas(&mut cursor, doc);
    layout_features(&mut cursor, doc);
    for key in SCHEMA_SECTIONS {
        if let Some(map) = doc.field_map(key) {
            layout_field_map(&mut cursor, key, map);
        }
        // API sits between design and database, as in every other export
        if key == SectionKey::Design {
            layout_api(&mut cursor, doc);
        }
    }

    let title = match doc.project_name() {
        Some(name) => format!("{} Documentation", name),
        None => "Project Documentation".to_string(),
    };
    cursor.finish(title)
}

fn layout_overview(cursor: &mut Cursor, doc: &Document) {
    let overview = &doc.overview;
    if !overview.has_content() {
        return;
    }

    cursor.add_text("PROJECT OVERVIEW", SECTION_SIZE, true);
    if let Some(name) = overview.text("projectName") {
        cursor.add_text(&format!("Project Name: {}", name), NAME_SIZE, true);
    }
    for (key, label) in [
        ("description", "Description"),
        ("primaryGoals", "Primary Goals"),
        ("keyObjectives", "Key Objectives"),
    ] {
        if let Some(value) = overview.text(key) {
            cursor.add_text(&format!("{}: {}", label, value), BODY_SIZE, false);
        }
    }
    cursor.skip(SECTION_GAP);
}

fn layout_personas(cursor: &mut Cursor, doc: &Document) {
    if doc.personas.is_empty() {
        return;
    }

    cursor.add_text("USER PERSONAS", SECTION_SIZE, true);
    for (index, persona) in doc.personas.iter().enumerate() {
        if persona.name.is_empty() {
            continue;
        }
        cursor.add_text(&format!("{}. {}", index + 1, persona.name), ENTRY_SIZE, true);
        body(cursor, "Demographics", &persona.demographics);
        body(cursor, "Goals", &persona.goals);
        body(cursor, "Pain Points", &persona.pain_points);
        body(cursor, "Behaviors", &persona.behaviors);
        if !persona.quote.is_empty() {
            cursor.add_text(&format!("Quote: \"{}\"", persona.quote), BODY_SIZE, false);
        }
        cursor.skip(ENTRY_GAP);
    }
}

fn layout_features(cursor: &mut Cursor, doc: &Document) {
    if doc.features.is_empty() {
        return;
    }

    cursor.add_text("FEATURE SPECIFICATIONS", SECTION_SIZE, true);
    for (index, feature) in doc.features.iter().enumerate() {
        if feature.name.is_empty() {
            continue;
        }
        cursor.add_text(&format!("{}. {}", index + 1, feature.name), ENTRY_SIZE, true);
        body(cursor, "User Story", &feature.user_story);
        body(cursor, "Acceptance Criteria", &feature.acceptance_criteria);
        body(cursor, "Description", &feature.description);
        cursor.skip(ENTRY_GAP);
    }
}

fn layout_api(cursor: &mut Cursor, doc: &Document) {
    let api = &doc.api;
    if !api.has_content() {
        return;
    }

    cursor.add_text(&section_heading(SectionKey::Api), SECTION_SIZE, true);
    for spec in schema::fields(SectionKey::Api) {
        if let Some(value) = api.text(spec.key) {
            cursor.add_text(&format!("{}: {}", spec.label, value), BODY_SIZE, false);
        }
    }
    for (index, endpoint) in api.endpoints().iter().enumerate() {
        if endpoint.path.is_empty() {
            continue;
        }
        let title = format!("{}. {} {}", index + 1, endpoint.method.trim(), endpoint.path);
        cursor.add_text(title.replace("  ", " ").as_str(), ENTRY_SIZE, true);
        body(cursor, "Description", &endpoint.description);
        body(cursor, "Authentication", &endpoint.authentication);
        body(cursor, "Request Example", &endpoint.request_example);
        body(cursor, "Response Example", &endpoint.response_example);
        cursor.skip(ENTRY_GAP);
    }
    cursor.skip(SECTION_GAP);
}

fn layout_field_map(cursor: &mut Cursor, key: SectionKey, map: &FieldMap) {
    let fields = schema::fields(key);
    if !map.has_text_in(fields.iter().map(|f| f.key)) {
        return;
    }

    cursor.add_text(&section_heading(key), SECTION_SIZE, true);
    for spec in fields {
        if let Some(value) = map.text(spec.key) {
            cursor.add_text(&format!("{}: {}", spec.label, value), BODY_SIZE, false);
        }
    }
    cursor.skip(SECTION_GAP);
}

fn body(cursor: &mut Cursor, label: &str, value: &str) {
    if !value.is_empty() {
        cursor.add_text(&format!("{}: {}", label, value), BODY_SIZE, false);
    }
}

/// Upper-cased section title without its leading symbol.
fn section_heading(key: SectionKey) -> String {
    key.title()
        .trim_start_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_uppercase()
}
