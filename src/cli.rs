//! Command implementations behind the `docwiz` binary.
//!
//! These play the section-form role: each edit reads the current section,
//! computes its complete next value and hands that whole value to the store.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{DocError, Result};
use crate::models::schema;
use crate::models::{Document, Endpoint, Feature, Persona, Record, Section, SectionKey};
use crate::render::{self, ExportFormat};
use crate::store::DocumentStore;

/// The record lists that can be edited entry by entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RecordList {
    Personas,
    Features,
    Endpoints,
}

impl RecordList {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personas => Persona::LIST,
            Self::Features => Feature::LIST,
            Self::Endpoints => Endpoint::LIST,
        }
    }
}

/// Parse a `key=value` argument. The value may itself contain `=`.
pub fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

pub fn parse_section(s: &str) -> Result<SectionKey> {
    SectionKey::from_str(s).ok_or_else(|| DocError::UnknownSection(s.to_string()))
}

// ============================================================
// Reading
// ============================================================

/// One line per section: fill marker, key and label.
pub fn list_sections(store: &DocumentStore) -> String {
    let doc = store.document();
    let mut out = String::new();
    for key in SectionKey::ALL {
        let mark = if doc.is_filled(key) { '●' } else { '○' };
        out.push_str(&format!("{} {:<15} {}\n", mark, key.as_str(), key.label()));
    }
    out
}

/// The field schema of a section, or of the records of a list.
pub fn describe_fields(key: SectionKey) -> String {
    let mut out = format!("{} ({})\n", key.label(), key.as_str());
    let fields = match key {
        SectionKey::Personas | SectionKey::Features => {
            schema::record_fields(key.as_str()).unwrap_or_default()
        }
        other => schema::fields(other),
    };
    for spec in fields {
        let kind = if spec.multiline { "text" } else { "line" };
        out.push_str(&format!("  {:<22} {:<5} {}\n", spec.key, kind, spec.label));
    }
    if key == SectionKey::Api {
        out.push_str("  endpoints (records):\n");
        for spec in schema::record_fields(Endpoint::LIST).unwrap_or_default() {
            out.push_str(&format!("    {:<20} {}\n", spec.key, spec.label));
        }
    }
    out
}

/// Pretty JSON of the whole document or of one section.
pub fn show(store: &DocumentStore, key: Option<SectionKey>) -> Result<String> {
    match key {
        Some(key) => Ok(serde_json::to_string_pretty(&store.section(key).to_value()?)?),
        None => store.export_data(),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub completion: u8,
    pub last_saved: Option<DateTime<Utc>>,
    pub project_name: Option<String>,
    pub personas: usize,
    pub features: usize,
    pub endpoints: usize,
    pub persistence_error: Option<String>,
}

pub fn status(store: &DocumentStore) -> StatusReport {
    let doc = store.document();
    StatusReport {
        completion: store.completion_percentage(),
        last_saved: store.last_saved(),
        project_name: doc.project_name().map(str::to_string),
        personas: doc.personas.len(),
        features: doc.features.len(),
        endpoints: doc.api.endpoints().len(),
        persistence_error: store.persistence_error().map(str::to_string),
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Documentation complete: {}%", self.completion)?;
        match self.last_saved {
            Some(at) => writeln!(f, "Last saved:    {}", at.to_rfc3339())?,
            None => writeln!(f, "Last saved:    never")?,
        }
        writeln!(
            f,
            "Project name:  {}",
            self.project_name.as_deref().unwrap_or("Not set")
        )?;
        writeln!(f, "Personas:      {}", self.personas)?;
        writeln!(f, "Features:      {}", self.features)?;
        writeln!(f, "API endpoints: {}", self.endpoints)?;
        if let Some(err) = &self.persistence_error {
            writeln!(f, "Warning: changes are not being saved ({})", err)?;
        }
        Ok(())
    }
}

// ============================================================
// Editing
// ============================================================

/// Set one field of a scalar section, replacing the section wholesale.
pub fn set_field(store: &mut DocumentStore, key: SectionKey, field: &str, value: String) -> Result<()> {
    let unknown = || DocError::UnknownField {
        section: key,
        field: field.to_string(),
    };

    let next = match store.section(key) {
        Section::Overview(mut overview) => {
            if !overview.set_field(field, value) {
                return Err(unknown());
            }
            Section::Overview(overview)
        }
        Section::Api(mut api) => {
            if !api.set_field(field, value) {
                return Err(unknown());
            }
            Section::Api(api)
        }
        Section::Map(key, mut map) => {
            if schema::find(key, field).is_none() {
                return Err(unknown());
            }
            map.set(field, value);
            Section::Map(key, map)
        }
        Section::Personas(_) | Section::Features(_) => return Err(unknown()),
    };

    store.update_section(next)
}

/// Replace a whole section from JSON text.
pub fn put_section(store: &mut DocumentStore, key: SectionKey, json: &str) -> Result<()> {
    let value = serde_json::from_str(json).map_err(|e| DocError::InvalidSection {
        section: key,
        reason: e.to_string(),
    })?;
    store.update_section_json(key, value)
}

/// Append a new record, returning its generated id.
pub fn add_record(
    store: &mut DocumentStore,
    list: RecordList,
    assignments: &[(String, String)],
) -> Result<String> {
    match list {
        RecordList::Personas => {
            let mut personas = store.document().personas.clone();
            let id = push_record(&mut personas, assignments)?;
            store.update_section(Section::Personas(personas))?;
            Ok(id)
        }
        RecordList::Features => {
            let mut features = store.document().features.clone();
            let id = push_record(&mut features, assignments)?;
            store.update_section(Section::Features(features))?;
            Ok(id)
        }
        RecordList::Endpoints => {
            let mut api = store.document().api.clone();
            let id = push_record(api.endpoints_mut(), assignments)?;
            store.update_section(Section::Api(api))?;
            Ok(id)
        }
    }
}

/// Change fields of the record with `id`.
pub fn edit_record(
    store: &mut DocumentStore,
    list: RecordList,
    id: &str,
    assignments: &[(String, String)],
) -> Result<()> {
    with_list(store, list, |records| match records {
        Records::Personas(v) => apply_to(v, id, assignments),
        Records::Features(v) => apply_to(v, id, assignments),
        Records::Endpoints(v) => apply_to(v, id, assignments),
    })
}

/// Remove the record with `id`.
pub fn remove_record(store: &mut DocumentStore, list: RecordList, id: &str) -> Result<()> {
    with_list(store, list, |records| match records {
        Records::Personas(v) => remove_from(v, id),
        Records::Features(v) => remove_from(v, id),
        Records::Endpoints(v) => remove_from(v, id),
    })
}

enum Records<'a> {
    Personas(&'a mut Vec<Persona>),
    Features(&'a mut Vec<Feature>),
    Endpoints(&'a mut Vec<Endpoint>),
}

/// Run `edit` on a copy of the list and store the whole result if it
/// succeeds. On error the store is left as it was.
fn with_list(
    store: &mut DocumentStore,
    list: RecordList,
    edit: impl FnOnce(Records<'_>) -> Result<()>,
) -> Result<()> {
    let next = match list {
        RecordList::Personas => {
            let mut personas = store.document().personas.clone();
            edit(Records::Personas(&mut personas))?;
            Section::Personas(personas)
        }
        RecordList::Features => {
            let mut features = store.document().features.clone();
            edit(Records::Features(&mut features))?;
            Section::Features(features)
        }
        RecordList::Endpoints => {
            let mut api = store.document().api.clone();
            edit(Records::Endpoints(api.endpoints_mut()))?;
            Section::Api(api)
        }
    };
    store.update_section(next)
}

fn assign<R: Record>(record: &mut R, assignments: &[(String, String)]) -> Result<()> {
    for (key, value) in assignments {
        if !record.set_field(key, value.clone()) {
            // Endpoints live inside the api section.
            let section = SectionKey::from_str(R::LIST).unwrap_or(SectionKey::Api);
            return Err(DocError::InvalidSection {
                section,
                reason: format!("{} records have no field '{}'", R::LIST, key),
            });
        }
    }
    Ok(())
}

fn push_record<R: Record>(records: &mut Vec<R>, assignments: &[(String, String)]) -> Result<String> {
    let mut record = R::create();
    assign(&mut record, assignments)?;
    let id = record.id().to_string();
    records.push(record);
    Ok(id)
}

fn apply_to<R: Record>(records: &mut [R], id: &str, assignments: &[(String, String)]) -> Result<()> {
    let record = records
        .iter_mut()
        .find(|r| r.id() == id)
        .ok_or_else(|| not_found::<R>(id))?;
    assign(record, assignments)
}

fn remove_from<R: Record>(records: &mut Vec<R>, id: &str) -> Result<()> {
    let before = records.len();
    records.retain(|r| r.id() != id);
    if records.len() == before {
        return Err(not_found::<R>(id));
    }
    Ok(())
}

fn not_found<R: Record>(id: &str) -> DocError {
    DocError::RecordNotFound {
        list: R::LIST,
        id: id.to_string(),
    }
}

// ============================================================
// Export / Import
// ============================================================

/// Render the current document and write it atomically.
///
/// `out` defaults to the derived export file name inside `export_dir`.
pub async fn export_to_file(
    doc: Document,
    format: ExportFormat,
    out: Option<PathBuf>,
    export_dir: &Path,
) -> Result<PathBuf> {
    let path = out.unwrap_or_else(|| export_dir.join(render::export_filename(&doc, format)));
    let bytes = render::render_detached(doc, format).await?;
    crate::io::atomic_write(&path, &bytes)?;
    tracing::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

pub fn import_file(store: &mut DocumentStore, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)?;
    store.try_import_data(&text)
}
