//! Domain models for DocWizard.
//!
//! # Core Concepts
//!
//! - [`Document`]: The aggregated project documentation, made of twelve
//!   named sections in a fixed canonical order (see [`SectionKey::ALL`]).
//! - [`Section`]: One section's whole value. The store only ever replaces a
//!   section wholesale; it never patches individual fields.
//!
//! ## Section shapes
//!
//! - [`Overview`] and [`ApiSection`]: typed records with optional fields.
//! - [`Persona`], [`Feature`] and [`Endpoint`]: typed records kept in ordered
//!   lists, each carrying a unique id (see [`Record`]).
//! - [`FieldMap`]: free-form field maps for the remaining sections. Their
//!   known keys are described by the field schema in [`schema`].
//!
//! Keys an import brings along that no form writes are kept verbatim as
//! inert passengers; no renderer reads them.

mod api;
mod document;
mod feature;
mod field_map;
mod overview;
mod persona;
pub mod schema;
mod wire;

pub use api::*;
pub use document::*;
pub use feature::*;
pub use field_map::*;
pub use overview::*;
pub use persona::*;

use uuid::Uuid;

/// Generate a fresh record id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A list entry edited through the generic record editor.
///
/// Implemented by [`Persona`], [`Feature`] and [`Endpoint`].
pub trait Record: Clone {
    /// Human name of the list this record lives in, e.g. `"personas"`.
    const LIST: &'static str;

    /// A new, empty record with a freshly generated id.
    fn create() -> Self;

    fn id(&self) -> &str;

    /// Set a named text field. Returns `false` for unknown keys and for `id`,
    /// which is fixed at creation time.
    fn set_field(&mut self, key: &str, value: String) -> bool;
}
