use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiSection, Feature, FieldMap, Overview, Persona};
use crate::error::{DocError, Result};

/// The aggregated project documentation.
///
/// Serialized with camelCase keys in declaration order, which is also the
/// canonical section order. Missing sections deserialize to their empty
/// default, so parsing any JSON object "merges it over" the empty document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub overview: Overview,
    pub personas: Vec<Persona>,
    pub features: Vec<Feature>,
    pub design: FieldMap,
    pub api: ApiSection,
    pub database: FieldMap,
    pub environment: FieldMap,
    pub testing: FieldMap,
    pub deployment: FieldMap,
    pub version_control: FieldMap,
    pub security: FieldMap,
    pub compliance: FieldMap,
    /// Top-level keys from an import that are not sections.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of one section's value.
    pub fn section(&self, key: SectionKey) -> Section {
        match key {
            SectionKey::Overview => Section::Overview(self.overview.clone()),
            SectionKey::Personas => Section::Personas(self.personas.clone()),
            SectionKey::Features => Section::Features(self.features.clone()),
            SectionKey::Api => Section::Api(self.api.clone()),
            other => Section::Map(other, self.field_map(other).cloned().unwrap_or_default()),
        }
    }

    /// Replace one section wholesale, moving the new value in.
    ///
    /// A [`Section::Map`] tagged with a typed section's key is rejected and
    /// leaves the document unchanged.
    pub fn replace_section(&mut self, section: Section) -> Result<()> {
        match section {
            Section::Overview(v) => self.overview = v,
            Section::Personas(v) => self.personas = v,
            Section::Features(v) => self.features = v,
            Section::Api(v) => self.api = v,
            Section::Map(key, v) => {
                let slot = self.field_map_mut(key).ok_or_else(|| DocError::InvalidSection {
                    section: key,
                    reason: "not a free-form section".to_string(),
                })?;
                *slot = v;
            }
        }
        Ok(())
    }

    /// The field map backing a free-form section, or `None` for typed sections.
    pub fn field_map(&self, key: SectionKey) -> Option<&FieldMap> {
        match key {
            SectionKey::Design => Some(&self.design),
            SectionKey::Database => Some(&self.database),
            SectionKey::Environment => Some(&self.environment),
            SectionKey::Testing => Some(&self.testing),
            SectionKey::Deployment => Some(&self.deployment),
            SectionKey::VersionControl => Some(&self.version_control),
            SectionKey::Security => Some(&self.security),
            SectionKey::Compliance => Some(&self.compliance),
            SectionKey::Overview | SectionKey::Personas | SectionKey::Features | SectionKey::Api => {
                None
            }
        }
    }

    fn field_map_mut(&mut self, key: SectionKey) -> Option<&mut FieldMap> {
        match key {
            SectionKey::Design => Some(&mut self.design),
            SectionKey::Database => Some(&mut self.database),
            SectionKey::Environment => Some(&mut self.environment),
            SectionKey::Testing => Some(&mut self.testing),
            SectionKey::Deployment => Some(&mut self.deployment),
            SectionKey::VersionControl => Some(&mut self.version_control),
            SectionKey::Security => Some(&mut self.security),
            SectionKey::Compliance => Some(&mut self.compliance),
            SectionKey::Overview | SectionKey::Personas | SectionKey::Features | SectionKey::Api => {
                None
            }
        }
    }

    /// Structural fill test used by the completion metric.
    ///
    /// Lists are filled when non-empty; every other section is filled as soon
    /// as it has one key, even if that key maps to an empty string.
    pub fn is_filled(&self, key: SectionKey) -> bool {
        match key {
            SectionKey::Overview => self.overview.key_count() > 0,
            SectionKey::Personas => !self.personas.is_empty(),
            SectionKey::Features => !self.features.is_empty(),
            SectionKey::Api => self.api.key_count() > 0,
            other => self.field_map(other).is_some_and(|m| !m.is_empty()),
        }
    }

    pub fn filled_count(&self) -> usize {
        SectionKey::ALL.iter().filter(|k| self.is_filled(**k)).count()
    }

    /// Trimmed, non-empty project name.
    pub fn project_name(&self) -> Option<&str> {
        self.overview
            .project_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// The twelve documentation sections, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    Overview,
    Personas,
    Features,
    Design,
    Api,
    Database,
    Environment,
    Testing,
    Deployment,
    VersionControl,
    Security,
    Compliance,
}

impl SectionKey {
    pub const ALL: [SectionKey; 12] = [
        Self::Overview,
        Self::Personas,
        Self::Features,
        Self::Design,
        Self::Api,
        Self::Database,
        Self::Environment,
        Self::Testing,
        Self::Deployment,
        Self::VersionControl,
        Self::Security,
        Self::Compliance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Personas => "personas",
            Self::Features => "features",
            Self::Design => "design",
            Self::Api => "api",
            Self::Database => "database",
            Self::Environment => "environment",
            Self::Testing => "testing",
            Self::Deployment => "deployment",
            Self::VersionControl => "versionControl",
            Self::Security => "security",
            Self::Compliance => "compliance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Heading used in exported documents.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Overview => "🎯 Project Overview",
            Self::Personas => "👥 User Personas",
            Self::Features => "⚙️ Feature Specifications",
            Self::Design => "🎨 Design Assets",
            Self::Api => "🔌 API Documentation",
            Self::Database => "🗄️ Database Schema",
            Self::Environment => "🌍 Environment Setup",
            Self::Testing => "🧪 Testing Guidelines",
            Self::Deployment => "🚀 Deployment Instructions",
            Self::VersionControl => "📋 Version Control Practices",
            Self::Security => "🔒 Security Practices",
            Self::Compliance => "✅ Compliance Requirements",
        }
    }

    /// Short label for navigation.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overview => "Project Overview",
            Self::Personas => "User Personas",
            Self::Features => "Feature Specs",
            Self::Design => "Design Assets",
            Self::Api => "API Documentation",
            Self::Database => "Database Schema",
            Self::Environment => "Environment Setup",
            Self::Testing => "Testing Guidelines",
            Self::Deployment => "Deployment",
            Self::VersionControl => "Version Control",
            Self::Security => "Security Practices",
            Self::Compliance => "Compliance",
        }
    }

    /// Whether the section is an ordered list of records.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::Personas | Self::Features)
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One section's complete value, as handed to the store by a section form.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Overview(Overview),
    Personas(Vec<Persona>),
    Features(Vec<Feature>),
    Api(ApiSection),
    /// One of the free-form sections, tagged with its key.
    Map(SectionKey, FieldMap),
}

impl Section {
    pub fn key(&self) -> SectionKey {
        match self {
            Self::Overview(_) => SectionKey::Overview,
            Self::Personas(_) => SectionKey::Personas,
            Self::Features(_) => SectionKey::Features,
            Self::Api(_) => SectionKey::Api,
            Self::Map(key, _) => *key,
        }
    }

    /// Build a section from loosely typed JSON, as received from a form.
    pub fn from_value(key: SectionKey, value: Value) -> serde_json::Result<Self> {
        Ok(match key {
            SectionKey::Overview => Self::Overview(serde_json::from_value(value)?),
            SectionKey::Personas => Self::Personas(serde_json::from_value(value)?),
            SectionKey::Features => Self::Features(serde_json::from_value(value)?),
            SectionKey::Api => Self::Api(serde_json::from_value(value)?),
            other => Self::Map(other, serde_json::from_value(value)?),
        })
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            Self::Overview(v) => serde_json::to_value(v),
            Self::Personas(v) => serde_json::to_value(v),
            Self::Features(v) => serde_json::to_value(v),
            Self::Api(v) => serde_json::to_value(v),
            Self::Map(_, v) => serde_json::to_value(v),
        }
    }
}
