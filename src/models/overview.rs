use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::wire;

const FIELDS: [&str; 5] = [
    "projectName",
    "description",
    "primaryGoals",
    "keyObjectives",
    "targetAudience",
];

/// The project overview: name, description and goals.
///
/// Every field is optional and an absent field is distinct from an empty one:
/// the completion metric counts a key that is present with an empty value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overview {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub primary_goals: Option<String>,
    pub key_objectives: Option<String>,
    pub target_audience: Option<String>,
    /// Keys from an import that no form writes, and known keys whose value
    /// is not a string.
    pub extra: Map<String, Value>,
}

impl Serialize for Overview {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for key in FIELDS {
            wire::entry(&mut map, key, self.field(key), &self.extra)?;
        }
        wire::passengers(&mut map, &self.extra, &FIELDS)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Overview {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::deserialize(deserializer)?;
        Ok(Self {
            project_name: wire::take_text(&mut extra, "projectName"),
            description: wire::take_text(&mut extra, "description"),
            primary_goals: wire::take_text(&mut extra, "primaryGoals"),
            key_objectives: wire::take_text(&mut extra, "keyObjectives"),
            target_audience: wire::take_text(&mut extra, "targetAudience"),
            extra,
        })
    }
}

impl Overview {
    /// Number of keys present, including empty ones and unknown passengers.
    pub fn key_count(&self) -> usize {
        [
            &self.project_name,
            &self.description,
            &self.primary_goals,
            &self.key_objectives,
            &self.target_audience,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
            + self.extra.len()
    }

    /// The value of a named field, by its wire key.
    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            "projectName" => self.project_name.as_deref(),
            "description" => self.description.as_deref(),
            "primaryGoals" => self.primary_goals.as_deref(),
            "keyObjectives" => self.key_objectives.as_deref(),
            "targetAudience" => self.target_audience.as_deref(),
            _ => None,
        }
    }

    /// Non-empty value of a named field.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.field(key).filter(|v| !v.is_empty())
    }

    /// Set a named field. Returns `false` if `key` is not an overview field.
    pub fn set_field(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "projectName" => &mut self.project_name,
            "description" => &mut self.description,
            "primaryGoals" => &mut self.primary_goals,
            "keyObjectives" => &mut self.key_objectives,
            "targetAudience" => &mut self.target_audience,
            _ => return false,
        };
        *slot = Some(value);
        self.extra.remove(key);
        true
    }

    /// Whether any of the fields the renderers print holds text.
    ///
    /// The section is rendered when any of project name, description,
    /// primary goals or key objectives has text, not only the project name,
    /// so an overview with goals but no name still appears in exports.
    pub fn has_content(&self) -> bool {
        ["projectName", "description", "primaryGoals", "keyObjectives"]
            .iter()
            .any(|k| self.text(k).is_some())
    }
}
