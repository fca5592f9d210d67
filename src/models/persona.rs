use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::{new_id, wire, Record};

const FIELDS: [&str; 7] = [
    "id",
    "name",
    "demographics",
    "goals",
    "painPoints",
    "behaviors",
    "quote",
];

/// A user persona: who the product is for and what they struggle with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub demographics: String,
    pub goals: String,
    pub pain_points: String,
    pub behaviors: String,
    /// A representative quote, rendered in quotation marks.
    pub quote: String,
    pub extra: Map<String, Value>,
}

impl Persona {
    fn text_field(&self, key: &str) -> Option<&str> {
        let value: &str = match key {
            "id" => &self.id,
            "name" => &self.name,
            "demographics" => &self.demographics,
            "goals" => &self.goals,
            "painPoints" => &self.pain_points,
            "behaviors" => &self.behaviors,
            "quote" => &self.quote,
            _ => return None,
        };
        Some(value)
    }
}

impl Serialize for Persona {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for key in FIELDS {
            wire::entry(&mut map, key, self.text_field(key), &self.extra)?;
        }
        wire::passengers(&mut map, &self.extra, &FIELDS)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Persona {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::deserialize(deserializer)?;
        Ok(Self {
            id: wire::take_text(&mut extra, "id").unwrap_or_default(),
            name: wire::take_text(&mut extra, "name").unwrap_or_default(),
            demographics: wire::take_text(&mut extra, "demographics").unwrap_or_default(),
            goals: wire::take_text(&mut extra, "goals").unwrap_or_default(),
            pain_points: wire::take_text(&mut extra, "painPoints").unwrap_or_default(),
            behaviors: wire::take_text(&mut extra, "behaviors").unwrap_or_default(),
            quote: wire::take_text(&mut extra, "quote").unwrap_or_default(),
            extra,
        })
    }
}

impl Record for Persona {
    const LIST: &'static str = "personas";

    fn create() -> Self {
        Self {
            id: new_id(),
            ..Default::default()
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_field(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "name" => &mut self.name,
            "demographics" => &mut self.demographics,
            "goals" => &mut self.goals,
            "painPoints" => &mut self.pain_points,
            "behaviors" => &mut self.behaviors,
            "quote" => &mut self.quote,
            _ => return false,
        };
        *slot = value;
        self.extra.remove(key);
        true
    }
}
