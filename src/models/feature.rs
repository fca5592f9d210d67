use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::{new_id, wire, Record};

const FIELDS: [&str; 5] = ["id", "name", "userStory", "acceptanceCriteria", "description"];

/// A feature specification.
///
/// `acceptance_criteria` is free text with one criterion per line; the
/// Markdown renderer turns each non-blank line into a bullet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    pub id: String,
    pub name: String,
    /// User story in "As a... I want... So that..." format.
    pub user_story: String,
    pub acceptance_criteria: String,
    pub description: String,
    pub extra: Map<String, Value>,
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for key in FIELDS {
            wire::entry(&mut map, key, self.text_field(key), &self.extra)?;
        }
        wire::passengers(&mut map, &self.extra, &FIELDS)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Feature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::deserialize(deserializer)?;
        Ok(Self {
            id: wire::take_text(&mut extra, "id").unwrap_or_default(),
            name: wire::take_text(&mut extra, "name").unwrap_or_default(),
            user_story: wire::take_text(&mut extra, "userStory").unwrap_or_default(),
            acceptance_criteria: wire::take_text(&mut extra, "acceptanceCriteria")
                .unwrap_or_default(),
            description: wire::take_text(&mut extra, "description").unwrap_or_default(),
            extra,
        })
    }
}

impl Feature {
    fn text_field(&self, key: &str) -> Option<&str> {
        let value: &str = match key {
            "id" => &self.id,
            "name" => &self.name,
            "userStory" => &self.user_story,
            "acceptanceCriteria" => &self.acceptance_criteria,
            "description" => &self.description,
            _ => return None,
        };
        Some(value)
    }

    /// Acceptance criteria split into trimmed, non-blank lines.
    pub fn criteria(&self) -> impl Iterator<Item = &str> {
        self.acceptance_criteria
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

impl Record for Feature {
    const LIST: &'static str = "features";

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
            "userStory" => &mut self.user_story,
            "acceptanceCriteria" => &mut self.acceptance_criteria,
            "description" => &mut self.description,
            _ => return false,
        };
        *slot = value;
        self.extra.remove(key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_drop_blank_lines_and_trim() {
        let feature = Feature {
            acceptance_criteria: "  a\n\n   \nb  \r\n".to_string(),
            ..Default::default()
        };
        assert_eq!(feature.criteria().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_created_features_get_distinct_ids() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| Feature::create().id).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_id_cannot_be_set_as_a_field() {
        let mut feature = Feature::create();
        let id = feature.id.clone();
        assert!(!feature.set_field("id", "1".to_string()));
        assert_eq!(feature.id, id);
    }
}
