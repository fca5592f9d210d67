use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::{new_id, wire, Record};

const API_FIELDS: [&str; 3] = ["baseUrl", "authMethod", "endpoints"];

/// API documentation: base URL, auth method and the endpoint list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub auth_method: Option<String>,
    /// `Some(vec![])` still counts as a present key for completion.
    pub endpoints: Option<Vec<Endpoint>>,
    /// Unknown keys, and known keys holding a value of another type.
    pub extra: Map<String, Value>,
}

impl Serialize for ApiSection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        wire::entry(&mut map, "baseUrl", self.base_url.as_deref(), &self.extra)?;
        wire::entry(&mut map, "authMethod", self.auth_method.as_deref(), &self.extra)?;
        wire::entry(&mut map, "endpoints", self.endpoints.as_ref(), &self.extra)?;
        wire::passengers(&mut map, &self.extra, &API_FIELDS)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for ApiSection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra: Map<String, Value> = Map::deserialize(deserializer)?;
        // A list of endpoints must be well formed; any other value is kept as is
        let endpoints = if matches!(extra.get("endpoints"), Some(Value::Array(_))) {
            extra
                .remove("endpoints")
                .map(serde_json::from_value::<Vec<Endpoint>>)
                .transpose()
                .map_err(D::Error::custom)?
        } else {
            None
        };
        Ok(Self {
            base_url: wire::take_text(&mut extra, "baseUrl"),
            auth_method: wire::take_text(&mut extra, "authMethod"),
            endpoints,
            extra,
        })
    }
}

impl ApiSection {
    pub fn key_count(&self) -> usize {
        usize::from(self.base_url.is_some())
            + usize::from(self.auth_method.is_some())
            + usize::from(self.endpoints.is_some())
            + self.extra.len()
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        self.endpoints.as_deref().unwrap_or_default()
    }

    /// The endpoint list for editing, created if absent.
    pub fn endpoints_mut(&mut self) -> &mut Vec<Endpoint> {
        self.extra.remove("endpoints");
        self.endpoints.get_or_insert_with(Vec::new)
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            "baseUrl" => self.base_url.as_deref(),
            "authMethod" => self.auth_method.as_deref(),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.field(key).filter(|v| !v.is_empty())
    }

    /// Set a scalar field. Endpoints are edited as records, not here.
    pub fn set_field(&mut self, key: &str, value: String) -> bool {
        match key {
            "baseUrl" => self.base_url = Some(value),
            "authMethod" => self.auth_method = Some(value),
            _ => return false,
        }
        self.extra.remove(key);
        true
    }

    /// Whether there is anything for a renderer to print.
    pub fn has_content(&self) -> bool {
        self.text("baseUrl").is_some()
            || self.text("authMethod").is_some()
            || self.endpoints().iter().any(|e| !e.path.is_empty())
    }
}

const ENDPOINT_FIELDS: [&str; 7] = [
    "id",
    "path",
    "method",
    "description",
    "requestExample",
    "responseExample",
    "authentication",
];

/// A single documented HTTP endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub id: String,
    pub path: String,
    pub method: String,
    pub description: String,
    pub request_example: String,
    pub response_example: String,
    pub authentication: String,
    pub extra: Map<String, Value>,
}

impl Endpoint {
    fn text_field(&self, key: &str) -> Option<&str> {
        let value: &str = match key {
            "id" => &self.id,
            "path" => &self.path,
            "method" => &self.method,
            "description" => &self.description,
            "requestExample" => &self.request_example,
            "responseExample" => &self.response_example,
            "authentication" => &self.authentication,
            _ => return None,
        };
        Some(value)
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for key in ENDPOINT_FIELDS {
            wire::entry(&mut map, key, self.text_field(key), &self.extra)?;
        }
        wire::passengers(&mut map, &self.extra, &ENDPOINT_FIELDS)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::deserialize(deserializer)?;
        Ok(Self {
            id: wire::take_text(&mut extra, "id").unwrap_or_default(),
            path: wire::take_text(&mut extra, "path").unwrap_or_default(),
            method: wire::take_text(&mut extra, "method").unwrap_or_else(|| "GET".to_string()),
            description: wire::take_text(&mut extra, "description").unwrap_or_default(),
            request_example: wire::take_text(&mut extra, "requestExample").unwrap_or_default(),
            response_example: wire::take_text(&mut extra, "responseExample").unwrap_or_default(),
            authentication: wire::take_text(&mut extra, "authentication").unwrap_or_default(),
            extra,
        })
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            id: String::new(),
            path: String::new(),
            method: "GET".to_string(),
            description: String::new(),
            request_example: String::new(),
            response_example: String::new(),
            authentication: String::new(),
            extra: Map::new(),
        }
    }
}

impl Record for Endpoint {
    const LIST: &'static str = "endpoints";

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
            "path" => &mut self.path,
            "method" => &mut self.method,
            "description" => &mut self.description,
            "requestExample" => &mut self.request_example,
            "responseExample" => &mut self.response_example,
            "authentication" => &mut self.authentication,
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
    fn test_new_endpoint_defaults_to_get() {
        let endpoint = Endpoint::create();
        assert_eq!(endpoint.method, "GET");
        assert!(!endpoint.id.is_empty());
    }

    #[test]
    fn test_empty_endpoint_list_is_a_present_key() {
        let api = ApiSection {
            endpoints: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(api.key_count(), 1);
        assert!(!api.has_content());
    }

    #[test]
    fn test_null_endpoint_fields_are_kept() {
        let endpoint: Endpoint =
            serde_json::from_str(r#"{"id":"e1","path":"/trips","method":null}"#).unwrap();
        assert_eq!(endpoint.method, "GET");

        let back = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(back["method"], Value::Null);
        assert_eq!(back["path"], "/trips");
    }

    #[test]
    fn test_malformed_endpoint_list_is_rejected() {
        let result = serde_json::from_str::<ApiSection>(r#"{"endpoints":["GET /"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_editing_replaces_a_null_endpoint_list() {
        let mut api: ApiSection = serde_json::from_str(r#"{"endpoints":null}"#).unwrap();
        assert_eq!(api.key_count(), 1);

        api.endpoints_mut().push(Endpoint::create());

        let back = serde_json::to_value(&api).unwrap();
        assert_eq!(back["endpoints"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_endpoint_without_path_is_not_content() {
        let api = ApiSection {
            endpoints: Some(vec![Endpoint::create()]),
            ..Default::default()
        };
        assert!(!api.has_content());
    }
}
