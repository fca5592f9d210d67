//! JSON export: the canonical wire format for export and import.

use crate::error::Result;
use crate::models::Document;

/// Pretty-printed (two-space) document, sections in declared order.
pub fn render(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_printed_with_two_spaces() {
        let json = render(&Document::new()).unwrap();
        assert!(json.starts_with("{\n  \"overview\": {},\n  \"personas\": [],"));
        assert!(json.ends_with("\"compliance\": {}\n}"));
    }
}
