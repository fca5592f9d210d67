//! Markdown export.
//!
//! A fixed traversal of the twelve sections in canonical order. Sections and
//! fields without text are skipped entirely, so an untouched section never
//! leaves an empty heading behind.

use chrono::NaiveDate;

use super::format_date;
use crate::models::schema::{self, FieldSpec};
use crate::models::{ApiSection, Document, Feature, FieldMap, Overview, Persona, SectionKey};

const SEPARATOR: &str = "---\n\n";

/// Sections rendered generically from their field schema.
const SCHEMA_SECTIONS: [SectionKey; 7] = [
    SectionKey::Database,
    SectionKey::Environment,
    SectionKey::Testing,
    SectionKey::Deployment,
    SectionKey::VersionControl,
    SectionKey::Security,
    SectionKey::Compliance,
];

pub fn render(doc: &Document, generated_on: NaiveDate) -> String {
    let mut md = String::new();

    md.push_str("# 📋 Project Documentation\n\n");
    md.push_str(&format!("*Generated on {}*\n\n", format_date(generated_on)));
    md.push_str(SEPARATOR);

    render_toc(&mut md);
    render_overview(&mut md, &doc.overview);
    render_personas(&mut md, &doc.personas);
    render_features(&mut md, &doc.features);
    render_design(&mut md, &doc.design);
    render_api(&mut md, &doc.api);
    for key in SCHEMA_SECTIONS {
        if let Some(map) = doc.field_map(key) {
            render_field_map(&mut md, key, map);
        }
    }

    md
}

/// Link target for a section title: lower-cased, every character outside
/// `a-z0-9` turned into `-`, runs collapsed and the ends trimmed.
///
/// `"🎯 Project Overview"` → `"project-overview"`.
pub fn anchor(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn render_toc(md: &mut String) {
    md.push_str("## 📚 Table of Contents\n\n");
    for key in SectionKey::ALL {
        md.push_str(&format!("- [{}](#{})\n", key.title(), anchor(key.title())));
    }
    md.push('\n');
    md.push_str(SEPARATOR);
}

fn heading(md: &mut String, key: SectionKey) {
    md.push_str(&format!("## {}\n\n", key.title()));
}

fn subsection(md: &mut String, label: &str, value: &str) {
    md.push_str(&format!("### {}\n{}\n\n", label, value));
}

fn labeled(md: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        md.push_str(&format!("**{}:** {}\n\n", label, value));
    }
}

fn fenced(md: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        md.push_str(&format!("**{}:**\n\n```\n{}\n```\n\n", label, value));
    }
}

fn render_overview(md: &mut String, overview: &Overview) {
    if !overview.has_content() {
        return;
    }

    heading(md, SectionKey::Overview);
    for (key, label) in [
        ("projectName", "Project Name"),
        ("description", "Description"),
        ("primaryGoals", "Primary Goals"),
        ("keyObjectives", "Key Objectives"),
    ] {
        if let Some(value) = overview.text(key) {
            subsection(md, label, value);
        }
    }
    md.push_str(SEPARATOR);
}

fn render_personas(md: &mut String, personas: &[Persona]) {
    if personas.is_empty() {
        return;
    }

    heading(md, SectionKey::Personas);
    // Numbering follows list position, unnamed entries included
    for (index, persona) in personas.iter().enumerate() {
        if persona.name.is_empty() {
            continue;
        }
        md.push_str(&format!("### {}. {}\n\n", index + 1, persona.name));
        labeled(md, "👤 Demographics", &persona.demographics);
        labeled(md, "🎯 Goals", &persona.goals);
        labeled(md, "😤 Pain Points", &persona.pain_points);
        labeled(md, "🔄 Behaviors", &persona.behaviors);
        if !persona.quote.is_empty() {
            md.push_str(&format!("**💬 Quote:** *\"{}\"*\n\n", persona.quote));
        }
        md.push_str(SEPARATOR);
    }
}

fn render_features(md: &mut String, features: &[Feature]) {
    if features.is_empty() {
        return;
    }

    heading(md, SectionKey::Features);
    for (index, feature) in features.iter().enumerate() {
        if feature.name.is_empty() {
            continue;
        }
        md.push_str(&format!("### {}. {}\n\n", index + 1, feature.name));
        labeled(md, "📖 User Story", &feature.user_story);
        if !feature.acceptance_criteria.is_empty() {
            md.push_str("**✅ Acceptance Criteria:**\n\n");
            for criterion in feature.criteria() {
                md.push_str(&format!("- {}\n", criterion));
            }
            md.push('\n');
        }
        labeled(md, "📝 Description", &feature.description);
        md.push_str(SEPARATOR);
    }
}

fn render_design(md: &mut String, design: &FieldMap) {
    let fields = schema::fields(SectionKey::Design);
    if !has_text(design, fields) {
        return;
    }

    heading(md, SectionKey::Design);
    if let Some(palette) = design.text("colorPalette") {
        md.push_str(&format!("### 🎨 Color Palette\n```\n{}\n```\n\n", palette));
    }
    for (key, label) in [
        ("typography", "✍️ Typography"),
        ("designFiles", "📐 Design Files"),
        ("iconLibrary", "🔍 Icon Library"),
        ("logoAssets", "🏷️ Logo & Brand Assets"),
        ("brandGuidelines", "📘 Brand Guidelines"),
    ] {
        if let Some(value) = design.text(key) {
            subsection(md, label, value);
        }
    }
    md.push_str(SEPARATOR);
}

fn render_api(md: &mut String, api: &ApiSection) {
    if !api.has_content() {
        return;
    }

    heading(md, SectionKey::Api);
    for spec in schema::fields(SectionKey::Api) {
        if let Some(value) = api.text(spec.key) {
            subsection(md, spec.label, value);
        }
    }

    let endpoints: Vec<_> = api
        .endpoints()
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.path.is_empty())
        .collect();
    if !endpoints.is_empty() {
        md.push_str("### Endpoints\n\n");
        for (index, endpoint) in endpoints {
            let method = endpoint.method.trim();
            if method.is_empty() {
                md.push_str(&format!("#### {}. `{}`\n\n", index + 1, endpoint.path));
            } else {
                md.push_str(&format!("#### {}. `{} {}`\n\n", index + 1, method, endpoint.path));
            }
            labeled(md, "Description", &endpoint.description);
            labeled(md, "Authentication", &endpoint.authentication);
            fenced(md, "Request Example", &endpoint.request_example);
            fenced(md, "Response Example", &endpoint.response_example);
        }
    }
    md.push_str(SEPARATOR);
}

fn render_field_map(md: &mut String, key: SectionKey, map: &FieldMap) {
    let fields = schema::fields(key);
    if !has_text(map, fields) {
        return;
    }

    heading(md, key);
    for spec in fields {
        if let Some(value) = map.text(spec.key) {
            subsection(md, spec.label, value);
        }
    }
    md.push_str(SEPARATOR);
}

fn has_text(map: &FieldMap, fields: &[FieldSpec]) -> bool {
    map.has_text_in(fields.iter().map(|f| f.key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_anchor_drops_symbols() {
        assert_eq!(anchor("🎯 Project Overview"), "project-overview");
        assert_eq!(anchor("⚙️ Feature Specifications"), "feature-specifications");
        assert_eq!(anchor("📋 Version Control Practices"), "version-control-practices");
    }

    #[test]
    fn test_empty_document_has_only_header_and_toc() {
        let md = render(&Document::new(), date());
        assert!(md.starts_with("# 📋 Project Documentation\n\n*Generated on 1/15/2025*\n\n---\n\n"));
        assert!(md.contains("- [🗄️ Database Schema](#database-schema)\n"));
        assert_eq!(md.matches("\n## ").count(), 1);
        assert!(md.ends_with("- [✅ Compliance Requirements](#compliance-requirements)\n\n---\n\n"));
    }

    #[test]
    fn test_unknown_keys_are_not_rendered() {
        let mut doc = Document::new();
        doc.security = FieldMap::new().with("vaultPolicy", "rotate weekly");
        let md = render(&doc, date());
        assert!(!md.contains("rotate weekly"));
        assert!(!md.contains("## 🔒 Security Practices"));
    }

    #[test]
    fn test_schema_section_renders_labels_in_schema_order() {
        let mut doc = Document::new();
        doc.testing = FieldMap::new()
            .with("testingCommands", "cargo test")
            .with("unitTests", "")
            .with("testingFrameworks", "speculate2");
        let md = render(&doc, date());
        let section = "## 🧪 Testing Guidelines\n\n### Testing Frameworks\nspeculate2\n\n### Testing Commands\ncargo test\n\n---\n\n";
        assert!(md.contains(section), "{}", md);
        assert!(!md.contains("Unit Testing Strategy"));
    }

    #[test]
    fn test_color_palette_is_fenced() {
        let mut doc = Document::new();
        doc.design = FieldMap::new().with("colorPalette", "#00AA55 primary");
        let md = render(&doc, date());
        assert!(md.contains("### 🎨 Color Palette\n```\n#00AA55 primary\n```\n\n"));
    }

    #[test]
    fn test_persona_numbering_keeps_list_position() {
        let doc = Document {
            personas: vec![
                Persona::default(),
                Persona {
                    name: "Maya".to_string(),
                    quote: "Less guessing".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let md = render(&doc, date());
        assert!(md.contains("### 2. Maya\n\n**💬 Quote:** *\"Less guessing\"*\n\n---\n\n"));
        assert!(!md.contains("### 1."));
    }

    #[test]
    fn test_unnamed_entries_still_render_their_headings() {
        let doc = Document {
            personas: vec![Persona::default()],
            features: vec![Feature::default()],
            ..Default::default()
        };
        let md = render(&doc, date());
        assert!(md.contains("## 👥 User Personas

"));
        assert!(md.contains("## ⚙️ Feature Specifications

"));
        assert!(!md.contains("### 1."));
    }
}
