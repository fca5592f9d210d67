//! Field schemas for the generic section editor.
//!
//! Every section that is edited field-by-field (the overview, the API
//! scalars and the eight free-form sections) is described by a static list of
//! [`FieldSpec`]s. The editor, the HTTP schema endpoint and the renderers all
//! read labels from here, so a field is added in exactly one place.

use serde::Serialize;

use super::SectionKey;

/// One editable text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Wire key, e.g. `colorPalette`.
    pub key: &'static str,
    pub label: &'static str,
    /// Hint for editors: long-form text rather than a single line.
    pub multiline: bool,
}

const fn line(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { key, label, multiline: false }
}

const fn text(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { key, label, multiline: true }
}

const OVERVIEW: &[FieldSpec] = &[
    line("projectName", "Project Name"),
    text("description", "Description"),
    text("primaryGoals", "Primary Goals"),
    text("keyObjectives", "Key Objectives"),
    text("targetAudience", "Target Audience"),
];

const API: &[FieldSpec] = &[
    line("baseUrl", "Base URL"),
    line("authMethod", "Authentication Method"),
];

const DESIGN: &[FieldSpec] = &[
    text("colorPalette", "Color Palette"),
    text("typography", "Typography"),
    text("designFiles", "Design Files"),
    line("iconLibrary", "Icon Library"),
    text("logoAssets", "Logo & Brand Assets"),
    text("brandGuidelines", "Brand Guidelines"),
];

const DATABASE: &[FieldSpec] = &[
    line("databaseType", "Database Type"),
    text("tableStructures", "Table Structures"),
    text("relationships", "Entity Relationships"),
    text("erDiagram", "ER Diagram"),
    text("indexing", "Indexing Strategy"),
    text("constraints", "Data Constraints"),
];

const ENVIRONMENT: &[FieldSpec] = &[
    line("nodeVersion", "Node.js Version"),
    line("packageManager", "Package Manager"),
    text("prerequisites", "Prerequisites"),
    text("installationSteps", "Installation Steps"),
    text("environmentVariables", "Environment Variables"),
    text("devServerCommands", "Development Server Commands"),
];

const TESTING: &[FieldSpec] = &[
    line("testingFrameworks", "Testing Frameworks"),
    text("unitTests", "Unit Testing Strategy"),
    text("integrationTests", "Integration Testing"),
    text("e2eTests", "End-to-End Testing"),
    line("coverageRequirements", "Coverage Requirements"),
    line("testingCommands", "Testing Commands"),
];

const DEPLOYMENT: &[FieldSpec] = &[
    line("platforms", "Deployment Platforms"),
    text("developmentDeploy", "Development Deployment"),
    text("stagingDeploy", "Staging Deployment"),
    text("productionDeploy", "Production Deployment"),
    text("environmentVariables", "Environment Variables Setup"),
    text("cicdPipeline", "CI/CD Pipeline"),
];

const VERSION_CONTROL: &[FieldSpec] = &[
    text("branchingStrategy", "Branching Strategy"),
    text("commitConventions", "Commit Message Conventions"),
    text("codeReviewGuidelines", "Code Review Guidelines"),
    line("mergeStrategy", "Merge Strategy"),
    text("releaseProcess", "Release Process"),
    text("hotfixProcess", "Hotfix Process"),
];

const SECURITY: &[FieldSpec] = &[
    text("secureCoding", "Secure Coding Guidelines"),
    text("dataProtection", "Data Protection Measures"),
    text("authentication", "Authentication Strategy"),
    text("authorization", "Authorization & Access Control"),
    text("inputValidation", "Input Validation"),
    text("secretsManagement", "Secrets Management"),
];

const COMPLIANCE: &[FieldSpec] = &[
    line("regulations", "Applicable Regulations"),
    text("gdprCompliance", "GDPR Compliance"),
    text("ccpaCompliance", "CCPA Compliance"),
    text("dataRetention", "Data Retention Policy"),
    text("privacyPolicy", "Privacy Policy"),
    text("userConsent", "User Consent Mechanisms"),
];

const PERSONA: &[FieldSpec] = &[
    line("name", "Name"),
    line("demographics", "Demographics"),
    text("goals", "Goals"),
    text("painPoints", "Pain Points"),
    text("behaviors", "Behaviors"),
    line("quote", "Quote"),
];

const FEATURE: &[FieldSpec] = &[
    line("name", "Name"),
    text("userStory", "User Story"),
    text("acceptanceCriteria", "Acceptance Criteria"),
    text("description", "Description"),
];

const ENDPOINT: &[FieldSpec] = &[
    line("path", "Path"),
    line("method", "Method"),
    text("description", "Description"),
    text("requestExample", "Request Example"),
    text("responseExample", "Response Example"),
    line("authentication", "Authentication"),
];

/// The scalar fields of a section. List sections have none; their records
/// are described by [`record_fields`].
pub fn fields(key: SectionKey) -> &'static [FieldSpec] {
    match key {
        SectionKey::Overview => OVERVIEW,
        SectionKey::Personas | SectionKey::Features => &[],
        SectionKey::Design => DESIGN,
        SectionKey::Api => API,
        SectionKey::Database => DATABASE,
        SectionKey::Environment => ENVIRONMENT,
        SectionKey::Testing => TESTING,
        SectionKey::Deployment => DEPLOYMENT,
        SectionKey::VersionControl => VERSION_CONTROL,
        SectionKey::Security => SECURITY,
        SectionKey::Compliance => COMPLIANCE,
    }
}

/// Fields of the records in a list, keyed by list name
/// (`personas`, `features` or `endpoints`).
pub fn record_fields(list: &str) -> Option<&'static [FieldSpec]> {
    match list {
        "personas" => Some(PERSONA),
        "features" => Some(FEATURE),
        "endpoints" => Some(ENDPOINT),
        _ => None,
    }
}

pub fn find(key: SectionKey, field: &str) -> Option<&'static FieldSpec> {
    fields(key).iter().find(|f| f.key == field)
}

/// Schema of one section, as served to editors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSchema {
    pub key: SectionKey,
    pub label: &'static str,
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

pub fn all() -> Vec<SectionSchema> {
    SectionKey::ALL
        .into_iter()
        .map(|key| SectionSchema {
            key,
            label: key.label(),
            title: key.title(),
            fields: fields(key),
        })
        .collect()
}
