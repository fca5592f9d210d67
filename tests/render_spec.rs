use chrono::NaiveDate;
use docwizard::models::*;
use docwizard::render::{self, markdown, pdf, ExportFormat};
use speculate2::speculate;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
}

fn eco_document() -> Document {
    let mut doc = Document::new();
    doc.overview = Overview {
        project_name: Some("EcoTrack App".to_string()),
        description: Some("Carbon footprint tracker".to_string()),
        ..Default::default()
    };
    doc.features = vec![Feature {
        name: "Footprint log".to_string(),
        user_story: "As a commuter I want to log trips".to_string(),
        acceptance_criteria: "Trips are saved\n\n  Totals update  \n".to_string(),
        ..Feature::create()
    }];
    doc.api = ApiSection {
        base_url: Some("https://api.ecotrack.app".to_string()),
        endpoints: Some(vec![Endpoint {
            method: "POST".to_string(),
            path: "/trips".to_string(),
            description: "Log a trip".to_string(),
            ..Endpoint::create()
        }]),
        ..Default::default()
    };
    doc.security = FieldMap::new().with("authentication", "OAuth 2.0");
    doc
}

speculate! {
    describe "markdown export" {
        it "starts with the title and generation date" {
            let md = markdown::render(&Document::new(), date());
            assert!(md.starts_with("# 📋 Project Documentation\n\n*Generated on 3/7/2025*"));
        }

        it "omits the heading of an empty section" {
            let md = markdown::render(&Document::new(), date());

            assert!(md.contains("[🎯 Project Overview](#project-overview)"));
            assert!(!md.contains("## 🎯 Project Overview"));
            assert!(!md.contains("## 👥 User Personas"));
        }

        it "renders one bullet per non-blank acceptance criterion" {
            let md = markdown::render(&eco_document(), date());

            assert!(md.contains("- Trips are saved\n- Totals update\n"));
            let bullets = md
                .lines()
                .filter(|l| l.starts_with("- ") && !l.starts_with("- ["))
                .count();
            assert_eq!(bullets, 2);
        }

        it "renders filled sections in canonical order" {
            let md = markdown::render(&eco_document(), date());

            let overview = md.find("## 🎯 Project Overview").unwrap();
            let features = md.find("## ⚙️ Feature Specifications").unwrap();
            let api = md.find("## 🔌 API Documentation").unwrap();
            let security = md.find("## 🔒 Security Practices").unwrap();
            assert!(overview < features && features < api && api < security);
        }

        it "shows the personas heading for an unnamed persona" {
            let doc = Document {
                personas: vec![Persona::create()],
                ..Document::new()
            };
            let md = markdown::render(&doc, date());

            assert!(md.contains("## 👥 User Personas"));
        }

        it "renders endpoints with method and path" {
            let md = markdown::render(&eco_document(), date());
            assert!(md.contains("#### 1. `POST /trips`"));
        }

        it "is deterministic for a fixed date" {
            let doc = eco_document();
            assert_eq!(markdown::render(&doc, date()), markdown::render(&doc, date()));
        }
    }

    describe "pdf export" {
        it "produces a PDF document" {
            let bytes = pdf::render(&eco_document(), date()).expect("PDF failed");
            assert!(bytes.starts_with(b"%PDF-"));
        }

        it "produces a PDF for the empty document" {
            let bytes = pdf::render(&Document::new(), date()).expect("PDF failed");
            assert!(bytes.starts_with(b"%PDF-"));
        }

        it "titles the document after the project" {
            let plan = pdf::layout(&eco_document(), date());
            assert_eq!(plan.title, "EcoTrack App Documentation");
            assert_eq!(plan.pages[0].lines[0].text, "PROJECT DOCUMENTATION");
        }

        it "lists the personas heading for an unnamed persona" {
            let doc = Document {
                personas: vec![Persona::create()],
                ..Document::new()
            };
            let plan = pdf::layout(&doc, date());

            assert!(plan.pages[0].lines.iter().any(|l| l.text == "USER PERSONAS"));
        }

        it "breaks long content onto further pages" {
            let mut doc = eco_document();
            doc.overview.description = Some("A sentence about carbon. ".repeat(400));

            let plan = pdf::layout(&doc, date());
            assert!(plan.pages.len() > 1);
            let bottom = plan.geometry.height - plan.geometry.margin;
            for page in &plan.pages {
                assert!(page.lines.iter().all(|l| l.y <= bottom));
            }
        }
    }

    describe "json export" {
        it "matches the store export" {
            let doc = eco_document();
            let bytes = render::render(&doc, ExportFormat::Json, date()).unwrap();
            let parsed: Document = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(parsed, doc);
        }
    }

    describe "export file names" {
        it "derives the name from the project" {
            assert_eq!(
                render::export_filename(&eco_document(), ExportFormat::Pdf),
                "ecotrack_app_documentation.pdf"
            );
        }

        it "falls back without a project name" {
            assert_eq!(
                render::export_filename(&Document::new(), ExportFormat::Markdown),
                "project_documentation.md"
            );
        }
    }
}
