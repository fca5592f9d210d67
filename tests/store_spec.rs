use docwizard::db::Database;
use docwizard::models::*;
use docwizard::store::{DocumentStore, STORAGE_KEY};
use serde_json::json;
use speculate2::speculate;

fn eco_overview() -> Section {
    Section::Overview(Overview {
        project_name: Some("EcoTrack".to_string()),
        description: Some("Carbon footprint tracker".to_string()),
        ..Default::default()
    })
}

fn persona(name: &str) -> Persona {
    Persona {
        name: name.to_string(),
        ..Persona::create()
    }
}

fn open_file_db(path: &std::path::Path) -> Database {
    let db = Database::open(path.to_path_buf()).expect("Failed to open database");
    db.migrate().expect("Failed to run migrations");
    db
}

speculate! {
    before {
        let mut store = DocumentStore::in_memory();
    }

    describe "update_section" {
        it "replaces the named section and stamps last_saved" {
            assert!(store.last_saved().is_none());

            store.update_section(eco_overview()).unwrap();

            assert_eq!(store.document().project_name(), Some("EcoTrack"));
            assert!(store.last_saved().is_some());
        }

        it "leaves every other section untouched" {
            store.update_section(Section::Map(
                SectionKey::Database,
                FieldMap::new().with("databaseType", "PostgreSQL"),
            )).unwrap();
            let before = store.document().clone();

            store.update_section(eco_overview()).unwrap();

            let after = store.document();
            assert_eq!(after.database, before.database);
            assert_eq!(after.personas, before.personas);
            assert_eq!(after.api, before.api);
        }

        it "keeps persona identity across edits" {
            let maya = persona("Maya");
            let id = maya.id.clone();
            store.update_section(Section::Personas(vec![maya, persona("Leo")])).unwrap();

            let mut personas = store.document().personas.clone();
            personas[0].goals = "Cut emissions".to_string();
            store.update_section(Section::Personas(personas)).unwrap();

            let personas = &store.document().personas;
            assert_eq!(personas.len(), 2);
            assert_eq!(personas[0].id, id);
            assert_eq!(personas[0].goals, "Cut emissions");
            assert_ne!(personas[0].id, personas[1].id);
        }

        it "rejects a value of the wrong shape" {
            let result = store.update_section_json(SectionKey::Personas, json!({"name": "Maya"}));

            assert!(result.is_err());
            assert!(store.document().personas.is_empty());
            assert!(store.last_saved().is_none());
        }
    }

    describe "completion_percentage" {
        it "is 0 for the empty document" {
            assert_eq!(store.completion_percentage(), 0);
        }

        it "counts a section as filled once it has any key" {
            store.update_section(Section::Overview(Overview {
                project_name: Some(String::new()),
                ..Default::default()
            })).unwrap();
            assert_eq!(store.completion_percentage(), 8);
        }

        it "never decreases while sections are only filled" {
            let mut last = store.completion_percentage();
            for key in SectionKey::ALL {
                let section = match key {
                    SectionKey::Overview => eco_overview(),
                    SectionKey::Personas => Section::Personas(vec![persona("Maya")]),
                    SectionKey::Features => Section::Features(vec![Feature::create()]),
                    SectionKey::Api => Section::Api(ApiSection {
                        base_url: Some("https://api.ecotrack.app".to_string()),
                        ..Default::default()
                    }),
                    other => Section::Map(other, FieldMap::new().with("notes", "x")),
                };
                store.update_section(section).unwrap();

                let now = store.completion_percentage();
                assert!(now >= last);
                last = now;
            }
            assert_eq!(last, 100);
        }

        it "drops again when a list is emptied" {
            store.update_section(Section::Features(vec![Feature::create()])).unwrap();
            assert_eq!(store.completion_percentage(), 8);

            store.update_section(Section::Features(Vec::new())).unwrap();
            assert_eq!(store.completion_percentage(), 0);
        }
    }

    describe "export and import" {
        it "round-trips the document" {
            store.update_section(eco_overview()).unwrap();
            store.update_section(Section::Personas(vec![persona("Maya")])).unwrap();
            let exported = store.export_data().expect("Export failed");

            let mut other = DocumentStore::in_memory();
            assert!(other.import_data(&exported));

            assert_eq!(other.document(), store.document());
        }

        it "does not modify the store when exporting" {
            store.update_section(eco_overview()).unwrap();
            let saved = store.last_saved();
            let before = store.document().clone();

            store.export_data().expect("Export failed");

            assert_eq!(store.document(), &before);
            assert_eq!(store.last_saved(), saved);
        }

        it "fills missing sections with empty defaults" {
            assert!(store.import_data(r#"{"overview":{"projectName":"EcoTrack"}}"#));

            assert_eq!(store.document().project_name(), Some("EcoTrack"));
            assert!(store.document().features.is_empty());
            assert_eq!(store.completion_percentage(), 8);
        }

        it "keeps unknown keys through a round trip" {
            assert!(store.import_data(r#"{"overview":{"projectName":"EcoTrack","theme":"dark"},"legacy":true}"#));

            let exported: serde_json::Value =
                serde_json::from_str(&store.export_data().unwrap()).unwrap();
            assert_eq!(exported["overview"]["theme"], "dark");
            assert_eq!(exported["legacy"], true);
        }

        it "keeps keys whose value is null" {
            assert!(store.import_data(r#"{"overview":{"projectName":null}}"#));

            assert_eq!(store.completion_percentage(), 8);
            assert!(store.document().project_name().is_none());
            let exported: serde_json::Value =
                serde_json::from_str(&store.export_data().unwrap()).unwrap();
            assert_eq!(exported["overview"], json!({ "projectName": null }));
        }

        it "accepts records with null fields" {
            assert!(store.import_data(r#"{"personas":[{"id":"1","name":null}]}"#));

            let personas = &store.document().personas;
            assert_eq!(personas.len(), 1);
            assert_eq!(personas[0].id, "1");
            assert_eq!(personas[0].name, "");
            let exported: serde_json::Value =
                serde_json::from_str(&store.export_data().unwrap()).unwrap();
            assert_eq!(exported["personas"][0]["name"], serde_json::Value::Null);
        }

        it "rejects malformed input and keeps the current document" {
            store.update_section(eco_overview()).unwrap();
            let before = store.document().clone();

            assert!(!store.import_data("not json"));
            assert!(!store.import_data("[1, 2, 3]"));
            assert!(!store.import_data(r#"{"personas": "many"}"#));

            assert_eq!(store.document(), &before);
            assert_eq!(store.document().project_name(), Some("EcoTrack"));
        }
    }

    describe "clear_data" {
        it "resets to the empty document" {
            store.update_section(eco_overview()).unwrap();
            store.update_section(Section::Features(vec![Feature::create()])).unwrap();

            store.clear_data();

            assert_eq!(store.document(), &Document::new());
            assert_eq!(store.completion_percentage(), 0);
            assert!(store.last_saved().is_none());
        }
    }

    describe "persistence" {
        it "restores the document on reopen" {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("docs.db");

            let mut first = DocumentStore::open(open_file_db(&path));
            first.update_section(eco_overview()).unwrap();
            let saved = first.last_saved();
            drop(first);

            let second = DocumentStore::open(open_file_db(&path));
            assert_eq!(second.document().project_name(), Some("EcoTrack"));
            assert_eq!(second.last_saved(), saved);
            assert!(second.persistence_error().is_none());
        }

        it "persists a cleared document" {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("docs.db");

            let mut first = DocumentStore::open(open_file_db(&path));
            first.update_section(eco_overview()).unwrap();
            first.clear_data();
            drop(first);

            let second = DocumentStore::open(open_file_db(&path));
            assert_eq!(second.completion_percentage(), 0);
        }

        it "migrates a bare version 0 payload" {
            let db = Database::open_memory().unwrap();
            db.migrate().unwrap();
            db.save_record(STORAGE_KEY, 0, r#"{"overview":{"projectName":"EcoTrack"}}"#).unwrap();

            let store = DocumentStore::open(db);
            assert_eq!(store.document().project_name(), Some("EcoTrack"));
            assert!(store.last_saved().is_none());
        }

        it "starts empty when the stored version is unknown" {
            let db = Database::open_memory().unwrap();
            db.migrate().unwrap();
            db.save_record(STORAGE_KEY, 7, r#"{"whatever":1}"#).unwrap();

            let store = DocumentStore::open(db);
            assert_eq!(store.document(), &Document::new());
        }

        it "rejects a free-form value for a typed section" {
            let result = store.update_section(Section::Map(
                SectionKey::Overview,
                FieldMap::new().with("projectName", "EcoTrack"),
            ));

            assert!(result.is_err());
            assert!(store.last_saved().is_none());
            assert_eq!(store.completion_percentage(), 0);
        }

        it "keeps working in memory when saving fails" {
            // Unmigrated: the storage table does not exist.
            let db = Database::open_memory().unwrap();
            let mut store = DocumentStore::open(db);

            store.update_section(eco_overview()).unwrap();

            assert_eq!(store.document().project_name(), Some("EcoTrack"));
            assert!(store.persistence_error().is_some());
        }
    }
}
