use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docwizard::cli::{self, RecordList};
use docwizard::config::{self, AppConfig};
use docwizard::render::{self, ExportFormat};
use docwizard::store::DocumentStore;
use docwizard::{api, db};

#[derive(Parser)]
#[command(name = "docwiz")]
#[command(about = "Guided project documentation with Markdown, JSON and PDF export")]
struct Cli {
    /// Database file (overrides DOCWIZ_DB and the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the twelve sections and whether each is filled
    Sections,
    /// Describe the fields of a section
    Fields { section: String },
    /// Print the document, or one section, as JSON
    Show { section: Option<String> },
    /// Set one field of a section
    Set {
        section: String,
        field: String,
        value: String,
    },
    /// Replace a whole section with a JSON value
    Put { section: String, json: String },
    /// Append a persona, feature or endpoint
    Add {
        #[arg(value_enum)]
        list: RecordList,
        /// Initial fields as key=value
        #[arg(value_parser = cli::parse_assignment)]
        fields: Vec<(String, String)>,
    },
    /// Change fields of an existing record
    Edit {
        #[arg(value_enum)]
        list: RecordList,
        id: String,
        #[arg(value_parser = cli::parse_assignment, required = true)]
        fields: Vec<(String, String)>,
    },
    /// Remove a record
    Remove {
        #[arg(value_enum)]
        list: RecordList,
        id: String,
    },
    /// Show completion, last save time and record counts
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Render the document to a file
    Export {
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: ExportFormat,
        /// Output path (defaults to the derived file name in the export directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Write to stdout instead of a file
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },
    /// Replace the document with a JSON export
    Import { file: PathBuf },
    /// Reset all sections to empty
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Start the local HTTP API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show the configuration, or write the defaults with --init
    Config {
        #[arg(long)]
        init: bool,
    },
}

/// Logs go to stderr so stdout stays clean for exports and JSON output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "docwizard=info,tower_http=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Open the persisted store, falling back to a session-only store when the
/// database cannot be opened.
fn open_store(path: Option<PathBuf>) -> DocumentStore {
    let opened = path
        .map(Ok)
        .unwrap_or_else(db::Database::default_path)
        .and_then(|path| {
            tracing::debug!("Opening database at {}", path.display());
            let db = db::Database::open(path)?;
            db.migrate()?;
            Ok(db)
        });

    match opened {
        Ok(db) => DocumentStore::open(db),
        Err(e) => {
            tracing::warn!("Database unavailable, changes will not be saved: {:#}", e);
            DocumentStore::in_memory()
        }
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{} [y/N] ", prompt);
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing();

    let config = AppConfig::load();
    let mut store = open_store(args.db.or_else(|| config.database_path.clone()));

    match args.command {
        Commands::Sections => print!("{}", cli::list_sections(&store)),
        Commands::Fields { section } => {
            print!("{}", cli::describe_fields(cli::parse_section(&section)?));
        }
        Commands::Show { section } => {
            let key = section.as_deref().map(cli::parse_section).transpose()?;
            println!("{}", cli::show(&store, key)?);
        }
        Commands::Set {
            section,
            field,
            value,
        } => {
            let key = cli::parse_section(&section)?;
            cli::set_field(&mut store, key, &field, value)?;
            println!("Updated {}.{}", key, field);
        }
        Commands::Put { section, json } => {
            let key = cli::parse_section(&section)?;
            cli::put_section(&mut store, key, &json)?;
            println!("Replaced {}", key);
        }
        Commands::Add { list, fields } => {
            let id = cli::add_record(&mut store, list, &fields)?;
            println!("{}", id);
        }
        Commands::Edit { list, id, fields } => {
            cli::edit_record(&mut store, list, &id, &fields)?;
            println!("Updated {} {}", list.as_str(), id);
        }
        Commands::Remove { list, id } => {
            cli::remove_record(&mut store, list, &id)?;
            println!("Removed {} {}", list.as_str(), id);
        }
        Commands::Status { json } => {
            let report = cli::status(&store);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
        }
        Commands::Export {
            format,
            out,
            stdout,
        } => {
            let doc = store.document().clone();
            if stdout {
                let bytes = render::render_detached(doc, format).await?;
                std::io::stdout().write_all(&bytes)?;
            } else {
                let path = cli::export_to_file(doc, format, out, &config.export_dir).await?;
                println!("{}", path.display());
            }
        }
        Commands::Import { file } => {
            cli::import_file(&mut store, &file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            println!(
                "Imported {} ({}% complete)",
                file.display(),
                store.completion_percentage()
            );
        }
        Commands::Clear { yes } => {
            if !yes && !confirm("Clear all documentation?")? {
                println!("Nothing cleared");
                return Ok(());
            }
            store.clear_data();
            println!("Cleared");
        }
        Commands::Serve { port } => {
            return serve(store, port.unwrap_or(config.port)).await;
        }
        Commands::Config { init } => {
            let path = config::get_config_path()?;
            if init {
                config.save()?;
                println!("Wrote {}", path.display());
            } else {
                println!("# {}", path.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    if let Some(err) = store.persistence_error() {
        eprintln!("warning: {}", err);
    }

    Ok(())
}

async fn serve(store: DocumentStore, port: u16) -> anyhow::Result<()> {
    let app = api::create_router(store);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("DocWizard API listening on http://127.0.0.1:{}/api/v1", port);

    axum::serve(listener, app).await?;
    Ok(())
}
