use clap::{Parser, Subcommand};
use iseql::store::{self, EventStore, FileStore, SavedEvent};
use iseql::{CompileOptions, Compiler, RequestDoc, Result, diagnostics};

use anyhow::{Context, bail};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "iseql")]
#[command(about = "ISEQL temporal event query compiler", long_about = None)]
struct Cli {
    /// Saved event library (JSON array). Created on first save.
    #[arg(
        long,
        global = true,
        env = "ISEQL_LIBRARY",
        default_value = "iseql_library.json"
    )]
    library: PathBuf,

    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a request document into a stored procedure.
    Compile {
        #[arg(long)]
        request: String,

        #[arg(short = 'o', long)]
        out: Option<String>,

        /// Print the full compilation result as JSON.
        #[arg(long)]
        json: bool,

        /// Store the result in the library under the request's name.
        #[arg(long)]
        save: bool,
    },
    /// Compile a saved event again from its stored request.
    Recompile {
        #[arg(long)]
        name: String,

        #[arg(short = 'o', long)]
        out: Option<String>,

        #[arg(long)]
        json: bool,

        /// Replace the stored version with the new result.
        #[arg(long)]
        save: bool,
    },
    /// List saved events.
    List,
    /// Delete a saved event.
    Delete {
        #[arg(long)]
        name: String,
    },
    /// Write one saved event as JSON.
    Export {
        #[arg(long)]
        name: String,

        #[arg(short = 'o', long)]
        out: Option<String>,
    },
    /// Add (or replace) a saved event from an exported JSON file.
    Import {
        #[arg(long)]
        file: String,
    },
}

struct Output {
    out: Option<String>,
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut library = FileStore::open(&cli.library)?;

    match cli.cmd {
        Commands::Compile {
            request,
            out,
            json,
            save,
        } => {
            let text = std::fs::read_to_string(&request).with_context(|| {
                diagnostics::error_message(format!("read request file {}", request))
            })?;
            let doc = RequestDoc::from_json(&text)?;
            compile(&mut library, &doc, save, &Output { out, json })?;
        }
        Commands::Recompile {
            name,
            out,
            json,
            save,
        } => {
            let Some(evt) = library.get(&name) else {
                bail!(
                    "{}",
                    diagnostics::error_message(format!("no saved event named '{}'", name))
                );
            };
            let Some(doc) = evt.request_doc()? else {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "'{}' was saved without its request and cannot be recompiled",
                        name
                    ))
                );
            };
            compile(&mut library, &doc, save, &Output { out, json })?;
        }
        Commands::List => {
            for evt in library.list() {
                println!("{} ({} fields)", evt.name, evt.output_schema.len());
            }
        }
        Commands::Delete { name } => {
            if library.delete(&name)? {
                println!("Deleted {}", name);
            } else {
                diagnostics::warn(format!("no saved event named '{}'", name));
            }
        }
        Commands::Export { name, out } => {
            let json = store::export_event(&library, &name)?;
            emit(out.as_deref(), &json)?;
        }
        Commands::Import { file } => {
            let text = std::fs::read_to_string(&file).with_context(|| {
                diagnostics::error_message(format!("read event file {}", file))
            })?;
            let name = store::import_event(&mut library, &text)?;
            println!("Loaded {}", name);
        }
    }

    Ok(())
}

fn compile(library: &mut FileStore, doc: &RequestDoc, save: bool, output: &Output) -> Result<()> {
    let request = doc.validate_and_build()?;

    let options = if save {
        CompileOptions::for_save()
    } else {
        CompileOptions::default()
    };
    let compiled = Compiler::with_options(&*library, options)?.compile(&request);

    let text = if output.json {
        serde_json::to_string_pretty(&compiled)?
    } else {
        compiled.procedure.clone()
    };
    emit(output.out.as_deref(), &text)?;

    if save {
        library.put(SavedEvent::from_compiled(&compiled, doc)?)?;
        println!("Saved {} to {}", compiled.name, library.path().display());
    }
    Ok(())
}

fn emit(out: Option<&str>, text: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| diagnostics::error_message(format!("write {}", path)))?;
            println!("Wrote {}", path);
        }
        None => println!("{}", text.trim_end()),
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
