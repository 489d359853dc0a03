//! # Chameleon CLI Entry Point
//!
//! ## Usage
//!
//! ```bash
//! # Install the bundled themes into the data directory
//! chameleon init
//!
//! # See what is available and what is active
//! chameleon list
//! chameleon current
//!
//! # Switch themes
//! chameleon apply nord
//!
//! # Manage custom themes
//! chameleon create ./my-theme.json
//! chameleon update my-theme ./my-theme.json
//! chameleon export my-theme ./my-theme.zip
//! chameleon import https://example.com/theme.zip
//! chameleon delete my-theme
//!
//! # Render configs without installing anything
//! chameleon generate ./my-theme.json ./out
//! ```
//!
//! The data directory defaults to the platform's application-support
//! location; override it with `--root` or `CHAMELEON_HOME`.

use chameleon::error::ThemeError;
use chameleon::integrations;
use chameleon::logging;
use chameleon::paths::AppPaths;
use chameleon::preferences::{LoggedEffects, Preferences};
use chameleon::store::{directory, ApplyReport, ThemeManager, ThemeOrigin};
use chameleon::theme::ThemeMetadata;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Chameleon - switch one colour theme across all your tools
#[derive(Parser, Debug)]
#[command(name = "chameleon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Switch one colour theme across terminals, editors and shells", long_about = None)]
struct Args {
    /// Application data directory (defaults to $CHAMELEON_HOME or the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Show informational log messages on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the data directory and install the bundled themes
    Init,
    /// List bundled and custom themes
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the active theme
    Current {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Make a theme active
    Apply { name: String },
    /// Create a custom theme from a theme.json file
    Create {
        #[arg(value_name = "THEME_JSON")]
        file: PathBuf,
    },
    /// Regenerate a custom theme from a theme.json file
    Update {
        name: String,
        #[arg(value_name = "THEME_JSON")]
        file: PathBuf,
    },
    /// Delete a custom theme
    Delete { name: String },
    /// Export a theme as a zip archive
    Export {
        name: String,
        #[arg(value_name = "OUT_ZIP")]
        output: PathBuf,
    },
    /// Import a theme archive from a file or an http(s) URL
    Import {
        #[arg(value_name = "PATH_OR_URL")]
        source: String,
    },
    /// Render every config for a theme.json into a directory
    Generate {
        #[arg(value_name = "THEME_JSON")]
        file: PathBuf,
        #[arg(value_name = "OUT_DIR")]
        out_dir: PathBuf,
    },
    /// Read or replace the preferences document
    Prefs {
        #[command(subcommand)]
        action: PrefsCommand,
    },
    /// Toggle a theme's favorite flag
    Favorite { name: String },
    /// Apply the auto-switch schedule's theme for the current time
    Tick,
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    /// Print preferences.json
    Get,
    /// Replace preferences.json with the contents of a file
    Set {
        #[arg(value_name = "PREFS_JSON")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let paths = match AppPaths::resolve(args.root.clone()) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let _guard = logging::init(&paths.log_dir(), args.verbose);

    let manager = ThemeManager::new(paths);
    match run(args.command, &manager).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_error(err: &anyhow::Error) {
    eprintln!("error: {err:#}");
    if let Some(hint) = err.downcast_ref::<ThemeError>().and_then(ThemeError::hint) {
        eprintln!("hint: {hint}");
    }
}

async fn run(command: Command, manager: &ThemeManager) -> Result<()> {
    match command {
        Command::Init => {
            let paths = manager.paths();
            for dir in [paths.custom_dir(), paths.current_dir()] {
                fs::create_dir_all(&dir)
                    .map_err(|e| ThemeError::from_io(&dir, e))
                    .with_context(|| format!("Failed to initialize {}", paths.root().display()))?;
            }
            let installed = manager.install_bundled()?;
            println!(
                "Initialized {} ({} bundled theme(s) installed)",
                paths.root().display(),
                installed.len()
            );
        }
        Command::List { json } => list(manager, json)?,
        Command::Current { json } => current(manager, json)?,
        Command::Apply { name } => {
            let report = manager.apply(&name)?;
            finish_apply(report).await;
        }
        Command::Create { file } => {
            let meta = read_theme(&file)?;
            let entry = manager.create(&meta)?;
            println!("Created {} at {}", entry.slug, entry.path.display());
        }
        Command::Update { name, file } => {
            let meta = read_theme(&file)?;
            let warnings = manager.update(&name, &meta)?;
            print_warnings(&warnings);
            println!("Updated {name}");
        }
        Command::Delete { name } => {
            manager.delete(&name)?;
            println!("Deleted {name}");
        }
        Command::Export { name, output } => {
            manager.export(&name, &output)?;
            println!("Exported {name} to {}", output.display());
        }
        Command::Import { source } => {
            let entry = if source.starts_with("http://") || source.starts_with("https://") {
                manager.import_url(&source).await?
            } else {
                manager.import_archive(Path::new(&source))?
            };
            println!("Imported {} as {}", entry.metadata.name, entry.slug);
        }
        Command::Generate { file, out_dir } => {
            let meta = read_theme(&file)?;
            meta.validate()?;
            fs::create_dir_all(&out_dir)
                .map_err(|e| ThemeError::from_io(&out_dir, e))?;
            directory::write_contents(&out_dir, &meta)?;
            println!("Wrote {} configs to {}", meta.name, out_dir.display());
        }
        Command::Prefs { action } => match action {
            PrefsCommand::Get => {
                let prefs = manager.preferences().get()?;
                println!("{}", serde_json::to_string_pretty(&prefs)?);
            }
            PrefsCommand::Set { file } => {
                let text = fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let prefs: Preferences = serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse preferences from {}", file.display()))?;
                let outcomes = manager.preferences().set(&prefs, &LoggedEffects)?;
                for outcome in outcomes {
                    if let Some(error) = outcome.error {
                        eprintln!("warning: {:?} update failed: {error}", outcome.effect);
                    }
                }
                println!("Preferences saved");
            }
        },
        Command::Favorite { name } => {
            if manager.toggle_favorite(&name)? {
                println!("Added {name} to favorites");
            } else {
                println!("Removed {name} from favorites");
            }
        }
        Command::Tick => {
            let now = chrono::Local::now().time();
            match manager.apply_scheduled(now)? {
                Some(report) => finish_apply(report).await,
                None => println!("Nothing to switch"),
            }
        }
    }
    Ok(())
}

fn read_theme(path: &Path) -> Result<ThemeMetadata> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    ThemeMetadata::from_json(&text).with_context(|| format!("Invalid theme file {}", path.display()))
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

async fn finish_apply(report: ApplyReport) {
    println!("Applied {} ({})", report.metadata.name, report.slug);
    print_warnings(&report.warnings);
    // reload failures are logged by run_all and never change the result
    let _ = integrations::run_all(&report.reload).await;
}

fn list(manager: &ThemeManager, json: bool) -> Result<()> {
    let entries = manager.list();
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No themes found. Run `chameleon init` to install the bundled themes.");
        return Ok(());
    }

    let active = manager.current().map(|c| c.path);
    for entry in entries {
        let marker = if active.as_deref() == Some(entry.path.as_path()) {
            "*"
        } else {
            " "
        };
        let origin = match entry.origin {
            ThemeOrigin::Bundled => "bundled",
            ThemeOrigin::Custom => "custom",
        };
        let tone = if entry.is_light { "light" } else { "dark" };
        println!(
            "{marker} {:<24} {:<28} {origin:<8} {tone}",
            entry.slug, entry.metadata.name
        );
    }
    Ok(())
}

fn current(manager: &ThemeManager, json: bool) -> Result<()> {
    let current = manager.current();
    if json {
        let value = serde_json::json!({
            "theme": current,
            "state": manager.state(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    match current {
        Some(theme) => {
            println!("{} ({})", theme.metadata.name, theme.slug);
            println!("  {}", theme.path.display());
            if let Some(wallpaper) = manager.state().current_wallpaper {
                println!("  wallpaper: {wallpaper}");
            }
        }
        None => println!("No active theme"),
    }
    Ok(())
}
