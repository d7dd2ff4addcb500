//! gostdoc CLI - export Markdown notes to GOST-formatted DOCX

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;

use gostdoc::{
    ExportOptions, Exporter, FsStorage, JsonEncoder, JsonFormat, PresetRegistry, Settings,
};

#[derive(Parser)]
#[command(name = "gostdoc")]
#[command(version)]
#[command(about = "Export Markdown notes to Word documents formatted by GOST presets", long_about = None)]
struct Cli {
    /// Markdown note to export
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a note to DOCX
    Export(ExportArgs),

    /// Print the parsed document model as JSON
    Parse {
        /// Markdown note
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Compact JSON output (no pretty printing)
        #[arg(long)]
        compact: bool,
    },

    /// List available presets
    Presets {
        /// Print one preset after normalization
        #[arg(long, value_name = "ID")]
        show: Option<String>,

        /// Settings file with user presets
        #[arg(long, value_name = "FILE", env = "GOSTDOC_SETTINGS")]
        settings: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Markdown note to export
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Vault root (defaults to the note's folder)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Preset identifier
    #[arg(short, long, value_name = "ID")]
    preset: Option<String>,

    /// Settings file
    #[arg(long, value_name = "FILE", env = "GOSTDOC_SETTINGS")]
    settings: Option<PathBuf>,

    /// Drop page-break markers
    #[arg(long)]
    ignore_page_breaks: bool,

    /// Do not number pages
    #[arg(long)]
    no_pagination: bool,

    /// Add a table of contents page
    #[arg(long)]
    toc: bool,

    /// Use the long-term storage left margin
    #[arg(long)]
    long_term_storage: bool,

    /// Output folder inside the vault root
    #[arg(short, long, value_name = "DIR")]
    output_folder: Option<String>,

    /// File name template with a {title} placeholder
    #[arg(long, value_name = "TEMPLATE")]
    template: Option<String>,

    /// Write the assembled document as JSON instead of DOCX
    #[arg(long)]
    json: bool,
}

impl ExportArgs {
    fn from_input(input: PathBuf) -> Self {
        Self {
            input,
            root: None,
            preset: None,
            settings: None,
            ignore_page_breaks: false,
            no_pagination: false,
            toc: false,
            long_term_storage: false,
            output_folder: None,
            template: None,
            json: false,
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Export(args)) => cmd_export(args).await,
        Some(Commands::Parse { input, compact }) => cmd_parse(&input, compact).await,
        Some(Commands::Presets { show, settings }) => {
            cmd_presets(show.as_deref(), settings.as_deref()).await
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: export if input is provided
            if let Some(input) = cli.input {
                cmd_export(ExportArgs::from_input(input)).await
            } else {
                println!("{}", "Usage: gostdoc <FILE>".yellow());
                println!("       gostdoc --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        if let Some(err) = e.downcast_ref::<gostdoc::Error>() {
            eprintln!("       {}", err.user_message().dimmed());
        }
        std::process::exit(1);
    }
}

async fn load_settings(path: Option<&Path>) -> Result<Settings, gostdoc::Error> {
    match path {
        Some(path) => Settings::from_file(path).await,
        None => Ok(Settings::default()),
    }
}

/// Split a note path into a vault root and a vault-relative note path.
fn locate_note(input: &Path, root: Option<&Path>) -> Result<(PathBuf, String), String> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let relative = if root.as_os_str().is_empty() {
        input
    } else {
        input.strip_prefix(&root).map_err(|_| {
            format!(
                "{} is not inside the vault root {}",
                input.display(),
                root.display()
            )
        })?
    };

    let note = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    Ok((root, note))
}

async fn cmd_export(args: ExportArgs) -> CliResult {
    let mut settings = load_settings(args.settings.as_deref()).await?;
    if let Some(preset) = args.preset {
        settings = settings.with_preset(preset);
    }
    if let Some(folder) = args.output_folder {
        settings = settings.with_output_folder(folder);
    }
    if let Some(template) = args.template {
        settings = settings.with_file_name_template(template);
    }
    if args.long_term_storage {
        settings = settings.with_long_term_storage(true);
    }

    let defaults = settings.export_options;
    let options = ExportOptions::new()
        .with_ignore_page_breaks(defaults.ignore_page_breaks || args.ignore_page_breaks)
        .with_pagination(defaults.enable_pagination && !args.no_pagination)
        .with_toc(defaults.include_toc || args.toc);

    let (root, note) = locate_note(&args.input, args.root.as_deref())?;
    log::debug!("vault root {}, note {}", root.display(), note);
    let storage = FsStorage::new(&root);

    let mut exporter = Exporter::new(&storage, settings)?.with_options(options);
    if args.json {
        exporter = exporter.with_encoder(Arc::new(JsonEncoder::new(JsonFormat::Pretty)));
    }

    let result = exporter.export_note(Some(&note)).await?;
    let stats = &result.stats;

    println!(
        "{} {}",
        "Saved to".green(),
        storage.full_path(&result.output_path).display()
    );
    println!("  {} preset: {}", "├─".dimmed(), exporter.settings().preset_id);
    println!(
        "  {} {} headings, {} paragraphs, {} tables, {} figures",
        "├─".dimmed(),
        stats.heading_count,
        stats.paragraph_count,
        stats.table_count,
        stats.figure_count
    );
    if stats.missing_image_count > 0 {
        println!(
            "  {} {}",
            "├─".dimmed(),
            format!("{} images not found", stats.missing_image_count).yellow()
        );
    }
    println!("  {} {} bytes", "└─".dimmed(), result.size);

    Ok(())
}

async fn cmd_parse(input: &Path, compact: bool) -> CliResult {
    let text = tokio::fs::read_to_string(input).await?;
    let doc = gostdoc::parse(&text);

    let json = if compact {
        serde_json::to_string(&doc)?
    } else {
        serde_json::to_string_pretty(&doc)?
    };
    println!("{}", json);

    Ok(())
}

async fn cmd_presets(show: Option<&str>, settings: Option<&Path>) -> CliResult {
    let settings = load_settings(settings).await?;
    let registry: PresetRegistry = settings.registry()?;

    if let Some(id) = show {
        let preset = registry.resolve(id, settings.policy())?;
        println!("{}", serde_json::to_string_pretty(&preset)?);
        return Ok(());
    }

    println!("{}", "Presets".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for option in registry.options() {
        let marker = if option.id == settings.preset_id {
            "*".green().bold().to_string()
        } else {
            " ".to_string()
        };
        let origin = if option.is_user { "user" } else { "built-in" };
        println!(
            "{} {} {} {}",
            marker,
            option.id.bold(),
            option.name,
            format!("({origin})").dimmed()
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "gostdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!();
    println!("Markdown to DOCX exporter with GOST formatting presets");
    println!();
    println!("{}", "Built-in presets:".bold());
    if let Ok(registry) = PresetRegistry::with_builtins() {
        for option in registry.options() {
            println!("  {} {}", "•".green(), option.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_note_defaults_to_parent() {
        let (root, note) = locate_note(Path::new("vault/Notes/a.md"), None).unwrap();
        assert_eq!(root, PathBuf::from("vault/Notes"));
        assert_eq!(note, "a.md");
    }

    #[test]
    fn test_locate_note_with_root() {
        let (root, note) =
            locate_note(Path::new("vault/Notes/a.md"), Some(Path::new("vault"))).unwrap();
        assert_eq!(root, PathBuf::from("vault"));
        assert_eq!(note, "Notes/a.md");
    }

    #[test]
    fn test_locate_note_outside_root() {
        assert!(locate_note(Path::new("other/a.md"), Some(Path::new("vault"))).is_err());
    }

    #[test]
    fn test_cli_parses_bare_file() {
        let cli = Cli::try_parse_from(["gostdoc", "note.md"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("note.md")));
        assert!(cli.command.is_none());
    }
}
