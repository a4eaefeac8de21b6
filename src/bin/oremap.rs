//! oremap CLI — inspect and rewrite OAI-ORE resource maps.
//!
//! Usage:
//!   oremap members <file> [--pid ID] [--base URL] [--config FILE]
//!   oremap provenance <file> [--pid ID] [--base URL] [--config FILE]
//!   oremap rewrite <file> --old ID --new ID [--add ID]... [--remove ID]... [--metadata ID]...

use clap::{Args, Parser, Subcommand};
use oremap::{GraphConfig, Membership, PackageMember, ParseOutcome, ResourceMap, SaveRequest};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "oremap",
    version,
    about = "OAI-ORE resource map graph engine"
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Input {
    /// Path to an RDF/XML resource map
    file: PathBuf,
    /// Identifier of the resource map
    #[arg(long)]
    pid: Option<String>,
    /// Base IRI for relative references
    #[arg(long)]
    base: Option<String>,
    /// Path to a YAML graph configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the members and documentation of a resource map as JSON
    Members {
        #[command(flatten)]
        input: Input,
    },
    /// Print the provenance recorded on each member as JSON
    Provenance {
        #[command(flatten)]
        input: Input,
    },
    /// Rewrite a resource map under a new identifier and print the RDF/XML
    Rewrite {
        /// Path to an RDF/XML resource map
        file: PathBuf,
        /// Identifier the resource map is currently saved under
        #[arg(long)]
        old: String,
        /// Identifier to save the resource map under
        #[arg(long)]
        new: String,
        /// Data member to add
        #[arg(long = "add")]
        added: Vec<String>,
        /// Member to remove
        #[arg(long = "remove")]
        removed: Vec<String>,
        /// Metadata member to add; documents every member added alongside it
        #[arg(long = "metadata")]
        metadata: Vec<String>,
        /// Base IRI for relative references
        #[arg(long)]
        base: Option<String>,
        /// Path to a YAML graph configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GraphConfig, String> {
    match path {
        Some(path) => GraphConfig::from_yaml_file(path)
            .map_err(|e| format!("cannot load config '{}': {}", path.display(), e)),
        None => Ok(GraphConfig::default()),
    }
}

/// Parse `file` into a fresh resource map
fn open_map(
    file: &Path,
    pid: &str,
    base: Option<&str>,
    config: Option<&Path>,
) -> Result<(ResourceMap, Membership), String> {
    let config = load_config(config)?;
    let bytes = std::fs::read(file).map_err(|e| format!("cannot read '{}': {}", file.display(), e))?;
    let mut map = ResourceMap::new(config);
    match map.parse_bytes(&bytes, pid, base) {
        ParseOutcome::Parsed(membership) => Ok((map, membership)),
        ParseOutcome::Indeterminate(e) => Err(format!(
            "membership of '{}' is unknown: {}",
            file.display(),
            e
        )),
    }
}

/// Without --pid, the file name stands in for the identifier
fn pid_or_file_name(pid: Option<String>, file: &Path) -> String {
    pid.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_members(input: Input) -> i32 {
    let pid = pid_or_file_name(input.pid, &input.file);
    match open_map(&input.file, &pid, input.base.as_deref(), input.config.as_deref()) {
        Ok((_, membership)) => print_json(&membership),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_provenance(input: Input) -> i32 {
    let pid = pid_or_file_name(input.pid, &input.file);
    let (mut map, membership) =
        match open_map(&input.file, &pid, input.base.as_deref(), input.config.as_deref()) {
            Ok(opened) => opened,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };
    let provenance = map.provenance(&membership.members);
    print_json(&provenance)
}

#[allow(clippy::too_many_arguments)]
fn cmd_rewrite(
    file: &Path,
    old: &str,
    new: &str,
    added: &[String],
    removed: &[String],
    metadata: &[String],
    base: Option<&str>,
    config: Option<&Path>,
) -> i32 {
    let (mut map, membership) = match open_map(file, old, base, config) {
        Ok(opened) => opened,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let kept: Vec<String> = membership
        .members
        .iter()
        .filter(|id| !removed.contains(id))
        .cloned()
        .collect();
    let mut request = SaveRequest::update(new, old).with_documentation(&kept, &membership.documented_by);

    for id in metadata {
        let mut member = PackageMember::metadata(id.as_str());
        for data_id in added {
            member = member.documents(data_id.as_str());
        }
        request = request.with_member(member);
    }
    for id in added {
        let mut member = PackageMember::data(id.as_str());
        for metadata_id in metadata {
            member = member.documented_by(metadata_id.as_str());
        }
        request = request.with_member(member);
    }

    match map.save(&request) {
        Ok(outcome) => {
            for skipped in &outcome.edits.skipped {
                eprintln!("Warning: skipped edit '{}': {}", skipped.edit, skipped.error);
            }
            print!("{}", outcome.document);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let code = match cli.command {
        Commands::Members { input } => cmd_members(input),
        Commands::Provenance { input } => cmd_provenance(input),
        Commands::Rewrite {
            file,
            old,
            new,
            added,
            removed,
            metadata,
            base,
            config,
        } => cmd_rewrite(
            &file,
            &old,
            &new,
            &added,
            &removed,
            &metadata,
            base.as_deref(),
            config.as_deref(),
        ),
    };
    std::process::exit(code);
}
