use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use roadmapd::cli::export::ExportArgs;
use roadmapd::cli::lint::LintTarget;
use roadmapd::Result;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roadmapd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Roadmap manifest validator and section lifecycle engine", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a roadmap manifest's structure
    Validate {
        /// Path to the roadmap manifest (JSON or YAML)
        manifest: PathBuf,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Print the deterministic topological order of sections
    Topo {
        /// Path to the roadmap manifest
        manifest: PathBuf,
    },

    /// List everything blocking a section from completing
    #[command(name = "list-blockers")]
    ListBlockers {
        /// Path to the roadmap manifest
        manifest: PathBuf,

        /// Section to inspect (e.g. 2.4)
        section_id: String,
    },

    /// Suggest the next section to work on
    Next {
        /// Path to the roadmap manifest
        manifest: PathBuf,

        /// Section to advance from
        section_id: String,
    },

    /// Full roadmap health report (exit 2 on consistency issues)
    Doctor {
        /// Path to the roadmap manifest
        manifest: PathBuf,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Export a mermaid graph or markdown brief, optionally gating CI
    Export(ExportArgs),

    /// Check a raw manifest document against its JSON schema
    Lint {
        /// Document type to lint
        #[arg(value_enum)]
        target: LintTarget,

        /// Path to the manifest document
        manifest: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Validate { manifest, json } => {
            roadmapd::cli::validate::run(&manifest, json)?;
        }

        Commands::Topo { manifest } => {
            roadmapd::cli::topo::run(&manifest)?;
        }

        Commands::ListBlockers {
            manifest,
            section_id,
        } => {
            roadmapd::cli::blockers::run(&manifest, &section_id)?;
        }

        Commands::Next {
            manifest,
            section_id,
        } => {
            roadmapd::cli::next::run(&manifest, &section_id)?;
        }

        Commands::Doctor { manifest, json } => {
            roadmapd::cli::doctor::run(&manifest, json)?;
        }

        Commands::Export(args) => {
            roadmapd::cli::export::run(&args)?;
        }

        Commands::Lint { target, manifest } => {
            roadmapd::cli::lint::run(target, &manifest)?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "roadmapd", &mut io::stdout());
        }
    }

    Ok(())
}
