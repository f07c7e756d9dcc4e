//! docketload CLI - load law-firm CSV extracts into PostgreSQL
//!
//! - `load`: ensure the cases / billable_hours / tasks tables exist, then
//!   insert every source row, skipping identities that are already present
//! - `insights`: (re)create the `clean_case_insights` view used by the dashboard
//! - `completions`: shell completion scripts

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "docketload",
    author,
    version,
    about = "Load case, billable-hour and task extracts into PostgreSQL",
    long_about = "Creates the target tables on demand and loads each CSV row independently: \
                  rows whose identity already exists are skipped, bad rows are logged and \
                  do not stop the rest of the file."
)]
struct Cli {
    /// Suppress progress bars (for scripts and CI logs)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create missing tables and load the CSV sources
    Load(docketload_pg::LoadArgs),
    /// Create or replace the clean_case_insights view and print headline numbers
    Insights(docketload_pg::InsightsArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env has to be in the environment before clap reads DB_* at parse time
    let env_files = docketload_pg::config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();
    for path in &env_files {
        debug!("Loaded environment from {}", path.display());
    }
    docketload_pg::ui::init_quiet_mode(cli.quiet);

    match cli.command {
        Commands::Load(args) => {
            docketload_pg::run_load(args).await?;
        }
        Commands::Insights(args) => docketload_pg::run_insights(args).await?,
        Commands::Completions(args) => run_completions(args),
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
