use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "myfoot")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Compare InnoDB reported table sizes with their on-disk footprint", long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Report options when no subcommand is given
    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Report catalog vs. on-disk size per schema and table (default)
    Report(ReportArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Report
// ============================================================================

#[derive(Args, Clone, Debug)]
pub struct ReportArgs {
    /// MySQL server host
    #[arg(long, env = "DBHOST", default_value = "127.0.0.1")]
    pub host: String,

    /// MySQL server port
    #[arg(short = 'P', long, env = "DBPORT", default_value = "3306")]
    pub port: u16,

    /// MySQL user
    #[arg(short, long, env = "DBUSER")]
    pub user: Option<String>,

    /// MySQL password
    #[arg(short, long, env = "DBPASS", hide_env_values = true)]
    pub password: Option<String>,

    /// Data directory to probe instead of the server's datadir
    #[arg(long)]
    pub datadir: Option<String>,

    /// Only report schemas matching this regex (repeatable)
    #[arg(short, long = "schema", value_name = "REGEX")]
    pub schemas: Vec<String>,

    /// Number of tables probed in parallel
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Only count `<table>.ibd` and `<table>#*.ibd`, not every file sharing the prefix
    #[arg(long)]
    pub strict_match: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
