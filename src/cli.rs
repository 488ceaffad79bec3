use crate::commit::{RemoteConfig, DEFAULT_API_URL, DEFAULT_BRANCH, DEFAULT_REPO};
use crate::model::DEFAULT_WINDOW;
use crate::readme::{DEFAULT_MARKER, DEFAULT_README_FILE};
use crate::render::{Renderer, DEFAULT_PLOT_COMMAND};
use crate::series::DEFAULT_DATA_FILE;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cpstats")]
#[command(about = "Track newly added solutions and plot them into the README")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[clap(flatten)]
    pub remote: RemoteArgs,

    #[arg(long, global = true, help = "Exit non-zero on failure (2 for API errors, 1 otherwise)")]
    pub strict: bool,

    #[arg(short, long, action = ArgAction::Count, global = true, help = "Increase log verbosity (-v, -vv); overrides RUST_LOG when given")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(long, help = "Path to the series file", default_value = DEFAULT_DATA_FILE)]
    pub data: PathBuf,

    #[arg(long, help = "Path to the README to patch", default_value = DEFAULT_README_FILE)]
    pub readme: PathBuf,

    #[arg(long, help = "Marker name of the README region", default_value = DEFAULT_MARKER)]
    pub marker: String,

    #[arg(long = "plot-cmd", help = "Plotting executable", default_value = DEFAULT_PLOT_COMMAND)]
    pub plot_cmd: String,

    #[arg(long = "plot-arg", help = "Argument passed to the plotting executable (repeatable)")]
    pub plot_args: Vec<String>,

    #[arg(long, help = "Number of real entries kept in the series", default_value_t = DEFAULT_WINDOW)]
    pub window: usize,
}

#[derive(Args, Clone, Debug)]
pub struct RemoteArgs {
    #[arg(long, env = "ACCESS_TOKEN", hide_env_values = true, default_value = "", help = "API access token")]
    pub token: String,

    #[arg(long = "api-url", help = "API base URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[arg(long, help = "Repository as <owner>/<repo>", default_value = DEFAULT_REPO)]
    pub repo: String,

    #[arg(long, help = "Branch whose latest commit is inspected", default_value = DEFAULT_BRANCH)]
    pub branch: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the latest commit, record it, re-plot and patch the README (default)
    Update {
        #[arg(long, help = "Print what would be recorded without writing anything")]
        dry_run: bool,
    },
    /// Re-plot the current series and patch the README
    Render,
    /// Print the current series
    Show {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

impl CommonArgs {
    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.plot_cmd.clone(), self.plot_args.clone())
    }
}

impl From<RemoteArgs> for RemoteConfig {
    fn from(args: RemoteArgs) -> Self {
        RemoteConfig {
            api_url: args.api_url,
            repo: args.repo,
            branch: args.branch,
            token: args.token,
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> ExitCode {
        init_logging(self.verbose);

        let command = self.command.unwrap_or(Commands::Update { dry_run: false });

        match command {
            Commands::Update { dry_run } => {
                crate::update::exec(&self.common, self.remote.into(), dry_run, self.strict)
            }
            Commands::Render => crate::update::exec_render(&self.common, self.strict),
            Commands::Show { json } => crate::update::exec_show(&self.common, json, self.strict),
        }
    }
}

/// `-v` wins over `RUST_LOG`; without either, only warnings are shown.
fn log_directive(verbose: u8, from_env: Option<String>) -> String {
    match (verbose, from_env) {
        (0, Some(env)) if !env.trim().is_empty() => env,
        (0, _) => "warn".to_string(),
        (1, _) => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn init_logging(verbose: u8) {
    let directive = log_directive(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();
}
