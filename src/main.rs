use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use git_autopilot::App;
use git_autopilot::Config;
use git_autopilot::ops::git::RealGit;
use log::debug;
use log::warn;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

const USAGE: &str = "Usage: git-autopilot \"Commit message\"";

#[derive(Parser)]
#[command(name = "git-autopilot")]
#[command(about = "Commit all changes, rebase onto origin/main and push the current branch", long_about = None)]
pub struct Cli {
    /// Message for the commit of the staged changes
    #[arg(allow_hyphen_values = true)]
    pub message: Option<String>,

    /// Anything after the message is ignored
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub ignored: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    setup_logging()?;

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => {
            err.print()?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => {
            debug!("{}", err);
            println!("{}", USAGE);
            return Ok(ExitCode::FAILURE);
        }
    };
    let Some(message) = cli.message else {
        println!("{}", USAGE);
        return Ok(ExitCode::FAILURE);
    };
    if !cli.ignored.is_empty() {
        warn!("ignoring extra arguments: {}", cli.ignored.join(" "));
    }

    let app = App::new(Config::default(), RealGit::new(std::env::current_dir()?));
    app.cmd_run(&message, &mut std::io::stdout()).await?;

    Ok(ExitCode::SUCCESS)
}

/// Log to stderr, filtered by RUST_LOG (warnings by default).
fn setup_logging() -> Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}
