use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::{debug, info, instrument};

use crate::config::SuiteConfig;
use crate::errors::Result;
use crate::mock;
use crate::suite::run::{SuiteReport, SuiteRunner};
use crate::suite::{Selection, Suite, Tag};

/// CLI
#[derive(Parser, Debug)]
#[command(
    name = "beertap",
    version,
    about = "Black-box checks for the beers HTTP API.",
    long_about = "Black-box checks for the beers HTTP API.\n\n\
Cases:\n  • validation: listings return 200 with a non-empty array\n  • schema: every record has id > 0, a non-empty name and price >= 0\n  • negative-case: unknown categories 404, POST is rejected with 405\n  • performance / load: repeated requests finish under a wall-clock budget"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the check suite against a beers service.
    Run(RunArgs),
    /// Serve the mock beers service.
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Overrides `base_url` from the config file and BEERTAP_BASE_URL.
    #[arg(long = "base-url", short = 'u', value_name = "URL")]
    pub base_url: Option<String>,

    /// Only run cases with this tag; repeatable.
    #[arg(long = "tag", short = 't', value_enum)]
    pub tags: Vec<Tag>,

    /// Only run cases whose name contains this text.
    #[arg(long = "filter", short = 'f', value_name = "TEXT")]
    pub filter: Option<String>,

    /// Print the selected cases without running them.
    #[arg(long = "list")]
    pub list: bool,
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    #[arg(long = "addr", short = 'a', value_name = "HOST:PORT", default_value = "127.0.0.1:4000")]
    pub addr: SocketAddr,
}

/// Returns `None` for `--list`, otherwise the finished report.
#[instrument(skip_all)]
pub async fn run_suite(args: &RunArgs) -> Result<Option<SuiteReport>> {
    let cfg = SuiteConfig::resolve(args.config.as_deref(), args.base_url.as_deref())?;
    info!(base_url = %cfg.base_url, "starting beertap run");

    let suite = Suite::from_config(&cfg);
    let selection = Selection {
        tags: args.tags.clone(),
        name_filter: args.filter.clone(),
    };
    let cases = suite.select(&selection);
    debug!(?selection, selected = cases.len(), total = suite.cases.len(), "cases selected");

    if args.list {
        for case in &cases {
            println!("{case}");
        }
        return Ok(None);
    }

    let t0 = Instant::now();
    let report = SuiteRunner::new(cfg).run(cases).await;
    info!(total_ms = t0.elapsed().as_millis() as u64, "run complete");
    Ok(Some(report))
}

pub async fn serve_mock(args: &ServeArgs) -> Result<()> {
    mock::serve(args.addr, mock::default_catalog()).await
}
