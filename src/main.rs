use std::process::ExitCode;

use anyhow::Context;
use beertap::cmd::{run_suite, serve_mock, Cli, Command};
use beertap::log::init_tracing;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing().context("initialising tracing")?;

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => match run_suite(&args).await.context("running suite")? {
            Some(report) => {
                println!("{report}");
                Ok(if report.is_success() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                })
            }
            None => Ok(ExitCode::SUCCESS),
        },
        Command::Serve(args) => {
            serve_mock(&args).await.context("serving mock beers service")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
