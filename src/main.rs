use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let cli = dept_site::cli::Cli::parse();
    dept_site::logging::init(cli.verbose).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    let name = cli.command.name();
    match cli.command {
        dept_site::cli::Command::Serve(args) => {
            dept_site::server::serve(args).await.context(name)?;
        }
        dept_site::cli::Command::Render(args) => {
            dept_site::render::run(args).await.context(name)?;
        }
        dept_site::cli::Command::Fetch(args) => {
            dept_site::fetch::run(args).await.context(name)?;
        }
    }

    Ok(())
}
