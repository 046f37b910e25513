use anyhow::Context;
use clap::Parser;
use studygate_cli::{cli::Cli, commands::App, configuration::get_configuration};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = studygate_cli::tracing::init(&cli) {
        eprintln!("Failed to start tracing: {e}");
    }

    let configuration =
        get_configuration(cli.config_dir.as_deref()).context("failed to read configuration")?;
    let app = App::try_new(&configuration)?;
    app.run(cli.command).await
}
