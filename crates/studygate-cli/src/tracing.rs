use anyhow::Context;
use studygate_shared::telemetry;

const APP_NAME: &str = "studygate_cli";

pub fn init(cli: &super::cli::Cli) -> anyhow::Result<()> {
    fn init_to_file() -> anyhow::Result<()> {
        let (file, file_path) =
            telemetry::create_trace_file(telemetry::DEFAULT_TRACE_FOLDER.as_ref(), APP_NAME)?;
        let subscriber = telemetry::get_subscriber(APP_NAME.into(), "info", file);
        telemetry::init_subscriber(subscriber).context("Failed to start tracing to file")?;
        eprintln!("Tracing to file {file_path:?}");
        Ok(())
    }

    if !cli.is_to_std_out {
        match init_to_file() {
            Ok(()) => return Ok(()),
            Err(e) => {
                // Fall through to logging to stdout
                eprintln!("Failed to start logging to file: {e:#}");
            }
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to start tracing. Error: {e}"))
}
