use std::process::ExitCode;

use anyhow::Result;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let status = sum_cli::run(std::env::args_os(), &mut stdout.lock(), &mut stderr.lock())?;
    Ok(status.into())
}
