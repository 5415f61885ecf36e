use clap::Parser;
use parsum::cli::{Cli, Output};
use parsum::ReduceError;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new(cli.verbose > 0, cli.quiet);

    match cli.run(&output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&format!("{e:#}"));
            let code = e
                .downcast_ref::<ReduceError>()
                .map_or(1, ReduceError::exit_code);
            ExitCode::from(code as u8)
        }
    }
}
