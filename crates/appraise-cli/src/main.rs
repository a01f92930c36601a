use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod exit_codes;

use cli::commands::dispatch;
use cli::Cli;

fn init_logging(verbose: u8, quiet: bool) {
    let default = if quiet {
        "off"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            exit_codes::HARD_ERROR
        }
    };
    std::process::exit(code);
}
