use super::{Cli, Command};

pub mod analyze;
pub mod checks;
pub mod criteria;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Analyze(args) => analyze::run(args).await,
        Command::Checks(args) => checks::run(args),
        Command::Criteria(args) => criteria::run(args),
    }
}
