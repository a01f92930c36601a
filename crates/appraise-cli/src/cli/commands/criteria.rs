use appraise_core::{AppraiseConfig, CheckRegistry};

use crate::cli::CriteriaArgs;
use crate::exit_codes;

pub fn run(args: CriteriaArgs) -> anyhow::Result<i32> {
    let mut registry = CheckRegistry::with_builtins();
    if let Some(path) = &args.config {
        let config = AppraiseConfig::load(path)?;
        if let Some(dir) = config.criteria_dir {
            registry.set_criteria_dir(dir);
        }
    }

    let document = registry.criteria_for(&args.name)?;
    print!("{document}");
    Ok(exit_codes::ALL_PASSED)
}
