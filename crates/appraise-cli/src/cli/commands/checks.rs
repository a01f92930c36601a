use appraise_core::CheckRegistry;
use serde_json::json;

use crate::cli::ChecksArgs;
use crate::exit_codes;

pub fn run(args: ChecksArgs) -> anyhow::Result<i32> {
    let registry = CheckRegistry::with_builtins();
    let infos: Vec<_> = registry
        .list()
        .into_iter()
        .filter_map(|name| registry.check_info(&name).ok())
        .collect();

    if args.json {
        let entries: Vec<_> = infos
            .iter()
            .map(|info| json!({ "name": info.name, "description": info.description }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("Registered checks:\n");
        for info in &infos {
            println!("  {:<16} {}", info.name, info.description);
        }
    }

    Ok(exit_codes::ALL_PASSED)
}
