use std::io::Read;

use anyhow::Context;
use appraise_core::report;
use appraise_core::{Analyzer, AppraiseConfig, JudgeKind, RunStatus};

use crate::cli::AnalyzeArgs;
use crate::exit_codes;

pub async fn run(args: AnalyzeArgs) -> anyhow::Result<i32> {
    let text = read_text(&args)?;

    let mut config = match &args.config {
        Some(path) => AppraiseConfig::load(path)?,
        None => {
            let mut config = AppraiseConfig::default();
            config.apply_env();
            config
        }
    };

    if let Some(judge) = &args.judge {
        config.judge = match judge.as_str() {
            "react" => JudgeKind::React,
            _ => JudgeKind::Rules,
        };
    }
    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }
    if args.no_early_exit {
        config.early_exit_on_critical = false;
    }

    let analyzer = Analyzer::new(config)?;
    let run = analyzer
        .analyze(&text, None)
        .await
        .context("analysis failed")?;

    let rendered = report::render_markdown(&run);
    match &args.output {
        Some(path) => {
            report::write_report(&run, path)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => print!("{rendered}"),
    }

    Ok(match run.status {
        RunStatus::AllPassed => exit_codes::ALL_PASSED,
        RunStatus::ProblemFound => exit_codes::PROBLEM_FOUND,
    })
}

fn read_text(args: &AnalyzeArgs) -> anyhow::Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read text from stdin")?;
    Ok(buf.trim_end().to_string())
}
