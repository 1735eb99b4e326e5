//! Evaluation dashboard - run the benchmark prompt set

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use medscope::evaluation::{EvaluationOutcome, BENCHMARK_PROMPTS};
use medscope::export;

use super::{format_latency, truncate, GlobalOptions, Invocation};

pub fn execute(options: &GlobalOptions, output: Option<&Path>) -> Result<()> {
    let invocation = Invocation::load(options)?;
    let dashboard = invocation.open_dashboard()?;

    println!("📊 Evaluation Dashboard\n");
    println!(
        "Running {} benchmark prompts against {} (max tokens {})\n",
        BENCHMARK_PROMPTS.len(),
        dashboard.settings().model,
        dashboard.settings().max_tokens
    );

    let outcomes = dashboard.run_evaluation(&BENCHMARK_PROMPTS)?;
    print_results(&outcomes);

    if let Some(path) = output {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        export::write_run_results(file, &outcomes)?;
        println!("\n💾 Results written to {}", path.display());
    }
    Ok(())
}

fn print_results(outcomes: &[EvaluationOutcome]) {
    println!("{:<48} {:<60} {:>8}", "Prompt", "AI Response", "Time (s)");
    println!("{}", "─".repeat(118));
    for outcome in outcomes {
        println!(
            "{:<48} {:<60} {:>8}",
            truncate(&outcome.prompt, 48),
            truncate(&outcome.response, 60),
            format_latency(outcome.latency)
        );
    }

    let failed = outcomes.iter().filter(|o| o.failed()).count();
    println!("\n━━━ Summary ━━━");
    println!("├─ Prompts: {}", outcomes.len());
    println!("├─ Succeeded: {}", outcomes.len() - failed);
    println!("└─ Failed: {}", failed);
}
