//! Test report - summary JSON plus the detailed evaluation log

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use medscope::analytics::{evaluation_summary, TestReportSummary};
use medscope::export;

use super::{format_latency, truncate, GlobalOptions, Invocation};

pub const EMPTY_MESSAGE: &str = "No evaluation data available. Please run evaluations first.";

pub fn execute(options: &GlobalOptions, output: Option<&Path>) -> Result<()> {
    let invocation = Invocation::load(options)?;
    let store = invocation.open_store()?;
    let records = store.query_evaluations()?;

    if records.is_empty() {
        println!("{}", EMPTY_MESSAGE);
        return Ok(());
    }

    let summary = TestReportSummary::from(&evaluation_summary(&records));
    println!("🧾 Test Report\n");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    println!("\n━━━ Detailed Results ━━━\n");
    println!(
        "{:>5}  {:<40}  {:<44}  {:>8}",
        "ID", "Prompt", "Response", "Time (s)"
    );
    println!("{}", "─".repeat(104));
    for r in &records {
        println!(
            "{:>5}  {:<40}  {:<44}  {:>8}",
            r.id,
            truncate(&r.prompt, 40),
            truncate(&r.response, 44),
            format_latency(r.latency)
        );
    }

    if let Some(path) = output {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        export::write_evaluation_log(file, &records)?;
        println!("\n💾 Report written to {}", path.display());
    }
    Ok(())
}
