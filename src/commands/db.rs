//! Database viewer - dump either log, newest first

use anyhow::Result;

use super::{format_latency, truncate, GlobalOptions, Invocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Interactions,
    Evaluations,
}

pub fn execute(options: &GlobalOptions, view: View, json: bool) -> Result<()> {
    let invocation = Invocation::load(options)?;
    let store = invocation.open_store()?;

    match view {
        View::Interactions => {
            let records = store.query_interactions()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
                return Ok(());
            }
            println!("💬 Interactions ({})\n", records.len());
            println!("{:>5}  {:<26}  {:<16}  Content", "ID", "Timestamp", "Role");
            println!("{}", "─".repeat(100));
            for r in &records {
                println!(
                    "{:>5}  {:<26}  {:<16}  {}",
                    r.id,
                    r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    r.role.as_str(),
                    truncate(&r.content, 48)
                );
            }
        }
        View::Evaluations => {
            let records = store.query_evaluations()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
                return Ok(());
            }
            println!("📊 Evaluations ({})\n", records.len());
            println!(
                "{:>5}  {:<26}  {:<36}  {:<36}  {:>8}",
                "ID", "Timestamp", "Prompt", "Response", "Time (s)"
            );
            println!("{}", "─".repeat(118));
            for r in &records {
                println!(
                    "{:>5}  {:<26}  {:<36}  {:<36}  {:>8}",
                    r.id,
                    r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    truncate(&r.prompt, 36),
                    truncate(&r.response, 36),
                    format_latency(r.latency)
                );
            }
        }
    }
    Ok(())
}
