//! Report analysis - extract a .pdf/.txt report, then ask for insights

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;

use medscope::extract::{self, DocumentKind};
use medscope::AnalysisOutcome;

use super::{GlobalOptions, Invocation};

pub fn execute(options: &GlobalOptions, file: &Path, extract_only: bool) -> Result<()> {
    let Some(kind) = DocumentKind::from_path(file) else {
        bail!(
            "unsupported report type: {} (expected .pdf or .txt)",
            file.display()
        );
    };

    let bytes = fs::read(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let text = match extract::extract(&bytes, kind.mime_type()) {
        Ok(text) => text,
        Err(e) => {
            println!("{} {}", "❌ Extraction failed:".red(), e);
            return Err(e)
                .with_context(|| format!("could not extract {}", file.display()));
        }
    };

    println!("📄 Extracted Report Content");
    println!("{}", "━".repeat(60));
    println!("{}", text.trim_end());
    println!("{}\n", "━".repeat(60));

    if extract_only {
        return Ok(());
    }

    let invocation = Invocation::load(options)?;
    let dashboard = invocation.open_dashboard()?;

    println!("🔍 Analyzing with {}...\n", dashboard.settings().model);
    match dashboard.analyze_report(&text)? {
        AnalysisOutcome::Completed(analysis) => {
            println!("{}", "AI Analysis Result".bold());
            println!("{}", analysis);
        }
        AnalysisOutcome::Failed(message) => {
            println!("{} {}", "❌ Error:".red(), message);
        }
    }
    Ok(())
}
