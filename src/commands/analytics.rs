//! Admin analytics - usage and latency views over one snapshot

use anyhow::Result;
use medscope::analytics::AnalyticsOverview;

use super::{format_latency, truncate, GlobalOptions, Invocation};

const BAR_WIDTH: usize = 40;

pub fn execute(
    options: &GlobalOptions,
    top: Option<usize>,
    bins: Option<usize>,
    json: bool,
) -> Result<()> {
    let invocation = Invocation::load(options)?;
    let store = invocation.open_store()?;

    let interactions = store.query_interactions()?;
    let evaluations = store.query_evaluations()?;
    let overview = AnalyticsOverview::compute(
        &interactions,
        &evaluations,
        top.unwrap_or(invocation.config.analytics.top_queries),
        bins.unwrap_or(invocation.config.analytics.histogram_bins),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
    } else {
        render(&overview);
    }
    Ok(())
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (count * BAR_WIDTH).div_ceil(max);
    "█".repeat(len)
}

fn render(overview: &AnalyticsOverview) {
    println!("📈 Admin Analytics\n");

    println!("━━━ Interactions per day ━━━\n");
    if overview.daily_counts.is_empty() {
        println!("  (no interactions)");
    }
    let max_daily = overview.daily_counts.values().copied().max().unwrap_or(0);
    for (date, count) in &overview.daily_counts {
        println!("  {}  {:>5}  {}", date, count, bar(*count, max_daily));
    }

    println!("\n━━━ Latency distribution ━━━\n");
    if overview.latency_histogram.is_empty() {
        println!("  (no timed evaluations)");
    }
    let max_bucket = overview
        .latency_histogram
        .iter()
        .map(|b| b.count)
        .max()
        .unwrap_or(0);
    for bucket in &overview.latency_histogram {
        println!(
            "  {:>7.2}-{:<7.2}s  {:>4}  {}",
            bucket.start,
            bucket.end,
            bucket.count,
            bar(bucket.count, max_bucket)
        );
    }

    println!("\n━━━ Most common queries ━━━\n");
    if overview.top_queries.is_empty() {
        println!("  (no user queries)");
    }
    for (rank, query) in overview.top_queries.iter().enumerate() {
        println!(
            "  {}. {} ({})",
            rank + 1,
            truncate(&query.content, 70),
            query.count
        );
    }

    let summary = &overview.summary;
    println!("\n━━━ Evaluation summary ━━━\n");
    println!("├─ Timed evaluations: {}", summary.count);
    println!("├─ Failed evaluations: {}", summary.failures);
    println!(
        "├─ Mean latency (s): {}",
        format_latency(summary.mean_latency)
    );
    println!("├─ Fastest (s): {}", format_latency(summary.min_latency));
    println!("└─ Slowest (s): {}", format_latency(summary.max_latency));
}
