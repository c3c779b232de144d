use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use scout_engine::{
    read_postings_csv, write_records_csv, write_records_json, write_text, JsonFileLedger,
    PatternExtractor, RetryPolicy, RunController, RunSettings,
};
use scout_logging::scout_info;

use crate::cli::ExtractArgs;
use crate::commands::{build_fetcher, cancel_on_ctrl_c, LogSink};

pub async fn run(args: ExtractArgs) -> Result<()> {
    let jobs = read_postings_csv(&args.input)
        .with_context(|| format!("failed to read postings from {}", args.input.display()))?;
    if jobs.is_empty() {
        bail!("{} contains no postings", args.input.display());
    }
    scout_info!("Loaded {} jobs from {}", jobs.len(), args.input.display());

    let settings = RunSettings {
        batch_size: args.batch_size,
        retry: RetryPolicy {
            max_attempts: args.max_attempts,
            backoff: Duration::from_millis(args.backoff_ms),
        },
        request_spacing: Duration::from_millis(args.request_delay_ms),
    };
    let extractor = PatternExtractor::standard().context("extraction rules failed to compile")?;
    let controller = RunController::new(
        Arc::new(build_fetcher(args.timeout_secs)?),
        Arc::new(extractor),
        Arc::new(JsonFileLedger::new(&args.ledger)),
        settings,
    );

    let cancel = cancel_on_ctrl_c();
    let summary = controller
        .run(jobs, &LogSink, &cancel)
        .await
        .with_context(|| format!("extraction run failed (ledger {})", args.ledger.display()))?;

    let records = &summary.ledger.results;
    write_records_csv(&args.output_csv, records)
        .with_context(|| format!("failed to write {}", args.output_csv.display()))?;
    write_records_json(&args.output_json, records)
        .with_context(|| format!("failed to write {}", args.output_json.display()))?;
    let stats = summary.to_string();
    write_text(&args.stats_output, &format!("{stats}\n"))
        .with_context(|| format!("failed to write {}", args.stats_output.display()))?;

    for line in stats.lines() {
        scout_info!("{}", line);
    }
    scout_info!(
        "Saved {} records to {} and {}",
        records.len(),
        args.output_csv.display(),
        args.output_json.display()
    );
    Ok(())
}
