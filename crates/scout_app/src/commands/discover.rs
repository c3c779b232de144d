use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use scout_engine::{
    discover, write_endpoints_csv, write_postings_csv, write_text, DiscoverySettings,
    HarvestSettings,
};
use scout_logging::{scout_info, scout_warn};

use crate::cli::DiscoverArgs;
use crate::commands::{build_fetcher, cancel_on_ctrl_c, load_seed_urls, LogSink};

pub async fn run(args: DiscoverArgs) -> Result<()> {
    let seeds = load_seed_urls(&args.seeds)?;
    scout_info!("Loaded {} seed URLs from {}", seeds.len(), args.seeds.display());

    let settings = DiscoverySettings {
        harvest: HarvestSettings {
            page_size: args.page_size,
            max_pages: args.max_pages,
        },
        probe_spacing: Duration::from_millis(args.probe_delay_ms),
        request_spacing: Duration::from_millis(args.request_delay_ms),
        ..DiscoverySettings::default()
    };
    let fetcher = Arc::new(build_fetcher(args.timeout_secs)?);
    let cancel = cancel_on_ctrl_c();

    let report = discover(fetcher, &seeds, &settings, &LogSink, &cancel).await;
    if report.cancelled {
        scout_warn!("Discovery interrupted; writing partial results");
    }

    write_endpoints_csv(&args.endpoints_output, &report.endpoints).with_context(|| {
        format!("failed to write endpoints to {}", args.endpoints_output.display())
    })?;
    write_postings_csv(&args.output, report.new_postings())
        .with_context(|| format!("failed to write postings to {}", args.output.display()))?;
    let stats = report.to_string();
    write_text(&args.stats_output, &format!("{stats}\n"))
        .with_context(|| format!("failed to write stats to {}", args.stats_output.display()))?;

    for line in stats.lines() {
        scout_info!("{}", line);
    }
    scout_info!("New postings written to {}", args.output.display());
    Ok(())
}
