use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use scout_core::{update, Effect, ExtractionStatus, JobRecord, Ledger, Msg, Posting, RunState};
use scout_logging::{scout_error, scout_info, scout_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::ledger::{LedgerError, LedgerStore};
use crate::pacing::{PacedFetcher, PacingScope};
use crate::{fetch_details, EngineEvent, Extractor, Fetcher, ProgressSink, RetryPolicy};

const MIN_DESCRIPTION_CHARS: usize = 50;

#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Jobs processed between ledger saves.
    pub batch_size: usize,
    pub retry: RetryPolicy,
    pub request_spacing: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            batch_size: 100,
            retry: RetryPolicy::default(),
            request_spacing: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not restore progress: {0}")]
    Restore(#[source] LedgerError),
    #[error("could not save final progress: {0}")]
    FinalSave(#[source] LedgerError),
}

/// Source of `extracted_at` timestamps.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

pub fn utc_clock() -> Clock {
    Arc::new(|| chrono::Utc::now().to_rfc3339())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records in the ledger after the run, restored ones included.
    pub total_records: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub with_description: usize,
    pub with_location: usize,
    pub with_date: usize,
    pub stopped_early: bool,
    pub ledger: Ledger,
}

impl RunSummary {
    fn tally(&mut self, record: &JobRecord) {
        self.processed += 1;
        if record.extraction_status.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        if record.description_text.chars().count() > MIN_DESCRIPTION_CHARS {
            self.with_description += 1;
        }
        if !record.location.is_empty() {
            self.with_location += 1;
        }
        if !record.date_posted.is_empty() {
            self.with_date += 1;
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        let pct = |n: usize| {
            if self.processed == 0 {
                0.0
            } else {
                n as f64 * 100.0 / self.processed as f64
            }
        };
        writeln!(f, "{rule}")?;
        writeln!(f, "EXTRACTION {}", if self.stopped_early { "INTERRUPTED" } else { "COMPLETE" })?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Total records:          {}", self.total_records)?;
        writeln!(f, "Processed this run:     {}", self.processed)?;
        writeln!(f, "Successful:             {}", self.succeeded)?;
        writeln!(f, "Failed:                 {}", self.failed)?;
        writeln!(f, "With description:       {} ({:.1}%)", self.with_description, pct(self.with_description))?;
        writeln!(f, "With location:          {} ({:.1}%)", self.with_location, pct(self.with_location))?;
        writeln!(f, "With date posted:       {} ({:.1}%)", self.with_date, pct(self.with_date))?;
        write!(f, "{rule}")
    }
}

/// Drives the pure run state machine against real collaborators.
///
/// Every `Effect` the state machine emits is executed here, in order: detail
/// extraction through the paced fetcher, and ledger saves through the store.
pub struct RunController {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    store: Arc<dyn LedgerStore>,
    settings: RunSettings,
    clock: Clock,
}

impl RunController {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
        store: Arc<dyn LedgerStore>,
        settings: RunSettings,
    ) -> Self {
        let fetcher: Arc<dyn Fetcher> = Arc::new(PacedFetcher::new(
            fetcher,
            settings.request_spacing,
            PacingScope::Global,
        ));
        Self {
            fetcher,
            extractor,
            store,
            settings,
            clock: utc_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Extract every job the ledger has not completed yet.
    ///
    /// Only restoring the ledger and the final save can fail the run; each
    /// job's failure is recorded as its status instead.
    pub async fn run(
        &self,
        jobs: Vec<Posting>,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, RunError> {
        let restored = self.store.load().map_err(RunError::Restore)?;
        if !restored.is_empty() {
            scout_info!("Resuming: {} jobs already processed", restored.len());
        }

        let mut summary = RunSummary::default();
        let state = RunState::new(self.settings.batch_size);
        let (state, _) = update(state, Msg::RestoreLedger(restored));
        let (mut state, effects) = update(state, Msg::JobsLoaded(jobs));

        let total = effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Extract(_)))
            .count();
        scout_info!("Remaining to process: {}", total);

        let mut pending: VecDeque<Effect> = effects.into();
        let mut index = 0;
        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::Extract(posting) => {
                    if cancel.is_cancelled() {
                        if !state.is_stopped() {
                            scout_warn!("Stop requested; {} jobs left unprocessed", total - index);
                            state = update(state, Msg::StopRequested).0;
                        }
                        continue;
                    }
                    index += 1;
                    let record = self.extract_one(&posting).await;
                    summary.tally(&record);
                    sink.emit(EngineEvent::JobExtracted {
                        index,
                        total,
                        url: record.url.clone(),
                        title: record.title.clone(),
                        status: record.extraction_status.clone(),
                        description_chars: record.description_text.chars().count(),
                        error: record.error.clone(),
                    });
                    let (next, follow_up) = update(state, Msg::JobDone(record));
                    state = next;
                    for effect in follow_up.into_iter().rev() {
                        pending.push_front(effect);
                    }
                }
                Effect::PersistLedger(ledger) => match self.store.save(&ledger) {
                    Ok(()) => sink.emit(EngineEvent::LedgerSaved { records: ledger.len() }),
                    Err(err) => scout_error!("Checkpoint save failed, continuing: {}", err),
                },
            }
        }

        let (state, effects) = update(state, Msg::Finished);
        for effect in effects {
            if let Effect::PersistLedger(ledger) = effect {
                self.store.save(&ledger).map_err(RunError::FinalSave)?;
                sink.emit(EngineEvent::LedgerSaved { records: ledger.len() });
            }
        }

        summary.stopped_early = state.is_stopped();
        let ledger = state.into_ledger();
        summary.total_records = ledger.len();
        summary.ledger = ledger;
        Ok(summary)
    }

    async fn extract_one(&self, posting: &Posting) -> JobRecord {
        let outcome = fetch_details(
            self.fetcher.as_ref(),
            self.extractor.as_ref(),
            &posting.url,
            &self.settings.retry,
        )
        .await;
        let fields = outcome.fields;
        let location = if fields.location.is_empty() {
            posting.location.clone()
        } else {
            fields.location
        };
        if let ExtractionStatus::Http(code) = outcome.status {
            scout_warn!("HTTP {} for {}", code, posting.url);
        }
        JobRecord {
            title: posting.title.clone(),
            url: posting.url.clone(),
            apply_url: fields.apply_url,
            location,
            date_posted: fields.date_posted,
            department: fields.department,
            employment_type: fields.employment_type,
            description_text: fields.description_text,
            description_html: fields.description_html,
            source_domain: posting.source_domain.clone(),
            source_path: posting.source_path.clone(),
            extraction_status: outcome.status,
            error: outcome.error,
            extracted_at: (self.clock)(),
        }
    }
}
