use std::collections::BTreeSet;

use crate::{JobRecord, Ledger, Posting};

/// Inputs to the extraction run state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Ledger read from the store before any work starts.
    RestoreLedger(Ledger),
    /// The job list for this run.
    JobsLoaded(Vec<Posting>),
    /// One job finished, successfully or not.
    JobDone(JobRecord),
    /// Cooperative stop; no further jobs should be started.
    StopRequested,
    /// The driver ran out of jobs or stopped.
    Finished,
}

/// Work the driver must perform on behalf of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Extract(Posting),
    PersistLedger(Ledger),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    ledger: Ledger,
    batch_size: usize,
    since_persist: usize,
    processed: usize,
    queued: BTreeSet<String>,
    stopped: bool,
}

impl RunState {
    /// `batch_size` is the number of newly processed jobs between ledger saves.
    pub fn new(batch_size: usize) -> Self {
        Self {
            ledger: Ledger::new(),
            batch_size: batch_size.max(1),
            since_persist: 0,
            processed: 0,
            queued: BTreeSet::new(),
            stopped: false,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    /// Jobs completed during this run, excluding restored ones.
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn persist(&mut self) -> Effect {
        self.since_persist = 0;
        Effect::PersistLedger(self.ledger.clone())
    }
}

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: RunState, msg: Msg) -> (RunState, Vec<Effect>) {
    let effects = match msg {
        Msg::RestoreLedger(ledger) => {
            state.ledger = ledger;
            Vec::new()
        }
        Msg::JobsLoaded(jobs) => {
            if state.stopped {
                return (state, Vec::new());
            }
            let mut effects = Vec::new();
            for mut job in jobs {
                job.url = job.url.trim().to_string();
                if job.url.is_empty() || state.ledger.is_completed(&job.url) {
                    continue;
                }
                if !state.queued.insert(job.url.clone()) {
                    continue;
                }
                effects.push(Effect::Extract(job));
            }
            effects
        }
        Msg::JobDone(record) => {
            state.queued.remove(&record.url);
            if !state.ledger.record(record) {
                return (state, Vec::new());
            }
            state.processed += 1;
            state.since_persist += 1;
            if state.since_persist >= state.batch_size {
                vec![state.persist()]
            } else {
                Vec::new()
            }
        }
        Msg::StopRequested => {
            state.stopped = true;
            Vec::new()
        }
        Msg::Finished => vec![state.persist()],
    };

    (state, effects)
}
