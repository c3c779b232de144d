//! Jobscout engine: network, parsing and disk side of discovery and extraction.
mod decode;
mod detail;
mod discovery;
mod export;
mod extract;
mod fetch;
mod harvest;
mod ledger;
mod listing;
mod pacing;
mod persist;
mod probe;
mod retry;
mod rules;
mod run;
mod text;
mod types;

pub use decode::{decode_body, DecodedBody};
pub use detail::{fetch_details, DetailOutcome};
pub use discovery::{discover, DiscoveryReport, DiscoverySettings};
pub use export::{
    read_postings_csv, write_endpoints_csv, write_postings_csv, write_records_csv,
    write_records_json, write_text, ExportError,
};
pub use extract::{ExtractedFields, Extractor, PatternExtractor};
pub use fetch::{
    FetchSettings, Fetcher, NullSink, ProgressSink, ReqwestFetcher, DEFAULT_ACCEPT,
    DEFAULT_USER_AGENT,
};
pub use harvest::{HarvestSettings, Harvester};
pub use ledger::{JsonFileLedger, LedgerError, LedgerStore, MemoryLedger};
pub use listing::{parse_listing, posting_links, ListingLink};
pub use pacing::{PacedFetcher, PacingScope, RequestPacer};
pub use persist::{ensure_output_dir, write_atomically, AtomicFileWriter, PersistError};
pub use probe::EndpointProber;
pub use retry::RetryPolicy;
pub use rules::{Capture, FieldRules, Page, Rule, RuleChain, RuleError};
pub use run::{utc_clock, Clock, RunController, RunError, RunSettings, RunSummary};
pub use text::{collapse_whitespace, strip_html};
pub use types::{EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput};
