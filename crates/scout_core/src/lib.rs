//! Jobscout core: URL canonicalization, posting identity and the pure run state machine.
mod dedupe;
mod filter;
mod fingerprint;
mod ledger;
mod novelty;
mod profile;
mod run;
mod seed;
mod site;
mod types;

pub use dedupe::dedupe;
pub use filter::is_false_positive;
pub use fingerprint::{normalize_title, normalize_url_for_seed, Fingerprint};
pub use ledger::Ledger;
pub use novelty::{partition, Partition};
pub use profile::PlatformProfile;
pub use run::{update, Effect, Msg, RunState};
pub use seed::parse_seed_tokens;
pub use site::{dedupe_site_roots, SiteRoot};
pub use types::{Endpoint, ExtractionStatus, JobRecord, Posting};
