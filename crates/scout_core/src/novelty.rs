use std::collections::HashSet;

use crate::{normalize_url_for_seed, PlatformProfile, Posting};

/// Postings split by whether the seed list already knew them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub new: Vec<Posting>,
    pub existing: Vec<Posting>,
}

/// Classify each posting as already present in the seed (by normalized URL
/// or by fingerprint) or newly discovered. Input order is kept within each side.
pub fn partition<S: AsRef<str>>(
    postings: Vec<Posting>,
    seed_urls: &[S],
    profile: &PlatformProfile,
) -> Partition {
    let mut seed_normalized = HashSet::new();
    let mut seed_ids = HashSet::new();
    for seed in seed_urls {
        let seed = seed.as_ref();
        if seed.trim().is_empty() {
            continue;
        }
        seed_normalized.insert(normalize_url_for_seed(seed));
        let fingerprint = profile.fingerprint(seed);
        if let Some(id) = fingerprint.id {
            seed_ids.insert((id, fingerprint.domain));
        }
    }

    let mut result = Partition::default();
    for posting in postings {
        let fingerprint = profile.fingerprint(&posting.url);
        let known_url = seed_normalized.contains(&normalize_url_for_seed(&posting.url));
        let known_id = fingerprint
            .id
            .is_some_and(|id| seed_ids.contains(&(id, fingerprint.domain)));
        if known_url || known_id {
            result.existing.push(posting);
        } else {
            result.new.push(posting);
        }
    }
    result
}
