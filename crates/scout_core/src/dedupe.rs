use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::{is_false_positive, normalize_title, PlatformProfile, Posting};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum IdentityKey {
    /// (posting id, domain)
    Id(String, String),
    /// (normalized title, domain), used when the URL carries no id.
    Title(String, String),
}

/// Drop false positives, then collapse postings naming the same job.
///
/// The result does not depend on input order: within a group the
/// representative is chosen by [`prefer`], and the output is sorted by URL.
pub fn dedupe(postings: Vec<Posting>, profile: &PlatformProfile) -> Vec<Posting> {
    let mut groups: BTreeMap<IdentityKey, Posting> = BTreeMap::new();

    for posting in postings.into_iter().filter(|p| !is_false_positive(p)) {
        let fingerprint = profile.fingerprint(&posting.url);
        let key = match fingerprint.id {
            Some(id) => IdentityKey::Id(id, fingerprint.domain),
            None => IdentityKey::Title(normalize_title(&posting.title), fingerprint.domain),
        };
        match groups.get_mut(&key) {
            Some(current) => {
                if prefer(&posting, current) == Ordering::Less {
                    *current = posting;
                }
            }
            None => {
                groups.insert(key, posting);
            }
        }
    }

    let mut unique: Vec<Posting> = groups.into_values().collect();
    unique.sort_by(|a, b| a.url.cmp(&b.url).then_with(|| a.cmp(b)));
    unique
}

/// Total order over duplicates; `Less` means `a` is the better representative.
///
/// Secure scheme first, then the longer URL, then every field in turn so that
/// equal-looking duplicates still resolve the same way every run.
fn prefer(a: &Posting, b: &Posting) -> Ordering {
    let secure = |p: &Posting| p.url.starts_with("https");
    secure(b)
        .cmp(&secure(a))
        .then_with(|| b.url.len().cmp(&a.url.len()))
        .then_with(|| a.url.cmp(&b.url))
        .then_with(|| a.cmp(b))
}
