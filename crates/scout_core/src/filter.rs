use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::{normalize_title, Posting};

const MIN_TITLE_CHARS: usize = 3;
const MAX_TITLE_CHARS: usize = 200;

/// Social, navigation and account boilerplate that shows up as link text.
const NON_JOB_TITLES: &[&str] = &[
    "email", "linkedin", "facebook", "twitter", "instagram", "youtube", "share", "tweet", "post",
    "follow", "subscribe", "x", "tiktok", "home", "back", "next", "previous", "menu", "search",
    "filter", "apply", "apply now", "learn more", "read more", "view all", "see all", "show more",
    "load more", "click here", "view details", "jobs", "careers", "opportunities", "positions",
    "openings", "login", "sign in", "register", "sign up", "my account", "profile",
    "reset password", "forgot password", "logout", "sign out", "contact", "contact us", "about",
    "about us", "privacy", "terms", "cookie", "cookies", "legal", "disclaimer", "help", "faq",
    "support", "close", "cancel", "submit", "save", "delete", "edit", "update",
];

static JUNK_TITLE_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"^[\W\d]+$",
        r"^\d+$",
        r"^#\d+",
        r"@",
        r"(?i)^https?://",
        r"(?i)\.com|\.net|\.org",
    ])
    .expect("junk title patterns compile")
});

static NON_JOB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)/(?:Error|ResetPassword|Login|Register|Profile|Account|Privacy|Terms|Contact|About)|share[=/]|social[=/]",
    )
    .expect("non-job url pattern compiles")
});

/// Whether a harvested posting is link boilerplate rather than a job.
pub fn is_false_positive(posting: &Posting) -> bool {
    let title = posting.title.trim();
    let len = title.chars().count();
    if !(MIN_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&len) {
        return true;
    }
    if NON_JOB_TITLES.contains(&normalize_title(title).as_str()) {
        return true;
    }
    if JUNK_TITLE_PATTERNS.is_match(title) {
        return true;
    }
    NON_JOB_URL.is_match(&posting.url)
}
