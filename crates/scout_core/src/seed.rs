/// Seed URLs found in free-form text: every whitespace-delimited token that
/// starts with `http://` or `https://`. Anything else is ignored.
pub fn parse_seed_tokens(raw: &str) -> Vec<String> {
    raw.split_whitespace()
        .filter(|token| token.starts_with("http://") || token.starts_with("https://"))
        .map(ToOwned::to_owned)
        .collect()
}
