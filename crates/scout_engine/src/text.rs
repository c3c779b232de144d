use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("script pattern"));
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("style pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern"));

/// Plain text of an HTML fragment.
///
/// Script and style blocks go first, payload included, so their contents
/// never reach the text. Then tags become spaces, entities are decoded and
/// whitespace is collapsed.
pub fn strip_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let without_scripts = SCRIPT_BLOCK.replace_all(html, "");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, "");
    let without_tags = TAG.replace_all(&without_styles, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);
    collapse_whitespace(&decoded)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::strip_html;

    #[test]
    fn scripts_and_styles_do_not_leak() {
        let html = "<div>Hello<script type=\"x\">var a = '<b>no</b>';</script>\n<STYLE>.a{}</STYLE> <b>world</b></div>";
        assert_eq!(strip_html(html), "Hello world");
    }

    #[test]
    fn entities_are_decoded_after_tags_are_removed() {
        assert_eq!(strip_html("<p>R&amp;D &lt;team&gt;</p>"), "R&D <team>");
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(strip_html("  a\n\n\t<br/>b  "), "a b");
    }
}
