use regex::{Captures, Regex};
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<script[\s\S]*?</script>").unwrap());
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<style[\s\S]*?</style>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&(nbsp|amp|lt|gt);").unwrap());

/// Decode bytes as UTF-8, dropping invalid sequences instead of replacing them.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Decode `&nbsp;`, `&amp;`, `&lt;` and `&gt;` in a single left-to-right scan.
///
/// Decoded output is never rescanned, so `&amp;lt;` becomes `&lt;`.
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| match &caps[1] {
            "nbsp" => " ",
            "amp" => "&",
            "lt" => "<",
            _ => ">",
        })
        .into_owned()
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Turn an HTML/XHTML document into a single line of plain text.
///
/// This is a regex heuristic, not an HTML parser. The order is fixed: script
/// blocks, style blocks, remaining tags, entities, whitespace.
pub fn html_to_text(html: &str) -> String {
    let cleaned = SCRIPT_BLOCK.replace_all(html, " ");
    let cleaned = STYLE_BLOCK.replace_all(&cleaned, " ");
    let cleaned = TAG.replace_all(&cleaned, " ");
    let cleaned = decode_entities(&cleaned);
    collapse_whitespace(&cleaned)
}

/// Join the non-blank sections with `separator` and trim the result.
pub fn join_sections<I, S>(sections: I, separator: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for section in sections {
        let section = section.as_ref();
        if section.trim().is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push_str(separator);
        }
        joined.push_str(section);
    }
    joined.trim().to_string()
}
