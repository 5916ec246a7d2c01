use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").unwrap());

/// Lowercase, drop everything but word characters, spaces and hyphens, then
/// collapse runs of spaces/hyphens into a single hyphen.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    let joined = SEPARATORS.replace_all(stripped.trim(), "-");
    joined.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Slugify and cut to `max_chars` characters.
pub fn slugify_truncated(value: &str, max_chars: usize) -> String {
    slugify(value).chars().take(max_chars).collect()
}
