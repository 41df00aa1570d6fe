use regex::Regex;
use std::sync::LazyLock;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{L}\p{N}\p{P}\p{Z}\n]").expect("sanitize pattern is valid")
});

/// Strip everything but letters, numbers, punctuation, separators and newlines
pub fn sanitize_text(text: &str) -> String {
    DISALLOWED.replace_all(text, "").trim().to_string()
}
