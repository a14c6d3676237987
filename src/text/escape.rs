/// Replacements applied by [`unescape`], in order. `&amp;` has to be last,
/// otherwise `&amp;lt;` would collapse into `<`.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("&#13;", "\r"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
];

/// Turn the feed's escaped markup back into markup that can be saved as-is.
pub fn unescape(s: &str) -> String {
    REPLACEMENTS
        .iter()
        .fold(s.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Everything after the final `/`, verbatim. A string without `/` is
/// returned whole.
pub fn last_path_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
