//! Metric key prefix resolution.

/// Pick the prefix that namespaces emitted metric keys.
///
/// A non-empty `explicit` value wins, then a non-empty `fallback`
/// (normally the `LABEL` environment value), otherwise the empty string.
pub fn resolve_prefix(explicit: Option<&str>, fallback: Option<&str>) -> String {
    [explicit, fallback]
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Key of the metric group under `prefix`, e.g. `chime.MeetingChimeMetrics`.
pub fn group_key(prefix: &str) -> String {
    if prefix.is_empty() {
        super::GROUP_NAME.to_string()
    } else {
        format!("{prefix}.{}", super::GROUP_NAME)
    }
}

/// Upper-case the first letter of every word.
///
/// Letters, digits and `_` continue a word; anything else separates words.
pub fn title_case(value: &str) -> String {
    let mut at_word_start = true;
    value
        .chars()
        .map(|c| {
            let out = if at_word_start {
                c.to_uppercase().next().unwrap_or(c)
            } else {
                c
            };
            at_word_start = !(c.is_alphanumeric() || c == '_');
            out
        })
        .collect()
}
