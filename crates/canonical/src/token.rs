use crate::normalize::normalize;

/// Splits already-normalized text into its non-empty tokens.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(' ').filter(|t| !t.is_empty())
}

/// Normalizes a raw query and returns its tokens in input order.
pub fn query_tokens(raw: &str) -> Vec<String> {
    let normalized = normalize(raw);
    tokens(&normalized).map(str::to_owned).collect()
}
