use crate::store::KeyValue;

/// Map half of the built-in word-count workload: tokenize on whitespace,
/// keep only alphanumerics and '_', lowercase, and emit ("token", "1") per
/// occurrence. The input identifier is not used.
pub fn map(_input: &str, contents: &str) -> Vec<KeyValue> {
    let mut out = Vec::new();

    for raw in contents.split_whitespace() {
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect::<String>()
            .to_lowercase();

        if !cleaned.is_empty() {
            out.push(KeyValue {
                key: cleaned,
                value: "1".to_string(),
            });
        }
    }

    out
}

/// Reduce half: sum the per-occurrence counts for one token.
pub fn reduce(_key: &str, values: &[String]) -> String {
    let total: u64 = values.iter().filter_map(|v| v.parse::<u64>().ok()).sum();
    total.to_string()
}
