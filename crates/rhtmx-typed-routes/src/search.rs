// File: src/search.rs
// Purpose: Ordered query-string multimap

use std::fmt;

/// Ordered list of query-string entries, keys may repeat
///
/// ```
/// use rhtmx_typed_routes::SearchParams;
///
/// let params = SearchParams::parse("?tag=a&tag=b%20c&page=2");
/// assert_eq!(params.get_all("tag"), vec!["a", "b c"]);
/// assert_eq!(params.to_string(), "tag=a&tag=b%20c&page=2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    entries: Vec<(String, String)>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string, with or without the leading `?`
    ///
    /// `+` decodes to a space; pairs that fail percent-decoding are kept verbatim.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        let entries = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect();

        Self { entries }
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value stored under `key`, in order
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Drops every entry under `key`
    pub fn remove(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k != key);
    }

    pub fn extend(&mut self, other: &SearchParams) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}

/// Encodes the entries without a leading `?`
impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = self
            .entries
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        f.write_str(&query)
    }
}

impl<K, V> FromIterator<(K, V)> for SearchParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert!(SearchParams::parse("").is_empty());
        assert!(SearchParams::parse("?").is_empty());
    }

    #[test]
    fn test_parse_plus_and_bare_keys() {
        let params = SearchParams::parse("q=a+b&flag");
        assert_eq!(params.get("q"), Some("a b"));
        assert_eq!(params.get("flag"), Some(""));
    }

    #[test]
    fn test_remove_and_extend() {
        let mut params: SearchParams = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        params.remove("a");
        assert_eq!(params.to_string(), "b=2");

        params.extend(&SearchParams::parse("c=4"));
        assert_eq!(params.len(), 2);
        assert!(params.contains_key("c"));
    }

    #[test]
    fn test_encoding_roundtrip_of_reserved_characters() {
        let mut params = SearchParams::new();
        params.append("q", "a&b=c");
        let encoded = params.to_string();
        assert_eq!(encoded, "q=a%26b%3Dc");
        assert_eq!(SearchParams::parse(&encoded).get("q"), Some("a&b=c"));
    }
}
