//! Identifier spellings
//!
//! One package member may be written into a resource map as a bare
//! identifier, a percent-encoded identifier, or either of those appended to
//! a resolver base URL. These helpers convert between the spellings.

use std::borrow::Cow;

/// Percent-encode an identifier for use as a URI path segment.
///
/// Matches the escaping DataONE clients have always written: everything but
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped.
pub fn encode_component(id: &str) -> String {
    let encoded = urlencoding::encode(id);
    if !encoded.contains("%2") {
        return encoded.into_owned();
    }
    encoded
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

/// Percent-decode a URI segment. Sequences that do not decode to UTF-8 are
/// left as written.
pub fn decode_component(segment: &str) -> String {
    match urlencoding::decode(segment) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => segment.to_string(),
    }
}

/// Extract the member identifier from any of its URI spellings: the last
/// path segment, percent-decoded.
pub fn pid_from_uri(uri: &str) -> String {
    let segment = uri.rsplit('/').next().unwrap_or(uri);
    decode_component(segment)
}

/// Every known spelling of one identifier, computed once per rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSet {
    id: String,
    spellings: Vec<String>,
}

impl AliasSet {
    /// Build the alias set for `id`.
    ///
    /// `resolver_base_url` is the graph's resolver; `resolved_uri` is the URI
    /// the graph itself currently uses for the identifier, if any.
    pub fn new(id: &str, resolver_base_url: &str, resolved_uri: Option<&str>) -> Self {
        let encoded = encode_component(id);
        let mut set = Self {
            id: id.to_string(),
            spellings: Vec::new(),
        };
        set.push(id.to_string());
        set.push(encoded.clone());
        set.push(format!("{}{}", resolver_base_url, id));
        set.push(format!("{}{}", resolver_base_url, encoded));
        if let Some(uri) = resolved_uri {
            set.push(uri.to_string());
        }
        set
    }

    fn push(&mut self, spelling: String) {
        if !spelling.is_empty() && !self.spellings.contains(&spelling) {
            self.spellings.push(spelling);
        }
    }

    /// The identifier the set was built from
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn contains(&self, spelling: &str) -> bool {
        self.spellings.iter().any(|s| s == spelling)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.spellings.iter().map(String::as_str)
    }

    /// Every spelling with `suffix` appended, e.g. `#aggregation`
    pub fn with_suffix<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = String> + 'a {
        self.spellings.iter().map(move |s| format!("{}{}", s, suffix))
    }

    pub fn len(&self) -> usize {
        self.spellings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spellings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOLVER: &str = "https://cn.dataone.org/cn/v2/resolve/";

    #[test]
    fn encode_escapes_colons_and_slashes() {
        assert_eq!(encode_component("urn:uuid:1"), "urn%3Auuid%3A1");
        assert_eq!(encode_component("doi:10.5063/F1"), "doi%3A10.5063%2FF1");
    }

    #[test]
    fn encode_keeps_unreserved_marks() {
        assert_eq!(encode_component("a(b)!*'~"), "a(b)!*'~");
        assert_eq!(encode_component("a b"), "a%20b");
    }

    #[test]
    fn decode_round_trips_encoded_identifier() {
        let id = "doi:10.5063/F1 (v2)";
        assert_eq!(decode_component(&encode_component(id)), id);
    }

    #[test]
    fn decode_leaves_invalid_sequences() {
        assert_eq!(decode_component("%FF%FE"), "%FF%FE");
    }

    #[test]
    fn pid_from_every_spelling() {
        assert_eq!(pid_from_uri("urn:uuid:X"), "urn:uuid:X");
        assert_eq!(pid_from_uri(&format!("{}urn:uuid:X", RESOLVER)), "urn:uuid:X");
        assert_eq!(pid_from_uri(&format!("{}urn%3Auuid%3AX", RESOLVER)), "urn:uuid:X");
    }

    #[test]
    fn alias_set_has_all_spellings_once() {
        let aliases = AliasSet::new(
            "urn:uuid:1",
            RESOLVER,
            Some("https://cn.dataone.org/cn/v2/resolve/urn%3Auuid%3A1"),
        );

        assert_eq!(aliases.len(), 4);
        assert!(aliases.contains("urn:uuid:1"));
        assert!(aliases.contains("urn%3Auuid%3A1"));
        assert!(aliases.contains("https://cn.dataone.org/cn/v2/resolve/urn:uuid:1"));
        assert!(aliases.contains("https://cn.dataone.org/cn/v2/resolve/urn%3Auuid%3A1"));
    }

    #[test]
    fn alias_set_suffixes() {
        let aliases = AliasSet::new("pkg", RESOLVER, None);
        let aggregations: Vec<String> = aliases.with_suffix("#aggregation").collect();
        assert!(aggregations.contains(&"pkg#aggregation".to_string()));
        assert!(aggregations.contains(&format!("{}pkg#aggregation", RESOLVER)));
    }
}
