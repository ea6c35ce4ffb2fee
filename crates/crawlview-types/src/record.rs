use serde::Serialize;
use serde_json::{Map, Value};

/// One crawled URL's metadata entry.
///
/// Records are immutable once built. The `domain` is derived from `url`
/// inside [`Record::new`] and there is no way to set it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    url: String,
    name: String,
    discovered_at_utc: String,
    source: String,
    meta: Option<Map<String, Value>>,
    domain: String,
}

impl Record {
    pub fn new(
        url: impl Into<String>,
        name: impl Into<String>,
        discovered_at_utc: impl Into<String>,
        source: impl Into<String>,
        meta: Option<Map<String, Value>>,
    ) -> Self {
        let url = url.into();
        let domain = domain_of(&url);
        Self {
            url,
            name: name.into(),
            discovered_at_utc: discovered_at_utc.into(),
            source: source.into(),
            meta,
            domain,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn discovered_at_utc(&self) -> &str {
        &self.discovered_at_utc
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn meta(&self) -> Option<&Map<String, Value>> {
        self.meta.as_ref()
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Look up a single metadata value by key
    pub fn meta_value(&self, key: &str) -> Option<&Value> {
        self.meta.as_ref().and_then(|m| m.get(key))
    }
}

/// Why a non-blank JSONL line produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedKind {
    InvalidJson,
    NotAnObject,
}

impl std::fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedKind::InvalidJson => write!(f, "invalid JSON"),
            MalformedKind::NotAnObject => write!(f, "not an object"),
        }
    }
}

/// Lower-cased host of `url`, or an empty string when it does not parse
/// or carries no host.
pub fn domain_of(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match url::Url::parse(trimmed) {
        Ok(parsed) => parsed
            .host_str()
            .map(|h| h.to_ascii_lowercase())
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_is_lowercased_host() {
        let record = Record::new(
            "https://WWW.DevB.gov.hk/en/publications/index.html",
            "Publications",
            "2024-01-02T03:04:05Z",
            "devb_publications",
            None,
        );
        assert_eq!(record.domain(), "www.devb.gov.hk");
    }

    #[test]
    fn test_domain_empty_for_unparsable_url() {
        assert_eq!(domain_of("not a url"), "");
        assert_eq!(domain_of(""), "");
        assert_eq!(domain_of("/relative/path.pdf"), "");
    }

    #[test]
    fn test_domain_empty_for_hostless_url() {
        assert_eq!(domain_of("mailto:someone@example.org"), "");
    }

    #[test]
    fn test_meta_value_lookup() {
        let mut meta = Map::new();
        meta.insert("email".to_string(), Value::String("a@b.hk".to_string()));
        let record = Record::new("https://a.hk/", "", "", "tel_directory", Some(meta));

        assert_eq!(
            record.meta_value("email").and_then(|v| v.as_str()),
            Some("a@b.hk")
        );
        assert!(record.meta_value("missing").is_none());
    }
}
