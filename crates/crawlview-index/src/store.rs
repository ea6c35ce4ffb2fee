use crate::facets::{Facet, build_facets};
use crawlview_types::{MalformedKind, Record, truncate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Malformed lines kept verbatim (truncated) for reporting
pub const MALFORMED_SAMPLE_LIMIT: usize = 30;
const MALFORMED_EXCERPT_CHARS: usize = 80;

/// A skipped line, by 1-based position among non-blank lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedLine {
    pub line: usize,
    pub kind: MalformedKind,
    pub excerpt: String,
}

/// Ordered collection of records plus derived facet counts.
///
/// Records are appended during a load and never reordered; the arrival
/// order is the final tiebreak for every sort. Facets are only valid after
/// [`RecordStore::finish_load`].
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    parse_errors: usize,
    malformed_by_kind: BTreeMap<MalformedKind, usize>,
    malformed_samples: Vec<MalformedLine>,
    sources: Vec<Facet>,
    domains: Vec<Facet>,
    loaded: bool,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.loaded = false;
        self.records.push(record);
    }

    pub fn record_parse_error(&mut self, line: usize, kind: MalformedKind, text: &str) {
        self.parse_errors += 1;
        *self.malformed_by_kind.entry(kind).or_insert(0) += 1;
        if self.malformed_samples.len() < MALFORMED_SAMPLE_LIMIT {
            self.malformed_samples.push(MalformedLine {
                line,
                kind,
                excerpt: truncate(text, MALFORMED_EXCERPT_CHARS),
            });
        }
    }

    /// Rebuild facet maps once the stream has been fully consumed
    pub fn finish_load(&mut self) {
        self.sources = build_facets(self.records.iter().map(Record::source));
        self.domains = build_facets(self.records.iter().map(Record::domain));
        self.loaded = true;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// First record (in arrival order) with the given URL
    pub fn find_by_url(&self, url: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.url() == url)
    }

    pub fn parse_errors(&self) -> usize {
        self.parse_errors
    }

    pub fn malformed_count(&self, kind: MalformedKind) -> usize {
        self.malformed_by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// The first [`MALFORMED_SAMPLE_LIMIT`] skipped lines
    pub fn malformed_samples(&self) -> &[MalformedLine] {
        &self.malformed_samples
    }

    pub fn source_facets(&self) -> &[Facet] {
        &self.sources
    }

    pub fn domain_facets(&self) -> &[Facet] {
        &self.domains
    }

    /// Aggregate status text for the last load
    pub fn status_text(&self) -> String {
        let loaded = plural(self.records.len(), "record", "records");
        match self.parse_errors {
            0 => format!("Loaded {}", loaded),
            n => format!("Loaded {} ({} skipped)", loaded, plural(n, "line", "lines")),
        }
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}
