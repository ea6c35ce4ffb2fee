// Data-quality report over a loaded store

use crate::store::{MalformedLine, RecordStore};
use chrono::{DateTime, SecondsFormat, Utc};
use crawlview_types::{MalformedKind, Record, parse_timestamp};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Group label for records without a source
pub const MISSING_SOURCE: &str = "(missing)";

/// Completeness counters for a set of records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QualityCounts {
    pub records: usize,
    pub unique_urls: usize,
    /// Occurrences of a URL beyond its first
    pub duplicate_url_hits: usize,
    pub missing_url: usize,
    pub missing_name: usize,
    pub missing_meta: usize,
    /// Empty or unparseable `discovered_at_utc`
    pub undated: usize,
    pub first_discovered: Option<String>,
    pub last_discovered: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub source: String,
    #[serde(flatten)]
    pub counts: QualityCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub total: QualityCounts,
    /// Largest source first; ties keep first-seen order
    pub sources: Vec<SourceStats>,
    pub skipped_lines: usize,
    pub invalid_json: usize,
    pub not_an_object: usize,
    pub malformed_samples: Vec<MalformedLine>,
}

impl DatasetStats {
    pub fn from_store(store: &RecordStore) -> Self {
        let mut total = Tally::default();
        let mut groups: Vec<(String, Tally)> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for record in store.records() {
            total.add(record);
            let source = match record.source().trim() {
                "" => MISSING_SOURCE,
                s => s,
            };
            let idx = *positions.entry(source).or_insert_with(|| {
                groups.push((source.to_string(), Tally::default()));
                groups.len() - 1
            });
            groups[idx].1.add(record);
        }

        let mut sources: Vec<SourceStats> = groups
            .into_iter()
            .map(|(source, tally)| SourceStats {
                source,
                counts: tally.finish(),
            })
            .collect();
        sources.sort_by(|a, b| b.counts.records.cmp(&a.counts.records));

        Self {
            total: total.finish(),
            sources,
            skipped_lines: store.parse_errors(),
            invalid_json: store.malformed_count(MalformedKind::InvalidJson),
            not_an_object: store.malformed_count(MalformedKind::NotAnObject),
            malformed_samples: store.malformed_samples().to_vec(),
        }
    }
}

#[derive(Default)]
struct Tally<'a> {
    counts: QualityCounts,
    seen: HashSet<&'a str>,
    first: Option<DateTime<Utc>>,
    last: Option<DateTime<Utc>>,
}

impl<'a> Tally<'a> {
    fn add(&mut self, record: &'a Record) {
        let counts = &mut self.counts;
        counts.records += 1;

        if record.url().trim().is_empty() {
            counts.missing_url += 1;
        } else if !self.seen.insert(record.url()) {
            counts.duplicate_url_hits += 1;
        }
        if record.name().trim().is_empty() {
            counts.missing_name += 1;
        }
        if record.meta().is_none() {
            counts.missing_meta += 1;
        }

        match parse_timestamp(record.discovered_at_utc()) {
            Some(at) => {
                self.first = Some(self.first.map_or(at, |f| f.min(at)));
                self.last = Some(self.last.map_or(at, |l| l.max(at)));
            }
            None => counts.undated += 1,
        }
    }

    fn finish(mut self) -> QualityCounts {
        self.counts.unique_urls = self.seen.len();
        self.counts.first_discovered = self.first.map(format_utc);
        self.counts.last_discovered = self.last.map(format_utc);
        self.counts
    }
}

fn format_utc(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
