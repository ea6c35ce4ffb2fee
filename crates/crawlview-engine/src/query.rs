use chrono::{DateTime, Utc};
use crawlview_index::RecordStore;
use crawlview_types::{Record, parse_timestamp};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    #[serde(rename = "discovered_at_utc")]
    DiscoveredAt,
    Name,
    Url,
    Domain,
    Source,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DiscoveredAt => "discovered_at_utc",
            SortKey::Name => "name",
            SortKey::Url => "url",
            SortKey::Domain => "domain",
            SortKey::Source => "source",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discovered_at_utc" | "discovered" | "date" => Ok(SortKey::DiscoveredAt),
            "name" => Ok(SortKey::Name),
            "url" => Ok(SortKey::Url),
            "domain" => Ok(SortKey::Domain),
            "source" => Ok(SortKey::Source),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Active filters, sort and page of one viewing session.
///
/// Only [`QueryEngine`] mutates this; everything else reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    source: Option<String>,
    domain: Option<String>,
    search: String,
    sort_key: SortKey,
    direction: SortDirection,
    page: usize,
    page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            source: None,
            domain: None,
            search: String::new(),
            sort_key: SortKey::default(),
            direction: SortDirection::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryState {
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_active_filter(&self) -> bool {
        self.source.is_some() || self.domain.is_some() || !self.search.is_empty()
    }

    fn matches(&self, record: &Record, needle: Option<&str>) -> bool {
        if let Some(source) = &self.source
            && record.source() != source
        {
            return false;
        }
        if let Some(domain) = &self.domain
            && record.domain() != domain
        {
            return false;
        }
        match needle {
            Some(needle) => format!("{} {}", record.name(), record.url())
                .to_lowercase()
                .contains(needle),
            None => true,
        }
    }
}

/// Filters, sorts and paginates a [`RecordStore`] according to its owned state.
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    state: QueryState,
}

impl QueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn set_source_filter(&mut self, source: Option<&str>) {
        self.state.source = non_blank(source);
        self.state.page = 1;
    }

    pub fn set_domain_filter(&mut self, domain: Option<&str>) {
        self.state.domain = non_blank(domain);
        self.state.page = 1;
    }

    pub fn set_search(&mut self, text: &str) {
        self.state.search = text.trim().to_string();
        self.state.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.state.source = None;
        self.state.domain = None;
        self.state.search.clear();
        self.state.page = 1;
    }

    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.state.sort_key = key;
        self.state.direction = direction;
        self.state.page = 1;
    }

    /// Column-header behaviour: the active key flips direction, a new key
    /// starts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        let direction = if self.state.sort_key == key {
            self.state.direction.flipped()
        } else {
            SortDirection::Ascending
        };
        self.set_sort(key, direction);
    }

    /// Request a page; it is clamped into range on the next [`execute`](Self::execute).
    pub fn set_page(&mut self, page: usize) {
        self.state.page = page.max(1);
    }

    /// Change the page size, keeping the current page unless it falls out of range.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.page_size = page_size.max(1);
    }

    /// Produce the visible window and clamp the current page against it.
    pub fn execute<'s>(&mut self, store: &'s RecordStore) -> QueryView<'s> {
        let matching = matching_records(store, &self.state);
        let filtered_count = matching.len();
        let page_size = self.state.page_size;
        let total_pages = filtered_count.div_ceil(page_size).max(1);

        self.state.page = self.state.page.clamp(1, total_pages);
        let start = (self.state.page - 1) * page_size;

        let rows: Vec<&Record> = matching.into_iter().skip(start).take(page_size).collect();

        QueryView {
            rows,
            total_count: store.len(),
            filtered_count,
            page: self.state.page,
            total_pages,
            page_size,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Every record visible under `state`, in sorted order, across all pages.
pub fn matching_records<'s>(store: &'s RecordStore, state: &QueryState) -> Vec<&'s Record> {
    let needle = (!state.search.is_empty()).then(|| state.search.to_lowercase());

    let mut entries: Vec<SortEntry<'s>> = store
        .records()
        .iter()
        .filter(|record| state.matches(record, needle.as_deref()))
        .map(|record| SortEntry::new(record, state.sort_key))
        .collect();

    let descending = state.direction == SortDirection::Descending;
    // Stable sort: equal url keeps arrival order
    entries.sort_by(|a, b| {
        let primary = a.compare_primary(b);
        let primary = if descending { primary.reverse() } else { primary };
        primary.then_with(|| a.record.url().cmp(b.record.url()))
    });

    entries.into_iter().map(|e| e.record).collect()
}

struct SortEntry<'a> {
    record: &'a Record,
    text: String,
    time: Option<DateTime<Utc>>,
}

impl<'a> SortEntry<'a> {
    fn new(record: &'a Record, key: SortKey) -> Self {
        match key {
            SortKey::DiscoveredAt => Self {
                record,
                text: record.discovered_at_utc().to_string(),
                time: parse_timestamp(record.discovered_at_utc()),
            },
            SortKey::Name => Self::text(record, record.name()),
            SortKey::Url => Self::text(record, record.url()),
            SortKey::Domain => Self::text(record, record.domain()),
            SortKey::Source => Self::text(record, record.source()),
        }
    }

    fn text(record: &'a Record, value: &str) -> Self {
        Self {
            record,
            text: value.to_lowercase(),
            time: None,
        }
    }

    fn compare_primary(&self, other: &Self) -> Ordering {
        match (self.time, other.time) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => compare_present_first_empty(&self.text, &other.text),
        }
    }
}

/// Empty values sort before any defined value
fn compare_present_first_empty(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

/// The visible window produced by [`QueryEngine::execute`]
#[derive(Debug, Clone, Serialize)]
pub struct QueryView<'a> {
    pub rows: Vec<&'a Record>,
    pub total_count: usize,
    pub filtered_count: usize,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
}

impl QueryView<'_> {
    pub fn is_empty(&self) -> bool {
        self.filtered_count == 0
    }

    /// 1-based index of the first visible row (0 when nothing matches)
    pub fn first_row(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    pub fn range_text(&self) -> String {
        if self.is_empty() {
            return "No matching records".to_string();
        }
        let first = self.first_row();
        let last = first + self.rows.len() - 1;
        if self.filtered_count == self.total_count {
            format!("Showing {}–{} of {}", first, last, self.filtered_count)
        } else {
            format!(
                "Showing {}–{} of {} (filtered from {})",
                first, last, self.filtered_count, self.total_count
            )
        }
    }
}
