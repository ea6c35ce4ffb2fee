use crawlview_runtime::{ArchiveResolver, DatasetLocation, MemoryFetcher, NO_ARCHIVES_STATUS};
use crawlview_types::ArchiveEntry;
use serde_json::json;
use std::sync::Arc;
use url::Url;

fn location() -> DatasetLocation {
    DatasetLocation::with_defaults("hkgov-crawl/url-index".parse().unwrap()).unwrap()
}

fn api(path: &str) -> Url {
    Url::parse(&format!(
        "https://api.github.com/repos/hkgov-crawl/url-index/{}",
        path
    ))
    .unwrap()
}

fn serve_tree(fetcher: &MemoryFetcher, tree: serde_json::Value) {
    fetcher.insert_json(&api("git/ref/heads/data"), json!({"object": {"sha": "c0ffee"}}));
    fetcher.insert_json(&api("git/commits/c0ffee"), json!({"tree": {"sha": "7ree"}}));
    fetcher.insert_json(&api("git/trees/7ree?recursive=1"), json!({ "tree": tree }));
}

#[tokio::test]
async fn test_missing_index_falls_back_to_tree_walk() {
    let fetcher = Arc::new(MemoryFetcher::new());
    serve_tree(
        &fetcher,
        json!([
            {"path": "archive", "type": "tree"},
            {"path": "archive/2024/01/02/urls.jsonl", "type": "blob", "size": 321}
        ]),
    );

    let loc = location();
    let resolver = ArchiveResolver::for_location(fetcher.clone(), &loc);
    let listing = resolver.resolve().await;

    assert_eq!(listing.tier, Some("tree"));
    assert_eq!(
        listing.entries,
        vec![ArchiveEntry::new(
            "2024-01-02",
            "archive/2024/01/02/urls.jsonl",
            Some(321)
        )]
    );
    assert!(listing.status.is_none());

    let requests = fetcher.requests();
    assert_eq!(requests[0], loc.archive_index_url().unwrap().as_str());
    assert_eq!(requests.len(), 4);
    assert_eq!(
        loc.archive_url(&listing.entries[0]).unwrap().as_str(),
        "https://raw.githubusercontent.com/hkgov-crawl/url-index/data/archive/2024/01/02/urls.jsonl"
    );
}

#[tokio::test]
async fn test_tree_walk_ignores_nested_dataset_roots() {
    let fetcher = Arc::new(MemoryFetcher::new());
    serve_tree(
        &fetcher,
        json!([
            {"path": "data/archive/2024/01/02/urls.jsonl", "type": "blob", "size": 321},
            {"path": "archive/2024/01/05/urls.jsonl", "type": "blob", "size": 99}
        ]),
    );

    let loc = location();
    let listing = ArchiveResolver::for_location(fetcher.clone(), &loc)
        .resolve()
        .await;

    assert_eq!(listing.tier, Some("tree"));
    assert_eq!(
        listing.entries,
        vec![ArchiveEntry::new(
            "2024-01-05",
            "archive/2024/01/05/urls.jsonl",
            Some(99)
        )]
    );
    assert_eq!(
        loc.archive_url(&listing.entries[0]).unwrap().as_str(),
        "https://raw.githubusercontent.com/hkgov-crawl/url-index/data/archive/2024/01/05/urls.jsonl"
    );
}

#[tokio::test]
async fn test_index_is_retried_on_every_resolution() {
    let fetcher = Arc::new(MemoryFetcher::new());
    serve_tree(&fetcher, json!([]));
    let loc = location();
    let resolver = ArchiveResolver::for_location(fetcher.clone(), &loc);

    let first = resolver.resolve().await;
    assert_eq!(first.tier, Some("tree"));
    assert!(first.is_empty());

    // The publisher writes the index later; the next resolution prefers it
    fetcher.insert_json(
        &loc.archive_index_url().unwrap(),
        json!({"archives": [
            {"date": "2024-01-01", "path": "data/archive/2024/01/01/urls.jsonl", "bytes": 10},
            {"date": "2024-01-03", "path": "data/archive/2024/01/03/urls.jsonl", "bytes": 30}
        ]}),
    );
    let second = resolver.resolve().await;
    assert_eq!(second.tier, Some("index"));
    let dates: Vec<&str> = second.entries.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-01-03", "2024-01-01"]);
}

#[tokio::test]
async fn test_malformed_index_falls_back() {
    let fetcher = Arc::new(MemoryFetcher::new());
    let loc = location();
    fetcher.insert_json(&loc.archive_index_url().unwrap(), json!({"unexpected": true}));
    serve_tree(
        &fetcher,
        json!([{"path": "archive/2023/12/31/urls.jsonl", "type": "blob"}]),
    );

    let listing = ArchiveResolver::for_location(fetcher.clone(), &loc)
        .resolve()
        .await;
    assert_eq!(listing.tier, Some("tree"));
    assert_eq!(listing.entries[0].date, "2023-12-31");
    assert_eq!(listing.entries[0].bytes, None);
}

#[tokio::test]
async fn test_both_tiers_failing_yields_empty_listing() {
    let fetcher = Arc::new(MemoryFetcher::new());
    let loc = location();
    fetcher.insert_status(&loc.archive_index_url().unwrap(), 500);
    fetcher.insert_status(&api("git/ref/heads/data"), 403);

    let listing = ArchiveResolver::for_location(fetcher.clone(), &loc)
        .resolve()
        .await;
    assert!(listing.is_empty());
    assert_eq!(listing.tier, None);
    assert_eq!(listing.status.as_deref(), Some(NO_ARCHIVES_STATUS));
}
