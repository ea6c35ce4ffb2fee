//! Detail projection and CSV export through the CLI.

use assert_cmd::cargo::cargo_bin_cmd;
use crawlview_testing::assertions::detail_row;
use crawlview_testing::{TestWorld, fixtures};
use predicates::prelude::*;
use serde_json::json;

const DIRECTORY: &str = "https://www.directory.gov.hk/details.jsp?dn=100";
const PRESS_1: &str = "https://www.devb.gov.hk/en/press/1.html";

fn world_with_viewer_config() -> TestWorld {
    let world = TestWorld::new().with_dataset("urls.jsonl", fixtures::SAMPLE_DATASET);
    std::fs::write(
        world.data_dir().join("viewer_config.json"),
        fixtures::SAMPLE_VIEWER_CONFIG,
    )
    .unwrap();
    world
}

#[test]
fn test_show_projects_configured_fields() {
    let world = world_with_viewer_config();
    let json = world
        .run_json(&["show", DIRECTORY, "--file", "urls.jsonl"])
        .unwrap();

    let labels: Vec<&str> = json["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        labels,
        vec![
            "URL",
            "Name",
            "Discovered",
            "Source",
            "Website",
            "Departments",
            "Telephone",
            "Email"
        ]
    );

    assert_eq!(
        detail_row(&json, "URL").unwrap(),
        &json!({"kind": "link", "href": DIRECTORY})
    );
    assert_eq!(
        detail_row(&json, "Departments").unwrap(),
        &json!({
            "kind": "lines",
            "shown": ["Development Bureau -> Works Branch"],
            "collapsed": ["Development Bureau -> Planning and Lands Branch"]
        })
    );
    assert_eq!(detail_row(&json, "Telephone").unwrap()["text"], "2848 2000");
    // Directory entries without an address still get an Email row
    assert_eq!(detail_row(&json, "Email").unwrap()["text"], "N/A");
}

#[test]
fn test_show_uses_default_fields_for_unlisted_sources() {
    let world = world_with_viewer_config();
    let json = world.run_json(&["show", PRESS_1, "--file", "urls.jsonl"]).unwrap();

    assert_eq!(detail_row(&json, "File type").unwrap()["text"], "html");
    assert!(detail_row(&json, "Email").is_err());
}

#[test]
fn test_show_collapses_department_lines() {
    let world = world_with_viewer_config();

    let mut cmd = cargo_bin_cmd!("crawlview");
    world
        .configure_command(&mut cmd)
        .args(["show", DIRECTORY, "--file", "urls.jsonl"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Development Bureau -> Works Branch"))
        .stdout(predicate::str::contains("+1 more (use --expand)"))
        .stdout(predicate::str::contains("Planning and Lands Branch").not());

    let mut cmd = cargo_bin_cmd!("crawlview");
    world
        .configure_command(&mut cmd)
        .args(["show", DIRECTORY, "--file", "urls.jsonl", "--expand"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Planning and Lands Branch"));
}

#[test]
fn test_show_without_viewer_config_has_base_rows_only() {
    let world = TestWorld::new().with_dataset("urls.jsonl", fixtures::SAMPLE_DATASET);
    let json = world
        .run_json(&["show", DIRECTORY, "--file", "urls.jsonl"])
        .unwrap();
    assert_eq!(json["rows"].as_array().unwrap().len(), 5);
}

#[test]
fn test_invalid_viewer_config_falls_back_to_defaults() {
    let world = TestWorld::new().with_dataset("urls.jsonl", fixtures::SAMPLE_DATASET);
    world
        .write_file(
            "broken_config.json",
            r#"{"defaults":{"fields":[{"label":"X","key":"x","format":"bogus"}]}}"#,
        )
        .unwrap();

    let json = world
        .run_json(&[
            "--viewer-config",
            "broken_config.json",
            "show",
            PRESS_1,
            "--file",
            "urls.jsonl",
        ])
        .unwrap();
    assert_eq!(json["rows"].as_array().unwrap().len(), 5);
}

#[test]
fn test_show_unknown_url_fails() {
    let world = TestWorld::new().with_dataset("urls.jsonl", fixtures::SAMPLE_DATASET);
    let result = world
        .run(&["show", "https://nowhere.hk/", "--file", "urls.jsonl"])
        .unwrap();
    assert!(!result.success());
    assert!(result.stderr().contains("No record with URL https://nowhere.hk/"));
}

#[test]
fn test_export_writes_every_matching_record() {
    let world = TestWorld::new().with_dataset("urls.jsonl", fixtures::SAMPLE_DATASET);
    let result = world
        .run(&[
            "export",
            "--file",
            "urls.jsonl",
            "--search",
            "works",
            "--page-size",
            "1",
            "--output",
            "out/works.csv",
        ])
        .unwrap();
    assert!(result.success(), "{}", result.stderr());
    assert!(result.stdout().contains("Exported 2 record(s)"));

    // Paging does not limit the export
    let csv = world.read_file("out/works.csv").unwrap();
    insta::assert_snapshot!(csv, @r#"
url,name,discovered_at_utc,source,domain,discovered_from,file_ext,date,post_title,office_tel,email,department_paths,meta
https://www.devb.gov.hk/en/press/1.html,"Works Update, January",2024-01-03T08:00:00Z,devb_press_releases,www.devb.gov.hk,,html,2024-01-03,,,,,
https://www.devb.gov.hk/en/press/2.html,Works Tender,2024-01-01T08:00:00Z,devb_press_releases,www.devb.gov.hk,,,,,,,,
"#);
}

#[test]
fn test_export_to_directory_uses_dated_name() {
    let world = TestWorld::new().with_dataset("urls.jsonl", fixtures::SAMPLE_DATASET);
    let json = world
        .run_json(&["export", "--file", "urls.jsonl", "--out", "exports"])
        .unwrap();

    assert_eq!(json["rows"], 5);
    let path = std::path::PathBuf::from(json["path"].as_str().unwrap());
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("crawl-urls-"), "{}", name);
    assert!(world.root().join(&path).exists());
}

#[test]
fn test_export_with_no_matches_writes_nothing() {
    let world = TestWorld::new().with_dataset("urls.jsonl", fixtures::SAMPLE_DATASET);
    let result = world
        .run(&[
            "export",
            "--file",
            "urls.jsonl",
            "--source",
            "nothing",
            "--output",
            "empty.csv",
        ])
        .unwrap();

    assert!(!result.success());
    assert!(
        result
            .stderr()
            .contains("Error: No records match the current filters; nothing to export")
    );
    assert!(!world.path("empty.csv").exists());
}

#[test]
fn test_export_of_empty_dataset_is_refused() {
    let world = TestWorld::new().with_dataset("empty.jsonl", "\n\n");
    let result = world
        .run(&["export", "--file", "empty.jsonl", "--output", "x.csv"])
        .unwrap();
    assert!(!result.success());
    assert!(result.stderr().contains("No records loaded; nothing to export"));
}
