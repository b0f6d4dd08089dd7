//! Tests for the shape of the rendered reports.

use std::path::PathBuf;

use solscan::catalog::{Catalog, Category};
use solscan::config::RunConfig;
use solscan::{compile, report, scope};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn render_scope(descriptor: &str, config: &RunConfig, verbose: bool) -> String {
    let root = testdata_path();
    let paths = scope::resolve(descriptor, &root, config).unwrap();
    let files = compile::compile(&root, &paths).unwrap();
    let catalog = Catalog::load(config).unwrap();
    let categories = config.category_order().unwrap();
    report::assemble(&categories, &files, &catalog, verbose)
}

#[test]
fn test_summary_has_a_row_for_every_catalog_issue() {
    let config = RunConfig::default();
    let markdown = render_scope("scope.txt", &config, false);

    let catalog = Catalog::load(&config).unwrap();
    let summary = &markdown[markdown.find("## Summary").unwrap()..markdown.find("## Issues").unwrap()];
    let rows = summary.matches("\n| [").count();
    assert_eq!(rows, catalog.len());
}

#[test]
fn test_zero_count_rows_without_detail_sections() {
    // clean.sol alone trips nothing in the catalog.
    let config = RunConfig::default();
    let markdown = render_scope("clean.sol", &config, false);

    assert!(markdown.contains("| [M-1] | `tx.origin` used for authorization | 0 |"));
    assert!(markdown.contains("| [H-2] | Use of `selfdestruct` | 0 |"));
    assert!(!markdown.contains("### ["));
}

#[test]
fn test_labels_partition_by_category() {
    let config = RunConfig::default();
    let markdown = render_scope("scope.txt", &config, false);

    for label in ["H-1", "H-2", "M-1", "M-2", "L-1", "L-3", "NC-1", "NC-3", "GAS-1", "GAS-4"] {
        assert!(
            markdown.contains(&format!("| [{}] |", label)),
            "missing summary row for {}",
            label
        );
    }
}

#[test]
fn test_detail_sections_follow_category_order() {
    let config = RunConfig::default();
    let markdown = render_scope("scope.txt", &config, false);

    let high = markdown.find("### [H-1]").unwrap();
    let medium = markdown.find("### [M-1]").unwrap();
    let gas = markdown.find("### [GAS-1]").unwrap();
    assert!(high < medium);
    assert!(medium < gas);
}

#[test]
fn test_configured_category_order_is_honored() {
    let config = RunConfig {
        categories: Some(vec!["GAS".to_string(), "H".to_string()]),
        ..Default::default()
    };
    let markdown = render_scope("scope.txt", &config, false);

    let gas = markdown.find("| [GAS-1] |").unwrap();
    let high = markdown.find("| [H-1] |").unwrap();
    assert!(gas < high);
    // Categories left out of the order are left out of the report.
    assert!(!markdown.contains("| [M-1] |"));
}

#[test]
fn test_verbose_report_lists_scope_files() {
    let config = RunConfig::default();
    let markdown = render_scope("scope.txt", &config, true);

    let files_section = markdown.find("## Files analyzed").unwrap();
    let summary = markdown.find("## Summary").unwrap();
    assert!(files_section < summary);
    assert!(markdown.contains(" - vault.sol\n"));
    assert!(markdown.contains(" - token.sol\n"));
}

#[test]
fn test_instance_lines_quote_source_text() {
    let config = RunConfig::default();
    let markdown = render_scope("scope.txt", &config, false);

    assert!(markdown.contains("owner = tx.origin;"));
    assert!(markdown.contains("```solidity\nFile: vault.sol\n"));
}

#[test]
fn test_json_report_shape() {
    let config = RunConfig::default();
    let root = testdata_path();
    let paths = scope::resolve("scope.txt", &root, &config).unwrap();
    let files = compile::compile(&root, &paths).unwrap();
    let catalog = Catalog::load(&config).unwrap();
    let results = report::build(&Category::DEFAULT_ORDER, &files, &catalog);

    let json = report::render_json(&results, &files).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["files_scanned"], 3);
    assert_eq!(value["issues"].as_array().unwrap().len(), catalog.len());

    let tx_origin = value["issues"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"] == "tx-origin-auth")
        .unwrap();
    assert_eq!(tx_origin["instances"], 1);
    assert_eq!(tx_origin["findings"][0]["file"], "vault.sol");
}
