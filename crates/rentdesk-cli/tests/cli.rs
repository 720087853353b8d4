//! CLI integration tests against the in-memory inventory.

mod common;

use serde_json::Value;

use common::{run_cli, run_cli_success, run_cli_with_input};

#[test]
fn test_help() {
    let stdout = run_cli_success(&["--help"]);
    assert!(stdout.contains("products"));
    assert!(stdout.contains("browse"));
    assert!(stdout.contains("--api"));
}

#[test]
fn test_products_list_first_page() {
    let stdout = run_cli_success(&["products", "list"]);
    assert!(stdout.contains("Id"));
    assert!(stdout.contains("Need to repair"));
    assert!(stdout.contains("Page 1 of 10 | 95 products | 10 per page"));
}

#[test]
fn test_products_list_json() {
    let stdout = run_cli_success(&["products", "list", "--page", "3", "--page-size", "20", "--json"]);
    let view: Value = serde_json::from_str(&stdout).expect("valid JSON");

    assert_eq!(view["page_index"], 2);
    assert_eq!(view["page_count"], 5);
    assert_eq!(view["total_count"], 95);
    let rows = view["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 20);
    assert_eq!(rows[0]["record"]["id"], 41);
}

#[test]
fn test_products_list_page_past_end_is_clamped() {
    let stdout = run_cli_success(&["products", "list", "--page", "99", "--json"]);
    let view: Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(view["page_index"], 9);
    assert_eq!(view["rows"].as_array().unwrap().len(), 5);
}

#[test]
fn test_products_list_sorted() {
    let stdout = run_cli_success(&["products", "list", "--sort", "id:desc", "--json"]);
    let view: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(view["rows"][0]["record"]["id"], 10);
    assert_eq!(view["rows"][9]["record"]["id"], 1);
}

#[test]
fn test_products_list_rejects_bad_page_size() {
    let output = run_cli(&["products", "list", "--page-size", "15"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid page size 15"));
}

#[test]
fn test_estimate() {
    let stdout = run_cli_success(&[
        "estimate",
        "--rate",
        "10",
        "--from",
        "2024-01-01",
        "--to",
        "2024-01-04",
    ]);
    assert!(stdout.contains("Days: 3"));
    assert!(stdout.contains("Estimated price: 30.00"));
}

#[test]
fn test_estimate_rejects_bad_date() {
    let output = run_cli(&[
        "estimate", "--rate", "10", "--from", "2024-13-01", "--to", "2024-01-04",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_book_product_on_page() {
    let stdout = run_cli_success(&[
        "book",
        "--page",
        "2",
        "--product",
        "12",
        "--from",
        "2024-01-01",
        "--to",
        "2024-01-04",
    ]);
    assert!(stdout.contains("Booking successful (product 12)"));
}

#[test]
fn test_book_product_not_on_page() {
    let output = run_cli(&[
        "book",
        "--product",
        "12",
        "--from",
        "2024-01-01",
        "--to",
        "2024-01-04",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Product 12 is not on page 1"));
}

#[test]
fn test_book_two_products_requires_batch() {
    let args = [
        "book",
        "--product",
        "1",
        "--product",
        "2",
        "--from",
        "2024-01-01",
        "--to",
        "2024-01-02",
    ];
    let output = run_cli(&args);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("2 products selected, exactly one is required"));

    let mut batch = args.to_vec();
    batch.push("--batch");
    let stdout = run_cli_success(&batch);
    assert!(stdout.contains("Booking successful (product 1)"));
    assert!(stdout.contains("Booking successful (product 2)"));
}

#[test]
fn test_return_product() {
    let stdout = run_cli_success(&[
        "return",
        "--product",
        "3",
        "--from",
        "2024-01-01",
        "--to",
        "2024-01-04",
        "--mileage-used",
        "40",
        "--needs-repair",
    ]);
    assert!(stdout.contains("Return successful (product 3)"));
}

#[test]
fn test_unreachable_api_fails() {
    let output = run_cli(&[
        "--api",
        "http://127.0.0.1:9",
        "--timeout-secs",
        "2",
        "products",
        "list",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load products"));
}

#[test]
fn test_browse_session() {
    let input = "\
next
select 11
from 2024-01-01
to 2024-01-04
book
return 5
quit
";
    let output = run_cli_with_input(&["browse"], input);
    assert!(
        output.status.success(),
        "browse failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Page 2 of 10"));
    assert!(stdout.contains("[x] 11"));
    assert!(stdout.contains("1 selected"));
    assert!(stdout.contains("estimate"));
    assert!(stdout.contains("Booking successful (product 11)"));
    assert!(stdout.contains("Return successful (product 11)"));
}

#[test]
fn test_browse_reports_validation_gap() {
    let output = run_cli_with_input(&["browse"], "select 1\nbook\nquit\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Booking failed: validation failed: no from date chosen"));
}

#[test]
fn test_browse_filter_and_select_all() {
    let output = run_cli_with_input(&["browse"], "size 50\nall\nfilter zzzz\nall\nquit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("50 selected"));
    assert!(stdout.contains("No products."));
}
