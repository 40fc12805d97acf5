//! End-to-end pipeline tests: load → classify → project → render

mod common;

use calamine::Reader;
use common::*;
use orderbook_report::excel::CHART_SHEET;
use orderbook_report::{process, Category, ReportConfig, ReportError};
use pretty_assertions::assert_eq;

#[test]
fn test_overdue_row_from_prior_year() {
    let bytes = order_book_bytes(&[(
        "Sheet1",
        vec![row("ENG-100", "Acme", Some(500.0), date(2024, 1, 1))],
    )]);
    let as_of = date(2025, 6, 1);

    let output = process(bytes, &ReportConfig::new(as_of)).unwrap();

    let eng = &output.categories[&Category::Eng];
    assert_eq!(eng.len(), 1);
    assert!(eng[0].is_overdue(as_of));

    let projection = &output.projections[&Category::Eng];
    assert_eq!(projection.rows.len(), 12);
    assert!(projection.rows.iter().all(|r| r.total == 0.0));
    assert_eq!(projection.rows[0].label, "Jan - 2025");
}

#[test]
fn test_unmatched_items_never_reach_a_category() {
    let bytes = order_book_bytes(&[(
        "Sheet1",
        vec![
            row("XYZ1", "Acme", Some(10.0), date(2025, 1, 1)),
            row("NRE-7", "Acme", Some(20.0), date(2025, 1, 1)),
        ],
    )]);

    let output = process(bytes, &ReportConfig::new(date(2025, 6, 1))).unwrap();

    assert_eq!(output.combined.len(), 2);
    assert_eq!(output.categories.len(), 1);
    for lines in output.categories.values() {
        assert!(lines.iter().all(|l| l.item_code() != "XYZ1"));
    }
}

#[test]
fn test_sheets_concatenate_in_order() {
    let bytes = order_book_bytes(&[
        (
            "January",
            vec![
                row("999-A", "Acme", Some(1.0), date(2025, 1, 1)),
                row("999-B", "Acme", Some(2.0), date(2025, 1, 1)),
            ],
        ),
        (
            "February",
            vec![row("999-C", "Acme", Some(3.0), date(2025, 2, 1))],
        ),
    ]);

    let output = process(bytes, &ReportConfig::new(date(2025, 6, 1))).unwrap();

    let items: Vec<String> = output.combined.iter().map(|l| l.item_code()).collect();
    assert_eq!(items, vec!["999-A", "999-B", "999-C"]);
    let category: Vec<String> = output.categories[&Category::Code999]
        .iter()
        .map(|l| l.item_code())
        .collect();
    assert_eq!(category, items);
}

#[test]
fn test_projection_total_matches_current_year_rows() {
    let rows = vec![
        row("NRE-1", "Acme", Some(100.0), date(2025, 3, 10)),
        row("NRE-2", "Acme", Some(250.5), date(2025, 3, 31)),
        row("NRE-3", "Acme", None, date(2025, 4, 1)),
        row("NRE-4", "Acme", Some(75.0), date(2025, 12, 31)),
        row("NRE-5", "Acme", Some(9999.0), date(2024, 12, 31)),
        row("NRE-6", "Acme", Some(9999.0), date(2026, 1, 1)),
    ];
    let bytes = order_book_bytes(&[("Sheet1", rows)]);

    let output = process(bytes, &ReportConfig::new(date(2025, 6, 1))).unwrap();
    let projection = &output.projections[&Category::Nre];

    assert_eq!(projection.grand_total(), 425.5);
    assert_eq!(projection.rows[2].total, 350.5);
    assert_eq!(projection.rows[3].total, 0.0);
    assert_eq!(projection.rows[11].total, 75.0);
}

#[test]
fn test_rerun_is_deterministic() {
    let bytes = order_book_bytes(&[(
        "Sheet1",
        vec![
            row("ENG-1", "Acme", Some(10.0), date(2025, 5, 1)),
            row("999-1", "Globex", Some(20.0), date(2025, 7, 1)),
            row("NRE-1", "Initech", Some(30.0), date(2025, 8, 1)),
        ],
    )]);
    let config = ReportConfig::new(date(2025, 6, 1));

    let first = process(bytes.clone(), &config).unwrap();
    let second = process(bytes, &config).unwrap();

    assert_eq!(first.combined, second.combined);
    assert_eq!(first.categories, second.categories);
    assert_eq!(first.projections, second.projections);
}

#[test]
fn test_no_matching_rows_is_empty_result() {
    let bytes = order_book_bytes(&[(
        "Sheet1",
        vec![row("XYZ1", "Acme", Some(10.0), date(2025, 1, 1))],
    )]);

    let result = process(bytes, &ReportConfig::new(date(2025, 6, 1)));
    assert!(matches!(result, Err(ReportError::EmptyResult)));
}

#[test]
fn test_rendered_sheet_order() {
    let bytes = order_book_bytes(&[(
        "Sheet1",
        vec![
            row("NRE-1", "Acme", Some(1.0), date(2025, 1, 1)),
            row("ENG-1", "Acme", Some(1.0), date(2025, 1, 1)),
            row("999-1", "Acme", Some(1.0), date(2025, 1, 1)),
        ],
    )]);

    let output = process(bytes, &ReportConfig::new(date(2025, 6, 1))).unwrap();
    let report = open_report(&output.document);

    assert_eq!(
        report.sheet_names(),
        vec![
            "999_Data",
            "999_Projection",
            "ENG_Data",
            "ENG_Projection",
            "NRE_Data",
            "NRE_Projection",
            CHART_SHEET,
        ]
    );
}

#[test]
fn test_chart_sheet_can_be_disabled() {
    let bytes = order_book_bytes(&[(
        "Sheet1",
        vec![row("ENG-1", "Acme", Some(1.0), date(2025, 1, 1))],
    )]);
    let config = ReportConfig::new(date(2025, 6, 1)).with_charts(false);

    let output = process(bytes, &config).unwrap();
    let report = open_report(&output.document);

    assert_eq!(report.sheet_names(), vec!["ENG_Data", "ENG_Projection"]);
}

#[test]
fn test_chart_sheet_skipped_without_eng() {
    let bytes = order_book_bytes(&[(
        "Sheet1",
        vec![row("NRE-1", "Acme", Some(1.0), date(2025, 1, 1))],
    )]);

    let output = process(bytes, &ReportConfig::new(date(2025, 6, 1))).unwrap();
    let report = open_report(&output.document);

    assert_eq!(report.sheet_names(), vec!["NRE_Data", "NRE_Projection"]);
}
