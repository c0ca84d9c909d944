//! Period aggregation tests: filtering by year, folding, rounding, ordering.

mod common;

use energy_invoices::analytics::{aggregate, available_years, normalize, round2};
use energy_invoices::models::{Month, RawNumber};
use serde_json::json;

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

#[test]
fn normalize_defaults_absent_to_zero() {
    assert_eq!(normalize(None), 0.0);
}

#[test]
fn normalize_accepts_numbers_and_numeric_text() {
    assert_eq!(normalize(Some(&RawNumber::Number(12.5))), 12.5);
    assert_eq!(normalize(Some(&RawNumber::from("42.25"))), 42.25);
    assert_eq!(normalize(Some(&RawNumber::from("  -7 "))), -7.0);
}

#[test]
fn normalize_defaults_garbage_to_zero() {
    assert_eq!(normalize(Some(&RawNumber::from(""))), 0.0);
    assert_eq!(normalize(Some(&RawNumber::from("   "))), 0.0);
    assert_eq!(normalize(Some(&RawNumber::from("abc"))), 0.0);
    assert_eq!(normalize(Some(&RawNumber::from("NaN"))), 0.0);
    assert_eq!(normalize(Some(&RawNumber::from("inf"))), 0.0);
    assert_eq!(normalize(Some(&RawNumber::Number(f64::INFINITY))), 0.0);
}

#[test]
fn round2_is_a_fixed_point() {
    for x in [0.0, 1.005, 2.675, 123.456789, -40.125, 99.999] {
        let once = round2(x);
        assert_eq!(round2(once), once, "round2 not idempotent for {}", x);
    }
}

// ---------------------------------------------------------------------------
// aggregate
// ---------------------------------------------------------------------------

#[test]
fn end_to_end_scenario() {
    let records = common::scenario_records();
    let aggs = aggregate(&records, "2024");

    assert_eq!(aggs.len(), 2);
    assert_eq!(aggs[0].key.month, Month::Jan);
    assert_eq!(aggs[1].key.month, Month::Fev);

    let jan = &aggs[0];
    assert_eq!(jan.total_consumption_kwh, 220.0);
    assert_eq!(jan.total_compensated_kwh, 100.0);
    assert_eq!(jan.total_financial_value, 180.0);
    assert_eq!(jan.total_savings_value, 80.0);
    assert!(jan.spend_exceeds_savings);

    let fev = &aggs[1];
    assert_eq!(fev.total_consumption_kwh, 220.0);
    assert_eq!(fev.total_financial_value, 180.0);
    assert_eq!(fev.total_savings_value, 80.0);
}

#[test]
fn output_is_sorted_by_calendar_month() {
    let records = vec![
        common::full_record("UC1", "MAR/2024", 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        common::full_record("UC1", "DEZ/2024", 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        common::full_record("UC1", "JAN/2024", 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        common::full_record("UC2", "AGO/2024", 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
    ];
    let months: Vec<Month> = aggregate(&records, "2024")
        .iter()
        .map(|a| a.key.month)
        .collect();
    assert_eq!(months, vec![Month::Jan, Month::Mar, Month::Ago, Month::Dez]);
}

#[test]
fn only_selected_year_is_kept_and_keys_are_unique() {
    let records = vec![
        common::full_record("UC1", "JAN/2023", 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        common::full_record("UC1", "JAN/2024", 7.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        common::full_record("UC2", "JAN/2024", 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
    ];
    let aggs = aggregate(&records, "2024");
    assert_eq!(aggs.len(), 1);
    assert_eq!(aggs[0].key.year, "2024");
    assert_eq!(aggs[0].total_consumption_kwh, 10.0);

    let mut keys: Vec<_> = aggs.iter().map(|a| a.key.clone()).collect();
    keys.dedup();
    assert_eq!(keys.len(), aggs.len());
}

#[test]
fn unparseable_labels_are_skipped() {
    let records = vec![
        common::full_record("UC1", "JAN2024", 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        common::full_record("UC1", "XYZ/2024", 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        common::full_record("UC1", "FEV/2024", 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
    ];
    let aggs = aggregate(&records, "2024");
    assert_eq!(aggs.len(), 1);
    assert_eq!(aggs[0].key.month, Month::Fev);
    assert_eq!(aggs[0].total_consumption_kwh, 2.0);
}

#[test]
fn text_and_missing_quantities_are_normalized() {
    let records = vec![
        common::record(json!({
            "periodLabel": "ABR/2024",
            "consumerUnitName": "UC1",
            "generatedEnergyKwh": "150.5",
            "gridEnergyKwh": null,
            "compensatedEnergyKwh": "n/a",
            "gridEnergyValue": "10.10",
            "compensatedEnergyValue": "25.5",
        })),
    ];
    let aggs = aggregate(&records, "2024");
    assert_eq!(aggs.len(), 1);
    let agg = &aggs[0];
    assert_eq!(agg.total_consumption_kwh, 150.5);
    assert_eq!(agg.total_compensated_kwh, 0.0);
    assert_eq!(agg.total_financial_value, 10.1);
    assert_eq!(agg.total_savings_value, 25.5);
    assert!(!agg.spend_exceeds_savings);
}

#[test]
fn totals_are_rounded_to_two_decimals() {
    let records = vec![
        common::full_record("UC1", "MAI/2024", 0.333, 0.333, 0.0, 0.111, 0.0, 0.0, 0.0),
        common::full_record("UC1", "MAI/2024", 0.333, 0.0, 0.0, 0.111, 0.0, 0.0, 0.0),
    ];
    let agg = &aggregate(&records, "2024")[0];
    assert_eq!(agg.total_consumption_kwh, 1.0);
    assert_eq!(agg.total_financial_value, 0.22);
}

#[test]
fn negative_compensated_value_sets_flag_and_counts_absolute() {
    let records = vec![
        common::full_record("UC1", "JUN/2024", 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 30.0),
        common::full_record("UC2", "JUN/2024", 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -12.5),
    ];
    let agg = &aggregate(&records, "2024")[0];
    assert_eq!(agg.total_savings_value, 42.5);
    assert!(agg.spend_exceeds_savings);
}

#[test]
fn empty_input_yields_empty_output() {
    assert!(aggregate(&[], "2024").is_empty());
    assert!(aggregate(&common::scenario_records(), "1999").is_empty());
}

#[test]
fn available_years_are_sorted_and_distinct() {
    let records = vec![
        common::doc_record("UC1", "JAN/2024", "a"),
        common::doc_record("UC1", "JAN/2023", "b"),
        common::doc_record("UC2", "FEV/2024", "c"),
        common::doc_record("UC2", "garbage", "d"),
    ];
    assert_eq!(available_years(&records), vec!["2023", "2024"]);
}
