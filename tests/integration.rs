//! Integration tests for the PIAWE engine.
//!
//! This test suite drives the engine through both the library entry point
//! and the HTTP router:
//! - Empty and short payslip histories
//! - Standard 52-week averaging
//! - Jurisdiction fallbacks and capping
//! - Adjustment ordering
//! - Validation findings
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use piawe_engine::api::{AppState, create_router};
use piawe_engine::calculation::calculate_piawe;
use piawe_engine::config::ConfigLoader;
use piawe_engine::models::{IssueType, PayslipEntry, Severity};

// =============================================================================
// Test Helpers
// =============================================================================

fn create_router_for_test() -> Router {
    create_router(AppState::builtin())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn post_calculate(router: Router, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/piawe/calculate")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Builds `weeks` consecutive weekly payslips, the first ending on `first_week_ending`.
fn create_history(
    first_week_ending: &str,
    weeks: u64,
    ordinary_hours: &str,
    ordinary_rate: &str,
) -> Vec<PayslipEntry> {
    let first = date(first_week_ending);
    (0..weeks)
        .map(|i| {
            let gross = decimal(ordinary_hours) * decimal(ordinary_rate);
            PayslipEntry {
                id: format!("ps_{:03}", i + 1),
                week_ending: first + Days::new(7 * i),
                ordinary_hours: decimal(ordinary_hours),
                ordinary_rate: decimal(ordinary_rate),
                overtime_hours: Decimal::ZERO,
                overtime_rate: Decimal::ZERO,
                allowances: Decimal::ZERO,
                bonuses: Decimal::ZERO,
                commissions: Decimal::ZERO,
                other_income: Decimal::ZERO,
                total_gross: gross,
                unpaid_leave: false,
            }
        })
        .collect()
}

fn create_request(payslips: &[PayslipEntry], injury_date: &str, jurisdiction: &str) -> Value {
    json!({
        "payslips": payslips,
        "injury_date": injury_date,
        "jurisdiction": jurisdiction,
    })
}

fn create_adjustment(adjustment_type: &str, amount: &str) -> Value {
    json!({
        "type": adjustment_type,
        "amount": amount,
        "description": format!("{} adjustment", adjustment_type),
        "applied_date": "2024-08-10",
    })
}

fn assert_decimal_eq(actual: &Value, expected: &str) {
    let actual = decimal(actual.as_str().unwrap());
    assert_eq!(
        actual.normalize(),
        decimal(expected).normalize(),
        "Expected {}, got {}",
        expected,
        actual
    );
}

fn has_issue(result: &Value, issue_type: &str) -> bool {
    result["validation_issues"]
        .as_array()
        .unwrap()
        .iter()
        .any(|issue| issue["type"] == issue_type)
}

/// Strips the fields that differ between otherwise identical calculations.
fn without_generated_fields(mut result: Value) -> Value {
    let object = result.as_object_mut().unwrap();
    object.remove("id");
    object.remove("created_at");
    object.remove("updated_at");
    result
}

// =============================================================================
// SECTION 1: Boundary Scenarios
// =============================================================================

#[tokio::test]
async fn test_empty_payslips_nsw() {
    let router = create_router_for_test();
    let (status, result) = post_calculate(router, create_request(&[], "2024-01-15", "NSW")).await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal_eq(&result["final_piawe"], "0");
    assert!(result["method_used"].as_str().unwrap().contains("insufficient data"));
    assert!(has_issue(&result, "insufficient-data"));
    assert_eq!(result["period_52_week"]["included_weeks"], 0);
}

#[test]
fn test_empty_payslips_library_entry_point() {
    let calculation = calculate_piawe(&[], "2024-01-15", "NSW", &[]).unwrap();

    assert_eq!(calculation.final_piawe, Decimal::ZERO);
    assert!(calculation.method_used.contains("insufficient data"));
    assert!(
        calculation
            .validation_issues
            .iter()
            .any(|issue| issue.issue_type == IssueType::InsufficientData)
    );
}

// =============================================================================
// SECTION 2: Standard Averaging
// =============================================================================

#[tokio::test]
async fn test_nsw_thirty_uniform_weeks() {
    // 30 weeks of 38h @ $28.50; injury 30 weeks after the first entry.
    let payslips = create_history("2024-01-07", 30, "38", "28.50");
    let injury = (date("2024-01-07") + Days::new(7 * 30)).to_string();

    let (status, result) =
        post_calculate(create_router_for_test(), create_request(&payslips, &injury, "NSW")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["period_52_week"]["included_weeks"], 30);
    assert_decimal_eq(&result["final_piawe"], "1083.00");
    assert_eq!(result["method_used"], "52-week average (NSW standard)");
    assert!(!has_issue(&result, "insufficient-data"));
}

#[tokio::test]
async fn test_nsw_thirteen_week_fallback() {
    // Ten weeks before injury: below 26, above the 4-week fallback.
    let payslips = create_history("2024-05-05", 10, "38", "30.00");
    let (_, result) = post_calculate(
        create_router_for_test(),
        create_request(&payslips, "2024-07-15", "NSW"),
    )
    .await;

    assert_eq!(result["method_used"], "13-week average (NSW fallback)");
    assert_decimal_eq(&result["final_piawe"], "1140.00");
    assert!(has_issue(&result, "insufficient-data"));
}

#[tokio::test]
async fn test_unpaid_leave_excluded_from_average() {
    let mut payslips = create_history("2024-01-07", 30, "38", "30.00");
    for payslip in payslips.iter_mut().skip(10).take(4) {
        payslip.unpaid_leave = true;
        payslip.ordinary_hours = Decimal::ZERO;
        payslip.total_gross = Decimal::ZERO;
    }
    let injury = (date("2024-01-07") + Days::new(7 * 30)).to_string();

    let (_, result) =
        post_calculate(create_router_for_test(), create_request(&payslips, &injury, "QLD")).await;

    assert_eq!(result["period_52_week"]["included_weeks"], 26);
    assert_eq!(result["period_52_week"]["excluded_weeks"], 4);
    assert_decimal_eq(&result["final_piawe"], "1140.00");
}

// =============================================================================
// SECTION 3: Capping and Adjustments
// =============================================================================

#[tokio::test]
async fn test_vic_cap_applied() {
    // 40h @ $75.00 averages $3000/week.
    let payslips = create_history("2024-01-07", 30, "40", "75.00");
    let injury = (date("2024-01-07") + Days::new(7 * 30)).to_string();

    let (_, result) =
        post_calculate(create_router_for_test(), create_request(&payslips, &injury, "VIC")).await;

    assert_decimal_eq(&result["period_52_week"]["average_weekly"], "3000");
    assert_decimal_eq(&result["final_piawe"], "2400");
}

#[tokio::test]
async fn test_qld_is_uncapped() {
    let payslips = create_history("2024-01-07", 30, "40", "75.00");
    let injury = (date("2024-01-07") + Days::new(7 * 30)).to_string();

    let (_, result) =
        post_calculate(create_router_for_test(), create_request(&payslips, &injury, "QLD")).await;

    assert_decimal_eq(&result["final_piawe"], "3000");
}

#[tokio::test]
async fn test_manual_override_discards_earlier_adjustments() {
    let payslips = create_history("2024-01-07", 30, "38", "30.00");
    let injury = (date("2024-01-07") + Days::new(7 * 30)).to_string();
    let mut request = create_request(&payslips, &injury, "SA");
    request["adjustments"] = json!([
        create_adjustment("base-rate-increase", "40.00"),
        create_adjustment("industrial-agreement", "15.00"),
        create_adjustment("manual-override", "1250.00"),
        create_adjustment("jurisdiction-rule", "-25.00"),
    ]);

    let (status, result) = post_calculate(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal_eq(&result["final_piawe"], "1225.00");
    assert_eq!(result["adjustments"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_adjustments_apply_after_cap() {
    let payslips = create_history("2024-01-07", 30, "40", "75.00");
    let injury = (date("2024-01-07") + Days::new(7 * 30)).to_string();
    let mut request = create_request(&payslips, &injury, "VIC");
    request["adjustments"] = json!([create_adjustment("base-rate-increase", "50")]);

    let (_, result) = post_calculate(create_router_for_test(), request).await;

    assert_decimal_eq(&result["final_piawe"], "2450");
}

// =============================================================================
// SECTION 4: Validation Findings
// =============================================================================

#[tokio::test]
async fn test_wa_outlier_week_flags_fluctuation() {
    let mut payslips = create_history("2024-04-07", 11, "38", "30.00");
    payslips[5].ordinary_rate = decimal("90.00");
    payslips[5].total_gross = decimal("3420.00");

    let (_, result) = post_calculate(
        create_router_for_test(),
        create_request(&payslips, "2024-06-24", "WA"),
    )
    .await;

    assert!(has_issue(&result, "extreme-fluctuation"));
    let flagged = result["validation_issues"]
        .as_array()
        .unwrap()
        .iter()
        .find(|issue| issue["type"] == "extreme-fluctuation")
        .unwrap();
    assert_eq!(flagged["week_ending"], payslips[5].week_ending.to_string());
    assert_eq!(flagged["severity"], "warning");
}

#[test]
fn test_superannuation_in_gross_is_an_error() {
    let mut payslips = create_history("2024-01-07", 30, "38", "30.00");
    // 11.5% super folded into gross.
    payslips[3].total_gross = decimal("1271.10");
    let injury = (date("2024-01-07") + Days::new(7 * 30)).to_string();

    let calculation = calculate_piawe(&payslips, &injury, "TAS", &[]).unwrap();

    assert!(calculation.has_errors());
    let issue = calculation
        .validation_issues
        .iter()
        .find(|issue| issue.issue_type == IssueType::InconsistentRates)
        .unwrap();
    assert_eq!(issue.severity, Severity::Error);
    assert_eq!(issue.week_ending, Some(payslips[3].week_ending));
    // Findings never stop the calculation.
    assert!(calculation.final_piawe > Decimal::ZERO);
}

#[test]
fn test_missing_weeks_flagged() {
    let mut payslips = create_history("2024-01-07", 30, "38", "30.00");
    payslips.remove(12);
    let injury = (date("2024-01-07") + Days::new(7 * 30)).to_string();

    let calculation = calculate_piawe(&payslips, &injury, "ACT", &[]).unwrap();

    let gap = calculation
        .validation_issues
        .iter()
        .find(|issue| issue.issue_type == IssueType::MissingWeeks)
        .unwrap();
    assert_eq!(gap.week_ending, Some(payslips[11].week_ending));
}

// =============================================================================
// SECTION 5: Determinism and Ordering
// =============================================================================

#[tokio::test]
async fn test_identical_requests_produce_identical_results() {
    let payslips = create_history("2024-01-07", 20, "38", "31.20");
    let request = create_request(&payslips, "2024-06-10", "VIC");

    let (_, first) = post_calculate(create_router_for_test(), request.clone()).await;
    let (_, second) = post_calculate(create_router_for_test(), request).await;

    assert_ne!(first["id"], second["id"]);
    assert_eq!(without_generated_fields(first), without_generated_fields(second));
}

#[test]
fn test_input_order_does_not_change_result() {
    let mut payslips = create_history("2024-01-07", 30, "38", "30.00");
    for (i, payslip) in payslips.iter_mut().enumerate() {
        payslip.overtime_hours = if i % 2 == 0 { decimal("3") } else { Decimal::ZERO };
        payslip.overtime_rate = decimal("45.00");
        payslip.total_gross = payslip.component_total();
    }
    let injury = (date("2024-01-07") + Days::new(7 * 30)).to_string();

    let forward = calculate_piawe(&payslips, &injury, "NSW", &[]).unwrap();
    let mut reversed_input = payslips.clone();
    reversed_input.reverse();
    let reversed = calculate_piawe(&reversed_input, &injury, "NSW", &[]).unwrap();

    assert_eq!(forward.period_52_week, reversed.period_52_week);
    assert_eq!(forward.period_13_week, reversed.period_13_week);
    assert_eq!(forward.final_piawe, reversed.final_piawe);
    assert_eq!(forward.validation_issues, reversed.validation_issues);
}

// =============================================================================
// SECTION 6: Configuration and Errors
// =============================================================================

#[tokio::test]
async fn test_router_with_loaded_rule_table() {
    let loader = ConfigLoader::load("./config/jurisdictions.yaml").expect("Failed to load config");
    let router = create_router(AppState::new(loader.into_table()));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/jurisdictions/NSW")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let rules: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(rules["minimum_weeks_required"], 26);
    assert_eq!(rules["alternative_reference_periods"], json!([13]));
}

#[tokio::test]
async fn test_negative_payslip_rejected() {
    let mut payslips = create_history("2024-01-07", 3, "38", "30.00");
    payslips[2].allowances = decimal("-12.00");

    let (status, result) = post_calculate(
        create_router_for_test(),
        create_request(&payslips, "2024-02-01", "NT"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_PAYSLIP");
    assert!(result["message"].as_str().unwrap().contains("allowances"));
}

#[tokio::test]
async fn test_lowercase_jurisdiction_accepted() {
    let (status, result) =
        post_calculate(create_router_for_test(), create_request(&[], "2024-01-15", "act")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["jurisdiction"], "ACT");
}

#[tokio::test]
async fn test_local_date_time_injury_date_accepted() {
    let payslips = create_history("2024-01-07", 30, "38", "28.50");
    let (status, result) = post_calculate(
        create_router_for_test(),
        create_request(&payslips, "2024-08-04T09:30:00", "NSW"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["injury_date"], "2024-08-04");
}

#[tokio::test]
async fn test_extreme_single_week_returns_result() {
    let mut payslips = create_history("2024-01-07", 2, "38", "28.50");
    payslips[0].ordinary_hours = decimal("1");
    payslips[0].ordinary_rate = decimal("1000000000000000");
    payslips[0].total_gross = decimal("1000000000000000");

    let (status, result) = post_calculate(
        create_router_for_test(),
        create_request(&payslips, "2024-01-22", "WA"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal_eq(&result["period_52_week"]["fluctuation"], "1");
    assert!(has_issue(&result, "extreme-fluctuation"));
}
