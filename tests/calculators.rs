//! Calculator endpoints over HTTP.

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

use common::spawn_server;

#[tokio::test]
async fn test_payment_with_schedule() {
    let server = spawn_server(|_| {}).await;

    let res = server
        .client
        .post(server.url("/api/calculators/payment"))
        .json(&json!({
            "principal": 100000,
            "annualRate": 6,
            "amortizationYears": 25,
            "includeSchedule": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["payment"], 639.81);
    assert_eq!(body["periodsPerYear"], 12);
    let schedule = body["schedule"].as_array().unwrap();
    assert_eq!(schedule.len(), 25);
    assert_eq!(schedule[24]["endingBalance"], 0.0);
}

#[tokio::test]
async fn test_accelerated_payment_pays_off_sooner() {
    let server = spawn_server(|_| {}).await;

    let body: Value = server
        .client
        .post(server.url("/api/calculators/payment"))
        .json(&json!({
            "principal": 100000,
            "annualRate": 6,
            "amortizationYears": 25,
            "frequency": "accelerated_bi_weekly"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["periodsPerYear"], 26);
    assert!(body["payoffYears"].as_f64().unwrap() < 25.0);
    assert!(body.get("schedule").is_none());
}

#[tokio::test]
async fn test_payment_rejects_bad_terms() {
    let server = spawn_server(|_| {}).await;

    let res = server
        .client
        .post(server.url("/api/calculators/payment"))
        .json(&json!({ "principal": -5, "annualRate": 6, "amortizationYears": 25 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_down_payment_defaults_to_minimum() {
    let server = spawn_server(|_| {}).await;

    let body: Value = server
        .client
        .post(server.url("/api/calculators/down-payment"))
        .json(&json!({ "purchasePrice": 600000 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["minimumDownPayment"], 35000.0);
    assert_eq!(body["downPayment"], 35000.0);
    assert_eq!(body["loanAmount"], 565000.0);
    assert_eq!(body["insuranceRate"], 4.0);
    assert_eq!(body["insurancePremium"], 22600.0);
    assert_eq!(body["totalMortgage"], 587600.0);
}

#[tokio::test]
async fn test_down_payment_below_minimum() {
    let server = spawn_server(|_| {}).await;

    let res = server
        .client
        .post(server.url("/api/calculators/down-payment"))
        .json(&json!({ "purchasePrice": 600000, "downPayment": 20000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "down payment must be at least 35000.00");
}

#[tokio::test]
async fn test_affordability_uses_stress_test_rate() {
    let server = spawn_server(|_| {}).await;

    let body: Value = server
        .client
        .post(server.url("/api/calculators/affordability"))
        .json(&json!({
            "annualIncome": 120000,
            "monthlyDebts": 500,
            "monthlyPropertyTax": 350,
            "monthlyHeating": 120,
            "downPayment": 100000,
            "annualRate": 4.0,
            "amortizationYears": 25
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["qualifyingRate"], 6.0);
    let max_mortgage = body["maxMortgage"].as_f64().unwrap();
    assert!(max_mortgage > 0.0);
    assert!(body["maxPurchasePrice"].as_f64().unwrap() > max_mortgage);
    assert!(body["gdsRatio"].as_f64().unwrap() <= 39.01);
    assert!(body["tdsRatio"].as_f64().unwrap() <= 44.01);
}

#[tokio::test]
async fn test_calculators_reject_missing_fields() {
    let server = spawn_server(|_| {}).await;

    let res = server
        .client
        .post(server.url("/api/calculators/affordability"))
        .json(&json!({ "annualRate": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
