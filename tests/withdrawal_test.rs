mod common;

use common::{error_code, future_date, spawn_app};
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

async fn fund_chef(app: &common::TestApp, chef: Uuid, start_time: &str, hours: i32) {
    let customer = Uuid::new_v4();
    let response = app
        .create_booking(customer, chef, &future_date(30), start_time, hours)
        .await;
    let booking: Value = response.json().await.unwrap();
    let booking_id = booking["id"].as_str().unwrap().to_string();
    app.transition(chef, &booking_id, "accept").await;
    let complete = app.transition(chef, &booking_id, "complete").await;
    assert_eq!(complete.status(), StatusCode::OK);
}

async fn add_paypal(app: &common::TestApp, chef: Uuid) -> String {
    let response = app
        .client
        .post(format!("{}/chefs/{}/payout-methods", app.base_url, chef))
        .header("X-Actor-Id", chef.to_string())
        .json(&json!({
            "method": { "type": "paypal", "email": "chef@example.com" },
            "country": "US",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn withdraw(
    app: &common::TestApp,
    chef: Uuid,
    amount: &str,
    method_id: &str,
) -> reqwest::Response {
    app.client
        .post(format!("{}/chefs/{}/withdrawals", app.base_url, chef))
        .header("X-Actor-Id", chef.to_string())
        .json(&json!({ "amount": amount, "payout_method_id": method_id }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn withdrawal_requires_a_saved_payout_method() {
    let app = spawn_app().await;
    let chef = app.create_chef("Chef Ada", "100.00").await;
    fund_chef(&app, chef, "18:00:00", 2).await;

    let response = withdraw(&app, chef, "50.00", &Uuid::new_v4().to_string()).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(response).await, "no_payout_method");
    assert_eq!(app.chef_balance(chef).await, 200.0);
}

#[tokio::test]
async fn overdraw_fails_and_leaves_balance_untouched() {
    let app = spawn_app().await;
    let chef = app.create_chef("Chef Ada", "250.00").await;
    fund_chef(&app, chef, "18:00:00", 2).await; // balance 500
    let method = add_paypal(&app, chef).await;

    let response = withdraw(&app, chef, "600.00", &method).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(response).await, "insufficient_funds");
    assert_eq!(app.chef_balance(chef).await, 500.0);
}

#[tokio::test]
async fn balance_conservation_across_completions_and_withdrawals() {
    let app = spawn_app().await;
    let chef = app.create_chef("Chef Ada", "100.00").await;
    let method = add_paypal(&app, chef).await;

    // Two completions: 200 + 300
    fund_chef(&app, chef, "12:00:00", 2).await;
    fund_chef(&app, chef, "18:00:00", 3).await;
    assert_eq!(app.chef_balance(chef).await, 500.0);

    // Two withdrawals: 150 + 250
    let first = withdraw(&app, chef, "150.00", &method).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = withdraw(&app, chef, "250.00", &method).await;
    assert_eq!(second.status(), StatusCode::CREATED);

    assert_eq!(app.chef_balance(chef).await, 100.0);

    let withdrawals: Vec<Value> = app
        .client
        .get(format!("{}/chefs/{}/withdrawals", app.base_url, chef))
        .header("X-Actor-Id", chef.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(withdrawals.len(), 2);
    for withdrawal in &withdrawals {
        assert_eq!(withdrawal["status"], "processing");
    }

    let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM withdrawals WHERE chef_id = $1")
        .bind(chef)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(recorded, 2);
}

#[tokio::test]
async fn withdrawal_amount_must_be_positive() {
    let app = spawn_app().await;
    let chef = app.create_chef("Chef Ada", "100.00").await;
    let method = add_paypal(&app, chef).await;

    let zero = withdraw(&app, chef, "0.00", &method).await;
    assert_eq!(zero.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(zero).await, "validation");

    let negative = withdraw(&app, chef, "-25.00", &method).await;
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cannot_withdraw_through_another_chefs_method() {
    let app = spawn_app().await;
    let chef = app.create_chef("Chef Ada", "100.00").await;
    let other_chef = app.create_chef("Chef Brillat", "100.00").await;
    fund_chef(&app, chef, "18:00:00", 2).await;
    add_paypal(&app, chef).await;
    let foreign_method = add_paypal(&app, other_chef).await;

    let response = withdraw(&app, chef, "50.00", &foreign_method).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(response).await, "no_payout_method");
}

#[tokio::test]
async fn payout_management_is_chef_only() {
    let app = spawn_app().await;
    let chef = app.create_chef("Chef Ada", "100.00").await;
    let stranger = Uuid::new_v4();

    let response = app
        .client
        .post(format!("{}/chefs/{}/payout-methods", app.base_url, chef))
        .header("X-Actor-Id", stranger.to_string())
        .json(&json!({
            "method": { "type": "paypal", "email": "stranger@example.com" },
            "country": "US",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn saved_methods_round_trip_their_variant() {
    let app = spawn_app().await;
    let chef = app.create_chef("Chef Ada", "100.00").await;

    let response = app
        .client
        .post(format!("{}/chefs/{}/payout-methods", app.base_url, chef))
        .header("X-Actor-Id", chef.to_string())
        .json(&json!({
            "method": {
                "type": "bank_transfer",
                "account_number": "000123456789",
                "routing_number": "110000000",
                "account_name": "Ada Lovelace",
            },
            "country": "UK",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let methods: Vec<Value> = app
        .client
        .get(format!("{}/chefs/{}/payout-methods", app.base_url, chef))
        .header("X-Actor-Id", chef.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0]["method"]["type"], "bank_transfer");
    assert_eq!(methods[0]["method"]["account_name"], "Ada Lovelace");
}
