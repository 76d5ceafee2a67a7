/// Tests against a real Postgres.
///
/// Run with `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.
/// Every test drops and recreates the public schema, so never point this at
/// a database you care about.
mod common;

use admin_api::db::Database;
use axum::http::StatusCode;
use axum_test::TestServer;
use common::{authed, server_with};
use serde_json::{json, Value};
use serial_test::serial;
use sqlx::{postgres::PgPoolOptions, Executor};

const SCHEMA: &str = include_str!("fixtures/schema.sql");

async fn fresh_server() -> TestServer {
    let url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set for store-backed tests");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");
    pool.execute(SCHEMA)
        .await
        .expect("Failed to load test schema");

    server_with(Database::from_pool(pool))
}

async fn post(server: &TestServer, path: &str, body: Value) -> Value {
    let response = authed(server.post(path)).json(&body).await;
    assert_eq!(response.status_code(), StatusCode::CREATED, "POST {path}");
    response.json::<Value>()
}

/// Team, competition, event, customer and bookie a bet can hang off
async fn seed_bet_parents(server: &TestServer) -> (i64, i64) {
    let a = post(server, "/api/teams", json!({"name": "Lions", "country": "UK", "sport": "rugby"})).await;
    let b = post(server, "/api/teams", json!({"name": "Tigers", "country": "UK", "sport": "rugby"})).await;
    let competition = post(
        server,
        "/api/competitions",
        json!({"name": "Premiership", "country": "UK", "sport": "rugby"}),
    )
    .await;
    let event = post(
        server,
        "/api/events",
        json!({
            "date": "2026-03-01T15:00:00Z",
            "competition_id": competition["id"],
            "team_a_id": a["id"],
            "team_b_id": b["id"],
            "status": "prematch"
        }),
    )
    .await;
    let customer = post(
        server,
        "/api/customers",
        json!({
            "username": "jdoe",
            "password": "hunter2",
            "real_name": "J Doe",
            "currency": "GBP",
            "status": "active",
            "balance": {"amount": 250.5, "currency": "GBP"}
        }),
    )
    .await;
    post(server, "/api/bookies", json!({"name": "acme", "description": "Acme Bets"})).await;

    (
        event["id"].as_i64().unwrap(),
        customer["id"].as_i64().unwrap(),
    )
}

fn bet(event_id: i64, customer_id: i64, bookie_bet_id: &str) -> Value {
    json!({
        "bookie": "acme",
        "customer_id": customer_id,
        "bookie_bet_id": bookie_bet_id,
        "bet_type": "single",
        "event_id": event_id,
        "sport": "rugby",
        "stake": {"amount": 12.3456, "currency": "GBP"},
        "odds": 2.75,
        "placement_data": {"market": "match_winner"}
    })
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_team_lifecycle() {
    let server = fresh_server().await;

    let team = post(
        &server,
        "/api/teams",
        json!({"name": "Lions", "country": "UK", "sport": "rugby"}),
    )
    .await;
    assert!(team["id"].as_i64().is_some());
    assert_eq!(team["created_at"], team["updated_at"]);

    let id = team["id"].as_i64().unwrap();
    let response = authed(server.put(&format!("/api/teams/{id}")))
        .json(&json!({"name": "Lions", "country": "Wales", "sport": "rugby"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["country"], "Wales");

    let response = authed(server.put("/api/teams/999"))
        .json(&json!({"name": "Ghosts", "country": "UK", "sport": "rugby"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["message"], "Team not found");

    for _ in 0..2 {
        let response = authed(server.delete("/api/teams/999")).await;
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    }

    let response = authed(server.delete(&format!("/api/teams/{id}"))).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    let teams = authed(server.get("/api/teams")).await.json::<Value>();
    assert_eq!(teams, json!([]));
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_sports_are_listed_by_name() {
    let server = fresh_server().await;

    for name in ["tennis", "football", "rugby"] {
        post(&server, "/api/sports", json!({"name": name})).await;
    }

    let sports = authed(server.get("/api/sports")).await.json::<Value>();
    assert_eq!(
        sports,
        json!([{"name": "football"}, {"name": "rugby"}, {"name": "tennis"}])
    );

    let response = authed(server.delete("/api/sports/rugby")).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    let sports = authed(server.get("/api/sports")).await.json::<Value>();
    assert_eq!(sports.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_competition_active_filter() {
    let server = fresh_server().await;

    post(&server, "/api/competitions", json!({"name": "Cup", "country": "UK", "sport": "rugby"})).await;
    post(
        &server,
        "/api/competitions",
        json!({"name": "Old League", "country": "UK", "sport": "rugby", "active": false}),
    )
    .await;

    let active = authed(server.get("/api/competitions"))
        .add_query_param("active", "true")
        .await
        .json::<Value>();
    assert_eq!(active.as_array().map(Vec::len), Some(1));
    assert_eq!(active[0]["name"], "Cup");

    let all = authed(server.get("/api/competitions")).await.json::<Value>();
    assert_eq!(all.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_money_round_trips_through_the_composite() {
    let server = fresh_server().await;
    let (event_id, customer_id) = seed_bet_parents(&server).await;

    let created = post(&server, "/api/bets", bet(event_id, customer_id, "A-1")).await;
    assert_eq!(created["stake"], json!({"amount": 12.3456, "currency": "GBP"}));
    assert_eq!(created["odds"], json!(2.75));
    assert_eq!(created["placement_status"], "pending");
    assert_eq!(created["outcome"], Value::Null);

    let customers = authed(server.get("/api/customers")).await.json::<Value>();
    assert_eq!(customers[0]["balance"], json!({"amount": 250.5, "currency": "GBP"}));
    assert!(customers[0].get("password").is_none());
    assert_eq!(customers[0]["preferences"], json!({}));

    let change = post(
        &server,
        "/api/balance_changes",
        json!({
            "customer_id": customer_id,
            "change_type": "top_up",
            "delta": {"amount": -5, "currency": "GBP"}
        }),
    )
    .await;
    assert_eq!(change["delta"], json!({"amount": -5.0, "currency": "GBP"}));
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_bets_are_listed_newest_first_and_can_be_settled() {
    let server = fresh_server().await;
    let (event_id, customer_id) = seed_bet_parents(&server).await;

    let first = post(&server, "/api/bets", bet(event_id, customer_id, "A-1")).await;
    post(&server, "/api/bets", bet(event_id, customer_id, "A-2")).await;

    let bets = authed(server.get("/api/bets")).await.json::<Value>();
    assert_eq!(bets[0]["bookie_bet_id"], "A-2");
    assert_eq!(bets[1]["bookie_bet_id"], "A-1");

    let mut settled = bet(event_id, customer_id, "A-1");
    settled["placement_status"] = json!("placed");
    settled["outcome"] = json!("win");
    let response = authed(server.put(&format!("/api/bets/{}", first["id"])))
        .json(&settled)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["outcome"], "win");

    let stats = authed(server.get("/api/customer_stats")).await.json::<Value>();
    assert_eq!(stats[0]["total_bets"], 2);
    assert_eq!(stats[0]["won_bets"], 1);
    assert_eq!(stats[0]["currency"], "GBP");
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_audit_trail_can_be_filtered_by_table() {
    let server = fresh_server().await;
    let (event_id, customer_id) = seed_bet_parents(&server).await;
    post(&server, "/api/bets", bet(event_id, customer_id, "A-1")).await;

    let entries = authed(server.get("/api/audit"))
        .add_query_param("table", "bets")
        .await
        .json::<Value>();
    let entries = entries.as_array().cloned().unwrap_or_default();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["operation"], "INSERT");
    assert!(entries[0]["old_data"].is_null());

    let everything = authed(server.get("/api/audit"))
        .add_query_param("table", "")
        .await
        .json::<Value>();
    assert!(everything.as_array().map(Vec::len).unwrap_or_default() > 1);
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_bookie_can_be_renamed() {
    let server = fresh_server().await;
    post(&server, "/api/bookies", json!({"name": "acme", "description": "Acme Bets"})).await;

    let response = authed(server.put("/api/bookies/acme"))
        .json(&json!({"name": "acme-uk", "description": "Acme UK", "preferences": {"tier": 1}}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let bookies = authed(server.get("/api/bookies")).await.json::<Value>();
    assert_eq!(
        bookies,
        json!([{"name": "acme-uk", "description": "Acme UK", "preferences": {"tier": 1}}])
    );

    let response = authed(server.put("/api/bookies/acme"))
        .json(&json!({"name": "acme", "description": "gone"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_events_are_listed_newest_first() {
    let server = fresh_server().await;
    let a = post(&server, "/api/teams", json!({"name": "Lions", "country": "UK", "sport": "rugby"})).await;
    let b = post(&server, "/api/teams", json!({"name": "Tigers", "country": "UK", "sport": "rugby"})).await;
    let competition = post(
        &server,
        "/api/competitions",
        json!({"name": "Premiership", "country": "UK", "sport": "rugby"}),
    )
    .await;

    for date in [
        "2026-03-01T15:00:00Z",
        "2026-01-01T15:00:00Z",
        "2026-06-01T15:00:00Z",
    ] {
        post(
            &server,
            "/api/events",
            json!({
                "date": date,
                "competition_id": competition["id"],
                "team_a_id": a["id"],
                "team_b_id": b["id"],
                "status": "prematch"
            }),
        )
        .await;
    }

    let events = authed(server.get("/api/events")).await.json::<Value>();
    let dates: Vec<&str> = events
        .as_array()
        .map(|events| events.iter().filter_map(|e| e["date"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(dates.len(), 3);
    assert!(dates[0].starts_with("2026-06-01"));
    assert!(dates[1].starts_with("2026-03-01"));
    assert!(dates[2].starts_with("2026-01-01"));
}
