//! Machine-readable description of the HTTP surface, served at `/openapi.json`.

use axum::Json;
use serde_json::{json, Map, Value};

/// `(plural, key parameter, supports update, supports delete)`
const RESOURCES: &[(&str, Option<&str>, bool, bool)] = &[
    ("sports", Some("name"), false, true),
    ("teams", Some("id"), true, true),
    ("competitions", Some("id"), true, true),
    ("events", Some("id"), true, true),
    ("results", Some("event_id"), true, true),
    ("customers", Some("id"), true, true),
    ("bookies", Some("name"), true, true),
    ("bets", Some("id"), true, true),
    ("balance_changes", None, false, false),
];

pub async fn openapi() -> Json<Value> {
    Json(document())
}

pub fn document() -> Value {
    let mut paths = Map::new();

    paths.insert(
        "/health".to_string(),
        json!({ "get": unauthenticated("Liveness probe") }),
    );
    paths.insert(
        "/health/detailed".to_string(),
        json!({ "get": unauthenticated("Component health") }),
    );

    for &(plural, key, updatable, deletable) in RESOURCES {
        paths.insert(
            format!("/api/{}", plural),
            json!({
                "get": operation(&format!("List {}", plural), "200", None),
                "post": operation(&format!("Create one of {}", plural), "201", None),
            }),
        );

        let Some(key) = key else { continue };
        let mut item = Map::new();
        if updatable {
            item.insert(
                "put".to_string(),
                operation(&format!("Replace one of {}", plural), "200", Some(key)),
            );
        }
        if deletable {
            item.insert(
                "delete".to_string(),
                operation(&format!("Delete one of {}", plural), "204", Some(key)),
            );
        }
        paths.insert(format!("/api/{}/{{{}}}", plural, key), Value::Object(item));
    }

    let mut audit = operation("List audit log entries", "200", None);
    audit["parameters"] = json!([{
        "name": "table",
        "in": "query",
        "required": false,
        "schema": { "type": "string" },
    }]);
    paths.insert("/api/audit".to_string(), json!({ "get": audit }));
    paths.insert(
        "/api/customer_stats".to_string(),
        json!({ "get": operation("List per-customer statistics", "200", None) }),
    );

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Sports Betting Admin API",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": paths,
        "components": {
            "securitySchemes": {
                "ApiKeyAuth": {
                    "type": "apiKey",
                    "in": "header",
                    "name": "X-API-Key",
                }
            }
        },
        "security": [{ "ApiKeyAuth": [] }],
    })
}

fn operation(summary: &str, status: &str, key: Option<&str>) -> Value {
    let mut op = json!({
        "summary": summary,
        "responses": {
            status: { "description": "Success" },
            "401": { "description": "Invalid or missing API key" },
            "422": { "description": "Validation failure" },
        },
    });
    if let Some(key) = key {
        op["parameters"] = json!([{
            "name": key,
            "in": "path",
            "required": true,
            "schema": { "type": if key == "name" { "string" } else { "integer" } },
        }]);
    }
    if status == "200" && key.is_some() {
        op["responses"]["404"] = json!({ "description": "No row with this key" });
    }
    op
}

fn unauthenticated(summary: &str) -> Value {
    json!({
        "summary": summary,
        "security": [],
        "responses": { "200": { "description": "Success" } },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = document();
        let paths = doc["paths"].as_object().unwrap();

        assert!(paths["/api/sports/{name}"].get("put").is_none());
        assert!(paths["/api/sports/{name}"].get("delete").is_some());
        assert!(paths["/api/bets/{id}"].get("put").is_some());
        assert!(paths.get("/api/balance_changes/{id}").is_none());
        assert!(paths["/api/audit"]["get"]["parameters"][0]["name"] == "table");
        assert_eq!(paths["/api/teams/{id}"]["put"]["responses"]["404"]["description"], "No row with this key");
    }

    #[test]
    fn test_health_is_unauthenticated() {
        let doc = document();
        assert_eq!(doc["paths"]["/health"]["get"]["security"], json!([]));
        assert_eq!(
            doc["components"]["securitySchemes"]["ApiKeyAuth"]["name"],
            "X-API-Key"
        );
    }
}
