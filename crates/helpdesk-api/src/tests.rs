//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use helpdesk_core::{
  memory::MemoryStore,
  service::{CaseService, PersonService},
};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiState, api_router};

const BASE: &str = "/sub-0001/rg-support/helpdesk";

fn app() -> Router {
  let store = Arc::new(MemoryStore::new());
  api_router(ApiState::new(CaseService::new(store.clone()), PersonService::new(store)))
}

async fn send(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
  let builder = Request::builder()
    .method(method)
    .uri(format!("{BASE}{path}"))
    .header(header::CONTENT_TYPE, "application/json");
  let req = match body {
    Some(v) => builder.body(Body::from(v.to_string())).unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, json)
}

fn person_body(alias: &str) -> Value {
  json!({
    "alias": alias,
    "name": format!("Person {alias}"),
    "email": format!("{alias}@contoso.com"),
    "specializations": ["Database", "Hardware"],
    "seniority": "Senior"
  })
}

// ── Support persons ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_person_returns_201_envelope() {
  let app = app();
  let mut body = person_body("jdoe");
  body["currentWorkload"] = json!(55);

  let (status, json) = send(&app, "POST", "/supportpersons", Some(body)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(json["success"], true);
  assert_eq!(json["data"]["alias"], "jdoe");
  assert_eq!(json["data"]["currentWorkload"], 0);
  assert_eq!(json["data"]["status"], "active");

  let (status, json) = send(&app, "GET", "/supportpersons/jdoe", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(json["data"]["email"], "jdoe@contoso.com");
}

#[tokio::test]
async fn duplicate_alias_is_409() {
  let app = app();
  send(&app, "POST", "/supportpersons", Some(person_body("jdoe"))).await;
  let mut again = person_body("jdoe");
  again["email"] = json!("second@contoso.com");

  let (status, json) = send(&app, "POST", "/supportpersons", Some(again)).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(json["success"], false);
  assert_eq!(json["error"]["code"], "ALIAS_ALREADY_EXISTS");
}

#[tokio::test]
async fn invalid_person_lists_every_violation() {
  let app = app();
  let body = json!({ "alias": "!", "email": "nope", "seniority": "Intern" });

  let (status, json) = send(&app, "POST", "/supportpersons", Some(body)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
  let details = json["error"]["details"].as_array().unwrap();
  let fields: Vec<_> = details.iter().filter_map(|d| d["field"].as_str()).collect();
  for field in ["alias", "name", "email", "specializations", "seniority"] {
    assert!(fields.contains(&field), "missing {field} in {fields:?}");
  }
}

#[tokio::test]
async fn unknown_person_is_404() {
  let app = app();
  let (status, json) = send(&app, "GET", "/supportpersons/ghost", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(json["error"]["code"], "SUPPORT_PERSON_NOT_FOUND");

  let (status, _) = send(&app, "DELETE", "/supportpersons/ghost", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_person_ignores_body_alias() {
  let app = app();
  send(&app, "POST", "/supportpersons", Some(person_body("jdoe"))).await;
  let mut body = person_body("renamed");
  body["email"] = json!("jdoe@contoso.com");
  body["currentWorkload"] = json!(8);

  let (status, json) = send(&app, "PUT", "/supportpersons/jdoe", Some(body)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(json["data"]["alias"], "jdoe");
  assert_eq!(json["data"]["currentWorkload"], 8);
}

#[tokio::test]
async fn person_listing_reports_pagination() {
  let app = app();
  for alias in ["ann", "bob", "cat"] {
    send(&app, "POST", "/supportpersons", Some(person_body(alias))).await;
  }

  let (status, json) = send(
    &app,
    "GET",
    "/supportpersons?limit=2&offset=1&sortBy=name&sortOrder=desc&specialization=Database",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let names: Vec<_> = json["data"]["items"]
    .as_array()
    .unwrap()
    .iter()
    .filter_map(|p| p["alias"].as_str())
    .collect();
  assert_eq!(names, ["bob", "ann"]);
  assert_eq!(json["data"]["pagination"], json!({
    "total": 3, "limit": 2, "offset": 1, "hasNext": false, "hasPrevious": true
  }));
}

#[tokio::test]
async fn delete_person_with_cases_is_409_with_details() {
  let app = app();
  send(&app, "POST", "/supportpersons", Some(person_body("jdoe"))).await;
  let (_, created) =
    send(&app, "POST", "/cases", Some(json!({ "title": "VPN", "assignedSupportPerson": "jdoe" }))).await;
  let case_id = created["data"]["id"].as_str().unwrap().to_owned();

  let (status, json) = send(&app, "DELETE", "/supportpersons/jdoe", None).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(json["error"]["code"], "CANNOT_DELETE_ACTIVE_ASSIGNMENTS");
  assert_eq!(json["error"]["details"], json!({ "activeCases": 1, "caseIds": [case_id] }));

  send(&app, "DELETE", &format!("/cases/{case_id}"), None).await;
  let (status, _) = send(&app, "DELETE", "/supportpersons/jdoe", None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
}

// ── Cases ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn case_lifecycle() {
  let app = app();
  let (status, json) = send(&app, "POST", "/cases", Some(json!({ "title": "Printer jam" }))).await;
  assert_eq!(status, StatusCode::ACCEPTED);
  let id = json["data"]["id"].as_str().unwrap().to_owned();
  assert_eq!(json["data"]["isComplete"], false);

  let (status, json) = send(
    &app,
    "PUT",
    &format!("/cases/{id}"),
    Some(json!({ "title": "Printer jam", "isComplete": true })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(json["data"]["id"], id.as_str());
  assert_eq!(json["data"]["isComplete"], true);

  let (status, _) = send(&app, "DELETE", &format!("/cases/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, json) = send(&app, "GET", &format!("/cases/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(json["error"]["code"], "CASE_NOT_FOUND");
  let (status, _) = send(&app, "DELETE", &format!("/cases/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_missing_case_is_404() {
  let app = app();
  let (status, json) = send(&app, "PUT", "/cases/nope", Some(json!({ "title": "x" }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(json["error"]["code"], "CASE_NOT_FOUND");
}

#[tokio::test]
async fn invalid_assignee_names_field_and_value() {
  let app = app();
  let body = json!({ "title": "VPN", "assignedSupportPerson": "ghost" });

  let (status, json) = send(&app, "POST", "/cases", Some(body)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(json["error"]["code"], "INVALID_SUPPORT_PERSON");
  assert_eq!(json["error"]["field"], "assignedSupportPerson");
  assert_eq!(json["error"]["providedValue"], "ghost");
}

#[tokio::test]
async fn reasoning_screen_is_400() {
  let app = app();
  let body = json!({ "title": "VPN", "supportPersonAssignmentReasoning": "phone: 555-0100" });

  let (status, json) = send(&app, "POST", "/cases", Some(body)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(json["error"]["code"], "INAPPROPRIATE_REASONING_CONTENT");
}

#[tokio::test]
async fn listing_mode_follows_parameters() {
  let app = app();
  for i in 1..=12 {
    send(&app, "POST", "/cases", Some(json!({ "title": format!("Support Case {i}") }))).await;
  }

  let count = |json: &Value| json["data"].as_array().map(Vec::len).unwrap_or_default();

  let (_, legacy) = send(&app, "GET", "/cases", None).await;
  assert_eq!(count(&legacy), 10);
  let (_, page_zero) = send(&app, "GET", "/cases?pageNumber=0", None).await;
  assert_eq!(page_zero, legacy);
  let (_, page_two) = send(&app, "GET", "/cases?pageNumber=2", None).await;
  assert_eq!(count(&page_two), 2);

  let (_, filtered) = send(&app, "GET", "/cases?limit=500", None).await;
  assert_eq!(count(&filtered), 12);
  let (_, unassigned) = send(&app, "GET", "/cases?unassigned=true&offset=11", None).await;
  assert_eq!(unassigned["data"][0]["title"], "Support Case 12");
}

#[tokio::test]
async fn malformed_input_is_400() {
  let app = app();
  let req = Request::builder()
    .method("POST")
    .uri(format!("{BASE}/cases"))
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = app.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let (status, json) = send(&app, "GET", "/cases?limit=lots", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}
