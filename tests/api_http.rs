// tests/api_http.rs
//
// HTTP-level tests for the public Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot, backed by
// an in-memory StaticSource instead of published sheets.

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use std::sync::Arc;
use tower::ServiceExt as _; // for `oneshot`

use funding_intel::source::{config, parse_csv, StaticSource};
use funding_intel::{create_router, AppState, Taxonomy};

const BODY_LIMIT: usize = 1024 * 1024;

const NEWS_CSV: &str = "competitor,title,date,link\n\
Acme,Acme raises $10M Series B,2024-01-05,https://acme.test/1\n\
Acme,Acme launches new widget,2024-01-20,\n\
Acme,garbled entry,not-a-date,\n\
Globex,Globex receives FDA clearance,2024-02-11,\n\
,Unattributed partnership rumor,2024-02-12,\n";

const KPI_CSV: &str = "Company,Funding ($M),Patents Filed,Active Products,Clinical Trials,Funding Rounds,Investors,Last Round Date,Notes\n\
Acme,10,4,2,1,Series B,Sequoia,2024-01-05,\n\
Globex,25.5,9,5,3,Series C,Accel,2023-11-02,Late stage\n";

const HISTORY_CSV: &str = "Company,Date,Round,Amount ($M),Investors,Notes\n\
Acme,2023-03-01,Series A,4,Angels,\n\
Acme,2024-01-05,Series B,10,Sequoia,\n";

fn router_with(source: StaticSource) -> Router {
    create_router(AppState::new(Arc::new(source), Taxonomy::builtin()))
}

fn full_router() -> Router {
    router_with(
        StaticSource::new()
            .with_table(config::NEWS_DATA, parse_csv(NEWS_CSV).unwrap())
            .with_table(config::FUNDING_DATA, parse_csv(KPI_CSV).unwrap())
            .with_table(config::FUNDING_HISTORY, parse_csv(HISTORY_CSV).unwrap()),
    )
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v = serde_json::from_slice(&bytes).unwrap_or(Json::Null);
    (status, v)
}

#[tokio::test]
async fn health_returns_ok() {
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = full_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn classify_endpoint_tags_titles() {
    for (payload, want) in [
        (json!({ "title": "Acme launches and acquires Initech" }), "Product Launch"),
        (json!({ "title": "" }), "Other"),
        (json!({}), "Other"),
    ] {
        let req = Request::builder()
            .method("POST")
            .uri("/classify")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        let resp = full_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
        let v: Json = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["tag"], want, "payload {payload}");
    }
}

#[tokio::test]
async fn taxonomy_lists_categories_in_order() {
    let (status, v) = get_json(full_router(), "/taxonomy").await;
    assert_eq!(status, StatusCode::OK);
    let tags: Vec<&str> = v["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["tag"].as_str().unwrap())
        .collect();
    assert_eq!(tags.first(), Some(&"Funding"));
    assert_eq!(tags.last(), Some(&"Corporate Update"));
    assert_eq!(tags.len(), 10);
    assert_eq!(v["fallback"], "Other");
}

#[tokio::test]
async fn news_is_tagged_and_undated_rows_dropped() {
    let (status, v) = get_json(full_router(), "/news").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["dropped"], 1);
    let items = v["items"].as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0]["tag"], "Funding");
    assert_eq!(items[0]["date"], "2024-01-05");
    assert_eq!(items[0]["link"], "https://acme.test/1");
    assert_eq!(items[1]["tag"], "Product Launch");
    assert_eq!(items[2]["tag"], "Regulatory");
    assert_eq!(items[3]["competitor"], Json::Null);
    assert_eq!(items[3]["tag"], "Partnership");
    assert!(v.get("warning").is_none());
}

#[tokio::test]
async fn news_filters_by_competitor_and_tag() {
    let (_, v) = get_json(full_router(), "/news?competitor=acme").await;
    assert_eq!(v["items"].as_array().unwrap().len(), 2);

    let (_, v) = get_json(full_router(), "/news?tag=product%20launch").await;
    let items = v["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Acme launches new widget");

    let (status, v) = get_json(full_router(), "/news?tag=gossip").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(v["error"].as_str().unwrap().contains("gossip"));
}

#[tokio::test]
async fn summary_returns_three_tables() {
    let (status, v) = get_json(full_router(), "/news/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["items"], 4);
    assert_eq!(v["dropped"], 1);

    let freq = v["tag_frequency"].as_array().unwrap();
    let total: u64 = freq.iter().map(|t| t["count"].as_u64().unwrap()).sum();
    assert_eq!(total, 4);

    let ct = v["competitor_tags"].as_array().unwrap();
    assert_eq!(ct[0]["competitor"], "Acme");
    assert_eq!(ct[0]["tag"], "Funding");
    assert_eq!(ct.len(), 3);

    let monthly = v["monthly_activity"].as_array().unwrap();
    assert_eq!(
        monthly,
        &vec![
            json!({"month": "2024-01", "competitor": "Acme", "count": 2}),
            json!({"month": "2024-02", "competitor": "Globex", "count": 1}),
        ]
    );
}

#[tokio::test]
async fn kpi_and_history_project_the_sheets() {
    let (status, v) = get_json(full_router(), "/kpi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["funding_raised"][1]["company"], "Globex");
    assert_eq!(v["funding_raised"][1]["value"], 25.5);
    assert_eq!(v["notes"][1]["notes"], "Late stage");

    let (status, v) = get_json(full_router(), "/funding-history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["rounds"].as_array().unwrap().len(), 2);
    assert_eq!(v["rounds"][0]["round"], "Series A");
    assert_eq!(v["dropped"], 0);
}

#[tokio::test]
async fn empty_sheets_come_back_with_a_warning() {
    let header_only = |h: &str| parse_csv(h).unwrap();
    let app = router_with(
        StaticSource::new()
            .with_table(config::NEWS_DATA, header_only("competitor,title,date,link\n"))
            .with_table(config::FUNDING_DATA, header_only("Company,Funding ($M)\n")),
    );

    let (status, v) = get_json(app.clone(), "/news/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert!(v["tag_frequency"].as_array().unwrap().is_empty());
    assert!(v["competitor_tags"].as_array().unwrap().is_empty());
    assert!(v["monthly_activity"].as_array().unwrap().is_empty());
    assert!(v["warning"].as_str().unwrap().contains("news_data_url"));

    let (status, v) = get_json(app, "/kpi").await;
    assert_eq!(status, StatusCode::OK);
    assert!(v["warning"].as_str().unwrap().contains("funding_data_url"));
}

#[tokio::test]
async fn upstream_failure_is_a_502_with_source_id() {
    let app = router_with(
        StaticSource::new().with_failure(config::FUNDING_HISTORY, "Failed to fetch data from: x"),
    );
    let (status, v) = get_json(app, "/funding-history").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(v["source"], "funding_history_url");
    assert!(v["error"].as_str().unwrap().contains("Failed to fetch"));
}
