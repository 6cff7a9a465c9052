use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use boolsearch_core::builder::BuildConfig;
use boolsearch_core::service::ServiceConfig;
use boolsearch_core::tokenizer::LowercaseNormalizer;
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_corpus(dir: &Path) -> ServiceConfig {
    let lemmas = dir.join("lemmas");
    let pages = dir.join("pages");
    fs::create_dir_all(&lemmas).unwrap();
    fs::create_dir_all(&pages).unwrap();

    fs::write(lemmas.join("page_0.txt"), "город города\nрим риме\n").unwrap();
    fs::write(lemmas.join("page_1.txt"), "город городу\n").unwrap();
    fs::write(lemmas.join("page_2.txt"), "рим рима\n").unwrap();
    fs::write(pages.join("page_0.html"), "<title>Рим — Википедия</title>").unwrap();
    fs::write(pages.join("page_2.html"), "<title>Римская империя — Википедия</title>").unwrap();

    ServiceConfig { index_path: dir.join("inverted_index.json"), build: BuildConfig::new(lemmas, pages) }
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn app(dir: &Path) -> Router {
    let config = build_tiny_corpus(dir);
    server::build_app(&config, Box::new(LowercaseNormalizer)).unwrap()
}

#[tokio::test]
async fn search_returns_results_by_document_id() {
    let dir = tempdir().unwrap();
    let (status, json) = call(app(dir.path()), "/search?q=%D0%A0%D0%B8%D0%BC%20OR%20%D0%B3%D0%BE%D1%80%D0%BE%D0%B4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 3);
    let arr = json["results"].as_array().unwrap();
    let ids: Vec<u64> = arr.iter().map(|h| h["doc_id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(arr[0]["title"], "Рим");
    assert_eq!(arr[1]["title"], "page_1.txt");
    assert_eq!(arr[2]["file"], "page_2.txt");
    assert!(dir.path().join("inverted_index.json").exists());
}

#[tokio::test]
async fn limit_truncates_but_counts_everything() {
    let dir = tempdir().unwrap();
    // "NOT рим"
    let (_, json) = call(app(dir.path()), "/search?q=NOT%20%D1%80%D0%B8%D0%BC&limit=0").await;
    assert_eq!(json["total_hits"], 1);
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn empty_query_is_not_an_error() {
    let dir = tempdir().unwrap();
    let (status, json) = call(app(dir.path()), "/search?q=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 0);
}

#[tokio::test]
async fn doc_endpoint_reports_missing_ids() {
    let dir = tempdir().unwrap();
    let app = app(dir.path());
    let (status, json) = call(app.clone(), "/doc/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Римская империя");
    let (status, json) = call(app, "/doc/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not found");
}
