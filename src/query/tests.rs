//! Tests for the request builder

use super::*;
use crate::config::{ScraperConfig, DEFAULT_PERSISTED_QUERY_HASH, SESSION_HEADER};
use crate::error::{Error, ErrorKind};
use crate::http::FixedSessionToken;
use crate::types::SortMode;
use serde_json::{json, Value};
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn param<'a>(params: &'a [(String, String)], key: &str) -> &'a str {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or_else(|| panic!("missing query param {key}"))
}

fn variables(request: &FetchRequest) -> Value {
    let params = build_query_params(request, &ScraperConfig::default());
    serde_json::from_str(param(&params, "variables")).unwrap()
}

// ============================================================================
// FetchRequest Tests
// ============================================================================

#[test]
fn test_first_page_has_empty_cursor() {
    let request = FetchRequest::first_page("tt0000001", SortMode::HelpfulnessScore).unwrap();
    assert!(request.is_first_page());
    assert_eq!(request.cursor, "");

    let next = request.with_cursor("C1");
    assert!(!next.is_first_page());
    assert_eq!(next.resource_id, "tt0000001");
    assert_eq!(next.sort_mode, SortMode::HelpfulnessScore);
}

#[test]
fn test_empty_resource_id_rejected() {
    let err = FetchRequest::first_page("  ", SortMode::SubmissionDate).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test_case("HELPFULNESS_SCORE", SortMode::HelpfulnessScore ; "helpfulness")]
#[test_case("SUBMISSION_DATE", SortMode::SubmissionDate ; "submission date")]
fn test_parse_valid_sort_mode(name: &str, expected: SortMode) {
    let request = FetchRequest::parse("tt0000001", "C9", name).unwrap();
    assert_eq!(request.sort_mode, expected);
    assert_eq!(request.cursor, "C9");
}

#[test_case("RANDOM")]
#[test_case("")]
#[test_case("submission_date")]
fn test_parse_invalid_sort_mode(name: &str) {
    let err = FetchRequest::parse("tt0000001", "", name).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

// ============================================================================
// Query Parameter Tests
// ============================================================================

#[test_case(SortMode::HelpfulnessScore, "HELPFULNESS_SCORE")]
#[test_case(SortMode::SubmissionDate, "SUBMISSION_DATE")]
fn test_sort_field_matches_input(mode: SortMode, wire: &str) {
    let request = FetchRequest::first_page("tt0000001", mode).unwrap();
    let vars = variables(&request);

    assert_eq!(vars["sort"]["by"], wire);
    assert_eq!(vars["sort"]["order"], "DESC");
}

#[test]
fn test_variables_shape() {
    let request = FetchRequest::first_page("tt0111161", SortMode::HelpfulnessScore)
        .unwrap()
        .with_cursor("abc==");
    let vars = variables(&request);

    assert_eq!(
        vars,
        json!({
            "tConst": "tt0111161",
            "sort": {"by": "HELPFULNESS_SCORE", "order": "DESC"},
            "after": "abc==",
            "filter": {}
        })
    );
}

#[test]
fn test_operation_and_extensions() {
    let request = FetchRequest::first_page("tt0111161", SortMode::SubmissionDate).unwrap();
    let params = build_query_params(&request, &ScraperConfig::default());

    let keys: Vec<_> = params.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["operationName", "variables", "extensions"]);
    assert_eq!(param(&params, "operationName"), "TitleUserReviewsQuery");

    let extensions: Value = serde_json::from_str(param(&params, "extensions")).unwrap();
    assert_eq!(extensions["persistedQuery"]["version"], 1);
    assert_eq!(
        extensions["persistedQuery"]["sha256Hash"],
        DEFAULT_PERSISTED_QUERY_HASH
    );
}

#[test]
fn test_cursor_is_escaped_as_json() {
    let request = FetchRequest::first_page("tt1", SortMode::HelpfulnessScore)
        .unwrap()
        .with_cursor("a\"b");
    assert_eq!(variables(&request)["after"], "a\"b");
}

// ============================================================================
// ImdbReviewSource Tests
// ============================================================================

fn source_for(server: &MockServer) -> ImdbReviewSource {
    let config = ScraperConfig::builder()
        .endpoint(format!("{}/graphql", server.uri()))
        .timeout(Duration::from_secs(5))
        .build();
    ImdbReviewSource::new(config).with_token_generator(FixedSessionToken::new("111-2222222-3333333"))
}

#[tokio::test]
async fn test_fetch_sends_headers_and_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graphql"))
        .and(query_param("operationName", "TitleUserReviewsQuery"))
        .and(header(SESSION_HEADER, "111-2222222-3333333"))
        .and(header("X-Imdb-Client-Name", "imdb-app-android"))
        .and(header("X-Apollo-Operation-Name", "TitleUserReviewsQuery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = source_for(&mock_server).open().unwrap();
    let request = FetchRequest::first_page("tt0000001", SortMode::HelpfulnessScore).unwrap();
    let page = fetcher.fetch(&request).await.unwrap();

    assert_eq!(page, json!({"data": {}}));
}

#[tokio::test]
async fn test_fetch_operation_headers_follow_config_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("operationName", "TitleUserReviewsQueryV2"))
        .and(header("X-Apollo-Operation-Id", "0123abcd"))
        .and(header("X-Apollo-Operation-Name", "TitleUserReviewsQueryV2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let yaml = format!(
        "endpoint: \"{}/graphql\"\noperation_name: TitleUserReviewsQueryV2\npersisted_query_hash: 0123abcd\n",
        mock_server.uri()
    );
    let config = ScraperConfig::from_yaml_str(&yaml).unwrap();
    let fetcher = ImdbReviewSource::new(config).open().unwrap();
    let request = FetchRequest::first_page("tt0000001", SortMode::HelpfulnessScore).unwrap();

    assert_eq!(fetcher.fetch(&request).await.unwrap()["ok"], true);
}

#[tokio::test]
async fn test_fetch_sends_variables() {
    let mock_server = MockServer::start().await;

    let request = FetchRequest::first_page("tt0000001", SortMode::SubmissionDate)
        .unwrap()
        .with_cursor("C1");
    let expected = build_query_params(&request, &ScraperConfig::default());

    Mock::given(method("GET"))
        .and(query_param("variables", param(&expected, "variables")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = source_for(&mock_server).open().unwrap();
    let page = fetcher.fetch(&request).await.unwrap();
    assert_eq!(page["ok"], true);
}

#[tokio::test]
async fn test_fetch_is_single_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = source_for(&mock_server).open().unwrap();
    let request = FetchRequest::first_page("tt0000001", SortMode::HelpfulnessScore).unwrap();
    let err = fetcher.fetch(&request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_fetch_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let fetcher = source_for(&mock_server).open().unwrap();
    let request = FetchRequest::first_page("tt0000001", SortMode::HelpfulnessScore).unwrap();
    let err = fetcher.fetch(&request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn test_open_rejects_invalid_config() {
    let source = ImdbReviewSource::new(ScraperConfig::builder().endpoint("nope").build());
    assert!(source.open().is_err());
}
