//! Resolver and member API tests against a mock server

mod common;

use std::time::Duration;

use common::fixtures::load_response_fixture;
use orcid_work::api::ORCID_XML;
use orcid_work::http::HttpClient;
use orcid_work::lookup::CSL_JSON;
use orcid_work::{ApiError, DoiLookup, LookupError, OrcidApi, WorkConfig, WorkError, WorkRecord};
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORCID: &str = "0000-0002-1825-0097";

fn client() -> HttpClient {
    HttpClient::new("orcid-work-tests", Duration::from_secs(5)).unwrap()
}

fn lookup(server: &MockServer) -> DoiLookup {
    DoiLookup::new(client(), Url::parse(&server.uri()).unwrap())
}

fn api(server: &MockServer) -> OrcidApi {
    OrcidApi::new(client(), Url::parse(&server.uri()).unwrap())
}

// === Metadata lookup ===

#[tokio::test]
async fn test_fetch_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/10.1234/example"))
        .and(header("accept", CSL_JSON))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_response_fixture("example_work.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let metadata = lookup(&server).fetch_async("10.1234/example").await.unwrap();
    assert_eq!(metadata.title(), Some("Example Paper"));
    assert_eq!(metadata.container_title(), Some("Journal of Examples"));
    assert_eq!(metadata.author.len(), 1);
}

#[tokio::test]
async fn test_fetch_unknown_doi() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = lookup(&server).fetch_async("10.1234/missing").await.unwrap_err();
    assert!(matches!(err, LookupError::NotFound { ref doi } if doi == "10.1234/missing"));
}

#[tokio::test]
async fn test_fetch_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = lookup(&server).fetch_async("10.1234/example").await.unwrap_err();
    assert!(matches!(err, LookupError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_fetch_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = lookup(&server).fetch_async("10.1234/example").await.unwrap_err();
    assert!(matches!(err, LookupError::Malformed { .. }));
}

/// The blocking path runs on the crate's own runtime, so the mock server
/// gets a separate one.
#[test]
fn test_record_from_config() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/10.1234/example"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(load_response_fixture("example_work.json")),
            )
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let config = WorkConfig {
        metadata_url: server.uri(),
        ..Default::default()
    };
    let work = WorkRecord::from_config("10.1234/example", ORCID, "token", &config).unwrap();

    assert!(work.data().unwrap().is_some());
    assert!(work.citation().unwrap().is_some());
    assert!(work.validation_errors().unwrap().is_empty());
    runtime.block_on(server.verify());
}

// === Member API ===

#[tokio::test]
async fn test_post_work_returns_put_code() {
    let server = MockServer::start().await;
    let location = format!("{}/v2.0/{}/work/4711", server.uri(), ORCID);
    Mock::given(method("POST"))
        .and(path(format!("/v2.0/{}/work", ORCID)))
        .and(header("authorization", "Bearer secret"))
        .and(header("content-type", ORCID_XML))
        .and(body_string_contains("<work:work"))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", location.as_str()))
        .expect(1)
        .mount(&server)
        .await;

    let put_code = api(&server)
        .post_work(ORCID, "secret", "<work:work/>")
        .await
        .unwrap();
    assert_eq!(put_code, "4711");
}

#[tokio::test]
async fn test_post_work_without_location() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let err = api(&server)
        .post_work(ORCID, "secret", "<work:work/>")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkError::Api(ApiError::MissingPutCode)));
}

#[tokio::test]
async fn test_rejected_work() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate external id"))
        .mount(&server)
        .await;

    let err = api(&server)
        .post_work(ORCID, "secret", "<work:work/>")
        .await
        .unwrap_err();
    match err {
        WorkError::Api(ApiError::Rejected { status, body }) => {
            assert_eq!(status, 409);
            assert_eq!(body, "duplicate external id");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_put_and_delete_work() {
    let server = MockServer::start().await;
    let work_path = format!("/v2.0/{}/work/4711", ORCID);
    Mock::given(method("PUT"))
        .and(path(work_path.as_str()))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(work_path.as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    api.put_work(ORCID, "secret", "4711", "<work:work/>")
        .await
        .unwrap();
    api.delete_work_async(ORCID, "secret", "4711").await.unwrap();
}

#[tokio::test]
async fn test_get_works() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v2.0/{}/works", ORCID)))
        .and(header("accept", ORCID_XML))
        .respond_with(ResponseTemplate::new(200).set_body_string("<activities:works/>"))
        .mount(&server)
        .await;

    let works = api(&server).get_works_async(ORCID, "secret").await.unwrap();
    assert_eq!(works, "<activities:works/>");
}

#[tokio::test]
async fn test_invalid_orcid_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = api(&server)
        .post_work("0000-0002-1825-0098", "secret", "<work:work/>")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkError::InvalidOrcid(_)));
}
