use httpmock::prelude::*;
use kpa_tool::{CpiProvider, CpiResolver, KpaError};

const CPI_TABLE_CONTENT: &str = "\
GENESIS-Table: 61111-0002
Consumer price index: Germany, months;;;
2022 ; September ; 116.8 ; x
2022 ; October ; 117.3 ; foo
2022 ; November ; 117.4 ; x
__________
Source: Federal Statistical Office";

fn resolver(base_url: String) -> CpiResolver {
    CpiResolver::new(
        base_url,
        "61111-0002".to_string(),
        "en".to_string(),
        "testuser".to_string(),
        "testpass".to_string(),
    )
    .unwrap()
}

fn genesis_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "Status": { "Code": 0, "Content": "successful" },
        "Object": { "Content": content }
    })
}

#[tokio::test]
async fn test_resolve_requests_prior_year_with_credentials() {
    let server = MockServer::start();
    let table_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/data/table")
            .header("username", "testuser")
            .header("password", "testpass")
            .body_contains("name=61111-0002")
            .body_contains("startyear=2022")
            .body_contains("endyear=2022");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(genesis_body(CPI_TABLE_CONTENT));
    });

    let result = resolver(server.base_url()).resolve(2023).await.unwrap();

    table_mock.assert();
    assert_eq!(result.value, 117.3);
    assert_eq!(result.source_year, 2022);
}

#[tokio::test]
async fn test_http_failure_is_data_source_error_without_retry() {
    let server = MockServer::start();
    let table_mock = server.mock(|when, then| {
        when.method(POST).path("/data/table");
        then.status(503).body("maintenance window");
    });

    let err = resolver(server.base_url()).resolve(2023).await.unwrap_err();

    // Exactly one outbound call; failures are terminal, never retried.
    table_mock.assert_hits(1);
    match err {
        KpaError::DataSource { message } => {
            assert!(message.contains("503"));
            assert!(message.contains("maintenance window"));
        }
        other => panic!("expected DataSource error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_genesis_status_error_is_data_source_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/data/table");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "Status": { "Code": 104, "Content": "wrong login or password" },
                "Object": null
            }));
    });

    let err = resolver(server.base_url()).resolve(2023).await.unwrap_err();

    match err {
        KpaError::DataSource { message } => {
            assert!(message.contains("wrong login or password"));
        }
        other => panic!("expected DataSource error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_content_is_data_source_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/data/table");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "Status": { "Code": 0, "Content": "successful" },
                "Object": {}
            }));
    });

    let err = resolver(server.base_url()).resolve(2023).await.unwrap_err();
    assert!(matches!(err, KpaError::DataSource { .. }));
}

#[tokio::test]
async fn test_invalid_json_body_is_data_source_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/data/table");
        then.status(200).body("<html>not json</html>");
    });

    let err = resolver(server.base_url()).resolve(2023).await.unwrap_err();
    assert!(matches!(err, KpaError::DataSource { .. }));
}

#[tokio::test]
async fn test_missing_october_row_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/data/table");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(genesis_body("2022 ; September ; 116.8 ; x"));
    });

    let err = resolver(server.base_url()).resolve(2023).await.unwrap_err();
    assert!(matches!(err, KpaError::CpiNotFound(2022)));
}

#[tokio::test]
async fn test_malformed_value_is_parse_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/data/table");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(genesis_body("2022 ; October ; N/A ; foo"));
    });

    let err = resolver(server.base_url()).resolve(2023).await.unwrap_err();
    assert!(matches!(err, KpaError::CpiParse { .. }));
}

#[tokio::test]
async fn test_identical_inputs_give_identical_results() {
    let server = MockServer::start();
    let table_mock = server.mock(|when, then| {
        when.method(POST).path("/data/table");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(genesis_body(CPI_TABLE_CONTENT));
    });

    let resolver = resolver(server.base_url());
    let first = resolver.resolve(2023).await.unwrap();
    let second = resolver.resolve(2023).await.unwrap();

    // No cache: two calls, two requests, same answer.
    table_mock.assert_hits(2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_rejects_implausible_target_year() {
    let server = MockServer::start();
    let table_mock = server.mock(|when, then| {
        when.method(POST).path("/data/table");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(genesis_body(CPI_TABLE_CONTENT));
    });

    let err = resolver(server.base_url()).resolve(1).await.unwrap_err();

    table_mock.assert_hits(0);
    assert!(matches!(err, KpaError::InvalidConfigValueError { .. }));
}
