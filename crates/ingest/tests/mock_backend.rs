use chronicle_core::config::Config;
use chronicle_core::error::ChronicleError;
use chronicle_ingest::{get_reference_list, ingest};
use mockito::Matcher;
use serde_json::json;
use testkit::{padded_record, sample_records, test_service_account_with_token_uri};

fn config_for(server: &mockito::ServerGuard) -> Config {
    Config {
        customer_id: "c-123".to_string(),
        access_token: Some("test-token".to_string()),
        scheme: "http".to_string(),
        ingestion_host: server.host_with_port(),
        reference_list_host: server.host_with_port(),
        ..Config::default()
    }
}

#[tokio::test]
async fn ingest_posts_batches_with_bearer_token() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v2/unstructuredlogentries:batchCreate")
        .match_header("authorization", "Bearer test-token")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "customerId": "c-123",
            "logType": "STIX",
        })))
        .with_status(200)
        .with_body("{}")
        .expect(3)
        .create_async()
        .await;

    let cfg = Config {
        size_threshold_bytes: 80_000,
        ..config_for(&server)
    };
    let records: Vec<_> = (0..250).map(|i| padded_record(i, 580)).collect();

    let summary = ingest(&cfg, &records, "STIX").await?;

    assert_eq!(summary.requests, 3);
    assert_eq!(summary.entries, 250);
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn ingest_surfaces_backend_rejection() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v2/unstructuredlogentries:batchCreate")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"invalid logType"}"#)
        .create_async()
        .await;

    let err = ingest(&config_for(&server), &sample_records(5), "BOGUS")
        .await
        .unwrap_err();

    assert!(matches!(err, ChronicleError::Ingestion { status: 400, .. }));
    assert!(err.to_string().contains("invalid logType"));
    Ok(())
}

#[tokio::test]
async fn ingest_with_service_account_exchanges_token_once() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let token = server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(r#"{"access_token":"ya29.sa","expires_in":3600}"#)
        .expect(1)
        .create_async()
        .await;
    let batches = server
        .mock("POST", "/v2/unstructuredlogentries:batchCreate")
        .match_header("authorization", "Bearer ya29.sa")
        .with_status(200)
        .with_body("")
        .expect(2)
        .create_async()
        .await;

    let cfg = Config {
        access_token: None,
        service_account: Some(test_service_account_with_token_uri(&format!(
            "{}/token",
            server.url()
        ))),
        size_threshold_bytes: 80_000,
        log_batch_size: 100,
        ..config_for(&server)
    };
    let records: Vec<_> = (0..150).map(|i| padded_record(i, 580)).collect();

    let summary = ingest(&cfg, &records, "STIX").await?;

    assert_eq!(summary.requests, 2);
    token.assert_async().await;
    batches.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn ingest_rejects_bad_service_account_before_sending() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let cfg = Config {
        access_token: None,
        service_account: Some("{\"client_email\": 42}".to_string()),
        ..config_for(&server)
    };
    let err = ingest(&cfg, &sample_records(1), "STIX").await.unwrap_err();

    assert!(matches!(err, ChronicleError::Auth(_)));
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn reference_list_round_trip() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/lists/allowlist")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(r#"{"name":"allowlist","lines":[" 10.0.0.1 ","","  ","10.0.0.2"]}"#)
        .create_async()
        .await;

    let lines = get_reference_list(&config_for(&server), "allowlist").await?;

    assert_eq!(lines, vec!["10.0.0.1", "10.0.0.2"]);
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn reference_list_not_found() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v2/lists/missing")
        .with_status(404)
        .with_body(r#"{"error":{"code":404,"message":"list not found"}}"#)
        .create_async()
        .await;

    let err = get_reference_list(&config_for(&server), "missing")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("list not found"));
    Ok(())
}
