mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/v1/health", server.base_url))
        .send()
        .await?;

    // OK or SERVICE_UNAVAILABLE are both acceptable as a liveness check
    let status = res.status();
    assert!(
        status == StatusCode::OK || status == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        status
    );

    let body = res.json::<serde_json::Value>().await?;
    if status == StatusCode::OK {
        assert_eq!(body["success"], true, "unexpected body: {}", body);
        assert_eq!(body["data"]["database"], "ok", "unexpected body: {}", body);
    } else {
        // Failures use the standard error body
        assert_eq!(body["error"], true, "unexpected body: {}", body);
        assert_eq!(body["code"], "SERVICE_UNAVAILABLE", "unexpected body: {}", body);
    }
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(&server.base_url).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Apostila API");
    assert!(body["data"]["endpoints"].is_object());
    Ok(())
}
