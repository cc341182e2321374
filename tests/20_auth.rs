mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_rejects_invalid_email() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let payload = json!({
        "name": "Aluno",
        "email": "not-an-email",
        "password": "long-enough-password"
    });

    let res = client
        .post(format!("{}/v1/auth/register", server.base_url))
        .json(&payload)
        .send()
        .await?;

    // 400 with a database, 503 without one (the pool is acquired before
    // validation runs)
    assert!(
        res.status() == StatusCode::BAD_REQUEST
            || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true, "error body expected: {}", body);
    assert!(body.get("code").is_some(), "missing code field: {}", body);
    Ok(())
}

#[tokio::test]
async fn register_requires_a_json_body() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/v1/auth/register", server.base_url))
        .send()
        .await?;

    assert!(
        res.status().is_client_error(),
        "expected client error, got {}",
        res.status()
    );
    Ok(())
}

#[tokio::test]
async fn login_with_unknown_user_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let payload = json!({
        "email": "nobody@example.com",
        "password": "whatever-password"
    });

    let res = client
        .post(format!("{}/v1/auth/login", server.base_url))
        .json(&payload)
        .send()
        .await?;

    assert!(
        res.status() == StatusCode::UNAUTHORIZED
            || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );
    Ok(())
}

#[tokio::test]
async fn login_with_empty_credentials_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let payload = json!({ "email": "", "password": "" });

    let res = client
        .post(format!("{}/v1/auth/login", server.base_url))
        .json(&payload)
        .send()
        .await?;

    // Empty credentials are rejected before any query runs
    assert!(
        res.status() == StatusCode::UNAUTHORIZED
            || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );
    Ok(())
}

#[tokio::test]
async fn logout_succeeds_without_state() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/v1/auth/logout", server.base_url))
        .send()
        .await?;

    assert!(
        res.status() == StatusCode::NO_CONTENT
            || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );
    Ok(())
}
