mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

async fn batch_check(server: &common::TestServer, body: serde_json::Value, role: &str) -> Result<reqwest::Response> {
    Ok(reqwest::Client::new()
        .post(server.url("/api/permissions/batch-check"))
        .bearer_auth(common::token(7, role))
        .json(&body)
        .send()
        .await?)
}

#[tokio::test]
async fn empty_list_is_a_bad_request() -> Result<()> {
    let server = common::start_server().await?;
    let res = batch_check(&server, json!({"permissions": []}), "teacher").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn non_array_is_a_bad_request() -> Result<()> {
    let server = common::start_server().await?;
    let res = batch_check(&server, json!({"permissions": "A_EDIT"}), "teacher").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = batch_check(&server, json!({"permissions": ["A_EDIT", 42]}), "teacher").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn admin_is_granted_everything_without_the_database() -> Result<()> {
    let server = common::start_server().await?;
    let res = batch_check(&server, json!({"permissions": ["A_EDIT", "B_VIEW", "A_EDIT"]}), "admin").await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["results"], json!({"A_EDIT": true, "B_VIEW": true}));
    assert_eq!(body["data"]["summary"], json!({"total": 2, "granted": 2, "denied": 0}));
    assert_eq!(body["meta"]["isAdmin"], true);
    assert_eq!(body["meta"]["userRole"], "admin");
    Ok(())
}

#[tokio::test]
async fn database_failure_returns_no_partial_results() -> Result<()> {
    let server = common::start_server().await?;
    let res = batch_check(&server, json!({"permissions": ["A_EDIT"]}), "teacher").await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());
    Ok(())
}
