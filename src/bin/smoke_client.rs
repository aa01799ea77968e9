//! End-to-end exerciser for a running Linkboard server.
//!
//! Usage: `smoke-client [base-url]` (defaults to http://127.0.0.1:8080).
//! Exits non-zero on the first deviation from expected behavior.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct FavoriteRequest<'a> {
    platform: &'a str,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct TabRequest<'a> {
    key: &'a str,
    label: &'a str,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8080".to_string());
    let base = base.trim_end_matches('/').to_string();

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(10))
        .build()
        .context("failed to build HTTP client")?;

    // Unique email per run so repeated invocations don't collide.
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let email = format!("smoke-{stamp}@example.com");
    let password = "secret123";

    println!("[smoke] base URL: {base}");

    println!("[smoke] registering {email}");
    let resp = client
        .post(format!("{base}/auth/register"))
        .json(&CredentialsRequest {
            email: &email,
            password,
        })
        .send()
        .await
        .context("network failure calling /auth/register")?;
    expect_status(resp.status(), StatusCode::OK, "register")?;

    println!("[smoke] creating a favorite");
    let resp = client
        .post(format!("{base}/favorites"))
        .json(&FavoriteRequest {
            platform: "youtube",
            url: "https://youtube.com/watch?v=smoke",
            title: Some("Smoke test"),
        })
        .send()
        .await?;
    expect_status(resp.status(), StatusCode::OK, "create favorite")?;
    let favorite: Value = resp.json().await?;
    let favorite_id = favorite["id"]
        .as_str()
        .context("created favorite has no id")?
        .to_string();
    println!("[smoke] favorite id: {favorite_id}");

    println!("[smoke] listing favorites");
    let resp = client.get(format!("{base}/favorites")).send().await?;
    expect_status(resp.status(), StatusCode::OK, "list favorites")?;
    let favorites: Vec<Value> = resp.json().await?;
    if !favorites
        .iter()
        .any(|f| f["id"].as_str() == Some(favorite_id.as_str()))
    {
        bail!("created favorite missing from listing");
    }

    println!("[smoke] creating a rejected favorite (missing url)");
    let resp = client
        .post(format!("{base}/favorites"))
        .json(&serde_json::json!({ "platform": "youtube" }))
        .send()
        .await?;
    expect_status(resp.status(), StatusCode::BAD_REQUEST, "favorite validation")?;

    println!("[smoke] filling the tab quota");
    for i in 0..5 {
        let key = format!("tab-{i}");
        let label = format!("Tab {i}");
        let resp = client
            .post(format!("{base}/user-tabs"))
            .json(&TabRequest {
                key: &key,
                label: &label,
            })
            .send()
            .await?;
        expect_status(resp.status(), StatusCode::OK, "create tab")?;
    }

    let resp = client
        .post(format!("{base}/user-tabs"))
        .json(&TabRequest {
            key: "tab-5",
            label: "One too many",
        })
        .send()
        .await?;
    expect_status(resp.status(), StatusCode::BAD_REQUEST, "tab over quota")?;

    let resp = client
        .post(format!("{base}/user-tabs"))
        .json(&TabRequest {
            key: "tab-0",
            label: "Duplicate",
        })
        .send()
        .await?;
    expect_status(resp.status(), StatusCode::BAD_REQUEST, "duplicate tab")?;

    let resp = client.get(format!("{base}/user-tabs")).send().await?;
    expect_status(resp.status(), StatusCode::OK, "list tabs")?;
    let tabs: Vec<Value> = resp.json().await?;
    if tabs.len() != 5 {
        bail!("expected 5 tabs, got {}", tabs.len());
    }
    let keys: Vec<&str> = tabs.iter().filter_map(|t| t["key"].as_str()).collect();
    if keys != ["tab-0", "tab-1", "tab-2", "tab-3", "tab-4"] {
        bail!("tabs out of creation order: {keys:?}");
    }

    println!("[smoke] logging out");
    let resp = client.post(format!("{base}/auth/logout")).send().await?;
    expect_status(resp.status(), StatusCode::OK, "logout")?;

    let resp = client.get(format!("{base}/favorites")).send().await?;
    expect_status(
        resp.status(),
        StatusCode::UNAUTHORIZED,
        "favorites after logout",
    )?;

    println!("[smoke] logging back in");
    let resp = client
        .post(format!("{base}/auth/login"))
        .json(&CredentialsRequest {
            email: &email,
            password,
        })
        .send()
        .await?;
    expect_status(resp.status(), StatusCode::OK, "login")?;

    let resp = client.get(format!("{base}/favorites")).send().await?;
    expect_status(resp.status(), StatusCode::OK, "favorites after login")?;

    println!("[smoke] all checks passed");
    Ok(())
}

fn expect_status(actual: StatusCode, expected: StatusCode, stage: &str) -> anyhow::Result<()> {
    if actual != expected {
        bail!("{stage} returned {actual}, expected {expected}");
    }
    Ok(())
}
