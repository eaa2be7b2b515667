//! E2E tests for the blogs endpoint
//! These tests run against a real server instance (`blogfeed --port 3000`)
use reqwest::Client;
use serde_json::Value;

use blogfeed::feed::PostDto;

const BASE_URL: &str = "http://localhost:3000";

#[tokio::test]
#[ignore] // Run with: cargo test --test e2e_blogs -- --ignored
async fn test_blogs_returns_json_array() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();

    let response = client
        .get(format!("{}/mi-api/v1/blogs", BASE_URL))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"));

    let body: Value = response.json().await?;
    assert!(body.is_array());
    for post in body.as_array().unwrap() {
        assert!(post["tags"].is_array(), "tags must never be null");
    }

    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_blogs_deserializes_into_dtos() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();

    let posts: Vec<PostDto> = client
        .get(format!("{}/mi-api/v1/blogs", BASE_URL))
        .send()
        .await?
        .json()
        .await?;

    for post in &posts {
        assert_eq!(post.date.len(), "YYYY-MM-DD HH:MM:SS".len());
        assert!(post.link.starts_with("http"));
        if let Some(medium) = &post.image_medium {
            assert!(medium.source_url.ends_with(&medium.size.file));
        }
    }

    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_blogs_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();
    let url = format!("{}/mi-api/v1/blogs", BASE_URL);

    let first = client.get(&url).send().await?.bytes().await?;
    let second = client.get(&url).send().await?.bytes().await?;
    assert_eq!(first, second);

    Ok(())
}
