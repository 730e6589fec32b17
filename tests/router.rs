use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt as _;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use dept_site::cms::{CmsError, ContentSource, MediaResolver};
use dept_site::i18n::Catalog;
use dept_site::server::router;
use dept_site::site::Site;
use dept_site::view::AccessibilityWidget;

/// Serves `/pages` and `/staffs`, fails `/events`, and panics on `/facilities`.
struct FakeCms;

#[async_trait]
impl ContentSource for FakeCms {
    async fn fetch(&self, path: &str, query: &Value) -> Result<Value, CmsError> {
        match path {
            "/pages" => {
                let slug = query
                    .pointer("/filters/slug/$eq")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                if slug == "about" {
                    Ok(json!({ "data": [{ "id": 1, "attributes": {
                        "title": "About",
                        "blocks": [
                            { "__component": "sections.faq-section", "id": 1,
                              "items": [{ "question": "Where?", "answer": "Here." }] },
                            { "__component": "unknown.type", "id": 2 },
                            { "__component": "sections.upcoming-events", "id": 3 },
                        ],
                    } }] }))
                } else {
                    Ok(json!({ "data": [] }))
                }
            }
            "/staffs" => Ok(json!({
                "data": [{ "id": 1, "name": "Ana", "slug": "ana" }],
                "meta": { "pagination": { "page": 1, "pageSize": 12, "pageCount": 2, "total": 13 } },
            })),
            "/events" => Err(CmsError::Status {
                url: path.to_owned(),
                status: 503,
                body: "unavailable".to_owned(),
            }),
            "/facilities" => panic!("facilities backend exploded"),
            _ => Ok(json!({ "data": null })),
        }
    }
}

fn site() -> Site {
    Site {
        cms: Arc::new(FakeCms),
        media: MediaResolver::new("http://cms.local"),
        catalog: Arc::new(Catalog::load().expect("load catalogs")),
        search: None,
        widget: AccessibilityWidget::from_token(Some("widget-token")),
    }
}

async fn get(path: &str) -> (StatusCode, String, Option<String>) {
    let response = router(site(), None)
        .oneshot(Request::get(path).body(Body::empty()).expect("build request"))
        .await
        .expect("route request");
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);
    let body = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned(), location)
}

#[tokio::test]
async fn root_redirects_to_indonesian() {
    let (status, _, location) = get("/").await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location.as_deref(), Some("/id"));
}

#[tokio::test]
async fn healthz_is_ok() {
    let (status, body, _) = get("/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok\n");
}

#[tokio::test]
async fn content_page_renders_known_blocks_in_order() {
    let (status, body, _) = get("/en/about").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>About | Department</title>"));
    assert!(body.contains("<summary>Where?</summary>"));
    assert!(!body.contains("data-block-id=\"2\""));
    // The events feed failed; its section still renders, empty.
    assert!(body.contains("No upcoming events."));
    let faq = body.find("data-block-id=\"1\"").expect("faq block");
    let events = body.find("data-block-id=\"3\"").expect("events block");
    assert!(faq < events);
    assert!(body.contains("data-account=\"widget-token\" data-language=\"en\""));
    assert!(body.contains("hreflang=\"id\" href=\"/id/about\""));
}

#[tokio::test]
async fn unknown_slug_is_a_localized_404() {
    let (status, body, _) = get("/id/tidak-ada").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("<html lang=\"id\">"));
}

#[tokio::test]
async fn unsupported_locale_is_404() {
    for path in ["/fr", "/fr/about", "/de/news", "/xx/staff/ana"] {
        let (status, _, _) = get(path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn unmatched_path_is_404() {
    let (status, body, _) = get("/en/news/a/b").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("<html lang=\"en\">"));
}

#[tokio::test]
async fn panicking_assembly_is_a_500_page() {
    let (status, body, _) = get("/en/facilities").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Something went wrong"));
}

#[tokio::test]
async fn staff_chunk_endpoint_returns_json() {
    let (status, body, _) = get("/api/id/staff?page=abc").await;
    assert_eq!(status, StatusCode::OK);
    let chunk: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(chunk["page"], 1);
    assert_eq!(chunk["pageCount"], 2);
    assert_eq!(chunk["hasMore"], true);
    assert_eq!(chunk["items"][0]["name"], "Ana");
    assert!(chunk["html"].as_str().unwrap_or_default().contains("/id/staff/ana"));
}

#[tokio::test]
async fn serves_assets_from_directory() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    std::fs::write(dir.path().join("site.css"), "body { margin: 0; }\n")?;

    let response = router(site(), Some(dir.path()))
        .oneshot(Request::get("/assets/site.css").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await?.to_bytes();
    assert_eq!(&body[..], b"body { margin: 0; }\n");
    Ok(())
}
