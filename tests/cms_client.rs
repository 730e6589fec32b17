mod cms_stub;

use serde_json::json;
use url::Url;

use cms_stub::CmsStub;
use dept_site::cms::{CmsClient, CmsError, ContentSource as _, fetch_entries};
use dept_site::config::CmsConfig;

fn client(stub: &CmsStub, token: Option<&str>) -> CmsClient {
    let config = CmsConfig {
        base_url: Url::parse(&format!("{}/", stub.base_url)).expect("stub url"),
        api_token: token.map(ToOwned::to_owned),
    };
    CmsClient::new(&config).expect("build client")
}

#[tokio::test]
async fn sends_bearer_token_and_encoded_query() -> anyhow::Result<()> {
    let stub = CmsStub::spawn(vec![("/api/news", 200, json!({ "data": [] }))]);
    let client = client(&stub, Some("secret"));

    client
        .fetch(
            "news",
            &json!({ "filters": { "slug": { "$eq": "a b" } }, "sort": ["publishedAt:desc"] }),
        )
        .await?;

    let requests = stub.requests_to("/api/news");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(
        requests[0].url,
        "/api/news?filters[slug][$eq]=a+b&sort[0]=publishedAt%3Adesc"
    );
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer secret"));
    Ok(())
}

#[tokio::test]
async fn missing_token_still_requests() -> anyhow::Result<()> {
    let stub = CmsStub::spawn(vec![("/api/global", 200, json!({ "data": null }))]);
    let client = client(&stub, None);

    client.fetch("/global", &json!({})).await?;

    let requests = stub.requests_to("/api/global");
    assert_eq!(requests[0].url, "/api/global");
    assert_eq!(requests[0].authorization, None);
    Ok(())
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    let stub = CmsStub::spawn(vec![(
        "/api/pages",
        403,
        json!({ "error": { "status": 403, "message": "Forbidden" } }),
    )]);
    let client = client(&stub, Some("secret"));

    let err = client.fetch("/pages", &json!({})).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    match err {
        CmsError::Status { body, .. } => assert!(body.contains("Forbidden")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let stub = CmsStub::spawn(vec![]);
    let client = client(&stub, None);
    drop(stub);

    let err = client.fetch("/pages", &json!({})).await.unwrap_err();
    assert!(matches!(err, CmsError::Transport { .. }), "{err}");
}

#[tokio::test]
async fn entries_are_normalized_with_pagination() -> anyhow::Result<()> {
    let stub = CmsStub::spawn(vec![(
        "/api/news",
        200,
        json!({
            "data": [{ "id": 3, "attributes": {
                "title": "Wisuda",
                "cover": { "data": { "id": 9, "attributes": { "url": "/uploads/w.jpg" } } },
            } }],
            "meta": { "pagination": { "page": 2, "pageSize": 1, "pageCount": 5, "total": 5 } },
        }),
    )]);
    let client = client(&stub, None);

    let entries = fetch_entries(&client, "/news", &json!({})).await?;
    assert_eq!(
        entries.data,
        json!([{ "id": 3, "title": "Wisuda", "cover": { "id": 9, "url": "/uploads/w.jpg" } }])
    );
    let pagination = entries.pagination.expect("pagination meta");
    assert_eq!((pagination.page, pagination.page_count), (2, 5));
    Ok(())
}
