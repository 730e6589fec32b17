mod cms_stub;

use predicates::prelude::*;
use serde_json::json;

use cms_stub::CmsStub;

fn render_cmd(stub: &CmsStub, path: &str) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dept-site");
    cmd.env_remove("CMS_API_TOKEN")
        .env_remove("SEARCH_HOST")
        .env_remove("SEARCH_API_KEY")
        .env_remove("ACCESSIBILITY_TOKEN")
        .args([
            "render",
            "--cms-url",
            &stub.base_url,
            "--cms-token",
            "test-token",
            "--path",
            path,
        ]);
    cmd
}

#[test]
fn renders_legacy_page_with_title_and_no_blocks() {
    let stub = CmsStub::spawn(vec![(
        "/api/pages",
        200,
        json!({ "data": [{ "id": 1, "attributes": { "title": "Test", "blocks": [] } }] }),
    )]);

    render_cmd(&stub, "/id/test")
        .assert()
        .success()
        .stdout(predicate::str::contains("<title>Test | Departemen</title>"))
        .stdout(predicate::str::contains("<html lang=\"id\">"))
        .stdout(predicate::str::contains("<main id=\"main\">\n</main>"))
        .stdout(predicate::str::contains("data-block-id").not());

    let pages = stub.requests_to("/api/pages");
    assert_eq!(pages.len(), 1);
    assert!(
        pages[0]
            .url
            .starts_with("/api/pages?filters[slug][$eq]=test&locale=id&"),
        "unexpected url: {}",
        pages[0].url
    );
    assert_eq!(pages[0].authorization.as_deref(), Some("Bearer test-token"));
    assert_eq!(pages[0].cache_control.as_deref(), Some("no-store"));
}

#[test]
fn missing_slug_fails_with_not_found() {
    let stub = CmsStub::spawn(vec![("/api/pages", 200, json!({ "data": [] }))]);

    render_cmd(&stub, "/en/missing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/en/missing returned 404"));
}

#[test]
fn unsupported_locale_is_not_found_without_fetching_the_page() {
    let stub = CmsStub::spawn(vec![]);

    render_cmd(&stub, "/fr/test")
        .assert()
        .failure()
        .stderr(predicate::str::contains("404"));
    assert!(stub.requests_to("/api/pages").is_empty());
}

#[test]
fn root_redirects_to_default_locale_homepage() {
    let stub = CmsStub::spawn(vec![
        (
            "/api/homepage",
            200,
            json!({ "data": { "id": 1, "attributes": { "blocks": [
                { "__component": "sections.rich-text", "id": 7, "content": "Selamat datang" },
                { "__component": "sections.not-yet-built", "id": 8 },
            ] } } }),
        ),
        (
            "/api/global",
            200,
            json!({ "data": { "id": 1, "attributes": { "siteName": "Departemen Fisika" } } }),
        ),
    ]);

    render_cmd(&stub, "/")
        .assert()
        .success()
        .stdout(predicate::str::contains("<title>Departemen Fisika</title>"))
        .stdout(predicate::str::contains("<p>Selamat datang</p>"))
        .stdout(predicate::str::contains("data-block-id=\"7\""))
        .stdout(predicate::str::contains("data-block-id=\"8\"").not());
}

#[test]
fn invalid_cms_url_fails_at_startup() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dept-site");
    cmd.args(["render", "--cms-url", "ftp://cms.example", "--path", "/id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http/https"));
}
