use std::io::Write as _;

use anyhow::Context as _;
use axum::body::Body;
use axum::http::{Request, header};
use tower::ServiceExt as _;

use crate::cli::RenderArgs;
use crate::config::SiteConfig;
use crate::server::router;
use crate::site::Site;

const MAX_REDIRECTS: usize = 3;

pub async fn run(args: RenderArgs) -> anyhow::Result<()> {
    let config = SiteConfig::from_args(&args.site)?;
    let site = Site::from_config(&config)?;
    let html = render_path(site, &args.path).await?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(html.as_bytes())
        .context("write rendered page")?;
    stdout.flush().context("flush stdout")?;
    Ok(())
}

/// Route one request through the site router and return the page body.
/// Redirects are followed; any other non-2xx status is an error.
pub async fn render_path(site: Site, path: &str) -> anyhow::Result<String> {
    let app = router(site, None);
    let mut path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    for _ in 0..=MAX_REDIRECTS {
        let request = Request::get(&path)
            .body(Body::empty())
            .with_context(|| format!("build request for {path}"))?;
        let response = app
            .clone()
            .oneshot(request)
            .await
            .with_context(|| format!("route {path}"))?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .with_context(|| format!("{path} redirected without a location"))?
                .to_string();
            tracing::debug!(from = %path, to = %location, "following redirect");
            path = location;
            continue;
        }

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .with_context(|| format!("read body of {path}"))?;
        if !status.is_success() {
            anyhow::bail!("{path} returned {status}");
        }
        return String::from_utf8(body.to_vec()).with_context(|| format!("{path} is not UTF-8"));
    }
    anyhow::bail!("too many redirects rendering {path}")
}
