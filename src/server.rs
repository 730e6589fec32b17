use std::future::Future;
use std::path::Path as FsPath;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use axum::routing::get;
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cli::ServeArgs;
use crate::config::SiteConfig;
use crate::content::GlobalSettings;
use crate::locale::Locale;
use crate::search::SearchCategory;
use crate::site::events::When;
use crate::site::search::SearchParams;
use crate::site::{
    PageOutcome, Site, degrade, events, facilities, global, home, news, page_number, pages,
    publications, search, staff,
};

#[derive(Clone, Debug)]
pub struct AppState {
    pub site: Site,
}

/// Query parameters shared by the listing routes. Values arrive as raw
/// strings: forms submit empty values for "all", and a stray value should not
/// turn a listing into a 400.
#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    page: Option<String>,
    group: Option<String>,
    year: Option<String>,
    when: Option<String>,
}

impl ListQuery {
    fn page(&self) -> u32 {
        page_number(self.page.as_deref().and_then(|p| p.trim().parse().ok()))
    }

    fn year(&self) -> Option<i32> {
        self.year.as_deref().and_then(|y| y.trim().parse().ok())
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    q: Option<String>,
    category: Option<String>,
    page: Option<String>,
}

pub fn router(site: Site, assets_dir: Option<&FsPath>) -> Router {
    let mut app = Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/", get(|| async { Redirect::temporary(&Locale::default().path("/")) }))
        .route("/:locale", get(home_handler))
        .route("/:locale/news", get(news_list_handler))
        .route("/:locale/news/:slug", get(news_detail_handler))
        .route("/:locale/events", get(events_list_handler))
        .route("/:locale/events/:slug", get(event_detail_handler))
        .route("/:locale/staff", get(staff_list_handler))
        .route("/:locale/staff/:slug", get(staff_detail_handler))
        .route("/:locale/facilities", get(facilities_list_handler))
        .route("/:locale/facilities/:slug", get(facility_detail_handler))
        .route("/:locale/publications", get(publications_list_handler))
        .route("/:locale/search", get(search_handler))
        .route("/:locale/:slug", get(content_page_handler))
        .route("/api/:locale/staff", get(staff_chunk_handler))
        .route("/api/:locale/publications", get(publications_chunk_handler))
        .fallback(fallback_handler);

    match assets_dir {
        Some(dir) if dir.is_dir() => {
            app = app.nest_service("/assets", ServeDir::new(dir));
        }
        Some(dir) => {
            tracing::warn!(dir = %dir.display(), "assets directory not found; /assets is not served");
        }
        None => {}
    }

    app.layer(TraceLayer::new_for_http())
        .with_state(AppState { site })
}

pub async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = SiteConfig::from_args(&args.site)?;
    let site = Site::from_config(&config)?;
    tracing::info!(
        cms = %config.cms.base_url,
        search = config.search.is_some(),
        widget = site.widget.is_some(),
        "site configured"
    );
    let app = router(site, Some(&args.assets_dir));

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

/// Assemble and render a page on its own task. A panic anywhere in assembly or
/// rendering becomes the generic error page instead of a dropped connection.
async fn page<F, Fut>(state: AppState, locale: Locale, assemble: F) -> Response
where
    F: FnOnce(Site) -> Fut,
    Fut: Future<Output = PageOutcome> + Send + 'static,
{
    let outcome = assemble(state.site.clone());
    let site = state.site.clone();
    let rendered = tokio::spawn(async move {
        match outcome.await {
            PageOutcome::Found(page) => Some(site.document(&page)),
            PageOutcome::NotFound => None,
        }
    })
    .await;

    match rendered {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => not_found(&state.site, locale).await,
        Err(err) => {
            tracing::error!(%err, %locale, "page rendering failed");
            error_page(&state.site, locale)
        }
    }
}

async fn not_found(site: &Site, locale: Locale) -> Response {
    let global = degrade("global", global::fetch(site.cms.as_ref(), locale).await);
    let messages = site.messages(locale);
    let html = site.notice_page(
        locale,
        "/",
        global,
        &messages.not_found_title,
        &messages.not_found_body,
    );
    (StatusCode::NOT_FOUND, Html(html)).into_response()
}

fn error_page(site: &Site, locale: Locale) -> Response {
    let messages = site.messages(locale);
    let html = site.notice_page(
        locale,
        "/",
        GlobalSettings::default(),
        &messages.error_title,
        &messages.error_body,
    );
    (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
}

/// The not-found response for a request whose locale prefix is unsupported.
async fn unsupported_locale(state: &AppState, raw: &str) -> Response {
    tracing::debug!(locale = raw, "unsupported locale prefix");
    not_found(&state.site, Locale::default()).await
}

async fn fallback_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let locale = uri
        .path()
        .trim_start_matches('/')
        .split('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .unwrap_or_default();
    not_found(&state.site, locale).await
}

async fn home_handler(State(state): State<AppState>, Path(locale): Path<String>) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return unsupported_locale(&state, &locale).await;
    };
    page(state, locale, move |site| async move {
        home::home_page(&site, locale).await
    })
    .await
}

async fn content_page_handler(
    State(state): State<AppState>,
    Path((locale, slug)): Path<(String, String)>,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return unsupported_locale(&state, &locale).await;
    };
    page(state, locale, move |site| async move {
        pages::content_page(&site, locale, &slug).await
    })
    .await
}

async fn news_list_handler(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return unsupported_locale(&state, &locale).await;
    };
    let page_number = query.page();
    page(state, locale, move |site| async move {
        news::news_list(&site, locale, page_number).await
    })
    .await
}

async fn news_detail_handler(
    State(state): State<AppState>,
    Path((locale, slug)): Path<(String, String)>,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return unsupported_locale(&state, &locale).await;
    };
    page(state, locale, move |site| async move {
        news::news_detail(&site, locale, &slug).await
    })
    .await
}

async fn events_list_handler(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return unsupported_locale(&state, &locale).await;
    };
    let when = When::parse(query.when.as_deref());
    let page_number = query.page();
    page(state, locale, move |site| async move {
        events::events_list(&site, locale, when, page_number).await
    })
    .await
}

async fn event_detail_handler(
    State(state): State<AppState>,
    Path((locale, slug)): Path<(String, String)>,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return unsupported_locale(&state, &locale).await;
    };
    page(state, locale, move |site| async move {
        events::event_detail(&site, locale, &slug).await
    })
    .await
}

async fn staff_list_handler(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return unsupported_locale(&state, &locale).await;
    };
    let page_number = query.page();
    page(state, locale, move |site| async move {
        staff::staff_list(&site, locale, page_number, query.group.as_deref()).await
    })
    .await
}

async fn staff_detail_handler(
    State(state): State<AppState>,
    Path((locale, slug)): Path<(String, String)>,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return unsupported_locale(&state, &locale).await;
    };
    page(state, locale, move |site| async move {
        staff::staff_detail(&site, locale, &slug).await
    })
    .await
}

async fn facilities_list_handler(
    State(state): State<AppState>,
    Path(locale): Path<String>,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return unsupported_locale(&state, &locale).await;
    };
    page(state, locale, move |site| async move {
        facilities::facilities_list(&site, locale).await
    })
    .await
}

async fn facility_detail_handler(
    State(state): State<AppState>,
    Path((locale, slug)): Path<(String, String)>,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return unsupported_locale(&state, &locale).await;
    };
    page(state, locale, move |site| async move {
        facilities::facility_detail(&site, locale, &slug).await
    })
    .await
}

async fn publications_list_handler(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return unsupported_locale(&state, &locale).await;
    };
    let page_number = query.page();
    let year = query.year();
    page(state, locale, move |site| async move {
        publications::publications_list(&site, locale, page_number, year).await
    })
    .await
}

async fn search_handler(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return unsupported_locale(&state, &locale).await;
    };
    let params = SearchParams {
        query: query.q.unwrap_or_default(),
        category: SearchCategory::parse(query.category.as_deref()),
        page: page_number(query.page.as_deref().and_then(|p| p.trim().parse().ok())),
    };
    page(state, locale, move |site| async move {
        search::search_page(&site, locale, &params).await
    })
    .await
}

async fn staff_chunk_handler(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    Json(staff::staff_chunk(&state.site, locale, query.page(), query.group.as_deref()).await)
        .into_response()
}

async fn publications_chunk_handler(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    Json(publications::publications_chunk(&state.site, locale, query.page(), query.year()).await)
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_is_lenient() {
        let query = ListQuery {
            page: Some("abc".to_string()),
            year: Some(String::new()),
            ..ListQuery::default()
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.year(), None);

        let query = ListQuery {
            page: Some(" 3 ".to_string()),
            year: Some("2022".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(query.page(), 3);
        assert_eq!(query.year(), Some(2022));
    }
}
