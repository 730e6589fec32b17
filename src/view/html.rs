use std::borrow::Cow;

use chrono::Datelike as _;
use pulldown_cmark::{Options, Parser};

use crate::cms::MediaResolver;
use crate::content::{Link, Media};
use crate::i18n::Messages;

pub fn text(raw: &str) -> Cow<'_, str> {
    html_escape::encode_text(raw)
}

pub fn attr(raw: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(raw)
}

/// Rich text fields are authored as markdown in the CMS.
pub fn markdown(md: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(md, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// `<img>` for a media relation, or nothing when it has no usable URL.
pub fn image(media: Option<&Media>, resolver: &MediaResolver, class: &str) -> String {
    let Some(media) = media else {
        return String::new();
    };
    let Some(src) = resolver.resolve(media.url.as_deref()) else {
        return String::new();
    };
    let alt = media
        .alternative_text
        .as_deref()
        .or(media.caption.as_deref())
        .unwrap_or("");

    let mut out = format!(
        "<img class=\"{}\" src=\"{}\" alt=\"{}\" loading=\"lazy\"",
        attr(class),
        attr(&src),
        attr(alt)
    );
    if let (Some(width), Some(height)) = (media.width, media.height) {
        out.push_str(&format!(" width=\"{width}\" height=\"{height}\""));
    }
    out.push('>');
    out
}

/// `<a>` for a CMS link; `None` when the link has no target.
pub fn link(link: &Link, class: &str, fallback_label: &str) -> Option<String> {
    let url = link.url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
    let label = link
        .label
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(fallback_label);
    let external = link.is_external || url.starts_with("http") || url.starts_with("//");
    let target = if external {
        " target=\"_blank\" rel=\"noopener noreferrer\""
    } else {
        ""
    };
    Some(format!(
        "<a class=\"{}\" href=\"{}\"{target}>{}</a>",
        attr(class),
        attr(url),
        text(label)
    ))
}

/// Wrap `inner` in `<tag class=…>` unless the value is missing or blank.
pub fn optional(tag: &str, class: &str, value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => format!("<{tag} class=\"{class}\">{}</{tag}>", text(value)),
        None => String::new(),
    }
}

/// Localized calendar date for an ISO date (`2024-03-12`) or RFC 3339
/// timestamp. Unparseable input yields `None`.
pub fn format_date(raw: &str, messages: &Messages) -> Option<String> {
    let raw = raw.trim();
    let date = chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;

    Some(
        messages
            .date_format
            .replace("{day}", &date.day().to_string())
            .replace("{month}", messages.month(date.month()))
            .replace("{year}", &date.year().to_string()),
    )
}

pub fn date_tag(raw: Option<&str>, messages: &Messages) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    match format_date(raw, messages) {
        Some(formatted) => format!(
            "<time datetime=\"{}\">{}</time>",
            attr(raw.trim()),
            text(&formatted)
        ),
        None => String::new(),
    }
}

/// Previous/next navigation for paginated listings.
pub fn pagination(
    base_path: &str,
    params: &[(&str, String)],
    page: u32,
    page_count: u32,
    messages: &Messages,
) -> String {
    if page_count <= 1 {
        return String::new();
    }

    let href = |target: u32| {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            if !value.is_empty() {
                query.append_pair(key, value);
            }
        }
        query.append_pair("page", &target.to_string());
        format!("{base_path}?{}", query.finish())
    };

    let mut out = String::from("<nav class=\"pagination\">");
    if page > 1 {
        out.push_str(&format!(
            "<a rel=\"prev\" href=\"{}\">{}</a>",
            attr(&href(page - 1)),
            text(&messages.previous)
        ));
    }
    out.push_str(&format!(
        "<span class=\"pagination__status\">{}</span>",
        text(&messages.page_of(page, page_count))
    ));
    if page < page_count {
        out.push_str(&format!(
            "<a rel=\"next\" href=\"{}\">{}</a>",
            attr(&href(page + 1)),
            text(&messages.next)
        ));
    }
    out.push_str("</nav>");
    out
}
