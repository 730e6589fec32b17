//! Listing cards shared by block sections and the collection pages.

use crate::cms::MediaResolver;
use crate::content::{EventItem, Facility, NewsItem, Publication, StaffMember};
use crate::i18n::Messages;
use crate::locale::Locale;
use crate::view::html::{attr, date_tag, image, optional, text};

fn detail_href(locale: Locale, collection: &str, slug: Option<&str>) -> Option<String> {
    let slug = slug.map(str::trim).filter(|s| !s.is_empty())?;
    Some(locale.path(&format!("{collection}/{slug}")))
}

fn titled(href: Option<&str>, tag: &str, class: &str, title: &str) -> String {
    match href {
        Some(href) => format!(
            "<{tag} class=\"{class}\"><a href=\"{}\">{}</a></{tag}>",
            attr(href),
            text(title)
        ),
        None => format!("<{tag} class=\"{class}\">{}</{tag}>", text(title)),
    }
}

pub fn news_card(
    item: &NewsItem,
    locale: Locale,
    messages: &Messages,
    media: &MediaResolver,
) -> String {
    let href = detail_href(locale, "news", item.slug.as_deref());
    let mut out = String::from("<article class=\"card card--news\">");
    out.push_str(&image(item.cover.as_ref(), media, "card__image"));
    out.push_str(&optional("span", "card__category", item.category.as_deref()));
    out.push_str(&titled(href.as_deref(), "h3", "card__title", &item.title));
    out.push_str(&date_tag(item.published_at.as_deref(), messages));
    out.push_str(&optional("p", "card__excerpt", item.excerpt.as_deref()));
    out.push_str("</article>");
    out
}

pub fn event_card(
    item: &EventItem,
    locale: Locale,
    messages: &Messages,
    media: &MediaResolver,
) -> String {
    let href = detail_href(locale, "events", item.slug.as_deref());
    let mut out = String::from("<article class=\"card card--event\">");
    out.push_str(&image(item.cover.as_ref(), media, "card__image"));
    out.push_str(&titled(href.as_deref(), "h3", "card__title", &item.title));
    out.push_str("<p class=\"card__when\">");
    out.push_str(&date_tag(item.start_date.as_deref(), messages));
    let end = date_tag(item.end_date.as_deref(), messages);
    if !end.is_empty() && item.end_date != item.start_date {
        out.push_str(" &ndash; ");
        out.push_str(&end);
    }
    out.push_str("</p>");
    if let Some(location) = item.location.as_deref().filter(|l| !l.trim().is_empty()) {
        out.push_str(&format!(
            "<p class=\"card__location\"><span>{}:</span> {}</p>",
            text(&messages.location),
            text(location.trim())
        ));
    }
    out.push_str("</article>");
    out
}

pub fn staff_card(
    member: &StaffMember,
    locale: Locale,
    messages: &Messages,
    media: &MediaResolver,
) -> String {
    let href = detail_href(locale, "staff", member.slug.as_deref());
    let mut out = String::from("<article class=\"card card--staff\">");
    out.push_str(&image(member.photo.as_ref(), media, "card__photo"));
    out.push_str(&titled(href.as_deref(), "h3", "card__title", &member.name));
    out.push_str(&optional("p", "card__position", member.position.as_deref()));
    if let Some(expertise) = member.expertise.as_deref().filter(|e| !e.trim().is_empty()) {
        out.push_str(&format!(
            "<p class=\"card__expertise\"><span>{}:</span> {}</p>",
            text(&messages.staff_expertise),
            text(expertise.trim())
        ));
    }
    out.push_str("</article>");
    out
}

pub fn facility_card(
    facility: &Facility,
    locale: Locale,
    messages: &Messages,
    media: &MediaResolver,
) -> String {
    let href = detail_href(locale, "facilities", facility.slug.as_deref());
    let mut out = String::from("<article class=\"card card--facility\">");
    out.push_str(&image(facility.images.first(), media, "card__image"));
    out.push_str(&titled(href.as_deref(), "h3", "card__title", &facility.name));
    if let Some(location) = facility.location.as_deref().filter(|l| !l.trim().is_empty()) {
        out.push_str(&format!(
            "<p class=\"card__location\"><span>{}:</span> {}</p>",
            text(&messages.location),
            text(location.trim())
        ));
    }
    out.push_str("</article>");
    out
}

pub fn publication_item(publication: &Publication, messages: &Messages) -> String {
    let href = publication
        .url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .map(ToOwned::to_owned)
        .or_else(|| {
            publication
                .doi
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map(|doi| format!("https://doi.org/{}", doi.trim()))
        });

    let mut out = String::from("<li class=\"publication\">");
    out.push_str(&titled(href.as_deref(), "h3", "publication__title", &publication.title));
    if let Some(authors) = publication.authors.as_deref().filter(|a| !a.trim().is_empty()) {
        out.push_str(&format!(
            "<p class=\"publication__authors\"><span>{}:</span> {}</p>",
            text(&messages.publication_authors),
            text(authors.trim())
        ));
    }
    let venue = publication.venue.as_deref().map(str::trim).filter(|v| !v.is_empty());
    match (venue, publication.year) {
        (Some(venue), Some(year)) => out.push_str(&format!(
            "<p class=\"publication__venue\"><span>{}:</span> {} ({year})</p>",
            text(&messages.publication_venue),
            text(venue)
        )),
        (Some(venue), None) => out.push_str(&format!(
            "<p class=\"publication__venue\"><span>{}:</span> {}</p>",
            text(&messages.publication_venue),
            text(venue)
        )),
        (None, Some(year)) => out.push_str(&format!("<p class=\"publication__year\">{year}</p>")),
        (None, None) => {}
    }
    out.push_str("</li>");
    out
}
