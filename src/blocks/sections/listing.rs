use serde::Deserialize;

use crate::blocks::render::{RenderContext, SectionView};
use crate::content::{Facility, Link, Media, Publication, StaffMember, nullable};
use crate::view::cards::{event_card, facility_card, news_card, publication_item, staff_card};
use crate::view::html::{attr, image, link, optional, text};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    pub title: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub file: Option<Media>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentArchive {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub documents: Vec<Document>,
}

impl SectionView for DocumentArchive {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut documents = self.documents.iter().collect::<Vec<_>>();
        // Newest first; undated documents keep their authored order at the end.
        documents.sort_by(|a, b| b.year.cmp(&a.year));

        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str("<table class=\"document-archive\"><tbody>");
        for doc in documents {
            let file = doc.file.as_ref();
            let title = doc
                .title
                .as_deref()
                .or_else(|| file.and_then(|f| f.name.as_deref()))
                .unwrap_or("");
            out.push_str("<tr>");
            out.push_str(&format!("<td class=\"document-archive__title\">{}", text(title)));
            out.push_str(&optional("p", "document-archive__description", doc.description.as_deref()));
            out.push_str("</td>");
            match doc.year {
                Some(year) => out.push_str(&format!("<td class=\"document-archive__year\">{year}</td>")),
                None => out.push_str("<td class=\"document-archive__year\"></td>"),
            }
            out.push_str("<td>");
            if let Some(href) = file.and_then(|f| ctx.media.resolve(f.url.as_deref())) {
                let meta = file
                    .map(|f| file_meta(f.ext.as_deref(), f.size))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "<a class=\"document-archive__download\" href=\"{}\" download>{}{}</a>",
                    attr(&href),
                    text(&ctx.messages.download),
                    text(&meta)
                ));
            }
            out.push_str("</td></tr>");
        }
        out.push_str("</tbody></table>");
        out
    }
}

/// ` (PDF, 1.2 MB)` style suffix; empty when nothing is known.
fn file_meta(ext: Option<&str>, size_kb: Option<f64>) -> String {
    let ext = ext
        .map(|e| e.trim().trim_start_matches('.').to_ascii_uppercase())
        .filter(|e| !e.is_empty());
    let size = size_kb.filter(|s| *s > 0.0).map(|kb| {
        if kb >= 1024.0 {
            format!("{:.1} MB", kb / 1024.0)
        } else {
            format!("{kb:.0} KB")
        }
    });
    match (ext, size) {
        (Some(ext), Some(size)) => format!(" ({ext}, {size})"),
        (Some(ext), None) => format!(" ({ext})"),
        (None, Some(size)) => format!(" ({size})"),
        (None, None) => String::new(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicationList {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub publications: Vec<Publication>,
}

impl SectionView for PublicationList {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str("<ul class=\"publication-list\">");
        for publication in &self.publications {
            out.push_str(&publication_item(publication, ctx.messages));
        }
        out.push_str("</ul>");
        out.push_str(&format!(
            "<a class=\"section-more\" href=\"{}\">{}</a>",
            attr(&ctx.locale.path("/publications")),
            text(&ctx.messages.nav.publications)
        ));
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LatestNews {
    pub title: Option<String>,
    pub limit: Option<usize>,
}

impl SectionView for LatestNews {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let limit = self.limit.unwrap_or(ctx.latest_news.len());
        let mut out = optional("h2", "section-title", self.title.as_deref());
        if ctx.latest_news.is_empty() {
            out.push_str(&format!("<p class=\"empty\">{}</p>", text(&ctx.messages.no_news)));
        } else {
            out.push_str("<div class=\"card-grid\">");
            for item in ctx.latest_news.iter().take(limit) {
                out.push_str(&news_card(item, ctx.locale, ctx.messages, ctx.media));
            }
            out.push_str("</div>");
        }
        out.push_str(&format!(
            "<a class=\"section-more\" href=\"{}\">{}</a>",
            attr(&ctx.locale.path("/news")),
            text(&ctx.messages.all_news)
        ));
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpcomingEvents {
    pub title: Option<String>,
    pub limit: Option<usize>,
}

impl SectionView for UpcomingEvents {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let limit = self.limit.unwrap_or(ctx.upcoming_events.len());
        let mut out = optional("h2", "section-title", self.title.as_deref());
        if ctx.upcoming_events.is_empty() {
            out.push_str(&format!("<p class=\"empty\">{}</p>", text(&ctx.messages.no_events)));
        } else {
            out.push_str("<div class=\"card-grid\">");
            for item in ctx.upcoming_events.iter().take(limit) {
                out.push_str(&event_card(item, ctx.locale, ctx.messages, ctx.media));
            }
            out.push_str("</div>");
        }
        out.push_str(&format!(
            "<a class=\"section-more\" href=\"{}\">{}</a>",
            attr(&ctx.locale.path("/events")),
            text(&ctx.messages.all_events)
        ));
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaffGrid {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub staff: Vec<StaffMember>,
}

impl SectionView for StaffGrid {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str("<div class=\"card-grid card-grid--staff\">");
        for member in &self.staff {
            out.push_str(&staff_card(member, ctx.locale, ctx.messages, ctx.media));
        }
        out.push_str("</div>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FacilityList {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub facilities: Vec<Facility>,
}

impl SectionView for FacilityList {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str("<div class=\"card-grid\">");
        for facility in &self.facilities {
            out.push_str(&facility_card(facility, ctx.locale, ctx.messages, ctx.media));
        }
        out.push_str("</div>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Card {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<Media>,
    pub link: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardGrid {
    pub title: Option<String>,
    pub columns: Option<u8>,
    #[serde(deserialize_with = "nullable")]
    pub cards: Vec<Card>,
}

impl SectionView for CardGrid {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let columns = self.columns.unwrap_or(3).clamp(1, 4);
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str(&format!("<div class=\"card-grid card-grid--{columns}\">"));
        for card in &self.cards {
            out.push_str("<article class=\"card\">");
            out.push_str(&image(card.image.as_ref(), ctx.media, "card__image"));
            out.push_str(&optional("h3", "card__title", card.title.as_deref()));
            out.push_str(&optional("p", "card__excerpt", card.description.as_deref()));
            if let Some(anchor) = card
                .link
                .as_ref()
                .and_then(|l| link(l, "card__link", &ctx.messages.read_more))
            {
                out.push_str(&anchor);
            }
            out.push_str("</article>");
        }
        out.push_str("</div>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuickLinks {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub links: Vec<Link>,
}

impl SectionView for QuickLinks {
    fn render(&self, _ctx: &RenderContext<'_>) -> String {
        let items = self
            .links
            .iter()
            .filter_map(|l| link(l, "quick-links__link", ""))
            .map(|anchor| format!("<li>{anchor}</li>"))
            .collect::<String>();
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str(&format!("<ul class=\"quick-links\">{items}</ul>"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_meta_formats_extension_and_size() {
        assert_eq!(file_meta(Some(".pdf"), Some(2048.0)), " (PDF, 2.0 MB)");
        assert_eq!(file_meta(Some("docx"), Some(15.4)), " (DOCX, 15 KB)");
        assert_eq!(file_meta(None, None), "");
    }
}
