use serde::Deserialize;
use url::Url;

use crate::blocks::render::{RenderContext, SectionView};
use crate::content::{Media, nullable};
use crate::view::html::{attr, image, optional, text};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryItem {
    pub image: Option<Media>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Gallery {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub items: Vec<GalleryItem>,
}

impl SectionView for Gallery {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str("<div class=\"gallery\" data-lightbox>");
        for item in &self.items {
            let Some(full) = item
                .image
                .as_ref()
                .and_then(|m| ctx.media.resolve(m.url.as_deref()))
            else {
                continue;
            };
            out.push_str(&format!(
                "<figure class=\"gallery__item\"><a href=\"{}\">{}</a>",
                attr(&full),
                image(item.image.as_ref(), ctx.media, "gallery__image")
            ));
            out.push_str(&optional("figcaption", "gallery__caption", item.caption.as_deref()));
            out.push_str("</figure>");
        }
        out.push_str("</div>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoEmbed {
    pub title: Option<String>,
    pub url: Option<String>,
    pub caption: Option<String>,
}

impl SectionView for VideoEmbed {
    fn render(&self, _ctx: &RenderContext<'_>) -> String {
        let Some(embed) = self.url.as_deref().and_then(youtube_embed_url) else {
            return String::new();
        };
        let title = self.title.as_deref().unwrap_or("video");
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str(&format!(
            "<div class=\"video-embed\"><iframe src=\"{}\" title=\"{}\" loading=\"lazy\" allow=\"accelerometer; encrypted-media; gyroscope; picture-in-picture\" allowfullscreen></iframe></div>",
            attr(&embed),
            attr(title)
        ));
        out.push_str(&optional("p", "video-embed__caption", self.caption.as_deref()));
        out
    }
}

/// `https://www.youtube.com/embed/{id}` for the usual YouTube URL forms.
pub fn youtube_embed_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
    let id = match host {
        "youtu.be" => url.path_segments()?.next().map(ToOwned::to_owned),
        "youtube.com" | "youtube-nocookie.com" => {
            let mut segments = url.path_segments()?;
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                Some("embed" | "shorts" | "live") => segments.next().map(ToOwned::to_owned),
                _ => None,
            }
        }
        _ => None,
    }?;

    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| format!("https://www.youtube.com/embed/{id}"))
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Partner {
    pub name: Option<String>,
    pub logo: Option<Media>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartnerLogos {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub partners: Vec<Partner>,
}

impl SectionView for PartnerLogos {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str("<ul class=\"partner-logos\">");
        for partner in &self.partners {
            let logo = image(partner.logo.as_ref(), ctx.media, "partner-logos__logo");
            let inner = if logo.is_empty() {
                text(partner.name.as_deref().unwrap_or("")).into_owned()
            } else {
                logo
            };
            if inner.is_empty() {
                continue;
            }
            match partner.url.as_deref().filter(|u| !u.trim().is_empty()) {
                Some(url) => out.push_str(&format!(
                    "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" title=\"{}\">{inner}</a></li>",
                    attr(url.trim()),
                    attr(partner.name.as_deref().unwrap_or(""))
                )),
                None => out.push_str(&format!("<li>{inner}</li>")),
            }
        }
        out.push_str("</ul>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Testimonial {
    pub name: Option<String>,
    pub role: Option<String>,
    pub quote: Option<String>,
    pub photo: Option<Media>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Testimonials {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub items: Vec<Testimonial>,
}

impl SectionView for Testimonials {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str("<div class=\"testimonials\" data-carousel>");
        for item in &self.items {
            let Some(quote) = item.quote.as_deref().filter(|q| !q.trim().is_empty()) else {
                continue;
            };
            out.push_str("<figure class=\"testimonial\">");
            out.push_str(&format!("<blockquote>{}</blockquote>", text(quote.trim())));
            out.push_str("<figcaption>");
            out.push_str(&image(item.photo.as_ref(), ctx.media, "testimonial__photo"));
            out.push_str(&optional("strong", "testimonial__name", item.name.as_deref()));
            out.push_str(&optional("span", "testimonial__role", item.role.as_deref()));
            out.push_str("</figcaption></figure>");
        }
        out.push_str("</div>");
        out
    }
}
