use serde::Deserialize;

use crate::blocks::render::{RenderContext, SectionView};
use crate::content::{Link, Media, nullable};
use crate::view::html::{attr, image, link, optional, text};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Slide {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub image: Option<Media>,
    pub link: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroSlider {
    #[serde(deserialize_with = "nullable")]
    pub slides: Vec<Slide>,
    /// Milliseconds between slides; the carousel script treats `None` as manual.
    pub interval: Option<u32>,
}

impl SectionView for HeroSlider {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = match self.interval {
            Some(ms) => format!("<div class=\"hero-slider\" data-interval=\"{ms}\">"),
            None => String::from("<div class=\"hero-slider\">"),
        };
        for (index, slide) in self.slides.iter().enumerate() {
            let active = if index == 0 { " is-active" } else { "" };
            out.push_str(&format!("<figure class=\"hero-slide{active}\">"));
            out.push_str(&image(slide.image.as_ref(), ctx.media, "hero-slide__image"));
            out.push_str("<figcaption>");
            out.push_str(&optional("h2", "hero-slide__title", slide.title.as_deref()));
            out.push_str(&optional("p", "hero-slide__subtitle", slide.subtitle.as_deref()));
            if let Some(anchor) = slide
                .link
                .as_ref()
                .and_then(|l| link(l, "button", &ctx.messages.read_more))
            {
                out.push_str(&anchor);
            }
            out.push_str("</figcaption></figure>");
        }
        out.push_str("</div>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageHeader {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub background: Option<Media>,
}

impl SectionView for PageHeader {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = String::new();
        if let Some(src) = self
            .background
            .as_ref()
            .and_then(|bg| ctx.media.resolve(bg.url.as_deref()))
        {
            out.push_str(&format!(
                "<div class=\"page-header\" style=\"background-image: url('{}')\">",
                attr(&src)
            ));
        } else {
            out.push_str("<div class=\"page-header\">");
        }
        out.push_str(&optional("h1", "page-header__title", self.title.as_deref()));
        out.push_str(&optional("p", "page-header__subtitle", self.subtitle.as_deref()));
        out.push_str("</div>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Announcement {
    pub text: Option<String>,
    pub link: Option<Link>,
    /// `info` | `warning` | `urgent`.
    pub variant: Option<String>,
}

impl SectionView for Announcement {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let Some(message) = self.text.as_deref().filter(|t| !t.trim().is_empty()) else {
            return String::new();
        };
        let variant = match self.variant.as_deref() {
            Some("warning") => "warning",
            Some("urgent") => "urgent",
            _ => "info",
        };
        let mut out = format!(
            "<div class=\"announcement announcement--{variant}\" role=\"status\"><p>{}</p>",
            text(message.trim())
        );
        if let Some(anchor) = self
            .link
            .as_ref()
            .and_then(|l| link(l, "announcement__link", &ctx.messages.read_more))
        {
            out.push_str(&anchor);
        }
        out.push_str("</div>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CallToAction {
    pub title: Option<String>,
    pub description: Option<String>,
    pub button: Option<Link>,
    pub background: Option<Media>,
}

impl SectionView for CallToAction {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = String::from("<div class=\"cta\">");
        out.push_str(&image(self.background.as_ref(), ctx.media, "cta__background"));
        out.push_str(&optional("h2", "cta__title", self.title.as_deref()));
        out.push_str(&optional("p", "cta__description", self.description.as_deref()));
        if let Some(anchor) = self
            .button
            .as_ref()
            .and_then(|l| link(l, "button button--primary", &ctx.messages.read_more))
        {
            out.push_str(&anchor);
        }
        out.push_str("</div>");
        out
    }
}
