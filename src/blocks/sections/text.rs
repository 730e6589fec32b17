use serde::Deserialize;

use crate::blocks::render::{RenderContext, SectionView};
use crate::content::{Media, nullable};
use crate::view::html::{attr, image, markdown, optional, text};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RichText {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl SectionView for RichText {
    fn render(&self, _ctx: &RenderContext<'_>) -> String {
        let mut out = optional("h2", "section-title", self.title.as_deref());
        if let Some(content) = self.content.as_deref() {
            out.push_str("<div class=\"prose\">");
            out.push_str(&markdown(content));
            out.push_str("</div>");
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageText {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<Media>,
    /// `left` or `right`; anything else is treated as `left`.
    pub image_position: Option<String>,
}

impl SectionView for ImageText {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let side = match self.image_position.as_deref() {
            Some("right") => "right",
            _ => "left",
        };
        let mut out = format!("<div class=\"image-text image-text--{side}\">");
        out.push_str(&image(self.image.as_ref(), ctx.media, "image-text__image"));
        out.push_str("<div class=\"image-text__body\">");
        out.push_str(&optional("h2", "section-title", self.title.as_deref()));
        if let Some(content) = self.content.as_deref() {
            out.push_str(&markdown(content));
        }
        out.push_str("</div></div>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqItem {
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqSection {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub items: Vec<FaqItem>,
}

impl SectionView for FaqSection {
    fn render(&self, _ctx: &RenderContext<'_>) -> String {
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str("<div class=\"faq\">");
        for item in &self.items {
            let Some(question) = item.question.as_deref().filter(|q| !q.trim().is_empty()) else {
                continue;
            };
            out.push_str(&format!(
                "<details class=\"faq__item\"><summary>{}</summary>",
                text(question.trim())
            ));
            if let Some(answer) = item.answer.as_deref() {
                out.push_str(&markdown(answer));
            }
            out.push_str("</details>");
        }
        out.push_str("</div>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MissionItem {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisionMission {
    pub vision_title: Option<String>,
    pub vision: Option<String>,
    pub mission_title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub missions: Vec<MissionItem>,
}

impl SectionView for VisionMission {
    fn render(&self, _ctx: &RenderContext<'_>) -> String {
        let mut out = String::from("<div class=\"vision-mission\"><div class=\"vision\">");
        out.push_str(&optional("h2", "section-title", self.vision_title.as_deref()));
        out.push_str(&optional("blockquote", "vision__text", self.vision.as_deref()));
        out.push_str("</div><div class=\"mission\">");
        out.push_str(&optional("h2", "section-title", self.mission_title.as_deref()));
        let missions = self
            .missions
            .iter()
            .filter_map(|m| m.text.as_deref())
            .filter(|t| !t.trim().is_empty())
            .map(|t| format!("<li>{}</li>", text(t.trim())))
            .collect::<String>();
        if !missions.is_empty() {
            out.push_str(&format!("<ol>{missions}</ol>"));
        }
        out.push_str("</div></div>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineItem {
    pub year: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timeline {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub items: Vec<TimelineItem>,
}

impl SectionView for Timeline {
    fn render(&self, _ctx: &RenderContext<'_>) -> String {
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str("<ol class=\"timeline\">");
        for item in &self.items {
            out.push_str("<li class=\"timeline__item\">");
            out.push_str(&optional("span", "timeline__year", item.year.as_deref()));
            out.push_str(&optional("h3", "timeline__title", item.title.as_deref()));
            out.push_str(&optional("p", "timeline__description", item.description.as_deref()));
            out.push_str("</li>");
        }
        out.push_str("</ol>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInfo {
    pub title: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub office_hours: Option<String>,
    pub map_embed_url: Option<String>,
}

impl SectionView for ContactInfo {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let labels = ctx.messages;
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str("<dl class=\"contact-info\">");
        for (label, value) in [
            (&labels.contact_address, self.address.as_deref()),
            (&labels.contact_phone, self.phone.as_deref()),
            (&labels.contact_email, self.email.as_deref()),
            (&labels.contact_hours, self.office_hours.as_deref()),
        ] {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                out.push_str(&format!(
                    "<dt>{}</dt><dd>{}</dd>",
                    text(label),
                    text(value.trim())
                ));
            }
        }
        out.push_str("</dl>");
        // Only embeddable map URLs are accepted; anything else is dropped.
        if let Some(map) = self
            .map_embed_url
            .as_deref()
            .filter(|u| u.starts_with("https://"))
        {
            out.push_str(&format!(
                "<iframe class=\"contact-info__map\" src=\"{}\" loading=\"lazy\" referrerpolicy=\"no-referrer-when-downgrade\"></iframe>",
                attr(map)
            ));
        }
        out
    }
}
