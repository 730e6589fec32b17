use serde::Deserialize;

use crate::blocks::render::{RenderContext, SectionView};
use crate::content::{Media, nullable};
use crate::view::html::{attr, date_tag, optional, text};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stat {
    pub label: Option<String>,
    pub value: Option<i64>,
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatsCounter {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub items: Vec<Stat>,
}

impl SectionView for StatsCounter {
    fn render(&self, _ctx: &RenderContext<'_>) -> String {
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str("<dl class=\"stats\">");
        for stat in &self.items {
            let Some(value) = stat.value else {
                continue;
            };
            let suffix = stat.suffix.as_deref().unwrap_or("");
            // The counter animation starts from zero and stops at data-target.
            out.push_str(&format!(
                "<div class=\"stats__item\"><dd data-target=\"{value}\">{value}{}</dd><dt>{}</dt></div>",
                text(suffix),
                text(stat.label.as_deref().unwrap_or(""))
            ));
        }
        out.push_str("</dl>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccreditationItem {
    pub program: Option<String>,
    pub grade: Option<String>,
    pub institution: Option<String>,
    pub valid_until: Option<String>,
    pub certificate: Option<Media>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Accreditation {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub items: Vec<AccreditationItem>,
}

impl SectionView for Accreditation {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str("<div class=\"accreditation\">");
        for item in &self.items {
            out.push_str("<article class=\"accreditation__item\">");
            out.push_str(&optional("h3", "accreditation__program", item.program.as_deref()));
            out.push_str(&optional("strong", "accreditation__grade", item.grade.as_deref()));
            out.push_str(&optional("p", "accreditation__institution", item.institution.as_deref()));
            let valid_until = date_tag(item.valid_until.as_deref(), ctx.messages);
            if !valid_until.is_empty() {
                out.push_str(&format!(
                    "<p class=\"accreditation__validity\">{} {valid_until}</p>",
                    text(&ctx.messages.accreditation_valid_until)
                ));
            }
            if let Some(href) = item
                .certificate
                .as_ref()
                .and_then(|c| ctx.media.resolve(c.url.as_deref()))
            {
                out.push_str(&format!(
                    "<a class=\"accreditation__certificate\" href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
                    attr(&href),
                    text(&ctx.messages.download)
                ));
            }
            out.push_str("</article>");
        }
        out.push_str("</div>");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Course {
    pub code: Option<String>,
    pub name: Option<String>,
    pub credits: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Semester {
    pub semester: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Curriculum {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub semesters: Vec<Semester>,
}

impl SectionView for Curriculum {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let labels = ctx.messages;
        let mut semesters = self.semesters.iter().collect::<Vec<_>>();
        semesters.sort_by_key(|s| s.semester.unwrap_or(u32::MAX));

        let mut out = optional("h2", "section-title", self.title.as_deref());
        out.push_str("<div class=\"curriculum\">");
        for semester in semesters {
            let heading = semester
                .semester
                .map(|n| labels.curriculum_semester.replace("{semester}", &n.to_string()))
                .unwrap_or_default();
            out.push_str("<details class=\"curriculum__semester\">");
            out.push_str(&format!("<summary>{}</summary>", text(&heading)));
            out.push_str("<table><tbody>");
            let mut total = 0u32;
            for course in &semester.courses {
                let credits = course.credits.unwrap_or(0);
                total = total.saturating_add(credits);
                out.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{credits}</td></tr>",
                    text(course.code.as_deref().unwrap_or("")),
                    text(course.name.as_deref().unwrap_or(""))
                ));
            }
            out.push_str(&format!(
                "</tbody><tfoot><tr><td colspan=\"2\">{}</td><td>{total}</td></tr></tfoot></table>",
                text(&labels.curriculum_credits)
            ));
            out.push_str("</details>");
        }
        out.push_str("</div>");
        out
    }
}
