use anyhow::Context as _;
use serde::Deserialize;

use crate::locale::Locale;

const ID_YAML: &str = include_str!("../locales/id.yaml");
const EN_YAML: &str = include_str!("../locales/en.yaml");

#[derive(Debug, Clone, Deserialize)]
pub struct NavLabels {
    pub home: String,
    pub news: String,
    pub events: String,
    pub staff: String,
    pub facilities: String,
    pub publications: String,
    pub search: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryLabels {
    pub all: String,
    pub news: String,
    pub events: String,
    pub pages: String,
    pub staff: String,
    pub publications: String,
}

/// UI labels for one locale. Content itself comes from the CMS; these are the
/// strings the templates need around it.
#[derive(Debug, Clone, Deserialize)]
pub struct Messages {
    pub site_name: String,
    pub skip_to_content: String,
    pub switch_locale: String,
    pub nav: NavLabels,
    pub read_more: String,
    pub all_news: String,
    pub all_events: String,
    pub no_news: String,
    pub no_events: String,
    pub no_items: String,
    pub upcoming: String,
    pub past: String,
    pub location: String,
    pub register: String,
    pub download: String,
    pub back: String,
    pub previous: String,
    pub next: String,
    pub page_of: String,
    pub load_more: String,
    pub all_groups: String,
    pub all_years: String,
    pub staff_nip: String,
    pub staff_expertise: String,
    pub staff_email: String,
    pub staff_profile: String,
    pub publication_authors: String,
    pub publication_venue: String,
    pub curriculum_semester: String,
    pub curriculum_credits: String,
    pub accreditation_valid_until: String,
    pub contact_address: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub contact_hours: String,
    pub search_placeholder: String,
    pub search_results_for: String,
    pub search_no_results: String,
    pub search_unavailable: String,
    pub search_categories: CategoryLabels,
    pub not_found_title: String,
    pub not_found_body: String,
    pub error_title: String,
    pub error_body: String,
    pub date_format: String,
    pub months: Vec<String>,
}

impl Messages {
    /// `page_of` with its placeholders filled in.
    pub fn page_of(&self, page: u32, total: u32) -> String {
        self.page_of
            .replace("{page}", &page.to_string())
            .replace("{total}", &total.to_string())
    }

    pub fn month(&self, month: u32) -> &str {
        usize::try_from(month)
            .ok()
            .and_then(|m| m.checked_sub(1))
            .and_then(|idx| self.months.get(idx))
            .map_or("", String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    id: Messages,
    en: Messages,
}

impl Catalog {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            id: parse(ID_YAML).context("parse locales/id.yaml")?,
            en: parse(EN_YAML).context("parse locales/en.yaml")?,
        })
    }

    pub fn get(&self, locale: Locale) -> &Messages {
        match locale {
            Locale::Id => &self.id,
            Locale::En => &self.en,
        }
    }
}

fn parse(yaml: &str) -> anyhow::Result<Messages> {
    let messages: Messages = serde_yaml::from_str(yaml)?;
    if messages.months.len() != 12 {
        anyhow::bail!("expected 12 month names, got {}", messages.months.len());
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_catalogs_load() {
        let catalog = Catalog::load().unwrap();
        assert_eq!(catalog.get(Locale::Id).nav.news, "Berita");
        assert_eq!(catalog.get(Locale::En).nav.news, "News");
        assert_eq!(catalog.get(Locale::Id).month(3), "Maret");
        assert_eq!(catalog.get(Locale::En).month(13), "");
        assert_eq!(catalog.get(Locale::En).page_of(2, 5), "Page 2 of 5");
    }
}
