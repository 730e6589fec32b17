//! Typed views of normalized CMS entities.
//!
//! Every field is optional or defaulted: the CMS schema is not enforced at the
//! boundary, and missing data degrades to an empty render.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Media {
    pub id: Option<i64>,
    pub url: Option<String>,
    pub alternative_text: Option<String>,
    pub caption: Option<String>,
    pub name: Option<String>,
    pub ext: Option<String>,
    pub mime: Option<String>,
    /// Kilobytes, as reported by the upload plugin.
    pub size: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Link {
    pub label: Option<String>,
    pub url: Option<String>,
    pub is_external: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Seo {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalSettings {
    pub site_name: Option<String>,
    pub tagline: Option<String>,
    pub logo: Option<Media>,
    #[serde(deserialize_with = "nullable")]
    pub navigation: Vec<Link>,
    pub footer_text: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub social_links: Vec<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsItem {
    pub id: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<String>,
    pub cover: Option<Media>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventItem {
    pub id: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    pub slug: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub cover: Option<Media>,
    pub registration_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaffMember {
    pub id: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub slug: Option<String>,
    pub nip: Option<String>,
    pub position: Option<String>,
    pub expertise: Option<String>,
    pub email: Option<String>,
    pub photo: Option<Media>,
    pub group: Option<String>,
    pub scholar_url: Option<String>,
    pub biography: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Facility {
    pub id: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub images: Vec<Media>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Publication {
    pub id: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    pub authors: Option<String>,
    pub year: Option<i32>,
    pub venue: Option<String>,
    pub category: Option<String>,
    pub url: Option<String>,
    pub doi: Option<String>,
}
