use serde::Deserialize as _;
use serde_json::{Value, json};

use crate::cms::{CmsError, ContentSource, fetch_entries};
use crate::content::GlobalSettings;
use crate::locale::Locale;
use crate::site::populate::media;

pub fn query(locale: Locale) -> Value {
    json!({
        "locale": locale.as_str(),
        "populate": {
            "logo": media(),
            "navigation": true,
            "socialLinks": true,
        },
    })
}

/// Site-wide settings for the header and footer.
pub async fn fetch(cms: &dyn ContentSource, locale: Locale) -> Result<GlobalSettings, CmsError> {
    let entries = fetch_entries(cms, "/global", &query(locale)).await?;
    let Some(entity) = entries.into_first() else {
        return Ok(GlobalSettings::default());
    };
    Ok(GlobalSettings::deserialize(&entity).unwrap_or_else(|err| {
        tracing::warn!(%err, "global settings are malformed; using defaults");
        GlobalSettings::default()
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::site::testing::FakeCms;

    #[tokio::test]
    async fn reads_legacy_single_type() {
        let cms = FakeCms::default().with(
            "/global",
            json!({
                "data": { "id": 1, "attributes": {
                    "siteName": "Departemen Fisika",
                    "navigation": [{ "id": 1, "label": "Profil", "url": "/id/profil" }],
                    "logo": { "data": { "id": 3, "attributes": { "url": "/uploads/logo.svg" } } },
                } }
            }),
        );

        let global = fetch(&cms, Locale::Id).await.unwrap();
        assert_eq!(global.site_name.as_deref(), Some("Departemen Fisika"));
        assert_eq!(global.navigation.len(), 1);
        assert_eq!(
            global.logo.and_then(|logo| logo.url).as_deref(),
            Some("/uploads/logo.svg")
        );
    }

    #[tokio::test]
    async fn missing_single_type_is_default() {
        let cms = FakeCms::default().with("/global", json!({ "data": null }));
        assert_eq!(fetch(&cms, Locale::En).await.unwrap(), GlobalSettings::default());
    }
}
