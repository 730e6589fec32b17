//! Population trees: which relations the CMS should include in a response.
//!
//! Each block discriminator has one fragment describing the relations its
//! section reads. Routes list the discriminators their dynamic zone accepts and
//! build the `populate[blocks][on][...]` tree from those fragments. A new block
//! type therefore needs a fragment here, a variant in `blocks::Section`, and an
//! entry in each route list that should render it.

use serde_json::{Map, Value, json};

use crate::blocks::Section;

/// Discriminators the homepage dynamic zone accepts.
pub const HOME_SECTIONS: &[&str] = &[
    "sections.hero-slider",
    "sections.announcement",
    "sections.rich-text",
    "sections.image-text",
    "sections.stats-counter",
    "sections.latest-news",
    "sections.upcoming-events",
    "sections.card-grid",
    "sections.quick-links",
    "sections.gallery",
    "sections.video-embed",
    "sections.accreditation",
    "sections.partner-logos",
    "sections.testimonials",
    "sections.call-to-action",
];

/// Content pages accept every section with a renderer.
pub const PAGE_SECTIONS: &[&str] = Section::CATALOG;

pub fn media() -> Value {
    json!({ "fields": ["url", "alternativeText", "caption", "width", "height"] })
}

fn file() -> Value {
    json!({ "fields": ["url", "name", "ext", "size", "mime"] })
}

/// The population fragment for one block type, or `None` if it has no
/// renderer.
pub fn fragment(discriminator: &str) -> Option<Value> {
    let fragment = match discriminator {
        "sections.hero-slider" => json!({
            "populate": { "slides": { "populate": { "image": media(), "link": true } } }
        }),
        "sections.page-header" => json!({ "populate": { "background": media() } }),
        "sections.image-text" => json!({ "populate": { "image": media() } }),
        "sections.faq-section" | "sections.stats-counter" | "sections.timeline" => {
            json!({ "populate": { "items": true } })
        }
        "sections.document-archive" => json!({
            "populate": { "documents": { "populate": { "file": file() } } }
        }),
        "sections.publication-list" => json!({
            "populate": {
                "publications": {
                    "fields": ["title", "authors", "year", "venue", "category", "url", "doi"]
                }
            }
        }),
        "sections.gallery" => json!({
            "populate": {
                "items": { "populate": { "image": { "fields": ["url", "alternativeText"] } } }
            }
        }),
        "sections.staff-grid" => json!({
            "populate": {
                "staff": {
                    "fields": ["name", "slug", "position", "expertise"],
                    "populate": { "photo": media() }
                }
            }
        }),
        "sections.facility-list" => json!({
            "populate": {
                "facilities": {
                    "fields": ["name", "slug", "location"],
                    "populate": { "images": media() }
                }
            }
        }),
        "sections.call-to-action" => json!({
            "populate": { "button": true, "background": media() }
        }),
        "sections.partner-logos" => json!({
            "populate": { "partners": { "populate": { "logo": media() } } }
        }),
        "sections.testimonials" => json!({
            "populate": { "items": { "populate": { "photo": media() } } }
        }),
        "sections.accreditation" => json!({
            "populate": { "items": { "populate": { "certificate": file() } } }
        }),
        "sections.card-grid" => json!({
            "populate": { "cards": { "populate": { "image": media(), "link": true } } }
        }),
        "sections.vision-mission" => json!({ "populate": { "missions": true } }),
        "sections.quick-links" => json!({ "populate": { "links": true } }),
        "sections.announcement" => json!({ "populate": { "link": true } }),
        "sections.curriculum" => json!({
            "populate": { "semesters": { "populate": { "courses": true } } }
        }),
        // Scalar-only sections, or sections fed from page-level data.
        "sections.rich-text"
        | "sections.video-embed"
        | "sections.latest-news"
        | "sections.upcoming-events"
        | "sections.contact-info" => json!({ "populate": "*" }),
        _ => return None,
    };
    Some(fragment)
}

/// `{ "on": { discriminator: fragment, ... } }` for a dynamic zone.
pub fn dynamic_zone(discriminators: &[&str]) -> Value {
    let mut on = Map::new();
    for discriminator in discriminators {
        match fragment(discriminator) {
            Some(fragment) => {
                on.insert((*discriminator).to_string(), fragment);
            }
            None => tracing::warn!(discriminator, "no population fragment; block will be bare"),
        }
    }
    json!({ "on": on })
}
