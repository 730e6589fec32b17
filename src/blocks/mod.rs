//! Page content blocks.
//!
//! Pages carry an ordered dynamic zone of blocks. Each block record names its
//! type in the `__component` discriminator; [`Section`] is the closed set of
//! types this site knows how to render. Records are parsed into their typed
//! section once, where the page data is assembled, and rendered in order by
//! [`render::render_blocks`].

pub mod render;
pub mod sections;

use serde::Deserialize as _;
use serde_json::Value;

use crate::blocks::render::SectionView;

pub const DISCRIMINATOR_KEY: &str = "__component";

macro_rules! section_catalog {
    ($($variant:ident => $discriminator:literal),+ $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum Section {
            $($variant(sections::$variant),)+
            /// A discriminator with no renderer. Rendered as nothing.
            Unknown(String),
        }

        impl Section {
            /// Every discriminator with a renderer.
            pub const CATALOG: &'static [&'static str] = &[$($discriminator),+];

            /// Parse a block's fields into the section its discriminator names.
            pub fn parse(discriminator: &str, fields: &Value) -> Result<Self, serde_json::Error> {
                Ok(match discriminator {
                    $($discriminator => Self::$variant(sections::$variant::deserialize(fields)?),)+
                    other => Self::Unknown(other.to_string()),
                })
            }

            pub fn discriminator(&self) -> &str {
                match self {
                    $(Self::$variant(_) => $discriminator,)+
                    Self::Unknown(discriminator) => discriminator.as_str(),
                }
            }

            pub(crate) fn view(&self) -> Option<&dyn SectionView> {
                match self {
                    $(Self::$variant(section) => Some(section),)+
                    Self::Unknown(_) => None,
                }
            }
        }
    };
}

section_catalog! {
    HeroSlider => "sections.hero-slider",
    PageHeader => "sections.page-header",
    RichText => "sections.rich-text",
    ImageText => "sections.image-text",
    FaqSection => "sections.faq-section",
    DocumentArchive => "sections.document-archive",
    PublicationList => "sections.publication-list",
    Gallery => "sections.gallery",
    VideoEmbed => "sections.video-embed",
    LatestNews => "sections.latest-news",
    UpcomingEvents => "sections.upcoming-events",
    StaffGrid => "sections.staff-grid",
    FacilityList => "sections.facility-list",
    StatsCounter => "sections.stats-counter",
    CallToAction => "sections.call-to-action",
    PartnerLogos => "sections.partner-logos",
    Testimonials => "sections.testimonials",
    Accreditation => "sections.accreditation",
    ContactInfo => "sections.contact-info",
    Timeline => "sections.timeline",
    CardGrid => "sections.card-grid",
    VisionMission => "sections.vision-mission",
    QuickLinks => "sections.quick-links",
    Announcement => "sections.announcement",
    Curriculum => "sections.curriculum",
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: Option<i64>,
    pub section: Section,
}

impl Block {
    /// Sections that read the page's latest-news list.
    pub fn needs_news(&self) -> bool {
        matches!(self.section, Section::LatestNews(_))
    }

    /// Sections that read the page's upcoming-events list.
    pub fn needs_events(&self) -> bool {
        matches!(self.section, Section::UpcomingEvents(_))
    }
}

/// Parse one normalized block record. Records whose fields do not fit their
/// section are logged and dropped.
pub fn parse_block(record: &Value) -> Option<Block> {
    let discriminator = record
        .get(DISCRIMINATOR_KEY)
        .and_then(Value::as_str)
        .unwrap_or_default();
    let id = record.get("id").and_then(Value::as_i64);

    match Section::parse(discriminator, record) {
        Ok(section) => Some(Block { id, section }),
        Err(err) => {
            tracing::warn!(discriminator, ?id, %err, "dropping block with malformed fields");
            None
        }
    }
}

/// Parse a dynamic zone. Anything other than an array is an empty zone.
pub fn parse_blocks(records: &Value) -> Vec<Block> {
    match records {
        Value::Array(items) => items.iter().filter_map(parse_block).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    #[test]
    fn catalog_has_unique_discriminators() {
        let unique = Section::CATALOG.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), Section::CATALOG.len());
        assert_eq!(Section::CATALOG.len(), 25);
    }

    #[test]
    fn every_catalog_entry_parses_from_empty_fields() {
        for discriminator in Section::CATALOG {
            let section = Section::parse(discriminator, &json!({})).unwrap();
            assert_eq!(section.discriminator(), *discriminator);
            assert!(section.view().is_some(), "{discriminator} has no view");
        }
    }

    #[test]
    fn parses_typed_fields_and_keeps_order() {
        let blocks = parse_blocks(&json!([
            { "__component": "sections.faq-section", "id": 1, "title": "FAQ",
              "items": [{ "question": "Q?", "answer": "A." }] },
            { "__component": "unknown.type", "id": 2 },
            { "__component": "sections.rich-text", "id": 3, "content": "**hi**" },
        ]));

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].id, Some(1));
        match &blocks[0].section {
            Section::FaqSection(faq) => {
                assert_eq!(faq.title.as_deref(), Some("FAQ"));
                assert_eq!(faq.items.len(), 1);
            }
            other => panic!("unexpected section: {other:?}"),
        }
        assert_eq!(blocks[1].section, Section::Unknown("unknown.type".to_string()));
        assert_eq!(blocks[2].section.discriminator(), "sections.rich-text");
    }

    #[test]
    fn malformed_fields_drop_only_that_block() {
        let blocks = parse_blocks(&json!([
            { "__component": "sections.stats-counter", "id": 1, "items": "not a list" },
            { "__component": "sections.faq-section", "id": 2, "items": null },
        ]));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, Some(2));
    }

    #[test]
    fn missing_discriminator_is_unknown() {
        let block = parse_block(&json!({ "id": 5, "title": "orphan" })).unwrap();
        assert_eq!(block.section, Section::Unknown(String::new()));
        assert!(parse_blocks(&json!(null)).is_empty());
    }
}
