pub mod academic;
pub mod hero;
pub mod listing;
pub mod media;
pub mod text;

pub use academic::{Accreditation, Curriculum, StatsCounter};
pub use hero::{Announcement, CallToAction, HeroSlider, PageHeader};
pub use listing::{
    CardGrid, DocumentArchive, FacilityList, LatestNews, PublicationList, QuickLinks, StaffGrid,
    UpcomingEvents,
};
pub use media::{Gallery, PartnerLogos, Testimonials, VideoEmbed};
pub use text::{ContactInfo, FaqSection, ImageText, RichText, Timeline, VisionMission};
