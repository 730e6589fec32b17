pub mod cards;
pub mod html;
pub mod layout;
pub mod widget;

pub use layout::{Chrome, render_document};
pub use widget::AccessibilityWidget;
