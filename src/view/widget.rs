use crate::locale::Locale;
use crate::view::html::attr;

const WIDGET_SRC: &str = "https://cdn.userway.org/widget.js";

/// The third-party accessibility widget. Built once from configuration and
/// handed to the layout; pages rendered without one simply omit the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibilityWidget {
    token: String,
}

impl AccessibilityWidget {
    pub fn from_token(token: Option<&str>) -> Option<Self> {
        let token = token?.trim();
        if token.is_empty() {
            return None;
        }
        Some(Self {
            token: token.to_string(),
        })
    }

    pub fn script_tag(&self, locale: Locale) -> String {
        format!(
            "<script async src=\"{WIDGET_SRC}\" data-account=\"{}\" data-language=\"{}\"></script>",
            attr(&self.token),
            locale.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_constructed_with_token() {
        assert_eq!(AccessibilityWidget::from_token(None), None);
        assert_eq!(AccessibilityWidget::from_token(Some(" ")), None);

        let widget = AccessibilityWidget::from_token(Some("abc")).unwrap();
        let tag = widget.script_tag(Locale::En);
        assert!(tag.contains("data-account=\"abc\""));
        assert!(tag.contains("data-language=\"en\""));
    }
}
