use chrono::Datelike as _;

use crate::cms::MediaResolver;
use crate::content::GlobalSettings;
use crate::i18n::Messages;
use crate::locale::Locale;
use crate::site::RenderedPage;
use crate::view::html::{attr, image, link, optional, text};
use crate::view::widget::AccessibilityWidget;

pub struct Chrome<'a> {
    pub messages: &'a Messages,
    pub media: &'a MediaResolver,
    pub widget: Option<&'a AccessibilityWidget>,
}

/// The full HTML document around a rendered page.
pub fn render_document(page: &RenderedPage, chrome: &Chrome<'_>) -> String {
    let locale = page.locale;
    let messages = chrome.messages;
    let site_name = page
        .global
        .site_name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(&messages.site_name);
    let title = if page.title.trim().is_empty() {
        site_name.to_string()
    } else {
        format!("{} | {site_name}", page.title.trim())
    };

    let mut out = String::new();
    out.push_str("<!doctype html>\n");
    out.push_str(&format!("<html lang=\"{}\">\n", locale.as_str()));
    out.push_str("<head>\n");
    out.push_str("  <meta charset=\"utf-8\">\n");
    out.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str(&format!("  <title>{}</title>\n", text(&title)));
    if let Some(description) = page.description.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push_str(&format!(
            "  <meta name=\"description\" content=\"{}\">\n",
            attr(description.trim())
        ));
    }
    for alternate in Locale::ALL {
        out.push_str(&format!(
            "  <link rel=\"alternate\" hreflang=\"{}\" href=\"{}\">\n",
            alternate.as_str(),
            attr(&alternate.path(&page.path))
        ));
    }
    out.push_str("  <link rel=\"stylesheet\" href=\"/assets/site.css\">\n");
    out.push_str("  <script src=\"/assets/site.js\" defer></script>\n");
    out.push_str("</head>\n");
    out.push_str("<body>\n");
    out.push_str(&format!(
        "<a class=\"skip-link\" href=\"#main\">{}</a>\n",
        text(&messages.skip_to_content)
    ));
    out.push_str(&render_header(page, chrome, site_name));
    out.push_str("<main id=\"main\">\n");
    out.push_str(&page.main);
    for block in &page.blocks {
        out.push_str(&block.html);
        out.push('\n');
    }
    out.push_str("</main>\n");
    out.push_str(&render_footer(&page.global, messages, site_name));
    if let Some(widget) = chrome.widget {
        out.push_str(&widget.script_tag(locale));
        out.push('\n');
    }
    out.push_str("</body>\n");
    out.push_str("</html>\n");
    out
}

fn render_header(page: &RenderedPage, chrome: &Chrome<'_>, site_name: &str) -> String {
    let locale = page.locale;
    let messages = chrome.messages;

    let mut out = String::from("<header class=\"site-header\">\n");
    out.push_str(&format!(
        "  <a class=\"site-header__brand\" href=\"{}\">{}<span>{}</span></a>\n",
        locale.path("/"),
        image(page.global.logo.as_ref(), chrome.media, "site-header__logo"),
        text(site_name)
    ));

    out.push_str("  <nav class=\"site-nav\">\n");
    if page.global.navigation.is_empty() {
        let nav = &messages.nav;
        for (path, label) in [
            ("/", &nav.home),
            ("/news", &nav.news),
            ("/events", &nav.events),
            ("/staff", &nav.staff),
            ("/facilities", &nav.facilities),
            ("/publications", &nav.publications),
        ] {
            out.push_str(&format!(
                "    <a href=\"{}\">{}</a>\n",
                attr(&locale.path(path)),
                text(label)
            ));
        }
    } else {
        for item in &page.global.navigation {
            if let Some(anchor) = link(item, "site-nav__link", "") {
                out.push_str(&format!("    {anchor}\n"));
            }
        }
    }
    out.push_str("  </nav>\n");

    out.push_str(&format!(
        "  <form class=\"site-search\" action=\"{}\" method=\"get\" role=\"search\"><input type=\"search\" name=\"q\" placeholder=\"{}\" aria-label=\"{}\"></form>\n",
        attr(&locale.path("/search")),
        attr(&messages.search_placeholder),
        attr(&messages.nav.search)
    ));
    out.push_str(&format!(
        "  <a class=\"locale-switch\" hreflang=\"{}\" href=\"{}\">{}</a>\n",
        locale.other().as_str(),
        attr(&locale.other().path(&page.path)),
        text(&messages.switch_locale)
    ));
    out.push_str("</header>\n");
    out
}

fn render_footer(global: &GlobalSettings, messages: &Messages, site_name: &str) -> String {
    let mut out = String::from("<footer class=\"site-footer\">\n");
    out.push_str(&optional("p", "site-footer__tagline", global.tagline.as_deref()));
    out.push_str(&optional("address", "site-footer__address", global.address.as_deref()));
    if let Some(phone) = global.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        out.push_str(&format!(
            "<p>{}: <a href=\"tel:{}\">{}</a></p>",
            text(&messages.contact_phone),
            attr(phone.trim()),
            text(phone.trim())
        ));
    }
    if let Some(email) = global.email.as_deref().filter(|e| !e.trim().is_empty()) {
        out.push_str(&format!(
            "<p>{}: <a href=\"mailto:{}\">{}</a></p>",
            text(&messages.contact_email),
            attr(email.trim()),
            text(email.trim())
        ));
    }
    let social = global
        .social_links
        .iter()
        .filter_map(|l| link(l, "site-footer__social", ""))
        .collect::<Vec<_>>();
    if !social.is_empty() {
        out.push_str(&format!("<nav class=\"site-footer__socials\">{}</nav>", social.join("")));
    }
    let year = chrono::Utc::now().year();
    match global.footer_text.as_deref().filter(|f| !f.trim().is_empty()) {
        Some(footer) => out.push_str(&format!("<p class=\"site-footer__note\">{}</p>", text(footer))),
        None => out.push_str(&format!(
            "<p class=\"site-footer__note\">&copy; {year} {}</p>",
            text(site_name)
        )),
    }
    out.push_str("\n</footer>\n");
    out
}
