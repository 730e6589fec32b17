use crate::blocks::Block;
use crate::cms::MediaResolver;
use crate::content::{EventItem, NewsItem};
use crate::i18n::Messages;
use crate::locale::Locale;
use crate::view::html::attr;

/// Page-level data available to every section.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub locale: Locale,
    pub messages: &'a Messages,
    pub media: &'a MediaResolver,
    pub latest_news: &'a [NewsItem],
    pub upcoming_events: &'a [EventItem],
}

pub trait SectionView {
    fn render(&self, ctx: &RenderContext<'_>) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub id: Option<i64>,
    pub discriminator: String,
    pub html: String,
}

/// Render blocks in order. Blocks without a renderer produce nothing.
pub fn render_blocks(blocks: &[Block], ctx: &RenderContext<'_>) -> Vec<RenderedBlock> {
    blocks
        .iter()
        .filter_map(|block| render_block(block, ctx))
        .collect()
}

pub fn render_block(block: &Block, ctx: &RenderContext<'_>) -> Option<RenderedBlock> {
    let discriminator = block.section.discriminator();
    let Some(view) = block.section.view() else {
        tracing::debug!(discriminator, id = ?block.id, "no renderer for block; skipping");
        return None;
    };

    let kind = discriminator
        .rsplit('.')
        .next()
        .unwrap_or(discriminator);
    let mut html = format!("<section class=\"block block--{}\"", attr(kind));
    if let Some(id) = block.id {
        html.push_str(&format!(" data-block-id=\"{id}\""));
    }
    html.push('>');
    html.push_str(&view.render(ctx));
    html.push_str("</section>");

    Some(RenderedBlock {
        id: block.id,
        discriminator: discriminator.to_string(),
        html,
    })
}
