//! The home page.
//!
//! ```text
//!                    AJClifton
//!     I am working on this website very slowly.
//!           Welcome to AJClifton.co.uk|
//!
//!   ⎇ Github (AJClifton)   ⎇ Github (horrid57)   ▣ LinkedIn
//! Main page for AJClifton.co.uk, a website owned by Alex Clifton.
//! ```

use taffy::NodeId;

use super::{Page, PageKind, paint_centered};
use crate::components::{Cursor, TypeEffect};
use crate::config::{HomeContent, SiteConfig, SiteMeta};
use crate::error::Result;
use crate::layout::{BoxStyle, ComputedLayout, Dimension, Justify, LayoutTree, text_width};
use crate::renderer::FrameBuffer;
use crate::theme::Theme;
use crate::timer::TimerQueue;
use crate::types::Attr;

const HEADING: &str = "heading";
const TAGLINE: &str = "tagline";
const TYPED: &str = "typed";
const CURSOR: &str = "cursor";
const STATUS: &str = "status";

fn link_node(index: usize) -> String {
    format!("link{index}")
}

pub struct HomePage {
    meta: SiteMeta,
    content: HomeContent,
    type_effect: TypeEffect,
    cursor: Cursor,
}

impl HomePage {
    /// Build the page and start its animations.
    pub fn new(config: &SiteConfig, timers: &TimerQueue) -> Self {
        Self {
            meta: config.site.clone(),
            content: config.home.clone(),
            type_effect: TypeEffect::mounted(config.type_effect.props(), timers),
            cursor: Cursor::mounted(config.cursor.props(), timers),
        }
    }

    pub fn type_effect(&self) -> &TypeEffect {
        &self.type_effect
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    fn link_text(&self, index: usize) -> Option<String> {
        let link = self.content.links.get(index)?;
        Some(if link.icon.is_empty() {
            link.label.clone()
        } else {
            format!("{} {}", link.icon, link.label)
        })
    }
}

impl Page for HomePage {
    fn kind(&self) -> PageKind {
        PageKind::Home
    }

    fn title(&self) -> &str {
        &self.meta.title
    }

    fn build(&self, tree: &mut LayoutTree) -> Result<NodeId> {
        let heading = tree.text(HEADING, &self.content.heading)?;
        let tagline = tree.text(TAGLINE, &self.content.tagline)?;

        // Typed text and cursor sit side by side; the cursor keeps its
        // column while hidden so the line doesn't jump.
        let typed = tree.text(TYPED, &self.type_effect.visible_text())?;
        let glyph_width = text_width(&self.cursor.props().glyph).max(1);
        let cursor = tree.fixed(CURSOR, glyph_width, 1)?;
        let typing = tree.container("typing", &BoxStyle::row(), &[typed, cursor])?;

        let mut main_style = BoxStyle::centered_column().with_gap(1).with_grow(1.0);
        main_style.height = Dimension::Auto;
        let main = tree.container("main", &main_style, &[heading, tagline, typing])?;

        let links = (0..self.content.links.len())
            .filter_map(|i| {
                let text = self.link_text(i)?;
                Some(tree.text(link_node(i), &text))
            })
            .collect::<Result<Vec<_>>>()?;
        let footer = tree.container(
            "footer",
            &BoxStyle::row()
                .with_wrap()
                .with_gap(3)
                .with_justify(Justify::Center)
                .with_width(Dimension::Percent(100.0)),
            &links,
        )?;

        let status = tree.text(STATUS, &self.meta.description)?;

        let mut root_style = BoxStyle::centered_column().with_gap(1).with_padding(2, 1);
        root_style.justify = Justify::SpaceBetween;
        tree.container("root", &root_style, &[main, footer, status])
    }

    fn paint(&self, frame: &mut FrameBuffer, layout: &ComputedLayout, theme: &Theme) {
        if let Some(rect) = layout.rect(HEADING) {
            paint_centered(frame, rect, &self.content.heading, theme.text, Attr::BOLD);
        }
        if let Some(rect) = layout.rect(TAGLINE) {
            paint_centered(frame, rect, &self.content.tagline, theme.text, Attr::NONE);
        }
        if let Some(rect) = layout.rect(TYPED) {
            let visible = self.type_effect.visible_text();
            frame.draw_text(rect.x, rect.y, &visible, theme.text, None, Attr::NONE, Some(&rect));
        }
        if let Some(rect) = layout.rect(CURSOR) {
            let glyph = self.cursor.glyph();
            frame.draw_text(rect.x, rect.y, &glyph, theme.accent, None, Attr::NONE, Some(&rect));
        }

        for (i, link) in self.content.links.iter().enumerate() {
            let (Some(rect), Some(text)) = (layout.rect(&link_node(i)), self.link_text(i)) else {
                continue;
            };
            frame.draw_link(rect.x, rect.y, &text, &link.url, theme.accent, Attr::UNDERLINE);
        }

        if let Some(rect) = layout.rect(STATUS) {
            paint_centered(frame, rect, &self.meta.description, theme.muted, Attr::DIM);
        }
    }

    fn is_settled(&self) -> bool {
        !self.type_effect.has_pending_timer() && !self.cursor.has_pending_timer()
    }

    fn unmount(&self) {
        self.type_effect.unmount();
        self.cursor.unmount();
        tracing::debug!("home page unmounted");
    }
}
