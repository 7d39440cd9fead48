//! Pages: what gets drawn.
//!
//! A page owns its components, describes its layout as a [`LayoutTree`],
//! and paints itself into a [`FrameBuffer`] from the computed rectangles.
//! Painting reads component signals, so a page rendered inside a `derived`
//! re-renders whenever an animation ticks.

mod home;
mod list;

pub use home::HomePage;
pub use list::ListPage;

use taffy::NodeId;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::layout::{ComputedLayout, LayoutTree, wrap_text};
use crate::renderer::FrameBuffer;
use crate::theme::Theme;
use crate::timer::TimerQueue;
use crate::types::{Attr, ClipRect, Rgba};

/// The pages folio knows how to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PageKind {
    #[default]
    Home,
    List,
}

pub trait Page {
    fn kind(&self) -> PageKind;

    /// Terminal window title while the page is shown.
    fn title(&self) -> &str;

    /// Add the page's nodes to `tree`, returning the root.
    fn build(&self, tree: &mut LayoutTree) -> Result<NodeId>;

    fn paint(&self, frame: &mut FrameBuffer, layout: &ComputedLayout, theme: &Theme);

    /// True once nothing on the page will change on its own.
    fn is_settled(&self) -> bool {
        true
    }

    /// Stop the page's animations. The page is not reused afterwards.
    fn unmount(&self) {}
}

/// Create a page with its components mounted on `timers`.
pub fn create_page(kind: PageKind, config: &SiteConfig, timers: &TimerQueue) -> Box<dyn Page> {
    tracing::debug!(?kind, "creating page");
    match kind {
        PageKind::Home => Box::new(HomePage::new(config, timers)),
        PageKind::List => Box::new(ListPage::new(config)),
    }
}

/// Lay out and paint `page` into a fresh frame.
///
/// Fullscreen frames are exactly `width` x `height`. Inline frames are as
/// tall as the content needs.
pub fn render_page(
    page: &dyn Page,
    width: u16,
    height: u16,
    fullscreen: bool,
    theme: &Theme,
) -> Result<FrameBuffer> {
    let mut tree = LayoutTree::new();
    let root = page.build(&mut tree)?;
    let layout = tree.compute(root, width, height, fullscreen)?;

    let rows = if fullscreen {
        height
    } else {
        layout.content_height.max(1)
    };
    let mut frame = FrameBuffer::with_background(width, rows, theme.background);
    page.paint(&mut frame, &layout, theme);
    Ok(frame)
}

/// Draw wrapped text into `rect`, each line centred within it.
pub(crate) fn paint_centered(
    frame: &mut FrameBuffer,
    rect: ClipRect,
    text: &str,
    fg: Rgba,
    attrs: Attr,
) {
    for (i, line) in wrap_text(text, rect.width).iter().enumerate() {
        let Some(y) = rect.y.checked_add(i as u16) else {
            break;
        };
        if y >= rect.y.saturating_add(rect.height) {
            break;
        }
        frame.draw_text_centered(rect.x, y, rect.width, line, fg, None, attrs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_frame_fits_content() {
        let timers = TimerQueue::new();
        let config = SiteConfig::default();
        let page = create_page(PageKind::List, &config, &timers);

        let frame = render_page(page.as_ref(), 40, 100, false, &Theme::default()).unwrap();
        assert!(frame.height() < 100);
        assert!(frame.find_text("9").is_some());
    }

    #[test]
    fn test_fullscreen_frame_fills_terminal() {
        let timers = TimerQueue::new();
        let config = SiteConfig::default();
        let page = create_page(PageKind::Home, &config, &timers);

        let frame = render_page(page.as_ref(), 100, 30, true, &Theme::default()).unwrap();
        assert_eq!((frame.width(), frame.height()), (100, 30));
        assert_eq!(page.title(), "AJClifton");
    }
}
