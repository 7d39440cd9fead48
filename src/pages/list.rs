//! Placeholder list page: a bullet per index.

use taffy::NodeId;

use super::{Page, PageKind};
use crate::config::SiteConfig;
use crate::error::Result;
use crate::layout::{BoxStyle, ComputedLayout, LayoutTree};
use crate::renderer::FrameBuffer;
use crate::theme::Theme;
use crate::types::Attr;

pub struct ListPage {
    title: String,
    count: usize,
}

impl ListPage {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            title: format!("{} | List", config.site.title),
            count: config.list.count,
        }
    }

    fn item(index: usize) -> String {
        format!("• {index}")
    }
}

impl Page for ListPage {
    fn kind(&self) -> PageKind {
        PageKind::List
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn build(&self, tree: &mut LayoutTree) -> Result<NodeId> {
        let items = (0..self.count)
            .map(|i| tree.text(format!("item{i}"), &Self::item(i)))
            .collect::<Result<Vec<_>>>()?;
        tree.container("root", &BoxStyle::default().with_padding(2, 1), &items)
    }

    fn paint(&self, frame: &mut FrameBuffer, layout: &ComputedLayout, theme: &Theme) {
        for i in 0..self.count {
            if let Some(rect) = layout.rect(&format!("item{i}")) {
                let item = Self::item(i);
                frame.draw_text(rect.x, rect.y, &item, theme.text, None, Attr::NONE, None);
            }
        }
    }
}
