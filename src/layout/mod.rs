//! Layout: flexbox placement of page elements.
//!
//! Pages describe themselves as a small tree of boxes and text leaves. The
//! tree is handed to [Taffy](https://github.com/DioxusLabs/taffy) for
//! W3C flexbox computation; text leaves are measured with unicode-width so
//! they wrap the same way the frame buffer draws them.
//!
//! Results come back as absolute [`ClipRect`]s keyed by the names the page
//! gave its nodes.
//!
//! ```
//! use folio::layout::{BoxStyle, LayoutTree};
//!
//! let mut tree = LayoutTree::new();
//! let title = tree.text("title", "hello").unwrap();
//! let root = tree.container("root", &BoxStyle::centered_column(), &[title]).unwrap();
//! let layout = tree.compute(root, 21, 3, true).unwrap();
//!
//! let rect = layout.rect("title").unwrap();
//! assert_eq!((rect.x, rect.width), (8, 5));
//! ```

mod text_measure;

use std::collections::HashMap;

use taffy::{
    AlignItems, AvailableSpace, Dimension as TaffyDimension, FlexDirection, FlexWrap,
    JustifyContent, LengthPercentage, NodeId, Rect, Size, Style, TaffyTree,
};

pub use text_measure::{measure_text_height, text_width, truncate_text, wrap_text};

use crate::error::{FolioError, Result};
use crate::types::ClipRect;

// =============================================================================
// STYLE
// =============================================================================

/// Size along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    #[default]
    Auto,
    Cells(u16),
    /// Fraction of the parent, 0.0 to 100.0.
    Percent(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Row,
    #[default]
    Column,
}

/// Main-axis distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Cross-axis alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Start,
    Center,
    End,
    #[default]
    Stretch,
}

/// Flex container style.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxStyle {
    pub direction: Direction,
    pub justify: Justify,
    pub align: Align,
    pub wrap: bool,
    pub gap: u16,
    pub padding_x: u16,
    pub padding_y: u16,
    pub width: Dimension,
    pub height: Dimension,
    pub grow: f32,
}

impl BoxStyle {
    /// A column that centres its children on both axes.
    pub fn centered_column() -> Self {
        Self {
            direction: Direction::Column,
            justify: Justify::Center,
            align: Align::Center,
            width: Dimension::Percent(100.0),
            height: Dimension::Percent(100.0),
            ..Self::default()
        }
    }

    /// A row of children laid out left to right with no gap.
    pub fn row() -> Self {
        Self {
            direction: Direction::Row,
            align: Align::Start,
            ..Self::default()
        }
    }

    pub fn with_gap(mut self, gap: u16) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    pub fn with_padding(mut self, x: u16, y: u16) -> Self {
        self.padding_x = x;
        self.padding_y = y;
        self
    }

    pub fn with_grow(mut self, grow: f32) -> Self {
        self.grow = grow;
        self
    }

    pub fn with_justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    pub fn with_width(mut self, width: Dimension) -> Self {
        self.width = width;
        self
    }
}

fn to_taffy_dimension(dim: Dimension) -> TaffyDimension {
    match dim {
        Dimension::Auto => TaffyDimension::Auto,
        Dimension::Cells(n) => TaffyDimension::Length(n as f32),
        Dimension::Percent(p) => TaffyDimension::Percent(p / 100.0),
    }
}

fn to_taffy_style(style: &BoxStyle) -> Style {
    let padding_x = LengthPercentage::Length(style.padding_x as f32);
    let padding_y = LengthPercentage::Length(style.padding_y as f32);

    Style {
        flex_direction: match style.direction {
            Direction::Row => FlexDirection::Row,
            Direction::Column => FlexDirection::Column,
        },
        flex_wrap: if style.wrap {
            FlexWrap::Wrap
        } else {
            FlexWrap::NoWrap
        },
        justify_content: Some(match style.justify {
            Justify::Start => JustifyContent::FlexStart,
            Justify::Center => JustifyContent::Center,
            Justify::End => JustifyContent::FlexEnd,
            Justify::SpaceBetween => JustifyContent::SpaceBetween,
        }),
        align_items: Some(match style.align {
            Align::Start => AlignItems::FlexStart,
            Align::Center => AlignItems::Center,
            Align::End => AlignItems::FlexEnd,
            Align::Stretch => AlignItems::Stretch,
        }),
        gap: Size {
            width: LengthPercentage::Length(style.gap as f32),
            height: LengthPercentage::Length(style.gap as f32),
        },
        padding: Rect {
            left: padding_x,
            right: padding_x,
            top: padding_y,
            bottom: padding_y,
        },
        size: Size {
            width: to_taffy_dimension(style.width),
            height: to_taffy_dimension(style.height),
        },
        flex_grow: style.grow,
        ..Default::default()
    }
}

fn layout_error(err: taffy::TaffyError) -> FolioError {
    FolioError::Layout(err.to_string())
}

// =============================================================================
// TREE
// =============================================================================

/// Measure context for leaves: text to wrap, or a fixed cell size.
#[derive(Debug, Clone)]
enum Leaf {
    Text(String),
    Fixed { width: u16, height: u16 },
}

/// A page's layout tree under construction.
pub struct LayoutTree {
    tree: TaffyTree<Leaf>,
    names: HashMap<NodeId, String>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self {
            tree: TaffyTree::new(),
            names: HashMap::new(),
        }
    }

    /// A text leaf, sized by its content and wrapped to the space it gets.
    pub fn text(&mut self, name: impl Into<String>, content: &str) -> Result<NodeId> {
        let node = self
            .tree
            .new_leaf_with_context(Style::default(), Leaf::Text(content.to_string()))
            .map_err(layout_error)?;
        self.names.insert(node, name.into());
        Ok(node)
    }

    /// A leaf that always occupies `width` x `height` cells.
    pub fn fixed(&mut self, name: impl Into<String>, width: u16, height: u16) -> Result<NodeId> {
        let style = Style {
            flex_shrink: 0.0,
            ..Default::default()
        };
        let node = self
            .tree
            .new_leaf_with_context(style, Leaf::Fixed { width, height })
            .map_err(layout_error)?;
        self.names.insert(node, name.into());
        Ok(node)
    }

    /// A flex container over `children`, in order.
    pub fn container(
        &mut self,
        name: impl Into<String>,
        style: &BoxStyle,
        children: &[NodeId],
    ) -> Result<NodeId> {
        let node = self
            .tree
            .new_with_children(to_taffy_style(style), children)
            .map_err(layout_error)?;
        self.names.insert(node, name.into());
        Ok(node)
    }

    /// Compute layout for `root` within a `width` x `height` terminal.
    ///
    /// With `constrain_height` false (inline mode) the height grows to fit
    /// the content.
    pub fn compute(
        mut self,
        root: NodeId,
        width: u16,
        height: u16,
        constrain_height: bool,
    ) -> Result<ComputedLayout> {
        if !constrain_height {
            // Percent heights have nothing to resolve against inline
            let mut style = self.tree.style(root).map_err(layout_error)?.clone();
            style.size.height = TaffyDimension::Auto;
            self.tree.set_style(root, style).map_err(layout_error)?;
        }

        let available = Size {
            width: AvailableSpace::Definite(width as f32),
            height: if constrain_height {
                AvailableSpace::Definite(height as f32)
            } else {
                AvailableSpace::MaxContent
            },
        };

        self.tree
            .compute_layout_with_measure(
                root,
                available,
                |known, available, _node, context, _style| measure_leaf(known, available, context),
            )
            .map_err(layout_error)?;

        let mut result = ComputedLayout::default();
        self.collect(root, 0.0, 0.0, &mut result)?;

        result.content_height = self
            .names
            .get(&root)
            .and_then(|name| result.rects.get(name))
            .map_or(0, |r| r.height);

        tracing::trace!(nodes = result.rects.len(), width, height, "layout computed");
        Ok(result)
    }

    /// Walk the tree accumulating parent offsets into absolute rects.
    fn collect(
        &self,
        node: NodeId,
        parent_x: f32,
        parent_y: f32,
        out: &mut ComputedLayout,
    ) -> Result<()> {
        let layout = self.tree.layout(node).map_err(layout_error)?;
        let x = parent_x + layout.location.x;
        let y = parent_y + layout.location.y;

        if let Some(name) = self.names.get(&node) {
            out.rects.insert(
                name.clone(),
                ClipRect::new(
                    x.round().max(0.0) as u16,
                    y.round().max(0.0) as u16,
                    layout.size.width.round().max(0.0) as u16,
                    layout.size.height.round().max(0.0) as u16,
                ),
            );
        }

        for child in self.tree.children(node).map_err(layout_error)? {
            self.collect(child, x, y, out)?;
        }
        Ok(())
    }
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

fn measure_leaf(
    known: Size<Option<f32>>,
    available: Size<AvailableSpace>,
    context: Option<&mut Leaf>,
) -> Size<f32> {
    match context {
        None => Size::ZERO,
        Some(Leaf::Fixed { width, height }) => Size {
            width: known.width.unwrap_or(*width as f32),
            height: known.height.unwrap_or(*height as f32),
        },
        Some(Leaf::Text(text)) => {
            if text.is_empty() {
                return Size::ZERO;
            }
            let natural = text_width(text);
            let limit = match available.width {
                AvailableSpace::Definite(w) => (w.max(1.0) as u16).min(natural),
                AvailableSpace::MinContent => {
                    text.split(' ').map(text_width).max().unwrap_or(natural)
                }
                AvailableSpace::MaxContent => natural,
            };
            let width = known.width.map_or(limit, |w| w as u16);
            let lines = measure_text_height(text, width);
            let wrapped = wrap_text(text, width)
                .iter()
                .map(|l| text_width(l))
                .max()
                .unwrap_or(0);

            Size {
                width: known.width.unwrap_or(wrapped as f32),
                height: known.height.unwrap_or(lines as f32),
            }
        }
    }
}

// =============================================================================
// RESULT
// =============================================================================

/// Absolute rectangles for every named node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedLayout {
    rects: HashMap<String, ClipRect>,
    /// Height of the root box, the rows inline mode needs.
    pub content_height: u16,
}

impl ComputedLayout {
    pub fn rect(&self, name: &str) -> Option<ClipRect> {
        self.rects.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_column_positions() {
        let mut tree = LayoutTree::new();
        let a = tree.text("a", "abcd").unwrap();
        let b = tree.text("b", "xy").unwrap();
        let root = tree
            .container("root", &BoxStyle::centered_column(), &[a, b])
            .unwrap();
        let layout = tree.compute(root, 20, 10, true).unwrap();

        assert_eq!(layout.rect("root"), Some(ClipRect::new(0, 0, 20, 10)));
        assert_eq!(layout.rect("a"), Some(ClipRect::new(8, 4, 4, 1)));
        assert_eq!(layout.rect("b"), Some(ClipRect::new(9, 5, 2, 1)));
    }

    #[test]
    fn test_row_places_children_side_by_side() {
        let mut tree = LayoutTree::new();
        let text = tree.text("text", "hey").unwrap();
        let cursor = tree.fixed("cursor", 1, 1).unwrap();
        let line = tree.container("line", &BoxStyle::row(), &[text, cursor]).unwrap();
        let root = tree
            .container("root", &BoxStyle::default().with_padding(2, 1), &[line])
            .unwrap();
        let layout = tree.compute(root, 20, 5, true).unwrap();

        assert_eq!(layout.rect("text"), Some(ClipRect::new(2, 1, 3, 1)));
        assert_eq!(layout.rect("cursor"), Some(ClipRect::new(5, 1, 1, 1)));
    }

    #[test]
    fn test_text_wraps_when_narrow() {
        let mut tree = LayoutTree::new();
        let text = tree.text("tagline", "one two three").unwrap();
        let root = tree
            .container("root", &BoxStyle::default().with_width(Dimension::Percent(100.0)), &[text])
            .unwrap();
        let layout = tree.compute(root, 8, 10, true).unwrap();

        let rect = layout.rect("tagline").unwrap();
        assert_eq!(rect.height, 2);
        assert!(rect.width <= 8);
    }

    #[test]
    fn test_inline_height_fits_content() {
        let mut tree = LayoutTree::new();
        let a = tree.text("a", "one").unwrap();
        let b = tree.text("b", "two").unwrap();
        let root = tree
            .container("root", &BoxStyle::centered_column().with_gap(1), &[a, b])
            .unwrap();
        let layout = tree.compute(root, 40, 100, false).unwrap();

        assert_eq!(layout.content_height, 3);
        assert_eq!(layout.rect("b").map(|r| r.y), Some(2));
    }

    #[test]
    fn test_space_between_footer() {
        let mut tree = LayoutTree::new();
        let left = tree.text("left", "ab").unwrap();
        let right = tree.text("right", "cd").unwrap();
        let footer = tree
            .container(
                "footer",
                &BoxStyle::row()
                    .with_justify(Justify::SpaceBetween)
                    .with_width(Dimension::Percent(100.0)),
                &[left, right],
            )
            .unwrap();
        let layout = tree.compute(footer, 10, 1, true).unwrap();

        assert_eq!(layout.rect("left").map(|r| r.x), Some(0));
        assert_eq!(layout.rect("right").map(|r| r.x), Some(8));
    }
}
