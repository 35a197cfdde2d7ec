//! Box-model geometry for a single widget.
//!
//! ```text
//! +-------------------------------+
//! |            margin             |
//! |   +-----------------------+   |
//! |   |        border         |   |
//! |   |   +---------------+   |   |
//! |   |   |    padding    |   |   |
//! |   |   |   +-------+   |   |   |
//! |   |   |   |content|   |   |   |
//! |   |   |   +-------+   |   |   |
//! |   |   +---------------+   |   |
//! |   +-----------------------+   |
//! +-------------------------------+
//! ```

use serde::{Deserialize, Serialize};

use crate::backend::TextMeasurer;
use crate::primitives::{Point, Rect, Size};
use crate::style::{FontFlags, StyleDescriptor};
use crate::widget::WidgetId;

use super::flags::{Align, Axis, Placement};

/// The five nested rectangles of a widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxModel {
    pub content: Rect,
    pub padding: Rect,
    pub border: Rect,
    pub margin: Rect,
    /// Where the text is drawn; may overflow `content`.
    pub text: Rect,
}

impl BoxModel {
    /// A box whose every rectangle equals `rect`.
    pub fn uniform(rect: Rect) -> Self {
        Self {
            content: rect,
            padding: rect,
            border: rect,
            margin: rect,
            text: rect,
        }
    }

    pub fn translate(&mut self, offset: Point) {
        self.content = self.content.translate(offset);
        self.padding = self.padding.translate(offset);
        self.border = self.border.translate(offset);
        self.margin = self.margin.translate(offset);
        self.text = self.text.translate(offset);
    }

    /// `margin ⊇ border ⊇ padding ⊇ content`, up to float rounding.
    pub fn is_nested(&self) -> bool {
        const EPS: f32 = 1e-3;
        let within = |outer: &Rect, inner: &Rect| {
            inner.x >= outer.x - EPS
                && inner.y >= outer.y - EPS
                && inner.right() <= outer.right() + EPS
                && inner.bottom() <= outer.bottom() + EPS
        };
        within(&self.margin, &self.border)
            && within(&self.border, &self.padding)
            && within(&self.padding, &self.content)
    }
}

/// How far a box may extend on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisLimit {
    /// Size from content (explicit dimension or measured text).
    FitContent,
    /// Grow from the anchor up to this coordinate.
    ExpandTo(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxLimits {
    pub horizontal: AxisLimit,
    pub vertical: AxisLimit,
}

impl BoxLimits {
    pub const FIT: Self = Self {
        horizontal: AxisLimit::FitContent,
        vertical: AxisLimit::FitContent,
    };

    fn on(&self, axis: Axis) -> AxisLimit {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}

/// Widgets bounding an expanding widget outside of any layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborWidgets {
    pub left: Option<WidgetId>,
    pub right: Option<WidgetId>,
    pub top: Option<WidgetId>,
    pub bottom: Option<WidgetId>,
}

/// Per-axis edge thicknesses, near side first (in growth direction).
struct Edges {
    margin: (f32, f32),
    border: (f32, f32),
    padding: (f32, f32),
}

impl Edges {
    fn of(style: &StyleDescriptor, axis: Axis, reversed: bool) -> Self {
        let (margin, border, padding) = match axis {
            Axis::Horizontal => (
                (style.margin.left, style.margin.right),
                (style.border.left.thickness, style.border.right.thickness),
                (style.padding.left, style.padding.right),
            ),
            Axis::Vertical => (
                (style.margin.top, style.margin.bottom),
                (style.border.top.thickness, style.border.bottom.thickness),
                (style.padding.top, style.padding.bottom),
            ),
        };
        let swap = |(a, b): (f32, f32)| if reversed { (b, a) } else { (a, b) };
        Self {
            margin: swap(margin),
            border: swap(border),
            padding: swap(padding),
        }
    }

    fn total(&self) -> f32 {
        self.margin.0 + self.margin.1 + self.border.0 + self.border.1 + self.padding.0 + self.padding.1
    }
}

/// Lay one axis of the four boxes out from `anchor` with `extent` of content,
/// growing in direction `dir` (+1 or -1).
fn place_axis(boxes: &mut BoxModel, axis: Axis, anchor: f32, dir: f32, edges: &Edges, extent: f32) {
    let m0 = anchor;
    let b0 = m0 + dir * edges.margin.0;
    let p0 = b0 + dir * edges.border.0;
    let c0 = p0 + dir * edges.padding.0;
    let c1 = c0 + dir * extent;
    let p1 = c1 + dir * edges.padding.1;
    let b1 = p1 + dir * edges.border.1;
    let m1 = b1 + dir * edges.margin.1;

    axis.set_span(&mut boxes.margin, m0, m1);
    axis.set_span(&mut boxes.border, b0, b1);
    axis.set_span(&mut boxes.padding, p0, p1);
    axis.set_span(&mut boxes.content, c0, c1);
}

fn explicit(style: &StyleDescriptor, axis: Axis) -> Option<f32> {
    match axis {
        Axis::Horizontal => style.width(),
        Axis::Vertical => style.height(),
    }
}

fn clamp(style: &StyleDescriptor, axis: Axis, v: f32) -> f32 {
    match axis {
        Axis::Horizontal => style.clamp_width(v),
        Axis::Vertical => style.clamp_height(v),
    }
}

/// Compute the box model of a widget anchored at `pos`.
///
/// Each axis is resolved independently. A fitting axis takes its content
/// extent from the explicit style dimension or the measured text, clamped to
/// the style's min/max. An expanding axis fills the space up to its limit,
/// still clamped to min/max so the boxes stay nested. Text is offset inside
/// content only on expanded axes that are centered or end-aligned.
pub fn compute_box_model(
    pos: Point,
    style: &StyleDescriptor,
    text: &str,
    placement: Placement,
    limits: BoxLimits,
    measurer: &dyn TextMeasurer,
) -> BoxModel {
    let mut boxes = BoxModel::default();
    let font = &style.font;
    let nowrap = font.flags.contains(FontFlags::NO_WRAP);
    let clipped = font.flags.intersects(FontFlags::OVERFLOW);

    let measure = |wrap: Option<f32>| -> Size {
        let wrap = if nowrap { None } else { wrap };
        measurer.measure_text(text, font.handle, font.size, wrap)
    };

    let mut text_size: Option<Size> = None;
    let mut expanded = [false; 2];

    for (i, axis) in Axis::BOTH.into_iter().enumerate() {
        let reversed = placement.reversed(axis);
        let dir = if reversed { -1.0 } else { 1.0 };
        let anchor = axis.of_point(pos);
        let edges = Edges::of(style, axis, reversed);

        let limit = if placement.expands(axis) {
            limits.on(axis)
        } else {
            AxisLimit::FitContent
        };

        let extent = match limit {
            AxisLimit::ExpandTo(to) => {
                expanded[i] = true;
                let available = (dir * (to - anchor)).max(0.0);
                clamp(style, axis, (available - edges.total()).max(0.0))
            }
            AxisLimit::FitContent => match explicit(style, axis) {
                Some(dim) => clamp(style, axis, dim),
                None => {
                    let size = *text_size.get_or_insert_with(|| match axis {
                        Axis::Horizontal => {
                            let wrap = style.width().filter(|_| !clipped);
                            measure(wrap)
                        }
                        Axis::Vertical => measure(Some(boxes.content.width)),
                    });
                    clamp(style, axis, axis.of_size(size))
                }
            },
        };

        place_axis(&mut boxes, axis, anchor, dir, &edges, extent);
    }

    let text_size = text_size.unwrap_or_else(|| measure(Some(boxes.content.width)));
    let mut text_pos = boxes.content.origin();
    for (i, axis) in Axis::BOTH.into_iter().enumerate() {
        if !expanded[i] {
            continue;
        }
        let room = axis.extent(&boxes.content) - axis.of_size(text_size);
        if room <= 0.0 {
            continue;
        }
        let end_aligned = match axis {
            Axis::Horizontal => style.alignment.contains(Align::RIGHT),
            Axis::Vertical => style.alignment.contains(Align::BOTTOM),
        };
        if style.alignment.centers(axis) {
            *axis.point_mut(&mut text_pos) += room * 0.5;
        } else if end_aligned {
            *axis.point_mut(&mut text_pos) += room;
        }
    }
    boxes.text = Rect::from_origin_size(text_pos, text_size);

    boxes
}
