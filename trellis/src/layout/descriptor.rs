//! Layout container descriptors, buffered items and sizing entries.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::StyleError;
use crate::primitives::{Point, Rect, Size};
use crate::style::{
    Border, BorderSide, Edge, LengthOrPercent, StyleUpdate, parse_keyword, parse_length,
    parse_length_or_percent, split_declarations,
};
use crate::widget::WidgetId;

use super::box_model::BoxModel;
use super::flags::{Align, Axis, FillDirection, LayoutKind, Overflow, Placement};

/// Maximum number of wrapped lines tracked per container.
pub const MAX_FLOW_LINES: usize = 64;

// =========================================================================
// Sizing
// =========================================================================

/// Size of one axis of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SizeSpec {
    /// Grow with content.
    #[default]
    Fit,
    /// Fixed pixel size.
    Absolute(f32),
    /// Fraction (0.0-1.0) of the parent's size.
    Relative(f32),
}

impl SizeSpec {
    /// Resolve against the parent's extent. `None` for `Fit`.
    pub fn resolve(self, parent: f32) -> Option<f32> {
        match self {
            SizeSpec::Fit => None,
            SizeSpec::Absolute(v) => Some(v),
            SizeSpec::Relative(f) => Some(parent * f),
        }
    }

    fn parse(value: &str, em: f32) -> Option<Self> {
        Some(match parse_length_or_percent(value, em)? {
            LengthOrPercent::Length(px) => SizeSpec::Absolute(px),
            LengthOrPercent::Fraction(f) => SizeSpec::Relative(f),
        })
    }
}

/// Explicit width/height override for the next layouts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sizing {
    pub width: SizeSpec,
    pub height: SizeSpec,
}

impl Sizing {
    pub const FIT: Self = Self {
        width: SizeSpec::Fit,
        height: SizeSpec::Fit,
    };

    pub fn on(&self, axis: Axis) -> SizeSpec {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

// =========================================================================
// LayoutSpec
// =========================================================================

/// Parameters for opening a layout container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutSpec {
    pub kind: LayoutKind,
    pub fill: FillDirection,
    pub align: Align,
    pub spacing: Size,
    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
    pub border: Border,
    /// Pushed on open and popped on close when set.
    pub sizing: Option<Sizing>,
}

impl LayoutSpec {
    pub fn new(kind: LayoutKind) -> Self {
        Self {
            kind,
            align: Align::LEFT | Align::TOP,
            ..Self::default()
        }
    }

    pub fn horizontal() -> Self {
        Self::new(LayoutKind::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(LayoutKind::Vertical)
    }

    pub fn fill(mut self, fill: FillDirection) -> Self {
        self.fill = fill;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Same gap on both axes.
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = Size::new(spacing, spacing);
        self
    }

    pub fn spacing_xy(mut self, x: f32, y: f32) -> Self {
        self.spacing = Size::new(x, y);
        self
    }

    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow_x = overflow;
        self.overflow_y = overflow;
        self
    }

    pub fn overflow_x(mut self, overflow: Overflow) -> Self {
        self.overflow_x = overflow;
        self
    }

    pub fn overflow_y(mut self, overflow: Overflow) -> Self {
        self.overflow_y = overflow;
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    pub fn width(mut self, width: SizeSpec) -> Self {
        self.sizing.get_or_insert(Sizing::FIT).width = width;
        self
    }

    pub fn height(mut self, height: SizeSpec) -> Self {
        self.sizing.get_or_insert(Sizing::FIT).height = height;
        self
    }

    pub fn overflow_on(&self, axis: Axis) -> Overflow {
        match axis {
            Axis::Horizontal => self.overflow_x,
            Axis::Vertical => self.overflow_y,
        }
    }

    /// Build a spec from `name: value;` declarations. Unknown or malformed
    /// declarations are returned and otherwise ignored.
    pub fn from_declarations(kind: LayoutKind, decl: &str, em: f32) -> (Self, Vec<StyleError>) {
        let mut spec = Self::new(kind);
        let mut errors = Vec::new();
        let mut halign = None;
        let mut valign = None;

        for entry in split_declarations(decl) {
            let (name, value) = match entry {
                Ok(pair) => pair,
                Err(e) => {
                    errors.push(e);
                    continue;
                }
            };
            let keyword = parse_keyword(value).unwrap_or_default();
            let keyword = keyword.as_str();
            let invalid = || StyleError::invalid(&name, value);
            let length = || parse_length(value, em).ok_or_else(invalid);
            let overflow = || match keyword {
                "clip" => Ok(Overflow::Clip),
                "scroll" => Ok(Overflow::Scroll),
                "wrap" => Ok(Overflow::Wrap),
                _ => Err(invalid()),
            };

            let result = match name.as_str() {
                "width" => SizeSpec::parse(value, em)
                    .map(|w| spec.sizing.get_or_insert(Sizing::FIT).width = w)
                    .ok_or_else(invalid),
                "height" => SizeSpec::parse(value, em)
                    .map(|h| spec.sizing.get_or_insert(Sizing::FIT).height = h)
                    .ok_or_else(invalid),
                "spacing" => length().map(|s| spec.spacing = Size::new(s, s)),
                "spacing-x" => length().map(|s| spec.spacing.width = s),
                "spacing-y" => length().map(|s| spec.spacing.height = s),
                "overflow" => overflow().map(|o| {
                    spec.overflow_x = o;
                    spec.overflow_y = o;
                }),
                "overflow-x" => overflow().map(|o| spec.overflow_x = o),
                "overflow-y" => overflow().map(|o| spec.overflow_y = o),
                "halign" | "horizontal-align" => horizontal_align(keyword)
                    .map(|a| halign = Some(a))
                    .ok_or_else(invalid),
                "valign" | "vertical-align" => vertical_align(keyword)
                    .map(|a| valign = Some(a))
                    .ok_or_else(invalid),
                "align" => match keyword {
                    "center" => {
                        halign = Some(Align::HCENTER);
                        valign = Some(Align::VCENTER);
                        Ok(())
                    }
                    "justify" => {
                        halign = Some(Align::JUSTIFY_H);
                        valign = Some(Align::JUSTIFY_V);
                        Ok(())
                    }
                    _ => Err(invalid()),
                },
                "fill" => fill_direction(keyword)
                    .map(|f| spec.fill = f)
                    .ok_or_else(invalid),
                n if n.starts_with("border") => {
                    StyleUpdate::parse(n, value, em).and_then(|update| match update {
                        StyleUpdate::Border(edge, side) => {
                            apply_border(&mut spec.border, edge, side);
                            Ok(())
                        }
                        _ => Err(StyleError::UnknownProperty(n.to_string())),
                    })
                }
                other => Err(StyleError::UnknownProperty(other.to_string())),
            };

            if let Err(e) = result {
                errors.push(e);
            }
        }

        if let Some(h) = halign {
            spec.align = (spec.align - Align::HORIZONTAL) | h;
        }
        if let Some(v) = valign {
            spec.align = (spec.align - Align::VERTICAL) | v;
        }
        (spec, errors)
    }
}

fn horizontal_align(value: &str) -> Option<Align> {
    match value {
        "left" => Some(Align::LEFT),
        "right" => Some(Align::RIGHT),
        "center" => Some(Align::HCENTER),
        "justify" => Some(Align::JUSTIFY_H),
        _ => None,
    }
}

fn vertical_align(value: &str) -> Option<Align> {
    match value {
        "top" => Some(Align::TOP),
        "bottom" => Some(Align::BOTTOM),
        "center" => Some(Align::VCENTER),
        "justify" => Some(Align::JUSTIFY_V),
        _ => None,
    }
}

fn fill_direction(value: &str) -> Option<FillDirection> {
    match value {
        "all" => Some(FillDirection::all()),
        "horizontal" => Some(FillDirection::HORIZONTAL),
        "vertical" => Some(FillDirection::VERTICAL),
        "none" => Some(FillDirection::empty()),
        _ => None,
    }
}

fn apply_border(border: &mut Border, edge: Edge, side: BorderSide) {
    match edge {
        Edge::All => {
            for s in border.sides_mut() {
                *s = side;
            }
        }
        Edge::Top => border.top = side,
        Edge::Right => border.right = side,
        Edge::Bottom => border.bottom = side,
        Edge::Left => border.left = side,
    }
}

// =========================================================================
// Buffered items
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Widget(WidgetId),
    /// A closed child container. Its own items occupy `descendants` in the
    /// shared item list and move together with it.
    Sublayout {
        border: Border,
        descendants: Range<usize>,
    },
}

/// One buffered entry of a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutItem {
    pub kind: ItemKind,
    pub boxes: BoxModel,
    /// Line and position within the line, oriented as rows for horizontal
    /// flows and columns for vertical ones.
    pub row: usize,
    pub col: usize,
    /// Depth of the layout that owns this item.
    pub depth: usize,
    /// Anchored to the far edge of its parent; skipped by flow alignment.
    pub pinned: bool,
}

impl LayoutItem {
    pub fn widget(id: WidgetId, boxes: BoxModel) -> Self {
        Self {
            kind: ItemKind::Widget(id),
            boxes,
            row: 0,
            col: 0,
            depth: 0,
            pinned: false,
        }
    }

    pub fn widget_id(&self) -> Option<WidgetId> {
        match self.kind {
            ItemKind::Widget(id) => Some(id),
            ItemKind::Sublayout { .. } => None,
        }
    }
}

/// What the host draws, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawCommand {
    Widget { id: WidgetId, boxes: BoxModel },
    LayoutBorder { bounds: Rect, border: BorderWidths },
}

/// Border thicknesses of a container, for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BorderWidths {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl From<&Border> for BorderWidths {
    fn from(b: &Border) -> Self {
        Self {
            top: b.top.thickness,
            right: b.right.thickness,
            bottom: b.bottom.thickness,
            left: b.left.thickness,
        }
    }
}

// =========================================================================
// Open containers
// =========================================================================

/// One row (horizontal flow) or column (vertical flow) of items.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowLine {
    /// Items plus gaps on the main axis.
    pub extent: f32,
    /// Items only, without gaps.
    pub items_extent: f32,
    /// Largest item on the cross axis.
    pub cross: f32,
    /// Offset of this line from the container's cross start.
    pub cross_start: f32,
    pub count: usize,
}

/// Space set aside in the parent when a child container opens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Reservation {
    /// Parent cursor before the reservation.
    pub near: Point,
    pub far: Point,
    /// Child was anchored to the parent's far edge on this axis.
    pub pinned: Option<Axis>,
}

/// An open flow container.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDescriptor {
    pub kind: LayoutKind,
    pub fill: FillDirection,
    pub align: Align,
    pub spacing: Size,
    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
    pub border: Border,
    /// Inner geometry (inside the border). Grows on fitting axes.
    pub bounds: Rect,
    /// Axes with a fixed or filled size.
    pub expands: Placement,
    /// Where the next item starts.
    pub cursor: Point,
    /// Far edge still available to far-anchored children.
    pub far: Point,
    pub lines: Vec<FlowLine>,
    /// First index of this container in the shared item list.
    pub from: usize,
    pub depth: usize,
    pub(crate) reservation: Option<Reservation>,
    pub(crate) pop_sizing_on_end: bool,
    /// Sizing stack height once this container opened; entries above it
    /// were pushed explicitly for the next child.
    pub(crate) sizing_mark: usize,
}

impl LayoutDescriptor {
    pub(crate) fn open(spec: &LayoutSpec, from: usize, depth: usize) -> Self {
        Self {
            kind: spec.kind,
            fill: spec.fill,
            align: spec.align,
            spacing: spec.spacing,
            overflow_x: spec.overflow_x,
            overflow_y: spec.overflow_y,
            border: spec.border,
            bounds: Rect::ZERO,
            expands: Placement::empty(),
            cursor: Point::ORIGIN,
            far: Point::ORIGIN,
            lines: vec![FlowLine::default()],
            from,
            depth,
            reservation: None,
            pop_sizing_on_end: false,
            sizing_mark: 0,
        }
    }

    pub fn main_axis(&self) -> Axis {
        self.kind.main_axis()
    }

    pub fn spacing_on(&self, axis: Axis) -> f32 {
        axis.of_size(self.spacing)
    }

    /// Whether adding past the main-axis edge starts a new line.
    pub fn wraps(&self) -> bool {
        let main = self.main_axis();
        let overflow = match main {
            Axis::Horizontal => self.overflow_x,
            Axis::Vertical => self.overflow_y,
        };
        self.expands.expands(main) && (self.kind == LayoutKind::Grid || overflow == Overflow::Wrap)
    }

    pub fn current_line(&self) -> &FlowLine {
        // `lines` always holds at least one entry.
        &self.lines[self.lines.len() - 1]
    }

    /// Gap to insert before the next item on the main axis.
    pub fn leading_gap(&self) -> f32 {
        if self.current_line().count > 0 {
            self.spacing_on(self.main_axis())
        } else {
            0.0
        }
    }

    /// Where the next item's margin box starts.
    pub fn next_item_origin(&self) -> Point {
        self.cursor + self.main_axis().offset(self.leading_gap())
    }

    /// Cross-axis extent used by all lines so far.
    pub fn used_cross(&self) -> f32 {
        let last = self.current_line();
        last.cross_start + last.cross
    }

    /// Outer geometry including the border.
    pub fn outer_bounds(&self) -> Rect {
        let b = &self.border;
        Rect::new(
            self.bounds.x - b.left.thickness,
            self.bounds.y - b.top.thickness,
            self.bounds.width + b.horizontal(),
            self.bounds.height + b.vertical(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Color;

    #[test]
    fn test_spec_builder() {
        let spec = LayoutSpec::horizontal()
            .spacing(10.0)
            .overflow(Overflow::Wrap)
            .width(SizeSpec::Absolute(300.0));
        assert_eq!(spec.spacing, Size::new(10.0, 10.0));
        assert_eq!(spec.sizing.unwrap().width, SizeSpec::Absolute(300.0));
        assert_eq!(spec.sizing.unwrap().height, SizeSpec::Fit);
    }

    #[test]
    fn test_spec_from_declarations() {
        let (spec, errors) = LayoutSpec::from_declarations(
            LayoutKind::Vertical,
            "width: 50%; height: 120px; spacing-x: 4px; overflow-y: wrap; align: center; fill: horizontal; border: 2px #fff",
            16.0,
        );
        assert!(errors.is_empty(), "{errors:?}");
        let sizing = spec.sizing.unwrap();
        assert_eq!(sizing.width, SizeSpec::Relative(0.5));
        assert_eq!(sizing.height, SizeSpec::Absolute(120.0));
        assert_eq!(spec.spacing, Size::new(4.0, 0.0));
        assert_eq!(spec.overflow_y, Overflow::Wrap);
        assert_eq!(spec.align, Align::CENTER);
        assert_eq!(spec.fill, FillDirection::HORIZONTAL);
        assert_eq!(spec.border.left.thickness, 2.0);
        assert_eq!(spec.border.left.color, Color::WHITE);
    }

    #[test]
    fn test_spec_reports_unknown_keys() {
        let (spec, errors) =
            LayoutSpec::from_declarations(LayoutKind::Horizontal, "gravity: up; spacing: 3", 16.0);
        assert_eq!(errors, vec![StyleError::UnknownProperty("gravity".to_string())]);
        assert_eq!(spec.spacing, Size::new(3.0, 3.0));
    }

    #[test]
    fn test_relative_size_resolves_against_parent() {
        assert_eq!(SizeSpec::Relative(0.25).resolve(400.0), Some(100.0));
        assert_eq!(SizeSpec::Fit.resolve(400.0), None);
    }
}
