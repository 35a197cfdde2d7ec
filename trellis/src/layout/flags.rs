//! Flag sets and small enums shared by the box model and the layout stack.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::primitives::{Point, Rect, Size};

bitflags! {
    /// How a widget's box grows from its anchor position.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Placement: u8 {
        /// Fill available width instead of fitting content.
        const EXPAND_H = 1 << 0;
        /// Fill available height instead of fitting content.
        const EXPAND_V = 1 << 1;
        /// Anchor is the right edge; the box grows leftwards.
        const TO_LEFT = 1 << 2;
        /// Anchor is the bottom edge; the box grows upwards.
        const TO_TOP = 1 << 3;
    }
}

impl Placement {
    pub const EXPAND_ALL: Self = Self::EXPAND_H.union(Self::EXPAND_V);

    pub fn expands(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Self::EXPAND_H),
            Axis::Vertical => self.contains(Self::EXPAND_V),
        }
    }

    pub fn reversed(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Self::TO_LEFT),
            Axis::Vertical => self.contains(Self::TO_TOP),
        }
    }

    pub fn expand_flag(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::EXPAND_H,
            Axis::Vertical => Self::EXPAND_V,
        }
    }
}

bitflags! {
    /// Alignment of text inside content, and of items inside a layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Align: u16 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const HCENTER = 1 << 2;
        const TOP = 1 << 3;
        const BOTTOM = 1 << 4;
        const VCENTER = 1 << 5;
        const JUSTIFY_H = 1 << 6;
        const JUSTIFY_V = 1 << 7;
    }
}

impl Align {
    pub const CENTER: Self = Self::HCENTER.union(Self::VCENTER);
    pub const JUSTIFY: Self = Self::JUSTIFY_H.union(Self::JUSTIFY_V);
    pub const HORIZONTAL: Self = Self::LEFT
        .union(Self::RIGHT)
        .union(Self::HCENTER)
        .union(Self::JUSTIFY_H);
    pub const VERTICAL: Self = Self::TOP
        .union(Self::BOTTOM)
        .union(Self::VCENTER)
        .union(Self::JUSTIFY_V);

    pub fn centers(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Self::HCENTER),
            Axis::Vertical => self.contains(Self::VCENTER),
        }
    }

    pub fn justifies(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Self::JUSTIFY_H),
            Axis::Vertical => self.contains(Self::JUSTIFY_V),
        }
    }

    /// Anchored to the far edge (right or bottom) on `axis`.
    pub fn far(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Self::RIGHT),
            Axis::Vertical => self.contains(Self::BOTTOM),
        }
    }
}

bitflags! {
    /// Axes along which a child layout fills its parent.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FillDirection: u8 {
        const HORIZONTAL = 1 << 0;
        const VERTICAL = 1 << 1;
    }
}

impl FillDirection {
    pub fn fills(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Self::HORIZONTAL),
            Axis::Vertical => self.contains(Self::VERTICAL),
        }
    }
}

/// Flow orientation of a layout container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutKind {
    #[default]
    Horizontal,
    Vertical,
    /// Horizontal flow that always wraps at the container edge.
    Grid,
}

impl LayoutKind {
    pub fn main_axis(self) -> Axis {
        match self {
            LayoutKind::Horizontal | LayoutKind::Grid => Axis::Horizontal,
            LayoutKind::Vertical => Axis::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Overflow {
    #[default]
    Clip,
    Scroll,
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    pub fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    pub fn of_point(self, p: Point) -> f32 {
        match self {
            Axis::Horizontal => p.x,
            Axis::Vertical => p.y,
        }
    }

    pub fn point_mut(self, p: &mut Point) -> &mut f32 {
        match self {
            Axis::Horizontal => &mut p.x,
            Axis::Vertical => &mut p.y,
        }
    }

    pub fn of_size(self, s: Size) -> f32 {
        match self {
            Axis::Horizontal => s.width,
            Axis::Vertical => s.height,
        }
    }

    /// Near edge of `r` on this axis.
    pub fn start(self, r: &Rect) -> f32 {
        match self {
            Axis::Horizontal => r.x,
            Axis::Vertical => r.y,
        }
    }

    /// Far edge of `r` on this axis.
    pub fn end(self, r: &Rect) -> f32 {
        match self {
            Axis::Horizontal => r.right(),
            Axis::Vertical => r.bottom(),
        }
    }

    pub fn extent(self, r: &Rect) -> f32 {
        match self {
            Axis::Horizontal => r.width,
            Axis::Vertical => r.height,
        }
    }

    /// Replace the `[start, end)` span of `r` on this axis.
    pub fn set_span(self, r: &mut Rect, start: f32, end: f32) {
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        match self {
            Axis::Horizontal => {
                r.x = lo;
                r.width = hi - lo;
            }
            Axis::Vertical => {
                r.y = lo;
                r.height = hi - lo;
            }
        }
    }

    /// Offset vector of `amount` along this axis.
    pub fn offset(self, amount: f32) -> Point {
        match self {
            Axis::Horizontal => Point::new(amount, 0.0),
            Axis::Vertical => Point::new(0.0, amount),
        }
    }
}
