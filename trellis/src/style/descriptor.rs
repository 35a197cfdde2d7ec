//! Resolved style values for one interaction state.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::backend::FontHandle;
use crate::layout::Align;
use crate::primitives::{Color, Point, Size};

bitflags! {
    /// Which properties of a [`StyleDescriptor`] were set explicitly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleProps: u32 {
        const BACKGROUND = 1 << 0;
        const FG_COLOR = 1 << 1;
        const FONT_SIZE = 1 << 2;
        const FONT_FAMILY = 1 << 3;
        const FONT_WEIGHT = 1 << 4;
        const FONT_STYLE = 1 << 5;
        const WIDTH = 1 << 6;
        const HEIGHT = 1 << 7;
        const H_ALIGNMENT = 1 << 8;
        const V_ALIGNMENT = 1 << 9;
        const PADDING = 1 << 10;
        const MARGIN = 1 << 11;
        const BORDER = 1 << 12;
        const BORDER_RADIUS = 1 << 13;
        const BOX_SHADOW = 1 << 14;
        const MIN_WIDTH = 1 << 15;
        const MAX_WIDTH = 1 << 16;
        const MIN_HEIGHT = 1 << 17;
        const MAX_HEIGHT = 1 << 18;
        const TEXT_WRAP = 1 << 19;
        const TEXT_OVERFLOW = 1 << 20;
        /// Marker: inheritance from the base style already ran.
        const UPDATED_FROM_BASE = 1 << 31;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontFlags: u8 {
        const BOLD = 1 << 0;
        const LIGHT = 1 << 1;
        const ITALIC = 1 << 2;
        const NO_WRAP = 1 << 3;
        const ELLIPSIS = 1 << 4;
        const MARQUEE = 1 << 5;
    }
}

impl FontFlags {
    pub const WEIGHT: Self = Self::BOLD.union(Self::LIGHT);
    pub const OVERFLOW: Self = Self::ELLIPSIS.union(Self::MARQUEE);
}

/// Font family, size and style flags, plus the handle once looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
    pub flags: FontFlags,
    pub handle: Option<FontHandle>,
}

impl FontSpec {
    /// Copy the bits selected by `mask` from `other`, keeping the rest.
    fn take_flags(&mut self, other: &FontFlags, mask: FontFlags) {
        self.flags = (self.flags - mask) | (*other & mask);
    }
}

/// Four-sided spacing used for margin and padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Spacing {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }

    /// Uniform spacing on all sides.
    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Total horizontal spacing.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total vertical spacing.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BorderSide {
    pub thickness: f32,
    pub color: Color,
}

/// Border with per-side thickness/color and per-corner radii
/// (top-left, top-right, bottom-right, bottom-left).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Border {
    pub top: BorderSide,
    pub right: BorderSide,
    pub bottom: BorderSide,
    pub left: BorderSide,
    pub radius: [f32; 4],
}

impl Border {
    pub fn uniform(thickness: f32, color: Color) -> Self {
        let side = BorderSide { thickness, color };
        Self {
            top: side,
            right: side,
            bottom: side,
            left: side,
            radius: [0.0; 4],
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left.thickness + self.right.thickness
    }

    pub fn vertical(&self) -> f32 {
        self.top.thickness + self.bottom.thickness
    }

    pub fn is_visible(&self) -> bool {
        self.top.thickness > 0.0
            || self.right.thickness > 0.0
            || self.bottom.thickness > 0.0
            || self.left.thickness > 0.0
    }

    pub fn sides_mut(&mut self) -> [&mut BorderSide; 4] {
        [&mut self.top, &mut self.right, &mut self.bottom, &mut self.left]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Shadow {
    pub offset: Point,
    pub blur: f32,
    pub spread: f32,
    pub color: Color,
}

/// Linear gradient: angle in degrees (0 = to top, 90 = to right) and color stops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gradient {
    pub angle: f32,
    pub stops: Vec<(f32, Color)>,
}

/// Fully resolved visual properties for one interaction state of a widget.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    pub fg_color: Color,
    pub background: Color,
    pub gradient: Option<Gradient>,
    pub font: FontSpec,
    /// Explicit content size; only meaningful when WIDTH/HEIGHT are specified.
    pub dimension: Size,
    pub min_dim: Size,
    pub max_dim: Size,
    pub alignment: Align,
    pub padding: Spacing,
    pub margin: Spacing,
    pub border: Border,
    pub shadow: Shadow,
    pub specified: StyleProps,
}

impl StyleDescriptor {
    pub fn new(font_size: f32, font_family: &str) -> Self {
        Self {
            fg_color: Color::BLACK,
            background: Color::TRANSPARENT,
            gradient: None,
            font: FontSpec {
                family: font_family.to_string(),
                size: font_size,
                flags: FontFlags::empty(),
                handle: None,
            },
            dimension: Size::ZERO,
            min_dim: Size::ZERO,
            max_dim: Size::new(f32::INFINITY, f32::INFINITY),
            alignment: Align::LEFT | Align::TOP,
            padding: Spacing::default(),
            margin: Spacing::default(),
            border: Border::default(),
            shadow: Shadow::default(),
            specified: StyleProps::empty(),
        }
    }

    pub fn is_specified(&self, prop: StyleProps) -> bool {
        self.specified.contains(prop)
    }

    /// Explicit width, if one was specified.
    pub fn width(&self) -> Option<f32> {
        self.is_specified(StyleProps::WIDTH).then_some(self.dimension.width)
    }

    /// Explicit height, if one was specified.
    pub fn height(&self) -> Option<f32> {
        self.is_specified(StyleProps::HEIGHT).then_some(self.dimension.height)
    }

    /// Clamp a content width into `[min_width, max_width]`.
    pub fn clamp_width(&self, w: f32) -> f32 {
        w.min(self.max_dim.width).max(self.min_dim.width)
    }

    /// Clamp a content height into `[min_height, max_height]`.
    pub fn clamp_height(&self, h: f32) -> f32 {
        h.min(self.max_dim.height).max(self.min_dim.height)
    }

    /// Inherit every property this style did not specify from `base`.
    ///
    /// A specified bit travels with the value. Runs at most once per
    /// descriptor: the `UPDATED_FROM_BASE` marker turns later calls into no-ops.
    pub fn copy_from_base(&mut self, base: &StyleDescriptor) {
        if self.specified.contains(StyleProps::UPDATED_FROM_BASE) {
            return;
        }

        let before = self.font.clone();
        for prop in StyleProps::all().iter() {
            if prop == StyleProps::UPDATED_FROM_BASE || self.specified.contains(prop) {
                continue;
            }

            match prop {
                StyleProps::BACKGROUND => {
                    self.background = base.background;
                    self.gradient = base.gradient.clone();
                }
                StyleProps::FG_COLOR => self.fg_color = base.fg_color,
                StyleProps::FONT_SIZE => self.font.size = base.font.size,
                StyleProps::FONT_FAMILY => self.font.family = base.font.family.clone(),
                StyleProps::FONT_WEIGHT => self.font.take_flags(&base.font.flags, FontFlags::WEIGHT),
                StyleProps::FONT_STYLE => self.font.take_flags(&base.font.flags, FontFlags::ITALIC),
                StyleProps::TEXT_WRAP => self.font.take_flags(&base.font.flags, FontFlags::NO_WRAP),
                StyleProps::TEXT_OVERFLOW => {
                    self.font.take_flags(&base.font.flags, FontFlags::OVERFLOW)
                }
                StyleProps::WIDTH => self.dimension.width = base.dimension.width,
                StyleProps::HEIGHT => self.dimension.height = base.dimension.height,
                StyleProps::H_ALIGNMENT => {
                    self.alignment = (self.alignment - Align::HORIZONTAL)
                        | (base.alignment & Align::HORIZONTAL)
                }
                StyleProps::V_ALIGNMENT => {
                    self.alignment = (self.alignment - Align::VERTICAL)
                        | (base.alignment & Align::VERTICAL)
                }
                StyleProps::PADDING => self.padding = base.padding,
                StyleProps::MARGIN => self.margin = base.margin,
                StyleProps::BORDER => {
                    let radius = self.border.radius;
                    self.border = base.border;
                    self.border.radius = radius;
                }
                StyleProps::BORDER_RADIUS => self.border.radius = base.border.radius,
                StyleProps::BOX_SHADOW => self.shadow = base.shadow,
                StyleProps::MIN_WIDTH => self.min_dim.width = base.min_dim.width,
                StyleProps::MAX_WIDTH => self.max_dim.width = base.max_dim.width,
                StyleProps::MIN_HEIGHT => self.min_dim.height = base.min_dim.height,
                StyleProps::MAX_HEIGHT => self.max_dim.height = base.max_dim.height,
                _ => continue,
            }

            if base.specified.contains(prop) {
                self.specified |= prop;
            }
        }

        if self.font.family != before.family
            || self.font.size != before.size
            || self.font.flags != before.flags
        {
            self.font.handle = None;
        }
        self.specified |= StyleProps::UPDATED_FROM_BASE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> StyleDescriptor {
        let mut s = StyleDescriptor::new(16.0, "default");
        s.fg_color = Color::WHITE;
        s.padding = Spacing::all(4.0);
        s.font.flags = FontFlags::BOLD;
        s.specified = StyleProps::FG_COLOR | StyleProps::PADDING | StyleProps::FONT_WEIGHT;
        s
    }

    #[test]
    fn test_copy_keeps_specified_values() {
        let mut dest = StyleDescriptor::new(16.0, "default");
        dest.fg_color = Color::rgb(1.0, 0.0, 0.0);
        dest.specified = StyleProps::FG_COLOR;

        dest.copy_from_base(&base());
        assert_eq!(dest.fg_color, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(dest.padding, Spacing::all(4.0));
        assert!(dest.font.flags.contains(FontFlags::BOLD));
        assert!(dest.is_specified(StyleProps::PADDING));
        assert!(dest.is_specified(StyleProps::UPDATED_FROM_BASE));
    }

    #[test]
    fn test_copy_does_not_mark_unspecified_source_props() {
        let mut dest = StyleDescriptor::new(12.0, "default");
        dest.copy_from_base(&base());
        assert_eq!(dest.font.size, 16.0);
        assert!(!dest.is_specified(StyleProps::FONT_SIZE));
    }

    #[test]
    fn test_copy_is_idempotent() {
        let src = base();
        let mut once = StyleDescriptor::new(16.0, "default");
        once.copy_from_base(&src);
        let mut twice = once.clone();
        twice.copy_from_base(&src);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_font_flags_copied_per_field() {
        let mut src = base();
        src.font.flags = FontFlags::BOLD | FontFlags::ITALIC;
        src.specified |= StyleProps::FONT_STYLE;

        let mut dest = StyleDescriptor::new(16.0, "default");
        dest.font.flags = FontFlags::LIGHT;
        dest.specified = StyleProps::FONT_WEIGHT;
        dest.copy_from_base(&src);

        assert_eq!(dest.font.flags, FontFlags::LIGHT | FontFlags::ITALIC);
    }

    #[test]
    fn test_clamp_never_panics_on_inverted_limits() {
        let mut s = StyleDescriptor::new(16.0, "default");
        s.min_dim.width = 50.0;
        s.max_dim.width = 10.0;
        assert_eq!(s.clamp_width(30.0), 50.0);
    }
}
