//! Collaborator interfaces the layout core consumes.
//!
//! Drawing is not part of this crate: the host drains the draw list and renders
//! it however it likes. What the core does need is text measurement and font
//! lookup, both of which are supplied through the traits below.

use std::collections::HashMap;

use unicode_width::UnicodeWidthChar;

use crate::primitives::Size;
use crate::style::FontFlags;

/// Opaque handle for a resolved font face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FontHandle(pub u32);

/// Text metrics.
pub trait TextMeasurer {
    /// Measure `text` rendered with `font` at `size` pixels. When `wrap_width` is
    /// set, lines longer than it are broken at word boundaries.
    fn measure_text(
        &self,
        text: &str,
        font: Option<FontHandle>,
        size: f32,
        wrap_width: Option<f32>,
    ) -> Size;
}

/// Font lookup service.
pub trait FontResolver {
    fn resolve_font(&mut self, family: &str, size: f32, flags: FontFlags) -> FontHandle;
}

/// Everything the frame context needs from the host.
pub trait TextBackend: TextMeasurer + FontResolver {
    fn measurer(&self) -> &dyn TextMeasurer;
    fn fonts(&mut self) -> &mut dyn FontResolver;
}

impl<T: TextMeasurer + FontResolver> TextBackend for T {
    fn measurer(&self) -> &dyn TextMeasurer {
        self
    }

    fn fonts(&mut self) -> &mut dyn FontResolver {
        self
    }
}

// Metrics of a 14px monospace face: 8.4px advance, 18px line.
const ADVANCE_RATIO: f32 = 0.6;
const LINE_HEIGHT_RATIO: f32 = 18.0 / 14.0;

/// Fixed-metric backend: every cell is `size * 0.6` wide.
///
/// Used by the demo binary and tests; real hosts plug in a shaping engine.
#[derive(Debug, Default)]
pub struct MonospaceBackend {
    fonts: HashMap<(String, u32, FontFlags), FontHandle>,
}

impl MonospaceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn char_width(size: f32) -> f32 {
        size * ADVANCE_RATIO
    }

    pub fn line_height(size: f32) -> f32 {
        size * LINE_HEIGHT_RATIO
    }
}

fn display_width(text: &str) -> f32 {
    text.chars()
        .map(|c| UnicodeWidthChar::width(c).unwrap_or(0) as f32)
        .sum()
}

impl TextMeasurer for MonospaceBackend {
    fn measure_text(
        &self,
        text: &str,
        _font: Option<FontHandle>,
        size: f32,
        wrap_width: Option<f32>,
    ) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }

        let cw = Self::char_width(size);
        let mut widest = 0.0f32;
        let mut lines = 0usize;

        for line in text.split('\n') {
            let cells = display_width(line);
            match wrap_width {
                Some(limit) if cells * cw > limit && limit > 0.0 => {
                    let max_cells = (limit / cw).floor().max(1.0);
                    let mut current = 0.0f32;
                    lines += 1;
                    for word in line.split(' ') {
                        let w = display_width(word);
                        let needed = if current > 0.0 { current + 1.0 + w } else { w };
                        if needed > max_cells && current > 0.0 {
                            widest = widest.max(current);
                            lines += 1;
                            current = w;
                        } else {
                            current = needed;
                        }
                    }
                    widest = widest.max(current);
                }
                _ => {
                    widest = widest.max(cells);
                    lines += 1;
                }
            }
        }

        Size::new(widest * cw, lines as f32 * Self::line_height(size))
    }
}

impl FontResolver for MonospaceBackend {
    fn resolve_font(&mut self, family: &str, size: f32, flags: FontFlags) -> FontHandle {
        let next = FontHandle(self.fonts.len() as u32);
        *self
            .fonts
            .entry((family.to_string(), size.to_bits(), flags))
            .or_insert(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_single_line() {
        let backend = MonospaceBackend::new();
        let size = backend.measure_text("hello", None, 10.0, None);
        assert!((size.width - 30.0).abs() < 1e-4);
        assert!((size.height - 10.0 * 18.0 / 14.0).abs() < 1e-4);
    }

    #[test]
    fn test_measure_empty() {
        let backend = MonospaceBackend::new();
        assert_eq!(backend.measure_text("", None, 16.0, None), Size::ZERO);
    }

    #[test]
    fn test_measure_wraps_at_words() {
        let backend = MonospaceBackend::new();
        // 10px font: 6px per cell; 40px fits 6 cells.
        let size = backend.measure_text("aaa bbb ccc", None, 10.0, Some(40.0));
        assert!((size.width - 18.0).abs() < 1e-4);
        assert!((size.height - 3.0 * MonospaceBackend::line_height(10.0)).abs() < 1e-4);
    }

    #[test]
    fn test_explicit_newlines() {
        let backend = MonospaceBackend::new();
        let size = backend.measure_text("ab\nabcd", None, 10.0, None);
        assert!((size.width - 24.0).abs() < 1e-4);
        assert!((size.height - 2.0 * MonospaceBackend::line_height(10.0)).abs() < 1e-4);
    }

    #[test]
    fn test_font_handles_are_stable() {
        let mut backend = MonospaceBackend::new();
        let a = backend.resolve_font("mono", 14.0, FontFlags::empty());
        let b = backend.resolve_font("mono", 14.0, FontFlags::BOLD);
        let c = backend.resolve_font("mono", 14.0, FontFlags::empty());
        assert_eq!(a, c);
        assert_ne!(a, b);
    }
}
