//! Multi-level grid header configuration and per-frame cell geometry.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::backend::TextMeasurer;
use crate::primitives::{Point, Rect, Size};
use crate::style::{FontSpec, Spacing};

use super::interaction::GridState;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ColumnProps: u8 {
        const RESIZABLE = 1 << 0;
        const MOVEABLE = 1 << 1;
        /// Shares leftover grid width until the user resizes it.
        const EXPANDABLE = 1 << 2;
        /// `width` is in pixels rather than characters.
        const WIDTH_ABSOLUTE = 1 << 3;
        const WRAP_HEADER = 1 << 4;
    }
}

/// One header cell of the configuration.
///
/// Each level lists its columns grouped by parent, in the order of the
/// parents on the level above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    /// Logical index of the group column on the level above.
    pub parent: Option<usize>,
    /// Pixels with `WIDTH_ABSOLUTE`, else a character count. Zero fits the name.
    pub width: f32,
    pub props: ColumnProps,
    pub padding: Spacing,
}

impl ColumnConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            width: 0.0,
            props: ColumnProps::RESIZABLE | ColumnProps::MOVEABLE,
            padding: Spacing::all(4.0),
        }
    }

    pub fn parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn props(mut self, props: ColumnProps) -> Self {
        self.props = props;
        self
    }

    pub fn padding(mut self, padding: Spacing) -> Self {
        self.padding = padding;
        self
    }

    pub fn is(&self, prop: ColumnProps) -> bool {
        self.props.contains(prop)
    }
}

/// Screen geometry of one header cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeaderCell {
    pub level: usize,
    pub logical: usize,
    pub visual: usize,
    pub rect: Rect,
    pub text: Rect,
    /// Follows the pointer as part of a reorder drag.
    pub dragging: bool,
}

/// Geometry of every header cell, indexed `[level][logical]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderLayout {
    pub cells: Vec<Vec<HeaderCell>>,
    pub size: Size,
}

impl HeaderLayout {
    pub fn cell(&self, level: usize, logical: usize) -> Option<&HeaderCell> {
        self.cells.get(level)?.get(logical)
    }

    /// Cells in drawing order: top level first, then left to right.
    pub fn iter_visual(&self) -> impl Iterator<Item = &HeaderCell> {
        self.cells.iter().flat_map(|level| {
            let mut ordered: Vec<&HeaderCell> = level.iter().collect();
            ordered.sort_by_key(|c| c.visual);
            ordered
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Measured {
    width: f32,
    text: Size,
    /// Horizontal text offset inside the cell.
    text_x: f32,
}

fn center_text(hdr: &ColumnConfig, width: f32, text: f32) -> f32 {
    let room = width - hdr.padding.horizontal() - text;
    if !hdr.is(ColumnProps::WRAP_HEADER) && room > 0.0 {
        hdr.padding.left + room * 0.5
    } else {
        hdr.padding.left
    }
}

/// Derive header cell geometry for one frame.
///
/// Leaf widths come from the configured width plus the user's resize
/// accumulator; expandable leaves nobody resized share what is left of
/// `available_width`. Group widths are the sum of their children. Each
/// level is as tall as its tallest cell and text is centered in it. Cells
/// are then laid out left to right in visual order from `origin`.
pub fn compute_header_layout(
    headers: &[Vec<ColumnConfig>],
    state: &mut GridState,
    origin: Point,
    available_width: f32,
    font: &FontSpec,
    measurer: &dyn TextMeasurer,
) -> HeaderLayout {
    state.ensure(headers);
    let levels = headers.len().min(state.levels());
    if levels == 0 {
        return HeaderLayout::default();
    }

    let measure = |text: &str, wrap: Option<f32>| measurer.measure_text(text, font.handle, font.size, wrap);
    let mut measured: Vec<Vec<Measured>> = headers[..levels]
        .iter()
        .map(|level| vec![Measured::default(); level.len()])
        .collect();

    // Leaves.
    let leaf = levels - 1;
    let mut expandable = Vec::new();
    let mut sum = 0.0;
    for (col, hdr) in headers[leaf].iter().enumerate() {
        let base = if hdr.is(ColumnProps::WIDTH_ABSOLUTE) {
            hdr.width
        } else {
            measure(&" ".repeat(hdr.width.max(0.0) as usize), None).width
        };
        let modified = state.modified(leaf, col);
        let fixed = base > 0.0;
        let wrap = (hdr.is(ColumnProps::WRAP_HEADER) && fixed).then_some(base + modified);
        let text = measure(&hdr.name, wrap);
        let width = if fixed {
            base + modified
        } else {
            modified + text.width + hdr.padding.horizontal()
        }
        .max(0.0);

        if hdr.is(ColumnProps::EXPANDABLE) && modified == 0.0 {
            expandable.push(col);
        }
        sum += width;
        measured[leaf][col] = Measured {
            width,
            text,
            text_x: 0.0,
        };
    }
    if !expandable.is_empty() {
        let extra = (available_width - sum) / expandable.len() as f32;
        if extra > 0.0 {
            for &col in &expandable {
                measured[leaf][col].width += extra;
            }
        }
    }
    for (col, hdr) in headers[leaf].iter().enumerate() {
        let m = &mut measured[leaf][col];
        m.text_x = center_text(hdr, m.width, m.text.width);
    }

    // Groups, bottom-up.
    for level in (0..leaf).rev() {
        for (col, hdr) in headers[level].iter().enumerate() {
            let width: f32 = headers[level + 1]
                .iter()
                .zip(&measured[level + 1])
                .filter(|(child, _)| child.parent == Some(col))
                .map(|(_, m)| m.width)
                .sum();
            let wrap = hdr.is(ColumnProps::WRAP_HEADER).then_some(width);
            let mut text = measure(&hdr.name, wrap);
            text.width = text.width.min(width);
            measured[level][col] = Measured {
                width,
                text,
                text_x: center_text(hdr, width, text.width),
            };
        }
    }

    // Placement, top-down in visual order.
    let mut cells = Vec::with_capacity(levels);
    let mut y = origin.y;
    let mut total_width = 0.0f32;
    for level in 0..levels {
        let height = headers[level]
            .iter()
            .zip(&measured[level])
            .map(|(hdr, m)| m.text.height + hdr.padding.vertical())
            .fold(0.0, f32::max);

        let mut row = vec![None; headers[level].len()];
        let mut x = origin.x;
        for (visual, logical) in state.map(level).visual_order().enumerate() {
            let (Some(hdr), Some(m)) = (headers[level].get(logical), measured[level].get(logical)) else {
                continue;
            };
            let text_y = hdr.padding.top
                + ((height - m.text.height - hdr.padding.vertical()) * 0.5).max(0.0);
            row[logical] = Some(HeaderCell {
                level,
                logical,
                visual,
                rect: Rect::new(x, y, m.width, height),
                text: Rect::new(x + m.text_x, y + text_y, m.text.width, m.text.height),
                dragging: false,
            });
            x += m.width;
        }

        total_width = total_width.max(x - origin.x);
        y += height;
        cells.push(row.into_iter().flatten().collect());
    }

    HeaderLayout {
        cells,
        size: Size::new(total_width, y - origin.y),
    }
}
