//! Column reorder and resize propagation across header levels.

use super::column_map::ColumnMap;
use super::header::{ColumnConfig, ColumnProps};
use super::interaction::HeaderCellResizeState;

/// Inclusive range of column indices. Empty when `first > last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub first: usize,
    pub last: usize,
}

impl ColumnSpan {
    pub const EMPTY: Self = Self {
        first: usize::MAX,
        last: 0,
    };

    pub fn single(col: usize) -> Self {
        Self {
            first: col,
            last: col,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.last - self.first + 1
        }
    }

    pub fn contains(&self, col: usize) -> bool {
        col >= self.first && col <= self.last
    }

    fn include(&mut self, col: usize) {
        self.first = self.first.min(col);
        self.last = self.last.max(col);
    }
}

/// Logical span of the columns on `level` whose parent lies in `parents`.
pub fn child_span(headers: &[Vec<ColumnConfig>], level: usize, parents: ColumnSpan) -> ColumnSpan {
    let mut span = ColumnSpan::EMPTY;
    if parents.is_empty() {
        return span;
    }
    if let Some(columns) = headers.get(level) {
        for (col, hdr) in columns.iter().enumerate() {
            if hdr.parent.is_some_and(|p| parents.contains(p)) {
                span.include(col);
            }
        }
    }
    span
}

/// Visual span occupied by the logical columns in `logical`.
fn visual_span(map: &ColumnMap, logical: ColumnSpan) -> ColumnSpan {
    let mut span = ColumnSpan::EMPTY;
    if logical.is_empty() {
        return span;
    }
    for l in logical.first..=logical.last {
        if let Some(v) = map.visual(l) {
            span.include(v);
        }
    }
    span
}

/// Swap the adjacent visual columns `from` and `to` on `level` and carry
/// every descendant level along.
///
/// On each deeper level the children of the two moved groups occupy two
/// adjacent visual blocks; the blocks trade places while keeping their
/// internal order. Logical indices never change, only the maps do.
pub fn swap_columns(
    maps: &mut [ColumnMap],
    headers: &[Vec<ColumnConfig>],
    level: usize,
    from: usize,
    to: usize,
) {
    let Some(map) = maps.get_mut(level) else {
        return;
    };
    let (Some(lfrom), Some(lto)) = (map.logical(from), map.logical(to)) else {
        return;
    };
    map.swap_visual(from, to);

    let mut moving_from = ColumnSpan::single(lfrom);
    let mut moving_to = ColumnSpan::single(lto);
    for child in level + 1..headers.len().min(maps.len()) {
        moving_from = child_span(headers, child, moving_from);
        moving_to = child_span(headers, child, moving_to);
        if moving_from.is_empty() || moving_to.is_empty() {
            continue;
        }

        let map = &mut maps[child];
        let a = visual_span(map, moving_from);
        let b = visual_span(map, moving_to);
        let (left, right) = if a.first < b.first { (a, b) } else { (b, a) };
        map.rotate_visual(left.first, right.last, left.len());
    }
}

/// Spread a width change of the column `parent` on `level - 1` over its
/// children on `level`.
///
/// Only resizable children take a share; the delta is split evenly between
/// them and recursively handed down to their own children. Returns whether
/// any child was resizable.
pub fn propagate_resize(
    headers: &[Vec<ColumnConfig>],
    resize: &mut [Vec<HeaderCellResizeState>],
    parent: usize,
    level: usize,
    delta: f32,
) -> bool {
    let Some(columns) = headers.get(level) else {
        return false;
    };
    let children: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, hdr)| hdr.parent == Some(parent) && hdr.is(ColumnProps::RESIZABLE))
        .map(|(col, _)| col)
        .collect();
    if children.is_empty() {
        return false;
    }

    let share = delta / children.len() as f32;
    for col in children {
        if let Some(state) = resize.get_mut(level).and_then(|l| l.get_mut(col)) {
            state.modified += share;
        }
        propagate_resize(headers, resize, col, level + 1, share);
    }
    true
}
