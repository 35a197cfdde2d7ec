//! Header drag handling: column resize and column reorder.
//!
//! A grid runs at most one drag at a time. [`GridInteraction`] records which
//! one; a request for the other kind is refused until the active drag ends
//! with the pointer release.

use serde::Serialize;

use crate::input::PointerSnapshot;
use crate::primitives::{Point, Rect};

use super::column_map::ColumnMap;
use super::header::{ColumnConfig, ColumnProps, HeaderLayout};
use super::topology::{ColumnSpan, child_span, propagate_resize, swap_columns};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum GridInteraction {
    #[default]
    Default,
    ResizingColumns,
    ReorderingColumns,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ResizePhase {
    #[default]
    Idle,
    /// Pointer hovers the boundary.
    Armed,
    Dragging,
}

/// Resize bookkeeping of one column's right boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeaderCellResizeState {
    pub last_pos: Point,
    /// Width added by the user so far.
    pub modified: f32,
    pub phase: ResizePhase,
}

/// The column being dragged for reorder, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeaderCellDragState {
    pub active: bool,
    pub level: usize,
    pub column: usize,
    pub start_pos: Point,
    pub last_pos: Point,
}

/// Pointer shape the host should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum CursorHint {
    #[default]
    Arrow,
    ResizeHorizontal,
    Grab,
}

/// Outcome of one [`GridState::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridUpdate {
    pub cursor: CursorHint,
    /// Column order or widths changed; header geometry is stale.
    pub changed: bool,
}

/// Hit-test thresholds, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTolerances {
    /// Distance from a column's left edge that grabs the resize handle.
    pub resize_handle: f32,
    /// Horizontal inset of the area that starts a reorder.
    pub reorder_inset: f32,
}

/// Quasi-persistent state of one grid: column maps, resize accumulators and
/// the active drag. Survives across frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridState {
    maps: Vec<ColumnMap>,
    resize: Vec<Vec<HeaderCellResizeState>>,
    pub drag: HeaderCellDragState,
    pub mode: GridInteraction,
    max_levels: usize,
}

impl GridState {
    pub fn new(max_levels: usize) -> Self {
        Self {
            max_levels,
            ..Self::default()
        }
    }

    /// Size maps and accumulators for `headers`. Levels beyond the
    /// configured maximum are ignored.
    pub fn ensure(&mut self, headers: &[Vec<ColumnConfig>]) {
        if headers.len() > self.max_levels {
            tracing::warn!(
                "grid has {} header levels, only {} are used",
                headers.len(),
                self.max_levels
            );
        }
        let levels = headers.len().min(self.max_levels);
        if self.maps.len() < levels {
            self.maps.resize_with(levels, ColumnMap::new);
            self.resize.resize_with(levels, Vec::new);
        }
        for (level, columns) in headers.iter().take(levels).enumerate() {
            self.maps[level].ensure_columns(columns.len());
            if self.resize[level].len() < columns.len() {
                self.resize[level].resize(columns.len(), HeaderCellResizeState::default());
            }
        }
    }

    pub fn levels(&self) -> usize {
        self.maps.len()
    }

    pub fn map(&self, level: usize) -> &ColumnMap {
        static EMPTY: ColumnMap = ColumnMap::EMPTY;
        self.maps.get(level).unwrap_or(&EMPTY)
    }

    pub fn maps(&self) -> &[ColumnMap] {
        &self.maps
    }

    pub fn modified(&self, level: usize, logical: usize) -> f32 {
        self.resize_state(level, logical).map_or(0.0, |s| s.modified)
    }

    pub fn resize_state(&self, level: usize, logical: usize) -> Option<&HeaderCellResizeState> {
        self.resize.get(level)?.get(logical)
    }

    /// Reorder visual columns `from` and `to` on `level`, moving descendants.
    pub fn swap_columns(&mut self, headers: &[Vec<ColumnConfig>], level: usize, from: usize, to: usize) {
        swap_columns(&mut self.maps, headers, level, from, to);
    }

    /// Apply a width change of logical column `col` on `level` to the column
    /// and its resizable descendants.
    pub fn resize_column(&mut self, headers: &[Vec<ColumnConfig>], level: usize, col: usize, delta: f32) {
        if let Some(state) = self.resize.get_mut(level).and_then(|l| l.get_mut(col)) {
            state.modified += delta;
        }
        propagate_resize(headers, &mut self.resize, col, level + 1, delta);
    }

    /// Advance resize and reorder drags for this frame's pointer.
    ///
    /// `layout` is the header geometry computed for the current maps.
    pub fn update(
        &mut self,
        headers: &[Vec<ColumnConfig>],
        layout: &HeaderLayout,
        pointer: &PointerSnapshot,
        tolerances: DragTolerances,
    ) -> GridUpdate {
        let mut result = GridUpdate::default();

        if self.drag.active {
            result.changed |= self.continue_reorder(headers, layout, pointer);
            if self.drag.active {
                result.cursor = CursorHint::Grab;
            }
        }

        for level in 0..layout.cells.len().min(self.maps.len()) {
            let Some(columns) = headers.get(level) else {
                continue;
            };
            let order: Vec<usize> = self.maps[level].visual_order().collect();
            for (visual, &logical) in order.iter().enumerate() {
                let (Some(hdr), Some(cell)) = (columns.get(logical), layout.cell(level, logical)) else {
                    continue;
                };

                if visual > 0 {
                    let prev = order[visual - 1];
                    if columns.get(prev).is_some_and(|p| p.is(ColumnProps::RESIZABLE)) {
                        let (hint, changed) = self.handle_resize(headers, level, prev, cell.rect, pointer, tolerances);
                        result.changed |= changed;
                        if hint != CursorHint::Arrow {
                            result.cursor = hint;
                        }
                    }
                }

                if hdr.is(ColumnProps::MOVEABLE) && self.try_start_reorder(headers, level, logical, cell.rect, pointer, tolerances) {
                    result.cursor = CursorHint::Grab;
                }
            }
        }

        result
    }

    /// Resize handle on the left edge of `cell`, owned by logical column
    /// `prev`, the visual predecessor.
    fn handle_resize(
        &mut self,
        headers: &[Vec<ColumnConfig>],
        level: usize,
        prev: usize,
        cell: Rect,
        pointer: &PointerSnapshot,
        tolerances: DragTolerances,
    ) -> (CursorHint, bool) {
        if self.mode == GridInteraction::ReorderingColumns {
            return (CursorHint::Arrow, false);
        }
        let Some(state) = self.resize.get_mut(level).and_then(|l| l.get_mut(prev)) else {
            return (CursorHint::Arrow, false);
        };

        let near = pointer.position.is_some_and(|p| {
            (p.x - cell.x).abs() < tolerances.resize_handle && p.y > cell.y && p.y < cell.bottom()
        });

        if state.phase != ResizePhase::Dragging {
            if !pointer.down || self.mode != GridInteraction::Default {
                state.phase = if near { ResizePhase::Armed } else { ResizePhase::Idle };
                let hint = if near { CursorHint::ResizeHorizontal } else { CursorHint::Arrow };
                return (hint, false);
            }
            if !near {
                state.phase = ResizePhase::Idle;
                return (CursorHint::Arrow, false);
            }
            if let Some(pos) = pointer.position {
                state.phase = ResizePhase::Dragging;
                state.last_pos = pos;
                self.mode = GridInteraction::ResizingColumns;
                tracing::debug!(level, column = prev, x = pos.x, "column resize started");
            }
            return (CursorHint::ResizeHorizontal, false);
        }

        let delta = pointer.position.map_or(0.0, |p| p.x - state.last_pos.x);
        if let Some(pos) = pointer.position {
            state.last_pos = pos;
        }
        if !pointer.down {
            state.phase = ResizePhase::Idle;
            self.mode = GridInteraction::Default;
            tracing::debug!(level, column = prev, "column resize ended");
        }
        if delta != 0.0 {
            self.resize_column(headers, level, prev, delta);
        }

        let hint = if pointer.down { CursorHint::ResizeHorizontal } else { CursorHint::Arrow };
        (hint, delta != 0.0)
    }

    /// Start a reorder drag on `logical` when the pointer goes down inside
    /// the cell's trigger area.
    fn try_start_reorder(
        &mut self,
        headers: &[Vec<ColumnConfig>],
        level: usize,
        logical: usize,
        cell: Rect,
        pointer: &PointerSnapshot,
        tolerances: DragTolerances,
    ) -> bool {
        if self.mode != GridInteraction::Default || self.drag.active || !pointer.down {
            return false;
        }
        let Some(pos) = pointer.position else {
            return false;
        };
        let trigger = cell.inset(0.0, tolerances.reorder_inset, 0.0, tolerances.reorder_inset);
        if !trigger.contains(pos) {
            return false;
        }

        // An only child drags its whole group.
        let (mut level, mut logical) = (level, logical);
        while level > 0 {
            let Some(parent) = headers[level].get(logical).and_then(|h| h.parent) else {
                break;
            };
            if child_span(headers, level, ColumnSpan::single(parent)).len() != 1 {
                break;
            }
            level -= 1;
            logical = parent;
        }
        let Some(visual) = self.maps.get(level).and_then(|m| m.visual(logical)) else {
            return false;
        };

        self.drag = HeaderCellDragState {
            active: true,
            level,
            column: visual,
            start_pos: pos,
            last_pos: pos,
        };
        self.mode = GridInteraction::ReorderingColumns;
        tracing::debug!(level, visual, logical, "column reorder started");
        true
    }

    /// Swap the dragged column with a sibling once the pointer has travelled
    /// that sibling's width. Ends the drag on release.
    fn continue_reorder(&mut self, headers: &[Vec<ColumnConfig>], layout: &HeaderLayout, pointer: &PointerSnapshot) -> bool {
        if !pointer.down {
            tracing::debug!(level = self.drag.level, column = self.drag.column, "column reorder ended");
            self.drag = HeaderCellDragState::default();
            self.mode = GridInteraction::Default;
            return false;
        }
        let Some(pos) = pointer.position else {
            return false;
        };

        let level = self.drag.level;
        let visual = self.drag.column;
        let diff = pos.x - self.drag.last_pos.x;
        self.drag.last_pos = pos;

        let map = self.map(level);
        let Some(dragged) = map.logical(visual) else {
            return false;
        };
        let parent = headers.get(level).and_then(|l| l.get(dragged)).and_then(|h| h.parent);

        let neighbor = if diff > 0.0 {
            Some(visual + 1)
        } else if diff < 0.0 {
            visual.checked_sub(1)
        } else {
            None
        };
        let Some(target) = neighbor else {
            return false;
        };
        let Some(other) = map.logical(target) else {
            return false;
        };
        let sibling = headers.get(level).and_then(|l| l.get(other)).map(|h| h.parent);
        if sibling != Some(parent) {
            return false;
        }
        let Some(width) = layout.cell(level, other).map(|c| c.rect.width) else {
            return false;
        };

        let travelled = (pos.x - self.drag.start_pos.x).abs();
        if travelled < width {
            return false;
        }

        self.swap_columns(headers, level, visual.min(target), visual.max(target));
        self.drag.column = target;
        self.drag.start_pos = pos;
        tracing::debug!(level, from = visual, to = target, "column reorder swap");
        true
    }

    /// Shift the dragged column and its descendants to follow the pointer.
    pub fn apply_drag_offset(&self, headers: &[Vec<ColumnConfig>], layout: &mut HeaderLayout, pointer: &PointerSnapshot) {
        if !self.drag.active {
            return;
        }
        let (Some(pos), Some(logical)) = (pointer.position, self.map(self.drag.level).logical(self.drag.column)) else {
            return;
        };
        let offset = Point::new(pos.x - self.drag.start_pos.x, 0.0);

        let mut moving = ColumnSpan::single(logical);
        for level in self.drag.level..layout.cells.len() {
            if level > self.drag.level {
                moving = child_span(headers, level, moving);
            }
            for cell in layout.cells[level].iter_mut().filter(|c| moving.contains(c.logical)) {
                cell.rect = cell.rect.translate(offset);
                cell.text = cell.text.translate(offset);
                cell.dragging = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MonospaceBackend;
    use crate::grid::compute_header_layout;
    use crate::style::StyleDescriptor;

    const TOL: DragTolerances = DragTolerances {
        resize_handle: 5.0,
        reorder_inset: 5.5,
    };

    fn leaves() -> Vec<Vec<ColumnConfig>> {
        let col = |name: &str| {
            ColumnConfig::new(name)
                .width(100.0)
                .props(ColumnProps::RESIZABLE | ColumnProps::MOVEABLE | ColumnProps::WIDTH_ABSOLUTE)
        };
        vec![vec![col("a"), col("b"), col("c")]]
    }

    fn layout(headers: &[Vec<ColumnConfig>], state: &mut GridState) -> HeaderLayout {
        let font = StyleDescriptor::new(10.0, "default").font;
        compute_header_layout(headers, state, Point::ORIGIN, 0.0, &font, &MonospaceBackend::new())
    }

    #[test]
    fn test_resize_drag_lifecycle() {
        let headers = leaves();
        let mut state = GridState::new(8);
        let l = layout(&headers, &mut state);

        let hover = state.update(&headers, &l, &PointerSnapshot::at(101.0, 5.0), TOL);
        assert_eq!(hover.cursor, CursorHint::ResizeHorizontal);
        assert_eq!(state.resize_state(0, 0).unwrap().phase, ResizePhase::Armed);

        state.update(&headers, &l, &PointerSnapshot::at(101.0, 5.0).pressed(), TOL);
        assert_eq!(state.mode, GridInteraction::ResizingColumns);

        let drag = state.update(&headers, &l, &PointerSnapshot::at(121.0, 5.0).pressed(), TOL);
        assert!(drag.changed);
        assert_eq!(state.modified(0, 0), 20.0);

        state.update(&headers, &l, &PointerSnapshot::at(126.0, 5.0).released(), TOL);
        assert_eq!(state.modified(0, 0), 25.0);
        assert_eq!(state.mode, GridInteraction::Default);
        assert_eq!(state.resize_state(0, 0).unwrap().phase, ResizePhase::Idle);
    }

    #[test]
    fn test_reorder_swaps_after_neighbor_width() {
        let headers = leaves();
        let mut state = GridState::new(8);
        let l = layout(&headers, &mut state);

        state.update(&headers, &l, &PointerSnapshot::at(50.0, 5.0).pressed(), TOL);
        assert_eq!(state.mode, GridInteraction::ReorderingColumns);
        assert_eq!(state.drag.column, 0);

        let short = state.update(&headers, &l, &PointerSnapshot::at(120.0, 5.0).pressed(), TOL);
        assert!(!short.changed);

        let far = state.update(&headers, &l, &PointerSnapshot::at(150.0, 5.0).pressed(), TOL);
        assert!(far.changed);
        assert_eq!(state.map(0).visual_order().collect::<Vec<_>>(), vec![1, 0, 2]);
        assert_eq!(state.drag.column, 1);

        state.update(&headers, &l, &PointerSnapshot::at(150.0, 5.0).released(), TOL);
        assert_eq!(state.mode, GridInteraction::Default);
        assert!(!state.drag.active);
    }

    #[test]
    fn test_reorder_refused_while_resizing() {
        let headers = leaves();
        let mut state = GridState::new(8);
        let l = layout(&headers, &mut state);

        state.update(&headers, &l, &PointerSnapshot::at(101.0, 5.0).pressed(), TOL);
        assert_eq!(state.mode, GridInteraction::ResizingColumns);
        state.update(&headers, &l, &PointerSnapshot::at(150.0, 5.0).pressed(), TOL);
        assert!(!state.drag.active);
        assert_eq!(state.mode, GridInteraction::ResizingColumns);
    }

    #[test]
    fn test_only_child_promotes_drag_to_group() {
        let headers = vec![
            vec![ColumnConfig::new("G"), ColumnConfig::new("H")],
            vec![
                ColumnConfig::new("g").parent(0).width(10.0),
                ColumnConfig::new("h1").parent(1).width(10.0),
                ColumnConfig::new("h2").parent(1).width(10.0),
            ],
        ];
        let mut state = GridState::new(8);
        let l = layout(&headers, &mut state);
        let g = l.cell(1, 0).unwrap().rect;

        state.update(&headers, &l, &PointerSnapshot::at(g.x + 20.0, g.y + 2.0).pressed(), TOL);
        assert!(state.drag.active);
        assert_eq!(state.drag.level, 0);
        assert_eq!(state.drag.column, 0);
    }

    #[test]
    fn test_drag_offset_moves_descendants() {
        let headers = vec![
            vec![ColumnConfig::new("G")],
            vec![ColumnConfig::new("x").parent(0).width(5.0), ColumnConfig::new("y").parent(0).width(5.0)],
        ];
        let mut state = GridState::new(8);
        let mut l = layout(&headers, &mut state);
        let before = l.cell(1, 1).unwrap().rect;

        state.drag = HeaderCellDragState {
            active: true,
            level: 0,
            column: 0,
            start_pos: Point::new(10.0, 0.0),
            last_pos: Point::new(10.0, 0.0),
        };
        state.apply_drag_offset(&headers, &mut l, &PointerSnapshot::at(25.0, 0.0));
        let after = l.cell(1, 1).unwrap();
        assert!(after.dragging);
        assert_eq!(after.rect.x, before.x + 15.0);
    }
}
