//! Bounded stack of open flow containers.
//!
//! A container is **opened** with [`LayoutStack::begin`], **accepts** items
//! through [`LayoutStack::add_item`] and is **closed** by
//! [`LayoutStack::end_layout`], which aligns its lines and hands its aggregate
//! geometry to the parent.
//!
//! Geometry is settled in two phases. Opening a child reserves provisional
//! space in the parent ([`reserve_provisional`]) so the child has bounds to
//! place its own items into. Closing the child commits its actual size
//! ([`commit_final`]): the parent's cursor is rewound to where it stood before
//! the reservation and the child is placed like any other item, moving its
//! whole subtree if it wrapped to a new line. The two calls always come in
//! this order and are never nested across siblings.
//!
//! [`reserve_provisional`]: LayoutStack::reserve_provisional
//! [`commit_final`]: LayoutStack::commit_final

use crate::error::LayoutError;
use crate::primitives::{Point, Rect, Size};

use super::align::{align_cross, align_line, translate_item};
use super::box_model::{AxisLimit, BoxLimits, BoxModel};
use super::descriptor::{
    DrawCommand, FlowLine, ItemKind, LayoutDescriptor, LayoutItem, LayoutSpec, MAX_FLOW_LINES,
    Reservation, Sizing,
};
use super::flags::{Axis, Placement};

#[derive(Debug, Clone)]
pub struct LayoutStack {
    layouts: Vec<LayoutDescriptor>,
    /// Bottom entry is a permanent `Sizing::FIT`.
    sizing: Vec<Sizing>,
    items: Vec<LayoutItem>,
    finished: Vec<DrawCommand>,
    max_nesting: usize,
    viewport: Rect,
}

impl LayoutStack {
    pub fn new(max_nesting: usize, viewport: Size) -> Self {
        Self {
            layouts: Vec::with_capacity(max_nesting),
            sizing: vec![Sizing::FIT],
            items: Vec::new(),
            finished: Vec::new(),
            max_nesting,
            viewport: Rect::from_origin_size(Point::ORIGIN, viewport),
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = Rect::from_origin_size(Point::ORIGIN, viewport);
    }

    /// Number of open containers.
    pub fn depth(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_open(&self) -> bool {
        !self.layouts.is_empty()
    }

    pub fn current(&self) -> Option<&LayoutDescriptor> {
        self.layouts.last()
    }

    /// Items buffered so far this frame, in insertion order.
    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    // =====================================================================
    // Sizing
    // =====================================================================

    pub fn current_sizing(&self) -> Sizing {
        self.sizing.last().copied().unwrap_or(Sizing::FIT)
    }

    pub fn sizing_depth(&self) -> usize {
        self.sizing.len() - 1
    }

    pub fn push_sizing(&mut self, sizing: Sizing) -> Result<(), LayoutError> {
        if self.sizing.len() > self.max_nesting {
            tracing::warn!("sizing stack full (max {})", self.max_nesting);
            return Err(LayoutError::SizingExceeded {
                max: self.max_nesting,
            });
        }
        self.sizing.push(sizing);
        Ok(())
    }

    /// Pop up to `depth` entries; the base entry is never removed.
    pub fn pop_sizing(&mut self, depth: usize) {
        let keep = self.sizing.len().saturating_sub(depth).max(1);
        self.sizing.truncate(keep);
    }

    // =====================================================================
    // Open
    // =====================================================================

    /// Open a container. `anchor` positions a top-level container; nested
    /// containers are positioned by their parent.
    ///
    /// The container is sized by its own `spec.sizing`, or else by an entry
    /// pushed with [`push_sizing`](Self::push_sizing) since its parent opened.
    ///
    /// Returns the container's provisional outer bounds.
    pub fn begin(&mut self, spec: &LayoutSpec, anchor: Point) -> Result<Rect, LayoutError> {
        if self.layouts.len() >= self.max_nesting {
            tracing::warn!("layout nesting exceeded (max {})", self.max_nesting);
            return Err(LayoutError::NestingExceeded {
                max: self.max_nesting,
            });
        }
        // A parent's own sizing does not leak into its children.
        let inherited = match self.layouts.last() {
            Some(parent) if self.sizing.len() <= parent.sizing_mark => Sizing::FIT,
            _ => self.current_sizing(),
        };
        if let Some(sizing) = spec.sizing {
            self.push_sizing(sizing)?;
        }

        let mut layout = LayoutDescriptor::open(spec, self.items.len(), self.layouts.len());
        layout.pop_sizing_on_end = spec.sizing.is_some();
        layout.sizing_mark = self.sizing.len();
        let outer = self.reserve_provisional(&mut layout, spec.sizing.unwrap_or(inherited), anchor);

        tracing::debug!(depth = layout.depth, kind = ?layout.kind, "layout opened");
        self.layouts.push(layout);
        Ok(outer)
    }

    /// Compute a new container's initial geometry and set space aside for it
    /// in the parent.
    ///
    /// Per axis: a filling child of an expanding parent takes everything
    /// between the parent's cursor and far edge; a child of a far-anchored
    /// parent hangs off the far edge; otherwise the child starts at the
    /// cursor. Fixed sizes come from the current sizing entry; a child
    /// without one fits its content on that axis.
    pub(crate) fn reserve_provisional(
        &mut self,
        child: &mut LayoutDescriptor,
        sizing: Sizing,
        anchor: Point,
    ) -> Rect {
        let mut outer = Rect::ZERO;
        let mut expands = Placement::empty();

        match self.layouts.last_mut() {
            Some(parent) => {
                let main = parent.main_axis();
                let mut reservation = Reservation {
                    near: parent.cursor,
                    far: parent.far,
                    pinned: None,
                };

                for axis in Axis::BOTH {
                    let near = if axis == main {
                        axis.of_point(parent.cursor) + parent.leading_gap()
                    } else {
                        axis.of_point(parent.cursor)
                    };
                    let far = axis.of_point(parent.far).max(near);
                    let measure = sizing.on(axis).resolve(axis.extent(&parent.bounds));

                    let (start, end) = if child.fill.fills(axis) && parent.expands.expands(axis) {
                        expands |= Placement::expand_flag(axis);
                        (near, far)
                    } else if axis == main && parent.align.far(axis) {
                        reservation.pinned = Some(axis);
                        if let Some(m) = measure {
                            expands |= Placement::expand_flag(axis);
                            (far - m, far)
                        } else {
                            (far, far)
                        }
                    } else if let Some(m) = measure {
                        expands |= Placement::expand_flag(axis);
                        (near, near + m)
                    } else {
                        (near, near)
                    };
                    axis.set_span(&mut outer, start, end);

                    if axis == main {
                        if reservation.pinned == Some(axis) {
                            *axis.point_mut(&mut parent.far) = start - parent.spacing_on(axis);
                        } else {
                            *axis.point_mut(&mut parent.cursor) = end;
                        }
                    }
                }

                child.reservation = Some(reservation);
            }
            None => {
                for axis in Axis::BOTH {
                    let start = axis.of_point(anchor);
                    let end = match sizing.on(axis).resolve(axis.extent(&self.viewport)) {
                        Some(m) => start + m,
                        None => axis.end(&self.viewport).max(start),
                    };
                    axis.set_span(&mut outer, start, end);
                }
                expands = Placement::EXPAND_ALL;
            }
        }

        let b = &child.border;
        child.bounds = outer.inset(
            b.top.thickness,
            b.right.thickness,
            b.bottom.thickness,
            b.left.thickness,
        );
        child.expands = expands;
        child.cursor = child.bounds.origin();
        child.far = Point::new(child.bounds.right(), child.bounds.bottom());
        outer
    }

    // =====================================================================
    // Items
    // =====================================================================

    /// Where the next item of the innermost container starts.
    pub fn next_item_origin(&self) -> Option<Point> {
        self.layouts.last().map(LayoutDescriptor::next_item_origin)
    }

    /// How far an item of the innermost container may expand.
    pub fn expansion_limits(&self) -> Option<BoxLimits> {
        let layout = self.layouts.last()?;
        let limit = |axis: Axis| {
            if layout.expands.expands(axis) {
                AxisLimit::ExpandTo(axis.of_point(layout.far))
            } else {
                AxisLimit::FitContent
            }
        };
        Some(BoxLimits {
            horizontal: limit(Axis::Horizontal),
            vertical: limit(Axis::Vertical),
        })
    }

    /// Append an item to the innermost container and advance its cursor.
    ///
    /// Returns the offset applied to move the item to its slot.
    pub fn add_item(&mut self, item: LayoutItem) -> Result<Point, LayoutError> {
        if self.layouts.is_empty() {
            return Err(LayoutError::NoOpenLayout);
        }
        Ok(self.place(item))
    }

    fn place(&mut self, mut item: LayoutItem) -> Point {
        let Self { layouts, items, .. } = self;
        let Some(layout) = layouts.last_mut() else {
            return Point::ORIGIN;
        };

        let main = layout.main_axis();
        let cross = main.cross();
        let w = main.extent(&item.boxes.margin);
        let h = cross.extent(&item.boxes.margin);

        let line_open = layout.current_line().count > 0;
        let overflows = main.of_point(layout.cursor) + layout.leading_gap() + w
            > main.end(&layout.bounds);
        if layout.wraps() && line_open && overflows {
            if layout.lines.len() < MAX_FLOW_LINES {
                align_line(layout, items, layout.lines.len() - 1);
                let cross_start = layout.used_cross() + layout.spacing_on(cross);
                layout.lines.push(FlowLine {
                    cross_start,
                    ..FlowLine::default()
                });
                *main.point_mut(&mut layout.cursor) = main.start(&layout.bounds);
                *cross.point_mut(&mut layout.cursor) = cross.start(&layout.bounds) + cross_start;
            } else {
                tracing::warn!("layout line limit reached ({}), item not wrapped", MAX_FLOW_LINES);
            }
        }

        let target = layout.next_item_origin();
        let offset = target - item.boxes.margin.origin();

        let line_idx = layout.lines.len() - 1;
        let gap = layout.leading_gap();
        let line = &mut layout.lines[line_idx];
        let pos_in_line = line.count;
        line.extent += gap + w;
        line.items_extent += w;
        line.cross = line.cross.max(h);
        line.count += 1;
        *main.point_mut(&mut layout.cursor) = main.of_point(target) + w;

        (item.row, item.col) = match main {
            Axis::Horizontal => (line_idx, pos_in_line),
            Axis::Vertical => (pos_in_line, line_idx),
        };
        item.depth = layout.depth;

        // Fitting axes grow with their content.
        if !layout.expands.expands(main) {
            let used = main.of_point(layout.cursor) - main.start(&layout.bounds);
            let start = main.start(&layout.bounds);
            let end = start + main.extent(&layout.bounds).max(used);
            main.set_span(&mut layout.bounds, start, end);
            *main.point_mut(&mut layout.far) = end;
        }
        if !layout.expands.expands(cross) {
            let start = cross.start(&layout.bounds);
            let end = start + cross.extent(&layout.bounds).max(layout.used_cross());
            cross.set_span(&mut layout.bounds, start, end);
            *cross.point_mut(&mut layout.far) = end;
        }

        items.push(item);
        let idx = items.len() - 1;
        translate_item(items, idx, offset);
        offset
    }

    /// Settle a closed child in its parent: rewind the provisional
    /// reservation, then place the child's outer box for real.
    ///
    /// Returns the child's final outer bounds.
    pub(crate) fn commit_final(&mut self, child: LayoutDescriptor) -> Rect {
        let outer = child.outer_bounds();
        let mut item = LayoutItem {
            kind: ItemKind::Sublayout {
                border: child.border,
                descendants: child.from..self.items.len(),
            },
            boxes: BoxModel::uniform(outer),
            row: 0,
            col: 0,
            depth: 0,
            pinned: false,
        };

        let Some(parent) = self.layouts.last_mut() else {
            return outer;
        };
        let reservation = child.reservation;
        if let Some(r) = reservation {
            parent.cursor = r.near;
            parent.far = r.far;
        }

        let main = parent.main_axis();
        if reservation.and_then(|r| r.pinned) != Some(main) {
            let offset = self.place(item);
            return outer.translate(offset);
        }

        // Far-anchored: hang off the parent's far edge, outside the flow.
        let cross = main.cross();
        let mut offset = Point::ORIGIN;
        *main.point_mut(&mut offset) = main.of_point(parent.far) - main.end(&outer);
        *cross.point_mut(&mut offset) = cross.of_point(parent.cursor) - cross.start(&outer);
        let placed = outer.translate(offset);
        *main.point_mut(&mut parent.far) = main.start(&placed) - parent.spacing_on(main);

        item.pinned = true;
        item.depth = parent.depth;
        (item.row, item.col) = match main {
            Axis::Horizontal => (parent.lines.len() - 1, 0),
            Axis::Vertical => (0, parent.lines.len() - 1),
        };
        self.items.push(item);
        let idx = self.items.len() - 1;
        translate_item(&mut self.items, idx, offset);
        placed
    }

    // =====================================================================
    // Close
    // =====================================================================

    /// Close up to `depth` containers, innermost first.
    ///
    /// Each closing container aligns its last line and its cross axis, pops
    /// the sizing it pushed, and is committed to its parent. When the
    /// outermost container closes, every buffered item is flushed to the
    /// finished draw list. Returns the outer bounds of the last container
    /// closed, or `None` if nothing was open.
    pub fn end_layout(&mut self, depth: usize) -> Option<Rect> {
        let mut closed = None;

        for _ in 0..depth {
            let Some(layout) = self.layouts.pop() else {
                if closed.is_none() {
                    tracing::warn!("end_layout called with no open layout");
                }
                break;
            };

            align_line(&layout, &mut self.items, layout.lines.len() - 1);
            align_cross(&layout, &mut self.items);
            if layout.pop_sizing_on_end {
                self.pop_sizing(1);
            }

            let level = layout.depth;
            let bounds = if self.layouts.is_empty() {
                self.flush(&layout)
            } else {
                self.commit_final(layout)
            };
            tracing::debug!(depth = level, ?bounds, "layout closed");
            closed = Some(bounds);
        }

        closed
    }

    fn flush(&mut self, layout: &LayoutDescriptor) -> Rect {
        let outer = layout.outer_bounds();
        for item in self.items.drain(..) {
            match item.kind {
                ItemKind::Widget(id) => self.finished.push(DrawCommand::Widget {
                    id,
                    boxes: item.boxes,
                }),
                ItemKind::Sublayout { border, .. } => {
                    if border.is_visible() {
                        self.finished.push(DrawCommand::LayoutBorder {
                            bounds: item.boxes.margin,
                            border: (&border).into(),
                        });
                    }
                }
            }
        }
        if layout.border.is_visible() {
            self.finished.push(DrawCommand::LayoutBorder {
                bounds: outer,
                border: (&layout.border).into(),
            });
        }
        outer
    }

    /// Take everything flushed by closed top-level containers.
    pub fn drain_finished(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.finished)
    }

    /// Drop all frame state. Open containers are discarded.
    pub fn reset_frame(&mut self) {
        self.layouts.clear();
        self.sizing.truncate(1);
        self.items.clear();
        self.finished.clear();
    }
}
