//! Frame context: the one object every widget call goes through.
//!
//! A frame is evaluated synchronously between [`FrameContext::begin_frame`]
//! and [`FrameContext::end_frame`]. Widgets placed outside any layout land on
//! the draw list immediately; widgets inside a layout are buffered and land
//! when the outermost layout closes. Layouts close in reverse order of
//! opening, and style pushes and pops nest per state.

use std::collections::HashMap;

use crate::backend::TextBackend;
use crate::config::EngineConfig;
use crate::error::{LayoutError, WidgetError};
use crate::grid::{ColumnConfig, DragTolerances, compute_header_layout};
use crate::input::PointerSnapshot;
use crate::layout::{
    AxisLimit, BoxLimits, BoxModel, DrawCommand, FillDirection, LayoutItem, LayoutKind,
    LayoutSpec, LayoutStack, NeighborWidgets, Placement, Sizing, compute_box_model,
};
use crate::primitives::{Point, Rect};
use crate::style::{InteractionState, StyleDescriptor, StyleProps, StyleResolver};
use crate::widget::{WidgetData, WidgetId, WidgetKind, WidgetRegistry};

pub struct FrameContext {
    config: EngineConfig,
    backend: Box<dyn TextBackend>,
    styles: StyleResolver,
    layouts: LayoutStack,
    widgets: WidgetRegistry,
    /// Margin rectangles of widgets drawn this frame.
    geometry: HashMap<WidgetId, Rect>,
    last_widget: Option<WidgetId>,
    next_pos: Point,
    pointer: PointerSnapshot,
    draw_list: Vec<DrawCommand>,
    in_frame: bool,
}

impl FrameContext {
    pub fn new(config: EngineConfig, backend: Box<dyn TextBackend>) -> Self {
        Self {
            styles: StyleResolver::new(&config),
            layouts: LayoutStack::new(config.max_layout_nesting, config.viewport),
            widgets: WidgetRegistry::new(config.max_header_levels),
            config,
            backend,
            geometry: HashMap::new(),
            last_widget: None,
            next_pos: Point::ORIGIN,
            pointer: PointerSnapshot::default(),
            draw_list: Vec::new(),
            in_frame: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn styles(&self) -> &StyleResolver {
        &self.styles
    }

    pub fn layouts(&self) -> &LayoutStack {
        &self.layouts
    }

    pub fn pointer(&self) -> &PointerSnapshot {
        &self.pointer
    }

    // =====================================================================
    // Frame lifecycle
    // =====================================================================

    pub fn begin_frame(&mut self, pointer: PointerSnapshot) {
        debug_assert!(!self.in_frame, "begin_frame called twice");
        self.pointer = pointer;
        self.next_pos = Point::ORIGIN;
        self.last_widget = None;
        self.in_frame = true;
    }

    /// Close the frame and reset every frame-scoped buffer. The draw list
    /// stays available until taken.
    pub fn end_frame(&mut self) {
        debug_assert!(self.in_frame, "end_frame without begin_frame");
        debug_assert!(!self.layouts.is_open(), "layouts left open at end of frame");
        debug_assert_eq!(self.layouts.sizing_depth(), 0, "sizing left pushed at end of frame");
        if self.layouts.is_open() {
            tracing::warn!("{} layout(s) left open at end of frame", self.layouts.depth());
        }

        self.layouts.reset_frame();
        self.styles.reset_frame();
        self.geometry.clear();
        self.in_frame = false;
    }

    /// Everything finished this frame, in order.
    pub fn take_draw_list(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.draw_list)
    }

    // =====================================================================
    // Widgets
    // =====================================================================

    pub fn create_widget(&mut self, kind: WidgetKind) -> WidgetId {
        self.widgets.create(kind)
    }

    pub fn widget(&self, id: WidgetId) -> Result<&WidgetData, WidgetError> {
        self.widgets.get(id)
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Result<&mut WidgetData, WidgetError> {
        self.widgets.get_mut(id)
    }

    /// Margin rectangle of a widget drawn earlier this frame.
    pub fn geometry(&self, id: WidgetId) -> Option<Rect> {
        self.geometry.get(&id).copied()
    }

    pub fn set_interaction(&mut self, id: WidgetId, state: InteractionState) -> Result<(), WidgetError> {
        match self.widgets.get_mut(id)? {
            WidgetData::Label(w) | WidgetData::Button(w) => {
                w.state = state;
                Ok(())
            }
            WidgetData::ItemGrid(_) => Err(WidgetError::KindMismatch {
                id,
                expected: WidgetKind::Button,
            }),
        }
    }

    /// Effective style for `mask` this frame.
    pub fn resolve_style(&mut self, mask: InteractionState) -> &StyleDescriptor {
        self.styles.resolve(mask, self.backend.fonts())
    }

    pub fn label(&mut self, id: WidgetId, text: &str) -> Result<BoxModel, WidgetError> {
        self.text_widget(id, WidgetKind::Label, text, Placement::empty(), &NeighborWidgets::default())
    }

    pub fn button(&mut self, id: WidgetId, text: &str) -> Result<BoxModel, WidgetError> {
        self.text_widget(id, WidgetKind::Button, text, Placement::empty(), &NeighborWidgets::default())
    }

    /// Place a label or button with explicit growth flags and neighbour
    /// bounds. Neighbours only matter outside layouts.
    pub fn text_widget(
        &mut self,
        id: WidgetId,
        kind: WidgetKind,
        text: &str,
        placement: Placement,
        neighbors: &NeighborWidgets,
    ) -> Result<BoxModel, WidgetError> {
        let widget = self.widgets.text_mut(id, kind)?;
        widget.text.clear();
        widget.text.push_str(text);
        let mask = widget.state;

        let style = self.resolve_style(mask).clone();
        let pos = self.next_origin();
        let limits = self.limits_for(placement, neighbors);
        let boxes = compute_box_model(pos, &style, text, placement, limits, self.backend.measurer());
        Ok(self.commit(id, boxes))
    }

    pub fn set_grid_headers(&mut self, id: WidgetId, headers: Vec<Vec<ColumnConfig>>) -> Result<(), WidgetError> {
        let grid = self.widgets.grid_mut(id)?;
        grid.headers = headers;
        grid.state.ensure(&grid.headers);
        Ok(())
    }

    /// Place an item grid. Header geometry is derived from the columns and
    /// the available width, then the pointer drives resize and reorder drags.
    /// The grid's height follows its header unless the style fixes it.
    pub fn item_grid(&mut self, id: WidgetId) -> Result<BoxModel, WidgetError> {
        self.widgets.grid(id)?;

        let style = self.resolve_style(InteractionState::DEFAULT).clone();
        let pos = self.next_origin();
        let placement = Placement::EXPAND_H;
        let limits = self.limits_for(placement, &NeighborWidgets::default());
        let tolerances = DragTolerances {
            resize_handle: self.config.resize_handle_tolerance,
            reorder_inset: self.config.reorder_handle_inset,
        };
        let measurer = self.backend.measurer();
        let measured = compute_box_model(pos, &style, "", placement, limits, measurer);

        let grid = self.widgets.grid_mut(id)?;
        let pointer = PointerSnapshot {
            position: self.pointer.position.map(|p| p - grid.content_origin),
            ..self.pointer
        };
        let headers = &grid.headers;
        let state = &mut grid.state;

        let mut header = compute_header_layout(headers, state, Point::ORIGIN, measured.content.width, &style.font, measurer);
        let update = state.update(headers, &header, &pointer, tolerances);
        if update.changed {
            header = compute_header_layout(headers, state, Point::ORIGIN, measured.content.width, &style.font, measurer);
        }
        state.apply_drag_offset(headers, &mut header, &pointer);
        grid.cursor = update.cursor;
        let size = header.size;
        grid.header_layout = header;

        let mut sized = style;
        if !sized.is_specified(StyleProps::WIDTH) {
            sized.dimension.width = size.width;
            sized.specified |= StyleProps::WIDTH;
        }
        if !sized.is_specified(StyleProps::HEIGHT) {
            sized.dimension.height = size.height;
            sized.specified |= StyleProps::HEIGHT;
        }
        let boxes = compute_box_model(pos, &sized, "", placement, limits, measurer);
        Ok(self.commit(id, boxes))
    }

    fn next_origin(&self) -> Point {
        self.layouts.next_item_origin().unwrap_or(self.next_pos)
    }

    /// Expansion limits: the open layout's edges, or else the neighbours'
    /// near edges and finally the viewport.
    fn limits_for(&self, placement: Placement, neighbors: &NeighborWidgets) -> BoxLimits {
        if let Some(limits) = self.layouts.expansion_limits() {
            return limits;
        }

        let viewport = self.config.viewport;
        let bound = |neighbor: Option<WidgetId>, edge: fn(&Rect) -> f32, fallback: f32| match neighbor {
            Some(id) => match self.geometry.get(&id) {
                Some(rect) => edge(rect),
                None => {
                    tracing::warn!("neighbour {} has no geometry this frame", id);
                    fallback
                }
            },
            None => fallback,
        };

        let horizontal = if placement.contains(Placement::TO_LEFT) {
            bound(neighbors.left, Rect::right, 0.0)
        } else {
            bound(neighbors.right, |r: &Rect| r.x, viewport.width)
        };
        let vertical = if placement.contains(Placement::TO_TOP) {
            bound(neighbors.top, Rect::bottom, 0.0)
        } else {
            bound(neighbors.bottom, |r: &Rect| r.y, viewport.height)
        };
        BoxLimits {
            horizontal: AxisLimit::ExpandTo(horizontal),
            vertical: AxisLimit::ExpandTo(vertical),
        }
    }

    /// Buffer `boxes` in the open layout, or draw it right away.
    fn commit(&mut self, id: WidgetId, mut boxes: BoxModel) -> BoxModel {
        self.styles.clear_overrides();
        self.last_widget = Some(id);

        match self.layouts.add_item(LayoutItem::widget(id, boxes)) {
            Ok(offset) => {
                boxes.translate(offset);
                boxes
            }
            Err(_) => {
                self.finish(DrawCommand::Widget { id, boxes });
                boxes
            }
        }
    }

    fn finish(&mut self, command: DrawCommand) {
        if let DrawCommand::Widget { id, boxes } = &command {
            self.geometry.insert(*id, boxes.margin);
            if let Ok(grid) = self.widgets.grid_mut(*id) {
                grid.content_origin = boxes.content.origin();
            }
        }
        self.draw_list.push(command);
    }

    // =====================================================================
    // Layouts
    // =====================================================================

    pub fn begin_layout(&mut self, spec: &LayoutSpec) -> Result<Rect, LayoutError> {
        self.layouts.begin(spec, self.next_pos)
    }

    /// Open a layout described by `name: value;` declarations.
    pub fn begin_layout_with(&mut self, kind: LayoutKind, decl: &str) -> Result<Rect, LayoutError> {
        let (spec, errors) = LayoutSpec::from_declarations(kind, decl, self.config.base_font_size());
        for e in errors {
            tracing::warn!("layout declaration skipped: {}", e);
        }
        self.begin_layout(&spec)
    }

    /// Close up to `depth` layouts. Returns the outer bounds of the last one
    /// closed.
    pub fn end_layout(&mut self, depth: usize) -> Option<Rect> {
        let bounds = self.layouts.end_layout(depth);
        for command in self.layouts.drain_finished() {
            self.finish(command);
        }
        bounds
    }

    pub fn push_sizing(&mut self, sizing: Sizing) -> Result<(), LayoutError> {
        self.layouts.push_sizing(sizing)
    }

    pub fn pop_sizing(&mut self, depth: usize) {
        self.layouts.pop_sizing(depth);
    }

    // =====================================================================
    // Styles
    // =====================================================================

    pub fn push_style(&mut self, states: InteractionState, decl: &str) {
        self.styles.push(states, decl);
    }

    pub fn pop_style(&mut self, depth: usize, states: InteractionState) {
        self.styles.pop(depth, states);
    }

    pub fn set_next_style(&mut self, states: InteractionState, decl: &str) {
        self.styles.set_next_style(states, decl);
    }

    // =====================================================================
    // Ad-hoc positioning
    // =====================================================================

    pub fn move_to(&mut self, pos: Point) {
        self.next_pos = pos;
    }

    /// Shift the next position; `TO_LEFT`/`TO_TOP` flip the direction.
    pub fn move_by(&mut self, mut amount: Point, direction: Placement) {
        if direction.contains(Placement::TO_LEFT) {
            amount.x = -amount.x;
        }
        if direction.contains(Placement::TO_TOP) {
            amount.y = -amount.y;
        }
        self.next_pos += amount;
    }

    /// Continue from an earlier widget: its origin, pushed past its far edge
    /// on the selected axes.
    pub fn move_after(&mut self, id: WidgetId, direction: FillDirection) -> Result<(), WidgetError> {
        let rect = self.geometry_or_warn(id)?;
        self.next_pos = rect.origin();
        if direction.contains(FillDirection::HORIZONTAL) {
            self.next_pos.x = rect.right();
        }
        if direction.contains(FillDirection::VERTICAL) {
            self.next_pos.y = rect.bottom();
        }
        Ok(())
    }

    /// [`move_after`](Self::move_after) the most recently placed widget.
    pub fn move_after_last(&mut self, direction: FillDirection) -> Result<(), WidgetError> {
        match self.last_widget {
            Some(id) => self.move_after(id, direction),
            None => {
                tracing::warn!("move_after_last with no widget placed this frame");
                Ok(())
            }
        }
    }

    /// X from `h` (its right or left edge), Y from `v` (its bottom or top).
    pub fn move_between(&mut self, h: WidgetId, v: WidgetId, to_right: bool, to_bottom: bool) -> Result<(), WidgetError> {
        let hr = self.geometry_or_warn(h)?;
        let vr = self.geometry_or_warn(v)?;
        self.next_pos.x = if to_right { hr.right() } else { hr.x };
        self.next_pos.y = if to_bottom { vr.bottom() } else { vr.y };
        Ok(())
    }

    fn geometry_or_warn(&self, id: WidgetId) -> Result<Rect, WidgetError> {
        self.geometry.get(&id).copied().ok_or_else(|| {
            tracing::warn!("widget {} has no geometry this frame", id);
            WidgetError::UnknownWidget(id)
        })
    }
}
