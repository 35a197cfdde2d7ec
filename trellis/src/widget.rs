//! Typed widget handles and per-widget quasi-persistent state.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::WidgetError;
use crate::grid::{ColumnConfig, CursorHint, GridState, HeaderLayout};
use crate::primitives::Point;
use crate::style::InteractionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Label,
    Button,
    ItemGrid,
}

impl WidgetKind {
    fn name(self) -> &'static str {
        match self {
            WidgetKind::Label => "label",
            WidgetKind::Button => "button",
            WidgetKind::ItemGrid => "item_grid",
        }
    }
}

/// Handle of one widget instance: its kind plus an index among widgets of
/// that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WidgetId {
    pub kind: WidgetKind,
    pub index: u32,
}

impl WidgetId {
    pub fn new(kind: WidgetKind, index: u32) -> Self {
        Self { kind, index }
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind.name(), self.index)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextWidget {
    pub text: String,
    pub state: InteractionState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemGridData {
    /// Header rows, top level first.
    pub headers: Vec<Vec<ColumnConfig>>,
    pub state: GridState,
    /// Header geometry of the last frame, relative to the grid's content origin.
    pub header_layout: HeaderLayout,
    /// Content origin of the last drawn frame; maps the pointer into grid space.
    pub content_origin: Point,
    pub cursor: CursorHint,
}

impl ItemGridData {
    pub fn new(max_header_levels: usize) -> Self {
        Self {
            headers: Vec::new(),
            state: GridState::new(max_header_levels),
            header_layout: HeaderLayout::default(),
            content_origin: Point::ORIGIN,
            cursor: CursorHint::Arrow,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetData {
    Label(TextWidget),
    Button(TextWidget),
    ItemGrid(Box<ItemGridData>),
}

impl WidgetData {
    pub fn kind(&self) -> WidgetKind {
        match self {
            WidgetData::Label(_) => WidgetKind::Label,
            WidgetData::Button(_) => WidgetKind::Button,
            WidgetData::ItemGrid(_) => WidgetKind::ItemGrid,
        }
    }

    pub fn interaction(&self) -> InteractionState {
        match self {
            WidgetData::Label(w) | WidgetData::Button(w) => w.state,
            WidgetData::ItemGrid(_) => InteractionState::DEFAULT,
        }
    }
}

/// Allocates widget ids and owns their state across frames.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    counts: HashMap<WidgetKind, u32>,
    widgets: HashMap<WidgetId, WidgetData>,
    max_header_levels: usize,
}

impl WidgetRegistry {
    pub fn new(max_header_levels: usize) -> Self {
        Self {
            max_header_levels,
            ..Self::default()
        }
    }

    pub fn create(&mut self, kind: WidgetKind) -> WidgetId {
        let count = self.counts.entry(kind).or_default();
        let id = WidgetId::new(kind, *count);
        *count += 1;

        let data = match kind {
            WidgetKind::Label => WidgetData::Label(TextWidget::default()),
            WidgetKind::Button => WidgetData::Button(TextWidget::default()),
            WidgetKind::ItemGrid => WidgetData::ItemGrid(Box::new(ItemGridData::new(self.max_header_levels))),
        };
        self.widgets.insert(id, data);
        id
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn get(&self, id: WidgetId) -> Result<&WidgetData, WidgetError> {
        self.widgets.get(&id).ok_or(WidgetError::UnknownWidget(id))
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Result<&mut WidgetData, WidgetError> {
        self.widgets.get_mut(&id).ok_or(WidgetError::UnknownWidget(id))
    }

    /// Text state of a label or button.
    pub fn text_mut(&mut self, id: WidgetId, expected: WidgetKind) -> Result<&mut TextWidget, WidgetError> {
        match self.get_mut(id)? {
            WidgetData::Label(w) if expected == WidgetKind::Label => Ok(w),
            WidgetData::Button(w) if expected == WidgetKind::Button => Ok(w),
            _ => Err(WidgetError::KindMismatch { id, expected }),
        }
    }

    pub fn grid(&self, id: WidgetId) -> Result<&ItemGridData, WidgetError> {
        match self.get(id)? {
            WidgetData::ItemGrid(grid) => Ok(grid),
            _ => Err(WidgetError::KindMismatch {
                id,
                expected: WidgetKind::ItemGrid,
            }),
        }
    }

    pub fn grid_mut(&mut self, id: WidgetId) -> Result<&mut ItemGridData, WidgetError> {
        match self.get_mut(id)? {
            WidgetData::ItemGrid(grid) => Ok(grid),
            _ => Err(WidgetError::KindMismatch {
                id,
                expected: WidgetKind::ItemGrid,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_count_per_kind() {
        let mut registry = WidgetRegistry::new(8);
        let a = registry.create(WidgetKind::Label);
        let b = registry.create(WidgetKind::Button);
        let c = registry.create(WidgetKind::Label);
        assert_eq!(a, WidgetId::new(WidgetKind::Label, 0));
        assert_eq!(b.index, 0);
        assert_eq!(c.index, 1);
        assert_eq!(c.to_string(), "label#1");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_kind_mismatch() {
        let mut registry = WidgetRegistry::new(8);
        let label = registry.create(WidgetKind::Label);
        assert_eq!(
            registry.grid(label).unwrap_err(),
            WidgetError::KindMismatch {
                id: label,
                expected: WidgetKind::ItemGrid
            }
        );
        assert!(registry.text_mut(label, WidgetKind::Label).is_ok());
        assert!(registry.text_mut(label, WidgetKind::Button).is_err());
    }

    #[test]
    fn test_unknown_widget() {
        let registry = WidgetRegistry::new(8);
        let ghost = WidgetId::new(WidgetKind::Button, 9);
        assert_eq!(registry.get(ghost).unwrap_err(), WidgetError::UnknownWidget(ghost));
    }
}
