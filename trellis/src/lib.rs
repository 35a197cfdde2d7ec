//! Trellis: layout and style core of an immediate-mode widget toolkit.
//!
//! Every frame the host re-declares its widgets through a [`FrameContext`].
//! The core resolves styles per interaction state, computes nested box
//! models, flows widgets through a stack of layouts, and keeps the column
//! topology of item grids (multi-level headers with reorder and resize)
//! alive across frames. Output is a flat [`DrawCommand`] list the host
//! renders however it likes.
//!
//! # Architecture
//!
//! - `style`: declaration parsing, descriptors, per-state stacks with
//!   inheritance from the Default state
//! - `layout`: box model, layout stack with wrap/center/justify and a
//!   two-pass reserve/commit for nested containers
//! - `grid`: logical/visual column maps, header geometry, drag handling
//!
//! # Usage
//!
//! ```ignore
//! use trellis::{EngineConfig, FrameContext, LayoutSpec, MonospaceBackend, PointerSnapshot, WidgetKind};
//!
//! let mut ctx = FrameContext::new(EngineConfig::default(), Box::new(MonospaceBackend::new()));
//! let ok = ctx.create_widget(WidgetKind::Button);
//!
//! ctx.begin_frame(PointerSnapshot::default());
//! ctx.begin_layout(&LayoutSpec::horizontal().spacing(8.0))?;
//! ctx.button(ok, "OK")?;
//! ctx.end_layout(1);
//! ctx.end_frame();
//! let commands = ctx.take_draw_list();
//! ```

// Core primitives
pub mod primitives;
pub mod error;
pub mod config;
pub mod input;

// Host collaborators (text measurement, fonts)
pub mod backend;

// Style cascade
pub mod style;

// Box model and layout stack
pub mod layout;

// Item grid column topology
pub mod grid;

// Widgets and the per-frame context
pub mod widget;
pub mod context;

// Re-export core types
pub use primitives::{Color, Point, Rect, Size};
pub use error::{LayoutError, StyleError, WidgetError};
pub use config::EngineConfig;
pub use input::{Modifiers, PointerSnapshot};
pub use backend::{FontHandle, FontResolver, MonospaceBackend, TextBackend, TextMeasurer};
pub use style::{InteractionState, StyleDescriptor, StyleProps, StyleResolver};
pub use layout::{
    Align, BoxModel, DrawCommand, FillDirection, LayoutKind, LayoutSpec, LayoutStack,
    NeighborWidgets, Overflow, Placement, SizeSpec, Sizing,
};
pub use grid::{ColumnConfig, ColumnMap, ColumnProps, CursorHint, GridInteraction, GridState};
pub use widget::{WidgetData, WidgetId, WidgetKind, WidgetRegistry};
pub use context::FrameContext;
