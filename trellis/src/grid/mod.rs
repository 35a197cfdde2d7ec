//! Item grid column topology: multi-level headers, logical/visual column
//! maps, reorder and resize propagation, and header drag handling.

mod column_map;
mod header;
mod interaction;
mod topology;

pub use column_map::ColumnMap;
pub use header::{ColumnConfig, ColumnProps, HeaderCell, HeaderLayout, compute_header_layout};
pub use interaction::{
    CursorHint, DragTolerances, GridInteraction, GridState, GridUpdate, HeaderCellDragState,
    HeaderCellResizeState, ResizePhase,
};
pub use topology::{ColumnSpan, child_span, propagate_resize, swap_columns};
