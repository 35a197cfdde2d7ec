//! Box model and flow layout.

mod align;
mod box_model;
mod descriptor;
mod flags;
mod stack;

pub use align::{align_cross, align_line};
pub use box_model::{AxisLimit, BoxLimits, BoxModel, NeighborWidgets, compute_box_model};
pub use descriptor::{
    BorderWidths, DrawCommand, FlowLine, ItemKind, LayoutDescriptor, LayoutItem, LayoutSpec,
    MAX_FLOW_LINES, SizeSpec, Sizing,
};
pub use flags::{Align, Axis, FillDirection, LayoutKind, Overflow, Placement};
pub use stack::LayoutStack;
