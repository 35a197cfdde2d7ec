//! Style cascade: descriptors, declarations and the per-state resolver.

mod declaration;
mod descriptor;
mod resolver;

pub use declaration::{
    Corner, Edge, LengthOrPercent, StyleUpdate, parse_color, parse_gradient, parse_keyword,
    parse_length, parse_length_or_percent, parse_style, split_declarations,
};
pub use descriptor::{
    Border, BorderSide, FontFlags, FontSpec, Gradient, Shadow, Spacing, StyleDescriptor,
    StyleProps,
};
pub use resolver::{InteractionState, StateIndex, StyleResolver};
