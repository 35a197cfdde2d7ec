//! Engine configuration.
//!
//! Loading from disk is the host's job; this module only defines the shape
//! and a JSON convenience constructor.

use serde::{Deserialize, Serialize};

use crate::primitives::{Color, Size};

/// Tunables shared by every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base font size in pixels before scaling.
    pub default_font_size: f32,
    /// Multiplier applied to every font size, including relative keywords.
    pub font_scaling: f32,
    pub default_font_family: String,
    /// Outer bound used by top-level layouts and expanding widgets.
    pub viewport: Size,
    pub background: Color,
    pub max_layout_nesting: usize,
    pub max_header_levels: usize,
    /// Horizontal distance from a column boundary that arms a resize.
    pub resize_handle_tolerance: f32,
    /// Inset of the reorder trigger area inside a header cell.
    pub reorder_handle_inset: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_font_size: 16.0,
            font_scaling: 1.0,
            default_font_family: "default".to_string(),
            viewport: Size::new(1280.0, 720.0),
            background: Color::WHITE,
            max_layout_nesting: 8,
            max_header_levels: 8,
            resize_handle_tolerance: 5.0,
            reorder_handle_inset: 5.5,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Font size every relative unit resolves against.
    pub fn base_font_size(&self) -> f32 {
        self.default_font_size * self.font_scaling
    }
}
