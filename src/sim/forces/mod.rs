//! Composable velocity contributions evaluated against the current active
//! subgraph each tick.
//!
//! Application order is fixed and part of the crate contract, because later
//! forces read velocities accumulated by earlier ones:
//! link → charge → collide → center/radial → anchor.

pub(crate) mod anchor;
pub(crate) mod center;
pub(crate) mod charge;
pub(crate) mod collide;
pub(crate) mod link;

use egui::Rect;

use crate::config::EngineConfig;
use crate::modes::LayoutMode;

/// Per-tick inputs shared by all forces.
pub(crate) struct ForceCtx<'a> {
    pub cfg: &'a EngineConfig,
    pub mode: LayoutMode,
    pub canvas: Rect,
    pub alpha: f32,
    /// Size-based global scale for the current active node count.
    pub scale: f32,
}
