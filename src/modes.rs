use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::elements::{NodeKind, RelationKind};

/// Layout strategy supplying the distance/strength/position functions the
/// forces consume.
///
/// `Network` is a uniform free-form layout; `Hierarchical` places genres on a
/// fixed ring and pulls descendants toward ancestor-relative offsets.
/// Switching modes is a discrete re-registration followed by an alpha reheat,
/// never an interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    #[default]
    Network,
    Hierarchical,
}

impl LayoutMode {
    /// Target separation for an edge. Edges touching a genre keep a larger
    /// distance; helper edges a smaller one. `scale` is the size-based global
    /// factor keeping the bounding area stable as the graph grows.
    pub(crate) fn link_distance(
        self,
        cfg: &EngineConfig,
        kind: RelationKind,
        source: NodeKind,
        target: NodeKind,
        scale: f32,
    ) -> f32 {
        let mut dist = cfg.link.base_distance * scale;
        if source == NodeKind::Genre || target == NodeKind::Genre {
            dist *= cfg.link.genre_distance_mult;
        }
        if kind.is_clustering() {
            dist *= cfg.link.helper_distance_mult;
        }
        dist
    }

    /// Spring strength multiplier for an edge of the given kind and base
    /// strength. Hierarchical mode favors parent→child pulls and all but
    /// ignores incidental cross-links.
    pub(crate) fn link_strength(self, cfg: &EngineConfig, kind: RelationKind, strength: f32) -> f32 {
        match self {
            LayoutMode::Network => strength,
            LayoutMode::Hierarchical => {
                if kind.is_hierarchical() {
                    strength * cfg.link.hierarchy_strength_mult
                } else {
                    strength * cfg.link.cross_strength_mult
                }
            }
        }
    }

    /// Global centering strength for the current mode.
    pub(crate) fn center_strength(self, cfg: &EngineConfig) -> f32 {
        match self {
            LayoutMode::Network => cfg.center.strength,
            LayoutMode::Hierarchical => cfg.center.hierarchical_strength,
        }
    }

    /// Fixed ring slot for genre `index` of `count`, starting at the top of
    /// the circle. Only meaningful in hierarchical mode.
    pub(crate) fn genre_slot(
        self,
        cfg: &EngineConfig,
        index: usize,
        count: usize,
        canvas: Rect,
    ) -> Option<Pos2> {
        if self != LayoutMode::Hierarchical || count == 0 {
            return None;
        }
        let radius = cfg.center.ring_radius_frac * canvas.width().min(canvas.height());
        let angle = -std::f32::consts::PI / 2.
            + (index as f32) * std::f32::consts::TAU / (count as f32);
        let center = canvas.center();
        Some(Pos2::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        ))
    }

    /// Whether the ancestor-offset force runs in this mode.
    pub(crate) fn uses_anchor(self) -> bool {
        self == LayoutMode::Hierarchical
    }
}
