use serde::{Deserialize, Serialize};

/// Integrator schedule parameters.
///
/// `alpha` relaxes toward `alpha_target` each tick:
/// `alpha += (alpha_target - alpha) * alpha_decay`, which is a pure decay
/// while the target is zero. `velocity_decay` is the retained fraction of
/// velocity after each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    pub alpha: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    /// Target raised while a drag is in progress or dynamic hover is active.
    pub interaction_alpha_target: f32,
    /// Alpha floor restored on filter or mode changes so the graph resettles
    /// instead of snapping.
    pub reheat_alpha: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            alpha: 1.,
            alpha_min: 0.001,
            // 1 - 0.001^(1/300): cools to alpha_min in ~300 ticks.
            alpha_decay: 0.0228,
            velocity_decay: 0.6,
            interaction_alpha_target: 0.3,
            reheat_alpha: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkParams {
    /// Target separation for an ordinary edge before per-kind scaling.
    pub base_distance: f32,
    /// Edges touching a genre node keep a larger separation.
    pub genre_distance_mult: f32,
    /// Helper edges keep members close to their anchor.
    pub helper_distance_mult: f32,
    /// Hierarchical mode: boost for parent→child pulls.
    pub hierarchy_strength_mult: f32,
    /// Hierarchical mode: near-zero pull for incidental cross-links.
    pub cross_strength_mult: f32,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            base_distance: 60.,
            genre_distance_mult: 2.,
            helper_distance_mult: 0.8,
            hierarchy_strength_mult: 1.5,
            cross_strength_mult: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeParams {
    pub genre_strength: f32,
    pub artist_strength: f32,
    pub album_strength: f32,
    pub track_strength: f32,
    /// Helpers bias position without visibly displacing real nodes.
    pub helper_strength: f32,
    /// Pairs farther apart than this do not interact.
    pub distance_max: f32,
    pub epsilon: f32,
}

impl Default for ChargeParams {
    fn default() -> Self {
        Self {
            genre_strength: 120.,
            artist_strength: 60.,
            album_strength: 40.,
            track_strength: 30.,
            helper_strength: 8.,
            distance_max: 400.,
            epsilon: 1e-3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollideParams {
    pub padding: f32,
    pub iterations: usize,
    pub strength: f32,
}

impl Default for CollideParams {
    fn default() -> Self {
        Self {
            padding: 4.,
            iterations: 2,
            strength: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CenterParams {
    /// Network mode: single attractor toward the canvas center.
    pub strength: f32,
    /// Hierarchical mode: very weak global centering against drift.
    pub hierarchical_strength: f32,
    /// Hierarchical mode: pull of genres toward their ring slot.
    pub genre_ring_strength: f32,
    /// Genre ring radius as a fraction of the smaller canvas dimension.
    pub ring_radius_frac: f32,
}

impl Default for CenterParams {
    fn default() -> Self {
        Self {
            strength: 0.05,
            hierarchical_strength: 0.01,
            genre_ring_strength: 0.3,
            ring_radius_frac: 0.35,
        }
    }
}

/// Hierarchical mode only: pull toward a fixed offset from the nearest typed
/// ancestor, producing nested circular clusters rather than a rigid tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorParams {
    pub offset: f32,
    pub strength: f32,
}

impl Default for AnchorParams {
    fn default() -> Self {
        Self {
            offset: 80.,
            strength: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoverParams {
    /// When enabled, highlighted nodes are scaled up in the snapshot and the
    /// simulation is reheated, producing visible repositioning.
    pub dynamic: bool,
    pub boost: f32,
    /// Ticks a cleared hover lingers before the highlight empties.
    pub linger_ticks: u32,
}

impl Default for HoverParams {
    fn default() -> Self {
        Self {
            dynamic: false,
            boost: 1.5,
            linger_ticks: 12,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpandParams {
    /// Radius of the circle children are kicked onto.
    pub ring_radius: f32,
    /// Fraction of the distance to the ring applied as a velocity impulse.
    pub impulse: f32,
}

impl Default for ExpandParams {
    fn default() -> Self {
        Self {
            ring_radius: 60.,
            impulse: 0.5,
        }
    }
}

/// Bundle of numeric tuning knobs consumed by the engine. The host may swap
/// it live between ticks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub sim: SimParams,
    pub link: LinkParams,
    pub charge: ChargeParams,
    pub collide: CollideParams,
    pub center: CenterParams,
    pub anchor: AnchorParams,
    pub hover: HoverParams,
    pub expand: ExpandParams,
}

impl EngineConfig {
    /// Defaults adjusted for dataset size: larger graphs cool faster, damp
    /// harder and resolve collisions with fewer passes to bound per-tick cost.
    pub fn tuned_for(node_count: usize) -> Self {
        let mut cfg = Self::default();
        if node_count > 400 {
            cfg.sim.alpha_decay = 0.05;
            cfg.sim.velocity_decay = 0.4;
            cfg.collide.iterations = 1;
        } else if node_count > 150 {
            cfg.sim.alpha_decay = 0.035;
            cfg.sim.velocity_decay = 0.5;
        }
        cfg
    }
}

/// Global scale-down applied to distances and repulsion as the active node
/// count grows, keeping the total bounding area roughly stable.
pub(crate) fn size_scale(node_count: usize) -> f32 {
    if node_count == 0 {
        return 1.;
    }
    (150. / node_count as f32).sqrt().clamp(0.3, 1.)
}
