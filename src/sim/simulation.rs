use egui::{Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::forces::{self, ForceCtx};
use crate::config::{size_scale, EngineConfig};
use crate::filter::ActiveSet;
use crate::graph::Graph;
use crate::modes::LayoutMode;

/// Observable integrator state.
///
/// The simulation is logically Active while `alpha` exceeds the configured
/// `alpha_min` and Settled otherwise. Alpha relaxes toward `alpha_target`
/// each tick; interactions raise the target to restart visible motion and
/// must drop it back to zero so the system cools naturally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub alpha: f32,
    pub alpha_target: f32,
    pub step_count: u64,
    /// Average per-node displacement from the last step (graph units).
    pub last_avg_displacement: Option<f32>,
    /// Last measured time to compute one step (milliseconds).
    pub last_step_time_ms: f32,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            alpha: 1.,
            alpha_target: 0.,
            step_count: 0,
            last_avg_displacement: None,
            last_step_time_ms: 0.,
        }
    }
}

/// The tick loop: applies every force once in the fixed order
/// link → charge → collide → center/radial → anchor, then integrates
/// positions, damps velocities and decays alpha.
#[derive(Debug, Default)]
pub struct Simulation {
    state: SimState,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: SimState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn alpha(&self) -> f32 {
        self.state.alpha
    }

    pub fn is_settled(&self, cfg: &EngineConfig) -> bool {
        self.state.alpha < cfg.sim.alpha_min
    }

    /// Raises alpha back to at least `alpha`, restarting settling.
    pub fn reheat(&mut self, alpha: f32) {
        self.state.alpha = self.state.alpha.max(alpha);
    }

    /// Sets the value alpha relaxes toward. Non-zero targets keep the
    /// simulation warm indefinitely; callers must reset to 0 when the
    /// interaction ends.
    pub fn set_alpha_target(&mut self, target: f32) {
        self.state.alpha_target = target.max(0.);
    }

    pub fn alpha_target(&self) -> f32 {
        self.state.alpha_target
    }

    /// Advances the simulation one tick over the active subgraph. Returns
    /// `false` without touching any node when the system is settled or the
    /// active set is empty.
    pub fn step(
        &mut self,
        g: &mut Graph,
        active: &ActiveSet,
        cfg: &EngineConfig,
        mode: LayoutMode,
        canvas: Rect,
    ) -> bool {
        if active.is_empty() || (self.is_settled(cfg) && self.state.alpha_target < cfg.sim.alpha_min)
        {
            return false;
        }

        let started = instant::Instant::now();
        let ctx = ForceCtx {
            cfg,
            mode,
            canvas,
            alpha: self.state.alpha,
            scale: size_scale(active.nodes().len()),
        };

        forces::link::apply(&ctx, g, active);
        forces::charge::apply(&ctx, g, active);
        forces::collide::apply(&ctx, g, active);
        forces::center::apply(&ctx, g, active);
        if mode.uses_anchor() {
            forces::anchor::apply(&ctx, g, active);
        }

        let mut moved = 0.;
        for &idx in active.nodes() {
            let Some(node) = g.node_mut(idx) else {
                continue;
            };
            // Pinned nodes are held at the pin; force contributions are
            // discarded.
            if let Some(pin) = node.fixed() {
                node.set_location(pin);
                node.set_velocity(Vec2::ZERO);
                continue;
            }

            let vel = node.velocity();
            let next = node.location() + vel;
            if next.x.is_finite() && next.y.is_finite() {
                moved += vel.length();
                node.set_location(next);
                node.set_velocity(vel * cfg.sim.velocity_decay);
            } else {
                // A degenerate force produced a non-finite step; drop it so
                // NaN never reaches a position.
                node.set_velocity(Vec2::ZERO);
            }
        }

        self.state.alpha += (self.state.alpha_target - self.state.alpha) * cfg.sim.alpha_decay;
        self.state.step_count += 1;
        self.state.last_avg_displacement = Some(moved / active.nodes().len() as f32);
        self.state.last_step_time_ms = started.elapsed().as_secs_f32() * 1000.;

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Edge, Node, NodeKind, RelationKind};
    use crate::filter::ViewFilter;
    use egui::Pos2;

    fn canvas() -> Rect {
        Rect::from_min_max(Pos2::ZERO, Pos2::new(1000., 1000.))
    }

    fn two_node_graph() -> Graph {
        let mut g = Graph::new();
        let a = g.add_node(Node::new("a", "A", NodeKind::Artist)).unwrap();
        let t = g.add_node(Node::new("t", "T", NodeKind::Track)).unwrap();
        g.add_edge_between(a, t, Edge::new(RelationKind::ArtistTrack));
        g.node_mut(a).unwrap().set_location(Pos2::new(400., 500.));
        g.node_mut(t).unwrap().set_location(Pos2::new(600., 500.));
        g
    }

    #[test]
    fn simulation_cools_to_settled() {
        let mut g = two_node_graph();
        let cfg = EngineConfig::default();
        let active = ActiveSet::project(&g, &ViewFilter::default());
        let mut sim = Simulation::new();

        let mut steps = 0u64;
        while sim.step(&mut g, &active, &cfg, LayoutMode::Network, canvas()) {
            steps += 1;
            assert!(steps < 10_000, "must settle in bounded time");
        }
        assert!(sim.is_settled(&cfg));
        assert_eq!(steps, sim.state().step_count);
    }

    #[test]
    fn nonzero_alpha_target_keeps_the_simulation_warm() {
        let mut g = two_node_graph();
        let cfg = EngineConfig::default();
        let active = ActiveSet::project(&g, &ViewFilter::default());
        let mut sim = Simulation::new();
        sim.set_alpha_target(0.3);

        for _ in 0..2_000 {
            assert!(sim.step(&mut g, &active, &cfg, LayoutMode::Network, canvas()));
        }
        assert!(sim.alpha() > 0.29, "alpha converges to the target");

        sim.set_alpha_target(0.);
        let mut steps = 0;
        while sim.step(&mut g, &active, &cfg, LayoutMode::Network, canvas()) {
            steps += 1;
            assert!(steps < 10_000);
        }
        assert!(sim.is_settled(&cfg));
    }

    #[test]
    fn pinned_node_is_held_and_unpinning_restores_motion() {
        let mut g = two_node_graph();
        let cfg = EngineConfig::default();
        let active = ActiveSet::project(&g, &ViewFilter::default());
        let mut sim = Simulation::new();

        let a = g.node_index("a").unwrap();
        let pin = Pos2::new(100., 100.);
        g.node_mut(a).unwrap().set_fixed(Some(pin));

        sim.step(&mut g, &active, &cfg, LayoutMode::Network, canvas());
        assert_eq!(g.node(a).unwrap().location(), pin);
        assert_eq!(g.node(a).unwrap().velocity(), Vec2::ZERO);

        g.node_mut(a).unwrap().set_fixed(None);
        sim.reheat(1.);
        sim.step(&mut g, &active, &cfg, LayoutMode::Network, canvas());
        assert_ne!(g.node(a).unwrap().location(), pin, "free again after unpin");
    }

    #[test]
    fn zero_distance_pair_survives_a_tick_with_finite_positions() {
        let mut g = Graph::new();
        let a = g.add_node(Node::new("a", "A", NodeKind::Artist)).unwrap();
        let b = g.add_node(Node::new("b", "B", NodeKind::Artist)).unwrap();
        g.add_edge_between(a, b, Edge::new(RelationKind::GenreArtist));
        g.node_mut(a).unwrap().set_location(Pos2::new(500., 500.));
        g.node_mut(b).unwrap().set_location(Pos2::new(500., 500.));

        let cfg = EngineConfig::default();
        let active = ActiveSet::project(&g, &ViewFilter::default());
        let mut sim = Simulation::new();
        sim.step(&mut g, &active, &cfg, LayoutMode::Network, canvas());

        for (_, n) in g.nodes_iter() {
            assert!(n.location().x.is_finite() && n.location().y.is_finite());
            assert!(n.velocity().x.is_finite() && n.velocity().y.is_finite());
        }
    }

    #[test]
    fn empty_active_set_never_steps() {
        let mut g = two_node_graph();
        let cfg = EngineConfig::default();
        let mut sim = Simulation::new();
        assert!(!sim.step(
            &mut g,
            &ActiveSet::default(),
            &cfg,
            LayoutMode::Network,
            canvas()
        ));
        assert_eq!(sim.state().step_count, 0);
    }
}
