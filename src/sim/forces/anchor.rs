use egui::Vec2;

use super::ForceCtx;
use crate::filter::ActiveSet;
use crate::graph::Graph;

const EPS: f32 = 1e-6;

/// Hierarchical mode only: nudges each node toward a fixed offset distance
/// from its nearest typed ancestor's *current* position (artist for a track
/// or album, genre for an artist).
///
/// Scaled by alpha, so the pull weakens as the system settles. The result is
/// nested circular clusters rather than a rigid tree.
pub(crate) fn apply(ctx: &ForceCtx, g: &mut Graph, active: &ActiveSet) {
    let params = &ctx.cfg.anchor;
    let strength = params.strength * ctx.alpha;

    for &idx in active.nodes() {
        let Some(ancestor_idx) = g.anchor(idx) else {
            continue;
        };
        let Some(ancestor) = g.node(ancestor_idx) else {
            continue;
        };
        let ancestor_pos = ancestor.location();

        let Some(node) = g.node(idx) else {
            continue;
        };
        let mut delta = node.location() - ancestor_pos;
        let mut dist = delta.length();
        if dist < EPS {
            // Sitting on the ancestor: push out along a fixed axis.
            delta = Vec2::new(1., 0.);
            dist = 1.;
        }
        let target = ancestor_pos + (delta / dist) * params.offset;
        let dv = (target - node.location()) * strength;

        if let Some(node) = g.node_mut(idx) {
            node.add_velocity(dv);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::elements::{Node, NodeKind};
    use crate::filter::ViewFilter;
    use crate::modes::LayoutMode;
    use egui::{Pos2, Rect};

    fn ctx(cfg: &EngineConfig) -> ForceCtx<'_> {
        ForceCtx {
            cfg,
            mode: LayoutMode::Hierarchical,
            canvas: Rect::from_min_max(Pos2::ZERO, Pos2::new(1000., 1000.)),
            alpha: 1.,
            scale: 1.,
        }
    }

    #[test]
    fn distant_child_is_pulled_toward_its_ancestor_ring() {
        let mut g = Graph::new();
        let artist = g.add_node(Node::new("a", "A", NodeKind::Artist)).unwrap();
        let track = g.add_node(Node::new("t", "T", NodeKind::Track)).unwrap();
        g.set_anchor(track, artist);
        g.node_mut(artist).unwrap().set_location(Pos2::new(0., 0.));
        g.node_mut(track).unwrap().set_location(Pos2::new(500., 0.));

        let cfg = EngineConfig::default();
        let active = ActiveSet::project(&g, &ViewFilter::default());
        apply(&ctx(&cfg), &mut g, &active);

        // Offset target sits much closer to the artist, so the track
        // accelerates back toward it.
        assert!(g.node(track).unwrap().velocity().x < 0.);
        // The ancestor itself is not touched.
        assert_eq!(g.node(artist).unwrap().velocity(), Vec2::ZERO);
    }

    #[test]
    fn node_on_top_of_ancestor_is_pushed_out_not_nan() {
        let mut g = Graph::new();
        let artist = g.add_node(Node::new("a", "A", NodeKind::Artist)).unwrap();
        let track = g.add_node(Node::new("t", "T", NodeKind::Track)).unwrap();
        g.set_anchor(track, artist);
        g.node_mut(artist).unwrap().set_location(Pos2::new(100., 100.));
        g.node_mut(track).unwrap().set_location(Pos2::new(100., 100.));

        let cfg = EngineConfig::default();
        let active = ActiveSet::project(&g, &ViewFilter::default());
        apply(&ctx(&cfg), &mut g, &active);

        let v = g.node(track).unwrap().velocity();
        assert!(v.x.is_finite() && v.y.is_finite());
        assert!(v.x > 0., "pushed out along the fallback axis");
    }
}
