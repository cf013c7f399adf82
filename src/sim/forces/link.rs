use super::ForceCtx;
use crate::filter::ActiveSet;
use crate::graph::Graph;

const EPS: f32 = 1e-6;

/// Hooke's-law spring pulling each active edge toward its target separation.
///
/// Magnitude is proportional to the edge strength and the deviation from the
/// target distance supplied by the mode strategy. The larger endpoint moves
/// less, so anchors (genres, popular artists) stay put while leaves swing.
pub(crate) fn apply(ctx: &ForceCtx, g: &mut Graph, active: &ActiveSet) {
    for &edge_idx in active.edges() {
        let Some((s_idx, t_idx)) = g.edge_endpoints(edge_idx) else {
            continue;
        };
        let Some(edge) = g.edge(edge_idx) else {
            continue;
        };
        let kind = edge.kind();
        let base_strength = edge.strength();

        let (Some(source), Some(target)) = (g.node(s_idx), g.node(t_idx)) else {
            continue;
        };
        let target_dist =
            ctx.mode
                .link_distance(ctx.cfg, kind, source.kind(), target.kind(), ctx.scale);
        let strength = ctx.mode.link_strength(ctx.cfg, kind, base_strength);

        // Project one tick ahead so springs react to velocity already
        // accumulated this tick.
        let delta = (target.location() + target.velocity())
            - (source.location() + source.velocity());
        let dist = delta.length();
        if dist < EPS {
            // Coincident endpoints: no direction to pull along. The collide
            // pass separates such pairs.
            continue;
        }

        let displacement = delta * ((dist - target_dist) / dist * strength * ctx.alpha);
        let bias = source.radius() / (source.radius() + target.radius());

        if let Some(t) = g.node_mut(t_idx) {
            let dv = -displacement * bias;
            t.add_velocity(dv);
        }
        if let Some(s) = g.node_mut(s_idx) {
            let dv = displacement * (1. - bias);
            s.add_velocity(dv);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::elements::{Edge, Node, NodeKind, RelationKind};
    use crate::filter::ViewFilter;
    use crate::modes::LayoutMode;
    use egui::{Pos2, Rect, Vec2};

    fn ctx(cfg: &EngineConfig) -> ForceCtx<'_> {
        ForceCtx {
            cfg,
            mode: LayoutMode::Network,
            canvas: Rect::from_min_max(Pos2::ZERO, Pos2::new(1000., 1000.)),
            alpha: 1.,
            scale: 1.,
        }
    }

    #[test]
    fn stretched_link_pulls_endpoints_together() {
        let mut g = Graph::new();
        let a = g.add_node(Node::new("a", "A", NodeKind::Artist)).unwrap();
        let t = g.add_node(Node::new("t", "T", NodeKind::Track)).unwrap();
        g.add_edge_between(a, t, Edge::new(RelationKind::ArtistTrack));
        g.node_mut(a).unwrap().set_location(Pos2::new(0., 0.));
        g.node_mut(t).unwrap().set_location(Pos2::new(2000., 0.));

        let cfg = EngineConfig::default();
        let active = ActiveSet::project(&g, &ViewFilter::default());
        apply(&ctx(&cfg), &mut g, &active);

        // The left endpoint accelerates right, the right endpoint left.
        assert!(g.node(a).unwrap().velocity().x > 0.);
        assert!(g.node(t).unwrap().velocity().x < 0.);
    }

    #[test]
    fn coincident_endpoints_produce_no_nan() {
        let mut g = Graph::new();
        let a = g.add_node(Node::new("a", "A", NodeKind::Artist)).unwrap();
        let t = g.add_node(Node::new("t", "T", NodeKind::Track)).unwrap();
        g.add_edge_between(a, t, Edge::new(RelationKind::ArtistTrack));
        g.node_mut(a).unwrap().set_location(Pos2::new(5., 5.));
        g.node_mut(t).unwrap().set_location(Pos2::new(5., 5.));

        let cfg = EngineConfig::default();
        let active = ActiveSet::project(&g, &ViewFilter::default());
        apply(&ctx(&cfg), &mut g, &active);

        for (_, n) in g.nodes_iter() {
            assert!(n.velocity().x.is_finite() && n.velocity().y.is_finite());
            assert_eq!(n.velocity(), Vec2::ZERO);
        }
    }
}
