use egui::Vec2;

use super::ForceCtx;
use crate::filter::ActiveSet;
use crate::graph::Graph;

const EPS: f32 = 1e-6;

/// Iterative circle-overlap resolution over the active set.
///
/// Runs `iterations` passes (configured lower for large graphs); each pass
/// separates overlapping pairs by nudging velocities in proportion to the
/// overlap, the smaller node yielding more. Helpers are excluded since they
/// have no meaningful display size.
pub(crate) fn apply(ctx: &ForceCtx, g: &mut Graph, active: &ActiveSet) {
    let params = &ctx.cfg.collide;

    let colliders: Vec<_> = active
        .nodes()
        .iter()
        .copied()
        .filter(|&idx| g.node(idx).is_some_and(|n| !n.is_helper()))
        .collect();

    for _ in 0..params.iterations {
        for i in 0..colliders.len() {
            for j in (i + 1)..colliders.len() {
                resolve_pair(ctx, g, colliders[i], colliders[j]);
            }
        }
    }
}

fn resolve_pair(
    ctx: &ForceCtx,
    g: &mut Graph,
    a: petgraph::stable_graph::NodeIndex,
    b: petgraph::stable_graph::NodeIndex,
) {
    let params = &ctx.cfg.collide;
    let (Some(na), Some(nb)) = (g.node(a), g.node(b)) else {
        return;
    };

    // Test against next-tick positions so earlier forces are respected.
    let pa = na.location() + na.velocity();
    let pb = nb.location() + nb.velocity();
    let min_dist = na.radius() + nb.radius() + params.padding;

    let delta = pa - pb;
    let dist = delta.length();
    if dist >= min_dist {
        return;
    }

    // Coincident centers have no separation axis: push the full overlap
    // along a fixed one instead of dividing by zero.
    let push = if dist < EPS {
        Vec2::new(min_dist * params.strength, 0.)
    } else {
        delta * ((min_dist - dist) / dist * params.strength)
    };
    // The larger node yields less.
    let bias = nb.radius() / (na.radius() + nb.radius());

    if let Some(node) = g.node_mut(a) {
        let dv = push * bias;
        node.add_velocity(dv);
    }
    if let Some(node) = g.node_mut(b) {
        let dv = -push * (1. - bias);
        node.add_velocity(dv);
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
            mode: LayoutMode::Network,
            canvas: Rect::from_min_max(Pos2::ZERO, Pos2::new(1000., 1000.)),
            alpha: 1.,
            scale: 1.,
        }
    }

    #[test]
    fn overlapping_nodes_are_pushed_apart() {
        let mut g = Graph::new();
        let a = g.add_node(Node::new("a", "A", NodeKind::Artist)).unwrap();
        let b = g.add_node(Node::new("b", "B", NodeKind::Artist)).unwrap();
        g.node_mut(a).unwrap().set_location(Pos2::new(0., 0.));
        g.node_mut(b).unwrap().set_location(Pos2::new(5., 0.));

        let cfg = EngineConfig::default();
        let active = ActiveSet::project(&g, &ViewFilter::default());
        apply(&ctx(&cfg), &mut g, &active);

        assert!(g.node(a).unwrap().velocity().x < 0.);
        assert!(g.node(b).unwrap().velocity().x > 0.);
    }

    #[test]
    fn coincident_nodes_separate_without_nan() {
        let mut g = Graph::new();
        let a = g.add_node(Node::new("a", "A", NodeKind::Artist)).unwrap();
        let b = g.add_node(Node::new("b", "B", NodeKind::Artist)).unwrap();
        g.node_mut(a).unwrap().set_location(Pos2::new(50., 50.));
        g.node_mut(b).unwrap().set_location(Pos2::new(50., 50.));

        let cfg = EngineConfig::default();
        let active = ActiveSet::project(&g, &ViewFilter::default());
        apply(&ctx(&cfg), &mut g, &active);

        let va = g.node(a).unwrap().velocity();
        let vb = g.node(b).unwrap().velocity();
        assert!(va.x.is_finite() && va.y.is_finite());
        assert!(vb.x.is_finite() && vb.y.is_finite());
        // The fully overlapped pair gets a maximal push along the fallback
        // axis, one node each way.
        assert!(va.x > 0., "first node pushed out");
        assert!(vb.x < 0., "second node pushed the other way");
    }

    #[test]
    fn separated_nodes_are_left_alone() {
        let mut g = Graph::new();
        let a = g.add_node(Node::new("a", "A", NodeKind::Artist)).unwrap();
        let b = g.add_node(Node::new("b", "B", NodeKind::Artist)).unwrap();
        g.node_mut(a).unwrap().set_location(Pos2::new(0., 0.));
        g.node_mut(b).unwrap().set_location(Pos2::new(500., 0.));

        let cfg = EngineConfig::default();
        let active = ActiveSet::project(&g, &ViewFilter::default());
        apply(&ctx(&cfg), &mut g, &active);

        assert_eq!(g.node(a).unwrap().velocity(), Vec2::ZERO);
        assert_eq!(g.node(b).unwrap().velocity(), Vec2::ZERO);
    }
}
