use super::ForceCtx;
use crate::elements::NodeKind;
use crate::filter::ActiveSet;
use crate::graph::Graph;
use crate::modes::LayoutMode;

/// Centering / radial force.
///
/// Network mode: a single attractor pulls every active node toward the canvas
/// center with modest strength. Hierarchical mode: genres are pulled onto
/// their fixed ring slot while a very weak global centering keeps the rest of
/// the graph from drifting.
pub(crate) fn apply(ctx: &ForceCtx, g: &mut Graph, active: &ActiveSet) {
    let center = ctx.canvas.center();
    let centering = ctx.mode.center_strength(ctx.cfg) * ctx.alpha;

    for &idx in active.nodes() {
        let Some(node) = g.node(idx) else {
            continue;
        };
        let dv = (center - node.location()) * centering;
        if let Some(node) = g.node_mut(idx) {
            node.add_velocity(dv);
        }
    }

    if ctx.mode != LayoutMode::Hierarchical {
        return;
    }

    // Radial slots: evenly spaced per genre, stable across ticks because the
    // genre order is fixed at build time.
    let slots: Vec<_> = g.genre_order().to_vec();
    let count = slots.len();
    let strength = ctx.cfg.center.genre_ring_strength * ctx.alpha;
    for (i, idx) in slots.into_iter().enumerate() {
        let Some(slot) = ctx.mode.genre_slot(ctx.cfg, i, count, ctx.canvas) else {
            continue;
        };
        let Some(node) = g.node_mut(idx) else {
            continue;
        };
        debug_assert_eq!(node.kind(), NodeKind::Genre);
        let dv = (slot - node.location()) * strength;
        node.add_velocity(dv);
    }
}
