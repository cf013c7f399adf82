use egui::Vec2;

use super::ForceCtx;
use crate::elements::NodeKind;
use crate::filter::ActiveSet;
use crate::graph::Graph;

/// Pairwise repulsion with an inverse-square falloff, cut off beyond
/// `distance_max`.
///
/// Base strength scales with node category (genre repels hardest) and with
/// the node's popularity-driven radius, and is globally scaled down as the
/// active graph grows. Helpers repel only weakly so they bias positions
/// without visibly displacing real nodes.
pub(crate) fn apply(ctx: &ForceCtx, g: &mut Graph, active: &ActiveSet) {
    let indices = active.nodes();
    let params = &ctx.cfg.charge;
    let max_sq = params.distance_max * params.distance_max;

    // Snapshot positions and strengths once so the pair loop runs over
    // plain slices.
    let mut locations = Vec::with_capacity(indices.len());
    let mut strengths = Vec::with_capacity(indices.len());
    for &idx in indices {
        let Some(node) = g.node(idx) else {
            locations.push(egui::Pos2::ZERO);
            strengths.push(0.);
            continue;
        };
        locations.push(node.location());
        strengths.push(node_strength(ctx, node.kind(), node.radius()));
    }

    let mut disp = vec![Vec2::ZERO; indices.len()];
    for i in 0..indices.len() {
        for j in (i + 1)..indices.len() {
            let delta = locations[i] - locations[j];
            let dist_sq = delta.length_sq();
            if dist_sq > max_sq {
                continue;
            }
            let dist_sq = dist_sq.max(params.epsilon * params.epsilon);
            let dist = dist_sq.sqrt();
            let dir = delta / dist;
            disp[i] += dir * (strengths[j] * ctx.alpha / dist_sq);
            disp[j] -= dir * (strengths[i] * ctx.alpha / dist_sq);
        }
    }

    for (pos, &idx) in indices.iter().enumerate() {
        if let Some(node) = g.node_mut(idx) {
            node.add_velocity(disp[pos]);
        }
    }
}

fn node_strength(ctx: &ForceCtx, kind: NodeKind, radius: f32) -> f32 {
    let params = &ctx.cfg.charge;
    let base = match kind {
        NodeKind::Genre => params.genre_strength,
        NodeKind::Artist => params.artist_strength,
        NodeKind::Album => params.album_strength,
        NodeKind::Track => params.track_strength,
        NodeKind::Helper => return params.helper_strength * ctx.scale,
    };
    // radius / base_radius folds popularity back in: popular nodes repel
    // proportionally harder.
    base * (radius / kind.base_radius()) * ctx.scale
}
