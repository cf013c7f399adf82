use std::collections::HashSet;

/// Similarity threshold for two genres to share a cluster.
pub const SIMILARITY_THRESHOLD: f32 = 0.3;

/// Jaccard coefficient over two member sets: |A ∩ B| / |A ∪ B|.
///
/// Two empty sets have no evidence of similarity and score 0.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        return 0.;
    }
    intersection as f32 / union as f32
}

/// Single-link one-pass grouping over genres in the given order.
///
/// Each unassigned genre seeds a new cluster; every later unassigned genre
/// whose similarity to the seed reaches [`SIMILARITY_THRESHOLD`] joins it.
/// The partition is order-dependent and not transitively closed: a genre
/// similar to a member but not to the seed stays out. That behavior is kept
/// on purpose; clusters stay stable for a fixed input order and tests rely
/// on it.
///
/// Returns clusters as positions into the input slice; every input position
/// appears in exactly one cluster.
pub fn cluster_genres(members: &[(String, HashSet<String>)]) -> Vec<Vec<usize>> {
    let mut assigned = vec![false; members.len()];
    let mut clusters = Vec::new();

    for seed in 0..members.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut cluster = vec![seed];

        for other in (seed + 1)..members.len() {
            if assigned[other] {
                continue;
            }
            if jaccard(&members[seed].1, &members[other].1) >= SIMILARITY_THRESHOLD {
                assigned[other] = true;
                cluster.push(other);
            }
        }
        clusters.push(cluster);
    }

    clusters
}
