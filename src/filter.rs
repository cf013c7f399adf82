use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::elements::{NodeKind, RelationKind};
use crate::graph::Graph;

/// Per-category visibility and per-relation clustering toggles.
///
/// Everything is enabled by default; `with_*` setters mirror the builder
/// style of the rest of the crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilter {
    pub show_genres: bool,
    pub show_artists: bool,
    pub show_albums: bool,
    pub show_tracks: bool,

    pub cluster_artists: bool,
    pub cluster_albums: bool,
    pub cluster_tracks: bool,
    pub cluster_genres: bool,
}

impl Default for ViewFilter {
    fn default() -> Self {
        Self {
            show_genres: true,
            show_artists: true,
            show_albums: true,
            show_tracks: true,
            cluster_artists: true,
            cluster_albums: true,
            cluster_tracks: true,
            cluster_genres: true,
        }
    }
}

impl ViewFilter {
    pub fn with_genres(mut self, enabled: bool) -> Self {
        self.show_genres = enabled;
        self
    }

    pub fn with_artists(mut self, enabled: bool) -> Self {
        self.show_artists = enabled;
        self
    }

    pub fn with_albums(mut self, enabled: bool) -> Self {
        self.show_albums = enabled;
        self
    }

    pub fn with_tracks(mut self, enabled: bool) -> Self {
        self.show_tracks = enabled;
        self
    }

    pub fn with_artist_clustering(mut self, enabled: bool) -> Self {
        self.cluster_artists = enabled;
        self
    }

    pub fn with_album_clustering(mut self, enabled: bool) -> Self {
        self.cluster_albums = enabled;
        self
    }

    pub fn with_track_clustering(mut self, enabled: bool) -> Self {
        self.cluster_tracks = enabled;
        self
    }

    pub fn with_genre_clustering(mut self, enabled: bool) -> Self {
        self.cluster_genres = enabled;
        self
    }

    /// Helpers are always part of the active set: they keep influencing
    /// physics even while never rendered.
    pub fn shows(&self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::Genre => self.show_genres,
            NodeKind::Artist => self.show_artists,
            NodeKind::Album => self.show_albums,
            NodeKind::Track => self.show_tracks,
            NodeKind::Helper => true,
        }
    }

    /// Hierarchy-kind edges are governed only by endpoint visibility;
    /// cluster kinds additionally require their toggle.
    pub fn allows(&self, kind: RelationKind) -> bool {
        match kind {
            RelationKind::GenreArtist
            | RelationKind::ArtistAlbum
            | RelationKind::AlbumTrack
            | RelationKind::ArtistTrack => true,
            RelationKind::ClusterArtist => self.cluster_artists,
            RelationKind::ClusterAlbum => self.cluster_albums,
            RelationKind::ClusterTrack => self.cluster_tracks,
            RelationKind::GenreCluster => self.cluster_genres,
        }
    }
}

/// The active subgraph the integrator works over: a pure projection of the
/// full graph, recomputed (never mutated in place) on every toggle change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSet {
    nodes: Vec<NodeIndex>,
    edges: Vec<EdgeIndex>,
}

impl ActiveSet {
    pub fn project(g: &Graph, filter: &ViewFilter) -> Self {
        let nodes: Vec<NodeIndex> = g
            .nodes_iter()
            .filter(|(_, n)| filter.shows(n.kind()))
            .map(|(idx, _)| idx)
            .collect();

        let edges: Vec<EdgeIndex> = g
            .edges_iter()
            .filter(|(idx, e)| {
                if !filter.allows(e.kind()) {
                    return false;
                }
                let Some((s, t)) = g.edge_endpoints(*idx) else {
                    return false;
                };
                let active = |i: NodeIndex| {
                    g.node(i).is_some_and(|n| filter.shows(n.kind()))
                };
                active(s) && active(t)
            })
            .map(|(idx, _)| idx)
            .collect();

        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeIndex] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
