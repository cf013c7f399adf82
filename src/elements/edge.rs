use serde::{Deserialize, Serialize};

/// Kind of relation an edge encodes.
///
/// The first four kinds form the hierarchy (genre → artist → album → track)
/// and are the only ones followed by hover traversal. The cluster kinds attach
/// real nodes to synthetic helper anchors and can be toggled per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    GenreArtist,
    ArtistAlbum,
    AlbumTrack,
    ArtistTrack,
    ClusterArtist,
    ClusterAlbum,
    ClusterTrack,
    GenreCluster,
}

impl RelationKind {
    pub fn is_hierarchical(self) -> bool {
        matches!(
            self,
            RelationKind::GenreArtist
                | RelationKind::ArtistAlbum
                | RelationKind::AlbumTrack
                | RelationKind::ArtistTrack
        )
    }

    pub fn is_clustering(self) -> bool {
        !self.is_hierarchical()
    }

    /// Fixed base strength per kind. Album→track is stronger than
    /// artist→track, reflecting confidence in the relation.
    pub fn base_strength(self) -> f32 {
        match self {
            RelationKind::GenreArtist => 0.7,
            RelationKind::ArtistAlbum => 0.9,
            RelationKind::AlbumTrack => 0.95,
            RelationKind::ArtistTrack => 0.6,
            RelationKind::ClusterArtist | RelationKind::ClusterAlbum | RelationKind::ClusterTrack => {
                0.5
            }
            RelationKind::GenreCluster => 0.55,
        }
    }
}

/// Stores properties of an edge. Endpoints live in the graph structure itself.
#[derive(Debug, Clone)]
pub struct Edge {
    kind: RelationKind,
    strength: f32,
}

impl Edge {
    pub fn new(kind: RelationKind) -> Self {
        Self {
            kind,
            strength: kind.base_strength(),
        }
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength.clamp(0., 1.);
        self
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }
}
