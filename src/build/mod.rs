pub mod clustering;

use std::collections::{HashMap, HashSet};

use egui::Pos2;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::elements::{Edge, Node, NodeKind, RelationKind};
use crate::error::BuildError;
use crate::graph::Graph;

/// Nodes without a location yet are scattered inside this square so the
/// simulation never starts from a degenerate all-at-origin state.
const SPAWN_SIZE: f32 = 250.;

/// Raw artist entity as produced by the upstream catalog transformation.
/// Genre nodes are implied by artist metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub id: String,
    pub name: String,
    pub artist_id: String,
    pub popularity: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: String,
    pub name: String,
    pub artist_id: String,
    pub album_id: Option<String>,
    pub popularity: Option<u8>,
}

/// Turns entity lists and their natural relations into a validated
/// [`Graph`], including synthetic helper nodes that act as soft
/// center-of-mass anchors for groups.
///
/// Relations referencing unknown ids are dropped with a warning; duplicate
/// node ids are fatal. Genre node ids are the genre names themselves.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    artists: Vec<ArtistRecord>,
    albums: Vec<AlbumRecord>,
    tracks: Vec<TrackRecord>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artists(mut self, artists: Vec<ArtistRecord>) -> Self {
        self.artists = artists;
        self
    }

    pub fn with_albums(mut self, albums: Vec<AlbumRecord>) -> Self {
        self.albums = albums;
        self
    }

    pub fn with_tracks(mut self, tracks: Vec<TrackRecord>) -> Self {
        self.tracks = tracks;
        self
    }

    pub fn build(self) -> Result<Graph, BuildError> {
        if self.artists.is_empty() {
            return Err(BuildError::EmptyInput);
        }

        let mut g = Graph::new();

        // Genres in first-appearance order; the order is load-bearing for
        // ring slots and for the clustering pass.
        let mut genre_members: HashMap<String, HashSet<String>> = HashMap::new();
        let mut genre_ids: Vec<String> = Vec::new();
        for artist in &self.artists {
            for genre in &artist.genres {
                if !genre_members.contains_key(genre) {
                    genre_ids.push(genre.clone());
                    g.add_node(Node::new(genre.clone(), genre.clone(), NodeKind::Genre))?;
                }
                genre_members
                    .entry(genre.clone())
                    .or_default()
                    .insert(artist.id.clone());
            }
        }

        for artist in &self.artists {
            let mut node = Node::new(artist.id.clone(), artist.name.clone(), NodeKind::Artist);
            if let Some(p) = artist.popularity {
                node = node.with_popularity(p);
            }
            g.add_node(node)?;
            for genre in &artist.genres {
                g.try_add_edge(genre, &artist.id, Edge::new(RelationKind::GenreArtist));
            }
        }

        for album in &self.albums {
            let mut node = Node::new(album.id.clone(), album.name.clone(), NodeKind::Album);
            if let Some(p) = album.popularity {
                node = node.with_popularity(p);
            }
            g.add_node(node)?;
            g.try_add_edge(&album.artist_id, &album.id, Edge::new(RelationKind::ArtistAlbum));
        }

        for track in &self.tracks {
            let mut node = Node::new(track.id.clone(), track.name.clone(), NodeKind::Track);
            if let Some(p) = track.popularity {
                node = node.with_popularity(p);
            }
            g.add_node(node)?;
            if let Some(album_id) = &track.album_id {
                g.try_add_edge(album_id, &track.id, Edge::new(RelationKind::AlbumTrack));
            }
            // Every track keeps a direct artist edge so album-less tracks
            // stay connected.
            g.try_add_edge(&track.artist_id, &track.id, Edge::new(RelationKind::ArtistTrack));
        }

        self.add_genre_helpers(&mut g, &genre_ids, &genre_members)?;
        self.add_artist_helpers(&mut g)?;
        add_cluster_helpers(&mut g, &genre_ids, &genre_members)?;
        self.assign_anchors(&mut g);
        scatter_unplaced(&mut g);

        debug!(
            "built graph: {} nodes, {} edges, {} genres",
            g.node_count(),
            g.edge_count(),
            g.genre_order().len()
        );

        Ok(g)
    }

    /// One helper per genre with at least two member artists; members get a
    /// moderate-strength edge to the shared anchor.
    fn add_genre_helpers(
        &self,
        g: &mut Graph,
        genre_ids: &[String],
        genre_members: &HashMap<String, HashSet<String>>,
    ) -> Result<(), BuildError> {
        for genre in genre_ids {
            let members = &genre_members[genre];
            if members.len() < 2 {
                continue;
            }
            let helper_id = format!("cluster:genre:{genre}");
            let helper = g.add_node(Node::new(helper_id.clone(), String::new(), NodeKind::Helper))?;
            // Deterministic edge order: follow artist input order, not set order.
            for artist in &self.artists {
                if members.contains(&artist.id) {
                    if let Some(member) = g.node_index(&artist.id) {
                        g.add_edge_between(member, helper, Edge::new(RelationKind::ClusterArtist));
                    }
                }
            }
        }
        Ok(())
    }

    /// One helper per artist grouping its albums and its album-less tracks.
    fn add_artist_helpers(&self, g: &mut Graph) -> Result<(), BuildError> {
        for artist in &self.artists {
            let albums: Vec<&AlbumRecord> = self
                .albums
                .iter()
                .filter(|a| a.artist_id == artist.id)
                .collect();
            let loose_tracks: Vec<&TrackRecord> = self
                .tracks
                .iter()
                .filter(|t| t.artist_id == artist.id && t.album_id.is_none())
                .collect();
            if albums.len() + loose_tracks.len() < 2 {
                continue;
            }

            let helper_id = format!("cluster:artist:{}", artist.id);
            let helper = g.add_node(Node::new(helper_id, String::new(), NodeKind::Helper))?;
            for album in albums {
                if let Some(member) = g.node_index(&album.id) {
                    g.add_edge_between(member, helper, Edge::new(RelationKind::ClusterAlbum));
                }
            }
            for track in loose_tracks {
                if let Some(member) = g.node_index(&track.id) {
                    g.add_edge_between(member, helper, Edge::new(RelationKind::ClusterTrack));
                }
            }
        }
        Ok(())
    }

    /// Precompute the nearest typed ancestor per node: artist for a track or
    /// album, genre for an artist. Replaces per-tick linear scans.
    fn assign_anchors(&self, g: &mut Graph) {
        for artist in &self.artists {
            let Some(node) = g.node_index(&artist.id) else {
                continue;
            };
            if let Some(genre) = artist.genres.first().and_then(|name| g.node_index(name)) {
                g.set_anchor(node, genre);
            }
        }
        for album in &self.albums {
            let (Some(node), Some(artist)) =
                (g.node_index(&album.id), g.node_index(&album.artist_id))
            else {
                continue;
            };
            g.set_anchor(node, artist);
        }
        for track in &self.tracks {
            let (Some(node), Some(artist)) =
                (g.node_index(&track.id), g.node_index(&track.artist_id))
            else {
                continue;
            };
            g.set_anchor(node, artist);
        }
    }
}

/// Similarity clustering over genres: clusters of size > 1 get a helper node
/// and weak genre→helper edges biasing related genres toward each other.
fn add_cluster_helpers(
    g: &mut Graph,
    genre_ids: &[String],
    genre_members: &HashMap<String, HashSet<String>>,
) -> Result<(), BuildError> {
    let members: Vec<(String, HashSet<String>)> = genre_ids
        .iter()
        .map(|id| (id.clone(), genre_members[id].clone()))
        .collect();

    for (i, cluster) in clustering::cluster_genres(&members).iter().enumerate() {
        if cluster.len() < 2 {
            continue;
        }
        let helper_id = format!("cluster:genres:{i}");
        let helper = g.add_node(Node::new(helper_id, String::new(), NodeKind::Helper))?;
        for &pos in cluster {
            if let Some(genre) = g.node_index(&members[pos].0) {
                g.add_edge_between(genre, helper, Edge::new(RelationKind::GenreCluster));
            }
        }
    }
    Ok(())
}

/// Randomly places nodes that are still at the origin. Does not override
/// existing locations.
fn scatter_unplaced(g: &mut Graph) {
    let mut rng = rand::rng();
    let indices: Vec<_> = g.nodes_iter().map(|(idx, _)| idx).collect();
    for idx in indices {
        if let Some(node) = g.node_mut(idx) {
            if node.location() == Pos2::ZERO {
                node.set_location(Pos2::new(
                    rng.random_range(0. ..SPAWN_SIZE),
                    rng.random_range(0. ..SPAWN_SIZE),
                ));
            }
        }
    }
}
