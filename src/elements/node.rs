use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// Category of a graph node.
///
/// `Helper` marks synthetic clustering anchors: they always participate in
/// physics but are never part of render output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Genre,
    Artist,
    Album,
    Track,
    Helper,
}

impl NodeKind {
    pub fn is_helper(self) -> bool {
        matches!(self, NodeKind::Helper)
    }

    /// Base display radius before popularity scaling.
    pub(crate) fn base_radius(self) -> f32 {
        match self {
            NodeKind::Genre => 22.,
            NodeKind::Artist => 14.,
            NodeKind::Album => 10.,
            NodeKind::Track => 7.,
            NodeKind::Helper => 1.,
        }
    }
}

/// Stores properties of a node. Position, velocity and the pin are owned by
/// the simulation; everything else is fixed at build time.
#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    label: String,
    kind: NodeKind,
    popularity: Option<u8>,
    radius: f32,

    location: Pos2,
    velocity: Vec2,
    /// Set only while the node is dragged; cleared on release.
    fixed: Option<Pos2>,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            popularity: None,
            radius: kind.base_radius(),
            location: Pos2::ZERO,
            velocity: Vec2::ZERO,
            fixed: None,
        }
    }

    pub fn with_popularity(mut self, popularity: u8) -> Self {
        let p = popularity.min(100);
        self.popularity = Some(p);
        // Popular nodes render (and collide) up to 1.5x their base size.
        self.radius = self.kind.base_radius() * (1. + f32::from(p) / 200.);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_helper(&self) -> bool {
        self.kind.is_helper()
    }

    pub fn popularity(&self) -> Option<u8> {
        self.popularity
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn location(&self) -> Pos2 {
        self.location
    }

    pub fn set_location(&mut self, loc: Pos2) {
        self.location = loc;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, vel: Vec2) {
        self.velocity = vel;
    }

    pub(crate) fn add_velocity(&mut self, dv: Vec2) {
        self.velocity += dv;
    }

    pub fn fixed(&self) -> Option<Pos2> {
        self.fixed
    }

    pub fn is_pinned(&self) -> bool {
        self.fixed.is_some()
    }

    pub(crate) fn set_fixed(&mut self, pos: Option<Pos2>) {
        self.fixed = pos;
    }
}
