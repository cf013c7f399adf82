//! Headless force-directed layout engine for hierarchical music-taste
//! graphs (genres, artists, albums, tracks).
//!
//! The crate builds a [`graph::Graph`] from flat artist/album/track records
//! via [`build::GraphBuilder`], then hands it to an [`engine::Engine`] that
//! the host drives one [`engine::Engine::tick`] per frame. Each tick applies
//! the force pipeline over the active subgraph and returns a
//! [`snapshot::FrameSnapshot`] for rendering; interactions (drag, hover,
//! expand, filter and mode changes) go through explicit engine methods.
//!
//! ```
//! use tastegraph::build::{ArtistRecord, GraphBuilder};
//! use tastegraph::config::EngineConfig;
//! use tastegraph::engine::Engine;
//!
//! let graph = GraphBuilder::new()
//!     .with_artists(vec![ArtistRecord {
//!         id: "a1".into(),
//!         name: "Some Artist".into(),
//!         genres: vec!["ambient".into()],
//!         popularity: Some(40),
//!     }])
//!     .build()
//!     .unwrap();
//!
//! let mut engine = Engine::new(graph, EngineConfig::default());
//! while let Some(frame) = engine.tick() {
//!     if frame.settled {
//!         break;
//!     }
//! }
//! ```

pub mod build;
pub mod config;
pub mod elements;
pub mod engine;
pub mod error;
#[cfg(feature = "events")]
pub mod events;
pub mod filter;
pub mod graph;
pub mod modes;
pub mod sim;
pub mod snapshot;

pub use build::GraphBuilder;
pub use config::EngineConfig;
pub use elements::{Edge, Node, NodeKind, RelationKind};
pub use engine::Engine;
pub use error::BuildError;
pub use filter::{ActiveSet, ViewFilter};
pub use graph::Graph;
pub use modes::LayoutMode;
pub use sim::{SimState, Simulation};
pub use snapshot::{EdgeSnapshot, FrameSnapshot, NodeSnapshot};
