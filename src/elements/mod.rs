mod edge;
mod node;

pub use edge::{Edge, RelationKind};
pub use node::{Node, NodeKind};
