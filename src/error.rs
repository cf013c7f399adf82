use thiserror::Error;

/// Fatal problems detected while building a graph.
///
/// Malformed relations are not represented here: an edge referencing an
/// unknown entity id is dropped with a warning so partial graphs still build.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("duplicate node id `{0}`")]
    DuplicateId(String),

    #[error("no artists supplied, nothing to build")]
    EmptyInput,
}
