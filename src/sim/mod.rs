pub(crate) mod forces;
mod simulation;

pub use simulation::{SimState, Simulation};
