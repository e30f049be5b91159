//! Domain traits - Abstractions for infrastructure implementations

pub mod roster;
pub mod store;
pub mod transport;

pub use roster::Roster;
pub use store::VariableStore;
pub use transport::Transport;
