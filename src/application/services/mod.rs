//! Application services - history and template expansion

pub mod filter;
pub mod history;

pub use filter::VariableFilter;
pub use history::MessageHistory;
