//! Message handling - parsing, plugin dispatch and help routing

pub mod dispatcher;
pub mod help;
pub mod parser;

pub use dispatcher::Dispatch;
pub use parser::MessageParser;
