//! Converts a Trello board export into a kanban project tree.
//!
//! [`mapper::map`] is the entry point for hosts that already hold a parsed
//! [`model::trello::Board`]; the `trello2kanban` binary wraps it with file
//! handling and configuration.

pub mod cli;
pub mod config;
pub mod error;
pub mod mapper;
pub mod model;

pub use error::ImportError;
pub use mapper::{map, Import, MapOptions, Mapper};
