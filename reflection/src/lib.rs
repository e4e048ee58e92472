//! Reflection model for the ChanneldUE replicator generator
//!
//! This crate describes the classes the generator consumes: actor and
//! component classes with their replicated properties, RPCs and owned
//! components, plus the module manifest that maps classes to the headers
//! declaring them. The data is produced by the engine-side exporter and is
//! read-only from the generator's point of view.

pub mod error;
pub mod module;
pub mod parse;
pub mod provider;
pub mod types;
pub mod utils;

pub use error::*;
pub use module::*;
pub use provider::*;
pub use types::*;
