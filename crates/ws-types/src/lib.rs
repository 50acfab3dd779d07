//! Core types for warm-start initial designs: configuration spaces,
//! configurations and the shared error taxonomy.

pub mod configuration;
pub mod errors;
pub mod space;

pub use configuration::*;
pub use errors::*;
pub use space::*;
