//! Dining philosophers: diners on a ring share one fork with each neighbour
//! and must take both of theirs at once before eating.

pub mod config;
pub mod error;
pub mod log;
pub mod pace;
pub mod philosopher;
pub mod session;
pub mod sync;
pub mod table;
