//! External I/O adapters (§6): configuration parsing, Pajek graph I/O,
//! attribute file I/O, and trace/graph writers. Everything in this crate
//! sits at the boundary named in §5 ("the only blocking operations are
//! file I/O at the boundary"); the sampler and estimator crates never call
//! into it directly.

pub mod attributes;
pub mod config;
pub mod pajek;
pub mod trace;

pub use config::Config;
pub use trace::TraceWriter;
