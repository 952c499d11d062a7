//! Pure podman command-line construction.
//!
//! This crate maps a `(entity, operation, options)` triple onto a
//! [`CommandLine`]: the ordered token sequence of one podman invocation.
//! Every builder is a pure, total function: no I/O, no error conditions.
//! Malformed combinations are unrepresentable by construction: absent
//! options are `Option`s that render to nothing, and the id-file/name
//! mutual exclusivity is enforced by the builders themselves (supplying an
//! id-file suppresses the trailing name token).
//!
//! Token order is fixed per operation and must not change: podman treats
//! the image and command as positional (they are always the final tokens
//! of `run`), and the target name is the final token of `stop`, `start`
//! and `rm` unless an id-file selects the target instead. Omitting an
//! option never shifts the relative order of the remaining tokens.

#![warn(missing_docs)]

pub mod container;
pub mod image;
pub mod line;
pub mod network;
pub mod option;
pub mod pod;

pub use line::{CommandLine, PODMAN};
pub use option::{flag, inline_options, join, option, repeated};
