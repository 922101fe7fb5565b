//! View layer
//!
//! Tree nodes and the provider that lists them for the host.

pub mod file_tree;
