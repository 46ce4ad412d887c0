//! Core data types for slsdist.
//!
//! This crate defines the fundamental types behind a product distribution:
//! the version grammar, product ids and dependency records, the discovered
//! recommendation blob, project configuration and workspaces, the resolved
//! report, the product-dependency lockfile codec, and the deployment manifest.
//!
//! This crate is intentionally free of async code and network I/O.

pub mod config;
pub mod lockfile;
pub mod manifest;
pub mod product;
pub mod project;
pub mod recommended;
pub mod report;
pub mod version;
pub mod workspace;
