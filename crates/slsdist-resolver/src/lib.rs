//! Product dependency resolution: the pairwise merger, the resolution engine
//! that folds discovered recommendations into declared dependencies, and the
//! advisories it produces along the way.

pub mod advisory;
pub mod merge;
pub mod resolver;
