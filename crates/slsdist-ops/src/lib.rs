pub mod ops_discover;
pub mod ops_lock;
pub mod ops_manifest;
pub mod ops_resolve;
