pub mod archive;
pub mod plan;
pub mod restore;
