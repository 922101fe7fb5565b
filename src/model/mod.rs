pub mod filesystem;
pub mod folder;
