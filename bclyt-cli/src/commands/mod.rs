pub mod batch;
pub mod common;
pub mod export;
pub mod import;
pub mod info;
pub mod tree;
pub mod verify;
