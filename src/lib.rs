// Public library interface for folio-rs
// This allows the debug CLI tool to use the core modules

pub mod gallery;
pub mod layout;
pub mod render;
pub mod ui;
