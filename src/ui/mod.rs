pub mod config_dialog;
pub mod input;
pub mod modal;
pub mod navigation;
pub mod overlay;
pub mod scheduler;
