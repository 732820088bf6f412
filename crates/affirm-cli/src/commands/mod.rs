pub mod add;
pub mod common;
pub mod completions;
pub mod config;
pub mod delete;
pub mod edit;
pub mod export;
pub mod list;
pub mod settings;
pub mod show;
pub mod toggle;
pub mod widget;
