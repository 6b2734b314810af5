pub mod common;
pub mod completions;
pub mod delete;
pub mod edit;
pub mod health;
pub mod list;
pub mod local;
pub mod new;
pub mod show;
pub mod stats;
pub mod vote;
