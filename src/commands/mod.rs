pub mod control;
pub mod list;
pub mod show;
