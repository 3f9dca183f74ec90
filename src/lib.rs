pub mod api;
pub mod display;
pub mod forms;
pub mod graph_utils;
pub mod gui;
pub mod persistence;
pub mod store;
