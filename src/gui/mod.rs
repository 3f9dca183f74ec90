pub mod frontend;
pub mod node_page;
pub mod relationship_page;
mod widgets;
