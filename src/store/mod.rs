//! Session stores shared between the forms and the result displays.

pub mod nodes;
pub mod relationships;

pub use nodes::{AggregateSnapshot, NodeAction, NodeSession, NodeSessionStore};
pub use relationships::RelationshipStore;

/// State of one request channel. A channel only reaches `Ready` or `Failed`
/// after passing through `Loading`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Channel<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Channel<T> {
    pub fn is_loading(&self) -> bool { matches!(self, Channel::Loading) }

    pub fn error(&self) -> Option<&str> {
        match self {
            Channel::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Channel::Ready(v) => Some(v),
            _ => None,
        }
    }
}
