//! Layout tree model shared by the builder, classifier and serializer

mod node;
mod widget;

pub use node::{LayoutTreeNode, NodeId, NodeRegistry, PreOrder};
pub use widget::WidgetType;
