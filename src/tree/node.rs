use super::WidgetType;
use std::collections::HashSet;

/// Identity of a node within one top-level build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// A single element of a resolved layout tree
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTreeNode {
    pub id: NodeId,

    /// Fully qualified class name (e.g. "android.widget.TextView")
    pub class_name: String,

    /// Value of `android:id="@id/<name>"`, if recognized
    pub view_id: Option<String>,

    /// Whether the element declares an `onClick` handler
    pub clickable: bool,

    /// Ancestor chain, nearest first; filled in by the classifier
    pub ancestors: Option<Vec<String>>,

    /// Semantic category; filled in by the classifier
    pub widget_type: Option<WidgetType>,

    pub children: Vec<LayoutTreeNode>,
}

impl LayoutTreeNode {
    pub fn new(id: NodeId, class_name: impl Into<String>) -> Self {
        Self {
            id,
            class_name: class_name.into(),
            view_id: None,
            clickable: false,
            ancestors: None,
            widget_type: None,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: LayoutTreeNode) {
        self.children.push(child);
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Pre-order iterator over this subtree
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

/// Pre-order traversal that keeps document order among siblings
pub struct PreOrder<'a> {
    stack: Vec<&'a LayoutTreeNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a LayoutTreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Identities of every node produced by one build, nested includes included
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeRegistry {
    ids: HashSet<NodeId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    /// Union another registry into this one
    pub fn merge(&mut self, other: NodeRegistry) {
        self.ids.extend(other.ids);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<NodeId> for NodeRegistry {
    fn from_iter<T: IntoIterator<Item = NodeId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
