//! Descriptors: the identity and shape of the suite tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::node::{NoOpNode, Node};

/// Stable identity of a descriptor within one suite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptorId(String);

impl DescriptorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DescriptorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DescriptorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A node of the suite tree: identity, ordered children, and optional behavior.
pub struct Descriptor<C: Clone> {
    id: DescriptorId,
    display_name: String,
    children: Vec<Descriptor<C>>,
    node: Option<Box<dyn Node<C>>>,
}

impl<C: Clone> Descriptor<C> {
    pub fn new(id: impl Into<DescriptorId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            children: Vec::new(),
            node: None,
        }
    }

    pub fn with_node(mut self, node: impl Node<C> + 'static) -> Self {
        self.node = Some(Box::new(node));
        self
    }

    pub fn with_child(mut self, child: Descriptor<C>) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Descriptor<C>>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn id(&self) -> &DescriptorId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Statically declared children, in declaration order.
    pub fn children(&self) -> &[Descriptor<C>] {
        &self.children
    }

    /// Bound behavior, or [`NoOpNode`] when the descriptor carries none.
    pub fn node(&self) -> &dyn Node<C> {
        match &self.node {
            Some(node) => node.as_ref(),
            None => &NoOpNode,
        }
    }

    pub fn has_behavior(&self) -> bool {
        self.node.is_some()
    }

    /// Number of descriptors in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Descriptor::count).sum::<usize>()
    }
}

impl<C: Clone> fmt::Debug for Descriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("children", &self.children)
            .field("has_behavior", &self.node.is_some())
            .finish()
    }
}
