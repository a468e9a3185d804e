//! Minimal document tree with insertion observers.
//!
//! Nodes live in a `Vec` and are addressed by [`NodeId`]; parent/child links
//! are stored on each node. Observers registered with [`Document::observe`]
//! are told about every subtree attached anywhere under `<body>`, for as long
//! as the document lives.

use thiserror::Error;
use tracing::warn;

/// Index of a node within its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Node storage and structural queries.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Tag name of an element node.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    /// Set an attribute on an element, replacing any previous value. No-op on text nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: String) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id.0].data {
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value,
                None => attrs.push((name.to_string(), value)),
            }
        }
    }

    /// Concatenated text of all text nodes under `id`.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.subtree(id) {
            if let NodeData::Text(t) = &self.nodes[node.0].data {
                out.push_str(t);
            }
        }
        out
    }

    /// `root` and all its descendants, in document order.
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev());
        }
        out
    }

    /// Elements with the given tag within `root`'s subtree, `root` included.
    pub fn elements_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.subtree(root)
            .into_iter()
            .filter(|&id| self.tag(id).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
            .collect()
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(node) = cur {
            if node == ancestor {
                return true;
            }
            cur = self.nodes[node.0].parent;
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("cannot append node {child:?} under {parent:?}: it would become its own ancestor")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}

/// Callback for subtrees attached under `<body>`.
pub trait InsertionObserver: Send {
    fn subtree_inserted(&self, tree: &mut Tree, root: NodeId);
}

/// A document: `<html>` root with a `<body>`, plus the observers watching it.
pub struct Document {
    tree: Tree,
    root: NodeId,
    body: NodeId,
    observers: Vec<Box<dyn InsertionObserver>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut tree = Tree::default();
        let root = tree.push(NodeData::Element {
            tag: "html".into(),
            attrs: Vec::new(),
        });
        let body = tree.push(NodeData::Element {
            tag: "body".into(),
            attrs: Vec::new(),
        });
        tree.nodes[body.0].parent = Some(root);
        tree.nodes[root.0].children.push(body);
        Self {
            tree,
            root,
            body,
            observers: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        self.tree.push(NodeData::Element {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.tree.push(NodeData::Text(text.to_string()))
    }

    /// Attach `child` (and its subtree) as the last child of `parent`.
    ///
    /// A child that already has a parent is moved. Observers fire when the
    /// new position is under `<body>`. Appending a node under itself or one of
    /// its descendants is rejected and leaves the tree unchanged.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        if self.tree.is_inclusive_ancestor(child, parent) {
            warn!(?parent, ?child, "rejected append that would create a cycle");
            return Err(DocumentError::HierarchyRequest { parent, child });
        }
        self.attach(parent, child);
        Ok(())
    }

    /// Link `child` under `parent` and notify observers. Callers rule out cycles.
    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.tree.nodes[child.0].parent {
            self.tree.nodes[old.0].children.retain(|&c| c != child);
        }
        self.tree.nodes[child.0].parent = Some(parent);
        self.tree.nodes[parent.0].children.push(child);

        if self.tree.is_inclusive_ancestor(self.body, parent) {
            for observer in &self.observers {
                observer.subtree_inserted(&mut self.tree, child);
            }
        }
    }

    /// Create an element and attach it under `parent` in one step.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.create_element(tag, attrs);
        self.attach(parent, id);
        id
    }

    /// Create a text node and attach it under `parent` in one step.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.create_text(text);
        self.attach(parent, id);
        id
    }

    /// Register an observer for the rest of the document's life.
    pub fn observe(&mut self, observer: Box<dyn InsertionObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
