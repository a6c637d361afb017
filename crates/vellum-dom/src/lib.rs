//! Output tree for the Vellum converter.
//!
//! This crate provides an arena-based XML element tree that the converter
//! builds the SVG document into, plus the passes that normalize it:
//! - [`postprocess::assign_namespace_prefixes`] turns namespace URIs into prefixes
//! - [`postprocess::remove_redundant_groups`] collapses attribute-less single-child groups
//! - [`serialize::to_xml`] writes the finished tree as text
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Names
//! are stored as a namespace URI plus local part; prefixes are only filled in
//! by the post-processor, so generation code never has to think about them.

pub mod postprocess;
pub mod serialize;

pub use postprocess::{assign_namespace_prefixes, remove_redundant_groups};
pub use serialize::to_xml;

/// The SVG namespace.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// The XLink namespace, used for `xlink:href`.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// [Namespaces in XML § 3](https://www.w3.org/TR/xml-names/#ns-decl)
///
/// "The prefix xml is by definition bound to the namespace name
/// <http://www.w3.org/XML/1998/namespace>. It MAY, but need not, be declared."
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A type-safe index into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// A namespace-qualified name.
///
/// [Namespaces in XML § 4](https://www.w3.org/TR/xml-names/#ns-qualnames)
///
/// `prefix` is `None` until [`assign_namespace_prefixes`] has run; after that
/// it is `None` only for names written unprefixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualName {
    /// Namespace URI, or `None` for names in no namespace.
    pub namespace: Option<String>,
    /// Local part of the name.
    pub local: String,
    /// Prefix chosen during namespace resolution.
    pub prefix: Option<String>,
}

impl QualName {
    /// A name in no namespace.
    #[must_use]
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
            prefix: None,
        }
    }

    /// A name in `namespace`, prefix not yet resolved.
    #[must_use]
    pub fn namespaced(namespace: &str, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            local: local.into(),
            prefix: None,
        }
    }

    /// The name as written in markup (`prefix:local` or `local`).
    #[must_use]
    pub fn qualified(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.local),
            None => self.local.clone(),
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: QualName,
    /// Attribute value, unescaped.
    pub value: String,
}

/// A namespace declaration carried by an element (`xmlns` / `xmlns:p`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// Declared prefix, or `None` for the default namespace.
    pub prefix: Option<String>,
    /// Namespace URI bound by the declaration.
    pub uri: String,
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// The element's name.
    pub name: QualName,
    /// Attributes in insertion order.
    pub attrs: Vec<Attribute>,
    /// Namespace declarations made on this element.
    pub namespaces: Vec<NamespaceDecl>,
}

impl ElementData {
    /// Create an element named `local` in `namespace`.
    #[must_use]
    pub fn new(namespace: &str, local: impl Into<String>) -> Self {
        Self {
            name: QualName::namespaced(namespace, local),
            attrs: Vec::new(),
            namespaces: Vec::new(),
        }
    }

    /// Create an element in the SVG namespace.
    #[must_use]
    pub fn svg(local: impl Into<String>) -> Self {
        Self::new(SVG_NAMESPACE, local)
    }

    /// Set an un-namespaced attribute, replacing any previous value.
    pub fn set_attr(&mut self, local: &str, value: impl Into<String>) {
        self.set_attr_qualified(QualName::local(local), value.into());
    }

    /// Set an attribute in `namespace`, replacing any previous value.
    pub fn set_attr_ns(&mut self, namespace: &str, local: &str, value: impl Into<String>) {
        self.set_attr_qualified(QualName::namespaced(namespace, local), value.into());
    }

    fn set_attr_qualified(&mut self, name: QualName, value: String) {
        let existing = self
            .attrs
            .iter_mut()
            .find(|a| a.name.namespace == name.namespace && a.name.local == name.local);
        match existing {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attribute { name, value }),
        }
    }

    /// Value of the un-namespaced attribute `local`.
    #[must_use]
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.namespace.is_none() && a.name.local == local)
            .map(|a| a.value.as_str())
    }

    /// Value of the attribute `local` in `namespace`.
    #[must_use]
    pub fn attr_ns(&self, namespace: &str, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.namespace.as_deref() == Some(namespace) && a.name.local == local)
            .map(|a| a.value.as_str())
    }

    /// Declare `prefix` (or the default namespace when `None`) on this element.
    pub fn declare_namespace(&mut self, prefix: Option<&str>, uri: &str) {
        self.namespaces.push(NamespaceDecl {
            prefix: prefix.map(str::to_string),
            uri: uri.to_string(),
        });
    }

    /// Whether this is an element with the given local name.
    #[must_use]
    pub fn is(&self, local: &str) -> bool {
        self.name.local == local
    }
}

/// The payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// The document node at [`NodeId::ROOT`].
    Document,
    /// An element.
    Element(ElementData),
    /// Character data.
    Text(String),
}

/// A node in the arena, with parent and child links.
#[derive(Debug, Clone)]
pub struct Node {
    /// What this node holds.
    pub node_type: NodeType,
    /// Parent node, `None` for the document node and for detached nodes.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// Arena-based element tree with O(1) node access.
///
/// All nodes live in a contiguous vector and refer to each other by index.
/// Nodes removed from the tree stay allocated but are detached (no parent).
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Get the document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of allocated nodes, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty (it always holds at least the document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new, detached node and return its ID.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, element: ElementData) -> NodeId {
        let id = self.alloc(NodeType::Element(element));
        self.append_child(parent, id);
        id
    }

    /// Allocate a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.alloc(NodeType::Text(text.into()));
        self.append_child(parent, id);
        id
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `child` into `parent` immediately before `reference`.
    ///
    /// Appends if `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let siblings = &mut self.nodes[parent.0].children;
        match siblings.iter().position(|&id| id == reference) {
            Some(index) => siblings.insert(index, child),
            None => siblings.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.insert(0, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Detach `child` from `parent`. Does nothing if it is not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let siblings = &mut self.nodes[parent.0].children;
        if let Some(index) = siblings.iter().position(|&id| id == child) {
            let _ = siblings.remove(index);
            self.nodes[child.0].parent = None;
        }
    }

    /// Put `new` in the position `old` occupies under `parent`, detaching `old`.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        let siblings = &mut self.nodes[parent.0].children;
        if let Some(slot) = siblings.iter_mut().find(|id| **id == old) {
            *slot = new;
            self.nodes[old.0].parent = None;
            self.nodes[new.0].parent = Some(parent);
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// The first element child of the document node (the `svg` root).
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// All attached elements with local name `local`, in document order.
    #[must_use]
    pub fn elements_named(&self, local: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            if self.as_element(id).is_some_and(|e| e.is(local)) {
                found.push(id);
            }
            stack.extend(self.children(id).iter().rev());
        }
        found
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        if let Some(s) = self.as_text(id) {
            text.push_str(s);
        }
        for &child in self.children(id) {
            text.push_str(&self.text_content(child));
        }
        text
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
