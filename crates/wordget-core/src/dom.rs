//! Minimal document model the page agent builds from the live page.
//!
//! Shadow roots are attached to their host but are not among its children, so
//! `text_content` keeps DOM semantics while `composed_text` renders the shadow
//! tree in front of the host's light children.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element { tag: String },
    Text(String),
    ShadowRoot { host: NodeId },
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    shadow_root: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

/// Live selection as seen by the page agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub common_ancestor: NodeId,
}

impl SelectionRange {
    pub fn new(common_ancestor: NodeId) -> Self {
        Self { common_ancestor }
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
                shadow_root: None,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.push(
            parent,
            NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
            },
        )
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(parent, NodeKind::Text(text.to_string()))
    }

    /// Attach (or return the existing) shadow root of `host`
    pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
        if let Some(existing) = self.node(host).and_then(|n| n.shadow_root) {
            return existing;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind: NodeKind::ShadowRoot { host },
            parent: None,
            children: Vec::new(),
            shadow_root: None,
        });
        if let Some(node) = self.nodes.get_mut(host.0) {
            node.shadow_root = Some(id);
        }
        id
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    /// Lowercase tag name, `None` for non-element nodes
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { tag } => Some(tag),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Nearest element above `id`, stepping out of a shadow root onto its host
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            match self.kind(current)? {
                NodeKind::ShadowRoot { host } => return Some(*host),
                _ => {
                    let parent = self.parent(current)?;
                    match self.kind(parent)? {
                        NodeKind::Element { .. } => return Some(parent),
                        NodeKind::ShadowRoot { host } => return Some(*host),
                        NodeKind::Document => return None,
                        NodeKind::Text(_) => current = parent,
                    }
                }
            }
        }
    }

    /// `id` itself when it is an element, otherwise its parent element
    pub fn element_or_parent(&self, id: NodeId) -> Option<NodeId> {
        match self.kind(id)? {
            NodeKind::Element { .. } => Some(id),
            _ => self.parent_element(id),
        }
    }

    /// DOM `textContent`: light-tree text only
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, false, &mut out);
        out
    }

    /// Text as rendered, including the content of attached shadow roots
    pub fn composed_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, true, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, composed: bool, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };

        if let NodeKind::Text(text) = &node.kind {
            out.push_str(text);
            return;
        }

        if composed && let Some(shadow) = node.shadow_root {
            self.collect_text(shadow, composed, out);
        }

        for child in &node.children {
            self.collect_text(*child, composed, out);
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            shadow_root: None,
        });
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.push(id);
        }
        id
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_skips_shadow_tree() {
        let mut doc = Document::new();
        let body = doc.append_element(doc.root(), "BODY");
        let host = doc.append_element(body, "x-card");
        doc.append_text(host, "light");
        let shadow = doc.attach_shadow(host);
        doc.append_text(shadow, "shadow ");

        assert_eq!(doc.tag(body), Some("body"));
        assert_eq!(doc.text_content(body), "light");
        assert_eq!(doc.composed_text(body), "shadow light");
    }

    #[test]
    fn parent_element_crosses_shadow_boundary() {
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p");
        let host = doc.append_element(p, "x-term");
        let shadow = doc.attach_shadow(host);
        let text = doc.append_text(shadow, "word");
        let span = doc.append_element(shadow, "span");

        assert_eq!(doc.parent_element(text), Some(host));
        assert_eq!(doc.parent_element(span), Some(host));
        assert_eq!(doc.parent_element(host), Some(p));
        assert_eq!(doc.parent_element(p), None);
        assert_eq!(doc.attach_shadow(host), shadow);
    }
}
