pub mod markup;

pub use markup::{icon, El, Markup};

const VOID_TAGS: [&str; 6] = ["meta", "link", "br", "img", "input", "hr"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    Raw(String),
}

#[derive(Clone, Debug)]
struct ElementData {
    tag: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

#[derive(Clone, Debug)]
pub struct Dom {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    // Ids minted by another document resolve to nothing here.
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    fn build(&mut self, markup: Markup) -> NodeId {
        match markup {
            Markup::Text(text) => self.push_node(NodeData::Text(text)),
            Markup::Raw(raw) => self.push_node(NodeData::Raw(raw)),
            Markup::Element(el) => {
                let id = self.push_node(NodeData::Element(ElementData {
                    tag: el.tag,
                    attrs: el.attrs,
                    classes: el.classes,
                }));
                for child in el.children {
                    let child_id = self.build(child);
                    self.nodes[child_id.0].parent = Some(id);
                    self.nodes[id.0].children.push(child_id);
                }
                id
            }
        }
    }

    /// Appending under an unknown parent leaves the new subtree detached.
    pub fn append(&mut self, parent: NodeId, markup: impl Into<Markup>) -> NodeId {
        let id = self.build(markup.into());
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
            self.nodes[id.0].parent = Some(parent);
        }
        id
    }

    /// Inserts `markup` as the next sibling of `sibling`. Returns `None` when
    /// `sibling` is detached.
    pub fn insert_after(&mut self, sibling: NodeId, markup: impl Into<Markup>) -> Option<NodeId> {
        let parent = self.node(sibling)?.parent?;
        let pos = self.node(parent)?.children.iter().position(|c| *c == sibling)?;
        let id = self.build(markup.into());
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(pos + 1, id);
        Some(id)
    }

    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).and_then(|n| n.parent.take()) {
            if let Some(node) = self.node_mut(parent) {
                node.children.retain(|c| *c != id);
            }
        }
    }

    pub fn clear_children(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.tag(*c).is_some())
            .collect()
    }

    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = id;
        loop {
            if cur == self.root {
                return true;
            }
            match self.parent(cur) {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    /// `true` when `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.attr(*n, "id") == Some(id))
    }

    pub fn first_by_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|n| self.has_class(*n, class))
    }

    pub fn all_by_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    pub fn all_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| self.tag(*n) == Some(tag))
            .collect()
    }

    pub fn class_within_id(&self, id: &str, class: &str) -> Option<NodeId> {
        let scope = self.element_by_id(id)?;
        self.first_by_class(scope, class)
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            match el.attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => el.attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id)
            .map(|el| el.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.classes.retain(|c| c != class);
        }
    }

    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            true
        }
    }

    pub fn text_content(&self, id: NodeId) -> String {
        std::iter::once(id)
            .chain(self.descendants(id))
            .filter_map(|n| match self.node(n).map(|n| &n.data) {
                Some(NodeData::Text(t)) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    pub fn document_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n");
        for child in self.children(self.root) {
            self.write_html(*child, &mut out);
        }
        out.push('\n');
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.data {
            NodeData::Document => {
                for child in self.children(id) {
                    self.write_html(*child, out);
                }
            }
            NodeData::Text(t) => out.push_str(&escape_text(t)),
            NodeData::Raw(r) => out.push_str(r),
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                if !el.classes.is_empty() {
                    out.push_str(" class=\"");
                    out.push_str(&escape_attr(&el.classes.join(" ")));
                    out.push('"');
                }
                for (k, v) in el.attrs.iter() {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(v));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&el.tag.as_str()) {
                    return;
                }
                for child in self.children(id) {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(value: &str) -> String {
    escape_text(value)
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
