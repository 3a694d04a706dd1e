//! In-memory element tree
//!
//! A snapshot of the parts of the DOM that positioning cares about. Nodes may
//! be stored in any order. Document order is a pre-order walk from the roots,
//! with siblings ordered by index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::selector::{ElementAdapter, SelectorList};
use super::ElementHost;
use crate::models::{ClientRect, Margins, Rect, ScrollOffsets};

/// Index of a node in an [`ElementTree`]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// One element of the snapshot
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub tag: String,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub classes: Vec<String>,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    #[serde(default)]
    pub parent: Option<NodeId>,

    /// Border-box client rect, margins excluded
    #[serde(default)]
    pub rect: ClientRect,

    #[serde(default)]
    pub margins: Margins,

    #[serde(default)]
    pub scroll: ScrollOffsets,

    #[serde(default)]
    pub offset_parent: Option<NodeId>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = ClientRect::from_rect(rect);
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_scroll(mut self, scroll_top: f64, scroll_left: f64) -> Self {
        self.scroll = ScrollOffsets::new(scroll_top, scroll_left);
        self
    }
}

/// Flat, document-ordered element tree
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ElementTree {
    nodes: Vec<Node>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append `node` as the last child of `parent` (or as a root)
    pub fn append(&mut self, parent: Option<NodeId>, mut node: Node) -> NodeId {
        node.parent = parent;
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn set_offset_parent(&mut self, id: NodeId, offset_parent: Option<NodeId>) {
        if let Some(node) = self.get_mut(id) {
            node.offset_parent = offset_parent;
        }
    }

    /// Children of every node, in index order
    fn children_index(&self) -> Vec<Vec<NodeId>> {
        let mut children = vec![Vec::new(); self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            let Some(parent) = node.parent else {
                continue;
            };
            if let Some(siblings) = children.get_mut(parent.0) {
                siblings.push(NodeId(index));
            }
        }
        children
    }

    /// Descendants of `id` in document order, `id` excluded
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let children = self.children_index();
        let mut visited = vec![false; self.nodes.len()];
        if let Some(seen) = visited.get_mut(id.0) {
            *seen = true;
        }

        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = children
            .get(id.0)
            .map(|direct| direct.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            match visited.get_mut(next.0) {
                Some(seen) if !*seen => *seen = true,
                _ => continue,
            }
            order.push(next);
            if let Some(direct) = children.get(next.0) {
                stack.extend(direct.iter().rev().copied());
            }
        }
        order
    }

    /// Walk from `id` up to the root, `id` included
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.get(id).map(|_| id);
        // Bounded so a malformed snapshot with a parent cycle cannot hang
        let mut remaining = self.nodes.len();
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            let id = current?;
            current = self.get(id).and_then(|node| node.parent);
            Some(id)
        })
    }
}

impl ElementHost for ElementTree {
    type Element = NodeId;

    fn query_selector(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        let selectors = SelectorList::parse(selector)?;

        self.descendants(*scope)
            .into_iter()
            .find(|id| selectors.matches(self, *id))
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.ancestors(*node).any(|id| id == *ancestor)
    }

    fn client_rect(&self, element: &NodeId) -> ClientRect {
        self.get(*element).map(|node| node.rect).unwrap_or_default()
    }

    fn margins(&self, element: &NodeId) -> Margins {
        self.get(*element).map(|node| node.margins).unwrap_or_default()
    }

    fn node_scroll(&self, element: &NodeId) -> ScrollOffsets {
        self.get(*element).map(|node| node.scroll).unwrap_or_default()
    }

    fn offset_parent(&self, element: &NodeId) -> Option<NodeId> {
        self.get(*element).and_then(|node| node.offset_parent)
    }
}

impl ElementAdapter for ElementTree {
    type Handle = NodeId;

    fn tag_name(&self, element: NodeId) -> &str {
        self.get(element).map(|node| node.tag.as_str()).unwrap_or("")
    }

    fn element_id(&self, element: NodeId) -> Option<&str> {
        self.get(element).and_then(|node| node.id.as_deref())
    }

    fn has_class(&self, element: NodeId, class: &str) -> bool {
        self.get(element)
            .is_some_and(|node| node.classes.iter().any(|c| c == class))
    }

    fn attr(&self, element: NodeId, name: &str) -> Option<&str> {
        self.get(element)
            .and_then(|node| node.attributes.get(name))
            .map(String::as_str)
    }

    fn element_ancestors(&self, element: NodeId) -> Vec<NodeId> {
        self.ancestors(element).skip(1).collect()
    }

    fn preceding_siblings(&self, element: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.get(element).map(|node| node.parent) else {
            return Vec::new();
        };
        (0..element.0)
            .rev()
            .map(NodeId)
            .filter(|id| self.get(*id).is_some_and(|node| node.parent == parent))
            .collect()
    }
}
