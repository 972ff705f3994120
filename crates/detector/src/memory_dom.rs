use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use consentlens_core_types::ElementId;

use crate::model::{Annotation, MutationBatch};
use crate::ports::{ComputedStyle, DomPort};
use crate::selectors::Selector;

/// Declarative element description, loadable from JSON. Used to seed the
/// in-memory tree and to replay recorded mutations offline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub style: StyleSpec,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl Default for NodeSpec {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: None,
            style: StyleSpec::default(),
            children: Vec::new(),
        }
    }
}

fn default_tag() -> String {
    "div".to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSpec {
    #[serde(default = "default_display")]
    pub display: String,
    #[serde(default = "default_visibility")]
    pub visibility: String,
    #[serde(default = "default_opacity")]
    pub opacity: String,
}

impl Default for StyleSpec {
    fn default() -> Self {
        Self {
            display: default_display(),
            visibility: default_visibility(),
            opacity: default_opacity(),
        }
    }
}

fn default_display() -> String {
    "block".to_string()
}

fn default_visibility() -> String {
    "visible".to_string()
}

fn default_opacity() -> String {
    "1".to_string()
}

struct Node {
    tag: String,
    id_attr: Option<String>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    style: ComputedStyle,
    parent: Option<u64>,
    children: Vec<u64>,
    detached: bool,
}

/// In-memory fake document implementing `DomPort`. Element handles are
/// indexes into an append-only node table; removal detaches a subtree
/// but never reuses a handle.
pub struct MemoryDom {
    url: String,
    nodes: RwLock<Vec<Node>>,
    annotations: RwLock<HashMap<ElementId, Annotation>>,
    mutation_txs: RwLock<Vec<mpsc::UnboundedSender<MutationBatch>>>,
    closed: AtomicBool,
}

impl MemoryDom {
    /// Empty document: a body element and nothing else.
    pub fn new(url: impl Into<String>) -> Self {
        let body = Node {
            tag: "body".into(),
            id_attr: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: None,
            style: ComputedStyle::default(),
            parent: None,
            children: Vec::new(),
            detached: false,
        };
        Self {
            url: url.into(),
            nodes: RwLock::new(vec![body]),
            annotations: RwLock::new(HashMap::new()),
            mutation_txs: RwLock::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Document seeded with `spec` as the body's content. No mutation
    /// batch is published for the seed; it models the initial page.
    pub fn from_spec(url: impl Into<String>, spec: &NodeSpec) -> Self {
        let dom = Self::new(url);
        {
            let mut nodes = dom.nodes.write();
            attach_subtree(&mut nodes, 0, spec);
        }
        dom
    }

    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    /// Inserts a subtree under `parent` and publishes one mutation batch
    /// covering every new element. Returns `None` when the parent handle
    /// is unknown or inside a detached subtree; nothing is attached and
    /// no batch is published.
    pub fn insert(&self, parent: ElementId, spec: NodeSpec) -> Option<ElementId> {
        let (new_root, inserted) = {
            let mut nodes = self.nodes.write();
            let parent_live = nodes
                .get(parent.0 as usize)
                .map(|node| !node.detached)
                .unwrap_or(false);
            if !parent_live {
                return None;
            }
            let before = nodes.len();
            let new_root = attach_subtree(&mut nodes, parent.0, &spec);
            let inserted = (before..nodes.len()).map(|i| ElementId(i as u64)).collect();
            (new_root, inserted)
        };
        self.publish(MutationBatch {
            inserted,
            removed: Vec::new(),
        });
        Some(ElementId(new_root))
    }

    /// Detaches a subtree and publishes the removal batch.
    pub fn remove(&self, el: ElementId) {
        let removed = {
            let mut nodes = self.nodes.write();
            let mut removed = Vec::new();
            let mut stack = vec![el.0];
            while let Some(index) = stack.pop() {
                if let Some(node) = nodes.get_mut(index as usize) {
                    if node.detached {
                        continue;
                    }
                    node.detached = true;
                    stack.extend(node.children.iter().copied());
                    removed.push(ElementId(index));
                }
            }
            removed
        };
        if !removed.is_empty() {
            self.publish(MutationBatch {
                inserted: Vec::new(),
                removed,
            });
        }
    }

    /// Replaces an element's resolved style. Style changes are not
    /// mutations in the observed sense, so no batch is published.
    pub fn set_style(&self, el: ElementId, style: StyleSpec) {
        if let Some(node) = self.nodes.write().get_mut(el.0 as usize) {
            node.style = ComputedStyle {
                display: style.display,
                visibility: style.visibility,
                opacity: style.opacity,
            };
        }
    }

    /// Closes the mutation feed; running watchers drain and stop, and
    /// later subscriptions come back already closed.
    pub fn close(&self) {
        let mut txs = self.mutation_txs.write();
        self.closed.store(true, Ordering::SeqCst);
        txs.clear();
    }

    pub fn annotation(&self, el: ElementId) -> Option<Annotation> {
        self.annotations.read().get(&el).cloned()
    }

    fn publish(&self, batch: MutationBatch) {
        self.mutation_txs
            .write()
            .retain(|tx| tx.send(batch.clone()).is_ok());
    }

    fn live<'a>(&self, nodes: &'a [Node], el: ElementId) -> Option<&'a Node> {
        nodes
            .get(el.0 as usize)
            .filter(|node| !node.detached)
    }

    fn collect_text(&self, nodes: &[Node], index: u64, out: &mut Vec<String>) {
        if let Some(node) = self.live(nodes, ElementId(index)) {
            if let Some(text) = &node.text {
                out.push(text.clone());
            }
            for child in &node.children {
                self.collect_text(nodes, *child, out);
            }
        }
    }
}

fn attach_subtree(nodes: &mut Vec<Node>, parent: u64, spec: &NodeSpec) -> u64 {
    let index = nodes.len() as u64;
    nodes.push(Node {
        tag: spec.tag.to_lowercase(),
        id_attr: spec.id.clone(),
        classes: spec.classes.clone(),
        attrs: spec.attrs.clone(),
        text: spec.text.clone(),
        style: ComputedStyle {
            display: spec.style.display.clone(),
            visibility: spec.style.visibility.clone(),
            opacity: spec.style.opacity.clone(),
        },
        parent: Some(parent),
        children: Vec::new(),
        detached: false,
    });
    nodes[parent as usize].children.push(index);
    for child in &spec.children {
        attach_subtree(nodes, index, child);
    }
    index
}

impl DomPort for MemoryDom {
    fn page_url(&self) -> String {
        self.url.clone()
    }

    fn query(&self, selector: &Selector) -> Vec<ElementId> {
        let nodes = self.nodes.read();
        (0..nodes.len() as u64)
            .filter_map(|index| {
                let el = ElementId(index);
                let node = self.live(&nodes, el)?;
                let matched = match selector {
                    Selector::ClassContains(word) => node
                        .classes
                        .iter()
                        .any(|class| class.to_lowercase().contains(word)),
                    Selector::IdContains(word) => node
                        .id_attr
                        .as_deref()
                        .map(|id| id.to_lowercase().contains(word))
                        .unwrap_or(false),
                    Selector::AnchorHrefContains(word) => {
                        node.tag == "a"
                            && node
                                .attrs
                                .get("href")
                                .map(|href| href.to_lowercase().contains(word))
                                .unwrap_or(false)
                    }
                };
                matched.then_some(el)
            })
            .collect()
    }

    fn tag_name(&self, el: ElementId) -> Option<String> {
        let nodes = self.nodes.read();
        self.live(&nodes, el).map(|node| node.tag.clone())
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        let nodes = self.nodes.read();
        self.live(&nodes, el)?.parent.map(ElementId)
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        let nodes = self.nodes.read();
        let node = self.live(&nodes, el)?;
        if name == "id" {
            return node.id_attr.clone();
        }
        node.attrs.get(name).cloned()
    }

    fn classes(&self, el: ElementId) -> Vec<String> {
        let nodes = self.nodes.read();
        self.live(&nodes, el)
            .map(|node| node.classes.clone())
            .unwrap_or_default()
    }

    fn inner_text(&self, el: ElementId) -> Option<String> {
        let nodes = self.nodes.read();
        self.live(&nodes, el)?;
        let mut parts = Vec::new();
        self.collect_text(&nodes, el.0, &mut parts);
        Some(parts.join(" "))
    }

    fn computed_style(&self, el: ElementId) -> Option<ComputedStyle> {
        let nodes = self.nodes.read();
        self.live(&nodes, el).map(|node| node.style.clone())
    }

    fn descendants(&self, el: ElementId, tags: &[&str]) -> Vec<ElementId> {
        let nodes = self.nodes.read();
        let mut found = Vec::new();
        let mut stack: Vec<u64> = match self.live(&nodes, el) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return found,
        };
        while let Some(index) = stack.pop() {
            if let Some(node) = self.live(&nodes, ElementId(index)) {
                if tags.contains(&node.tag.as_str()) {
                    found.push(ElementId(index));
                }
                stack.extend(node.children.iter().rev().copied());
            }
        }
        found
    }

    fn annotate(&self, el: ElementId, annotation: &Annotation) {
        self.annotations.write().insert(el, annotation.clone());
    }

    fn subscribe_mutations(&self) -> mpsc::UnboundedReceiver<MutationBatch> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut txs = self.mutation_txs.write();
        if !self.closed.load(Ordering::SeqCst) {
            txs.push(tx);
        }
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_spec_deserializes_with_defaults() {
        let spec: NodeSpec = serde_json::from_str(
            r#"{
                "classes": ["cookie-banner"],
                "children": [{ "tag": "button", "text": "Accept" }]
            }"#,
        )
        .unwrap();
        assert_eq!(spec.tag, "div");
        assert_eq!(spec.style, StyleSpec::default());
        assert_eq!(spec.children[0].tag, "button");
    }

    #[test]
    fn query_skips_detached_subtrees() {
        let dom = MemoryDom::new("https://example.com");
        let banner = dom.insert(
            dom.root(),
            NodeSpec {
                classes: vec!["cookie".into()],
                ..NodeSpec::default()
            },
        )
        .unwrap();
        assert_eq!(dom.query(&Selector::ClassContains("cookie")).len(), 1);
        dom.remove(banner);
        assert!(dom.query(&Selector::ClassContains("cookie")).is_empty());
    }

    #[test]
    fn inner_text_joins_descendants_in_order() {
        let dom = MemoryDom::from_spec(
            "https://example.com",
            &NodeSpec {
                text: Some("We use cookies.".into()),
                children: vec![
                    NodeSpec {
                        tag: "button".into(),
                        text: Some("Accept".into()),
                        ..NodeSpec::default()
                    },
                    NodeSpec {
                        tag: "button".into(),
                        text: Some("Decline".into()),
                        ..NodeSpec::default()
                    },
                ],
                ..NodeSpec::default()
            },
        );
        let banner = dom.root();
        assert_eq!(
            dom.inner_text(banner).unwrap(),
            "We use cookies. Accept Decline"
        );
    }

    #[tokio::test]
    async fn insert_publishes_one_batch_per_subtree() {
        let dom = MemoryDom::new("https://example.com");
        let mut rx = dom.subscribe_mutations();
        dom.insert(
            dom.root(),
            NodeSpec {
                children: vec![NodeSpec::default(), NodeSpec::default()],
                ..NodeSpec::default()
            },
        )
        .unwrap();
        let batch = rx.recv().await.unwrap();
        assert_eq!(batch.inserted.len(), 3);
        assert!(batch.removed.is_empty());
    }

    #[tokio::test]
    async fn insert_rejects_unknown_and_detached_parents() {
        let dom = MemoryDom::new("https://example.com");
        let mut rx = dom.subscribe_mutations();

        assert_eq!(dom.insert(ElementId(999), NodeSpec::default()), None);

        let branch = dom.insert(dom.root(), NodeSpec::default()).unwrap();
        dom.remove(branch);
        let orphan = NodeSpec {
            classes: vec!["cookie".into()],
            ..NodeSpec::default()
        };
        assert_eq!(dom.insert(branch, orphan), None);

        // The rejected child never became queryable, and only the
        // accepted insert and the removal produced batches.
        assert!(dom.query(&Selector::ClassContains("cookie")).is_empty());
        let inserted = rx.recv().await.unwrap();
        assert_eq!(inserted.inserted.len(), 1);
        let removed = rx.recv().await.unwrap();
        assert_eq!(removed.removed, vec![branch]);
        assert!(rx.try_recv().is_err());
    }
}
