use super::selector::{Selector, SelectorTarget};
use super::{Document, ElementId, ScrollBehavior};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Declarative description of an element and its subtree.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    top: f64,
    height: f64,
    children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Adds one or more space-separated classes
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Document-relative top edge and height, in px
    pub fn layout(mut self, top: f64, height: f64) -> Self {
        self.top = top;
        self.height = height;
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ElementSpec>) -> Self {
        self.children.extend(children);
        self
    }
}

/// A scroll requested through [`Document::scroll_to`]
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ScrollRequest {
    /// Requested position before clamping
    pub requested: f64,
    /// Position the viewport ended up at
    pub applied: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    top: f64,
    height: f64,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Debug, Default)]
struct PageState {
    nodes: Vec<Node>,
    roots: Vec<usize>,
    viewport_height: f64,
    scroll_y: f64,
    last_scroll_request: Option<ScrollRequest>,
}

impl PageState {
    fn node(&self, element: ElementId) -> Option<&Node> {
        self.nodes.get(element.0)
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(element.0)
    }

    fn document_height(&self) -> f64 {
        self.nodes
            .iter()
            .map(|n| n.top + n.height)
            .fold(self.viewport_height, f64::max)
    }

    fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport_height).max(0.0)
    }

    fn clamp_scroll(&self, y: f64) -> f64 {
        if y.is_nan() {
            return 0.0;
        }
        y.clamp(0.0, self.max_scroll())
    }

    fn insert(&mut self, parent: Option<usize>, spec: ElementSpec) -> usize {
        let index = self.nodes.len();
        let ElementSpec {
            tag,
            id,
            classes,
            attributes,
            text,
            top,
            height,
            children,
        } = spec;

        self.nodes.push(Node {
            tag,
            id,
            classes,
            attributes,
            styles: BTreeMap::new(),
            text,
            top,
            height,
            parent,
            children: Vec::new(),
        });

        match parent {
            Some(p) => self.nodes[p].children.push(index),
            None => self.roots.push(index),
        }

        for child in children {
            self.insert(Some(index), child);
        }
        index
    }

    /// Pre-order walk, i.e. document order.
    fn walk(&self, from: &[usize], out: &mut Vec<usize>) {
        for &index in from {
            out.push(index);
            self.walk(&self.nodes[index].children, out);
        }
    }
}

#[derive(Clone, Copy)]
struct NodeRef<'a> {
    state: &'a PageState,
    index: usize,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a Node {
        &self.state.nodes[self.index]
    }
}

impl SelectorTarget for NodeRef<'_> {
    fn tag(&self) -> &str {
        &self.node().tag
    }

    fn element_id(&self) -> Option<&str> {
        self.node().id.as_deref()
    }

    fn has_class(&self, class: &str) -> bool {
        self.node().classes.iter().any(|c| c == class)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.node().attributes.get(name).map(String::as_str)
    }

    fn parent(&self) -> Option<Self> {
        self.node().parent.map(|index| NodeRef {
            state: self.state,
            index,
        })
    }
}

/// In-memory document with a fixed layout and a scrollable viewport.
#[derive(Debug)]
pub struct Page {
    state: Mutex<PageState>,
}

impl Page {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            state: Mutex::new(PageState {
                viewport_height,
                ..Default::default()
            }),
        }
    }

    pub fn from_elements(viewport_height: f64, elements: impl IntoIterator<Item = ElementSpec>) -> Self {
        let page = Self::new(viewport_height);
        for spec in elements {
            page.append(None, spec);
        }
        page
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends an element (and its subtree) under `parent`, or at top level.
    pub fn append(&self, parent: Option<ElementId>, spec: ElementSpec) -> ElementId {
        let mut state = self.lock();
        let parent = parent.map(|p| p.0).filter(|p| *p < state.nodes.len());
        ElementId(state.insert(parent, spec))
    }

    /// Simulates the visitor scrolling; clamped to the scrollable range.
    pub fn set_scroll_y(&self, y: f64) -> f64 {
        let mut state = self.lock();
        state.scroll_y = state.clamp_scroll(y);
        state.scroll_y
    }

    pub fn set_viewport_height(&self, height: f64) {
        let mut state = self.lock();
        state.viewport_height = height.max(0.0);
        state.scroll_y = state.clamp_scroll(state.scroll_y);
    }

    pub fn document_height(&self) -> f64 {
        self.lock().document_height()
    }

    pub fn last_scroll_request(&self) -> Option<ScrollRequest> {
        self.lock().last_scroll_request
    }

    pub fn element_count(&self) -> usize {
        self.lock().nodes.len()
    }

    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.lock()
            .node(element)
            .map(|n| n.children.iter().map(|&i| ElementId(i)).collect())
            .unwrap_or_default()
    }

    pub fn classes(&self, element: ElementId) -> Vec<String> {
        self.lock()
            .node(element)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }
}

impl Document for Page {
    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        let state = self.lock();
        let mut order = Vec::with_capacity(state.nodes.len());
        state.walk(&state.roots, &mut order);
        order
            .into_iter()
            .find(|&i| state.nodes[i].id.as_deref() == Some(id))
            .map(ElementId)
    }

    fn select_all_within(&self, scope: Option<ElementId>, selector: &Selector) -> Vec<ElementId> {
        let state = self.lock();
        let mut order = Vec::with_capacity(state.nodes.len());
        match scope {
            // Only descendants of the scope, not the scope itself.
            Some(scope) => match state.node(scope) {
                Some(node) => state.walk(&node.children, &mut order),
                None => return Vec::new(),
            },
            None => state.walk(&state.roots, &mut order),
        }

        order
            .into_iter()
            .filter(|&index| {
                selector.matches(NodeRef {
                    state: &state,
                    index,
                })
            })
            .map(ElementId)
            .collect()
    }

    fn matches(&self, element: ElementId, selector: &Selector) -> bool {
        let state = self.lock();
        state.node(element).is_some()
            && selector.matches(NodeRef {
                state: &state,
                index: element.0,
            })
    }

    fn text(&self, element: ElementId) -> String {
        self.lock()
            .node(element)
            .map(|n| n.text.clone())
            .unwrap_or_default()
    }

    fn set_text(&self, element: ElementId, text: &str) {
        if let Some(node) = self.lock().node_mut(element) {
            node.text = text.to_string();
        }
    }

    fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.lock()
            .node(element)
            .and_then(|n| n.styles.get(property).cloned())
    }

    fn set_style(&self, element: ElementId, property: &str, value: &str) {
        if let Some(node) = self.lock().node_mut(element) {
            node.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn remove_style(&self, element: ElementId, property: &str) {
        if let Some(node) = self.lock().node_mut(element) {
            node.styles.remove(property);
        }
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.lock()
            .node(element)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.lock()
            .node(element)
            .map(|n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn add_class(&self, element: ElementId, class: &str) {
        if let Some(node) = self.lock().node_mut(element) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&self, element: ElementId, class: &str) {
        if let Some(node) = self.lock().node_mut(element) {
            node.classes.retain(|c| c != class);
        }
    }

    fn toggle_class(&self, element: ElementId, class: &str) -> bool {
        let mut state = self.lock();
        let Some(node) = state.node_mut(element) else {
            return false;
        };
        if node.classes.iter().any(|c| c == class) {
            node.classes.retain(|c| c != class);
            false
        } else {
            node.classes.push(class.to_string());
            true
        }
    }

    fn offset_height(&self, element: ElementId) -> f64 {
        self.lock().node(element).map(|n| n.height).unwrap_or(0.0)
    }

    fn offset_top(&self, element: ElementId) -> f64 {
        self.lock().node(element).map(|n| n.top).unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.lock().viewport_height
    }

    fn scroll_y(&self) -> f64 {
        self.lock().scroll_y
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let mut state = self.lock();
        let applied = state.clamp_scroll(top);
        state.scroll_y = applied;
        state.last_scroll_request = Some(ScrollRequest {
            requested: top,
            applied,
            behavior,
        });
    }
}
