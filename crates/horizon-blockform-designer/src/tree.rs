//! The designer's mock component tree.
//!
//! A [`MockTree`] is the editor-side model of one screen: a single-rooted,
//! acyclic tree of mock nodes, each with a typed [`PropertyStore`]. Nodes
//! move through a small state machine:
//!
//! ```text
//! Unattached --attach--> Attached --detach--> Unattached
//!      |                    |
//!      +------destroy-------+------> Destroyed
//! ```
//!
//! Every containment change is checked against the [`AcceptanceTable`]
//! before anything is mutated, so a rejected drop leaves the tree and every
//! store exactly as they were. Successful mutations are announced on
//! [`MockTree::changed`] so a presentation layer can re-render.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_blockform_core::{BlockformConfig, ComponentCatalog, ComponentType};
//! use horizon_blockform_designer::{AcceptanceTable, DragSource, MockTree};
//!
//! let mut tree = MockTree::new(
//!     Arc::new(ComponentCatalog::standard()),
//!     Arc::new(AcceptanceTable::standard()),
//!     &BlockformConfig::default(),
//! ).unwrap();
//!
//! let menu = tree.drop_source(tree.root(), DragSource::Palette(ComponentType::MENU), None).unwrap();
//! let item = tree.drop_source(menu, DragSource::Palette(ComponentType::MENU_ITEM), None).unwrap();
//!
//! assert_eq!(tree.children(menu).unwrap(), &[item]);
//! assert_eq!(tree.name(item), Some("MenuItem1"));
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use horizon_blockform_core::logging::{span_names, targets};
use horizon_blockform_core::{
    BlockformConfig, ComponentCatalog, ComponentId, ComponentShape, ComponentType, PerfSpan,
    PropertyStore, PropertyValue, Signal, ThreadAffinity,
};

use crate::acceptance::AcceptanceTable;
use crate::drag::DragSource;
use crate::error::{TreeError, TreeResult};

/// Lifecycle state of a mock node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// Created but not in the tree.
    Unattached,
    /// Child of `parent`. The root reports itself as attached to nothing.
    Attached {
        /// The containing node, `None` for the root.
        parent: Option<ComponentId>,
    },
    /// Removed for good; the identity and its store are gone.
    Destroyed,
}

/// A change announced by [`MockTree::changed`].
#[derive(Clone, Debug, PartialEq)]
pub enum TreeChange {
    /// `node` was inserted into `parent` at `index`.
    Attached {
        node: ComponentId,
        parent: ComponentId,
        index: usize,
    },
    /// `node` was removed from `parent`, where it sat at `index`.
    Detached {
        node: ComponentId,
        parent: ComponentId,
        index: usize,
    },
    /// `node` was destroyed.
    Destroyed { node: ComponentId },
    /// A menu was opened or closed.
    DisplayToggled { menu: ComponentId, open: bool },
    /// A property of `node` took a new effective value.
    PropertyChanged {
        node: ComponentId,
        name: &'static str,
        value: PropertyValue,
    },
}

#[derive(Debug)]
enum NodeBody {
    Leaf,
    Container { children: Vec<ComponentId> },
    Menu { children: Vec<ComponentId>, open: bool },
}

impl NodeBody {
    fn for_shape(shape: ComponentShape) -> Self {
        match shape {
            ComponentShape::Leaf => Self::Leaf,
            ComponentShape::Container => Self::Container {
                children: Vec::new(),
            },
            ComponentShape::Menu => Self::Menu {
                children: Vec::new(),
                open: false,
            },
        }
    }

    fn children(&self) -> &[ComponentId] {
        match self {
            Self::Leaf => &[],
            Self::Container { children } | Self::Menu { children, .. } => children,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<ComponentId>> {
        match self {
            Self::Leaf => None,
            Self::Container { children } | Self::Menu { children, .. } => Some(children),
        }
    }
}

#[derive(Debug)]
struct MockNode {
    ty: ComponentType,
    name: String,
    parent: Option<ComponentId>,
    body: NodeBody,
    properties: PropertyStore,
}

/// Editor-side model of one screen.
pub struct MockTree {
    catalog: Arc<ComponentCatalog>,
    acceptance: Arc<AcceptanceTable>,
    nodes: HashMap<ComponentId, MockNode>,
    /// Ids of destroyed nodes, kept so `node_state` can report them. Grows
    /// with every destroy until `forget_destroyed` is called.
    destroyed: HashSet<ComponentId>,
    name_counters: HashMap<ComponentType, u32>,
    root: ComponentId,
    changed: Signal<TreeChange>,
    affinity: ThreadAffinity,
}

impl MockTree {
    /// Create a tree whose root is a `Form` named `Screen1`.
    pub fn new(
        catalog: Arc<ComponentCatalog>,
        acceptance: Arc<AcceptanceTable>,
        config: &BlockformConfig,
    ) -> TreeResult<Self> {
        Self::with_root(catalog, acceptance, ComponentType::FORM, "Screen1", config)
    }

    /// Create a tree with a root of the given container type.
    pub fn with_root(
        catalog: Arc<ComponentCatalog>,
        acceptance: Arc<AcceptanceTable>,
        root_type: ComponentType,
        root_name: &str,
        config: &BlockformConfig,
    ) -> TreeResult<Self> {
        let descriptor = catalog.get(root_type).ok_or(TreeError::UnknownType(root_type))?;
        let root = ComponentId::next();
        if !descriptor.is_container() {
            return Err(TreeError::NotAContainer(root));
        }

        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            MockNode {
                ty: root_type,
                name: root_name.to_string(),
                parent: None,
                body: NodeBody::for_shape(descriptor.shape),
                properties: PropertyStore::new(descriptor),
            },
        );
        tracing::debug!(target: targets::TREE, %root, root_type = %root_type, "created mock tree");

        Ok(Self {
            catalog,
            acceptance,
            nodes,
            destroyed: HashSet::new(),
            name_counters: HashMap::new(),
            root,
            changed: Signal::new(),
            affinity: config.affinity(),
        })
    }

    /// The root node.
    pub fn root(&self) -> ComponentId {
        self.root
    }

    /// Signal emitted after every successful mutation.
    pub fn changed(&self) -> &Signal<TreeChange> {
        &self.changed
    }

    /// The acceptance table this tree checks drops against.
    pub fn acceptance(&self) -> &AcceptanceTable {
        &self.acceptance
    }

    /// The catalog nodes are created from.
    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    // =========================================================================
    // Node creation and destruction
    // =========================================================================

    /// Create an unattached node with a generated unique name.
    ///
    /// Names are the type name followed by a per-type counter (`MenuItem1`,
    /// `MenuItem2`, ...), skipping any name already in use.
    pub fn create_node(&mut self, ty: ComponentType) -> TreeResult<ComponentId> {
        self.affinity.assert_same_thread();
        let descriptor = self.catalog.get(ty).ok_or(TreeError::UnknownType(ty))?;
        let name = self.generate_name(ty);
        let id = ComponentId::next();
        tracing::trace!(target: targets::TREE, %id, %ty, %name, "created node");
        self.nodes.insert(
            id,
            MockNode {
                ty,
                name,
                parent: None,
                body: NodeBody::for_shape(descriptor.shape),
                properties: PropertyStore::new(descriptor),
            },
        );
        Ok(id)
    }

    fn generate_name(&mut self, ty: ComponentType) -> String {
        let counter = self.name_counters.entry(ty).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{}{}", ty.name(), counter);
            if !self.nodes.values().any(|node| node.name == candidate) {
                return candidate;
            }
        }
    }

    /// Destroy a node and its whole subtree.
    ///
    /// Descendants are destroyed before their parents, and each destruction
    /// is announced.
    #[tracing::instrument(skip(self), target = "horizon_blockform_designer::tree", level = "trace")]
    pub fn destroy(&mut self, id: ComponentId) -> TreeResult<()> {
        self.affinity.assert_same_thread();
        if id == self.root {
            return Err(TreeError::RootImmutable);
        }
        let doomed = self.postorder(id)?;
        tracing::debug!(target: targets::TREE, %id, count = doomed.len(), "destroying subtree");

        let detached = self.unlink(id);
        for &node in &doomed {
            self.nodes.remove(&node);
            self.destroyed.insert(node);
        }

        if let Some((parent, index)) = detached {
            self.changed.emit(TreeChange::Detached {
                node: id,
                parent,
                index,
            });
        }
        for node in doomed {
            self.changed.emit(TreeChange::Destroyed { node });
        }
        Ok(())
    }

    /// Tear the whole tree down, root included.
    ///
    /// Every node is destroyed children-first and announced on the change
    /// signal before the tree is dropped.
    pub fn discard(mut self) {
        self.affinity.assert_same_thread();
        let _span = PerfSpan::new(span_names::TREE_DISCARD);
        let mut doomed = Vec::new();
        let mut orphans: Vec<ComponentId> = self
            .nodes
            .iter()
            .filter(|&(&id, node)| node.parent.is_none() && id != self.root)
            .map(|(&id, _)| id)
            .collect();
        orphans.sort();
        orphans.push(self.root);
        for top in orphans {
            self.collect_postorder(top, &mut doomed);
        }
        tracing::debug!(target: targets::TREE, count = doomed.len(), "discarding mock tree");

        self.nodes.clear();
        for node in doomed {
            self.destroyed.insert(node);
            self.changed.emit(TreeChange::Destroyed { node });
        }
    }

    // =========================================================================
    // Containment
    // =========================================================================

    /// Attach `node` to `parent` at `position` (default: the end).
    ///
    /// An attached node is relocated: it is removed from its current parent
    /// and `position` indexes the new parent's children as they are without
    /// it. Everything is validated before anything changes.
    ///
    /// Returns the index the node ended up at.
    #[tracing::instrument(skip(self), target = "horizon_blockform_designer::tree", level = "trace")]
    pub fn attach(
        &mut self,
        node: ComponentId,
        parent: ComponentId,
        position: Option<usize>,
    ) -> TreeResult<usize> {
        self.affinity.assert_same_thread();
        let candidate = self.node(node)?.ty;
        let index = self.check_attach(Some(node), candidate, parent, position)?;
        self.link(node, parent, index);
        Ok(index)
    }

    /// Remove `node` from its parent, closing the gap.
    ///
    /// Detaching an unattached node does nothing. Returns whether the node
    /// was attached.
    pub fn detach(&mut self, node: ComponentId) -> TreeResult<bool> {
        self.affinity.assert_same_thread();
        if node == self.root {
            return Err(TreeError::RootImmutable);
        }
        self.node(node)?;
        match self.unlink(node) {
            Some((parent, index)) => {
                tracing::trace!(target: targets::TREE, %node, %parent, index, "detached node");
                self.changed.emit(TreeChange::Detached {
                    node,
                    parent,
                    index,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Whether `source` may be dropped on `parent`.
    ///
    /// Used for hover feedback; never mutates anything.
    pub fn can_drop(&self, parent: ComponentId, source: &DragSource) -> bool {
        let Some(container) = self.component_type(parent) else {
            return false;
        };
        match source.resolve(self) {
            Some(candidate) => self.acceptance.can_accept(container, candidate),
            None => false,
        }
    }

    /// Drop a drag source on `parent`: the editor's entry point.
    ///
    /// The source is resolved and checked before anything is created, so a
    /// rejected palette drop never instantiates a node. Returns the node that
    /// ended up in `parent`.
    pub fn drop_source(
        &mut self,
        parent: ComponentId,
        source: DragSource,
        position: Option<usize>,
    ) -> TreeResult<ComponentId> {
        self.affinity.assert_same_thread();
        match source {
            DragSource::Existing(node) => {
                self.attach(node, parent, position)?;
                Ok(node)
            }
            DragSource::Palette(ty) => {
                if !self.catalog.contains(ty) {
                    return Err(TreeError::UnknownType(ty));
                }
                let index = self.check_attach(None, ty, parent, position)?;
                let node = self.create_node(ty)?;
                self.link(node, parent, index);
                Ok(node)
            }
        }
    }

    fn check_attach(
        &self,
        node: Option<ComponentId>,
        candidate: ComponentType,
        parent: ComponentId,
        position: Option<usize>,
    ) -> TreeResult<usize> {
        if node == Some(self.root) {
            return Err(TreeError::RootImmutable);
        }
        let container = self.node(parent)?;
        if !self.acceptance.can_accept(container.ty, candidate) {
            tracing::debug!(
                target: targets::TREE,
                container = %container.ty,
                %candidate,
                "containment rejected"
            );
            return Err(TreeError::ContainmentViolation {
                container: container.ty,
                candidate,
            });
        }
        if matches!(container.body, NodeBody::Leaf) {
            return Err(TreeError::NotAContainer(parent));
        }
        if let Some(node) = node {
            if self.is_ancestor_of(node, parent) {
                return Err(TreeError::CircularContainment { node, parent });
            }
        }

        let siblings = container.body.children();
        let len = match node {
            Some(node) if siblings.contains(&node) => siblings.len() - 1,
            _ => siblings.len(),
        };
        match position {
            None => Ok(len),
            Some(position) if position <= len => Ok(position),
            Some(position) => Err(TreeError::InvalidPosition { position, len }),
        }
    }

    /// Move an already validated node into place and announce it.
    fn link(&mut self, node: ComponentId, parent: ComponentId, index: usize) {
        let detached = self.unlink(node);
        if let Some(children) = self
            .nodes
            .get_mut(&parent)
            .and_then(|data| data.body.children_mut())
        {
            children.insert(index, node);
        }
        if let Some(data) = self.nodes.get_mut(&node) {
            data.parent = Some(parent);
        }
        tracing::trace!(target: targets::TREE, %node, %parent, index, "attached node");

        if let Some((old_parent, old_index)) = detached {
            self.changed.emit(TreeChange::Detached {
                node,
                parent: old_parent,
                index: old_index,
            });
        }
        self.changed.emit(TreeChange::Attached {
            node,
            parent,
            index,
        });
    }

    /// Remove `node` from its parent's child list without announcing it.
    fn unlink(&mut self, node: ComponentId) -> Option<(ComponentId, usize)> {
        let parent = self.nodes.get_mut(&node)?.parent.take()?;
        let children = self.nodes.get_mut(&parent)?.body.children_mut()?;
        let index = children.iter().position(|&child| child == node)?;
        children.remove(index);
        Some((parent, index))
    }

    fn is_ancestor_of(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == ancestor {
                return true;
            }
            current = self.nodes.get(&current_id).and_then(|node| node.parent);
        }
        false
    }

    // =========================================================================
    // Menus
    // =========================================================================

    /// Open a closed menu or close an open one. Returns the new state.
    ///
    /// Only the display flag changes; children and properties are untouched.
    pub fn toggle_display(&mut self, menu: ComponentId) -> TreeResult<bool> {
        self.affinity.assert_same_thread();
        let node = self
            .nodes
            .get_mut(&menu)
            .ok_or(TreeError::UnknownNode(menu))?;
        let NodeBody::Menu { open, .. } = &mut node.body else {
            return Err(TreeError::NotAMenu(menu));
        };
        *open = !*open;
        let open = *open;
        tracing::trace!(target: targets::TREE, %menu, open, "toggled menu display");
        self.changed.emit(TreeChange::DisplayToggled { menu, open });
        Ok(open)
    }

    /// Whether a menu is open.
    pub fn is_open(&self, menu: ComponentId) -> TreeResult<bool> {
        match self.node(menu)?.body {
            NodeBody::Menu { open, .. } => Ok(open),
            _ => Err(TreeError::NotAMenu(menu)),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Write a property of a node.
    ///
    /// Returns the previous effective value when the write changed it.
    pub fn set_property(
        &mut self,
        id: ComponentId,
        name: &str,
        value: PropertyValue,
    ) -> TreeResult<Option<PropertyValue>> {
        self.affinity.assert_same_thread();
        let node = self.nodes.get_mut(&id).ok_or(TreeError::UnknownNode(id))?;
        let previous = node.properties.set(name, value)?;
        if previous.is_some() {
            if let Some(property) = node.properties.descriptor().property(name) {
                let value = node.properties.get(property.name)?;
                self.changed.emit(TreeChange::PropertyChanged {
                    node: id,
                    name: property.name,
                    value,
                });
            }
        }
        Ok(previous)
    }

    /// The effective value of a node's property.
    pub fn property(&self, id: ComponentId, name: &str) -> TreeResult<PropertyValue> {
        Ok(self.node(id)?.properties.get(name)?)
    }

    /// A node's property store.
    pub fn properties(&self, id: ComponentId) -> TreeResult<&PropertyStore> {
        Ok(&self.node(id)?.properties)
    }

    /// Every declared property of a node with its effective value.
    pub fn property_snapshot(&self, id: ComponentId) -> TreeResult<Vec<(&'static str, PropertyValue)>> {
        Ok(self.node(id)?.properties.snapshot())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether the node is alive in this tree (attached or not).
    pub fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live nodes, root and unattached nodes included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no live nodes. A live tree always has its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop the record of destroyed nodes. Afterwards `node_state` reports
    /// them as unknown. Returns how many were forgotten.
    pub fn forget_destroyed(&mut self) -> usize {
        let count = self.destroyed.len();
        self.destroyed.clear();
        tracing::trace!(target: targets::TREE, count, "forgot destroyed nodes");
        count
    }

    /// Lifecycle state of a node, `None` if this tree never knew it (or its
    /// destruction was forgotten).
    pub fn node_state(&self, id: ComponentId) -> Option<NodeState> {
        if let Some(node) = self.nodes.get(&id) {
            if id == self.root || node.parent.is_some() {
                Some(NodeState::Attached {
                    parent: node.parent,
                })
            } else {
                Some(NodeState::Unattached)
            }
        } else if self.destroyed.contains(&id) {
            Some(NodeState::Destroyed)
        } else {
            None
        }
    }

    /// The type of a live node.
    pub fn component_type(&self, id: ComponentId) -> Option<ComponentType> {
        self.nodes.get(&id).map(|node| node.ty)
    }

    /// The name of a live node.
    pub fn name(&self, id: ComponentId) -> Option<&str> {
        self.nodes.get(&id).map(|node| node.name.as_str())
    }

    /// Find a live node by name.
    pub fn find_by_name(&self, name: &str) -> Option<ComponentId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(&id, _)| id)
    }

    /// The parent of a node.
    pub fn parent(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        Ok(self.node(id)?.parent)
    }

    /// The children of a node in display order. Leaves have none.
    pub fn children(&self, id: ComponentId) -> TreeResult<&[ComponentId]> {
        Ok(self.node(id)?.body.children())
    }

    /// Position of a node among its siblings.
    pub fn index_of(&self, id: ComponentId) -> TreeResult<Option<usize>> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(None);
        };
        Ok(self.children(parent)?.iter().position(|&child| child == id))
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self, id: ComponentId) -> TreeResult<Vec<ComponentId>> {
        let mut result = Vec::new();
        let mut current = self.node(id)?.parent;
        while let Some(current_id) = current {
            result.push(current_id);
            current = self.nodes.get(&current_id).and_then(|node| node.parent);
        }
        Ok(result)
    }

    /// The attached tree in depth-first pre-order, root first.
    pub fn preorder(&self) -> Vec<ComponentId> {
        let mut result = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            result.push(id);
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.body.children().iter().rev());
            }
        }
        result
    }

    /// A subtree in depth-first post-order, `id` last.
    pub fn postorder(&self, id: ComponentId) -> TreeResult<Vec<ComponentId>> {
        self.node(id)?;
        let mut result = Vec::new();
        self.collect_postorder(id, &mut result);
        Ok(result)
    }

    fn collect_postorder(&self, id: ComponentId, result: &mut Vec<ComponentId>) {
        if let Some(node) = self.nodes.get(&id) {
            for &child in node.body.children() {
                self.collect_postorder(child, result);
            }
            result.push(id);
        }
    }

    fn node(&self, id: ComponentId) -> TreeResult<&MockNode> {
        self.nodes.get(&id).ok_or(TreeError::UnknownNode(id))
    }
}

impl std::fmt::Debug for MockTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTree")
            .field("root", &self.root)
            .field("nodes", &self.nodes.len())
            .field("destroyed", &self.destroyed.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn tree() -> MockTree {
        MockTree::new(
            Arc::new(ComponentCatalog::standard()),
            Arc::new(AcceptanceTable::standard()),
            &BlockformConfig::default(),
        )
        .unwrap()
    }

    fn record(tree: &MockTree) -> Arc<Mutex<Vec<TreeChange>>> {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = changes.clone();
        tree.changed().connect(move |change| sink.lock().push(change.clone()));
        changes
    }

    #[test]
    fn test_new_tree_has_root() {
        let tree = tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.component_type(tree.root()), Some(ComponentType::FORM));
        assert_eq!(tree.name(tree.root()), Some("Screen1"));
        assert_eq!(
            tree.node_state(tree.root()),
            Some(NodeState::Attached { parent: None })
        );
        assert_eq!(tree.preorder(), vec![tree.root()]);
    }

    #[test]
    fn test_generated_names() {
        let mut tree = tree();
        let a = tree.create_node(ComponentType::MENU_ITEM).unwrap();
        let b = tree.create_node(ComponentType::MENU_ITEM).unwrap();
        let c = tree.create_node(ComponentType::BUTTON).unwrap();
        assert_eq!(tree.name(a), Some("MenuItem1"));
        assert_eq!(tree.name(b), Some("MenuItem2"));
        assert_eq!(tree.name(c), Some("Button1"));
        assert_eq!(tree.find_by_name("MenuItem2"), Some(b));
        assert_eq!(tree.node_state(a), Some(NodeState::Unattached));
    }

    #[test]
    fn test_create_unknown_type() {
        let mut tree = tree();
        let ty = ComponentType::new("Sprite");
        assert_eq!(tree.create_node(ty), Err(TreeError::UnknownType(ty)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_attach_positions() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_node(ComponentType::BUTTON).unwrap();
        let b = tree.create_node(ComponentType::LABEL).unwrap();
        let c = tree.create_node(ComponentType::BUTTON).unwrap();

        assert_eq!(tree.attach(a, root, None).unwrap(), 0);
        assert_eq!(tree.attach(b, root, None).unwrap(), 1);
        assert_eq!(tree.attach(c, root, Some(1)).unwrap(), 1);
        assert_eq!(tree.children(root).unwrap(), &[a, c, b]);
        assert_eq!(tree.index_of(b).unwrap(), Some(2));
        assert_eq!(tree.node_state(c), Some(NodeState::Attached { parent: Some(root) }));
    }

    #[test]
    fn test_invalid_position_leaves_tree_unchanged() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_node(ComponentType::BUTTON).unwrap();
        assert_eq!(
            tree.attach(a, root, Some(1)),
            Err(TreeError::InvalidPosition { position: 1, len: 0 })
        );
        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(tree.node_state(a), Some(NodeState::Unattached));
    }

    #[test]
    fn test_relocate_within_parent() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.drop_source(root, DragSource::Palette(ComponentType::BUTTON), None).unwrap();
        let b = tree.drop_source(root, DragSource::Palette(ComponentType::BUTTON), None).unwrap();
        let c = tree.drop_source(root, DragSource::Palette(ComponentType::BUTTON), None).unwrap();

        // Position counts the siblings without the moved node.
        assert_eq!(tree.attach(a, root, Some(2)).unwrap(), 2);
        assert_eq!(tree.children(root).unwrap(), &[b, c, a]);
        // Moving to the end of its own parent.
        tree.attach(b, root, None).unwrap();
        assert_eq!(tree.children(root).unwrap(), &[c, a, b]);
        assert_eq!(
            tree.attach(c, root, Some(3)),
            Err(TreeError::InvalidPosition { position: 3, len: 2 })
        );
    }

    #[test]
    fn test_relocate_between_parents_emits_detach_then_attach() {
        let mut tree = tree();
        let root = tree.root();
        let left = tree
            .drop_source(root, DragSource::Palette(ComponentType::HORIZONTAL_ARRANGEMENT), None)
            .unwrap();
        let right = tree
            .drop_source(root, DragSource::Palette(ComponentType::VERTICAL_ARRANGEMENT), None)
            .unwrap();
        let button = tree.drop_source(left, DragSource::Palette(ComponentType::BUTTON), None).unwrap();

        let changes = record(&tree);
        tree.drop_source(right, DragSource::Existing(button), None).unwrap();

        assert!(tree.children(left).unwrap().is_empty());
        assert_eq!(tree.children(right).unwrap(), &[button]);
        assert_eq!(
            *changes.lock(),
            vec![
                TreeChange::Detached { node: button, parent: left, index: 0 },
                TreeChange::Attached { node: button, parent: right, index: 0 },
            ]
        );
    }

    #[test]
    fn test_circular_containment() {
        let mut tree = tree();
        let root = tree.root();
        let outer = tree
            .drop_source(root, DragSource::Palette(ComponentType::VERTICAL_ARRANGEMENT), None)
            .unwrap();
        let inner = tree
            .drop_source(outer, DragSource::Palette(ComponentType::HORIZONTAL_ARRANGEMENT), None)
            .unwrap();

        assert_eq!(
            tree.attach(outer, inner, None),
            Err(TreeError::CircularContainment { node: outer, parent: inner })
        );
        assert_eq!(
            tree.attach(outer, outer, None),
            Err(TreeError::CircularContainment { node: outer, parent: outer })
        );
        assert_eq!(tree.parent(outer).unwrap(), Some(root));
        assert_eq!(tree.parent(inner).unwrap(), Some(outer));
    }

    #[test]
    fn test_leaf_rejects_children() {
        let mut tree = tree();
        let root = tree.root();
        let button = tree.drop_source(root, DragSource::Palette(ComponentType::BUTTON), None).unwrap();
        assert_eq!(
            tree.drop_source(button, DragSource::Palette(ComponentType::LABEL), None),
            Err(TreeError::ContainmentViolation {
                container: ComponentType::BUTTON,
                candidate: ComponentType::LABEL,
            })
        );
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_root_is_immutable() {
        let mut tree = tree();
        let root = tree.root();
        let arrangement = tree
            .drop_source(root, DragSource::Palette(ComponentType::VERTICAL_ARRANGEMENT), None)
            .unwrap();
        assert_eq!(tree.destroy(root), Err(TreeError::RootImmutable));
        assert_eq!(tree.detach(root), Err(TreeError::RootImmutable));
        assert_eq!(tree.attach(root, arrangement, None), Err(TreeError::RootImmutable));
    }

    #[test]
    fn test_detach_is_idempotent() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.drop_source(root, DragSource::Palette(ComponentType::BUTTON), None).unwrap();
        let b = tree.drop_source(root, DragSource::Palette(ComponentType::LABEL), None).unwrap();

        assert!(tree.detach(a).unwrap());
        assert!(!tree.detach(a).unwrap());
        assert_eq!(tree.children(root).unwrap(), &[b]);
        assert_eq!(tree.index_of(b).unwrap(), Some(0));
        assert_eq!(tree.node_state(a), Some(NodeState::Unattached));
        // A detached node keeps its identity and store.
        assert_eq!(tree.name(a), Some("Button1"));
    }

    #[test]
    fn test_destroy_cascades() {
        let mut tree = tree();
        let root = tree.root();
        let menu = tree.drop_source(root, DragSource::Palette(ComponentType::MENU), None).unwrap();
        let first = tree.drop_source(menu, DragSource::Palette(ComponentType::MENU_ITEM), None).unwrap();
        let second = tree.drop_source(menu, DragSource::Palette(ComponentType::MENU_ITEM), None).unwrap();

        let changes = record(&tree);
        tree.destroy(menu).unwrap();

        assert_eq!(tree.len(), 1);
        for id in [menu, first, second] {
            assert_eq!(tree.node_state(id), Some(NodeState::Destroyed));
            assert_eq!(tree.property(id, "Text"), Err(TreeError::UnknownNode(id)));
        }
        assert_eq!(
            *changes.lock(),
            vec![
                TreeChange::Detached { node: menu, parent: root, index: 0 },
                TreeChange::Destroyed { node: first },
                TreeChange::Destroyed { node: second },
                TreeChange::Destroyed { node: menu },
            ]
        );
        assert_eq!(tree.attach(first, root, None), Err(TreeError::UnknownNode(first)));
    }

    #[test]
    fn test_forget_destroyed() {
        let mut tree = tree();
        let root = tree.root();
        let menu = tree.drop_source(root, DragSource::Palette(ComponentType::MENU), None).unwrap();
        let item = tree.drop_source(menu, DragSource::Palette(ComponentType::MENU_ITEM), None).unwrap();
        tree.destroy(menu).unwrap();

        assert_eq!(tree.forget_destroyed(), 2);
        assert_eq!(tree.node_state(menu), None);
        assert_eq!(tree.node_state(item), None);
        assert_eq!(tree.node_state(root), Some(NodeState::Attached { parent: None }));
        assert_eq!(tree.forget_destroyed(), 0);
    }

    #[test]
    fn test_discard_destroys_everything() {
        let mut tree = tree();
        let root = tree.root();
        let menu = tree.drop_source(root, DragSource::Palette(ComponentType::MENU), None).unwrap();
        let item = tree.drop_source(menu, DragSource::Palette(ComponentType::MENU_ITEM), None).unwrap();
        let loose = tree.create_node(ComponentType::LABEL).unwrap();

        let changes = record(&tree);
        tree.discard();

        assert_eq!(
            *changes.lock(),
            vec![
                TreeChange::Destroyed { node: loose },
                TreeChange::Destroyed { node: item },
                TreeChange::Destroyed { node: menu },
                TreeChange::Destroyed { node: root },
            ]
        );
    }

    #[test]
    fn test_toggle_display_only_on_menus() {
        let mut tree = tree();
        let root = tree.root();
        let menu = tree.drop_source(root, DragSource::Palette(ComponentType::MENU), None).unwrap();
        let button = tree.drop_source(root, DragSource::Palette(ComponentType::BUTTON), None).unwrap();

        assert!(!tree.is_open(menu).unwrap());
        assert!(tree.toggle_display(menu).unwrap());
        assert!(tree.is_open(menu).unwrap());
        assert_eq!(tree.toggle_display(button), Err(TreeError::NotAMenu(button)));
        assert_eq!(tree.is_open(root), Err(TreeError::NotAMenu(root)));
    }

    #[test]
    fn test_set_property_announces_changes() {
        let mut tree = tree();
        let root = tree.root();
        let item = tree.create_node(ComponentType::MENU_ITEM).unwrap();
        let menu = tree.drop_source(root, DragSource::Palette(ComponentType::MENU), None).unwrap();
        tree.attach(item, menu, None).unwrap();

        let changes = record(&tree);
        assert_eq!(
            tree.set_property(item, "Text", "Save".into()).unwrap(),
            Some(PropertyValue::from(""))
        );
        // Same value again: recorded, but nothing changed.
        assert_eq!(tree.set_property(item, "Text", "Save".into()).unwrap(), None);
        assert!(matches!(
            tree.set_property(item, "Colour", "red".into()),
            Err(TreeError::Property(_))
        ));

        assert_eq!(tree.property(item, "Text").unwrap(), PropertyValue::from("Save"));
        assert_eq!(
            *changes.lock(),
            vec![TreeChange::PropertyChanged {
                node: item,
                name: "Text",
                value: PropertyValue::from("Save"),
            }]
        );
        assert!(!tree.is_open(menu).unwrap());
    }

    #[test]
    fn test_property_snapshot_in_declaration_order() {
        let mut tree = tree();
        let item = tree.create_node(ComponentType::MENU_ITEM).unwrap();
        tree.set_property(item, "ShowOnActionBar", true.into()).unwrap();
        tree.set_property(item, "Text", "Open".into()).unwrap();

        let names: Vec<_> = tree
            .property_snapshot(item)
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["Text", "Icon", "Enabled", "Visible", "ShowOnActionBar"]);
    }

    #[test]
    fn test_preorder_and_ancestors() {
        let mut tree = tree();
        let root = tree.root();
        let column = tree
            .drop_source(root, DragSource::Palette(ComponentType::VERTICAL_ARRANGEMENT), None)
            .unwrap();
        let button = tree.drop_source(column, DragSource::Palette(ComponentType::BUTTON), None).unwrap();
        let label = tree.drop_source(root, DragSource::Palette(ComponentType::LABEL), None).unwrap();
        let _unattached = tree.create_node(ComponentType::LABEL).unwrap();

        assert_eq!(tree.preorder(), vec![root, column, button, label]);
        assert_eq!(tree.postorder(root).unwrap(), vec![button, column, label, root]);
        assert_eq!(tree.ancestors(button).unwrap(), vec![column, root]);
    }

    #[test]
    fn test_stale_drag_source() {
        let mut tree = tree();
        let root = tree.root();
        let button = tree.drop_source(root, DragSource::Palette(ComponentType::BUTTON), None).unwrap();
        tree.destroy(button).unwrap();

        let source = DragSource::Existing(button);
        assert_eq!(source.resolve(&tree), None);
        assert!(!tree.can_drop(root, &source));
        assert_eq!(
            tree.drop_source(root, source, None),
            Err(TreeError::UnknownNode(button))
        );
    }
}
