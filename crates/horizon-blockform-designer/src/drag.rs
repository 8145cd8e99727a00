//! Drag sources.
//!
//! Something dropped on a container is either a node already in the tree
//! being moved, or a palette entry about to be instantiated. The acceptance
//! check only ever sees the resolved type tag.

use horizon_blockform_core::{ComponentId, ComponentType};

use crate::tree::MockTree;

/// The thing being dragged in the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragSource {
    /// An existing node being relocated.
    Existing(ComponentId),
    /// A palette template of the given type.
    Palette(ComponentType),
}

impl DragSource {
    /// Resolve the source to its component type.
    ///
    /// Returns `None` when an existing-node source refers to a node that is
    /// not (or no longer) in the tree.
    pub fn resolve(&self, tree: &MockTree) -> Option<ComponentType> {
        match *self {
            Self::Existing(id) => tree.component_type(id),
            Self::Palette(ty) => Some(ty),
        }
    }

    /// The node being moved, if this is a relocation.
    pub fn existing(&self) -> Option<ComponentId> {
        match *self {
            Self::Existing(id) => Some(id),
            Self::Palette(_) => None,
        }
    }
}

impl From<ComponentId> for DragSource {
    fn from(id: ComponentId) -> Self {
        Self::Existing(id)
    }
}

impl From<ComponentType> for DragSource {
    fn from(ty: ComponentType) -> Self {
        Self::Palette(ty)
    }
}
