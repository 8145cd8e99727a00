//! Error types for the mock component tree.

use horizon_blockform_core::{ComponentId, ComponentType, PropertyError};

/// Result type alias for tree operations.
pub type TreeResult<T> = std::result::Result<T, TreeError>;

/// Errors returned by [`MockTree`](crate::MockTree) operations.
///
/// Every failing operation leaves the tree and all property stores exactly
/// as they were.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// The acceptance protocol rejected the containment.
    #[error("{container} cannot contain {candidate}")]
    ContainmentViolation {
        container: ComponentType,
        candidate: ComponentType,
    },

    /// The node ID is invalid or the node has been destroyed.
    #[error("Node {0} does not exist")]
    UnknownNode(ComponentId),

    /// The component type is not in the catalog.
    #[error("Component type '{0}' is not registered")]
    UnknownType(ComponentType),

    /// Attaching would make a node its own ancestor.
    #[error("Cannot place {node} inside itself or one of its descendants ({parent})")]
    CircularContainment {
        node: ComponentId,
        parent: ComponentId,
    },

    /// The insertion index is past the end of the child sequence.
    #[error("Position {position} is out of range for {len} children")]
    InvalidPosition { position: usize, len: usize },

    /// The node is not a menu-like container.
    #[error("Node {0} is not a menu")]
    NotAMenu(ComponentId),

    /// The node cannot hold children.
    #[error("Node {0} is not a container")]
    NotAContainer(ComponentId),

    /// The root node cannot be moved or destroyed.
    #[error("The root node cannot be attached, detached or destroyed")]
    RootImmutable,

    /// A property write was invalid for the node's type.
    #[error(transparent)]
    Property(#[from] PropertyError),
}
