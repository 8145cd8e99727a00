//! The drag acceptance protocol.
//!
//! Decides whether a container type may hold a candidate type. The decision
//! is a pure function of the two type tags: it never looks at the tree, never
//! mutates anything, and answers for every pair.
//!
//! Containers declare their policy up front in an [`AcceptanceTable`]. A type
//! with no declared policy rejects everything, so a leaf never accidentally
//! turns into a drop target.
//!
//! # Example
//!
//! ```
//! use horizon_blockform_core::ComponentType;
//! use horizon_blockform_designer::AcceptanceTable;
//!
//! let table = AcceptanceTable::standard();
//!
//! assert!(table.can_accept(ComponentType::MENU, ComponentType::MENU_ITEM));
//! assert!(!table.can_accept(ComponentType::MENU, ComponentType::BUTTON));
//! assert!(table.can_accept(ComponentType::FORM, ComponentType::BUTTON));
//! assert!(!table.can_accept(ComponentType::BUTTON, ComponentType::LABEL));
//! ```

use std::collections::HashMap;

use horizon_blockform_core::ComponentType;
use horizon_blockform_core::logging::targets;

/// Which child types a container type accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AcceptPolicy {
    /// Accepts nothing.
    #[default]
    Nothing,
    /// Accepts exactly the listed types.
    Only(&'static [ComponentType]),
    /// Accepts every type except the listed ones.
    AnyExcept(&'static [ComponentType]),
}

impl AcceptPolicy {
    /// Whether the policy admits the candidate type.
    pub fn allows(self, candidate: ComponentType) -> bool {
        match self {
            Self::Nothing => false,
            Self::Only(allowed) => allowed.contains(&candidate),
            Self::AnyExcept(excluded) => !excluded.contains(&candidate),
        }
    }
}

/// Types that only make sense at the top of the tree or inside a menu.
const FORM_EXCLUDES: &[ComponentType] = &[ComponentType::FORM, ComponentType::MENU_ITEM];

/// Arrangements additionally refuse menus, which belong to the screen.
const ARRANGEMENT_EXCLUDES: &[ComponentType] = &[
    ComponentType::FORM,
    ComponentType::MENU,
    ComponentType::MENU_ITEM,
];

const MENU_ACCEPTS: &[ComponentType] = &[ComponentType::MENU_ITEM];

/// Per-container-type acceptance policies.
#[derive(Clone, Debug, Default)]
pub struct AcceptanceTable {
    policies: HashMap<ComponentType, AcceptPolicy>,
}

impl AcceptanceTable {
    /// Create a table in which every type rejects everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the table for the standard components.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.declare(ComponentType::FORM, AcceptPolicy::AnyExcept(FORM_EXCLUDES));
        table.declare(
            ComponentType::HORIZONTAL_ARRANGEMENT,
            AcceptPolicy::AnyExcept(ARRANGEMENT_EXCLUDES),
        );
        table.declare(
            ComponentType::VERTICAL_ARRANGEMENT,
            AcceptPolicy::AnyExcept(ARRANGEMENT_EXCLUDES),
        );
        table.declare(ComponentType::MENU, AcceptPolicy::Only(MENU_ACCEPTS));
        table
    }

    /// Declare the policy of a container type, returning the previous one.
    pub fn declare(&mut self, container: ComponentType, policy: AcceptPolicy) -> Option<AcceptPolicy> {
        self.policies.insert(container, policy)
    }

    /// The policy of a container type. Undeclared types accept nothing.
    pub fn policy(&self, container: ComponentType) -> AcceptPolicy {
        self.policies.get(&container).copied().unwrap_or_default()
    }

    /// Whether `container` may hold a child of type `candidate`.
    pub fn can_accept(&self, container: ComponentType, candidate: ComponentType) -> bool {
        let accepted = self.policy(container).allows(candidate);
        tracing::trace!(
            target: targets::ACCEPTANCE,
            %container,
            %candidate,
            accepted,
            "acceptance check"
        );
        accepted
    }
}
