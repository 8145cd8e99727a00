//! Component identity and type tags.
//!
//! A [`ComponentId`] is the stable handle that links a design-time mock node
//! to the runtime component built from it. A [`ComponentType`] is the static
//! tag naming what kind of component a node or palette item is.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique component IDs.
static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

/// A unique identifier for one logical component.
///
/// The same `ComponentId` is used by the designer's mock tree and by the
/// runtime form hosting the component, so events raised by a platform widget
/// can be routed back to the component the user placed in the editor.
///
/// IDs are allocated from a process-wide counter and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Allocate a fresh, process-unique ID.
    pub fn next() -> Self {
        Self(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Convert the ID to a raw u64 value.
    ///
    /// The raw value can be converted back using [`ComponentId::from_raw`].
    #[inline]
    pub fn as_raw(self) -> u64 {
        self.0
    }

    /// Create a ComponentId from a raw u64 value.
    ///
    /// This does not reserve the value: mixing `from_raw` IDs with
    /// [`ComponentId::next`] is only safe when the raw values came from
    /// `as_raw` in the first place.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The static type tag of a component (`"Menu"`, `"MenuItem"`, ...).
///
/// Type tags are what the drag acceptance protocol compares; both an existing
/// mock node and a palette template resolve to one before any check runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentType(&'static str);

impl ComponentType {
    /// The top-level screen.
    pub const FORM: Self = Self("Form");
    /// Menu-like container holding menu items.
    pub const MENU: Self = Self("Menu");
    /// A single menu entry.
    pub const MENU_ITEM: Self = Self("MenuItem");
    /// Push button.
    pub const BUTTON: Self = Self("Button");
    /// Static text label.
    pub const LABEL: Self = Self("Label");
    /// Layout container arranging children left to right.
    pub const HORIZONTAL_ARRANGEMENT: Self = Self("HorizontalArrangement");
    /// Layout container arranging children top to bottom.
    pub const VERTICAL_ARRANGEMENT: Self = Self("VerticalArrangement");

    /// Create a type tag for a custom component type.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The type name.
    #[inline]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
