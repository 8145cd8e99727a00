//! Design-time component model for Horizon Blockform.
//!
//! The visual editor works on a [`MockTree`]: a stand-in for the screen the
//! user is building, made of mock nodes that carry typed property stores but
//! no platform widgets. Drops are validated by the [`AcceptanceTable`] before
//! the tree changes.
//!
//! - [`acceptance`]: which container types may hold which component types
//! - [`drag`]: palette entries and relocated nodes as drag sources
//! - [`tree`]: the mock tree, its node state machine and change signal
//! - [`debug`]: text dumps for diagnostics and tests

pub mod acceptance;
pub mod debug;
pub mod drag;
mod error;
pub mod tree;

pub use acceptance::{AcceptPolicy, AcceptanceTable};
pub use drag::DragSource;
pub use error::{TreeError, TreeResult};
pub use tree::{MockTree, NodeState, TreeChange};
