//! Core systems for Horizon Blockform.
//!
//! This crate provides the pieces shared by the visual designer and the
//! device runtime of the Horizon Blockform app builder:
//!
//! - **Component Identity**: [`ComponentId`] links a designer node to its
//!   runtime component; [`ComponentType`] tags what kind of component it is
//! - **Descriptor Tables**: explicit per-type property and event declarations
//!   ([`ComponentDescriptor`]) collected in a [`ComponentCatalog`]
//! - **Property Store**: ordered, typed property values with declared defaults
//! - **Signals**: change notification between the model and its presenters
//! - **Thread Affinity**: checks that UI-thread objects stay on their thread
//! - **Configuration**: [`BlockformConfig`], loadable from TOML
//!
//! # Example
//!
//! ```
//! use horizon_blockform_core::{ComponentCatalog, ComponentType, PropertyStore, PropertyValue};
//!
//! let catalog = ComponentCatalog::standard();
//! let descriptor = catalog.get(ComponentType::MENU_ITEM).unwrap();
//!
//! let mut store = PropertyStore::new(descriptor);
//! store.set("Text", "Save".into()).unwrap();
//! assert_eq!(store.get("Text").unwrap(), PropertyValue::from("Save"));
//! ```

pub mod catalog;
pub mod config;
pub mod descriptor;
mod error;
mod id;
pub mod logging;
pub mod property;
pub mod signal;
pub mod thread_check;
mod value;

pub use catalog::ComponentCatalog;
pub use config::BlockformConfig;
pub use descriptor::{
    ApplyPhase, ComponentDescriptor, ComponentShape, EventDescriptor, ParamDescriptor,
    PropertyCategory, PropertyDescriptor,
};
pub use error::{AssetLoadError, ConfigError, PropertyError, WidgetApplicationError};
pub use id::{ComponentId, ComponentType};
pub use logging::PerfSpan;
pub use property::PropertyStore;
pub use signal::{ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
pub use value::{PropertyType, PropertyValue};
