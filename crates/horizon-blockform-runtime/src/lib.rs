//! Device runtime for Horizon Blockform.
//!
//! The runtime hosts the components of a running app. Each component keeps
//! its property values in a typed store whether or not its platform widget
//! exists yet, and replays them into the widget once the platform host is
//! ready. Events raised by widgets are routed through a shared
//! [`EventDispatcher`] to user handlers.
//!
//! - [`form`]: the hosting screen, host-ready materialization and teardown
//! - [`lifecycle`]: buffered property writes and widget materialization
//! - [`asset`]: asset loading with per-property caching
//! - [`dispatch`]: owner-chain resolution and isolated handler invocation
//! - [`widget`]: the seam to the platform UI toolkit
//! - [`menu_item`]: typed access to menu entries

pub mod asset;
pub mod dispatch;
mod error;
pub mod form;
pub mod lifecycle;
pub mod menu_item;
pub mod widget;

pub use asset::{Asset, AssetLoader, AssetSlot, AssetUpdate};
pub use dispatch::{
    DispatchDelegate, DispatchResult, EventContext, EventDispatcher, EventHook, HandlerId,
    HandlerResult,
};
pub use error::{DispatchError, FormError, FormResult, HandlerError, MaterializeError};
pub use form::{Form, HostReport};
pub use lifecycle::{ApplyFailure, ComponentLifecycle, MaterializeReport};
pub use menu_item::MenuItem;
pub use widget::{PlatformWidget, WidgetFactory, WidgetRequest};
