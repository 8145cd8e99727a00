//! Event dispatch from platform widgets to user handlers.
//!
//! The [`EventDispatcher`] is a process-scoped registry of
//! `(component, event) -> handlers`. It is created once at startup, shared
//! by `Arc`, and emptied with [`EventDispatcher::clear`] at shutdown.
//!
//! # Dispatch Flow
//!
//! 1. **Owner resolution**: starting at the component, the stored parent
//!    chain is walked to the nearest component registered as a dispatch
//!    owner (usually the hosting form). A component with no owner on its
//!    chain dispatches directly.
//! 2. **Owner consent**: the owner's [`DispatchDelegate`] may refuse the
//!    event, for example after the form has been torn down.
//! 3. **Handlers**: every handler registered for the pair runs once, in
//!    registration order. A handler that fails (returns an error or panics)
//!    is logged and does not stop the handlers after it.
//!
//! Dispatching to a pair with no handlers is a no-op.
//!
//! # Example
//!
//! ```
//! use horizon_blockform_core::ComponentId;
//! use horizon_blockform_runtime::{DispatchResult, EventDispatcher};
//!
//! let dispatcher = EventDispatcher::default();
//! let button = ComponentId::next();
//!
//! dispatcher.register(button, "Click", |ctx| {
//!     println!("{} clicked", ctx.component);
//!     Ok(())
//! });
//!
//! assert_eq!(
//!     dispatcher.dispatch(button, "Click", &[]),
//!     DispatchResult::Delivered { invoked: 1, failed: 0 }
//! );
//! assert_eq!(dispatcher.dispatch(button, "LongClick", &[]), DispatchResult::Unhandled);
//! ```

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_blockform_core::logging::targets;
use horizon_blockform_core::{BlockformConfig, ComponentId, PropertyValue};
use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::HandlerError;

new_key_type! {
    /// Identifies one registered handler.
    pub struct HandlerId;
}

/// What a handler sees when it is invoked.
#[derive(Debug, Clone, Copy)]
pub struct EventContext<'a> {
    /// The component the event was raised on.
    pub component: ComponentId,
    /// The event name.
    pub event: &'a str,
    /// Event arguments, in declaration order.
    pub args: &'a [PropertyValue],
}

/// Result type for event handlers.
pub type HandlerResult = Result<(), HandlerError>;

type Handler = Arc<dyn Fn(&EventContext<'_>) -> HandlerResult + Send + Sync>;

/// Decides whether events may be delivered for the components it owns.
pub trait DispatchDelegate: Send + Sync {
    /// Whether `event` raised on `component` may be delivered now.
    fn can_dispatch_event(&self, component: ComponentId, event: &str) -> bool;
}

/// Outcome of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// Handlers ran; `failed` of the `invoked` handlers failed.
    Delivered { invoked: usize, failed: usize },
    /// No handler is registered for the pair.
    Unhandled,
    /// The dispatch owner refused the event.
    Refused,
}

impl DispatchResult {
    /// Whether at least one handler ran.
    pub fn was_delivered(&self) -> bool {
        matches!(self, Self::Delivered { invoked, .. } if *invoked > 0)
    }
}

struct Registration {
    component: ComponentId,
    event: String,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    handlers: SlotMap<HandlerId, Registration>,
    /// Handler IDs per pair, in registration order.
    by_event: HashMap<(ComponentId, String), Vec<HandlerId>>,
    parents: HashMap<ComponentId, ComponentId>,
    owners: HashMap<ComponentId, Arc<dyn DispatchDelegate>>,
}

impl Registry {
    fn owner_of(&self, component: ComponentId) -> Option<(ComponentId, Arc<dyn DispatchDelegate>)> {
        let mut visited = HashSet::new();
        let mut current = Some(component);
        while let Some(id) = current {
            if !visited.insert(id) {
                tracing::warn!(target: targets::DISPATCH, %component, "parent chain loops; treating as unowned");
                return None;
            }
            if let Some(owner) = self.owners.get(&id) {
                return Some((id, owner.clone()));
            }
            current = self.parents.get(&id).copied();
        }
        None
    }
}

/// Process-scoped event registry and dispatcher.
pub struct EventDispatcher {
    registry: Mutex<Registry>,
    trace_dispatch: AtomicBool,
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(&BlockformConfig::default())
    }
}

impl EventDispatcher {
    /// Create an empty dispatcher.
    pub fn new(config: &BlockformConfig) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            trace_dispatch: AtomicBool::new(config.trace_dispatch),
        }
    }

    /// Create an empty dispatcher ready to be shared.
    pub fn shared(config: &BlockformConfig) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    /// Log every dispatch at debug level.
    pub fn set_trace_dispatch(&self, enabled: bool) {
        self.trace_dispatch.store(enabled, Ordering::Relaxed);
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    /// Register a handler for `event` on `component`.
    ///
    /// Handlers for the same pair run in registration order.
    pub fn register<F>(&self, component: ComponentId, event: &str, handler: F) -> HandlerId
    where
        F: Fn(&EventContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = registry.handlers.insert(Registration {
            component,
            event: event.to_string(),
            handler: Arc::new(handler),
        });
        registry
            .by_event
            .entry((component, event.to_string()))
            .or_default()
            .push(id);
        tracing::trace!(target: targets::DISPATCH, %component, event, ?id, "registered handler");
        id
    }

    /// Remove one handler. Returns `false` if it was already gone.
    pub fn unregister(&self, id: HandlerId) -> bool {
        let mut registry = self.registry.lock();
        let Some(registration) = registry.handlers.remove(id) else {
            return false;
        };
        let key = (registration.component, registration.event);
        if let Some(ids) = registry.by_event.get_mut(&key) {
            ids.retain(|&other| other != id);
            if ids.is_empty() {
                registry.by_event.remove(&key);
            }
        }
        true
    }

    /// Remove every handler of a component, its parent link and its owner
    /// registration. Returns the number of handlers removed.
    pub fn unregister_component(&self, component: ComponentId) -> usize {
        let mut registry = self.registry.lock();
        let keys: Vec<_> = registry
            .by_event
            .keys()
            .filter(|(id, _)| *id == component)
            .cloned()
            .collect();
        let mut removed = 0;
        for key in keys {
            if let Some(ids) = registry.by_event.remove(&key) {
                for id in ids {
                    registry.handlers.remove(id);
                    removed += 1;
                }
            }
        }
        registry.parents.remove(&component);
        registry.owners.remove(&component);
        tracing::trace!(target: targets::DISPATCH, %component, removed, "unregistered component");
        removed
    }

    /// Number of handlers registered for a pair.
    pub fn handler_count(&self, component: ComponentId, event: &str) -> usize {
        self.registry
            .lock()
            .by_event
            .get(&(component, event.to_string()))
            .map_or(0, Vec::len)
    }

    /// Whether nothing at all is registered.
    pub fn is_empty(&self) -> bool {
        let registry = self.registry.lock();
        registry.handlers.is_empty() && registry.parents.is_empty() && registry.owners.is_empty()
    }

    /// Forget every handler, parent link and owner.
    pub fn clear(&self) {
        let mut registry = self.registry.lock();
        let handlers = registry.handlers.len();
        *registry = Registry::default();
        tracing::debug!(target: targets::DISPATCH, handlers, "dispatcher cleared");
    }

    // =========================================================================
    // Ownership
    // =========================================================================

    /// Record the parent of a component, or remove the link with `None`.
    pub fn set_parent(&self, component: ComponentId, parent: Option<ComponentId>) {
        let mut registry = self.registry.lock();
        match parent {
            Some(parent) => registry.parents.insert(component, parent),
            None => registry.parents.remove(&component),
        };
    }

    /// The recorded parent of a component.
    pub fn parent(&self, component: ComponentId) -> Option<ComponentId> {
        self.registry.lock().parents.get(&component).copied()
    }

    /// Flag a component as a dispatch owner.
    pub fn set_owner(&self, component: ComponentId, delegate: Arc<dyn DispatchDelegate>) {
        self.registry.lock().owners.insert(component, delegate);
    }

    /// Remove a component's owner flag. Returns whether it was an owner.
    pub fn remove_owner(&self, component: ComponentId) -> bool {
        self.registry.lock().owners.remove(&component).is_some()
    }

    /// The nearest dispatch owner on the component's parent chain, the
    /// component itself included.
    pub fn dispatch_owner(&self, component: ComponentId) -> Option<ComponentId> {
        self.registry.lock().owner_of(component).map(|(id, _)| id)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Deliver `event` raised on `component` to its handlers.
    ///
    /// The handler list is snapshotted before any handler runs, so handlers
    /// may register, unregister or dispatch freely; such changes apply from
    /// the next dispatch.
    #[tracing::instrument(skip(self, args), target = "horizon_blockform_runtime::dispatch", level = "trace")]
    pub fn dispatch(&self, component: ComponentId, event: &str, args: &[PropertyValue]) -> DispatchResult {
        let (owner, handlers) = {
            let registry = self.registry.lock();
            let owner = registry.owner_of(component);
            let handlers: Vec<(HandlerId, Handler)> = registry
                .by_event
                .get(&(component, event.to_string()))
                .map(|ids| {
                    ids.iter()
                        .filter_map(|&id| registry.handlers.get(id).map(|r| (id, r.handler.clone())))
                        .collect()
                })
                .unwrap_or_default();
            (owner, handlers)
        };

        if let Some((owner_id, delegate)) = owner {
            if !delegate.can_dispatch_event(component, event) {
                tracing::debug!(target: targets::DISPATCH, %component, event, owner = %owner_id, "dispatch refused by owner");
                return DispatchResult::Refused;
            }
        }

        if handlers.is_empty() {
            tracing::trace!(target: targets::DISPATCH, %component, event, "no handlers");
            return DispatchResult::Unhandled;
        }

        let context = EventContext {
            component,
            event,
            args,
        };
        let invoked = handlers.len();
        let mut failed = 0;
        for (id, handler) in handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(&context))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    failed += 1;
                    tracing::warn!(target: targets::DISPATCH, %component, event, ?id, error = %err, "event handler failed");
                }
                Err(payload) => {
                    failed += 1;
                    tracing::warn!(
                        target: targets::DISPATCH,
                        %component,
                        event,
                        ?id,
                        panic = panic_message(payload.as_ref()),
                        "event handler panicked"
                    );
                }
            }
        }

        if self.trace_dispatch.load(Ordering::Relaxed) {
            tracing::debug!(target: targets::DISPATCH, %component, event, invoked, failed, "dispatched");
        }
        DispatchResult::Delivered { invoked, failed }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("EventDispatcher")
            .field("handlers", &registry.handlers.len())
            .field("parents", &registry.parents.len())
            .field("owners", &registry.owners.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(EventDispatcher: Send, Sync);

/// Native callback handle for one component.
///
/// Handed to the platform widget at creation; the widget fires it when the
/// user interacts with it.
#[derive(Clone)]
pub struct EventHook {
    dispatcher: Arc<EventDispatcher>,
    component: ComponentId,
}

impl EventHook {
    /// Create a hook raising events on `component`.
    pub fn new(dispatcher: Arc<EventDispatcher>, component: ComponentId) -> Self {
        Self {
            dispatcher,
            component,
        }
    }

    /// The component events are raised on.
    pub fn component(&self) -> ComponentId {
        self.component
    }

    /// Raise an event on the component.
    pub fn fire(&self, event: &str, args: &[PropertyValue]) -> DispatchResult {
        self.dispatcher.dispatch(self.component, event, args)
    }
}

impl std::fmt::Debug for EventHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHook")
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(EventHook: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    struct Gate(AtomicBool);

    impl DispatchDelegate for Gate {
        fn can_dispatch_event(&self, _component: ComponentId, _event: &str) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn Fn(&EventContext<'_>) -> HandlerResult + Send + Sync>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let make = move |tag: &'static str| {
            let sink = sink.clone();
            Box::new(move |_: &EventContext<'_>| {
                sink.lock().push(tag);
                Ok(())
            }) as Box<dyn Fn(&EventContext<'_>) -> HandlerResult + Send + Sync>
        };
        (log, make)
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let dispatcher = EventDispatcher::default();
        let component = ComponentId::next();
        let (log, make) = recorder();
        dispatcher.register(component, "Click", make("a"));
        dispatcher.register(component, "Click", make("b"));
        dispatcher.register(component, "LongClick", make("c"));

        assert_eq!(
            dispatcher.dispatch(component, "Click", &[]),
            DispatchResult::Delivered { invoked: 2, failed: 0 }
        );
        assert_eq!(*log.lock(), ["a", "b"]);
    }

    #[test]
    fn test_unregister() {
        let dispatcher = EventDispatcher::default();
        let component = ComponentId::next();
        let (log, make) = recorder();
        let first = dispatcher.register(component, "Click", make("a"));
        dispatcher.register(component, "Click", make("b"));

        assert!(dispatcher.unregister(first));
        assert!(!dispatcher.unregister(first));
        assert_eq!(dispatcher.handler_count(component, "Click"), 1);
        dispatcher.dispatch(component, "Click", &[]);
        assert_eq!(*log.lock(), ["b"]);

        assert_eq!(dispatcher.unregister_component(component), 1);
        assert_eq!(dispatcher.dispatch(component, "Click", &[]), DispatchResult::Unhandled);
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn test_owner_resolution_walks_parent_chain() {
        let dispatcher = EventDispatcher::default();
        let form = ComponentId::next();
        let menu = ComponentId::next();
        let item = ComponentId::next();
        let gate = Arc::new(Gate(AtomicBool::new(true)));
        dispatcher.set_owner(form, gate.clone());
        dispatcher.set_parent(menu, Some(form));
        dispatcher.set_parent(item, Some(menu));

        assert_eq!(dispatcher.dispatch_owner(item), Some(form));
        assert_eq!(dispatcher.dispatch_owner(form), Some(form));
        assert_eq!(dispatcher.dispatch_owner(ComponentId::next()), None);

        let (log, make) = recorder();
        dispatcher.register(item, "Click", make("item"));
        assert!(dispatcher.dispatch(item, "Click", &[]).was_delivered());

        gate.0.store(false, Ordering::SeqCst);
        assert_eq!(dispatcher.dispatch(item, "Click", &[]), DispatchResult::Refused);
        assert_eq!(*log.lock(), ["item"]);
    }

    #[test]
    fn test_parent_cycle_is_unowned() {
        let dispatcher = EventDispatcher::default();
        let a = ComponentId::next();
        let b = ComponentId::next();
        dispatcher.set_parent(a, Some(b));
        dispatcher.set_parent(b, Some(a));
        assert_eq!(dispatcher.dispatch_owner(a), None);
    }

    #[test]
    fn test_failures_are_isolated() {
        let dispatcher = EventDispatcher::default();
        let component = ComponentId::next();
        let (log, make) = recorder();
        dispatcher.register(component, "Click", |_| Err("boom".into()));
        dispatcher.register(component, "Click", |_| panic!("handler bug"));
        dispatcher.register(component, "Click", make("last"));

        assert_eq!(
            dispatcher.dispatch(component, "Click", &[]),
            DispatchResult::Delivered { invoked: 3, failed: 2 }
        );
        assert_eq!(*log.lock(), ["last"]);
    }

    #[test]
    fn test_handlers_may_reenter() {
        let dispatcher = Arc::new(EventDispatcher::default());
        let component = ComponentId::next();
        let (log, make) = recorder();

        let inner = dispatcher.clone();
        let late = Mutex::new(Some(make("late")));
        dispatcher.register(component, "Click", move |ctx| {
            if let Some(handler) = late.lock().take() {
                inner.register(ctx.component, "Click", handler);
            }
            inner.dispatch(ctx.component, "Echo", ctx.args);
            Ok(())
        });
        dispatcher.register(component, "Echo", make("echo"));

        // The handler registered during dispatch only runs from the next one.
        assert_eq!(
            dispatcher.dispatch(component, "Click", &[]),
            DispatchResult::Delivered { invoked: 1, failed: 0 }
        );
        assert_eq!(*log.lock(), ["echo"]);
        assert_eq!(
            dispatcher.dispatch(component, "Click", &[]),
            DispatchResult::Delivered { invoked: 2, failed: 0 }
        );
        assert_eq!(*log.lock(), ["echo", "echo", "late"]);
    }

    #[test]
    fn test_args_reach_handlers() {
        let dispatcher = EventDispatcher::default();
        let form = ComponentId::next();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        dispatcher.register(form, "OtherScreenClosed", move |ctx| {
            sink.lock().extend(ctx.args.iter().cloned());
            Ok(())
        });

        let args = [PropertyValue::from("Settings"), PropertyValue::from("ok")];
        dispatcher.dispatch(form, "OtherScreenClosed", &args);
        assert_eq!(*seen.lock(), args);
    }

    #[test]
    fn test_clear_and_hook() {
        let dispatcher = Arc::new(EventDispatcher::default());
        let component = ComponentId::next();
        let (log, make) = recorder();
        dispatcher.register(component, "Click", make("hooked"));

        let hook = EventHook::new(dispatcher.clone(), component);
        assert_eq!(hook.component(), component);
        assert!(hook.fire("Click", &[]).was_delivered());
        assert_eq!(*log.lock(), ["hooked"]);

        dispatcher.clear();
        assert_eq!(hook.fire("Click", &[]), DispatchResult::Unhandled);
        assert!(dispatcher.is_empty());
    }
}
