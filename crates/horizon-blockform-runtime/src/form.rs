//! The hosting form: one screen of a running app.
//!
//! A [`Form`] hosts the runtime side of every component on a screen. It is
//! the dispatch owner of its components, so events raised on them are
//! refused once the form has been torn down.
//!
//! Components are materialized lazily. [`Form::add_component`] only creates
//! the lifecycle and subscribes it to the host-ready event; widgets are made
//! when the platform host calls [`Form::on_host_ready`], in subscription
//! order. Calling it again (the platform rebuilding its menu, for instance)
//! resyncs every widget from its store.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_blockform_core::{
//!     AssetLoadError, BlockformConfig, ComponentCatalog, ComponentType, PropertyDescriptor,
//!     PropertyValue, WidgetApplicationError,
//! };
//! use horizon_blockform_runtime::{
//!     Asset, EventDispatcher, Form, PlatformWidget, WidgetRequest,
//! };
//!
//! struct NullWidget;
//! impl PlatformWidget for NullWidget {
//!     fn apply_property(&mut self, _: &PropertyDescriptor, _: &PropertyValue) -> Result<(), WidgetApplicationError> {
//!         Ok(())
//!     }
//! }
//! fn create(_: WidgetRequest<'_>) -> Result<Box<dyn PlatformWidget>, WidgetApplicationError> {
//!     Ok(Box::new(NullWidget))
//! }
//! fn load(path: &str) -> Result<Asset, AssetLoadError> {
//!     Err(AssetLoadError::NotFound { path: path.to_string() })
//! }
//!
//! let config = BlockformConfig::default();
//! let dispatcher = EventDispatcher::shared(&config);
//! let mut form = Form::new(
//!     Arc::new(ComponentCatalog::standard()),
//!     dispatcher.clone(),
//!     Arc::new(load),
//!     &config,
//! );
//!
//! let menu = form.add_component(ComponentType::MENU, None).unwrap();
//! let item = form.add_component(ComponentType::MENU_ITEM, Some(menu)).unwrap();
//! form.set_property(item, "Text", "Save".into()).unwrap();
//!
//! let report = form.on_host_ready(&create).unwrap();
//! assert_eq!(report.materialized, 2);
//! assert_eq!(dispatcher.dispatch_owner(item), Some(form.id()));
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_blockform_core::logging::{span_names, targets};
use horizon_blockform_core::{
    BlockformConfig, ComponentCatalog, ComponentDescriptor, ComponentId, ComponentType, PerfSpan,
    PropertyValue, ThreadAffinity,
};

use crate::asset::AssetLoader;
use crate::dispatch::{DispatchDelegate, DispatchResult, EventDispatcher, EventHook};
use crate::error::{DispatchError, FormError, FormResult, MaterializeError};
use crate::lifecycle::ComponentLifecycle;
use crate::menu_item::MenuItem;
use crate::widget::WidgetFactory;

/// Dispatch owner registered on behalf of a form.
#[derive(Debug)]
struct FormGate {
    alive: AtomicBool,
}

impl DispatchDelegate for FormGate {
    fn can_dispatch_event(&self, _component: ComponentId, _event: &str) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

/// Outcome of [`Form::on_host_ready`].
#[derive(Debug, Default)]
pub struct HostReport {
    /// Components whose widget now exists.
    pub materialized: usize,
    /// Components whose widget could not be created.
    pub failed: Vec<MaterializeError>,
}

/// One screen hosting runtime components.
pub struct Form {
    id: ComponentId,
    catalog: Arc<ComponentCatalog>,
    dispatcher: Arc<EventDispatcher>,
    loader: Arc<dyn AssetLoader>,
    components: HashMap<ComponentId, ComponentLifecycle>,
    /// Components to materialize on host-ready, in subscription order.
    host_ready: Vec<ComponentId>,
    gate: Arc<FormGate>,
    escalate_after: Option<u32>,
    affinity: ThreadAffinity,
}

impl Form {
    /// Create a form and register it as a dispatch owner.
    pub fn new(
        catalog: Arc<ComponentCatalog>,
        dispatcher: Arc<EventDispatcher>,
        loader: Arc<dyn AssetLoader>,
        config: &BlockformConfig,
    ) -> Self {
        let id = ComponentId::next();
        let gate = Arc::new(FormGate {
            alive: AtomicBool::new(true),
        });
        dispatcher.set_owner(id, gate.clone());
        tracing::debug!(target: targets::FORM, form = %id, "form created");
        Self {
            id,
            catalog,
            dispatcher,
            loader,
            components: HashMap::new(),
            host_ready: Vec::new(),
            gate,
            escalate_after: config.asset_failure_escalation,
            affinity: config.affinity(),
        }
    }

    /// The form's own identity; events raised on the form itself use it.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The dispatcher this form routes events through.
    pub fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.dispatcher
    }

    /// Whether [`teardown`](Self::teardown) has been called.
    pub fn is_torn_down(&self) -> bool {
        !self.gate.alive.load(Ordering::Acquire)
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Host a new component of type `ty` under `parent` (default: the form).
    pub fn add_component(&mut self, ty: ComponentType, parent: Option<ComponentId>) -> FormResult<ComponentId> {
        self.add_component_with_id(ComponentId::next(), ty, parent)
    }

    /// Host a component under an existing identity, such as the one its
    /// designer node carries.
    pub fn add_component_with_id(
        &mut self,
        id: ComponentId,
        ty: ComponentType,
        parent: Option<ComponentId>,
    ) -> FormResult<ComponentId> {
        self.affinity.assert_same_thread();
        if self.is_torn_down() {
            return Err(FormError::TornDown);
        }
        let descriptor = self.catalog.get(ty).ok_or(FormError::UnknownType(ty))?;
        if id == self.id || self.components.contains_key(&id) {
            return Err(FormError::DuplicateComponent(id));
        }
        let parent = parent.unwrap_or(self.id);
        if parent != self.id && !self.components.contains_key(&parent) {
            return Err(FormError::UnknownComponent(parent));
        }

        let hook = EventHook::new(self.dispatcher.clone(), id);
        let lifecycle = ComponentLifecycle::new(id, descriptor, self.loader.clone(), hook)
            .with_asset_failure_escalation(self.escalate_after);
        self.dispatcher.set_parent(id, Some(parent));
        self.components.insert(id, lifecycle);
        self.host_ready.push(id);
        tracing::debug!(target: targets::FORM, form = %self.id, component = %id, %ty, %parent, "component added");
        Ok(id)
    }

    /// Stop hosting a component and every component below it.
    ///
    /// Their widgets are destroyed and their handlers unregistered.
    pub fn remove_component(&mut self, id: ComponentId) -> FormResult<usize> {
        self.affinity.assert_same_thread();
        if !self.components.contains_key(&id) {
            return Err(FormError::UnknownComponent(id));
        }
        let doomed: Vec<ComponentId> = self
            .host_ready
            .iter()
            .copied()
            .filter(|&candidate| self.is_within(candidate, id))
            .collect();
        for &component in &doomed {
            if let Some(mut lifecycle) = self.components.remove(&component) {
                lifecycle.teardown();
            }
            self.dispatcher.unregister_component(component);
        }
        self.host_ready.retain(|component| !doomed.contains(component));
        tracing::debug!(target: targets::FORM, form = %self.id, component = %id, removed = doomed.len(), "component removed");
        Ok(doomed.len())
    }

    /// Whether `component` is `ancestor` or hosted somewhere below it.
    fn is_within(&self, component: ComponentId, ancestor: ComponentId) -> bool {
        let mut current = Some(component);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if id == self.id {
                return false;
            }
            current = self.dispatcher.parent(id);
        }
        false
    }

    /// A hosted component's lifecycle.
    pub fn component(&self, id: ComponentId) -> Option<&ComponentLifecycle> {
        self.components.get(&id)
    }

    /// Hosted components in subscription order.
    pub fn components(&self) -> impl Iterator<Item = &ComponentLifecycle> + '_ {
        self.host_ready.iter().filter_map(|id| self.components.get(id))
    }

    /// Number of hosted components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the form hosts no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Typed view of a hosted menu item.
    pub fn menu_item(&mut self, id: ComponentId) -> FormResult<MenuItem<'_>> {
        let actual = self
            .components
            .get(&id)
            .map(|lifecycle| lifecycle.descriptor().ty)
            .ok_or(FormError::UnknownComponent(id))?;
        if actual != ComponentType::MENU_ITEM {
            return Err(FormError::WrongType {
                component: id,
                expected: ComponentType::MENU_ITEM,
                actual,
            });
        }
        Ok(MenuItem::new(self, id))
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Write a property of a hosted component.
    pub fn set_property(
        &mut self,
        id: ComponentId,
        name: &str,
        value: PropertyValue,
    ) -> FormResult<Option<PropertyValue>> {
        self.affinity.assert_same_thread();
        let lifecycle = self.components.get_mut(&id).ok_or(FormError::UnknownComponent(id))?;
        Ok(lifecycle.set_property(name, value)?)
    }

    /// Read a property of a hosted component.
    pub fn property(&self, id: ComponentId, name: &str) -> FormResult<PropertyValue> {
        let lifecycle = self.components.get(&id).ok_or(FormError::UnknownComponent(id))?;
        Ok(lifecycle.get_property(name)?)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// The platform is ready for widgets: materialize every subscribed
    /// component in subscription order.
    ///
    /// A component whose widget cannot be created is reported and skipped;
    /// the others are still materialized.
    pub fn on_host_ready(&mut self, factory: &dyn WidgetFactory) -> FormResult<HostReport> {
        self.affinity.assert_same_thread();
        if self.is_torn_down() {
            return Err(FormError::TornDown);
        }
        let _span = PerfSpan::new(span_names::HOST_READY);

        let mut report = HostReport::default();
        for id in &self.host_ready {
            let Some(lifecycle) = self.components.get_mut(id) else {
                continue;
            };
            match lifecycle.materialize(factory) {
                Ok(_) => report.materialized += 1,
                Err(err) => report.failed.push(err),
            }
        }
        tracing::debug!(
            target: targets::FORM,
            form = %self.id,
            materialized = report.materialized,
            failed = report.failed.len(),
            "host ready"
        );
        Ok(report)
    }

    /// Destroy every widget and refuse all further dispatch.
    ///
    /// Stores survive; handlers stay registered but are no longer reached.
    pub fn teardown(&mut self) {
        self.affinity.assert_same_thread();
        self.gate.alive.store(false, Ordering::Release);
        let mut destroyed = 0;
        for lifecycle in self.components.values_mut() {
            if lifecycle.teardown() {
                destroyed += 1;
            }
        }
        tracing::debug!(target: targets::FORM, form = %self.id, destroyed, "form torn down");
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Raise an event on a hosted component (or the form itself).
    ///
    /// The event name and argument count are checked against the
    /// component's declaration before dispatch.
    pub fn fire_event(
        &self,
        component: ComponentId,
        event: &str,
        args: &[PropertyValue],
    ) -> Result<DispatchResult, DispatchError> {
        let descriptor = self
            .descriptor_of(component)
            .ok_or(DispatchError::UnknownComponent(component))?;
        let declared = descriptor.event(event).ok_or_else(|| DispatchError::UnknownEvent {
            component_type: descriptor.ty,
            event: event.to_string(),
        })?;
        if declared.params.len() != args.len() {
            return Err(DispatchError::ArgumentCount {
                event: declared.name,
                expected: declared.params.len(),
                got: args.len(),
            });
        }
        Ok(self.dispatcher.dispatch(component, declared.name, args))
    }

    fn descriptor_of(&self, component: ComponentId) -> Option<&'static ComponentDescriptor> {
        if component == self.id {
            self.catalog.get(ComponentType::FORM)
        } else {
            self.components.get(&component).map(ComponentLifecycle::descriptor)
        }
    }
}

impl Drop for Form {
    fn drop(&mut self) {
        for id in self.host_ready.drain(..) {
            self.dispatcher.unregister_component(id);
        }
        self.dispatcher.unregister_component(self.id);
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("id", &self.id)
            .field("components", &self.components.len())
            .field("torn_down", &self.is_torn_down())
            .finish_non_exhaustive()
    }
}
