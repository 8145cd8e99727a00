//! Runtime lifecycle of one component.
//!
//! A [`ComponentLifecycle`] owns the component's [`PropertyStore`] and, once
//! materialized, its platform widget. The store is always the source of
//! truth:
//!
//! - Before the widget exists, writes are only stored. They are replayed
//!   when the widget is created.
//! - Once it exists, writes are stored first and then pushed to the widget.
//!   A widget that rejects a value is logged; the stored value stands.
//! - Reads never consult the widget.
//!
//! # Replay Order
//!
//! At materialization the widget is created with the type's primary content
//! property (a menu item's text), then every other property is applied in
//! the order given by [`PropertyStore::replay_plan`]: defaults of unwritten
//! properties, written properties in first-write order, and finally the
//! properties that only make sense once the content is in place (a menu
//! item's `ShowOnActionBar`).

use std::collections::HashMap;
use std::sync::Arc;

use horizon_blockform_core::logging::{span_names, targets};
use horizon_blockform_core::{
    AssetLoadError, ComponentDescriptor, ComponentId, PropertyDescriptor, PropertyError,
    PropertyStore, PropertyType, PropertyValue, WidgetApplicationError,
};

use crate::asset::{Asset, AssetLoader, AssetSlot, AssetUpdate};
use crate::dispatch::EventHook;
use crate::error::MaterializeError;
use crate::widget::{PlatformWidget, WidgetFactory, WidgetRequest};

/// Why a property did not reach the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyFailure {
    /// The widget rejected the value.
    Widget(WidgetApplicationError),
    /// The asset could not be loaded.
    Asset(AssetLoadError),
}

/// What a materialization did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// An existing widget was replaced.
    pub replaced: bool,
    /// Properties successfully pushed to the widget, the primary one included.
    pub applied: usize,
    /// Properties that did not reach the widget.
    pub failures: Vec<(&'static str, ApplyFailure)>,
}

impl MaterializeReport {
    /// Whether every property reached the widget.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A component's property store plus its (optional) platform widget.
pub struct ComponentLifecycle {
    id: ComponentId,
    store: PropertyStore,
    widget: Option<Box<dyn PlatformWidget>>,
    assets: HashMap<&'static str, AssetSlot>,
    loader: Arc<dyn AssetLoader>,
    hook: EventHook,
    escalate_after: Option<u32>,
}

impl ComponentLifecycle {
    /// Create an unmaterialized component with every property at its default.
    pub fn new(
        id: ComponentId,
        descriptor: &'static ComponentDescriptor,
        loader: Arc<dyn AssetLoader>,
        hook: EventHook,
    ) -> Self {
        Self {
            id,
            store: PropertyStore::new(descriptor),
            widget: None,
            assets: HashMap::new(),
            loader,
            hook,
            escalate_after: None,
        }
    }

    /// Log repeated asset failures at error level after this many in a row.
    pub fn with_asset_failure_escalation(mut self, threshold: Option<u32>) -> Self {
        self.escalate_after = threshold;
        self
    }

    /// The component identity.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The component's type declaration.
    pub fn descriptor(&self) -> &'static ComponentDescriptor {
        self.store.descriptor()
    }

    /// The property store.
    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    /// Whether a platform widget currently exists.
    pub fn is_materialized(&self) -> bool {
        self.widget.is_some()
    }

    /// The asset currently displayed for an asset-valued property.
    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.get(name).and_then(AssetSlot::current)
    }

    /// The asset cache of an asset-valued property, once it has been written.
    pub fn asset_slot(&self, name: &str) -> Option<&AssetSlot> {
        self.assets.get(name)
    }

    /// The last stored value of a property, or its declared default.
    pub fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        self.store.get(name)
    }

    /// Store a property value and push it to the widget if there is one.
    ///
    /// Only invalid writes (unknown name, wrong type, read-only) fail. A
    /// widget that rejects the value is logged and the stored value is kept.
    /// Asset paths are resolved right away, widget or not.
    ///
    /// Returns the previous effective value when it changed.
    pub fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<Option<PropertyValue>, PropertyError> {
        let (property, value) = self.store.validate(name, value)?;
        let previous = self.store.set(property.name, value.clone())?;

        if property.ty == PropertyType::Asset {
            let path = value.as_str().unwrap_or_default();
            let update = self.assets.entry(property.name).or_default().update(
                path,
                self.loader.as_ref(),
                self.escalate_after,
            );
            if let (AssetUpdate::Loaded(asset), Some(widget)) = (update, self.widget.as_mut()) {
                if let Err(err) = widget.apply_asset(property, &asset) {
                    log_rejected(self.id, property, &err);
                }
            }
        } else if let Some(widget) = self.widget.as_mut() {
            if let Err(err) = widget.apply_property(property, &value) {
                log_rejected(self.id, property, &err);
            }
        } else {
            tracing::trace!(target: targets::LIFECYCLE, component = %self.id, property = property.name, "buffered until materialized");
        }
        Ok(previous)
    }

    /// Create the widget and replay every property into it.
    ///
    /// On an already materialized component the widget is replaced by a new
    /// one and the full current state is applied again. If the factory fails
    /// the component keeps whatever widget it had.
    pub fn materialize(&mut self, factory: &dyn WidgetFactory) -> Result<MaterializeReport, MaterializeError> {
        let span = tracing::debug_span!(target: targets::LIFECYCLE, span_names::MATERIALIZE, component = %self.id);
        let _entered = span.enter();

        let descriptor = self.descriptor();
        let primary = descriptor
            .primary_property
            .and_then(|name| descriptor.property(name))
            .map(|property| {
                let value = self.store.get(property.name).unwrap_or_else(|_| property.default_value());
                (property, value)
            });

        let request = WidgetRequest {
            component: self.id,
            descriptor,
            primary: primary.as_ref().map(|(property, value)| (*property, value)),
            hook: self.hook.clone(),
        };
        let mut widget = factory.create(request).map_err(|source| {
            tracing::warn!(target: targets::LIFECYCLE, component = %self.id, error = %source, "widget creation failed");
            MaterializeError::CreationFailed {
                component: self.id,
                source,
            }
        })?;

        let mut report = MaterializeReport {
            applied: usize::from(primary.is_some()),
            ..MaterializeReport::default()
        };
        let primary_name = primary.map(|(property, _)| property.name);

        for (property, value) in self.store.replay_plan() {
            if Some(property.name) == primary_name {
                continue;
            }
            let result = if property.ty == PropertyType::Asset {
                self.replay_asset(widget.as_mut(), property, &value)
            } else {
                widget
                    .apply_property(property, &value)
                    .map(|()| true)
                    .map_err(ApplyFailure::Widget)
            };
            match result {
                Ok(true) => report.applied += 1,
                Ok(false) => {}
                Err(failure) => {
                    if let ApplyFailure::Widget(err) = &failure {
                        log_rejected(self.id, property, err);
                    }
                    report.failures.push((property.name, failure));
                }
            }
        }

        report.replaced = self.widget.replace(widget).is_some();
        tracing::debug!(
            target: targets::LIFECYCLE,
            component = %self.id,
            replaced = report.replaced,
            applied = report.applied,
            failed = report.failures.len(),
            "materialized"
        );
        Ok(report)
    }

    /// Resolve an asset property and show whatever is loaded on a fresh
    /// widget. Returns whether an asset was applied.
    fn replay_asset(
        &mut self,
        widget: &mut dyn PlatformWidget,
        property: &'static PropertyDescriptor,
        value: &PropertyValue,
    ) -> Result<bool, ApplyFailure> {
        let path = value.as_str().unwrap_or_default();
        let slot = self.assets.entry(property.name).or_default();
        let update = slot.update(path, self.loader.as_ref(), self.escalate_after);
        if let AssetUpdate::Failed(err) = update {
            if let Some(asset) = slot.current() {
                widget.apply_asset(property, asset).map_err(ApplyFailure::Widget)?;
            }
            return Err(ApplyFailure::Asset(err));
        }
        match slot.current() {
            Some(asset) => widget.apply_asset(property, asset).map(|()| true).map_err(ApplyFailure::Widget),
            None => Ok(false),
        }
    }

    /// Drop the widget. The store and asset caches survive, so a later
    /// materialization restores the same state.
    pub fn teardown(&mut self) -> bool {
        let had_widget = self.widget.take().is_some();
        if had_widget {
            tracing::debug!(target: targets::LIFECYCLE, component = %self.id, "widget destroyed");
        }
        had_widget
    }

    /// Raise an event on this component through its hook.
    pub fn hook(&self) -> &EventHook {
        &self.hook
    }
}

fn log_rejected(component: ComponentId, property: &PropertyDescriptor, err: &WidgetApplicationError) {
    tracing::warn!(
        target: targets::LIFECYCLE,
        %component,
        property = property.name,
        error = %err,
        "widget did not accept property; keeping stored value"
    );
}

impl std::fmt::Debug for ComponentLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentLifecycle")
            .field("id", &self.id)
            .field("type", &self.descriptor().ty)
            .field("materialized", &self.is_materialized())
            .finish_non_exhaustive()
    }
}
