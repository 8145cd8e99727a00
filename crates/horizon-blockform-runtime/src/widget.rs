//! The platform widget seam.
//!
//! The runtime never talks to a UI toolkit directly. A host supplies a
//! [`WidgetFactory`] that creates one [`PlatformWidget`] per component when
//! the form is ready; the lifecycle then pushes property values and loaded
//! assets into it.

use horizon_blockform_core::{
    ComponentDescriptor, ComponentId, PropertyDescriptor, PropertyValue, WidgetApplicationError,
};

use crate::asset::Asset;
use crate::dispatch::EventHook;

/// A native widget backing one component.
pub trait PlatformWidget {
    /// Apply a plain property value.
    ///
    /// A rejected value leaves the widget showing its previous state.
    fn apply_property(
        &mut self,
        property: &PropertyDescriptor,
        value: &PropertyValue,
    ) -> Result<(), WidgetApplicationError>;

    /// Display a loaded asset for an asset-valued property.
    fn apply_asset(&mut self, property: &PropertyDescriptor, asset: &Asset) -> Result<(), WidgetApplicationError> {
        let _ = asset;
        Err(WidgetApplicationError::unsupported(property.name))
    }
}

/// Everything a factory needs to create a widget.
pub struct WidgetRequest<'a> {
    /// The component the widget will back.
    pub component: ComponentId,
    /// The component's type declaration.
    pub descriptor: &'static ComponentDescriptor,
    /// Value of the type's primary content property, if it has one.
    pub primary: Option<(&'static PropertyDescriptor, &'a PropertyValue)>,
    /// Native callback handle; firing it dispatches an event for the component.
    pub hook: EventHook,
}

/// Creates platform widgets.
pub trait WidgetFactory {
    /// Create the widget for a component.
    fn create(&self, request: WidgetRequest<'_>) -> Result<Box<dyn PlatformWidget>, WidgetApplicationError>;
}

impl<F> WidgetFactory for F
where
    F: Fn(WidgetRequest<'_>) -> Result<Box<dyn PlatformWidget>, WidgetApplicationError>,
{
    fn create(&self, request: WidgetRequest<'_>) -> Result<Box<dyn PlatformWidget>, WidgetApplicationError> {
        self(request)
    }
}
