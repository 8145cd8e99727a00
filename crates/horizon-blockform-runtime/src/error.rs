//! Error types for the device runtime.

use horizon_blockform_core::{ComponentId, ComponentType, PropertyError, WidgetApplicationError};

/// Result type alias for form operations.
pub type FormResult<T> = std::result::Result<T, FormError>;

/// Error returned by a user event handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from validating an event before it is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The component is not hosted by the form.
    #[error("Component {0} is not hosted by this form")]
    UnknownComponent(ComponentId),

    /// The component type declares no such event.
    #[error("{component_type} has no event named '{event}'")]
    UnknownEvent {
        component_type: ComponentType,
        event: String,
    },

    /// The argument list does not match the event declaration.
    #[error("Event '{event}' takes {expected} argument(s), got {got}")]
    ArgumentCount {
        event: &'static str,
        expected: usize,
        got: usize,
    },
}

/// Errors from creating a component's platform widget.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaterializeError {
    /// The widget factory could not create the widget.
    #[error("Could not create widget for {component}: {source}")]
    CreationFailed {
        component: ComponentId,
        #[source]
        source: WidgetApplicationError,
    },
}

/// Errors from hosting components on a form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// The component type is not in the catalog.
    #[error("Component type '{0}' is not registered")]
    UnknownType(ComponentType),

    /// The component is not hosted by the form.
    #[error("Component {0} is not hosted by this form")]
    UnknownComponent(ComponentId),

    /// A component with this identity is already hosted.
    #[error("Component {0} is already hosted by this form")]
    DuplicateComponent(ComponentId),

    /// The component is of the wrong type for the requested view.
    #[error("Component {component} is a {actual}, not a {expected}")]
    WrongType {
        component: ComponentId,
        expected: ComponentType,
        actual: ComponentType,
    },

    /// The form has been torn down.
    #[error("Form has been torn down")]
    TornDown,

    /// A property write was invalid for the component's type.
    #[error(transparent)]
    Property(#[from] PropertyError),
}
