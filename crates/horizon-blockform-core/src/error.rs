//! Error types shared by the designer and runtime crates.

use crate::value::PropertyType;

/// Errors raised when a property write or lookup is invalid for a component type.
///
/// These are caller errors detected against the type's descriptor table. They
/// are reported before the store is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    /// The component type declares no property with this name.
    #[error("Component type '{component_type}' has no property '{name}'")]
    NotFound {
        component_type: &'static str,
        name: String,
    },

    /// The value's type does not match the declared property type.
    #[error("Property '{name}' expects {expected}, got {got}")]
    TypeMismatch {
        name: String,
        expected: PropertyType,
        got: PropertyType,
    },

    /// The property cannot be written.
    #[error("Property '{name}' is read-only")]
    ReadOnly { name: String },

    /// A textual value could not be parsed as the requested type.
    #[error("Invalid {expected} value '{text}'")]
    InvalidValue { expected: PropertyType, text: String },
}

/// A property could not be applied to a live platform widget.
///
/// Always recovered locally: the stored value is kept and the widget keeps its
/// previously rendered state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetApplicationError {
    /// The widget rejected the value.
    #[error("Widget rejected property '{property}': {message}")]
    Rejected { property: String, message: String },

    /// The widget has no setter for this property.
    #[error("Widget does not support property '{property}'")]
    Unsupported { property: String },

    /// The platform could not create the widget at all.
    #[error("Failed to create widget for '{component_type}': {message}")]
    CreationFailed {
        component_type: &'static str,
        message: String,
    },
}

impl WidgetApplicationError {
    /// Create a rejection error.
    pub fn rejected(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            property: property.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-property error.
    pub fn unsupported(property: impl Into<String>) -> Self {
        Self::Unsupported {
            property: property.into(),
        }
    }
}

/// An asset-valued property could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetLoadError {
    /// No asset exists at the path.
    #[error("Asset '{path}' not found")]
    NotFound { path: String },

    /// The asset exists but could not be decoded.
    #[error("Asset '{path}' is malformed: {message}")]
    Malformed { path: String, message: String },

    /// The asset source could not be read.
    #[error("Unable to load asset '{path}': {message}")]
    Unavailable { path: String, message: String },
}

impl AssetLoadError {
    /// The path that failed to load.
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path }
            | Self::Malformed { path, .. }
            | Self::Unavailable { path, .. } => path,
        }
    }
}

/// Configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML source was invalid.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_error_display() {
        let err = PropertyError::TypeMismatch {
            name: "Enabled".into(),
            expected: PropertyType::Boolean,
            got: PropertyType::Text,
        };
        assert_eq!(err.to_string(), "Property 'Enabled' expects boolean, got text");
    }

    #[test]
    fn test_asset_error_path() {
        let err = AssetLoadError::Malformed {
            path: "save.png".into(),
            message: "truncated".into(),
        };
        assert_eq!(err.path(), "save.png");
        assert!(err.to_string().contains("truncated"));
    }
}
