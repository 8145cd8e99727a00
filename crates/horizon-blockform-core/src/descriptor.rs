//! Property and event descriptor tables.
//!
//! Every component type declares its properties and events up front in a
//! [`ComponentDescriptor`]. The tables are plain `'static` data, so the
//! designer, the runtime and any code generator all read the same
//! declaration without runtime introspection.

use crate::id::ComponentType;
use crate::logging::targets;
use crate::value::{PropertyType, PropertyValue};

/// Grouping used by the designer's property panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PropertyCategory {
    /// How the component looks.
    #[default]
    Appearance,
    /// How the component reacts.
    Behavior,
    /// Rarely changed settings.
    Advanced,
}

/// When a property is applied relative to the others during materialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApplyPhase {
    /// Applied in declaration order with the component's content.
    #[default]
    Content,
    /// Applied after every `Content` property. Some platform setters only
    /// work once the widget already carries its primary content.
    AfterContent,
}

/// Declaration of one property of a component type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// The property name as used in blocks and the designer.
    pub name: &'static str,
    /// The declared value type.
    pub ty: PropertyType,
    /// The default in designer notation (`"True"`, `""`, `"&HFF000000"`).
    pub default: &'static str,
    /// Property panel grouping.
    pub category: PropertyCategory,
    /// Application ordering during materialization.
    pub phase: ApplyPhase,
    /// Whether writes are rejected.
    pub read_only: bool,
    /// Help text shown in the designer.
    pub description: &'static str,
}

impl PropertyDescriptor {
    /// Declare a writable content property.
    pub const fn new(name: &'static str, ty: PropertyType, default: &'static str) -> Self {
        Self {
            name,
            ty,
            default,
            category: PropertyCategory::Appearance,
            phase: ApplyPhase::Content,
            read_only: false,
            description: "",
        }
    }

    /// Set the property panel category.
    pub const fn category(mut self, category: PropertyCategory) -> Self {
        self.category = category;
        self
    }

    /// Apply this property after all content properties.
    pub const fn after_content(mut self) -> Self {
        self.phase = ApplyPhase::AfterContent;
        self
    }

    /// Mark the property read-only.
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Attach help text.
    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// The parsed default value.
    ///
    /// Catalog registration rejects unparsable defaults, so for registered
    /// types this always returns the declared default. Unregistered tables fall
    /// back to the type's empty value.
    pub fn default_value(&self) -> PropertyValue {
        PropertyValue::parse(self.ty, self.default).unwrap_or_else(|err| {
            tracing::warn!(
                target: targets::DESCRIPTOR,
                property = self.name,
                %err,
                "unparsable default, using empty value"
            );
            empty_value(self.ty)
        })
    }
}

fn empty_value(ty: PropertyType) -> PropertyValue {
    match ty {
        PropertyType::Text => PropertyValue::Text(String::new()),
        PropertyType::Asset => PropertyValue::Asset(String::new()),
        PropertyType::Boolean => PropertyValue::Boolean(false),
        PropertyType::Integer => PropertyValue::Integer(0),
        PropertyType::Float => PropertyValue::Float(0.0),
        PropertyType::Color => PropertyValue::Color(0),
    }
}

/// Declaration of one event parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamDescriptor {
    /// Parameter name as shown on the event block.
    pub name: &'static str,
    /// Parameter type.
    pub ty: PropertyType,
}

/// Declaration of one event a component type can raise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventDescriptor {
    /// The event name (`"Click"`).
    pub name: &'static str,
    /// Ordered parameters passed to handlers.
    pub params: &'static [ParamDescriptor],
    /// Help text shown in the blocks editor.
    pub description: &'static str,
}

/// Structural shape of a component in the mock tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentShape {
    /// No children.
    Leaf,
    /// Ordered children.
    Container,
    /// Ordered children plus an open/closed display flag.
    Menu,
}

impl ComponentShape {
    /// Whether nodes of this shape hold children.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Container | Self::Menu)
    }
}

/// Declaration of a component type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentDescriptor {
    /// The type tag.
    pub ty: ComponentType,
    /// Mock tree shape.
    pub shape: ComponentShape,
    /// Property the platform widget is created with, if any.
    ///
    /// A menu entry, for instance, cannot exist on the platform without its
    /// label, so its text is handed to the widget factory.
    pub primary_property: Option<&'static str>,
    /// Declared properties in declaration order.
    pub properties: &'static [PropertyDescriptor],
    /// Declared events.
    pub events: &'static [EventDescriptor],
    /// Palette help text.
    pub description: &'static str,
}

impl ComponentDescriptor {
    /// Look up a property declaration.
    pub fn property(&self, name: &str) -> Option<&'static PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Look up an event declaration.
    pub fn event(&self, name: &str) -> Option<&'static EventDescriptor> {
        self.events.iter().find(|e| e.name == name)
    }

    /// Position of a property in declaration order.
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    /// Whether this type holds children.
    pub fn is_container(&self) -> bool {
        self.shape.is_container()
    }
}
