//! The component catalog: every component type known to the process.
//!
//! The catalog is built once at startup, either from the standard set of
//! components or extended with custom descriptors, and then shared by
//! reference with the designer and the runtime.

use std::collections::HashMap;

use crate::descriptor::{
    ComponentDescriptor, ComponentShape, EventDescriptor, ParamDescriptor, PropertyCategory,
    PropertyDescriptor,
};
use crate::error::PropertyError;
use crate::id::ComponentType;
use crate::logging::targets;
use crate::value::{PropertyType, PropertyValue};

/// Standard component declarations.
pub mod builtin {
    use super::*;

    /// The top-level screen.
    pub static FORM: ComponentDescriptor = ComponentDescriptor {
        ty: ComponentType::FORM,
        shape: ComponentShape::Container,
        primary_property: None,
        properties: &[
            PropertyDescriptor::new("Title", PropertyType::Text, "Screen1"),
            PropertyDescriptor::new("BackgroundColor", PropertyType::Color, "&HFFFFFFFF"),
        ],
        events: &[
            EventDescriptor {
                name: "Initialize",
                params: &[],
                description: "Screen starting",
            },
            EventDescriptor {
                name: "OtherScreenClosed",
                params: &[
                    ParamDescriptor {
                        name: "otherScreenName",
                        ty: PropertyType::Text,
                    },
                    ParamDescriptor {
                        name: "result",
                        ty: PropertyType::Text,
                    },
                ],
                description: "Event raised when another screen has closed and control has \
                              returned to this screen.",
            },
        ],
        description: "Top-level component containing all other components.",
    };

    /// Menu-like container of menu items.
    pub static MENU: ComponentDescriptor = ComponentDescriptor {
        ty: ComponentType::MENU,
        shape: ComponentShape::Menu,
        primary_property: None,
        properties: &[PropertyDescriptor::new("Visible", PropertyType::Boolean, "True")],
        events: &[],
        description: "A menu holding Menu Item components.",
    };

    /// A single menu entry.
    pub static MENU_ITEM: ComponentDescriptor = ComponentDescriptor {
        ty: ComponentType::MENU_ITEM,
        shape: ComponentShape::Leaf,
        primary_property: Some("Text"),
        properties: &[
            PropertyDescriptor::new("Text", PropertyType::Text, "")
                .describe("Text displayed by the menu item."),
            PropertyDescriptor::new("Icon", PropertyType::Asset, "")
                .describe("Icon to display before menu item text."),
            PropertyDescriptor::new("Enabled", PropertyType::Boolean, "True")
                .category(PropertyCategory::Behavior)
                .describe("If true, user can tap menu item to cause action."),
            PropertyDescriptor::new("Visible", PropertyType::Boolean, "True")
                .describe("Whether the menu item is showing or hidden from the menu."),
            PropertyDescriptor::new("ShowOnActionBar", PropertyType::Boolean, "False")
                .after_content()
                .describe(
                    "If true, the item appears as an icon on the action bar when there is room; \
                     otherwise it always appears as text in the overflow menu.",
                ),
        ],
        events: &[EventDescriptor {
            name: "Click",
            params: &[],
            description: "Event raised when user selects this menu item.",
        }],
        description: "A Menu Item can only be placed inside Menu components. It shows its Text \
                      in the options menu, or its Icon when shown on the action bar.",
    };

    /// Push button.
    pub static BUTTON: ComponentDescriptor = ComponentDescriptor {
        ty: ComponentType::BUTTON,
        shape: ComponentShape::Leaf,
        primary_property: None,
        properties: &[
            PropertyDescriptor::new("Text", PropertyType::Text, "Text for Button1"),
            PropertyDescriptor::new("Image", PropertyType::Asset, ""),
            PropertyDescriptor::new("Enabled", PropertyType::Boolean, "True")
                .category(PropertyCategory::Behavior),
            PropertyDescriptor::new("Visible", PropertyType::Boolean, "True"),
            PropertyDescriptor::new("BackgroundColor", PropertyType::Color, "&HFFDDDDDD"),
        ],
        events: &[
            EventDescriptor {
                name: "Click",
                params: &[],
                description: "User tapped and released the button.",
            },
            EventDescriptor {
                name: "LongClick",
                params: &[],
                description: "User held the button down.",
            },
        ],
        description: "Button with the ability to detect clicks.",
    };

    /// Static text.
    pub static LABEL: ComponentDescriptor = ComponentDescriptor {
        ty: ComponentType::LABEL,
        shape: ComponentShape::Leaf,
        primary_property: None,
        properties: &[
            PropertyDescriptor::new("Text", PropertyType::Text, "Text for Label1"),
            PropertyDescriptor::new("FontSize", PropertyType::Float, "14.0"),
            PropertyDescriptor::new("TextColor", PropertyType::Color, "&HFF000000"),
            PropertyDescriptor::new("Visible", PropertyType::Boolean, "True"),
            PropertyDescriptor::new("HasMargins", PropertyType::Boolean, "True")
                .category(PropertyCategory::Advanced),
        ],
        events: &[],
        description: "A Label displays a piece of text.",
    };

    const ARRANGEMENT_PROPERTIES: &[PropertyDescriptor] = &[
        PropertyDescriptor::new("Visible", PropertyType::Boolean, "True"),
        PropertyDescriptor::new("BackgroundColor", PropertyType::Color, "&H00000000"),
    ];

    /// Left-to-right layout container.
    pub static HORIZONTAL_ARRANGEMENT: ComponentDescriptor = ComponentDescriptor {
        ty: ComponentType::HORIZONTAL_ARRANGEMENT,
        shape: ComponentShape::Container,
        primary_property: None,
        properties: ARRANGEMENT_PROPERTIES,
        events: &[],
        description: "A formatting element in which to place components left to right.",
    };

    /// Top-to-bottom layout container.
    pub static VERTICAL_ARRANGEMENT: ComponentDescriptor = ComponentDescriptor {
        ty: ComponentType::VERTICAL_ARRANGEMENT,
        shape: ComponentShape::Container,
        primary_property: None,
        properties: ARRANGEMENT_PROPERTIES,
        events: &[],
        description: "A formatting element in which to place components top to bottom.",
    };

    /// All standard descriptors in palette order.
    pub static ALL: &[&ComponentDescriptor] = &[
        &FORM,
        &MENU,
        &MENU_ITEM,
        &BUTTON,
        &LABEL,
        &HORIZONTAL_ARRANGEMENT,
        &VERTICAL_ARRANGEMENT,
    ];
}

/// Registry of component descriptors keyed by type tag.
#[derive(Debug, Default, Clone)]
pub struct ComponentCatalog {
    types: HashMap<ComponentType, &'static ComponentDescriptor>,
    order: Vec<ComponentType>,
}

impl ComponentCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding the standard components.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for descriptor in builtin::ALL {
            catalog.insert(descriptor);
        }
        catalog
    }

    /// Register a descriptor, replacing any previous one for the same type.
    ///
    /// Every declared default must parse as its declared type.
    pub fn register(&mut self, descriptor: &'static ComponentDescriptor) -> Result<(), PropertyError> {
        for property in descriptor.properties {
            PropertyValue::parse(property.ty, property.default)?;
        }
        self.insert(descriptor);
        Ok(())
    }

    fn insert(&mut self, descriptor: &'static ComponentDescriptor) {
        if self.types.insert(descriptor.ty, descriptor).is_none() {
            self.order.push(descriptor.ty);
        }
        tracing::trace!(
            target: targets::DESCRIPTOR,
            component_type = %descriptor.ty,
            "registered component type"
        );
    }

    /// Look up a descriptor.
    pub fn get(&self, ty: ComponentType) -> Option<&'static ComponentDescriptor> {
        self.types.get(&ty).copied()
    }

    /// Whether the type is registered.
    pub fn contains(&self, ty: ComponentType) -> bool {
        self.types.contains_key(&ty)
    }

    /// Registered descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static ComponentDescriptor> + '_ {
        self.order.iter().filter_map(|ty| self.types.get(ty).copied())
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
