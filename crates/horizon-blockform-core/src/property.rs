//! Property store for component instances.
//!
//! A [`PropertyStore`] is the source of truth for a component's property
//! values. Platform widgets are projections of it: values are read from the
//! store, never from the widget, and a write is recorded in the store before
//! any attempt to push it to a widget.
//!
//! # Ordering
//!
//! The store remembers the order in which properties were first written.
//! Rewriting a property replaces its value in place without moving it, so
//! replaying the store reproduces the order the caller used.
//!
//! # Example
//!
//! ```
//! use horizon_blockform_core::catalog::builtin;
//! use horizon_blockform_core::{PropertyStore, PropertyValue};
//!
//! let mut store = PropertyStore::new(&builtin::MENU_ITEM);
//! store.set("Text", "Save".into()).unwrap();
//! store.set("Enabled", false.into()).unwrap();
//!
//! assert_eq!(store.get("Text").unwrap(), PropertyValue::from("Save"));
//! // Never written: the declared default.
//! assert_eq!(store.get("Visible").unwrap(), PropertyValue::Boolean(true));
//! ```

use crate::descriptor::{ComponentDescriptor, PropertyDescriptor};
use crate::error::PropertyError;
use crate::logging::targets;
use crate::value::{PropertyType, PropertyValue};

/// Ordered property values of one component instance.
#[derive(Clone, Debug)]
pub struct PropertyStore {
    descriptor: &'static ComponentDescriptor,
    /// Explicitly written values, in first-write order.
    written: Vec<(&'static PropertyDescriptor, PropertyValue)>,
}

impl PropertyStore {
    /// Create a store with every property at its declared default.
    pub fn new(descriptor: &'static ComponentDescriptor) -> Self {
        Self {
            descriptor,
            written: Vec::new(),
        }
    }

    /// The component type this store belongs to.
    pub fn descriptor(&self) -> &'static ComponentDescriptor {
        self.descriptor
    }

    /// Resolve and validate a write against the descriptor table.
    ///
    /// Text written to an asset property is taken as a path, and integers
    /// written to float properties are widened.
    pub fn validate(
        &self,
        name: &str,
        value: PropertyValue,
    ) -> Result<(&'static PropertyDescriptor, PropertyValue), PropertyError> {
        let property = self.lookup(name)?;
        if property.read_only {
            return Err(PropertyError::ReadOnly {
                name: name.to_string(),
            });
        }

        let value = match (property.ty, value) {
            (PropertyType::Asset, PropertyValue::Text(path)) => PropertyValue::Asset(path),
            (PropertyType::Float, PropertyValue::Integer(n)) => PropertyValue::Float(n as f64),
            (_, value) => value,
        };

        if value.value_type() != property.ty {
            return Err(PropertyError::TypeMismatch {
                name: name.to_string(),
                expected: property.ty,
                got: value.value_type(),
            });
        }
        Ok((property, value))
    }

    /// Write a property, returning the previous effective value if it changed.
    ///
    /// The write is recorded even when the value is unchanged, so it takes
    /// part in replay ordering from now on.
    pub fn set(&mut self, name: &str, value: PropertyValue) -> Result<Option<PropertyValue>, PropertyError> {
        let (property, value) = self.validate(name, value)?;

        let previous = match self.written.iter_mut().find(|(p, _)| p.name == property.name) {
            Some((_, current)) => std::mem::replace(current, value.clone()),
            None => {
                self.written.push((property, value.clone()));
                property.default_value()
            }
        };

        tracing::trace!(
            target: targets::PROPERTY,
            component_type = %self.descriptor.ty,
            property = property.name,
            %value,
            "property stored"
        );

        Ok((previous != value).then_some(previous))
    }

    /// The current value of a property: last written, else the default.
    pub fn get(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        let property = self.lookup(name)?;
        Ok(self
            .written_value(property.name)
            .cloned()
            .unwrap_or_else(|| property.default_value()))
    }

    /// The explicitly written value, if any.
    pub fn written_value(&self, name: &str) -> Option<&PropertyValue> {
        self.written
            .iter()
            .find(|(p, _)| p.name == name)
            .map(|(_, value)| value)
    }

    /// Whether the property has been written since creation or the last reset.
    pub fn is_set(&self, name: &str) -> bool {
        self.written_value(name).is_some()
    }

    /// Forget a written value, returning the property to its default.
    pub fn reset(&mut self, name: &str) -> Result<Option<PropertyValue>, PropertyError> {
        let property = self.lookup(name)?;
        let index = self.written.iter().position(|(p, _)| p.name == property.name);
        Ok(index.map(|index| self.written.remove(index).1))
    }

    /// Written properties in first-write order.
    pub fn written(&self) -> impl Iterator<Item = (&'static str, &PropertyValue)> {
        self.written.iter().map(|(p, value)| (p.name, value))
    }

    /// Effective values of every declared property, in declaration order.
    ///
    /// This is what persistence and code generation read.
    pub fn snapshot(&self) -> Vec<(&'static str, PropertyValue)> {
        self.descriptor
            .properties
            .iter()
            .map(|property| {
                let value = self
                    .written_value(property.name)
                    .cloned()
                    .unwrap_or_else(|| property.default_value());
                (property.name, value)
            })
            .collect()
    }

    /// The order in which properties are pushed to a freshly created widget.
    ///
    /// Unwritten properties come first at their defaults, in declaration
    /// order, followed by written properties in first-write order. A stable
    /// partition then moves every
    /// [`AfterContent`](crate::descriptor::ApplyPhase::AfterContent) property
    /// behind the content properties.
    pub fn replay_plan(&self) -> Vec<(&'static PropertyDescriptor, PropertyValue)> {
        let mut plan: Vec<_> = self
            .descriptor
            .properties
            .iter()
            .filter(|property| !self.is_set(property.name))
            .map(|property| (property, property.default_value()))
            .collect();
        plan.extend(self.written.iter().cloned());
        plan.sort_by_key(|(property, _)| property.phase);
        plan
    }

    fn lookup(&self, name: &str) -> Result<&'static PropertyDescriptor, PropertyError> {
        self.descriptor
            .property(name)
            .ok_or_else(|| PropertyError::NotFound {
                component_type: self.descriptor.ty.name(),
                name: name.to_string(),
            })
    }
}
