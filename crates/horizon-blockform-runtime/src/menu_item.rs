//! Typed access to a hosted menu item.
//!
//! [`MenuItem`] is a thin view over a form-hosted `MenuItem` component. It
//! reads and writes the component's store through the form, so the usual
//! rules apply: writes before host-ready are buffered, the text is handed to
//! the platform when the entry is created, and `ShowOnActionBar` is applied
//! after everything else.

use horizon_blockform_core::{ComponentId, PropertyValue};

use crate::dispatch::DispatchResult;
use crate::error::{DispatchError, FormResult};
use crate::form::Form;

/// A menu entry hosted by a [`Form`].
#[derive(Debug)]
pub struct MenuItem<'f> {
    form: &'f mut Form,
    id: ComponentId,
}

impl<'f> MenuItem<'f> {
    pub(crate) fn new(form: &'f mut Form, id: ComponentId) -> Self {
        Self { form, id }
    }

    /// The component identity.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    fn text_property(&self, name: &str) -> String {
        self.form
            .property(self.id, name)
            .ok()
            .and_then(|value| value.as_str().map(str::to_owned))
            .unwrap_or_default()
    }

    fn bool_property(&self, name: &str, default: bool) -> bool {
        self.form
            .property(self.id, name)
            .ok()
            .and_then(|value| value.as_bool())
            .unwrap_or(default)
    }

    /// Text shown in the overflow menu.
    pub fn text(&self) -> String {
        self.text_property("Text")
    }

    /// Set the text shown in the overflow menu.
    pub fn set_text(&mut self, text: impl Into<String>) -> FormResult<()> {
        self.form.set_property(self.id, "Text", PropertyValue::Text(text.into()))?;
        Ok(())
    }

    /// Path of the icon shown on the action bar.
    pub fn icon(&self) -> String {
        self.text_property("Icon")
    }

    /// Set the icon path. Re-setting the path of the icon already shown
    /// does not reload it.
    pub fn set_icon(&mut self, path: impl Into<String>) -> FormResult<()> {
        self.form.set_property(self.id, "Icon", PropertyValue::Asset(path.into()))?;
        Ok(())
    }

    /// Whether the user can select the item.
    pub fn enabled(&self) -> bool {
        self.bool_property("Enabled", true)
    }

    /// Set whether the user can select the item.
    pub fn set_enabled(&mut self, enabled: bool) -> FormResult<()> {
        self.form.set_property(self.id, "Enabled", enabled.into())?;
        Ok(())
    }

    /// Whether the item is shown in the menu.
    pub fn visible(&self) -> bool {
        self.bool_property("Visible", true)
    }

    /// Show or hide the item.
    pub fn set_visible(&mut self, visible: bool) -> FormResult<()> {
        self.form.set_property(self.id, "Visible", visible.into())?;
        Ok(())
    }

    /// Whether the item appears on the action bar when there is room.
    pub fn show_on_action_bar(&self) -> bool {
        self.bool_property("ShowOnActionBar", false)
    }

    /// Set whether the item appears on the action bar when there is room.
    pub fn set_show_on_action_bar(&mut self, show: bool) -> FormResult<()> {
        self.form.set_property(self.id, "ShowOnActionBar", show.into())?;
        Ok(())
    }

    /// Raise the `Click` event, as the platform does when the user selects
    /// the item.
    pub fn click(&self) -> Result<DispatchResult, DispatchError> {
        self.form.fire_event(self.id, "Click", &[])
    }
}
