//! Observable preference store

use std::collections::HashMap;

use tracing::trace;

use crate::events::{ListenerId, ListenerRegistry};

use super::{
    ApplicationPreferences, PreferenceChange, PreferenceError, PreferenceName, PreferenceValue,
};

/// Values at or above this are decoded as `(value - 750) / 1000`
const RESPONSIVENESS_ENCODED_MIN: i32 = 1000;

/// Mutable preference table with change notification
///
/// Every setter fires a [`PreferenceChange`] to listeners keyed on that option
/// and then to global listeners, even when the new value equals the old one.
/// Dispatch is synchronous on the caller's thread.
#[derive(Debug, Default)]
pub struct PreferenceStore {
    values: ApplicationPreferences,
    global: ListenerRegistry<PreferenceChange>,
    keyed: HashMap<PreferenceName, ListenerRegistry<PreferenceChange>>,
}

impl PreferenceStore {
    /// Create a store holding the default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a loaded snapshot, without notifying anyone
    pub fn from_snapshot(values: ApplicationPreferences) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Copy of the full table, for persistence
    pub fn snapshot(&self) -> ApplicationPreferences {
        self.values.clone()
    }

    /// Borrow the full table
    pub fn values(&self) -> &ApplicationPreferences {
        &self.values
    }

    // ----- subscription -----

    /// Register a listener for one option (`Some(name)`) or for all of them (`None`)
    pub fn subscribe<F>(&mut self, name: Option<PreferenceName>, callback: F) -> ListenerId
    where
        F: FnMut(&PreferenceChange) + Send + 'static,
    {
        match name {
            Some(name) => self.keyed.entry(name).or_default().add(callback),
            None => self.global.add(callback),
        }
    }

    /// Remove a listener registered with [`subscribe`](Self::subscribe)
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        if self.global.remove(id) {
            return true;
        }
        self.keyed.values_mut().any(|registry| registry.remove(id))
    }

    /// Whether a change to `name` would reach any listener
    pub fn has_listeners(&self, name: PreferenceName) -> bool {
        !self.global.is_empty()
            || self
                .keyed
                .get(&name)
                .map(|registry| !registry.is_empty())
                .unwrap_or(false)
    }

    fn fire(&mut self, name: PreferenceName, old: PreferenceValue, new: PreferenceValue) {
        trace!(preference = %name, %old, %new, "Preference changed");

        let change = PreferenceChange { name, old, new };
        if let Some(registry) = self.keyed.get_mut(&name) {
            registry.dispatch(&change);
        }
        self.global.dispatch(&change);
    }

    // ----- name-based access -----

    /// Read an option by name
    pub fn get(&self, name: PreferenceName) -> PreferenceValue {
        self.values.value(name)
    }

    /// Write an option by name through its typed setter
    pub fn set(
        &mut self,
        name: PreferenceName,
        value: PreferenceValue,
    ) -> Result<(), PreferenceError> {
        let mismatch = |actual: &PreferenceValue| PreferenceError::TypeMismatch {
            name,
            expected: name.kind(),
            actual: actual.kind(),
        };

        match (name, value) {
            (PreferenceName::ShowNoReceiverWarning, PreferenceValue::Bool(v)) => {
                self.set_show_no_receiver_warning(v)
            }
            (PreferenceName::StatusBar, PreferenceValue::Bool(v)) => self.set_status_bar(v),
            (PreferenceName::Toolbar, PreferenceValue::Bool(v)) => self.set_toolbar(v),
            (PreferenceName::Receivers, PreferenceValue::Bool(v)) => self.set_receivers(v),
            (PreferenceName::ConfirmExit, PreferenceValue::Bool(v)) => self.set_confirm_exit(v),
            (PreferenceName::ShowSplash, PreferenceValue::Bool(v)) => self.set_show_splash(v),
            (PreferenceName::OkToRemoveSecurityManager, PreferenceValue::Bool(v)) => {
                self.set_ok_to_remove_security_manager(v)
            }
            (PreferenceName::ToolTipDisplayMillis, PreferenceValue::Int(v)) => {
                self.set_tool_tip_display_millis(v)
            }
            (PreferenceName::CyclicBufferSize, PreferenceValue::Int(v)) => {
                self.set_cyclic_buffer_size(v)
            }
            (PreferenceName::Responsiveness, PreferenceValue::Int(v)) => {
                self.set_responsiveness(v)
            }
            (PreferenceName::TabPlacement, PreferenceValue::Int(v)) => self.set_tab_placement(v),
            (PreferenceName::LookAndFeelClassName, PreferenceValue::Text(v)) => {
                self.set_look_and_feel_class_name(v)
            }
            (PreferenceName::LastUsedVersion, PreferenceValue::Text(v)) => {
                self.set_last_used_version(v)
            }
            (PreferenceName::IdentifierExpression, PreferenceValue::Text(v)) => {
                self.set_identifier_expression(v)
            }
            (PreferenceName::ConfigurationUrl, PreferenceValue::Text(v)) => {
                self.set_configuration_url(v)
            }
            (_, other) => return Err(mismatch(&other)),
        }
        Ok(())
    }

    // ----- bulk copy -----

    /// Copy every option from `source` through the normal setters
    ///
    /// Each option fires its own change event, in [`PreferenceName::ALL`]
    /// order. Not transactional: listeners run between copies and observe a
    /// partially updated store.
    ///
    /// Responsiveness goes through [`set_responsiveness`](Self::set_responsiveness)
    /// too, so a stored value of 1000 or more is re-encoded on copy and the two
    /// stores end up differing in that one option.
    pub fn apply(&mut self, source: &PreferenceStore) {
        self.apply_snapshot(&source.values);
    }

    /// Same as [`apply`](Self::apply), from a snapshot
    pub fn apply_snapshot(&mut self, source: &ApplicationPreferences) {
        self.set_identifier_expression(source.identifier_expression.clone());
        self.set_show_no_receiver_warning(source.show_no_receiver_warning);
        self.set_responsiveness(source.responsiveness);
        self.set_tab_placement(source.tab_placement);
        self.set_status_bar(source.status_bar);
        self.set_toolbar(source.toolbar);
        self.set_receivers(source.receivers);
        self.set_look_and_feel_class_name(source.look_and_feel_class_name.clone());
        self.set_confirm_exit(source.confirm_exit);
        self.set_show_splash(source.show_splash);
        self.set_tool_tip_display_millis(source.tool_tip_display_millis);
        self.set_cyclic_buffer_size(source.cyclic_buffer_size);
        self.set_configuration_url(source.configuration_url.clone());
        self.set_last_used_version(source.last_used_version.clone());
        self.set_ok_to_remove_security_manager(source.ok_to_remove_security_manager);
    }

    // ----- typed accessors -----

    pub fn show_no_receiver_warning(&self) -> bool {
        self.values.show_no_receiver_warning
    }

    pub fn set_show_no_receiver_warning(&mut self, value: bool) {
        let old = std::mem::replace(&mut self.values.show_no_receiver_warning, value);
        self.fire(PreferenceName::ShowNoReceiverWarning, old.into(), value.into());
    }

    pub fn status_bar(&self) -> bool {
        self.values.status_bar
    }

    pub fn set_status_bar(&mut self, value: bool) {
        let old = std::mem::replace(&mut self.values.status_bar, value);
        self.fire(PreferenceName::StatusBar, old.into(), value.into());
    }

    pub fn toolbar(&self) -> bool {
        self.values.toolbar
    }

    pub fn set_toolbar(&mut self, value: bool) {
        let old = std::mem::replace(&mut self.values.toolbar, value);
        self.fire(PreferenceName::Toolbar, old.into(), value.into());
    }

    pub fn receivers(&self) -> bool {
        self.values.receivers
    }

    pub fn set_receivers(&mut self, value: bool) {
        let old = std::mem::replace(&mut self.values.receivers, value);
        self.fire(PreferenceName::Receivers, old.into(), value.into());
    }

    pub fn confirm_exit(&self) -> bool {
        self.values.confirm_exit
    }

    pub fn set_confirm_exit(&mut self, value: bool) {
        let old = std::mem::replace(&mut self.values.confirm_exit, value);
        self.fire(PreferenceName::ConfirmExit, old.into(), value.into());
    }

    pub fn show_splash(&self) -> bool {
        self.values.show_splash
    }

    pub fn set_show_splash(&mut self, value: bool) {
        let old = std::mem::replace(&mut self.values.show_splash, value);
        self.fire(PreferenceName::ShowSplash, old.into(), value.into());
    }

    pub fn look_and_feel_class_name(&self) -> &str {
        &self.values.look_and_feel_class_name
    }

    pub fn set_look_and_feel_class_name(&mut self, value: impl Into<String>) {
        let value = value.into();
        let old = std::mem::replace(&mut self.values.look_and_feel_class_name, value.clone());
        self.fire(PreferenceName::LookAndFeelClassName, old.into(), value.into());
    }

    pub fn tool_tip_display_millis(&self) -> i32 {
        self.values.tool_tip_display_millis
    }

    pub fn set_tool_tip_display_millis(&mut self, value: i32) {
        let old = std::mem::replace(&mut self.values.tool_tip_display_millis, value);
        self.fire(PreferenceName::ToolTipDisplayMillis, old.into(), value.into());
    }

    pub fn cyclic_buffer_size(&self) -> i32 {
        self.values.cyclic_buffer_size
    }

    pub fn set_cyclic_buffer_size(&mut self, value: i32) {
        let old = std::mem::replace(&mut self.values.cyclic_buffer_size, value);
        self.fire(PreferenceName::CyclicBufferSize, old.into(), value.into());
    }

    pub fn last_used_version(&self) -> &str {
        &self.values.last_used_version
    }

    pub fn set_last_used_version(&mut self, value: impl Into<String>) {
        let value = value.into();
        let old = std::mem::replace(&mut self.values.last_used_version, value.clone());
        self.fire(PreferenceName::LastUsedVersion, old.into(), value.into());
    }

    pub fn responsiveness(&self) -> i32 {
        self.values.responsiveness
    }

    /// Set responsiveness
    ///
    /// Inputs of 1000 and above use the alternate encoding and are stored as
    /// `(value - 750) / 1000`; smaller inputs are stored as given. The change
    /// event carries the stored value.
    pub fn set_responsiveness(&mut self, value: i32) {
        let stored = if value >= RESPONSIVENESS_ENCODED_MIN {
            (value - 750) / 1000
        } else {
            value
        };
        let old = std::mem::replace(&mut self.values.responsiveness, stored);
        self.fire(PreferenceName::Responsiveness, old.into(), stored.into());
    }

    pub fn identifier_expression(&self) -> &str {
        &self.values.identifier_expression
    }

    pub fn set_identifier_expression(&mut self, value: impl Into<String>) {
        let value = value.into();
        let old = std::mem::replace(&mut self.values.identifier_expression, value.clone());
        self.fire(PreferenceName::IdentifierExpression, old.into(), value.into());
    }

    pub fn tab_placement(&self) -> i32 {
        self.values.tab_placement
    }

    pub fn set_tab_placement(&mut self, value: i32) {
        let old = std::mem::replace(&mut self.values.tab_placement, value);
        self.fire(PreferenceName::TabPlacement, old.into(), value.into());
    }

    pub fn configuration_url(&self) -> &str {
        &self.values.configuration_url
    }

    pub fn set_configuration_url(&mut self, value: impl Into<String>) {
        let value = value.into();
        let old = std::mem::replace(&mut self.values.configuration_url, value.clone());
        self.fire(PreferenceName::ConfigurationUrl, old.into(), value.into());
    }

    pub fn ok_to_remove_security_manager(&self) -> bool {
        self.values.ok_to_remove_security_manager
    }

    pub fn set_ok_to_remove_security_manager(&mut self, value: bool) {
        let old = std::mem::replace(&mut self.values.ok_to_remove_security_manager, value);
        self.fire(
            PreferenceName::OkToRemoveSecurityManager,
            old.into(),
            value.into(),
        );
    }
}
