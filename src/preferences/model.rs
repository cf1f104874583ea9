//! Preference table
//!
//! Plain data behind [`super::PreferenceStore`]. This is also the bulk
//! snapshot handed to whatever persists preferences; keys serialize under
//! their canonical names.

use serde::{Deserialize, Serialize};

use super::{PreferenceName, PreferenceValue};

/// Every recognized option with its current value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPreferences {
    /// Gate for the "no receivers configured" startup warning
    #[serde(default = "default_true")]
    pub show_no_receiver_warning: bool,

    #[serde(default = "default_true")]
    pub status_bar: bool,

    #[serde(default = "default_true")]
    pub toolbar: bool,

    #[serde(default = "default_true")]
    pub receivers: bool,

    /// Ask before shutting down
    #[serde(default = "default_true")]
    pub confirm_exit: bool,

    #[serde(default = "default_true")]
    pub show_splash: bool,

    /// Theme selector, empty for the platform default
    #[serde(default)]
    pub look_and_feel_class_name: String,

    #[serde(default = "default_tool_tip_display_millis")]
    pub tool_tip_display_millis: i32,

    /// Per-view capacity hint for log tables
    #[serde(default = "default_cyclic_buffer_size")]
    pub cyclic_buffer_size: i32,

    #[serde(default)]
    pub last_used_version: String,

    /// Stored after the large-value transform, see `PreferenceStore::set_responsiveness`
    #[serde(default = "default_responsiveness")]
    pub responsiveness: i32,

    /// Template used to name log views
    #[serde(default = "default_identifier_expression")]
    pub identifier_expression: String,

    #[serde(default = "default_tab_placement")]
    pub tab_placement: i32,

    /// If not empty, logging configuration is loaded from here at startup
    #[serde(default, rename = "configurationURL")]
    pub configuration_url: String,

    #[serde(default)]
    pub ok_to_remove_security_manager: bool,
}

fn default_true() -> bool {
    true
}

fn default_tool_tip_display_millis() -> i32 {
    4000
}

fn default_cyclic_buffer_size() -> i32 {
    5000
}

fn default_responsiveness() -> i32 {
    3
}

fn default_identifier_expression() -> String {
    "PROP.hostname - PROP.application".to_string()
}

fn default_tab_placement() -> i32 {
    3 // bottom
}

impl Default for ApplicationPreferences {
    fn default() -> Self {
        Self {
            show_no_receiver_warning: true,
            status_bar: true,
            toolbar: true,
            receivers: true,
            confirm_exit: true,
            show_splash: true,
            look_and_feel_class_name: String::new(),
            tool_tip_display_millis: default_tool_tip_display_millis(),
            cyclic_buffer_size: default_cyclic_buffer_size(),
            last_used_version: String::new(),
            responsiveness: default_responsiveness(),
            identifier_expression: default_identifier_expression(),
            tab_placement: default_tab_placement(),
            configuration_url: String::new(),
            ok_to_remove_security_manager: false,
        }
    }
}

impl ApplicationPreferences {
    /// Read one option by name
    pub fn value(&self, name: PreferenceName) -> PreferenceValue {
        match name {
            PreferenceName::ShowNoReceiverWarning => self.show_no_receiver_warning.into(),
            PreferenceName::StatusBar => self.status_bar.into(),
            PreferenceName::Toolbar => self.toolbar.into(),
            PreferenceName::Receivers => self.receivers.into(),
            PreferenceName::ConfirmExit => self.confirm_exit.into(),
            PreferenceName::ShowSplash => self.show_splash.into(),
            PreferenceName::LookAndFeelClassName => self.look_and_feel_class_name.clone().into(),
            PreferenceName::ToolTipDisplayMillis => self.tool_tip_display_millis.into(),
            PreferenceName::CyclicBufferSize => self.cyclic_buffer_size.into(),
            PreferenceName::LastUsedVersion => self.last_used_version.clone().into(),
            PreferenceName::Responsiveness => self.responsiveness.into(),
            PreferenceName::IdentifierExpression => self.identifier_expression.clone().into(),
            PreferenceName::TabPlacement => self.tab_placement.into(),
            PreferenceName::ConfigurationUrl => self.configuration_url.clone().into(),
            PreferenceName::OkToRemoveSecurityManager => {
                self.ok_to_remove_security_manager.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_table() {
        let prefs = ApplicationPreferences::default();
        assert!(prefs.show_no_receiver_warning);
        assert!(prefs.confirm_exit);
        assert!(!prefs.ok_to_remove_security_manager);
        assert_eq!(prefs.tool_tip_display_millis, 4000);
        assert_eq!(prefs.cyclic_buffer_size, 5000);
        assert_eq!(prefs.responsiveness, 3);
        assert_eq!(prefs.tab_placement, 3);
        assert_eq!(
            prefs.identifier_expression,
            "PROP.hostname - PROP.application"
        );
        assert!(prefs.configuration_url.is_empty());
    }

    #[test]
    fn test_snapshot_uses_canonical_keys() {
        let json = serde_json::to_value(ApplicationPreferences::default()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), PreferenceName::ALL.len());
        for name in PreferenceName::ALL {
            assert!(object.contains_key(name.as_str()), "missing {}", name);
        }
    }

    #[test]
    fn test_partial_snapshot_fills_defaults() {
        let prefs: ApplicationPreferences =
            serde_json::from_str(r#"{"toolbar": false, "configurationURL": "file:///x.xml"}"#)
                .unwrap();

        assert!(!prefs.toolbar);
        assert_eq!(prefs.configuration_url, "file:///x.xml");
        assert!(prefs.status_bar);
        assert_eq!(prefs.cyclic_buffer_size, 5000);
    }

    #[test]
    fn test_value_by_name() {
        let prefs = ApplicationPreferences::default();
        assert_eq!(
            prefs.value(PreferenceName::TabPlacement),
            PreferenceValue::Int(3)
        );
        assert_eq!(
            prefs.value(PreferenceName::ShowSplash),
            PreferenceValue::Bool(true)
        );
    }
}
