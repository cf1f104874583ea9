//! Application preferences
//!
//! A flat table of named settings with change notification. Each option has a
//! canonical name that doubles as its notification key and as its key in the
//! serialized snapshot.

mod model;
mod store;

pub use model::ApplicationPreferences;
pub use store::PreferenceStore;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Canonical names of every recognized option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceName {
    ShowNoReceiverWarning,
    StatusBar,
    Toolbar,
    Receivers,
    ConfirmExit,
    ShowSplash,
    LookAndFeelClassName,
    ToolTipDisplayMillis,
    CyclicBufferSize,
    LastUsedVersion,
    Responsiveness,
    IdentifierExpression,
    TabPlacement,
    ConfigurationUrl,
    OkToRemoveSecurityManager,
}

impl PreferenceName {
    /// Every option, in bulk-copy order
    pub const ALL: [PreferenceName; 15] = [
        PreferenceName::IdentifierExpression,
        PreferenceName::ShowNoReceiverWarning,
        PreferenceName::Responsiveness,
        PreferenceName::TabPlacement,
        PreferenceName::StatusBar,
        PreferenceName::Toolbar,
        PreferenceName::Receivers,
        PreferenceName::LookAndFeelClassName,
        PreferenceName::ConfirmExit,
        PreferenceName::ShowSplash,
        PreferenceName::ToolTipDisplayMillis,
        PreferenceName::CyclicBufferSize,
        PreferenceName::ConfigurationUrl,
        PreferenceName::LastUsedVersion,
        PreferenceName::OkToRemoveSecurityManager,
    ];

    /// Canonical name used for notifications and snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceName::ShowNoReceiverWarning => "showNoReceiverWarning",
            PreferenceName::StatusBar => "statusBar",
            PreferenceName::Toolbar => "toolbar",
            PreferenceName::Receivers => "receivers",
            PreferenceName::ConfirmExit => "confirmExit",
            PreferenceName::ShowSplash => "showSplash",
            PreferenceName::LookAndFeelClassName => "lookAndFeelClassName",
            PreferenceName::ToolTipDisplayMillis => "toolTipDisplayMillis",
            PreferenceName::CyclicBufferSize => "cyclicBufferSize",
            PreferenceName::LastUsedVersion => "lastUsedVersion",
            PreferenceName::Responsiveness => "responsiveness",
            PreferenceName::IdentifierExpression => "identifierExpression",
            PreferenceName::TabPlacement => "tabPlacement",
            PreferenceName::ConfigurationUrl => "configurationURL",
            PreferenceName::OkToRemoveSecurityManager => "okToRemoveSecurityManager",
        }
    }

    /// Kind of value this option holds
    pub fn kind(&self) -> ValueKind {
        match self {
            PreferenceName::ShowNoReceiverWarning
            | PreferenceName::StatusBar
            | PreferenceName::Toolbar
            | PreferenceName::Receivers
            | PreferenceName::ConfirmExit
            | PreferenceName::ShowSplash
            | PreferenceName::OkToRemoveSecurityManager => ValueKind::Bool,
            PreferenceName::ToolTipDisplayMillis
            | PreferenceName::CyclicBufferSize
            | PreferenceName::Responsiveness
            | PreferenceName::TabPlacement => ValueKind::Int,
            PreferenceName::LookAndFeelClassName
            | PreferenceName::LastUsedVersion
            | PreferenceName::IdentifierExpression
            | PreferenceName::ConfigurationUrl => ValueKind::Text,
        }
    }
}

impl fmt::Display for PreferenceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceName {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PreferenceName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| PreferenceError::UnknownName(s.to_string()))
    }
}

/// Kind of a preference value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Text => "string",
        };
        f.write_str(name)
    }
}

/// A single preference value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceValue {
    Bool(bool),
    Int(i32),
    Text(String),
}

impl PreferenceValue {
    /// Kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            PreferenceValue::Bool(_) => ValueKind::Bool,
            PreferenceValue::Int(_) => ValueKind::Int,
            PreferenceValue::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PreferenceValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            PreferenceValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PreferenceValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PreferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceValue::Bool(b) => write!(f, "{}", b),
            PreferenceValue::Int(i) => write!(f, "{}", i),
            PreferenceValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for PreferenceValue {
    fn from(value: bool) -> Self {
        PreferenceValue::Bool(value)
    }
}

impl From<i32> for PreferenceValue {
    fn from(value: i32) -> Self {
        PreferenceValue::Int(value)
    }
}

impl From<String> for PreferenceValue {
    fn from(value: String) -> Self {
        PreferenceValue::Text(value)
    }
}

impl From<&str> for PreferenceValue {
    fn from(value: &str) -> Self {
        PreferenceValue::Text(value.to_string())
    }
}

/// Change notification fired by every setter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceChange {
    pub name: PreferenceName,
    pub old: PreferenceValue,
    pub new: PreferenceValue,
}

/// Errors from name-based preference access
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    #[error("unknown preference '{0}'")]
    UnknownName(String),

    #[error("preference '{name}' holds a {expected} value, got {actual}")]
    TypeMismatch {
        name: PreferenceName,
        expected: ValueKind,
        actual: ValueKind,
    },
}
