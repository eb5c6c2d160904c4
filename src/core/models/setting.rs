//! Settings registry entries
//!
//! Named numeric values (fine amounts, initial balances) with the history
//! of every change.

use serde::{Deserialize, Serialize};

/// Well-known setting keys seeded on first start
pub mod keys {
    /// Fine for missing a general meeting
    pub const MEETING_ABSENCE_FINE: &str = "meeting-absence-fine";
    /// Fine for missing a common work day
    pub const COMMON_WORK_ABSENCE_FINE: &str = "common-work-absence-fine";
    /// Fine for missing assigned cemetery duty
    pub const CEMETERY_ABSENCE_FINE: &str = "cemetery-absence-fine";
    /// Fine for missing assigned funeral parade duty
    pub const FUNERAL_ABSENCE_FINE: &str = "funeral-absence-fine";
    /// Cash balance before the first cash book entry
    pub const INITIAL_BALANCE: &str = "initial-balance";

    /// Defaults as `(key, value, description)`
    pub const DEFAULTS: [(&str, f64, &str); 5] = [
        (MEETING_ABSENCE_FINE, 50.0, "Fine per missed general meeting"),
        (COMMON_WORK_ABSENCE_FINE, 100.0, "Fine per missed common work day"),
        (CEMETERY_ABSENCE_FINE, 200.0, "Fine per missed cemetery duty"),
        (FUNERAL_ABSENCE_FINE, 100.0, "Fine per missed funeral parade duty"),
        (INITIAL_BALANCE, 0.0, "Cash balance carried into the cash book"),
    ];
}

/// One change to a setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingChange {
    /// Value before the change (`None` when the setting was created)
    pub previous: Option<f64>,
    /// Value after the change
    pub value: f64,
    /// Who changed it
    pub changed_by: String,
    /// When (RFC3339)
    pub changed_at: String,
}

/// A named numeric setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    /// Setting key (kebab-case)
    pub key: String,
    /// Current value
    pub value: f64,
    /// What the value is used for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Every change, oldest first
    #[serde(default)]
    pub history: Vec<SettingChange>,
}

impl Setting {
    /// Create a setting with its initial history entry
    #[must_use]
    pub fn new(key: &str, value: f64, description: Option<&str>, created_by: &str) -> Self {
        Self {
            key: key.to_string(),
            value,
            description: description.map(String::from),
            history: vec![SettingChange {
                previous: None,
                value,
                changed_by: created_by.to_string(),
                changed_at: chrono::Utc::now().to_rfc3339(),
            }],
        }
    }

    /// Change the value and append to the history
    pub fn change(&mut self, value: f64, changed_by: &str) {
        self.history.push(SettingChange {
            previous: Some(self.value),
            value,
            changed_by: changed_by.to_string(),
            changed_at: chrono::Utc::now().to_rfc3339(),
        });
        self.value = value;
    }
}
