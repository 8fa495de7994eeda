//! Core dialog types
//!
//! Kinds, requests, inputs and outcomes shared by the controller and the
//! overlay view.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

/// Delay between a dialog resolving and its removal from the screen
pub const DEFAULT_FADE_OUT: Duration = Duration::from_millis(200);

/// Unique identifier for dialog instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialogId(pub u64);

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dialog-{}", self.0)
    }
}

/// Semantic category of a dialog, selecting icon, default title and buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogKind {
    Success,
    Error,
    Warning,
    Info,
    Confirm,
}

impl DialogKind {
    pub const ALERTS: [DialogKind; 4] = [
        DialogKind::Success,
        DialogKind::Error,
        DialogKind::Warning,
        DialogKind::Info,
    ];

    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Error => "✕",
            Self::Warning => "⚠",
            Self::Info => "ℹ",
            Self::Confirm => "?",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Info => "Information",
            Self::Confirm => "Confirm",
        }
    }

    /// Alerts carry a single "OK" action; confirms add a secondary "Cancel".
    pub fn is_alert(self) -> bool {
        !matches!(self, Self::Confirm)
    }
}

impl fmt::Display for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Confirm => "confirm",
        };
        f.write_str(name)
    }
}

/// A request for user attention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub kind: DialogKind,
    pub message: String,
    pub title: Option<String>,
}

impl DialogRequest {
    pub fn alert(kind: DialogKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            title: None,
        }
    }

    pub fn confirm(message: impl Into<String>) -> Self {
        Self::alert(DialogKind::Confirm, message)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The override title, or the kind's default when the override is absent or blank.
    pub fn effective_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => self.kind.default_title(),
        }
    }

    pub fn buttons(&self) -> &'static [DialogButton] {
        if self.kind.is_alert() {
            &[DialogButton::Primary]
        } else {
            &[DialogButton::Secondary, DialogButton::Primary]
        }
    }

    pub fn button_label(&self, button: DialogButton) -> &'static str {
        match (button, self.kind) {
            (DialogButton::Primary, DialogKind::Confirm) => "Confirm",
            (DialogButton::Primary, _) => "OK",
            (DialogButton::Secondary, _) => "Cancel",
        }
    }
}

/// Action buttons on the dialog panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
    Primary,
    Secondary,
}

impl DialogButton {
    pub fn input(self) -> DialogInput {
        match self {
            Self::Primary => DialogInput::Primary,
            Self::Secondary => DialogInput::Secondary,
        }
    }
}

/// Qualifying input events that resolve a showing dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogInput {
    /// "OK" or "Confirm" was chosen
    Primary,
    /// "Cancel" was chosen
    Secondary,
    /// Click outside the panel
    Backdrop,
    /// Escape
    CancelKey,
}

impl DialogInput {
    /// Outcome this input produces for a dialog of `kind`, if the input applies to it.
    pub fn outcome_for(self, kind: DialogKind) -> Option<DialogOutcome> {
        match (kind.is_alert(), self) {
            (true, Self::Secondary) => None,
            (true, _) => Some(DialogOutcome::Dismissed),
            (false, Self::Primary) => Some(DialogOutcome::Confirmed),
            (false, _) => Some(DialogOutcome::Cancelled),
        }
    }
}

/// How a dialog was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogOutcome {
    /// An alert was acknowledged or dismissed
    Dismissed,
    /// The primary action of a confirm was chosen
    Confirmed,
    /// A confirm was cancelled, by button, backdrop or Escape
    Cancelled,
}

impl DialogOutcome {
    pub fn is_confirmed(self) -> bool {
        self == Self::Confirmed
    }
}

/// Lifecycle of a single dialog instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Idle,
    Showing,
    Resolving,
    Removed,
}

/// What happens to the future of a dialog evicted by a newer request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupersedePolicy {
    /// The superseded future is never settled
    #[default]
    Abandon,
    /// The superseded future settles with `ModalError::Superseded`
    Cancel,
}

impl FromStr for SupersedePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abandon" => Ok(Self::Abandon),
            "cancel" => Ok(Self::Cancel),
            other => Err(format!("unknown supersede policy '{}'", other)),
        }
    }
}

/// Dialog-specific error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModalError {
    #[error("Dialog {0} was replaced by a newer dialog before it resolved")]
    Superseded(DialogId),

    #[error("No surface to render the dialog on (area {width}x{height})")]
    NoSurface { width: u16, height: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_titles_and_override() {
        let request = DialogRequest::alert(DialogKind::Info, "hello");
        assert_eq!(request.effective_title(), "Information");

        let request = request.with_title("Heads up");
        assert_eq!(request.effective_title(), "Heads up");

        let blank = DialogRequest::alert(DialogKind::Error, "x").with_title("");
        assert_eq!(blank.effective_title(), "Error");

        assert_eq!(DialogRequest::confirm("x").effective_title(), "Confirm");
    }

    #[test]
    fn test_buttons_per_kind() {
        let alert = DialogRequest::alert(DialogKind::Success, "done");
        assert_eq!(alert.buttons(), &[DialogButton::Primary]);
        assert_eq!(alert.button_label(DialogButton::Primary), "OK");

        let confirm = DialogRequest::confirm("sure?");
        assert_eq!(
            confirm.buttons(),
            &[DialogButton::Secondary, DialogButton::Primary]
        );
        assert_eq!(confirm.button_label(DialogButton::Primary), "Confirm");
        assert_eq!(confirm.button_label(DialogButton::Secondary), "Cancel");
    }

    #[test]
    fn test_outcome_mapping() {
        for kind in DialogKind::ALERTS {
            for input in [DialogInput::Primary, DialogInput::Backdrop, DialogInput::CancelKey] {
                assert_eq!(input.outcome_for(kind), Some(DialogOutcome::Dismissed));
            }
            assert_eq!(DialogInput::Secondary.outcome_for(kind), None);
        }

        let kind = DialogKind::Confirm;
        assert_eq!(DialogInput::Primary.outcome_for(kind), Some(DialogOutcome::Confirmed));
        for input in [DialogInput::Secondary, DialogInput::Backdrop, DialogInput::CancelKey] {
            assert_eq!(input.outcome_for(kind), Some(DialogOutcome::Cancelled));
        }
    }

    #[test]
    fn test_supersede_policy_parsing() {
        assert_eq!("abandon".parse::<SupersedePolicy>(), Ok(SupersedePolicy::Abandon));
        assert_eq!(" Cancel ".parse::<SupersedePolicy>(), Ok(SupersedePolicy::Cancel));
        assert!("reject".parse::<SupersedePolicy>().is_err());
    }
}
