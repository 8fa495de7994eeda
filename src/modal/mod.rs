//! Modal dialogs
//!
//! A single, exclusive dialog (alert or confirm) drawn over the current page.
//! Callers request a dialog and await the returned handle while the event loop
//! keeps running; the dialog resolves on the first of: an action button, a
//! click on the backdrop, or Escape.

pub mod controller;
pub mod sanitize;
pub mod types;
pub mod view;

pub use controller::{DialogHandle, ModalController};
pub use types::{
    DialogButton, DialogId, DialogInput, DialogKind, DialogOutcome, DialogRequest, DialogState,
    ModalError, SupersedePolicy, DEFAULT_FADE_OUT,
};
