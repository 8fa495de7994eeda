//! Modal dialog controller
//!
//! Owns the single dialog slot of the application. Requests return a
//! [`DialogHandle`] future that settles exactly once, after the user has
//! responded and the panel has faded out. Input reaches the active dialog
//! through [`ModalController::dispatch`] or the key and mouse adapters; a
//! dialog only listens for input while it is showing.

use super::{
    sanitize::encode_untrusted,
    types::*,
    view::{render_dialog, DialogLayout, DialogView, HitTarget},
};
use crate::tui::{styles::Theme, Frame};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll},
    time::Duration,
};
use tokio::sync::oneshot;
use tracing::{debug, error, trace, warn};

type Responder = oneshot::Sender<Result<DialogOutcome, ModalError>>;

/// A dialog currently occupying the slot
struct Instance {
    id: DialogId,
    request: DialogRequest,
    state: DialogState,
    outcome: Option<DialogOutcome>,
    focus: DialogButton,
    responder: Option<Responder>,
    layout: Option<DialogLayout>,
}

impl Instance {
    fn new(id: DialogId, request: DialogRequest, responder: Responder) -> Self {
        Self {
            id,
            request,
            state: DialogState::Showing,
            outcome: None,
            focus: DialogButton::Primary,
            responder: Some(responder),
            layout: None,
        }
    }
}

#[derive(Default)]
struct Slot {
    active: Option<Instance>,
    next_id: u64,
}

/// Cloneable handle to the application's dialog slot
#[derive(Clone)]
pub struct ModalController {
    slot: Arc<Mutex<Slot>>,
    fade_out: Duration,
    policy: SupersedePolicy,
}

impl ModalController {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_FADE_OUT, SupersedePolicy::default())
    }

    pub fn with_settings(fade_out: Duration, policy: SupersedePolicy) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            fade_out,
            policy,
        }
    }

    pub fn fade_out(&self) -> Duration {
        self.fade_out
    }

    pub fn policy(&self) -> SupersedePolicy {
        self.policy
    }

    /// Show an alert. Resolves with [`DialogOutcome::Dismissed`].
    pub fn notify(
        &self,
        kind: DialogKind,
        message: impl Into<String>,
        title: Option<&str>,
    ) -> DialogHandle {
        let kind = if kind.is_alert() {
            kind
        } else {
            warn!(%kind, "notify called with a non-alert kind, showing it as info");
            DialogKind::Info
        };

        let mut request = DialogRequest::alert(kind, message);
        request.title = title.map(str::to_string);
        self.open(request)
    }

    pub fn success(&self, message: impl Into<String>) -> DialogHandle {
        self.notify(DialogKind::Success, message, None)
    }

    pub fn error(&self, message: impl Into<String>) -> DialogHandle {
        self.notify(DialogKind::Error, message, None)
    }

    pub fn warning(&self, message: impl Into<String>) -> DialogHandle {
        self.notify(DialogKind::Warning, message, None)
    }

    pub fn info(&self, message: impl Into<String>) -> DialogHandle {
        self.notify(DialogKind::Info, message, None)
    }

    /// Ask a yes/no question. Resolves with `Confirmed` only for the primary action.
    pub fn confirm(&self, message: impl Into<String>, title: Option<&str>) -> DialogHandle {
        let mut request = DialogRequest::confirm(message);
        request.title = title.map(str::to_string);
        self.open(request)
    }

    /// Show `request`, evicting whatever dialog currently occupies the slot.
    pub fn open(&self, request: DialogRequest) -> DialogHandle {
        let request = DialogRequest {
            kind: request.kind,
            message: encode_untrusted(&request.message),
            title: request.title.as_deref().map(encode_untrusted),
        };
        let (responder, receiver) = oneshot::channel();

        let mut slot = self.lock();
        if let Some(previous) = slot.active.take() {
            self.evict(previous);
        }

        slot.next_id += 1;
        let id = DialogId(slot.next_id);
        debug!(dialog_id = %id, kind = %request.kind, "dialog showing");
        slot.active = Some(Instance::new(id, request, responder));

        DialogHandle::new(id, receiver)
    }

    /// Remove a dialog immediately, without fade, applying the supersede policy.
    fn evict(&self, mut previous: Instance) {
        warn!(
            dialog_id = %previous.id,
            state = ?previous.state,
            policy = ?self.policy,
            "superseding active dialog"
        );

        match (self.policy, previous.responder.take()) {
            (SupersedePolicy::Cancel, Some(responder)) => {
                let _ = responder.send(Err(ModalError::Superseded(previous.id)));
            }
            // Dropping the responder leaves the handle pending forever.
            (SupersedePolicy::Abandon, _) | (_, None) => {}
        }
    }

    /// Route one input to the showing dialog.
    ///
    /// Returns whether the input was consumed. Inputs reaching a dialog that
    /// is already fading out are consumed but have no effect.
    pub fn dispatch(&self, input: DialogInput) -> bool {
        let mut slot = self.lock();
        let Some(instance) = slot.active.as_mut() else {
            return false;
        };

        if instance.state != DialogState::Showing {
            trace!(dialog_id = %instance.id, ?input, "ignoring input while resolving");
            return true;
        }

        let Some(outcome) = input.outcome_for(instance.request.kind) else {
            return true;
        };

        instance.state = DialogState::Resolving;
        instance.outcome = Some(outcome);
        let id = instance.id;
        debug!(dialog_id = %id, ?input, ?outcome, "dialog resolving");
        drop(slot);

        self.schedule_removal(id);
        true
    }

    fn schedule_removal(&self, id: DialogId) {
        let controller = self.clone();
        let delay = self.fade_out;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            controller.finish(id);
        });
    }

    /// Detach a faded-out dialog, then settle its future.
    fn finish(&self, id: DialogId) {
        let mut slot = self.lock();
        if slot.active.as_ref().map(|instance| instance.id) != Some(id) {
            trace!(dialog_id = %id, "dialog already evicted");
            return;
        }
        let Some(mut instance) = slot.active.take() else {
            return;
        };
        drop(slot);

        instance.state = DialogState::Removed;
        debug!(dialog_id = %id, "dialog removed");

        if let (Some(responder), Some(outcome)) = (instance.responder.take(), instance.outcome) {
            let _ = responder.send(Ok(outcome));
        }
    }

    /// Translate a key press for the showing dialog.
    ///
    /// Escape cancels, Enter and Space press the focused button, and
    /// Tab/Left/Right move focus between the buttons of a confirm. Every other
    /// key is swallowed while a dialog is up.
    pub fn handle_key_event(&self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return self.is_active();
        }

        let input = {
            let mut slot = self.lock();
            let Some(instance) = slot.active.as_mut() else {
                return false;
            };
            if instance.state != DialogState::Showing {
                return true;
            }

            match key.code {
                KeyCode::Esc => DialogInput::CancelKey,
                KeyCode::Enter | KeyCode::Char(' ') => instance.focus.input(),
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                    if !instance.request.kind.is_alert() {
                        instance.focus = match instance.focus {
                            DialogButton::Primary => DialogButton::Secondary,
                            DialogButton::Secondary => DialogButton::Primary,
                        };
                    }
                    return true;
                }
                _ => return true,
            }
        };

        self.dispatch(input)
    }

    /// Map a left click on the last rendered frame to a dialog input.
    pub fn handle_mouse_event(&self, event: MouseEvent) -> bool {
        let input = {
            let slot = self.lock();
            let Some(instance) = slot.active.as_ref() else {
                return false;
            };
            if event.kind != MouseEventKind::Down(MouseButton::Left) {
                return true;
            }
            let Some(layout) = instance.layout.as_ref() else {
                return true;
            };

            match layout.hit(event.column, event.row) {
                HitTarget::Button(button) => button.input(),
                HitTarget::Backdrop => DialogInput::Backdrop,
                HitTarget::Panel => return true,
            }
        };

        self.dispatch(input)
    }

    /// Draw the active dialog over `area` and remember its layout for hit testing.
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut slot = self.lock();
        let Some(instance) = slot.active.as_mut() else {
            return;
        };

        if area.width == 0 || area.height == 0 {
            let err = ModalError::NoSurface {
                width: area.width,
                height: area.height,
            };
            error!(dialog_id = %instance.id, "{}", err);
            return;
        }

        let layout = match instance.layout.take() {
            Some(layout) if layout.area == area => layout,
            _ => DialogLayout::calculate(&instance.request, area),
        };

        render_dialog(
            frame,
            DialogView {
                request: &instance.request,
                layout: &layout,
                focus: instance.focus,
                fading: instance.state == DialogState::Resolving,
            },
            theme,
        );
        instance.layout = Some(layout);
    }

    /// State of the dialog in the slot, `Idle` when the slot is empty.
    pub fn state(&self) -> DialogState {
        self.lock()
            .active
            .as_ref()
            .map_or(DialogState::Idle, |instance| instance.state)
    }

    /// Lifecycle state of a specific dialog.
    pub fn state_of(&self, id: DialogId) -> DialogState {
        let slot = self.lock();
        match slot.active.as_ref() {
            Some(instance) if instance.id == id => instance.state,
            _ if id.0 >= 1 && id.0 <= slot.next_id => DialogState::Removed,
            _ => DialogState::Idle,
        }
    }

    pub fn active_id(&self) -> Option<DialogId> {
        self.lock().active.as_ref().map(|instance| instance.id)
    }

    pub fn active_request(&self) -> Option<DialogRequest> {
        self.lock()
            .active
            .as_ref()
            .map(|instance| instance.request.clone())
    }

    /// Layout of the last frame the active dialog was drawn in.
    pub fn active_layout(&self) -> Option<DialogLayout> {
        self.lock()
            .active
            .as_ref()
            .and_then(|instance| instance.layout.clone())
    }

    pub fn is_active(&self) -> bool {
        self.lock().active.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ModalController {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned to the caller of a dialog request
///
/// Settles once with the dialog's outcome. A handle whose dialog was
/// superseded under [`SupersedePolicy::Abandon`] never settles.
#[must_use = "a dialog handle does nothing unless awaited"]
pub struct DialogHandle {
    id: DialogId,
    receiver: oneshot::Receiver<Result<DialogOutcome, ModalError>>,
    abandoned: bool,
}

impl DialogHandle {
    fn new(id: DialogId, receiver: oneshot::Receiver<Result<DialogOutcome, ModalError>>) -> Self {
        Self {
            id,
            receiver,
            abandoned: false,
        }
    }

    pub fn id(&self) -> DialogId {
        self.id
    }
}

impl Future for DialogHandle {
    type Output = Result<DialogOutcome, ModalError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.abandoned {
            return Poll::Pending;
        }

        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => {
                self.abandoned = true;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
