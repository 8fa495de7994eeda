use crate::api::Cart;
use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// Fresh cart contents from the storefront
    CartUpdated(Cart),

    /// Status message event
    StatusMessage(String),

    /// Request to leave the application
    Quit,

    /// Custom application events
    Custom(String, serde_json::Value),
}

/// Event handler for terminal input and internal events
pub struct EventHandler {
    /// Event receiver channel
    receiver: mpsc::UnboundedReceiver<Event>,

    /// Event sender channel
    sender: mpsc::UnboundedSender<Event>,

    /// Tick interval for periodic events
    tick_interval: Duration,
}

impl EventHandler {
    pub fn new(tick_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            receiver,
            sender,
            tick_interval,
        }
    }

    /// Start forwarding terminal input; emits a tick whenever the terminal is quiet.
    pub fn start(&self) {
        let sender = self.sender.clone();
        let tick_interval = self.tick_interval;

        tokio::task::spawn_blocking(move || loop {
            let event = match crossterm::event::poll(tick_interval) {
                Ok(true) => match crossterm::event::read() {
                    Ok(event) => match convert_crossterm_event(event) {
                        Some(event) => event,
                        None => continue,
                    },
                    Err(e) => {
                        error!("Failed to read terminal event: {}", e);
                        break;
                    }
                },
                Ok(false) => Event::Tick,
                Err(e) => {
                    error!("Failed to poll terminal events: {}", e);
                    break;
                }
            };

            if sender.send(event).is_err() {
                debug!("Event receiver dropped, stopping input reader");
                break;
            }
        });
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Send an internal event
    pub fn send(&self, event: Event) -> Result<()> {
        self.sender.send(event)?;
        Ok(())
    }

    /// Get a clone of the sender
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

/// Convert crossterm events to application events
fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
    match event {
        // Windows reports releases as well as presses.
        CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Release => None,
        CrosstermEvent::Key(key_event) => Some(Event::Key(key_event)),
        CrosstermEvent::Mouse(mouse_event) => Some(Event::Mouse(mouse_event)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        CrosstermEvent::FocusGained => Some(Event::Custom("focus_gained".to_string(), serde_json::Value::Null)),
        CrosstermEvent::FocusLost => Some(Event::Custom("focus_lost".to_string(), serde_json::Value::Null)),
        CrosstermEvent::Paste(text) => Some(Event::Custom("paste".to_string(), serde_json::Value::String(text))),
    }
}
