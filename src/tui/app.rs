use super::{
    cart::CartPage,
    events::Event,
    flows::CartFlows,
    keys::KeyMap,
    styles::Theme,
    Frame,
};
use crate::{api::Storefront, modal::ModalController};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Key mappings for the cart page
    pub key_map: KeyMap,

    /// Current theme for styling
    pub theme: Theme,

    /// Status message to display
    pub status_message: Option<String>,

    /// Forward mouse clicks to the dialog
    pub mouse_enabled: bool,

    modal: ModalController,
    page: CartPage,
    flows: CartFlows,
}

impl App {
    pub fn new(
        modal: ModalController,
        store: Arc<dyn Storefront>,
        event_sender: mpsc::UnboundedSender<Event>,
        mouse_enabled: bool,
    ) -> Self {
        let flows = CartFlows::new(modal.clone(), store, event_sender);

        Self {
            should_quit: false,
            key_map: KeyMap::default(),
            theme: Theme::default(),
            status_message: None,
            mouse_enabled,
            modal,
            page: CartPage::new(),
            flows,
        }
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn page(&self) -> &CartPage {
        &self.page
    }

    /// Kick off the initial cart load.
    pub fn start(&self) {
        info!(store = self.flows.store_name(), "starting cart page");
        self.flows.spawn("load", CartFlows::load_cart);
    }

    /// Handle incoming events. Returns `true` when the app should exit.
    pub async fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => {
                if self.key_map.should_quit(&key_event) {
                    self.should_quit = true;
                    return Ok(true);
                }

                // The dialog sees input first and blocks the page while it is up.
                if !self.modal.handle_key_event(key_event) {
                    self.handle_page_key(key_event);
                }
            }

            Event::Mouse(mouse_event) => {
                if self.mouse_enabled {
                    self.handle_mouse(mouse_event);
                }
            }

            Event::Resize(width, height) => {
                debug!("Terminal resized to {}x{}", width, height);
            }

            Event::Tick => {}

            Event::CartUpdated(cart) => {
                self.page.set_cart(cart);
            }

            Event::StatusMessage(message) => {
                self.status_message = Some(message);
            }

            Event::Quit => {
                self.should_quit = true;
            }

            Event::Custom(name, data) => {
                debug!("Custom event: {} = {:?}", name, data);
            }
        }

        Ok(self.should_quit)
    }

    fn handle_mouse(&mut self, event: MouseEvent) {
        self.modal.handle_mouse_event(event);
    }

    fn handle_page_key(&mut self, key: KeyEvent) {
        let keys = &self.key_map;

        if keys.quit.matches(&key) {
            self.should_quit = true;
        } else if key.code == KeyCode::Down || key.code == KeyCode::Char('j') {
            self.page.select_next();
        } else if key.code == KeyCode::Up || key.code == KeyCode::Char('k') {
            self.page.select_previous();
        } else if keys.remove.matches(&key) {
            if let Some(item) = self.page.selected_item().cloned() {
                self.flows.spawn("remove", move |flows| flows.remove_item(item));
            }
        } else if keys.clear.matches(&key) {
            let cart = self.page.cart().clone();
            self.flows.spawn("clear", move |flows| flows.clear_cart(cart));
        } else if keys.increment.matches(&key) {
            if let Some(item) = self.page.selected_item().cloned() {
                let quantity = item.quantity + 1;
                self.flows
                    .spawn("increment", move |flows| flows.change_quantity(item, quantity));
            }
        } else if keys.decrement.matches(&key) {
            if let Some(item) = self.page.selected_item().cloned() {
                let quantity = item.quantity.saturating_sub(1);
                self.flows
                    .spawn("decrement", move |flows| flows.change_quantity(item, quantity));
            }
        } else if keys.checkout.matches(&key) {
            let cart = self.page.cart().clone();
            self.flows.spawn("checkout", move |flows| flows.checkout(cart));
        } else if keys.reload.matches(&key) {
            self.flows.spawn("reload", CartFlows::load_cart);
        } else if keys.about.matches(&key) {
            self.flows.spawn("about", CartFlows::about);
        }
    }

    /// Render the page, then the dialog on top of it
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let help = self.key_map.help_text();
        let status = self.status_message.as_deref().unwrap_or_default();

        self.page.render(frame, area, &self.theme, status, &help);
        self.modal.render(frame, area, &self.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::SampleStore,
        modal::{DialogKind, DialogState},
    };
    use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    async fn app() -> (App, mpsc::UnboundedReceiver<Event>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let app = App::new(
            ModalController::new(),
            Arc::new(SampleStore::default()),
            sender,
            true,
        );
        (app, receiver)
    }

    /// Feed queued internal events back into the app, like the event loop does.
    async fn pump(app: &mut App, events: &mut mpsc::UnboundedReceiver<Event>) {
        tokio::time::sleep(Duration::from_millis(300)).await;
        while let Ok(event) = events.try_recv() {
            app.handle_event(event).await.unwrap();
        }
    }

    fn draw(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_loads_cart() {
        let (mut app, mut events) = app().await;
        app.start();
        pump(&mut app, &mut events).await;

        assert!(app.page().is_loaded());
        assert_eq!(app.page().cart().items.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dialog_blocks_page_keys() {
        let (mut app, mut events) = app().await;
        app.start();
        pump(&mut app, &mut events).await;

        app.handle_event(key(KeyCode::Char('r'))).await.unwrap();
        pump(&mut app, &mut events).await;
        assert_eq!(app.modal().active_request().unwrap().kind, DialogKind::Confirm);

        // 'q' goes to the dialog, not the page.
        assert!(!app.handle_event(key(KeyCode::Char('q'))).await.unwrap());
        assert_eq!(app.modal().state(), DialogState::Showing);

        app.handle_event(key(KeyCode::Esc)).await.unwrap();
        pump(&mut app, &mut events).await;
        assert!(!app.modal().is_active());
        assert_eq!(app.page().cart().items.len(), 3);

        assert!(app.handle_event(key(KeyCode::Char('q'))).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_with_mouse_confirm() {
        let (mut app, mut events) = app().await;
        app.start();
        pump(&mut app, &mut events).await;

        app.handle_event(key(KeyCode::Char('r'))).await.unwrap();
        pump(&mut app, &mut events).await;
        draw(&mut app);

        let layout = app.modal().active_layout().unwrap();
        let confirm = layout
            .button_area(crate::modal::DialogButton::Primary)
            .unwrap();
        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: confirm.x + 1,
            row: confirm.y + 1,
            modifiers: KeyModifiers::NONE,
        }))
        .await
        .unwrap();
        pump(&mut app, &mut events).await;

        assert_eq!(app.page().cart().items.len(), 2);
        assert_eq!(
            app.modal().active_request().unwrap().message,
            "Item removed from cart"
        );
        assert_eq!(app.status_message.as_deref(), Some("Removed The Pragmatic Programmer"));
        draw(&mut app);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ctrl_c_quits_even_with_dialog() {
        let (mut app, mut events) = app().await;
        app.handle_event(key(KeyCode::Char('i'))).await.unwrap();
        pump(&mut app, &mut events).await;
        assert!(app.modal().is_active());

        let quit = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.handle_event(quit).await.unwrap());
    }
}
