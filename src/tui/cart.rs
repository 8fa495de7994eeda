//! Cart page

use super::styles::Theme;
use crate::{
    api::{format_price, Cart, CartItem},
    tui::Frame,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

#[derive(Debug, Default)]
pub struct CartPage {
    cart: Cart,
    list_state: ListState,
    loaded: bool,
}

impl CartPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replace the cart, keeping the selection on a valid row.
    pub fn set_cart(&mut self, cart: Cart) {
        let len = cart.items.len();
        self.cart = cart;
        self.loaded = true;

        let selected = match (self.list_state.selected(), len) {
            (_, 0) => None,
            (Some(index), len) => Some(index.min(len - 1)),
            (None, _) => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn selected_item(&self) -> Option<&CartItem> {
        self.list_state
            .selected()
            .and_then(|index| self.cart.items.get(index))
    }

    pub fn select_next(&mut self) {
        if self.cart.items.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(index) if index + 1 < self.cart.items.len() => index + 1,
            Some(index) => index,
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.cart.items.is_empty() {
            return;
        }
        let previous = self.list_state.selected().map_or(0, |index| index.saturating_sub(1));
        self.list_state.select(Some(previous));
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, status: &str, help: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(3),    // Items
                Constraint::Length(3), // Total
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("BookGetter", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
            Span::raw("  Shopping Cart"),
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(theme.border_style()))
        .style(theme.base_style());
        frame.render_widget(header, chunks[0]);

        self.render_items(frame, chunks[1], theme);

        let total = Paragraph::new(Line::from(vec![
            Span::raw(format!("{} item(s)   Total: ", self.cart.item_count())),
            Span::styled(
                format_price(self.cart.total()),
                Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::ALL).border_style(theme.border_style()))
        .style(theme.base_style());
        frame.render_widget(total, chunks[2]);

        let status_line = if status.is_empty() {
            help.to_string()
        } else {
            format!("{}  |  {}", status, help)
        };
        frame.render_widget(
            Paragraph::new(status_line).style(theme.status_bar_style()),
            chunks[3],
        );
    }

    fn render_items(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(" Items ");

        if self.cart.is_empty() {
            let text = if self.loaded {
                "Your cart is empty"
            } else {
                "Loading cart..."
            };
            let empty = Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(theme.help_style())
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .cart
            .items
            .iter()
            .map(|item| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<32}", item.book_title),
                        theme.text_style().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("{:<22}", item.book_author), theme.help_style()),
                    Span::raw(format!("x{:<4}", item.quantity)),
                    Span::raw(format_price(item.line_total())),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .style(theme.base_style())
            .highlight_style(theme.selection_style())
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}
