//! Overlay rendering and hit testing
//!
//! The overlay is a dimmed backdrop over the whole page with a centered panel
//! on top. The layout computed for a frame is kept by the controller so mouse
//! clicks can be mapped back to buttons, the panel, or the backdrop.

use super::types::{DialogButton, DialogRequest};
use crate::tui::{styles::Theme, Frame};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

pub const MIN_PANEL_WIDTH: u16 = 30;
pub const MAX_PANEL_WIDTH: u16 = 64;
const BUTTON_HEIGHT: u16 = 3;
const BUTTON_GAP: u16 = 2;
/// Border plus one column of padding on each side
const HORIZONTAL_CHROME: u16 = 4;

/// What a mouse position lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Button(DialogButton),
    Panel,
    Backdrop,
}

/// Geometry of one rendered dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogLayout {
    /// Full available area, covered by the backdrop
    pub area: Rect,
    /// Dialog panel including its border
    pub panel: Rect,
    pub header: Rect,
    pub message: Rect,
    pub buttons: Vec<(DialogButton, Rect)>,
    /// Message wrapped to the panel width
    pub message_lines: Vec<String>,
}

impl DialogLayout {
    pub fn calculate(request: &DialogRequest, area: Rect) -> Self {
        let title_width = request.kind.icon().width() + 1 + request.effective_title().width();
        let buttons_width: usize = request
            .buttons()
            .iter()
            .map(|&button| request.button_label(button).width() + 4)
            .sum::<usize>()
            + (request.buttons().len().saturating_sub(1)) * BUTTON_GAP as usize;
        let longest_line = request
            .message
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0);

        let content_width = title_width.max(buttons_width).max(longest_line);
        let max_width = area.width.min(MAX_PANEL_WIDTH);
        let wanted = u16::try_from(content_width)
            .unwrap_or(u16::MAX)
            .saturating_add(HORIZONTAL_CHROME);
        let width = wanted.clamp(MIN_PANEL_WIDTH.min(max_width), max_width);

        let wrap_width = width.saturating_sub(HORIZONTAL_CHROME).max(1) as usize;
        let message_lines: Vec<String> = textwrap::wrap(&request.message, wrap_width)
            .into_iter()
            .map(|line| line.into_owned())
            .collect();

        // border, header, gap, message, gap, buttons, border
        let lines = u16::try_from(message_lines.len()).unwrap_or(u16::MAX);
        let wanted_height = lines.saturating_add(5 + BUTTON_HEIGHT);
        let height = wanted_height.min(area.height);

        let panel = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };

        let inner = Rect {
            x: panel.x.saturating_add(2),
            y: panel.y.saturating_add(1),
            width: panel.width.saturating_sub(HORIZONTAL_CHROME),
            height: panel.height.saturating_sub(2),
        };

        let header = Rect {
            height: inner.height.min(1),
            ..inner
        };

        let button_height = BUTTON_HEIGHT.min(inner.height);
        let buttons_y = inner.bottom().saturating_sub(button_height);
        let message_y = inner.y.saturating_add(2).min(buttons_y);
        let message = Rect {
            x: inner.x,
            y: message_y,
            width: inner.width,
            height: buttons_y.saturating_sub(1).saturating_sub(message_y),
        };

        let mut buttons = Vec::with_capacity(request.buttons().len());
        let mut right = inner.right();
        for &button in request.buttons().iter().rev() {
            let label_width = u16::try_from(request.button_label(button).width()).unwrap_or(0);
            let button_width = label_width
                .saturating_add(4)
                .min(right.saturating_sub(inner.x));
            let x = right.saturating_sub(button_width);
            buttons.push((
                button,
                Rect {
                    x,
                    y: buttons_y,
                    width: button_width,
                    height: button_height,
                },
            ));
            right = x.saturating_sub(BUTTON_GAP);
        }
        buttons.reverse();

        Self {
            area,
            panel,
            header,
            message,
            buttons,
            message_lines,
        }
    }

    pub fn hit(&self, column: u16, row: u16) -> HitTarget {
        if let Some((button, _)) = self
            .buttons
            .iter()
            .find(|(_, rect)| contains(*rect, column, row))
        {
            return HitTarget::Button(*button);
        }

        if contains(self.panel, column, row) {
            HitTarget::Panel
        } else {
            HitTarget::Backdrop
        }
    }

    pub fn button_area(&self, button: DialogButton) -> Option<Rect> {
        self.buttons
            .iter()
            .find(|(b, _)| *b == button)
            .map(|(_, rect)| *rect)
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

/// Everything needed to draw one dialog frame
pub struct DialogView<'a> {
    pub request: &'a DialogRequest,
    pub layout: &'a DialogLayout,
    pub focus: DialogButton,
    /// The dialog has resolved and is fading out
    pub fading: bool,
}

pub fn render_dialog(frame: &mut Frame, view: DialogView<'_>, theme: &Theme) {
    let DialogView {
        request,
        layout,
        focus,
        fading,
    } = view;
    let fade = |style: Style| {
        if fading {
            style.add_modifier(Modifier::DIM)
        } else {
            style
        }
    };
    let accent = theme.kind_color(request.kind);

    frame.render_widget(Block::default().style(theme.backdrop_style()), layout.area);
    frame.render_widget(Clear, layout.panel);

    let panel = Block::default()
        .borders(Borders::ALL)
        .border_style(fade(Style::default().fg(accent)))
        .style(fade(theme.panel_style()));
    frame.render_widget(panel, layout.panel);

    let header = Line::from(vec![
        Span::styled(
            request.kind.icon(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            request.effective_title(),
            Style::default()
                .fg(theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(header).style(fade(theme.panel_style())),
        layout.header,
    );

    let message: Vec<Line> = layout
        .message_lines
        .iter()
        .map(|line| Line::from(line.as_str()))
        .collect();
    frame.render_widget(
        Paragraph::new(message).style(fade(theme.panel_style())),
        layout.message,
    );

    for (button, area) in &layout.buttons {
        let focused = *button == focus && !fading;
        let border = if focused {
            Style::default().fg(theme.border_focused)
        } else {
            theme.border_style()
        };
        let widget = Paragraph::new(request.button_label(*button))
            .style(fade(theme.button_style(focused)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(fade(border)));
        frame.render_widget(widget, *area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::DialogKind;

    fn screen() -> Rect {
        Rect::new(0, 0, 80, 24)
    }

    #[test]
    fn test_panel_is_centered_and_bounded() {
        let request = DialogRequest::alert(DialogKind::Info, "Book added to cart!");
        let layout = DialogLayout::calculate(&request, screen());

        assert!(layout.panel.width >= MIN_PANEL_WIDTH);
        assert!(layout.panel.width <= MAX_PANEL_WIDTH);
        let left = layout.panel.x;
        let right = screen().width - layout.panel.right();
        assert!(left.abs_diff(right) <= 1);
        assert_eq!(layout.message_lines, vec!["Book added to cart!".to_string()]);
    }

    #[test]
    fn test_long_messages_wrap_inside_panel() {
        let request = DialogRequest::alert(
            DialogKind::Warning,
            "Quantity must be at least 1. Use Remove button to delete item. ".repeat(3),
        );
        let layout = DialogLayout::calculate(&request, screen());

        assert_eq!(layout.panel.width, MAX_PANEL_WIDTH);
        assert!(layout.message_lines.len() > 1);
        for line in &layout.message_lines {
            assert!(line.width() <= layout.message.width as usize);
        }
    }

    #[test]
    fn test_confirm_buttons_are_ordered_cancel_then_confirm() {
        let request = DialogRequest::confirm("Are you sure you want to clear your cart?");
        let layout = DialogLayout::calculate(&request, screen());

        let cancel = layout.button_area(DialogButton::Secondary).unwrap();
        let confirm = layout.button_area(DialogButton::Primary).unwrap();
        assert!(cancel.right() <= confirm.x);
        assert_eq!(confirm.right(), layout.panel.right() - 2);
    }

    #[test]
    fn test_hit_targets() {
        let request = DialogRequest::confirm("Delete item?");
        let layout = DialogLayout::calculate(&request, screen());

        let confirm = layout.button_area(DialogButton::Primary).unwrap();
        let cancel = layout.button_area(DialogButton::Secondary).unwrap();
        assert_eq!(
            layout.hit(confirm.x + 1, confirm.y + 1),
            HitTarget::Button(DialogButton::Primary)
        );
        assert_eq!(
            layout.hit(cancel.x, cancel.y),
            HitTarget::Button(DialogButton::Secondary)
        );
        assert_eq!(layout.hit(layout.header.x, layout.header.y), HitTarget::Panel);
        assert_eq!(layout.hit(0, 0), HitTarget::Backdrop);
        assert_eq!(layout.hit(layout.panel.right(), layout.panel.y), HitTarget::Backdrop);
    }

    #[test]
    fn test_tiny_area_does_not_overflow() {
        let request = DialogRequest::confirm("Proceed?");
        let layout = DialogLayout::calculate(&request, Rect::new(0, 0, 10, 4));

        assert!(layout.panel.width <= 10);
        assert!(layout.panel.height <= 4);
        for (_, rect) in &layout.buttons {
            assert!(rect.right() <= layout.panel.right());
        }
    }
}
