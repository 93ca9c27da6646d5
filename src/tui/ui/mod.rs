//! UI module: View components for the TUI.

pub mod estimate;
pub mod form;
pub mod picker;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MotorTheme;

pub fn render_note(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        "Estimates are statistical, based on historical listings; they are not an offer to buy or sell.",
        MotorTheme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MotorTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
