//! Brand and model picker.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::adapters::catalog::Catalog;
use crate::tui::styles::MotorTheme;

/// Which pane has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerPane {
    Brands,
    Models,
}

/// Picker state: current brand/model highlight.
pub struct PickerState {
    pub pane: PickerPane,
    pub brand_index: usize,
    pub model_index: usize,
    pub error_message: Option<String>,
}

impl Default for PickerState {
    fn default() -> Self {
        Self {
            pane: PickerPane::Brands,
            brand_index: 0,
            model_index: 0,
            error_message: None,
        }
    }
}

impl PickerState {
    /// Move the highlight within the focused pane.
    pub fn move_by(&mut self, delta: i32, catalog: &Catalog) {
        let (index, len) = match self.pane {
            PickerPane::Brands => (&mut self.brand_index, catalog.brands().len()),
            PickerPane::Models => {
                let len = self.models_len(catalog);
                (&mut self.model_index, len)
            }
        };
        if len == 0 {
            return;
        }
        let next = (*index as i64 + i64::from(delta)).rem_euclid(len as i64);
        *index = next as usize;

        // A new brand invalidates the model highlight.
        if self.pane == PickerPane::Brands {
            self.model_index = 0;
        }
        self.error_message = None;
    }

    /// Switch focus between the brand and model pane.
    pub fn toggle_pane(&mut self) {
        self.pane = match self.pane {
            PickerPane::Brands => PickerPane::Models,
            PickerPane::Models => PickerPane::Brands,
        };
    }

    /// The highlighted brand, if the catalog has any.
    #[must_use]
    pub fn selected_brand<'a>(&self, catalog: &'a Catalog) -> Option<&'a str> {
        catalog.brands().get(self.brand_index).copied()
    }

    /// The highlighted model of the highlighted brand.
    #[must_use]
    pub fn selected_model<'a>(&self, catalog: &'a Catalog) -> Option<&'a str> {
        let brand = self.selected_brand(catalog)?;
        catalog.models_of(brand).get(self.model_index).copied()
    }

    fn models_len(&self, catalog: &Catalog) -> usize {
        self.selected_brand(catalog)
            .map(|b| catalog.models_of(b).len())
            .unwrap_or(0)
    }
}

/// Render the brand/model picker.
pub fn render_picker(f: &mut Frame, area: Rect, state: &PickerState, catalog: &Catalog) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Lists
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_lists(f, chunks[1], state, catalog);
    render_footer(f, chunks[2], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MotorTheme::text()),
        Span::styled("carcost", MotorTheme::title()),
        Span::styled(
            " │ Car prices and costs of ownership",
            MotorTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MotorTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_lists(f: &mut Frame, area: Rect, state: &PickerState, catalog: &Catalog) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    render_list(
        f,
        columns[0],
        "Brand",
        &catalog.brands(),
        state.brand_index,
        state.pane == PickerPane::Brands,
    );

    let models = state
        .selected_brand(catalog)
        .map(|b| catalog.models_of(b))
        .unwrap_or_default();
    render_list(
        f,
        columns[1],
        "Model",
        &models,
        state.model_index,
        state.pane == PickerPane::Models,
    );
}

fn render_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    items: &[&str],
    selected: usize,
    focused: bool,
) {
    let border_style = if focused {
        MotorTheme::border_focused()
    } else {
        MotorTheme::border()
    };
    let title_style = if focused {
        MotorTheme::focused()
    } else {
        MotorTheme::text_secondary()
    };

    let list_items: Vec<ListItem> = items
        .iter()
        .map(|item| ListItem::new(Line::from(Span::styled(format!(" {item}"), MotorTheme::text()))))
        .collect();

    let list = List::new(list_items)
        .block(
            Block::default()
                .title(Span::styled(format!(" {title} "), title_style))
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(MotorTheme::selected());

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(selected.min(items.len() - 1)));
    }

    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_footer(f: &mut Frame, area: Rect, state: &PickerState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MotorTheme::danger()),
            Span::styled(err.clone(), MotorTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MotorTheme::key_hint()),
            Span::styled("Navigate ", MotorTheme::key_desc()),
            Span::styled("[Tab] ", MotorTheme::key_hint()),
            Span::styled("Switch Pane ", MotorTheme::key_desc()),
            Span::styled("[Enter] ", MotorTheme::key_hint()),
            Span::styled("Specify Car ", MotorTheme::key_desc()),
            Span::styled("[Q] ", MotorTheme::key_hint()),
            Span::styled("Quit", MotorTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MotorTheme::border()),
    );

    f.render_widget(footer, area);
}
