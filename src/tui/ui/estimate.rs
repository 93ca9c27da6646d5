//! Estimate progress and result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::domain::{PriceEstimate, AGE_DELTA_YEARS, MILEAGE_DELTA_KM};
use crate::tui::styles::MotorTheme;

/// Estimate screen state.
#[derive(Debug, Clone, Default)]
pub enum EstimateState {
    /// Not started
    #[default]
    Idle,
    /// Loading the regression artifact
    LoadingModel { progress: f64 },
    /// Running the three predictions
    Predicting { progress: f64 },
    /// Completed with result
    Complete { estimate: PriceEstimate },
    /// Error occurred
    Error { message: String },
}

/// Render the estimate view. `selection` is the (brand, model) pair the
/// submission was made for.
pub fn render_estimate(
    f: &mut Frame,
    area: Rect,
    state: &EstimateState,
    selection: Option<(&str, &str)>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_estimate_header(f, chunks[0], selection);
    render_estimate_content(f, chunks[1], state);
    render_estimate_footer(f, chunks[2], state);
}

fn render_estimate_header(f: &mut Frame, area: Rect, selection: Option<(&str, &str)>) {
    let subject = selection
        .map(|(brand, model)| format!(" │ Results for {brand} {model}"))
        .unwrap_or_default();

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MotorTheme::text()),
        Span::styled("Price estimate", MotorTheme::title()),
        Span::styled(subject, MotorTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MotorTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_estimate_content(f: &mut Frame, area: Rect, state: &EstimateState) {
    match state {
        EstimateState::Idle => render_idle(f, area),
        EstimateState::LoadingModel { progress } => render_progress(
            f,
            area,
            "Loading model",
            *progress,
            "Reading the fitted regression from the model store...",
        ),
        EstimateState::Predicting { progress } => render_progress(
            f,
            area,
            "Predicting",
            *progress,
            "Evaluating base price and perturbed prices...",
        ),
        EstimateState::Complete { estimate } => render_result(f, area, estimate),
        EstimateState::Error { message } => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Ready to estimate",
            MotorTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Pick a car and submit the spec form to begin",
            MotorTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MotorTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_progress(f: &mut Frame, area: Rect, stage: &str, progress: f64, description: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let stage_text = Paragraph::new(Line::from(vec![
        Span::styled("Stage: ", MotorTheme::text_secondary()),
        Span::styled(stage, MotorTheme::focused()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(stage_text, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MotorTheme::border()),
        )
        .gauge_style(MotorTheme::info())
        .percent((progress * 100.0) as u16)
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, chunks[1]);

    let desc = Paragraph::new(Line::from(Span::styled(
        description,
        MotorTheme::text_muted(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(desc, chunks[2]);
}

fn render_result(f: &mut Frame, area: Rect, estimate: &PriceEstimate) {
    let block = Block::default()
        .title(Span::styled(" Estimate ", MotorTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MotorTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Price
            Constraint::Length(2), // Sample size
            Constraint::Length(5), // Cost metrics
            Constraint::Min(0),    // Padding
        ])
        .margin(1)
        .split(inner);

    let price_display = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{}€", estimate.rounded_price()),
            MotorTheme::success().add_modifier(ratatui::style::Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Predicted market price",
            MotorTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(price_display, chunks[0]);

    let nobs = Paragraph::new(Line::from(vec![
        Span::styled("Cars in data set: ", MotorTheme::text_secondary()),
        Span::styled(estimate.nobs.to_string(), MotorTheme::text()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(nobs, chunks[1]);

    render_cost_metrics(f, chunks[2], estimate);
}

fn render_cost_metrics(f: &mut Frame, area: Rect, estimate: &PriceEstimate) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_metric(
        f,
        columns[0],
        &format!("Costs of an additional {MILEAGE_DELTA_KM}km"),
        estimate.mileage_cost,
    );
    let months = (AGE_DELTA_YEARS * 12.0).round() as i64;
    render_metric(
        f,
        columns[1],
        &format!("Costs of {months} more month of age (depreciation)"),
        estimate.age_cost,
    );
}

fn render_metric(f: &mut Frame, area: Rect, label: &str, value: f64) {
    let block = Block::default()
        .title(Span::styled(format!(" {label} "), MotorTheme::text_secondary()))
        .borders(Borders::ALL)
        .border_style(MotorTheme::border());

    let metric = Paragraph::new(Line::from(Span::styled(
        format!("{value:.2}€"),
        MotorTheme::warning(),
    )))
    .alignment(Alignment::Center)
    .block(block);

    f.render_widget(metric, area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Estimation failed", MotorTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MotorTheme::text())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MotorTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_estimate_footer(f: &mut Frame, area: Rect, state: &EstimateState) {
    let content = match state {
        EstimateState::Complete { .. } => Line::from(vec![
            Span::styled("[Enter] ", MotorTheme::key_hint()),
            Span::styled("Back to Picker ", MotorTheme::key_desc()),
            Span::styled("[S] ", MotorTheme::key_hint()),
            Span::styled("Adjust Spec", MotorTheme::key_desc()),
        ]),
        EstimateState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", MotorTheme::key_hint()),
            Span::styled("Back to Form ", MotorTheme::key_desc()),
            Span::styled("[Esc] ", MotorTheme::key_hint()),
            Span::styled("Back to Picker", MotorTheme::key_desc()),
        ]),
        _ => Line::from(vec![Span::styled(
            "Processing...",
            MotorTheme::text_muted(),
        )]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MotorTheme::border()),
    );

    f.render_widget(footer, area);
}
