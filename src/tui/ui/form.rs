//! Vehicle specification form.
//!
//! All fields are steppers or cycles: values are adjusted with ←/→ inside
//! the bounds seeded from the per-model summary statistics, so invalid
//! input is structurally impossible.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{
    Country, FormDefaults, FuelCategory, ModelKey, Transmission, VehicleSpec, REFERENCE_YEAR,
};
use crate::tui::styles::MotorTheme;

/// Number of form fields.
const FIELD_COUNT: usize = 7;

/// Mileage stepper bounds and step (km).
const MILEAGE_MAX: u32 = 1_000_000;
const MILEAGE_STEP: u32 = 2_000;

/// Power stepper bounds and step (hp).
const POWER_MIN: u32 = 20;
const POWER_MAX: u32 = 1_000;
const POWER_STEP: u32 = 10;

/// Fuel consumption bounds and step (l/100km).
const CONSUMPTION_MIN: f64 = 1.0;
const CONSUMPTION_MAX: f64 = 40.0;
const CONSUMPTION_STEP: f64 = 0.2;

/// Spec form state for one brand/model pair.
pub struct SpecFormState {
    pub brand: String,
    pub model: String,
    defaults: FormDefaults,

    pub year: i32,
    pub mileage: u32,
    pub power: u32,
    pub transmission_index: usize,
    pub fuel_index: usize,
    pub fuel_consumption: f64,
    pub country_index: usize,

    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl SpecFormState {
    /// Create a form seeded from the per-model defaults.
    #[must_use]
    pub fn new(brand: impl Into<String>, model: impl Into<String>, defaults: FormDefaults) -> Self {
        let mut state = Self {
            brand: brand.into(),
            model: model.into(),
            defaults,
            year: 0,
            mileage: 0,
            power: 0,
            transmission_index: 0,
            fuel_index: 0,
            fuel_consumption: 0.0,
            country_index: 0,
            selected_field: 0,
            error_message: None,
        };
        state.reset_to_defaults();
        state
    }

    /// Restore all fields to the seeded defaults.
    pub fn reset_to_defaults(&mut self) {
        self.year = self.defaults.year;
        self.mileage = self.defaults.mileage.min(MILEAGE_MAX);
        self.power = self.defaults.power.clamp(POWER_MIN, POWER_MAX);
        self.transmission_index = 0;
        self.fuel_index = 0;
        self.fuel_consumption = self
            .defaults
            .fuel_consumption
            .clamp(CONSUMPTION_MIN, CONSUMPTION_MAX);
        self.country_index = 0;
        self.error_message = None;
    }

    /// Move to the next field.
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % FIELD_COUNT;
    }

    /// Move to the previous field.
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = FIELD_COUNT - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Step the selected field up or down.
    pub fn adjust(&mut self, direction: i32) {
        self.error_message = None;
        let up = direction > 0;
        match self.selected_field {
            0 => {
                self.year = (self.year + direction.signum())
                    .clamp(self.defaults.year_min, self.defaults.year_max);
            }
            1 => {
                self.mileage = if up {
                    self.mileage.saturating_add(MILEAGE_STEP).min(MILEAGE_MAX)
                } else {
                    self.mileage.saturating_sub(MILEAGE_STEP)
                };
            }
            2 => {
                self.power = if up {
                    self.power.saturating_add(POWER_STEP).min(POWER_MAX)
                } else {
                    self.power.saturating_sub(POWER_STEP).max(POWER_MIN)
                };
            }
            3 => {
                self.transmission_index =
                    cycle(self.transmission_index, Transmission::ALL.len(), direction);
            }
            4 => {
                self.fuel_index = cycle(self.fuel_index, FuelCategory::ALL.len(), direction);
            }
            5 => {
                let next = if up {
                    self.fuel_consumption + CONSUMPTION_STEP
                } else {
                    self.fuel_consumption - CONSUMPTION_STEP
                };
                // Re-round so repeated stepping cannot accumulate drift.
                self.fuel_consumption =
                    ((next * 10.0).round() / 10.0).clamp(CONSUMPTION_MIN, CONSUMPTION_MAX);
            }
            _ => {
                self.country_index = cycle(self.country_index, Country::ALL.len(), direction);
            }
        }
    }

    /// The store key for this form's brand/model pair.
    #[must_use]
    pub fn model_key(&self) -> ModelKey {
        ModelKey::new(&self.brand, &self.model)
    }

    /// Build the prediction input from the current field values.
    #[must_use]
    pub fn to_spec(&self) -> VehicleSpec {
        VehicleSpec {
            age: f64::from(REFERENCE_YEAR - self.year),
            mileage: self.mileage,
            power: self.power,
            transmission: Transmission::ALL[self.transmission_index],
            fuel: FuelCategory::ALL[self.fuel_index],
            country: Country::ALL[self.country_index],
        }
    }

    fn field_label(&self, index: usize) -> &'static str {
        match index {
            0 => "Year of first registration",
            1 => "Mileage",
            2 => "Power",
            3 => "Transmission",
            4 => "Fuel type",
            5 => "Fuel consumption",
            _ => "Country",
        }
    }

    fn field_value(&self, index: usize) -> String {
        match index {
            0 => self.year.to_string(),
            1 => format!("{} km", self.mileage),
            2 => format!("{} hp", self.power),
            3 => Transmission::ALL[self.transmission_index].to_string(),
            4 => FuelCategory::ALL[self.fuel_index].to_string(),
            5 => format!("{:.1} l/100km", self.fuel_consumption),
            _ => Country::ALL[self.country_index].to_string(),
        }
    }

    fn field_hint(&self, index: usize) -> String {
        match index {
            0 => format!("{}-{}", self.defaults.year_min, self.defaults.year_max),
            1 => format!("step {MILEAGE_STEP}"),
            2 => format!("{POWER_MIN}-{POWER_MAX}, step {POWER_STEP}"),
            3 | 4 => "cycle".to_string(),
            5 => format!("{CONSUMPTION_MIN:.1}-{CONSUMPTION_MAX:.1}, step {CONSUMPTION_STEP:.1}"),
            _ => "cycle".to_string(),
        }
    }
}

fn cycle(index: usize, len: usize, direction: i32) -> usize {
    (index as i64 + i64::from(direction.signum())).rem_euclid(len as i64) as usize
}

/// Render the vehicle specification form.
pub fn render_form(f: &mut Frame, area: Rect, state: &SpecFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], state);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect, state: &SpecFormState) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MotorTheme::text()),
        Span::styled("Specify your car", MotorTheme::title()),
        Span::styled(
            format!(" │ {} {}", state.brand, state.model),
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

fn render_form_fields(f: &mut Frame, area: Rect, state: &SpecFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = FIELD_COUNT.div_ceil(2);

    render_field_column(f, columns[0], state, 0, mid);
    render_field_column(f, columns[1], state, mid, FIELD_COUNT);
}

fn render_field_column(f: &mut Frame, area: Rect, state: &SpecFormState, from: usize, to: usize) {
    let field_height = 3;
    let constraints: Vec<Constraint> = (from..to)
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (chunk, index) in chunks.iter().zip(from..to) {
        let is_selected = index == state.selected_field;
        let border_style = if is_selected {
            MotorTheme::border_focused()
        } else {
            MotorTheme::border()
        };
        let title_style = if is_selected {
            MotorTheme::focused()
        } else {
            MotorTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", state.field_label(index)),
                title_style,
            ))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" ")];
        if is_selected {
            spans.push(Span::styled("◂ ", MotorTheme::key_hint()));
        }
        spans.push(Span::styled(state.field_value(index), MotorTheme::text()));
        if is_selected {
            spans.push(Span::styled(" ▸", MotorTheme::key_hint()));
        }
        spans.push(Span::styled(
            format!("  ({})", state.field_hint(index)),
            MotorTheme::text_muted(),
        ));

        let content = Paragraph::new(Line::from(spans)).block(block);
        f.render_widget(content, *chunk);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &SpecFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MotorTheme::danger()),
            Span::styled(err.clone(), MotorTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MotorTheme::key_hint()),
            Span::styled("Navigate ", MotorTheme::key_desc()),
            Span::styled("[←→] ", MotorTheme::key_hint()),
            Span::styled("Adjust ", MotorTheme::key_desc()),
            Span::styled("[D] ", MotorTheme::key_hint()),
            Span::styled("Defaults ", MotorTheme::key_desc()),
            Span::styled("[Enter] ", MotorTheme::key_hint()),
            Span::styled("Estimate ", MotorTheme::key_desc()),
            Span::styled("[Esc] ", MotorTheme::key_hint()),
            Span::styled("Back", MotorTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MotorTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CarSummary, FeatureSummary};

    fn defaults() -> FormDefaults {
        FormDefaults::from_summary(&CarSummary {
            age: FeatureSummary {
                min: 1.0,
                max: 12.0,
                mean: 5.0,
            },
            mileage: FeatureSummary {
                min: 0.0,
                max: 250_000.0,
                mean: 78_430.0,
            },
            power: FeatureSummary {
                min: 60.0,
                max: 300.0,
                mean: 109.6,
            },
            fuel_consumption: FeatureSummary {
                min: 3.0,
                max: 12.0,
                mean: 5.43,
            },
        })
    }

    #[test]
    fn test_form_is_seeded_from_defaults() {
        let form = SpecFormState::new("VW", "Golf", defaults());
        assert_eq!(form.year, 2017);
        assert_eq!(form.mileage, 78_000);
        assert_eq!(form.power, 110);
        assert!((form.fuel_consumption - 5.4).abs() < 1e-9);
    }

    #[test]
    fn test_year_stepper_respects_summary_bounds() {
        let mut form = SpecFormState::new("VW", "Golf", defaults());
        form.selected_field = 0;

        for _ in 0..100 {
            form.adjust(1);
        }
        assert_eq!(form.year, 2022);

        for _ in 0..100 {
            form.adjust(-1);
        }
        assert_eq!(form.year, 2009);
    }

    #[test]
    fn test_mileage_steps_by_2000_and_stops_at_zero() {
        let mut form = SpecFormState::new("VW", "Golf", defaults());
        form.selected_field = 1;

        form.adjust(1);
        assert_eq!(form.mileage, 80_000);

        for _ in 0..100 {
            form.adjust(-1);
        }
        assert_eq!(form.mileage, 0);
    }

    #[test]
    fn test_cycles_wrap_in_both_directions() {
        let mut form = SpecFormState::new("VW", "Golf", defaults());

        form.selected_field = 3;
        form.adjust(-1);
        assert_eq!(form.transmission_index, Transmission::ALL.len() - 1);
        form.adjust(1);
        assert_eq!(form.transmission_index, 0);

        form.selected_field = 6;
        for _ in 0..Country::ALL.len() {
            form.adjust(1);
        }
        assert_eq!(form.country_index, 0);
    }

    #[test]
    fn test_to_spec_converts_year_to_age() {
        let mut form = SpecFormState::new("VW", "Golf", defaults());
        form.year = 2019;
        form.selected_field = 3;
        form.adjust(1); // Manual

        let spec = form.to_spec();
        assert!((spec.age - 3.0).abs() < f64::EPSILON);
        assert_eq!(spec.transmission, Transmission::Manual);
        assert_eq!(spec.mileage, form.mileage);
        assert_eq!(form.model_key().as_str(), "VW#Golf");
    }

    #[test]
    fn test_consumption_stepper_does_not_drift() {
        let mut form = SpecFormState::new("VW", "Golf", defaults());
        form.selected_field = 5;

        for _ in 0..3 {
            form.adjust(1);
        }
        assert!((form.fuel_consumption - 6.0).abs() < 1e-9);
    }
}
