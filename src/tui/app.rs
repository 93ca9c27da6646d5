//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration
//! - Background estimation via worker thread

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::catalog::{Catalog, SummaryTable};
use crate::adapters::fs::FsModelStore;
use crate::application::PredictorService;
use crate::domain::FormDefaults;

use super::ui::{
    estimate::{render_estimate, EstimateState},
    form::{render_form, SpecFormState},
    picker::{render_picker, PickerState},
    render_note,
};
use super::worker::{EstimateProgress, EstimateWorker, EstimateWorkerHandle};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Picker,
    SpecForm,
    Estimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EstimatePhase {
    LoadingModel,
    Predicting,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Brand/model catalog (loaded once at startup)
    catalog: Catalog,

    /// Per-model summary statistics (loaded once at startup)
    summaries: SummaryTable,

    /// Predictor service over the filesystem model store
    service: Arc<PredictorService<FsModelStore>>,

    /// Picker state
    picker_state: PickerState,

    /// Spec form state (present once a car has been picked)
    form_state: Option<SpecFormState>,

    /// Estimate state
    estimate_state: EstimateState,

    /// Pending estimate worker (if running)
    pending_worker: Option<EstimateWorkerHandle>,

    /// Current estimate phase (for UI animation)
    estimate_phase: Option<EstimatePhase>,

    /// When the current phase started (for UI animation)
    phase_started_at: Option<Instant>,
}

impl App {
    /// Create a new application instance from the configured data directory.
    ///
    /// Reads `CARCOST_DATA_DIR` (default `data`) for the catalog and summary
    /// CSVs, and `CARCOST_MODEL_DIR` (default `<data_dir>/models`) for the
    /// artifact store.
    ///
    /// # Errors
    /// Returns error if the startup inputs are missing or malformed.
    pub fn new() -> Result<Self> {
        let data_dir = std::env::var("CARCOST_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let data_dir = std::path::Path::new(&data_dir);

        let catalog = Catalog::load(&data_dir.join("brands_models.csv"))?;
        let summaries = SummaryTable::load(&data_dir.join("variable_summaries.csv"))?;

        let model_dir = std::env::var("CARCOST_MODEL_DIR")
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("models"));
        if !model_dir.is_dir() {
            return Err(anyhow!(
                "Model directory not found at {:?}. Set CARCOST_MODEL_DIR to a directory of per-model JSON artifacts.",
                model_dir
            ));
        }

        let store = Arc::new(FsModelStore::new(model_dir));
        let service = Arc::new(PredictorService::new(store));

        Ok(Self::with_dependencies(catalog, summaries, service))
    }

    /// Create application with injected dependencies.
    ///
    /// Lets `main.rs` or tests construct the catalog, summaries and service
    /// externally.
    #[must_use]
    pub fn with_dependencies(
        catalog: Catalog,
        summaries: SummaryTable,
        service: Arc<PredictorService<FsModelStore>>,
    ) -> Self {
        Self {
            screen: Screen::Picker,
            should_quit: false,
            catalog,
            summaries,
            service,
            picker_state: PickerState::default(),
            form_state: None,
            estimate_state: EstimateState::default(),
            pending_worker: None,
            estimate_phase: None,
            phase_started_at: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            // Poll pending worker for progress updates
            self.poll_worker();

            // Animate estimation progress (fake loading bar)
            self.tick_estimate_progress();

            // Draw current screen
            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(2)])
                    .split(area);

                let content_area = chunks[0];
                let note_area = chunks[1];

                match self.screen {
                    Screen::Picker => {
                        render_picker(f, content_area, &self.picker_state, &self.catalog);
                    }
                    Screen::SpecForm => {
                        if let Some(form) = &self.form_state {
                            render_form(f, content_area, form);
                        }
                    }
                    Screen::Estimate => {
                        let selection = self
                            .form_state
                            .as_ref()
                            .map(|form| (form.brand.as_str(), form.model.as_str()));
                        render_estimate(f, content_area, &self.estimate_state, selection);
                    }
                }

                render_note(f, note_area);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Poll the background worker for progress updates.
    fn poll_worker(&mut self) {
        if self.pending_worker.is_none() {
            return;
        }

        loop {
            let progress = match self
                .pending_worker
                .as_ref()
                .and_then(|worker| worker.try_recv())
            {
                Some(p) => p,
                None => break,
            };

            match progress {
                EstimateProgress::LoadingModel => {
                    self.set_estimate_phase(EstimatePhase::LoadingModel);
                }
                EstimateProgress::Predicting => {
                    self.set_estimate_phase(EstimatePhase::Predicting);
                }
                EstimateProgress::Complete(estimate) => {
                    self.estimate_state = EstimateState::Complete { estimate };
                    self.pending_worker = None;
                    self.estimate_phase = None;
                    self.phase_started_at = None;
                    break;
                }
                EstimateProgress::Error(message) => {
                    self.estimate_state = EstimateState::Error { message };
                    self.pending_worker = None;
                    self.estimate_phase = None;
                    self.phase_started_at = None;
                    break;
                }
            }
        }
    }

    fn set_estimate_phase(&mut self, phase: EstimatePhase) {
        let current_progress = match &self.estimate_state {
            EstimateState::LoadingModel { progress } | EstimateState::Predicting { progress } => {
                *progress
            }
            _ => 0.0,
        };

        let min_start = match phase {
            EstimatePhase::LoadingModel => 0.0,
            EstimatePhase::Predicting => 0.45,
        };
        let progress = current_progress.max(min_start);

        self.estimate_phase = Some(phase);
        self.phase_started_at = Some(Instant::now());

        self.estimate_state = match phase {
            EstimatePhase::LoadingModel => EstimateState::LoadingModel { progress },
            EstimatePhase::Predicting => EstimateState::Predicting { progress },
        };
    }

    fn tick_estimate_progress(&mut self) {
        // Only animate while a worker is running and we're in a progress state.
        if self.pending_worker.is_none() {
            return;
        }

        let Some(phase) = self.estimate_phase else {
            return;
        };
        let Some(started_at) = self.phase_started_at else {
            return;
        };

        let elapsed = Instant::now()
            .saturating_duration_since(started_at)
            .as_secs_f64();

        let (start_floor, target, tau) = match phase {
            EstimatePhase::LoadingModel => (0.02, 0.45, 0.6),
            EstimatePhase::Predicting => (0.45, 0.95, 1.2),
        };

        let current_progress = match &self.estimate_state {
            EstimateState::LoadingModel { progress } | EstimateState::Predicting { progress } => {
                *progress
            }
            _ => return,
        };

        // Smooth, monotonic fake progress: asymptotically approaches the phase target.
        let k = 1.0 - (-elapsed / tau).exp();
        let desired = (start_floor + (target - start_floor) * k).clamp(0.0, target);
        let new_progress = desired.max(current_progress).min(target);

        self.estimate_state = match phase {
            EstimatePhase::LoadingModel => EstimateState::LoadingModel {
                progress: new_progress,
            },
            EstimatePhase::Predicting => EstimateState::Predicting {
                progress: new_progress,
            },
        };
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Picker => self.handle_picker_key(key),
            Screen::SpecForm => self.handle_form_key(key),
            Screen::Estimate => self.handle_estimate_key(key),
        }
    }

    fn handle_picker_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => self.picker_state.move_by(-1, &self.catalog),
            KeyCode::Down => self.picker_state.move_by(1, &self.catalog),
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => self.picker_state.toggle_pane(),
            KeyCode::Enter => self.open_form(),
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn open_form(&mut self) {
        let Some(brand) = self.picker_state.selected_brand(&self.catalog) else {
            self.picker_state.error_message = Some("The catalog is empty".to_string());
            return;
        };
        let Some(model) = self.picker_state.selected_model(&self.catalog) else {
            self.picker_state.error_message = Some(format!("No models listed for {brand}"));
            return;
        };

        let Some(summary) = self.summaries.get(brand, model) else {
            self.picker_state.error_message =
                Some(format!("No summary statistics for {brand} {model}"));
            return;
        };

        let defaults = FormDefaults::from_summary(summary);
        self.form_state = Some(SpecFormState::new(brand, model, defaults));
        self.screen = Screen::SpecForm;
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        let Some(form) = self.form_state.as_mut() else {
            self.screen = Screen::Picker;
            return;
        };

        match key {
            KeyCode::Esc => {
                self.screen = Screen::Picker;
            }
            KeyCode::Up => form.prev_field(),
            KeyCode::Down | KeyCode::Tab => form.next_field(),
            KeyCode::Left => form.adjust(-1),
            KeyCode::Right => form.adjust(1),
            KeyCode::Char('d') | KeyCode::Char('D') => form.reset_to_defaults(),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        // One submission at a time; the form stays up until the worker is free.
        if self.pending_worker.is_some() {
            if let Some(form) = self.form_state.as_mut() {
                form.error_message = Some("An estimation is already running".to_string());
            }
            return;
        }

        let Some(form) = self.form_state.as_mut() else {
            return;
        };

        let spec = form.to_spec();
        if let Err(errors) = spec.validate() {
            form.error_message = Some(errors.join(", "));
            return;
        }
        let key = form.model_key();

        // Switch to the estimate screen with initial state
        self.screen = Screen::Estimate;
        self.estimate_state = EstimateState::LoadingModel { progress: 0.0 };
        self.estimate_phase = Some(EstimatePhase::LoadingModel);
        self.phase_started_at = Some(Instant::now());

        // Spawn background worker so the main loop keeps drawing
        let worker = EstimateWorker::spawn(self.service.clone(), spec, key);
        self.pending_worker = Some(worker);
    }

    fn handle_estimate_key(&mut self, key: KeyCode) {
        match &self.estimate_state {
            EstimateState::Complete { .. } => match key {
                KeyCode::Enter | KeyCode::Esc => {
                    self.estimate_state = EstimateState::Idle;
                    self.screen = Screen::Picker;
                }
                KeyCode::Char('s') | KeyCode::Char('S') => {
                    self.estimate_state = EstimateState::Idle;
                    self.screen = Screen::SpecForm;
                }
                _ => {}
            },
            EstimateState::Error { .. } => match key {
                KeyCode::Enter => {
                    self.estimate_state = EstimateState::Idle;
                    self.screen = Screen::SpecForm;
                }
                KeyCode::Esc => {
                    self.estimate_state = EstimateState::Idle;
                    self.screen = Screen::Picker;
                }
                _ => {}
            },
            _ => {}
        }
    }
}
