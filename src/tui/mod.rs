//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a keyboard-driven interface for:
//! - Brand/model picking
//! - Vehicle specification input
//! - Price estimation with cost-of-ownership deltas

mod app;
mod styles;
mod ui;
mod worker;

pub use app::App;
pub use styles::MotorTheme;
pub use worker::{EstimateProgress, EstimateWorker, EstimateWorkerHandle};
