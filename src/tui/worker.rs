//! Background estimate worker.
//!
//! Runs one submission off the main loop so the terminal stays responsive
//! while the artifact is read from disk. The app polls the channel each
//! frame; only one worker may be pending at a time, which serializes
//! submissions.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::PredictorService;
use crate::domain::{ModelKey, PriceEstimate, VehicleSpec};
use crate::ports::ModelStore;

/// Progress updates from the estimate worker.
#[derive(Debug, Clone)]
pub enum EstimateProgress {
    /// Loading the regression artifact from the store
    LoadingModel,
    /// Artifact loaded, running the three predictions
    Predicting,
    /// Submission complete
    Complete(PriceEstimate),
    /// Error occurred during the submission
    Error(String),
}

/// Handle to a running estimate worker.
pub struct EstimateWorkerHandle {
    progress_rx: Receiver<EstimateProgress>,
    _handle: JoinHandle<()>,
}

impl EstimateWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<EstimateProgress> {
        self.progress_rx.try_recv().ok()
    }
}

/// Worker that runs one estimate submission in the background.
pub struct EstimateWorker;

impl EstimateWorker {
    /// Spawn a background estimation task.
    ///
    /// Returns a handle to receive progress updates.
    pub fn spawn<S>(
        service: Arc<PredictorService<S>>,
        spec: VehicleSpec,
        key: ModelKey,
    ) -> EstimateWorkerHandle
    where
        S: ModelStore + Send + Sync + 'static,
        S::Error: Into<crate::adapters::StoreError> + Send,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_with_progress(&service, &spec, &key, &tx);
        });

        EstimateWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_with_progress<S>(
        service: &PredictorService<S>,
        spec: &VehicleSpec,
        key: &ModelKey,
        tx: &Sender<EstimateProgress>,
    ) where
        S: ModelStore + Send + Sync + 'static,
        S::Error: Into<crate::adapters::StoreError> + Send,
    {
        let _ = tx.send(EstimateProgress::LoadingModel);

        // Small delay so the UI can show the phase before it flips.
        thread::sleep(std::time::Duration::from_millis(100));

        let _ = tx.send(EstimateProgress::Predicting);

        match service.estimate(spec, key) {
            Ok(estimate) => {
                let _ = tx.send(EstimateProgress::Complete(estimate));
            }
            Err(e) => {
                let _ = tx.send(EstimateProgress::Error(e.to_string()));
            }
        }
    }
}
