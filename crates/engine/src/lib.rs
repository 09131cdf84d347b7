//! # CleanSight Engine
//!
//! The engine owns the client-side workflow around one dataset analysis:
//! choosing the input, submitting it, holding the resulting report and
//! downloading the artifacts generated for it.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use cleansight_engine::{LogNotifier, WorkflowController};
//! use cleansight_util::{Settings, SettingsOverrides};
//!
//! let settings = Settings::resolve(SettingsOverrides::default())?;
//! let mut controller = WorkflowController::from_settings(&settings, Arc::new(LogNotifier))?;
//! controller.set_pasted_text("a,b\n1,2\n");
//! controller.submit().await?;
//! let saved_to = controller.download_report().await?;
//! ```
//!
//! ## Architecture
//!
//! - **`controller`**: the state object and its operations
//! - **`ports`**: async traits for the backend, the file sink and notifications
//! - **`adapters`**: implementations of the ports over `cleansight-api` and `cleansight-util`
//! - **`deadline`**: per-call timeout and cancellation

pub mod adapters;
pub mod controller;
pub mod deadline;
pub mod error;
pub mod ports;

pub use controller::{SubmissionTicket, WorkflowController, WorkflowServices};
pub use error::WorkflowError;
pub use ports::{AnalysisService, ArtifactFetcher, ArtifactSink, LogNotifier, Notifier};
