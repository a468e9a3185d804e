//! Quiz wizard: nine fixed screens, their guards, and the simulated loading step.

pub mod contact;
pub mod loading;
pub mod machine;
pub mod step;

pub use contact::ContactErrors;
pub use loading::{LoadingConfig, LoadingTask, Progress, STATUS_LINES};
pub use machine::{Effect, Event, Submission, Wizard, WizardError};
pub use step::{Screen, Step};
