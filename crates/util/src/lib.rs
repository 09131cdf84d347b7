pub mod settings;
pub mod sink;

pub use settings::*;
pub use sink::{DirectorySink, SinkError};
