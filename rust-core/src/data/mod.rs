//! Delimited-text input and output

pub mod loader;
pub mod export;

pub use loader::{SignalLoader, load_channel};
pub use export::{default_output_path, save_csv, write_csv};
