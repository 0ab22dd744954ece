// Service exports
pub mod loader;

pub use loader::{CsvPointSource, LinePointSource, PointSource};
