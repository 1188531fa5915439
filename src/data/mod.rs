pub mod export;
pub mod loader;

pub use export::{write_samples, write_samples_csv};
pub use loader::{load_character, load_simulation_config};
