mod loader;
mod structs;

pub use loader::{get_config_dir, load_config, load_config_from};
pub use structs::*;
