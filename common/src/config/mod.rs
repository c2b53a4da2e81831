mod file;

pub use file::{load_config, load_config_from, ServiceConfig, CONFIG_PATHS};
