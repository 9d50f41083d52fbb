pub mod loader;
pub mod schema;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::{
    HighlightConfig, KeysConfig, LoggingConfig, NavigationConfig, ReplayConfig, TimingConfig,
};
