//! Configuration: config file, env and CLI precedence, key bindings.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{ConfigError, ConfigFile, ResolvedConfig};
