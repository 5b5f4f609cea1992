pub mod input;
pub mod loader;

pub use input::InputFilter;
pub use loader::{ConfigFormat, ConfigPathManager, RuleLoader};
