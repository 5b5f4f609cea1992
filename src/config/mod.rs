pub mod filter;

pub use filter::{ConfigOrigin, CustomConfigBuilder, FilterConfig, OutputOptions};
