pub mod file_runner;

pub use file_runner::{FileRunner, OutputPlan, RunReport};
