pub mod analytics;
pub mod config;
pub mod leads;
pub mod output;
pub mod scoring;
pub mod stderr_buffer;
pub mod tui;
