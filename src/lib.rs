pub mod clusters;
pub mod config;
pub mod error;
pub mod export;
pub mod gc_content;
pub mod pipeline;
pub mod plots;
pub mod targets;
