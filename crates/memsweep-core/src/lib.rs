pub mod config;
pub mod logging;

pub mod artifacts;
pub mod checksum;
pub mod jobs;
pub mod pipeline;
pub mod protonate;
pub mod report;
pub mod resume;
pub mod scheduler;
pub mod template;
pub mod validate;
