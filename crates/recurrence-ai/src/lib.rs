pub mod analytics;
pub mod clinical;
pub mod config;
pub mod decision;
pub mod error;
pub mod export;
pub mod history;
pub mod model;
pub mod narration;
pub mod session;
pub mod telemetry;
