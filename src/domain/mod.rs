pub mod control;
pub mod models;
pub mod registry;
pub mod settings;
pub mod telemetry;
pub mod trip;
