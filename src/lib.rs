pub mod batch;
pub mod cli;
pub mod login;
pub mod serial;
pub mod telemetry;
