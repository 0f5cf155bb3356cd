pub mod assessment;
pub mod catalog;
pub mod config;
pub mod error;
pub mod paths;
pub mod question;
pub mod report;
pub mod scoring;
pub mod store;
pub mod types;
pub mod user;

pub use error::{ReadinessError, Result};
