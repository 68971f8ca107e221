pub use lb_cleaner_core::*;
pub use reqwest::StatusCode;

mod error;
pub use error::*;

pub mod paginate;
pub mod service;
