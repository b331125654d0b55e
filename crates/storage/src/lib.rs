#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod json_store;
pub mod log;

pub use json_store::*;
