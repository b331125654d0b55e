#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod catalog;
mod error;
mod exercise;
mod generator;
mod location;
mod name;
mod routine;
mod service;
mod settings;
mod state;
mod statistics;
mod workout;

pub use catalog::*;
pub use error::*;
pub use exercise::*;
pub use generator::*;
pub use location::*;
pub use name::*;
pub use routine::*;
pub use service::*;
pub use settings::*;
pub use state::*;
pub use statistics::*;
pub use workout::*;
