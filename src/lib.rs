pub mod config;
pub mod data_sample;
pub mod logging;
pub mod opts;
pub mod point;
pub mod prelude;
pub mod regression;
pub mod sample;
pub mod web;

pub use crate::prelude::Result;
