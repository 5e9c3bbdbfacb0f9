pub mod application;
pub mod bulk;
pub mod calculator;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;
