pub mod auth;
pub mod calculator;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod goal;
pub mod models;
pub mod service;
pub mod session;
pub mod store;
pub mod tracker;

pub use error::{LighterError, Result};
