//! affirm-core - Core library for Affirm
//!
//! This crate contains the shared models, storage layer, random selection and
//! widget bridge used by all Affirm front ends.

pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod selector;
pub mod services;
pub mod util;
pub mod widget;

pub use error::{Error, Result};
pub use models::{Affirmation, AffirmationId, Settings};
pub use selector::{RandomSelector, RandomSource};
