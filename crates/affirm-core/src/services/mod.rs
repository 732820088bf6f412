//! Application services shared by all front ends

mod affirmations;

pub use affirmations::{AffirmationService, WidgetUpdate};
