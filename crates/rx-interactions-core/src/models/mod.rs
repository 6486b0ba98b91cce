//! Domain models for the interaction engine.

mod allergy;
mod drug;
mod interaction;
mod patient;

pub use allergy::*;
pub use drug::*;
pub use interaction::*;
pub use patient::*;
