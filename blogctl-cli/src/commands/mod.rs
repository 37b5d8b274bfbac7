//! Command implementations for the blogctl CLI

pub mod inspect;
pub mod seed;
