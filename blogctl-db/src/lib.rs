//! blogctl-db: schema, repositories and fixtures for the blog demo database
//!
//! Tables are dropped and recreated on every rebuild, filled with a fixed
//! set of fixture rows, then read back and updated by the exercise sequence.

pub mod error;
pub mod exercise;
pub mod models;
pub mod pool;
pub mod repos;
pub mod schema;
pub mod seed;

pub use error::{Error, Result};
pub use pool::{connect, connect_with_timeout};
pub use repos::{PostRepo, TagRepo, UserRepo};
