//! Repository implementations for database access
//!
//! Each repository borrows the pool and issues plain parameterized
//! statements:
//! - Inserts rely on ON CONFLICT rather than check-then-insert
//! - Post hydration loads authors via JOIN and tags in one batch (no N+1)

pub mod posts;
pub mod tags;
pub mod users;

pub use posts::PostRepo;
pub use tags::TagRepo;
pub use users::UserRepo;
