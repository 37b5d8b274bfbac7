//! Row views and write inputs for users, posts and tags
//!
//! Views derive `Serialize` so results can be printed as JSON.

pub mod post;
pub mod tag;
pub mod user;

pub use post::{Author, NewPost, Post, PostUpdate};
pub use tag::Tag;
pub use user::{NewUser, User, UserUpdate, UserWithPosts};
