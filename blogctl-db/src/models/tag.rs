use serde::Serialize;
use sqlx::FromRow;

/// Tag record from database
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, FromRow)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}
