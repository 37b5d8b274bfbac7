use serde::Serialize;

use super::Tag;

/// Public author details embedded in a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub location: String,
}

/// Post hydrated with its author and tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub active: bool,
    pub author: Author,
    pub tags: Vec<Tag>,
}

impl Post {
    /// Tag names in the order they were loaded.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Input for inserting a post; tags are created on demand.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i32,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Partial update for a post.
///
/// `tags: Some(list)` replaces the post's tag set with `list`;
/// `tags: None` leaves the links untouched.
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub active: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl PostUpdate {
    /// Whether any column of the `posts` row itself changes.
    pub fn touches_row(&self) -> bool {
        self.title.is_some() || self.content.is_some() || self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_only_update_leaves_row() {
        let update = PostUpdate {
            tags: Some(vec!["#redfish".to_string()]),
            ..Default::default()
        };
        assert!(!update.touches_row());

        let update = PostUpdate {
            title: Some("New Title".to_string()),
            ..Default::default()
        };
        assert!(update.touches_row());
    }

    #[test]
    fn tag_names_preserve_order() {
        let post = Post {
            id: 1,
            title: "First Post".to_string(),
            content: "hello".to_string(),
            active: true,
            author: Author {
                id: 1,
                username: "albert".to_string(),
                name: "Albert".to_string(),
                location: "Tokyo".to_string(),
            },
            tags: vec![
                Tag { id: 1, name: "#happy".to_string() },
                Tag { id: 2, name: "#youcandoanything".to_string() },
            ],
        };

        assert_eq!(post.tag_names(), vec!["#happy", "#youcandoanything"]);
    }
}
