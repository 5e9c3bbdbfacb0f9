use crate::domain::{PostDateRecord, PostId};

pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Read side of the content store
pub trait PostRepository {
    /// Fetches every current post with its raw date, in a stable order
    fn fetch_current_posts(&self) -> Result<Vec<PostDateRecord>>;

    fn fetch_post(&self, id: PostId) -> Result<Option<PostDateRecord>>;
}

/// Trait for persisting stardate terms against posts
/// This is a port (interface) that defines how the core communicates with the term store
pub trait TermStore {
    /// Replaces the post's stardate term with `term`
    fn attach_term(&self, post_id: PostId, term: &str) -> Result<()>;

    fn post_terms(&self, post_id: PostId) -> Result<Vec<String>>;

    /// Drops the post's association with any stardate term
    fn remove_terms(&self, post_id: PostId) -> Result<()>;

    /// Deletes every stardate term, returning how many were removed
    fn delete_all_terms(&self) -> Result<usize>;
}
