use crate::bulk::associate_all;
use crate::calculator::{calculate_now, calculate_str};
use crate::domain::{BulkRunOutcome, ClearOutcome, PostId, StardateConfig};
use crate::error::Error;
use crate::ports::{PostRepository, Result, TermStore};
use crate::utils::slugify;
use tracing::{info, warn};

/// Application service for keeping stardate terms in step with posts
pub struct StardateServiceImpl {
    post_repository: Box<dyn PostRepository>,
    term_store: Box<dyn TermStore>,
    config: StardateConfig,
}

impl StardateServiceImpl {
    /// Creates a new StardateServiceImpl with the given dependencies
    pub fn new(
        post_repository: Box<dyn PostRepository>,
        term_store: Box<dyn TermStore>,
        config: StardateConfig,
    ) -> Self {
        Self {
            post_repository,
            term_store,
            config,
        }
    }

    /// Recalculates and attaches a stardate for every current post
    /// Per-post failures end up in the outcome; only failing to list the
    /// posts is an error.
    pub fn associate_all_posts(&self) -> Result<BulkRunOutcome> {
        let posts = self.post_repository.fetch_current_posts()?;
        let outcome = associate_all(&posts, &self.config, |id, term| {
            self.term_store.attach_term(id, term)
        });

        info!(
            style = %self.config.style,
            total = posts.len(),
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "stardate sweep finished"
        );
        Ok(outcome)
    }

    /// Attaches a stardate to a single post
    /// Returns `None` when the post has no date.
    pub fn associate_post(&self, id: PostId) -> Result<Option<String>> {
        let post = self
            .post_repository
            .fetch_post(id)?
            .ok_or(Error::PostNotFound(id))?;

        if !post.has_date() {
            return Ok(None);
        }

        let stardate = calculate_str(&post.date, &self.config)?;
        self.term_store.attach_term(id, &stardate)?;
        Ok(Some(stardate))
    }

    /// Stardate shown for a post: the stored term, or a freshly attached one
    pub fn stardate_for_post(&self, id: PostId) -> Result<Option<String>> {
        let existing = self.term_store.post_terms(id)?;
        if let Some(term) = existing.into_iter().find(|t| !t.is_empty()) {
            return Ok(Some(term));
        }
        self.associate_post(id)
    }

    /// URL slug of a post's stardate, `unknown` when the post has no date
    pub fn slug_for_post(&self, id: PostId) -> Result<String> {
        Ok(self
            .stardate_for_post(id)?
            .map(|stardate| slugify(&stardate))
            .unwrap_or_else(|| "unknown".to_string()))
    }

    /// Removes stardate terms from every post and deletes the terms themselves
    pub fn clear_all(&self) -> Result<ClearOutcome> {
        let posts = self.post_repository.fetch_current_posts()?;
        let mut posts_cleared = 0;
        for post in &posts {
            match self.term_store.remove_terms(post.id) {
                Ok(()) => posts_cleared += 1,
                Err(e) => warn!(post_id = post.id, error = %e, "failed to remove stardate"),
            }
        }

        let terms_deleted = self.term_store.delete_all_terms()?;
        info!(posts_cleared, terms_deleted, "stardate terms cleared");
        Ok(ClearOutcome {
            posts_cleared,
            terms_deleted,
        })
    }

    pub fn stardate_now(&self) -> String {
        calculate_now(&self.config)
    }
}
