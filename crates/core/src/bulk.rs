//! Best-effort sweep that attaches a stardate to every dated post.

use crate::calculator::calculate;
use crate::domain::{BulkRunOutcome, PostDateRecord, PostId, StardateConfig};
use crate::ports::Result;
use crate::utils::parse_post_date;
use tracing::{debug, warn};

/// Computes a stardate per post and hands it to `attach`
///
/// Posts without a date are skipped and appear in neither list. A post whose
/// date cannot be parsed, or whose `attach` call fails, lands in `failed`;
/// the sweep always runs to the end and keeps input order.
pub fn associate_all<F>(
    posts: &[PostDateRecord],
    config: &StardateConfig,
    mut attach: F,
) -> BulkRunOutcome
where
    F: FnMut(PostId, &str) -> Result<()>,
{
    posts
        .iter()
        .filter(|post| {
            if !post.has_date() {
                debug!(post_id = post.id, "skipping post without a date");
            }
            post.has_date()
        })
        .fold(BulkRunOutcome::default(), |mut outcome, post| {
            let attached = parse_post_date(&post.date)
                .map(|date| calculate(date, config))
                .and_then(|stardate| attach(post.id, &stardate));

            match attached {
                Ok(()) => outcome.succeeded.push(post.id),
                Err(e) => {
                    warn!(post_id = post.id, error = %e, "failed to associate stardate");
                    outcome.failed.push(post.id);
                }
            }
            outcome
        })
}
