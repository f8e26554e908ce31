//! Page-level list state and the operations that mutate it.
//!
//! The controller owns the only copy of the post list. Every state change
//! runs through `&mut self`. Submit and delete are split into a `begin_*`
//! half that sets the in-flight flags and a `finish_*` half that reconciles
//! the response, so the flags are visible while the request is pending.
//! Failures never escape: they are logged and stored as a short message in
//! [`ListState::error`].

use std::{collections::HashSet, ops::RangeInclusive, sync::Arc};

use futures::{future::BoxFuture, FutureExt};
use shared::{
    domain::{Post, PostId, FALLBACK_CREATED_POST_ID},
    error::OperationKind,
    protocol::PostSubmission,
};
use tracing::{debug, error, info, warn};

use crate::{
    error::{ClientError, ClientResult},
    repository::PostRepository,
};

pub const POSTS_PER_PAGE: usize = 10;
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this post?";

/// Blocking yes/no prompt shown before destructive operations.
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub items: Vec<Post>,
    /// 1-based.
    pub current_page: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub submitting: bool,
    pub deleting_id: Option<PostId>,
    pub form_open: bool,
    pub editing: Option<Post>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            loading: false,
            error: None,
            submitting: false,
            deleting_id: None,
            form_open: false,
            editing: None,
        }
    }
}

/// A create or update request started by [`PostListController::begin_submit`].
#[must_use = "the request only runs when awaited"]
pub struct PendingSubmit {
    target: Option<PostId>,
    request: BoxFuture<'static, ClientResult<Post>>,
}

impl PendingSubmit {
    pub async fn wait(self) -> SubmitResult {
        SubmitResult {
            target: self.target,
            result: self.request.await,
        }
    }
}

pub struct SubmitResult {
    target: Option<PostId>,
    result: ClientResult<Post>,
}

/// A delete request started by [`PostListController::begin_delete`].
#[must_use = "the request only runs when awaited"]
pub struct PendingDelete {
    id: PostId,
    page_len_before: usize,
    request: BoxFuture<'static, ClientResult<()>>,
}

impl PendingDelete {
    pub async fn wait(self) -> DeleteResult {
        DeleteResult {
            id: self.id,
            page_len_before: self.page_len_before,
            result: self.request.await,
        }
    }
}

pub struct DeleteResult {
    id: PostId,
    page_len_before: usize,
    result: ClientResult<()>,
}

pub struct PostListController {
    repository: Arc<dyn PostRepository>,
    confirm: Box<dyn Confirm>,
    state: ListState,
    loaded: bool,
}

impl PostListController {
    pub fn new(repository: Arc<dyn PostRepository>, confirm: impl Confirm + 'static) -> Self {
        Self {
            repository,
            confirm: Box::new(confirm),
            // The page shows its loading indicator until the first load resolves.
            state: ListState {
                loading: true,
                ..ListState::default()
            },
            loaded: false,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Fetches the full list. Only the first call per controller does anything.
    pub async fn load(&mut self) {
        if self.loaded {
            debug!("posts: initial load already ran");
            return;
        }
        self.loaded = true;
        self.state.loading = true;
        self.state.error = None;

        match self.repository.list().await {
            Ok(posts) => {
                self.state.items = dedupe_by_id(posts);
                info!(count = self.state.items.len(), "posts: loaded");
            }
            Err(err) => self.record_failure(OperationKind::Load, None, &err),
        }

        self.state.loading = false;
    }

    pub fn open_create_form(&mut self) {
        self.state.editing = None;
        self.state.form_open = true;
    }

    pub fn open_edit_form(&mut self, post: Post) {
        self.state.editing = Some(post);
        self.state.form_open = true;
    }

    pub fn close_form(&mut self) {
        self.state.form_open = false;
        self.state.editing = None;
    }

    /// Updates the post being edited, or creates a new one when nothing is.
    pub async fn submit(&mut self, submission: PostSubmission) {
        let pending = self.begin_submit(submission);
        let resolved = pending.wait().await;
        self.finish_submit(resolved);
    }

    /// Marks the form as submitting and starts the create or update request.
    ///
    /// The returned request does not borrow the controller, so the list stays
    /// readable and navigable until [`Self::finish_submit`] is called.
    pub fn begin_submit(&mut self, submission: PostSubmission) -> PendingSubmit {
        self.state.submitting = true;
        self.state.error = None;

        let repository = Arc::clone(&self.repository);
        match self.state.editing.as_ref().map(|target| target.id) {
            Some(id) => {
                let patch = submission.into_patch();
                PendingSubmit {
                    target: Some(id),
                    request: async move { repository.update(id, &patch).await }.boxed(),
                }
            }
            None => {
                let draft = submission.into_draft();
                PendingSubmit {
                    target: None,
                    request: async move { repository.create(&draft).await }.boxed(),
                }
            }
        }
    }

    pub fn finish_submit(&mut self, resolved: SubmitResult) {
        let SubmitResult { target, result } = resolved;
        match (target, result) {
            (Some(id), Ok(updated)) => {
                // Replace by the id the service echoed back, keeping list position.
                if let Some(slot) = self.state.items.iter_mut().find(|p| p.id == updated.id) {
                    *slot = updated;
                }
                info!(post_id = id.0, "posts: updated");
                self.close_form();
            }
            (None, Ok(created)) => {
                // The demo service hands every new post the same id, so the list
                // numbers created posts itself.
                let display_id = next_display_id(&self.state.items);
                info!(
                    service_id = created.id.0,
                    display_id = display_id.0,
                    "posts: created"
                );
                self.state.items.insert(0, created.with_id(display_id));
                self.close_form();
            }
            (Some(id), Err(err)) => self.record_failure(OperationKind::Update, Some(id), &err),
            (None, Err(err)) => self.record_failure(OperationKind::Create, None, &err),
        }

        self.state.submitting = false;
    }

    /// Asks for confirmation, then deletes `id`. Declining changes nothing.
    pub async fn delete(&mut self, id: PostId) {
        if let Some(pending) = self.begin_delete(id) {
            let resolved = pending.wait().await;
            self.finish_delete(resolved);
        }
    }

    /// Asks for confirmation and, if given, marks `id` as deleting and starts
    /// the request. `None` when the user declines.
    pub fn begin_delete(&mut self, id: PostId) -> Option<PendingDelete> {
        if !self.confirm.confirm(DELETE_CONFIRMATION) {
            debug!(post_id = id.0, "posts: delete declined");
            return None;
        }

        let page_len_before = self.current_page_items().len();
        self.state.deleting_id = self.state.items.iter().any(|p| p.id == id).then_some(id);
        self.state.error = None;

        let repository = Arc::clone(&self.repository);
        Some(PendingDelete {
            id,
            page_len_before,
            request: async move { repository.delete(id).await }.boxed(),
        })
    }

    pub fn finish_delete(&mut self, resolved: DeleteResult) {
        let DeleteResult {
            id,
            page_len_before,
            result,
        } = resolved;
        match result {
            Ok(()) => {
                self.state.items.retain(|p| p.id != id);
                if page_len_before == 1 && self.state.current_page > 1 {
                    self.state.current_page = (self.state.current_page - 1).max(1);
                }
                info!(post_id = id.0, page = self.state.current_page, "posts: deleted");
            }
            Err(err) => self.record_failure(OperationKind::Delete, Some(id), &err),
        }

        self.state.deleting_id = None;
    }

    /// Moves to `page` as given; callers only offer pages from [`Self::page_numbers`].
    pub fn paginate(&mut self, page: usize) {
        self.state.current_page = page;
    }

    pub fn previous_page(&mut self) {
        if self.can_go_previous() {
            self.paginate(self.state.current_page - 1);
        }
    }

    pub fn next_page(&mut self) {
        if self.can_go_next() {
            self.paginate(self.state.current_page + 1);
        }
    }

    pub fn current_page_items(&self) -> &[Post] {
        let len = self.state.items.len();
        let end = self
            .state
            .current_page
            .saturating_mul(POSTS_PER_PAGE)
            .min(len);
        let start = self
            .state
            .current_page
            .saturating_sub(1)
            .saturating_mul(POSTS_PER_PAGE)
            .min(end);
        &self.state.items[start..end]
    }

    /// Zero for an empty list.
    pub fn total_pages(&self) -> usize {
        self.state.items.len().div_ceil(POSTS_PER_PAGE)
    }

    pub fn shows_pagination(&self) -> bool {
        self.state.items.len() > POSTS_PER_PAGE
    }

    pub fn page_numbers(&self) -> RangeInclusive<usize> {
        1..=self.total_pages()
    }

    pub fn can_go_previous(&self) -> bool {
        self.state.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.state.current_page < self.total_pages()
    }

    pub fn is_deleting(&self, id: PostId) -> bool {
        self.state.deleting_id == Some(id)
    }

    fn record_failure(&mut self, kind: OperationKind, post_id: Option<PostId>, err: &ClientError) {
        error!(
            operation = kind.as_str(),
            post_id = post_id.map(|id| id.0),
            request = ?err.kind(),
            status = err.status().map(|status| status.as_u16()),
            error = %err,
            "posts: operation failed"
        );
        self.state.error = Some(kind.failure_message().to_string());
    }
}

fn next_display_id(items: &[Post]) -> PostId {
    items
        .iter()
        .map(|p| p.id)
        .max()
        .map(|max| PostId(max.0 + 1))
        .unwrap_or(FALLBACK_CREATED_POST_ID)
}

fn dedupe_by_id(posts: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::with_capacity(posts.len());
    let total = posts.len();
    let unique: Vec<Post> = posts.into_iter().filter(|p| seen.insert(p.id)).collect();
    if unique.len() != total {
        warn!(
            dropped = total - unique.len(),
            "posts: service returned duplicate ids"
        );
    }
    unique
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
