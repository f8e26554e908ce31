use super::*;
use crate::error::{ClientResult, RequestKind};
use async_trait::async_trait;
use reqwest::StatusCode;
use shared::{
    domain::{UserId, DEFAULT_OWNER},
    protocol::{PostDraft, PostPatch},
};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};
use tokio::sync::Notify;

#[derive(Default)]
struct FakeRepository {
    posts: Mutex<Vec<Post>>,
    fail_list: AtomicBool,
    fail_create: AtomicBool,
    gated: AtomicBool,
    gate: Notify,
    list_calls: AtomicUsize,
    patches: Mutex<Vec<(PostId, PostPatch)>>,
    deleted: Mutex<Vec<PostId>>,
}

impl FakeRepository {
    fn with_posts(posts: Vec<Post>) -> Arc<Self> {
        Arc::new(Self {
            posts: Mutex::new(posts),
            ..Self::default()
        })
    }

    /// Holds create and delete until `gate` is notified, when gated.
    async fn pass_gate(&self) {
        if self.gated.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
    }

    fn failed(kind: RequestKind) -> ClientError {
        ClientError::RequestFailed {
            kind,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[async_trait]
impl PostRepository for FakeRepository {
    async fn list(&self) -> ClientResult<Vec<Post>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Self::failed(RequestKind::List));
        }
        Ok(self.posts.lock().expect("posts").clone())
    }

    async fn create(&self, draft: &PostDraft) -> ClientResult<Post> {
        self.pass_gate().await;
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::failed(RequestKind::Create));
        }
        // Mirrors the demo service: every created post comes back as id 101.
        Ok(Post {
            id: PostId(101),
            user_id: DEFAULT_OWNER,
            title: draft.title.clone(),
            body: draft.body.clone(),
        })
    }

    async fn update(&self, id: PostId, patch: &PostPatch) -> ClientResult<Post> {
        self.patches
            .lock()
            .expect("patches")
            .push((id, patch.clone()));
        let posts = self.posts.lock().expect("posts");
        let mut post = posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Self::failed(RequestKind::Update))?;
        if let Some(title) = &patch.title {
            post.title = title.clone();
        }
        if let Some(body) = &patch.body {
            post.body = body.clone();
        }
        Ok(post)
    }

    async fn delete(&self, id: PostId) -> ClientResult<()> {
        self.pass_gate().await;
        let mut posts = self.posts.lock().expect("posts");
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Err(Self::failed(RequestKind::Delete));
        }
        self.deleted.lock().expect("deleted").push(id);
        Ok(())
    }
}

fn post(id: i64) -> Post {
    Post {
        id: PostId(id),
        user_id: UserId(1 + id % 3),
        title: format!("title {id}"),
        body: format!("body {id}"),
    }
}

fn posts(range: std::ops::RangeInclusive<i64>) -> Vec<Post> {
    range.map(post).collect()
}

fn always(answer: bool) -> impl Confirm + 'static {
    move |_: &str| answer
}

async fn loaded_controller(repo: Arc<FakeRepository>) -> PostListController {
    let mut controller = PostListController::new(repo, always(true));
    controller.load().await;
    controller
}

#[tokio::test]
async fn load_replaces_items_in_service_order() {
    let repo = FakeRepository::with_posts(vec![post(3), post(1), post(2)]);
    let mut controller = PostListController::new(repo.clone(), always(true));
    assert!(controller.state().loading);

    controller.load().await;

    let state = controller.state();
    assert_eq!(state.items, vec![post(3), post(1), post(2)]);
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn load_runs_once_per_controller() {
    let repo = FakeRepository::with_posts(vec![post(1)]);
    let mut controller = loaded_controller(repo.clone()).await;
    controller.load().await;
    assert_eq!(repo.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_load_stores_generic_message() {
    let repo = FakeRepository::with_posts(vec![post(1)]);
    repo.fail_list.store(true, Ordering::SeqCst);
    let controller = loaded_controller(repo).await;

    let state = controller.state();
    assert!(state.items.is_empty());
    assert!(!state.loading);
    assert_eq!(
        state.error.as_deref(),
        Some("Failed to load posts. Please try again.")
    );
}

#[tokio::test]
async fn load_drops_duplicate_ids() {
    let repo = FakeRepository::with_posts(vec![post(1), post(2), post(1)]);
    let controller = loaded_controller(repo).await;
    assert_eq!(controller.state().items, vec![post(1), post(2)]);
}

#[tokio::test]
async fn create_prepends_record_with_next_display_id() {
    let repo = FakeRepository::with_posts(vec![post(1), post(2)]);
    let mut controller = loaded_controller(repo).await;
    controller.open_create_form();

    controller
        .submit(PostSubmission::Draft(PostDraft::new("A", "B")))
        .await;

    let state = controller.state();
    assert_eq!(
        state.items,
        vec![
            Post {
                id: PostId(3),
                user_id: UserId(1),
                title: "A".into(),
                body: "B".into(),
            },
            post(1),
            post(2),
        ]
    );
    assert!(!state.form_open);
    assert!(!state.submitting);
    assert_eq!(state.editing, None);
}

#[tokio::test]
async fn created_ids_count_up_from_initial_max() {
    let repo = FakeRepository::with_posts(vec![post(7), post(4)]);
    let mut controller = loaded_controller(repo).await;

    for n in 1..=3 {
        controller
            .submit(PostSubmission::Draft(PostDraft::new(format!("t{n}"), "b")))
            .await;
        assert_eq!(controller.state().items[0].id, PostId(7 + n));
    }
}

#[tokio::test]
async fn create_into_empty_list_starts_at_fallback_id() {
    let repo = FakeRepository::with_posts(Vec::new());
    let mut controller = loaded_controller(repo).await;

    controller
        .submit(PostSubmission::Draft(PostDraft::new("first", "b")))
        .await;
    controller
        .submit(PostSubmission::Draft(PostDraft::new("second", "b")))
        .await;

    let ids: Vec<_> = controller.state().items.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![PostId(102), PostId(101)]);
}

#[tokio::test]
async fn failed_create_keeps_form_open_and_items_unchanged() {
    let repo = FakeRepository::with_posts(vec![post(1)]);
    repo.fail_create.store(true, Ordering::SeqCst);
    let mut controller = loaded_controller(repo).await;
    controller.open_create_form();

    controller
        .submit(PostSubmission::Draft(PostDraft::new("A", "B")))
        .await;

    let state = controller.state();
    assert_eq!(state.items, vec![post(1)]);
    assert!(state.form_open);
    assert!(!state.submitting);
    assert_eq!(
        state.error.as_deref(),
        Some("Failed to create post. Please try again.")
    );
}

#[tokio::test]
async fn update_replaces_in_place() {
    let repo = FakeRepository::with_posts(vec![post(1), post(2), post(3)]);
    let mut controller = loaded_controller(repo.clone()).await;
    controller.open_edit_form(post(2));

    let mut edited = post(2);
    edited.title = "X".into();
    controller.submit(PostSubmission::Record(edited.clone())).await;

    let state = controller.state();
    assert_eq!(state.items, vec![post(1), edited, post(3)]);
    assert!(!state.form_open);
    assert_eq!(state.editing, None);

    let patches = repo.patches.lock().expect("patches");
    assert_eq!(patches[0].0, PostId(2));
    assert_eq!(patches[0].1.id, Some(PostId(2)));
}

#[tokio::test]
async fn unchanged_update_leaves_items_content_equal() {
    let repo = FakeRepository::with_posts(posts(1..=12));
    let mut controller = loaded_controller(repo).await;
    let before = controller.state().items.clone();

    controller.open_edit_form(post(5));
    controller.submit(PostSubmission::Record(post(5))).await;

    assert_eq!(controller.state().items, before);
    assert_eq!(controller.state().error, None);
}

#[tokio::test]
async fn failed_update_sets_update_message() {
    let repo = FakeRepository::with_posts(vec![post(1)]);
    let mut controller = loaded_controller(repo).await;
    // Not known to the service, so the update is rejected.
    controller.open_edit_form(post(9));

    controller
        .submit(PostSubmission::Draft(PostDraft::new("x", "y")))
        .await;

    let state = controller.state();
    assert_eq!(state.items, vec![post(1)]);
    assert_eq!(state.editing, Some(post(9)));
    assert_eq!(
        state.error.as_deref(),
        Some("Failed to update post. Please try again.")
    );
}

#[tokio::test]
async fn successful_operation_clears_previous_error() {
    let repo = FakeRepository::with_posts(vec![post(1), post(2)]);
    let mut controller = loaded_controller(repo).await;

    controller.delete(PostId(99)).await;
    assert!(controller.state().error.is_some());

    controller.delete(PostId(2)).await;
    assert_eq!(controller.state().error, None);
}

#[tokio::test]
async fn declined_delete_changes_nothing() {
    let repo = FakeRepository::with_posts(vec![post(1), post(2)]);
    let mut controller = PostListController::new(repo.clone(), always(false));
    controller.load().await;
    let before = controller.state().clone();

    controller.delete(PostId(1)).await;

    assert_eq!(*controller.state(), before);
    assert!(repo.deleted.lock().expect("deleted").is_empty());
}

#[tokio::test]
async fn delete_asks_with_fixed_prompt() {
    let repo = FakeRepository::with_posts(vec![post(1)]);
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let seen = prompts.clone();
    let mut controller = PostListController::new(repo, move |message: &str| {
        seen.lock().expect("prompts").push(message.to_string());
        true
    });
    controller.load().await;

    controller.delete(PostId(1)).await;

    assert_eq!(
        *prompts.lock().expect("prompts"),
        vec![DELETE_CONFIRMATION.to_string()]
    );
    assert!(controller.state().items.is_empty());
}

#[tokio::test]
async fn deleting_last_item_on_page_moves_back_one_page() {
    let repo = FakeRepository::with_posts(posts(1..=21));
    let mut controller = loaded_controller(repo).await;
    controller.paginate(3);
    assert_eq!(controller.current_page_items(), &[post(21)]);

    controller.delete(PostId(21)).await;

    assert_eq!(controller.state().current_page, 2);
    assert_eq!(controller.state().deleting_id, None);
    assert_eq!(controller.total_pages(), 2);
}

#[tokio::test]
async fn deleting_with_items_left_on_page_keeps_page() {
    let repo = FakeRepository::with_posts(posts(1..=23));
    let mut controller = loaded_controller(repo).await;
    controller.paginate(3);

    controller.delete(PostId(22)).await;

    assert_eq!(controller.state().current_page, 3);
    assert_eq!(controller.current_page_items().len(), 2);
}

#[tokio::test]
async fn deleting_only_item_on_first_page_stays_on_first_page() {
    let repo = FakeRepository::with_posts(vec![post(1)]);
    let mut controller = loaded_controller(repo).await;

    controller.delete(PostId(1)).await;

    assert_eq!(controller.state().current_page, 1);
    assert_eq!(controller.total_pages(), 0);
}

#[tokio::test]
async fn delete_of_unknown_id_sets_error_and_keeps_items() {
    let repo = FakeRepository::with_posts(vec![post(1), post(2)]);
    let mut controller = loaded_controller(repo).await;

    controller.delete(PostId(404)).await;

    let state = controller.state();
    assert_eq!(state.items, vec![post(1), post(2)]);
    assert_eq!(state.deleting_id, None);
    assert_eq!(
        state.error.as_deref(),
        Some("Failed to delete post. Please try again.")
    );
}

#[tokio::test]
async fn pagination_slices_twenty_three_items_into_three_pages() {
    let repo = FakeRepository::with_posts(posts(1..=23));
    let mut controller = loaded_controller(repo).await;

    assert_eq!(controller.total_pages(), 3);
    assert!(controller.shows_pagination());
    assert_eq!(controller.page_numbers(), 1..=3);
    assert_eq!(controller.current_page_items(), &posts(1..=10)[..]);

    controller.paginate(3);
    assert_eq!(controller.current_page_items(), &posts(21..=23)[..]);
}

#[tokio::test]
async fn previous_and_next_stop_at_bounds() {
    let repo = FakeRepository::with_posts(posts(1..=15));
    let mut controller = loaded_controller(repo).await;

    assert!(!controller.can_go_previous());
    controller.previous_page();
    assert_eq!(controller.state().current_page, 1);

    controller.next_page();
    assert_eq!(controller.state().current_page, 2);
    assert!(!controller.can_go_next());
    controller.next_page();
    assert_eq!(controller.state().current_page, 2);
}

#[tokio::test]
async fn single_page_hides_pagination() {
    let repo = FakeRepository::with_posts(posts(1..=10));
    let controller = loaded_controller(repo).await;
    assert_eq!(controller.total_pages(), 1);
    assert!(!controller.shows_pagination());
}

#[tokio::test]
async fn out_of_range_page_yields_empty_slice() {
    let repo = FakeRepository::with_posts(posts(1..=5));
    let mut controller = loaded_controller(repo).await;
    controller.paginate(4);
    assert!(controller.current_page_items().is_empty());
}

#[tokio::test]
async fn form_lifecycle_tracks_edit_target() {
    let repo = FakeRepository::with_posts(vec![post(1)]);
    let mut controller = loaded_controller(repo).await;

    controller.open_edit_form(post(1));
    assert!(controller.state().form_open);
    assert_eq!(controller.state().editing, Some(post(1)));

    controller.open_create_form();
    assert_eq!(controller.state().editing, None);

    controller.close_form();
    assert!(!controller.state().form_open);
}

#[tokio::test]
async fn next_page_on_empty_list_stays_on_first_page() {
    let repo = FakeRepository::with_posts(Vec::new());
    let mut controller = loaded_controller(repo).await;

    controller.next_page();
    controller.next_page();
    assert_eq!(controller.state().current_page, 1);
    assert!(!controller.can_go_next());
    assert!(!controller.can_go_previous());

    controller
        .submit(PostSubmission::Draft(PostDraft::new("A", "B")))
        .await;
    assert_eq!(controller.state().current_page, 1);
    assert_eq!(controller.current_page_items().len(), 1);
}

#[tokio::test]
async fn next_page_stops_on_last_page() {
    let repo = FakeRepository::with_posts(posts(1..=25));
    let mut controller = loaded_controller(repo).await;

    for _ in 0..5 {
        controller.next_page();
    }
    assert_eq!(controller.state().current_page, 3);
    assert!(controller.state().current_page <= controller.total_pages().max(1));
}

#[tokio::test]
async fn extreme_pages_do_not_overflow() {
    let repo = FakeRepository::with_posts(posts(1..=5));
    let mut controller = loaded_controller(repo).await;

    controller.paginate(usize::MAX);
    assert!(controller.current_page_items().is_empty());

    controller.paginate(0);
    controller.previous_page();
    assert_eq!(controller.state().current_page, 0);
    assert!(controller.current_page_items().is_empty());
}

#[tokio::test]
async fn deleting_id_is_visible_while_delete_is_pending() {
    let repo = FakeRepository::with_posts(posts(1..=12));
    repo.gated.store(true, Ordering::SeqCst);
    let mut controller = loaded_controller(repo.clone()).await;

    let pending = controller.begin_delete(PostId(3)).expect("confirmed");
    assert_eq!(controller.state().deleting_id, Some(PostId(3)));
    assert!(controller.is_deleting(PostId(3)));
    let request = tokio::spawn(pending.wait());

    // The list stays navigable while the request is held at the gate.
    controller.next_page();
    assert_eq!(controller.state().current_page, 2);
    assert_eq!(controller.state().deleting_id, Some(PostId(3)));
    assert_eq!(controller.state().items.len(), 12);

    repo.gate.notify_one();
    let resolved = request.await.expect("join");
    controller.finish_delete(resolved);

    let state = controller.state();
    assert_eq!(state.deleting_id, None);
    assert_eq!(state.items.len(), 11);
    assert_eq!(state.current_page, 2);
}

#[tokio::test]
async fn submitting_is_visible_while_create_is_pending() {
    let repo = FakeRepository::with_posts(vec![post(1), post(2)]);
    repo.gated.store(true, Ordering::SeqCst);
    let mut controller = loaded_controller(repo.clone()).await;
    controller.open_create_form();

    let pending = controller.begin_submit(PostSubmission::Draft(PostDraft::new("A", "B")));
    assert!(controller.state().submitting);
    assert!(controller.state().form_open);
    let request = tokio::spawn(pending.wait());

    repo.gate.notify_one();
    let resolved = request.await.expect("join");
    assert!(controller.state().submitting);
    controller.finish_submit(resolved);

    let state = controller.state();
    assert!(!state.submitting);
    assert!(!state.form_open);
    assert_eq!(state.items[0].id, PostId(3));
}

#[tokio::test]
async fn declined_begin_delete_starts_nothing() {
    let repo = FakeRepository::with_posts(vec![post(1)]);
    let mut controller = PostListController::new(repo, always(false));
    controller.load().await;

    assert!(controller.begin_delete(PostId(1)).is_none());
    assert_eq!(controller.state().deleting_id, None);
}
