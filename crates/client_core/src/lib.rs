//! Client side of the posts browser: the HTTP repository, the list
//! controller that owns page state, and the form and card view models.

pub mod card;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod repository;

pub use card::{CardIntent, PostCard};
pub use config::{load_settings, ClientSettings};
pub use controller::{
    Confirm, DeleteResult, ListState, PendingDelete, PendingSubmit, PostListController,
    SubmitResult, DELETE_CONFIRMATION, POSTS_PER_PAGE,
};
pub use error::{ClientError, ClientResult, RequestKind};
pub use form::PostForm;
pub use repository::{HttpPostRepository, PostRepository};
