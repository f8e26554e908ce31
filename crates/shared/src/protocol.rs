use serde::{Deserialize, Serialize};

use crate::domain::{Post, PostId, UserId};

/// Title and body of a post that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    pub user_id: UserId,
}

impl CreatePostRequest {
    pub fn stamped(draft: &PostDraft, owner: UserId) -> Self {
        Self {
            title: draft.title.clone(),
            body: draft.body.clone(),
            user_id: owner,
        }
    }
}

/// Body of `PUT /posts/{id}`; any subset of the post fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PostId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl From<Post> for PostPatch {
    fn from(post: Post) -> Self {
        Self {
            id: Some(post.id),
            user_id: Some(post.user_id),
            title: Some(post.title),
            body: Some(post.body),
        }
    }
}

impl From<PostDraft> for PostPatch {
    fn from(draft: PostDraft) -> Self {
        Self {
            title: Some(draft.title),
            body: Some(draft.body),
            ..Self::default()
        }
    }
}

/// What the post form hands back on a valid submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostSubmission {
    /// Bare title/body for a new post.
    Draft(PostDraft),
    /// The edited record with its id and owner intact.
    Record(Post),
}

impl PostSubmission {
    pub fn into_draft(self) -> PostDraft {
        match self {
            Self::Draft(draft) => draft,
            Self::Record(post) => PostDraft {
                title: post.title,
                body: post.body,
            },
        }
    }

    pub fn into_patch(self) -> PostPatch {
        match self {
            Self::Draft(draft) => draft.into(),
            Self::Record(post) => post.into(),
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
