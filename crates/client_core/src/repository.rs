//! Request/response mapping onto the remote post service.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Post, PostId, UserId, DEFAULT_OWNER},
    protocol::{CreatePostRequest, PostDraft, PostPatch},
};
use tracing::debug;
use url::Url;

use crate::{
    config::ClientSettings,
    error::{ClientError, ClientResult, RequestKind},
};

/// CRUD access to posts. One call is one request.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<Post>>;
    async fn create(&self, draft: &PostDraft) -> ClientResult<Post>;
    async fn update(&self, id: PostId, patch: &PostPatch) -> ClientResult<Post>;
    async fn delete(&self, id: PostId) -> ClientResult<()>;
}

#[derive(Clone)]
pub struct HttpPostRepository {
    http: Client,
    base_url: String,
    owner: UserId,
}

impl HttpPostRepository {
    pub fn from_settings(settings: &ClientSettings) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(ClientError::Build)?;
        Self::with_client(http, settings.api_base_url.clone())
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into();
        if let Err(source) = Url::parse(&base_url) {
            return Err(ClientError::InvalidUrl {
                url: base_url,
                source,
            });
        }
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: DEFAULT_OWNER,
        })
    }

    fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }

    fn post_url(&self, id: PostId) -> String {
        format!("{}/posts/{id}", self.base_url)
    }

    async fn send(kind: RequestKind, request: RequestBuilder) -> ClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport { kind, source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::RequestFailed { kind, status });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(kind: RequestKind, response: Response) -> ClientResult<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { kind, source })?;
        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode { kind, source })
    }
}

#[async_trait]
impl PostRepository for HttpPostRepository {
    async fn list(&self) -> ClientResult<Vec<Post>> {
        debug!("posts: GET /posts");
        let response = Self::send(RequestKind::List, self.http.get(self.posts_url())).await?;
        Self::decode(RequestKind::List, response).await
    }

    async fn create(&self, draft: &PostDraft) -> ClientResult<Post> {
        debug!(owner = self.owner.0, "posts: POST /posts");
        let request = self
            .http
            .post(self.posts_url())
            .json(&CreatePostRequest::stamped(draft, self.owner));
        let response = Self::send(RequestKind::Create, request).await?;
        Self::decode(RequestKind::Create, response).await
    }

    async fn update(&self, id: PostId, patch: &PostPatch) -> ClientResult<Post> {
        debug!(post_id = id.0, "posts: PUT /posts/{{id}}");
        let request = self.http.put(self.post_url(id)).json(patch);
        let response = Self::send(RequestKind::Update, request).await?;
        Self::decode(RequestKind::Update, response).await
    }

    async fn delete(&self, id: PostId) -> ClientResult<()> {
        debug!(post_id = id.0, "posts: DELETE /posts/{{id}}");
        Self::send(RequestKind::Delete, self.http.delete(self.post_url(id))).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/repository_tests.rs"]
mod tests;
