use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(PostId);
id_newtype!(UserId);

/// Owner stamped onto every created post; the demo service has no real accounts.
pub const DEFAULT_OWNER: UserId = UserId(1);

/// Display id handed to the first post created into an empty list.
pub const FALLBACK_CREATED_POST_ID: PostId = PostId(101);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub body: String,
}

impl Post {
    /// Same record carrying a different id.
    pub fn with_id(self, id: PostId) -> Self {
        Self { id, ..self }
    }
}
