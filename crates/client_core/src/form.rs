//! Title/body form used for both creating and editing a post.

use shared::{
    domain::Post,
    error::ValidationError,
    protocol::{PostDraft, PostSubmission},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    title: String,
    body: String,
    seed: Option<Post>,
}

impl PostForm {
    /// Seeded from `seed` when editing, empty when creating.
    pub fn new(seed: Option<&Post>) -> Self {
        let mut form = Self::default();
        form.reseed(seed);
        form
    }

    /// Re-seeds the fields if `seed` is not the record the form was built from.
    pub fn sync_seed(&mut self, seed: Option<&Post>) {
        if self.seed.as_ref() != seed {
            self.reseed(seed);
        }
    }

    fn reseed(&mut self, seed: Option<&Post>) {
        self.seed = seed.cloned();
        self.title = seed.map(|p| p.title.clone()).unwrap_or_default();
        self.body = seed.map(|p| p.body.clone()).unwrap_or_default();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn is_edit(&self) -> bool {
        self.seed.is_some()
    }

    pub fn heading(&self) -> &'static str {
        if self.is_edit() {
            "Edit Post"
        } else {
            "Create New Post"
        }
    }

    pub fn submit_label(&self, submitting: bool) -> &'static str {
        match (submitting, self.is_edit()) {
            (true, _) => "Saving...",
            (false, true) => "Save Changes",
            (false, false) => "Create Post",
        }
    }

    /// Buttons are inert while a submission is in flight.
    pub fn is_disabled(&self, submitting: bool) -> bool {
        submitting
    }

    /// Validates the fields and builds the payload for the controller.
    ///
    /// Editing yields the seed record with the new title and body; creating
    /// yields a bare draft. Text is sent as typed, the trim only gates emptiness.
    pub fn submit(&self) -> Result<PostSubmission, ValidationError> {
        if self.title.trim().is_empty() || self.body.trim().is_empty() {
            return Err(ValidationError::EmptyField);
        }

        Ok(match &self.seed {
            Some(seed) => PostSubmission::Record(Post {
                title: self.title.clone(),
                body: self.body.clone(),
                ..seed.clone()
            }),
            None => PostSubmission::Draft(PostDraft::new(&self.title, &self.body)),
        })
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
