//! Display model for a single post in the grid.

use shared::domain::{Post, PostId};

pub const TITLE_MAX_LINES: usize = 2;
pub const BODY_MAX_LINES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardIntent {
    Edit(Post),
    Delete(PostId),
}

pub struct PostCard<'a> {
    post: &'a Post,
    deleting: bool,
}

impl<'a> PostCard<'a> {
    pub fn new(post: &'a Post, deleting: bool) -> Self {
        Self { post, deleting }
    }

    pub fn is_busy(&self) -> bool {
        self.deleting
    }

    pub fn edit(&self) -> CardIntent {
        CardIntent::Edit(self.post.clone())
    }

    /// `None` while this post is already being deleted.
    pub fn delete(&self) -> Option<CardIntent> {
        (!self.is_busy()).then_some(CardIntent::Delete(self.post.id))
    }

    pub fn delete_label(&self) -> &'static str {
        if self.is_busy() {
            "Deleting..."
        } else {
            "Delete"
        }
    }

    /// Renders the card as plain lines no wider than `width` columns.
    pub fn render(&self, width: usize) -> Vec<String> {
        let width = width.max(8);
        let mut lines = clamp_lines(&self.post.title, width, TITLE_MAX_LINES);
        lines.push(format!("User ID: {}", self.post.user_id));
        lines.extend(clamp_lines(&self.post.body, width, BODY_MAX_LINES));
        lines.push(format!(
            "[e{id}] Edit  [d{id}] {}",
            self.delete_label(),
            id = self.post.id
        ));
        lines
    }
}

/// Word-wraps `text` and keeps at most `max_lines`, ending a cut with `…`.
pub fn clamp_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let wrapped = wrap_text(text, width);
    if wrapped.len() <= max_lines {
        return wrapped;
    }

    let mut kept: Vec<String> = wrapped.into_iter().take(max_lines).collect();
    if let Some(last) = kept.last_mut() {
        let mut shortened: String = last.chars().take(width.saturating_sub(1)).collect();
        shortened.push('…');
        *last = shortened;
    }
    kept
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            // Hard-split words longer than a whole line.
            while current.chars().count() > width {
                let head: String = current.chars().take(width).collect();
                let tail: String = current.chars().skip(width).collect();
                lines.push(head);
                current = tail;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}
