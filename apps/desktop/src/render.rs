//! Text rendering of the posts page.

use std::fmt::Write as _;

use client_core::{PostCard, PostForm, PostListController};
use shared::domain::{Post, PostId};

pub const PAGE_HEADING: &str = "JSONPlaceholder Posts";

pub fn render_page(controller: &PostListController, form: &PostForm, width: usize) -> String {
    let state = controller.state();
    let mut out = String::new();

    let _ = writeln!(out, "{PAGE_HEADING}");
    let _ = writeln!(out, "{}", "=".repeat(width));
    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }

    if state.loading {
        let _ = writeln!(out, "Loading posts...");
        return out;
    }

    out.push_str(&render_cards(
        controller.current_page_items(),
        state.deleting_id,
        width,
    ));

    if controller.shows_pagination() {
        let _ = writeln!(
            out,
            "{}",
            render_pagination(state.current_page, controller.total_pages())
        );
    }

    if state.form_open {
        let _ = writeln!(out, "{}", render_form_status(form, state.submitting));
    }
    out
}

/// Heading line of the open form, with its buttons' current state.
pub fn render_form_status(form: &PostForm, submitting: bool) -> String {
    let mut line = format!("--- {} --- [{}]", form.heading(), form.submit_label(submitting));
    if form.is_disabled(submitting) {
        line.push_str(" (cancel and submit disabled)");
    }
    line
}

pub fn render_cards(posts: &[Post], deleting_id: Option<PostId>, width: usize) -> String {
    let mut out = String::new();
    for post in posts {
        let card = PostCard::new(post, deleting_id == Some(post.id));
        for line in card.render(width) {
            let _ = writeln!(out, "  {line}");
        }
        let _ = writeln!(out, "{}", "-".repeat(width));
    }
    out
}

/// Disabled Previous/Next are wrapped in parentheses; the current page in brackets.
pub fn render_pagination(current_page: usize, total_pages: usize) -> String {
    let mut parts = Vec::with_capacity(total_pages + 2);
    parts.push(if current_page == 1 {
        "(Previous)".to_string()
    } else {
        "Previous".to_string()
    });
    for page in 1..=total_pages {
        parts.push(if page == current_page {
            format!("[{page}]")
        } else {
            page.to_string()
        });
    }
    parts.push(if current_page == total_pages {
        "(Next)".to_string()
    } else {
        "Next".to_string()
    });
    parts.join(" ")
}
