use std::{future::Future, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use client_core::{
    load_settings, CardIntent, HttpPostRepository, PostCard, PostForm, PostListController,
};
use crossbeam_channel::TryRecvError;
use shared::domain::PostId;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod prompt;
mod render;

use commands::Command;
use prompt::{FormOutcome, Input, LineConfirm};

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "posts", about = "Browse and edit posts on a JSONPlaceholder-style service")]
struct Args {
    /// Settings file; defaults to ./posts.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured service base URL.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, default_value_t = 72)]
    width: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref());
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    info!(api = %settings.api_base_url, "starting posts browser");

    let repository = Arc::new(HttpPostRepository::from_settings(&settings)?);
    let input = Input::spawn_stdin();
    let mut session = Session {
        controller: PostListController::new(repository, LineConfirm::new(input.clone())),
        form: PostForm::new(None),
        input,
        width: args.width,
    };

    session.render();
    session.controller.load().await;

    loop {
        session.render();

        if session.controller.state().form_open {
            session.run_form().await;
            continue;
        }

        let Some(line) = session.input.ask("> ") else {
            break;
        };
        match commands::parse(&line) {
            Command::New => session.open_create(),
            Command::Edit(id) => session.open_edit(id),
            Command::Delete(id) => session.delete(id).await,
            cmd @ (Command::Next | Command::Previous | Command::Page(_)) => {
                session.navigate(cmd);
            }
            Command::Cancel => println!("No form is open."),
            Command::Help => println!("{}", commands::HELP),
            Command::Quit => break,
            Command::Unknown(input) => {
                println!("Unknown command '{input}'. Type 'help' for commands.")
            }
        }
    }

    Ok(())
}

struct Session {
    controller: PostListController,
    form: PostForm,
    input: Input,
    width: usize,
}

impl Session {
    fn render(&self) {
        print!(
            "{}",
            render::render_page(&self.controller, &self.form, self.width)
        );
    }

    fn open_create(&mut self) {
        self.form = PostForm::new(None);
        self.controller.open_create_form();
    }

    fn open_edit(&mut self, id: PostId) {
        match card_intent(&self.controller, id, false) {
            Some(CardIntent::Edit(post)) => {
                self.form = PostForm::new(Some(&post));
                self.controller.open_edit_form(post);
            }
            _ => println!("No post {id} on this page."),
        }
    }

    /// Page moves are only offered while the pagination bar is shown.
    fn navigate(&mut self, cmd: Command) -> bool {
        if !self.controller.shows_pagination() {
            println!("There is only one page.");
            return false;
        }
        match cmd {
            Command::Next if self.controller.can_go_next() => self.controller.next_page(),
            Command::Previous if self.controller.can_go_previous() => {
                self.controller.previous_page()
            }
            Command::Page(page) if self.controller.page_numbers().contains(&page) => {
                self.controller.paginate(page)
            }
            Command::Page(page) => {
                println!("No page {page}.");
                return false;
            }
            _ => {
                println!("No page in that direction.");
                return false;
            }
        }
        true
    }

    async fn run_form(&mut self) {
        self.form
            .sync_seed(self.controller.state().editing.as_ref());
        match prompt::run_form(&mut self.form, &self.input) {
            FormOutcome::Submit(submission) => {
                let pending = self.controller.begin_submit(submission);
                self.render();
                let resolved = self.in_flight(pending.wait()).await;
                self.controller.finish_submit(resolved);
            }
            FormOutcome::Cancel => self.controller.close_form(),
        }
    }

    async fn delete(&mut self, id: PostId) {
        match card_intent(&self.controller, id, true) {
            Some(CardIntent::Delete(id)) => {
                if let Some(pending) = self.controller.begin_delete(id) {
                    self.render();
                    let resolved = self.in_flight(pending.wait()).await;
                    self.controller.finish_delete(resolved);
                }
            }
            _ => println!("No deletable post {id} on this page."),
        }
    }

    /// Drives `request` to completion while still taking commands from stdin.
    async fn in_flight<F: Future>(&mut self, request: F) -> F::Output {
        tokio::pin!(request);
        let mut poll = tokio::time::interval(INPUT_POLL_INTERVAL);
        let mut stdin_open = true;
        loop {
            tokio::select! {
                resolved = &mut request => return resolved,
                _ = poll.tick(), if stdin_open => {
                    loop {
                        match self.input.try_line() {
                            Ok(line) => self.handle_in_flight(commands::parse(&line)),
                            Err(TryRecvError::Empty) => break,
                            Err(TryRecvError::Disconnected) => {
                                stdin_open = false;
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    fn handle_in_flight(&mut self, cmd: Command) {
        let submitting = self.controller.state().submitting;
        match cmd {
            cmd @ (Command::Next | Command::Previous | Command::Page(_)) => {
                if self.navigate(cmd) {
                    self.render();
                }
            }
            Command::New | Command::Edit(_) if submitting => {
                println!("The form is still saving.")
            }
            Command::New => {
                self.open_create();
                self.render();
            }
            Command::Edit(id) => {
                self.open_edit(id);
                self.render();
            }
            Command::Cancel if !self.controller.state().form_open => println!("No form is open."),
            Command::Cancel if self.form.is_disabled(submitting) => {
                println!("Cancel is disabled while saving.")
            }
            Command::Cancel => {
                self.controller.close_form();
                self.render();
            }
            Command::Delete(_) => println!("Wait for the current request to finish first."),
            Command::Quit => println!("A request is in flight and cannot be abandoned."),
            Command::Help => println!("{}", commands::HELP),
            Command::Unknown(input) => {
                println!("Unknown command '{input}'. Type 'help' for commands.")
            }
        }
    }
}

/// Routes a typed command through the card for `id`, if it is on the current page.
fn card_intent(controller: &PostListController, id: PostId, delete: bool) -> Option<CardIntent> {
    let post = controller.current_page_items().iter().find(|p| p.id == id)?;
    let card = PostCard::new(post, controller.is_deleting(id));
    if delete {
        card.delete()
    } else {
        Some(card.edit())
    }
}
