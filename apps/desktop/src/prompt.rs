//! Line input from stdin: the delete confirmation and the post form.

use std::{
    io::{self, BufRead, Write},
    thread,
};

use client_core::{Confirm, PostForm};
use crossbeam_channel::{unbounded, Receiver, TryRecvError};
use shared::protocol::PostSubmission;
use tracing::warn;

/// Lines read from stdin on a dedicated thread, so the page can keep
/// polling for input while a request is in flight.
#[derive(Clone)]
pub struct Input {
    lines: Receiver<String>,
}

impl Input {
    pub fn spawn_stdin() -> Self {
        let (tx, rx) = unbounded();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "failed to read from stdin");
                        break;
                    }
                }
            }
        });
        Self { lines: rx }
    }

    /// Prints `prompt` and blocks for the next line. `None` once stdin closes.
    pub fn ask(&self, prompt: &str) -> Option<String> {
        print!("{prompt}");
        let _ = io::stdout().flush();
        self.lines
            .recv()
            .ok()
            .map(|line| line.trim_end_matches('\r').to_string())
    }

    /// A line typed since the last call, if any. `Err(Disconnected)` once stdin closes.
    pub fn try_line(&self) -> Result<String, TryRecvError> {
        self.lines
            .try_recv()
            .map(|line| line.trim_end_matches('\r').to_string())
    }
}

pub struct LineConfirm {
    input: Input,
}

impl LineConfirm {
    pub fn new(input: Input) -> Self {
        Self { input }
    }
}

impl Confirm for LineConfirm {
    fn confirm(&self, message: &str) -> bool {
        matches!(
            self.input.ask(&format!("{message} [y/N] ")).as_deref().map(str::trim),
            Some("y" | "Y" | "yes")
        )
    }
}

pub enum FormOutcome {
    Submit(PostSubmission),
    Cancel,
}

/// Fills the form until it validates or the user cancels.
///
/// An empty answer keeps the current field value.
pub fn run_form(form: &mut PostForm, input: &Input) -> FormOutcome {
    println!("--- {} ---", form.heading());
    loop {
        let Some(title) = input.ask(&format!("Title [{}]: ", form.title())) else {
            return FormOutcome::Cancel;
        };
        if !title.is_empty() {
            form.set_title(title);
        }

        let Some(body) = input.ask(&format!("Body [{}]: ", form.body())) else {
            return FormOutcome::Cancel;
        };
        if !body.is_empty() {
            form.set_body(body);
        }

        let label = form.submit_label(false);
        let Some(answer) = input.ask(&format!("{label}? [Y/n/cancel] ")) else {
            return FormOutcome::Cancel;
        };
        match answer.trim() {
            "cancel" | "c" => return FormOutcome::Cancel,
            "n" | "N" => continue,
            _ => {}
        }

        match form.submit() {
            Ok(submission) => return FormOutcome::Submit(submission),
            Err(err) => println!("Warning: {err}"),
        }
    }
}
