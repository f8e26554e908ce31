//! Commands typed at the page prompt.

use shared::domain::PostId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    Edit(PostId),
    Delete(PostId),
    Page(usize),
    Next,
    Previous,
    Cancel,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
commands:
  new | c              create a post
  edit <id> | e<id>    edit a post on this page
  delete <id> | d<id>  delete a post on this page
  <n> | page <n>       go to page n
  next | n             next page
  prev | p             previous page
  cancel               cancel the open form
  help | ?             show this help
  quit | q             exit";

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Command::Help;
    };
    let arg = parts.next();

    match (head.to_ascii_lowercase().as_str(), arg) {
        ("new" | "c" | "create", None) => Command::New,
        ("next" | "n", None) => Command::Next,
        ("prev" | "previous" | "p", None) => Command::Previous,
        ("cancel", None) => Command::Cancel,
        ("help" | "?" | "h", None) => Command::Help,
        ("quit" | "q" | "exit", None) => Command::Quit,
        ("edit" | "e", Some(id)) => post_id(id).map_or_else(|| unknown(line), Command::Edit),
        ("delete" | "d", Some(id)) => post_id(id).map_or_else(|| unknown(line), Command::Delete),
        ("page", Some(n)) => n.parse().map_or_else(|_| unknown(line), Command::Page),
        (word, None) => shortcut(word).unwrap_or_else(|| unknown(line)),
        _ => unknown(line),
    }
}

fn shortcut(word: &str) -> Option<Command> {
    if let Ok(page) = word.parse::<usize>() {
        return Some(Command::Page(page));
    }
    if let Some(id) = word.strip_prefix('e') {
        return post_id(id).map(Command::Edit);
    }
    if let Some(id) = word.strip_prefix('d') {
        return post_id(id).map(Command::Delete);
    }
    None
}

fn post_id(raw: &str) -> Option<PostId> {
    raw.parse::<i64>().ok().filter(|id| *id > 0).map(PostId)
}

fn unknown(line: &str) -> Command {
    Command::Unknown(line.to_string())
}
