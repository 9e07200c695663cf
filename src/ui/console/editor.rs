use crate::ui::config;
use crate::ui::console::command::{
    HELP_COMMAND, JNIENV_COMMAND, QUIT_COMMAND, VMMAP_COMMAND,
};
use crossterm::style::{Color, Stylize};
use rustyline::completion::{Completer, Pair};
use rustyline::hint::HistoryHinter;
use rustyline::highlight::Highlighter;
use rustyline::history::MemHistory;
use rustyline::{CompletionType, Config, Context, Editor};
use rustyline_derive::{Helper, Hinter, Validator};
use std::borrow::Cow;
use std::borrow::Cow::{Borrowed, Owned};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Session commands plus the debugger commands worth completing.
const COMMANDS: &[&str] = &[
    JNIENV_COMMAND,
    VMMAP_COMMAND,
    HELP_COMMAND,
    QUIT_COMMAND,
    "attach",
    "backtrace",
    "break",
    "continue",
    "delete",
    "detach",
    "display",
    "file",
    "finish",
    "info",
    "kill",
    "next",
    "nexti",
    "run",
    "step",
    "stepi",
    "target",
    "tbreak",
    "watch",
];

pub struct CommandCompleter {
    commands: &'static [&'static str],
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        // only the command word itself is completed
        if head.contains(char::is_whitespace) {
            return Ok((pos, vec![]));
        }

        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(head))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

#[derive(Helper, Hinter, Validator)]
pub struct RLHelper {
    completer: CommandCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
    /// Shared debuggee liveness flag, recolors the prompt.
    alive: Arc<AtomicBool>,
}

impl Completer for RLHelper {
    type Candidate = <CommandCompleter as Completer>::Candidate;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Highlighter for RLHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default && config::colors_enabled() {
            let color = if self.alive.load(Ordering::Relaxed) {
                Color::DarkGreen
            } else {
                Color::DarkRed
            };
            Owned(format!("{}", prompt.with(color)))
        } else {
            Borrowed(prompt)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(format!("{}", hint.with(Color::Grey)))
    }
}

pub fn create_editor(alive: Arc<AtomicBool>) -> anyhow::Result<Editor<RLHelper, MemHistory>> {
    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .build();

    let h = RLHelper {
        completer: CommandCompleter { commands: COMMANDS },
        hinter: HistoryHinter {},
        alive,
    };

    let mut editor = Editor::with_history(config, MemHistory::new())?;
    editor.set_helper(Some(h));
    Ok(editor)
}
