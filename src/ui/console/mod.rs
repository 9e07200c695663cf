use crate::bridge::gdb::GdbDriver;
use crate::bridge::StopEvent;
use crate::error::Error;
use crate::inspect::Inspector;
use crate::ui::config;
use crate::ui::console::command::UserCommand;
use crate::ui::console::hook::{InspectHook, StopHook};
use crate::ui::console::print::style::{AddressView, ErrorView, KeywordView};
use crate::ui::console::print::Printer;
use crate::weak_error;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use once_cell::sync::Lazy;
use regex::Regex;
use rustyline::error::ReadlineError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod command;
mod editor;
pub mod help;
pub mod hook;
pub mod print;
pub mod view;

const WELCOME_TEXT: &str = r#"
JniScope greets
Type `help` for session commands, everything else is forwarded to gdb.
"#;
const PROMT: &str = "--> ";

pub struct AppBuilder {
    gdb_path: String,
    debugee: Option<String>,
    remote: Option<String>,
}

impl AppBuilder {
    pub fn new(gdb_path: impl Into<String>) -> Self {
        Self {
            gdb_path: gdb_path.into(),
            debugee: None,
            remote: None,
        }
    }

    pub fn with_debugee(mut self, debugee: impl Into<String>) -> Self {
        self.debugee = Some(debugee.into());
        self
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    pub fn build(self) -> Result<TerminalApplication, Error> {
        let driver = GdbDriver::spawn(&self.gdb_path, self.debugee.as_deref())?;
        let cfg = config::current();
        let inspector = Inspector::new(
            cfg.word_width.hex_digits(),
            cfg.word_width.pointer_bytes(),
        );

        Ok(TerminalApplication {
            driver,
            hook: InspectHook::new(inspector),
            printer: Printer::default(),
            remote: self.remote,
            debuggee_alive: Arc::new(AtomicBool::new(false)),
        })
    }
}

pub struct TerminalApplication {
    driver: GdbDriver,
    hook: InspectHook,
    printer: Printer,
    remote: Option<String>,
    /// Shared with the editor prompt highlighter.
    debuggee_alive: Arc<AtomicBool>,
}

impl TerminalApplication {
    pub fn run(mut self) -> anyhow::Result<()> {
        let mut editor = editor::create_editor(Arc::clone(&self.debuggee_alive))?;

        // Ctrl-C interrupts the debuggee, it must not kill the session
        let gdb_pid = Pid::from_raw(self.driver.pid() as i32);
        weak_error!(
            ctrlc::set_handler(move || {
                _ = kill(gdb_pid, Signal::SIGINT);
            }),
            "interrupt handler unavailable:"
        );

        if let Some(remote) = self.remote.take() {
            let connect = format!("target remote {remote}");
            self.printer.println(&connect);
            if let Err(e) = self.forward(&connect) {
                self.printer.println(ErrorView::from(format!("error: {e:#}")));
                if e.is_fatal() {
                    return Err(e.into());
                }
            }
        }

        self.printer.println(WELCOME_TEXT);

        loop {
            match editor.readline(PROMT) {
                Ok(input) => {
                    if input.trim().is_empty() {
                        continue;
                    }
                    _ = editor.add_history_entry(&input);

                    match command::parse(&input) {
                        Ok(UserCommand::Quit) => break,
                        Ok(cmd) => {
                            if let Err(e) = self.handle_command(cmd) {
                                if e.is_fatal() {
                                    self.printer
                                        .println(ErrorView::from(format!("fatal error: {e:#}")));
                                    break;
                                }
                                self.printer.println(ErrorView::from(format!("error: {e:#}")));
                            }
                        }
                        Err(e) => self.printer.println(ErrorView::from(e)),
                    }
                }
                Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    fn handle_command(&mut self, cmd: UserCommand) -> Result<(), Error> {
        match cmd {
            UserCommand::SetTableBase(base) => {
                self.hook.inspector_mut().set_table_base(base);
                self.printer.println(format!(
                    "table base set to {}, slots resolve on the next stop",
                    AddressView::from(format!("{base:#x}"))
                ));
            }
            UserCommand::ShowTableBase => match self.hook.inspector().table_base() {
                0 => self.printer.println("table base is not set"),
                base => self.printer.println(format!(
                    "table base: {}",
                    AddressView::from(format!("{base:#x}"))
                )),
            },
            UserCommand::VmMap { filter } => self.vmmap(filter.as_deref())?,
            UserCommand::Help(topic) => self
                .printer
                .println(help::help_for_command(topic.as_deref())),
            UserCommand::Forward(cmd) => self.forward(&cmd)?,
            UserCommand::Quit => {}
        }
        Ok(())
    }

    /// Pass a command to the debugger and react to whatever it did.
    fn forward(&mut self, cmd: &str) -> Result<(), Error> {
        let outcome = self.driver.console(cmd)?;
        for text in &outcome.console {
            self.printer.print(text);
        }
        if let Some(stop) = outcome.stop {
            self.on_stop(&stop)?;
        }
        Ok(())
    }

    fn on_stop(&mut self, event: &StopEvent) -> Result<(), Error> {
        if event
            .reason
            .as_deref()
            .is_some_and(|reason| reason.starts_with("exited"))
        {
            self.debuggee_alive.store(false, Ordering::Relaxed);
            self.printer.println(format!(
                "Program exited ({})",
                KeywordView::from(event.reason.as_deref().unwrap_or_default())
            ));
            return Ok(());
        }
        self.debuggee_alive.store(true, Ordering::Relaxed);

        if let Err(e) = self.hook.on_stop(&mut self.driver, event) {
            // a failed refresh is reported here, the next stop starts clean
            match e.downcast::<Error>() {
                Ok(err) if err.is_fatal() => return Err(err),
                Ok(err) => self
                    .printer
                    .println(ErrorView::from(format!("refresh error: {err:#}"))),
                Err(other) => self
                    .printer
                    .println(ErrorView::from(format!("refresh error: {other:#}"))),
            }
        }
        Ok(())
    }

    fn vmmap(&mut self, filter: Option<&str>) -> Result<(), Error> {
        static MAPPING_LINE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^\s*0x[0-9a-fA-F]+").expect("infallible"));

        let outcome = self.driver.console("info proc mappings")?;
        for text in &outcome.console {
            for line in text.lines() {
                let keep = match filter {
                    None => true,
                    Some(pattern) => MAPPING_LINE.is_match(line) && line.contains(pattern),
                };
                if keep {
                    self.printer.println(line);
                }
            }
        }
        Ok(())
    }
}
