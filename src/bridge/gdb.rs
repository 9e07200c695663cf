//! GDB/MI subprocess driver.
//!
//! Spawns `gdb --interpreter=mi2` and implements [`Bridge`] on top of it.
//! The protocol is driven strictly synchronously: one command is written,
//! records are consumed until the matching result record (and, for commands
//! that resume the debuggee, until the following `*stopped` notification).

use crate::bridge::mi::{self, MiValue, Record};
use crate::bridge::{AsmLine, Bridge, StopEvent};
use crate::error::Error;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// Largest ARM instruction encoding, used to size disassembly requests.
const MAX_INSN_LEN: u64 = 4;

/// Outcome of one debugger command.
pub struct ExecOutcome {
    pub class: String,
    pub payload: MiValue,
    /// Console and target stream output emitted while the command ran.
    pub console: Vec<String>,
    /// Stop notification observed while the command ran.
    pub stop: Option<StopEvent>,
}

pub struct GdbDriver {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    /// Register enumeration is stable for a session, fetched on first use.
    register_names: Option<Vec<String>>,
}

impl GdbDriver {
    /// Spawn the debugger and wait for it to become ready.
    ///
    /// # Arguments
    ///
    /// * `gdb_path`: debugger binary to run
    /// * `debugee`: optional program to load at startup
    pub fn spawn(gdb_path: &str, debugee: Option<&str>) -> Result<Self, Error> {
        let mut cmd = Command::new(gdb_path);
        cmd.args(["--interpreter=mi2", "--quiet", "--nx"]);
        if let Some(debugee) = debugee {
            cmd.arg(debugee);
        }
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::SpawnDebugger(gdb_path.to_string(), e))?;

        let stdin = child.stdin.take().expect("stdin is piped");
        let stdout = child.stdout.take().expect("stdout is piped");
        let mut driver = Self {
            child,
            stdin,
            reader: BufReader::new(stdout),
            register_names: None,
        };
        driver.drain_greeting()?;
        driver.exec_mi("-gdb-set pagination off")?;
        Ok(driver)
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Run an arbitrary user command through the debugger's console interpreter.
    pub fn console(&mut self, cmd: &str) -> Result<ExecOutcome, Error> {
        let escaped = cmd.replace('\\', "\\\\").replace('"', "\\\"");
        self.exec(&format!("-interpreter-exec console \"{escaped}\""))
    }

    /// Run an MI command that must not resume the debuggee.
    fn exec_mi(&mut self, cmd: &str) -> Result<MiValue, Error> {
        let outcome = self.exec(cmd)?;
        if outcome.class != "done" {
            return Err(Error::UnexpectedResponse(cmd.to_string()));
        }
        Ok(outcome.payload)
    }

    fn exec(&mut self, cmd: &str) -> Result<ExecOutcome, Error> {
        log::debug!(target: "bridge", "-> {cmd}");
        writeln!(self.stdin, "{cmd}")?;
        self.stdin.flush()?;

        let mut console = vec![];
        let mut stop: Option<StopEvent> = None;
        let mut result: Option<(String, MiValue)> = None;
        loop {
            let line = self.read_line()?;
            if line.trim().is_empty() {
                continue;
            }
            log::debug!(target: "bridge", "<- {}", line.trim_end());
            // debuggee stdout arrives unframed, everything else must parse
            if !mi::looks_like_record(&line) {
                console.push(line);
                continue;
            }
            match mi::parse_record(&line)? {
                Record::Prompt => {
                    let running = matches!(&result, Some((class, _)) if class == "running");
                    if running && stop.is_none() {
                        // the debuggee is running: block until it stops
                        continue;
                    }
                    if let Some((class, payload)) = result.take() {
                        return Ok(ExecOutcome {
                            class,
                            payload,
                            console,
                            stop,
                        });
                    }
                }
                Record::Result { class, payload } => {
                    if class == "error" {
                        let msg = payload
                            .string("msg")
                            .unwrap_or("unknown reason")
                            .to_string();
                        return Err(Error::CommandFailed(msg));
                    }
                    result = Some((class, payload));
                }
                Record::ExecAsync { class, payload } => {
                    if class == "stopped" {
                        stop = Some(mi::stop_event(&payload));
                    }
                }
                Record::Console(text) | Record::Target(text) => console.push(text),
                Record::Log(text) => log::debug!(target: "bridge", "log: {}", text.trim_end()),
                Record::Notify { .. } => {}
            }
        }
    }

    /// Consume startup banner output up to the first prompt.
    fn drain_greeting(&mut self) -> Result<(), Error> {
        loop {
            let line = self.read_line()?;
            if matches!(mi::parse_record(&line), Ok(Record::Prompt)) {
                return Ok(());
            }
        }
    }

    fn read_line(&mut self) -> Result<String, Error> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(Error::DebuggerGone);
        }
        Ok(line)
    }

    fn evaluate(&mut self, expr: &str) -> Result<u64, Error> {
        let payload = self.exec_mi(&format!("-data-evaluate-expression \"{expr}\""))?;
        payload
            .string("value")
            .and_then(crate::bridge::parse_value)
            .ok_or_else(|| Error::Protocol(format!("no numeric value for {expr}")))
    }

    fn names(&mut self) -> Result<&[String], Error> {
        if self.register_names.is_none() {
            let payload = self.exec_mi("-data-list-register-names")?;
            self.register_names = Some(mi::register_names(&payload)?);
        }
        Ok(self.register_names.as_deref().expect("filled above"))
    }
}

impl Bridge for GdbDriver {
    fn read_registers(&mut self) -> Result<Vec<(String, String)>, Error> {
        self.names()?;
        let payload = self.exec_mi("-data-list-register-values x")?;
        let values = mi::register_values(&payload)?;
        let names = self.register_names.as_deref().expect("fetched above");
        Ok(values
            .into_iter()
            .filter_map(|(idx, raw)| {
                let name = names.get(idx)?;
                (!name.is_empty()).then(|| (name.clone(), raw))
            })
            .collect())
    }

    fn read_memory(&mut self, addr: u64, len: usize) -> Result<Vec<u8>, Error> {
        let payload = self.exec_mi(&format!("-data-read-memory-bytes {addr:#x} {len}"))?;
        let bytes = mi::memory_contents(&payload)?;
        if bytes.len() < len {
            return Err(Error::ShortRead {
                addr,
                want: len,
                got: bytes.len(),
            });
        }
        Ok(bytes)
    }

    fn disassemble(&mut self, start: u64, count: usize) -> Result<Vec<AsmLine>, Error> {
        let end = start + count as u64 * MAX_INSN_LEN;
        let payload =
            self.exec_mi(&format!("-data-disassemble -s {start:#x} -e {end:#x} -- 0"))?;
        let mut lines = mi::asm_lines(&payload)?;
        lines.truncate(count);
        Ok(lines)
    }

    fn program_counter(&mut self) -> Result<u64, Error> {
        self.evaluate("(unsigned long)$pc")
    }

    fn stack_pointer(&mut self) -> Result<u64, Error> {
        self.evaluate("(unsigned long)$sp")
    }

    fn status_word(&mut self) -> Result<u64, Error> {
        self.evaluate("(unsigned long)$cpsr")
    }

    fn terminal_width(&mut self) -> usize {
        crossterm::terminal::size()
            .map(|(w, _)| usize::from(w))
            .unwrap_or(80)
    }
}

impl Drop for GdbDriver {
    fn drop(&mut self) {
        _ = writeln!(self.stdin, "-gdb-exit");
        _ = self.stdin.flush();
        _ = self.child.kill();
        _ = self.child.wait();
    }
}
