//! Debugger bridge.
//! The inspection engine never talks to a debugger directly: everything it needs
//! (registers, memory, disassembly, stop notifications) goes through the [`Bridge`]
//! trait. The production implementation is a GDB/MI subprocess driver ([`gdb`]),
//! tests use a scripted in-memory double.

pub mod gdb;
pub mod mi;

use crate::error::Error;

/// Single line of a disassembly listing, as reported by the debugger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmLine {
    pub address: u64,
    /// Mnemonic and operands, tab separated (e.g. `"blx\tr3"`).
    pub text: String,
}

/// Debuggee halt notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopEvent {
    /// Halt reason as reported by the debugger (e.g. "breakpoint-hit").
    pub reason: Option<String>,
    /// Address the debuggee stopped at.
    pub addr: Option<u64>,
    /// Function the debuggee stopped in.
    pub func: Option<String>,
}

/// Access to a stopped debuggee. All operations are blocking and synchronous.
pub trait Bridge {
    /// Read all architectural registers as (name, raw value text) pairs,
    /// in the debugger's enumeration order.
    fn read_registers(&mut self) -> Result<Vec<(String, String)>, Error>;

    /// Read `len` bytes of debuggee memory starting at `addr`.
    fn read_memory(&mut self, addr: u64, len: usize) -> Result<Vec<u8>, Error>;

    /// Disassemble `count` instructions starting at `start`.
    fn disassemble(&mut self, start: u64, count: usize) -> Result<Vec<AsmLine>, Error>;

    fn program_counter(&mut self) -> Result<u64, Error>;

    fn stack_pointer(&mut self) -> Result<u64, Error>;

    /// Current value of the status flag word (cpsr on ARM targets).
    fn status_word(&mut self) -> Result<u64, Error>;

    /// Width of the session terminal in columns.
    fn terminal_width(&mut self) -> usize;

    /// Live value of a single register, `None` if the debugger does not report it.
    fn read_register(&mut self, name: &str) -> Result<Option<u64>, Error> {
        let regs = self.read_registers()?;
        Ok(regs
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, raw)| parse_value(raw)))
    }
}

/// Interpret raw register value text as an integer.
///
/// Accepts `0x`-prefixed hex and plain decimal; trailing annotations
/// (symbol names and the like) are ignored.
pub fn parse_value(raw: &str) -> Option<u64> {
    let token = raw.split_whitespace().next()?;
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        token.parse::<u64>().ok()
    }
}
