use std::str::Utf8Error;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // --------------------------------- generic errors --------------------------------------------
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Utf8(#[from] Utf8Error),

    // --------------------------------- debugger process errors -----------------------------------
    #[error("spawn debugger process `{0}`: {1}")]
    SpawnDebugger(String, std::io::Error),
    #[error("debugger process closed its output stream")]
    DebuggerGone,

    // --------------------------------- protocol errors -------------------------------------------
    #[error("malformed debugger output: {0}")]
    Protocol(String),
    #[error("unexpected response to `{0}`")]
    UnexpectedResponse(String),
    #[error("debugger command failed: {0}")]
    CommandFailed(String),

    // --------------------------------- inspection errors -----------------------------------------
    #[error("register `{0}` is not reported by the debugger anymore")]
    RegisterVanished(String),
    #[error("register `{0}` appeared after the first snapshot")]
    RegisterAppeared(String),
    #[error("short read at {addr:#x}: want {want} bytes, got {got}")]
    ShortRead { addr: u64, want: usize, got: usize },
}

impl Error {
    /// Return a hint to an interface - continue after error or stop the whole session.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::IO(_) => false,
            Error::Utf8(_) => false,
            Error::Protocol(_) => false,
            Error::UnexpectedResponse(_) => false,
            Error::CommandFailed(_) => false,
            Error::RegisterVanished(_) => false,
            Error::RegisterAppeared(_) => false,
            Error::ShortRead { .. } => false,

            // currently fatal errors
            Error::SpawnDebugger(_, _) => true,
            Error::DebuggerGone => true,
        }
    }
}

#[macro_export]
macro_rules! _error {
    ($log_fn: path, $res: expr) => {
        match $res {
            Ok(value) => Some(value),
            Err(e) => {
                $log_fn!(target: "jns", "{:#}", e);
                None
            }
        }
    };
    ($log_fn: path, $res: expr, $msg: tt) => {
        match $res {
            Ok(value) => Some(value),
            Err(e) => {
                $log_fn!(target: "jns", concat!($msg, " {:#}"), e);
                None
            }
        }
    };
}

/// Transforms `Result` into `Option` and logs an error if it occurs.
#[macro_export]
macro_rules! weak_error {
    ($res: expr) => {
        $crate::_error!(log::warn, $res)
    };
    ($res: expr, $msg: tt) => {
        $crate::_error!(log::warn, $res, $msg)
    };
}
