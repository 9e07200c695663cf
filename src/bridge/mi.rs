//! GDB/MI output parsing.
//!
//! MI is a line oriented protocol: every line is a record. Records carry an
//! optional payload of `key=value` results where a value is a c-string, a
//! `{...}` tuple or a `[...]` list. Everything here is a pure function over
//! the record text, the subprocess plumbing lives in [`super::gdb`].

use crate::bridge::{AsmLine, StopEvent};
use crate::error::Error;

/// One line of MI output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// `^class,payload` - response to the last command.
    Result { class: String, payload: MiValue },
    /// `*class,payload` - execution state change (`*stopped`, `*running`).
    ExecAsync { class: String, payload: MiValue },
    /// `=class,payload` - notification, not tied to a command.
    Notify { class: String, payload: MiValue },
    /// `~"text"` - console output stream.
    Console(String),
    /// `@"text"` - debuggee output routed through the debugger.
    Target(String),
    /// `&"text"` - debugger log stream.
    Log(String),
    /// `(gdb)` ready marker.
    Prompt,
}

/// Parsed MI value tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiValue {
    Const(String),
    Tuple(Vec<(String, MiValue)>),
    List(Vec<MiValue>),
}

impl MiValue {
    pub fn get(&self, key: &str) -> Option<&MiValue> {
        match self {
            MiValue::Tuple(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_const(&self) -> Option<&str> {
        match self {
            MiValue::Const(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[MiValue]> {
        match self {
            MiValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// String value of a key inside a tuple.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MiValue::as_const)
    }

    fn empty() -> Self {
        MiValue::Tuple(vec![])
    }
}

/// True for lines that belong to the MI protocol itself.
///
/// A debuggee writing to stdout shows up in the session stream without any
/// record sigil; such lines are target output, not protocol.
pub fn looks_like_record(line: &str) -> bool {
    let line = line.trim_end();
    if line == "(gdb)" {
        return true;
    }
    let stripped = line.trim_start_matches(|c: char| c.is_ascii_digit());
    stripped
        .chars()
        .next()
        .is_some_and(|c| matches!(c, '^' | '*' | '=' | '+' | '~' | '@' | '&'))
}

/// Classify and parse a single line of debugger output.
pub fn parse_record(line: &str) -> Result<Record, Error> {
    let line = line.trim_end();
    if line == "(gdb)" {
        return Ok(Record::Prompt);
    }

    // an optional numeric token may prefix result and async records
    let stripped = line.trim_start_matches(|c: char| c.is_ascii_digit());
    let mut chars = stripped.chars();
    let (sigil, rest) = match chars.next() {
        Some(c) => (c, chars.as_str()),
        None => return Err(Error::Protocol(format!("empty record: {line:?}"))),
    };

    match sigil {
        '~' => Ok(Record::Console(parse_cstring(rest)?)),
        '@' => Ok(Record::Target(parse_cstring(rest)?)),
        '&' => Ok(Record::Log(parse_cstring(rest)?)),
        '^' | '*' | '=' | '+' => {
            let (class, payload) = match rest.split_once(',') {
                Some((class, results)) => (class.to_string(), parse_results(results)?),
                None => (rest.to_string(), MiValue::empty()),
            };
            match sigil {
                '^' => Ok(Record::Result { class, payload }),
                '*' => Ok(Record::ExecAsync { class, payload }),
                // status-async records are as irrelevant to us as notifications
                _ => Ok(Record::Notify { class, payload }),
            }
        }
        _ => Err(Error::Protocol(format!("unrecognized record: {line:?}"))),
    }
}

/// Parse a comma separated result list (`key=value,key=value,...`) into a tuple.
fn parse_results(input: &str) -> Result<MiValue, Error> {
    let mut parser = Parser {
        bytes: input.as_bytes(),
        pos: 0,
    };
    let mut pairs = vec![];
    loop {
        pairs.push(parser.result()?);
        if !parser.eat(b',') {
            break;
        }
    }
    if parser.pos != parser.bytes.len() {
        return Err(Error::Protocol(format!(
            "trailing garbage in results: {input:?}"
        )));
    }
    Ok(MiValue::Tuple(pairs))
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> Result<(), Error> {
        if self.eat(b) {
            Ok(())
        } else {
            Err(Error::Protocol(format!(
                "expected {:?} at offset {} in MI value",
                b as char, self.pos
            )))
        }
    }

    fn result(&mut self) -> Result<(String, MiValue), Error> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            self.pos += 1;
        }
        let key = std::str::from_utf8(&self.bytes[start..self.pos])?.to_string();
        self.expect(b'=')?;
        let value = self.value()?;
        Ok((key, value))
    }

    fn value(&mut self) -> Result<MiValue, Error> {
        match self.peek() {
            Some(b'"') => {
                let (s, consumed) = cstring(&self.bytes[self.pos..])?;
                self.pos += consumed;
                Ok(MiValue::Const(s))
            }
            Some(b'{') => {
                self.pos += 1;
                let mut pairs = vec![];
                if !self.eat(b'}') {
                    loop {
                        pairs.push(self.result()?);
                        if !self.eat(b',') {
                            break;
                        }
                    }
                    self.expect(b'}')?;
                }
                Ok(MiValue::Tuple(pairs))
            }
            Some(b'[') => {
                self.pos += 1;
                let mut items = vec![];
                if !self.eat(b']') {
                    loop {
                        // lists hold either plain values or key=value results
                        let item = if self
                            .peek()
                            .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
                        {
                            let pair = self.result()?;
                            MiValue::Tuple(vec![pair])
                        } else {
                            self.value()?
                        };
                        items.push(item);
                        if !self.eat(b',') {
                            break;
                        }
                    }
                    self.expect(b']')?;
                }
                Ok(MiValue::List(items))
            }
            other => Err(Error::Protocol(format!(
                "unexpected byte {other:?} at offset {} in MI value",
                self.pos
            ))),
        }
    }
}

/// Parse a full c-string (`"..."`) and require it to span `input` entirely.
fn parse_cstring(input: &str) -> Result<String, Error> {
    let (s, consumed) = cstring(input.as_bytes())?;
    if consumed != input.trim_end().len() {
        return Err(Error::Protocol(format!("trailing garbage after string: {input:?}")));
    }
    Ok(s)
}

/// Decode a quoted c-string, return it with the number of input bytes consumed.
///
/// GDB escapes non-ascii output as octal byte sequences, so unescaping works on
/// bytes and the result is decoded as UTF-8 at the end.
fn cstring(bytes: &[u8]) -> Result<(String, usize), Error> {
    if bytes.first() != Some(&b'"') {
        return Err(Error::Protocol("string does not start with a quote".into()));
    }
    let mut out: Vec<u8> = vec![];
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Ok((String::from_utf8_lossy(&out).into_owned(), i + 1)),
            b'\\' => {
                i += 1;
                let esc = *bytes
                    .get(i)
                    .ok_or_else(|| Error::Protocol("dangling escape in string".into()))?;
                match esc {
                    b'n' => out.push(b'\n'),
                    b't' => out.push(b'\t'),
                    b'r' => out.push(b'\r'),
                    b'0'..=b'7' => {
                        let mut val: u32 = 0;
                        let mut digits = 0;
                        while digits < 3 && bytes.get(i).is_some_and(|b| (b'0'..=b'7').contains(b)) {
                            val = val * 8 + u32::from(bytes[i] - b'0');
                            i += 1;
                            digits += 1;
                        }
                        i -= 1;
                        out.push(val as u8);
                    }
                    other => out.push(other),
                }
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    Err(Error::Protocol("unterminated string".into()))
}

// ------------------------------- typed payload extractors -----------------------------------

/// `register-names=["r0","r1",...]`; holes in the numbering come out as empty names.
pub fn register_names(payload: &MiValue) -> Result<Vec<String>, Error> {
    let names = payload
        .get("register-names")
        .and_then(MiValue::as_list)
        .ok_or_else(|| Error::Protocol("no register-names in response".into()))?;
    Ok(names
        .iter()
        .map(|v| v.as_const().unwrap_or_default().to_string())
        .collect())
}

/// `register-values=[{number="0",value="0x0"},...]` as (index, raw text) pairs.
pub fn register_values(payload: &MiValue) -> Result<Vec<(usize, String)>, Error> {
    let values = payload
        .get("register-values")
        .and_then(MiValue::as_list)
        .ok_or_else(|| Error::Protocol("no register-values in response".into()))?;
    values
        .iter()
        .map(|item| {
            let number = item
                .string("number")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| Error::Protocol("register value without a number".into()))?;
            let value = item
                .string("value")
                .ok_or_else(|| Error::Protocol("register value without a value".into()))?;
            Ok((number, value.to_string()))
        })
        .collect()
}

/// Concatenated bytes of every block in a `-data-read-memory-bytes` response.
pub fn memory_contents(payload: &MiValue) -> Result<Vec<u8>, Error> {
    let blocks = payload
        .get("memory")
        .and_then(MiValue::as_list)
        .ok_or_else(|| Error::Protocol("no memory blocks in response".into()))?;
    let mut out = vec![];
    for block in blocks {
        let contents = block
            .string("contents")
            .ok_or_else(|| Error::Protocol("memory block without contents".into()))?;
        out.extend(decode_hex(contents)?);
    }
    Ok(out)
}

/// `asm_insns=[{address="0x...",inst="..."},...]`.
pub fn asm_lines(payload: &MiValue) -> Result<Vec<AsmLine>, Error> {
    let insns = payload
        .get("asm_insns")
        .and_then(MiValue::as_list)
        .ok_or_else(|| Error::Protocol("no asm_insns in response".into()))?;
    insns
        .iter()
        .map(|item| {
            let address = item
                .string("address")
                .and_then(crate::bridge::parse_value)
                .ok_or_else(|| Error::Protocol("instruction without an address".into()))?;
            let text = item
                .string("inst")
                .ok_or_else(|| Error::Protocol("instruction without text".into()))?;
            Ok(AsmLine {
                address,
                text: text.to_string(),
            })
        })
        .collect()
}

/// Distill a `*stopped` payload into a [`StopEvent`].
pub fn stop_event(payload: &MiValue) -> StopEvent {
    let frame = payload.get("frame");
    StopEvent {
        reason: payload.string("reason").map(ToString::to_string),
        addr: frame
            .and_then(|f| f.string("addr"))
            .and_then(crate::bridge::parse_value),
        func: frame.and_then(|f| f.string("func")).map(ToString::to_string),
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, Error> {
    if s.len() % 2 != 0 {
        return Err(Error::Protocol(format!("odd hex string length: {s:?}")));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|_| Error::Protocol(format!("bad hex byte in {s:?}")))
        })
        .collect()
}
