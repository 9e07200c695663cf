//! Disassembly window with indirect call annotation.

use crate::bridge::Bridge;
use crate::error::Error;
use crate::inspect::jni::JniResolver;
use strum_macros::Display;

/// Instructions per rendered window.
pub const WINDOW_LEN: usize = 10;
/// Encoding units of history shown before the program counter.
const LOOKBACK_UNITS: u64 = 4;

/// Instruction encoding scheme, selected at runtime via the status flag word.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ExecMode {
    Arm,
    Thumb,
}

impl ExecMode {
    /// Thumb state lives in bit 5 of the cpsr.
    pub fn from_status_word(cpsr: u64) -> Self {
        if cpsr & 0x20 == 0 {
            ExecMode::Arm
        } else {
            ExecMode::Thumb
        }
    }

    pub fn insn_len(self) -> u64 {
        match self {
            ExecMode::Arm => 4,
            ExecMode::Thumb => 2,
        }
    }
}

/// One annotated line of the disassembly window. Recomputed every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub address: u64,
    pub text: String,
    pub is_current: bool,
    /// Table signature of the branch target, when resolved.
    pub annotation: Option<&'static str>,
}

/// Disassemble around the program counter and annotate indirect table calls.
///
/// The execution mode is read from the status register on every call - it can
/// flip between refreshes (interworking branches), so it is never cached. The
/// annotation of a `blx rN` reflects the register content at render time: the
/// actual target about to be taken, not a static property of the instruction.
pub fn render(bridge: &mut dyn Bridge, resolver: &JniResolver) -> Result<Vec<Instruction>, Error> {
    let pc = bridge.program_counter()?;
    let mode = ExecMode::from_status_word(bridge.status_word()?);
    let start = pc.saturating_sub(LOOKBACK_UNITS * mode.insn_len());
    log::debug!(target: "inspect", "disassemble {WINDOW_LEN} instructions from {start:#x} ({mode} mode)");

    let lines = bridge.disassemble(start, WINDOW_LEN)?;
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let mut annotation = None;
        if resolver.is_loaded() {
            if let Some(register) = indirect_register_target(&line.text) {
                if let Some(value) = bridge.read_register(register)? {
                    annotation = resolver.lookup(value);
                }
            }
        }
        out.push(Instruction {
            address: line.address,
            is_current: line.address == pc,
            text: line.text,
            annotation,
        });
    }
    Ok(out)
}

/// Register operand of an indirect branch-and-exchange instruction.
///
/// Matching is deliberately narrow: only `blx` with a bare `rN` operand names
/// a call through a table slot held in a register. Widening it (memory
/// operands, plain `bx`) would tag branches that have nothing to do with the
/// table.
fn indirect_register_target(text: &str) -> Option<&str> {
    let (mnemonic, operands) = text.split_once(char::is_whitespace)?;
    if !mnemonic.eq_ignore_ascii_case("blx") {
        return None;
    }
    let operand = operands.trim();
    let digits = operand.strip_prefix('r')?;
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(operand)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bridge::testing::MockBridge;
    use crate::bridge::AsmLine;

    #[test]
    fn test_mode_from_status_word() {
        assert_eq!(ExecMode::from_status_word(0x600001d3), ExecMode::Arm);
        assert_eq!(ExecMode::from_status_word(0x600001f3), ExecMode::Thumb);
        assert_eq!(ExecMode::Arm.insn_len(), 4);
        assert_eq!(ExecMode::Thumb.insn_len(), 2);
    }

    #[test]
    fn test_indirect_register_target() {
        struct TestCase {
            text: &'static str,
            expected: Option<&'static str>,
        }
        let test_cases = [
            TestCase {
                text: "blx\tr3",
                expected: Some("r3"),
            },
            TestCase {
                text: "blx r12",
                expected: Some("r12"),
            },
            TestCase {
                text: "BLX\tr0",
                expected: Some("r0"),
            },
            // direct branch: target encoded in the instruction
            TestCase {
                text: "blx\t0xb6f01234",
                expected: None,
            },
            // exchange without link is not a call
            TestCase {
                text: "bx\tr3",
                expected: None,
            },
            TestCase {
                text: "blx\tlr",
                expected: None,
            },
            TestCase {
                text: "add\tr0, r1",
                expected: None,
            },
            TestCase {
                text: "blx",
                expected: None,
            },
        ];

        for tc in test_cases {
            assert_eq!(indirect_register_target(tc.text), tc.expected, "text: {}", tc.text);
        }
    }

    fn asm_bridge(pc: u64, cpsr: u64) -> MockBridge {
        MockBridge {
            pc,
            cpsr,
            asm: (0..16)
                .map(|i| AsmLine {
                    address: 0x0ff0 + i * 4,
                    text: "mov\tr0, r1".to_string(),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_window_starts_four_units_before_pc() {
        let resolver = JniResolver::new();

        let mut arm = asm_bridge(0x1000, 0);
        render(&mut arm, &resolver).unwrap();
        assert_eq!(arm.disasm_requests, vec![0x1000 - 16]);

        let mut thumb = asm_bridge(0x1000, 0x20);
        render(&mut thumb, &resolver).unwrap();
        assert_eq!(thumb.disasm_requests, vec![0x1000 - 8]);
    }

    #[test]
    fn test_current_instruction_is_marked() {
        let resolver = JniResolver::new();
        let mut bridge = asm_bridge(0x1000, 0);

        let listing = render(&mut bridge, &resolver).unwrap();

        assert_eq!(listing.len(), 10);
        let current: Vec<u64> = listing
            .iter()
            .filter(|i| i.is_current)
            .map(|i| i.address)
            .collect();
        assert_eq!(current, vec![0x1000]);
    }

    #[test]
    fn test_unloaded_resolver_never_annotates() {
        let mut bridge = asm_bridge(0x1000, 0);
        bridge.asm[4].text = "blx\tr0".to_string();
        bridge.set_register("r0", "0x2004");

        let resolver = JniResolver::new();
        let listing = render(&mut bridge, &resolver).unwrap();

        assert!(listing.iter().all(|i| i.annotation.is_none()));
    }

    #[test]
    fn test_annotation_tracks_live_register_value() {
        const TABLE: &[&str] = &["GetVersion", "DefineClass"];
        let base = 0x2000;

        let mut bridge = asm_bridge(0x1000, 0);
        bridge.asm[4].text = "blx\tr0".to_string();
        bridge.put_memory(base, &0xb6f0_1000u32.to_le_bytes());
        bridge.put_memory(base + 4, &0x0000_2004u32.to_le_bytes());

        let mut resolver = JniResolver::with_table(TABLE);
        resolver.resolve_base(&mut bridge, base, 4).unwrap();

        bridge.set_register("r0", "0x00002004");
        let listing = render(&mut bridge, &resolver).unwrap();
        let current = listing.iter().find(|i| i.is_current).unwrap();
        assert_eq!(current.annotation, Some("DefineClass"));

        // same instruction, new register content, new annotation
        bridge.set_register("r0", "0xb6f01000");
        let listing = render(&mut bridge, &resolver).unwrap();
        let current = listing.iter().find(|i| i.is_current).unwrap();
        assert_eq!(current.annotation, Some("GetVersion"));

        // and a target outside the table renders bare
        bridge.set_register("r0", "0x12345678");
        let listing = render(&mut bridge, &resolver).unwrap();
        let current = listing.iter().find(|i| i.is_current).unwrap();
        assert_eq!(current.annotation, None);
    }
}
