//! The inspection engine.
//!
//! One [`Inspector`] lives per debugging session. Every stop event runs a
//! single synchronous refresh: register diff, stack window, table resolution
//! and the annotated disassembly window, strictly in that order. The only
//! state surviving a refresh is the differ baseline and the resolver index,
//! both owned here; a refresh either completes or fails as a whole, and a
//! failed one leaves the next stop event unaffected.

pub mod asm;
pub mod jni;
pub mod panel;
pub mod registers;
pub mod stack;

use crate::bridge::Bridge;
use crate::error::Error;
use asm::Instruction;
use jni::JniResolver;
use registers::{RegisterDiff, RegisterSnapshot};
use stack::StackRow;

/// Everything one refresh produced, ready for rendering.
pub struct Report {
    pub registers: RegisterSnapshot,
    pub stack: Vec<StackRow>,
    pub asm: Vec<Instruction>,
}

pub struct Inspector {
    registers: RegisterDiff,
    jni: JniResolver,
    /// Session scoped table base pointer; zero until the user provides one.
    table_base: u64,
    /// Debuggee pointer width in bytes, fixed per session.
    stride: usize,
}

impl Inspector {
    /// # Arguments
    ///
    /// * `hex_pad`: register display width in hex digits
    /// * `stride`: debuggee pointer width in bytes (table slot stride)
    pub fn new(hex_pad: usize, stride: usize) -> Self {
        Self {
            registers: RegisterDiff::new(hex_pad),
            jni: JniResolver::new(),
            table_base: 0,
            stride,
        }
    }

    pub fn set_table_base(&mut self, base: u64) {
        self.table_base = base;
    }

    pub fn table_base(&self) -> u64 {
        self.table_base
    }

    /// Run one full refresh against a stopped debuggee.
    pub fn refresh(&mut self, bridge: &mut dyn Bridge) -> Result<Report, Error> {
        let registers = self.registers.refresh(bridge)?;
        let stack = stack::read_window(bridge)?;
        self.jni.resolve_base(bridge, self.table_base, self.stride)?;
        let asm = asm::render(bridge, &self.jni)?;
        Ok(Report {
            registers,
            stack,
            asm,
        })
    }

    #[cfg(test)]
    fn with_table(table: &'static [&'static str], hex_pad: usize, stride: usize) -> Self {
        Self {
            registers: RegisterDiff::new(hex_pad),
            jni: JniResolver::with_table(table),
            table_base: 0,
            stride,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bridge::testing::MockBridge;
    use crate::bridge::AsmLine;

    const TABLE: &[&str] = &[
        "jint        (*GetVersion)(JNIEnv *);",
        "jclass      (*DefineClass)(JNIEnv*, const char*, jobject, const jbyte*, jsize);",
    ];

    /// A stopped debuggee: pc at 0x1000 on a `blx r0`, a populated stack and a
    /// resolvable table at 0x2000 whose slot 1 holds 0x2004.
    fn scenario_bridge() -> MockBridge {
        let mut bridge = MockBridge {
            pc: 0x1000,
            sp: 0xbeff_e5a0,
            cpsr: 0, // arm mode
            ..Default::default()
        };
        bridge.set_register("r0", "0x00002004");
        bridge.set_register("r1", "0x00000000");
        bridge.set_register("pc", "0x1000");

        bridge.put_memory(0xbeff_e5a0, &[0x41u8; stack::WINDOW_BYTES]);

        bridge.put_memory(0x2000, &0xb6f0_1000u32.to_le_bytes());
        bridge.put_memory(0x2004, &0x0000_2004u32.to_le_bytes());

        bridge.asm = (0..12)
            .map(|i| AsmLine {
                address: 0x0ff0 + i * 4,
                text: if 0x0ff0 + i * 4 == 0x1000 {
                    "blx\tr0".to_string()
                } else {
                    "mov\tr0, r1".to_string()
                },
            })
            .collect();
        bridge
    }

    #[test]
    fn test_indirect_call_resolves_to_slot_signature() {
        let mut bridge = scenario_bridge();
        let mut inspector = Inspector::with_table(TABLE, 8, 4);
        inspector.set_table_base(0x2000);

        let report = inspector.refresh(&mut bridge).unwrap();

        let current = report.asm.iter().find(|i| i.is_current).unwrap();
        assert_eq!(current.address, 0x1000);
        assert_eq!(current.text, "blx\tr0");
        assert_eq!(
            current.annotation,
            Some("jclass      (*DefineClass)(JNIEnv*, const char*, jobject, const jbyte*, jsize);")
        );
    }

    #[test]
    fn test_without_base_pointer_everything_degrades_silently() {
        let mut bridge = scenario_bridge();
        let mut inspector = Inspector::with_table(TABLE, 8, 4);

        let report = inspector.refresh(&mut bridge).unwrap();

        assert!(report.asm.iter().all(|i| i.annotation.is_none()));
        assert_eq!(report.stack.len(), 6);
        assert_eq!(report.registers.len(), 3);
    }

    #[test]
    fn test_register_diff_across_two_refreshes() {
        let mut bridge = scenario_bridge();
        let mut inspector = Inspector::with_table(TABLE, 8, 4);

        let first = inspector.refresh(&mut bridge).unwrap();
        assert!(!first.registers["r1"].changed);

        // identical reads: still unchanged
        let second = inspector.refresh(&mut bridge).unwrap();
        assert!(!second.registers["r1"].changed);

        // one differing byte flips exactly one flag
        bridge.set_register("r1", "0x00000100");
        let third = inspector.refresh(&mut bridge).unwrap();
        assert!(third.registers["r1"].changed);
        assert!(!third.registers["r0"].changed);
        assert!(!third.registers["pc"].changed);
    }

    #[test]
    fn test_table_resolves_once_on_first_refresh_with_base() {
        let mut bridge = scenario_bridge();
        let mut inspector = Inspector::with_table(TABLE, 8, 4);

        // no base yet: refresh must not touch table memory
        inspector.refresh(&mut bridge).unwrap();

        inspector.set_table_base(0x2000);
        inspector.refresh(&mut bridge).unwrap();

        // overwrite the slot; the index must keep the first reading
        bridge.put_memory(0x2004, &0xdead_beefu32.to_le_bytes());
        let report = inspector.refresh(&mut bridge).unwrap();
        let current = report.asm.iter().find(|i| i.is_current).unwrap();
        assert!(current
            .annotation
            .is_some_and(|sig| sig.contains("DefineClass")));
    }

    #[test]
    fn test_failed_refresh_leaves_next_one_clean() {
        let mut bridge = scenario_bridge();
        let mut inspector = Inspector::with_table(TABLE, 8, 4);
        inspector.refresh(&mut bridge).unwrap();

        // sp moves to unmapped memory: the whole refresh fails
        bridge.sp = 0x10;
        assert!(inspector.refresh(&mut bridge).is_err());

        bridge.sp = 0xbeff_e5a0;
        inspector.refresh(&mut bridge).unwrap();
    }
}
