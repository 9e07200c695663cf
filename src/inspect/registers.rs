//! Register snapshot differ.

use crate::bridge::Bridge;
use crate::error::Error;
use indexmap::IndexMap;

/// One register in a snapshot, value already normalized for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterEntry {
    pub name: String,
    pub value: String,
    pub changed: bool,
}

/// All registers of one refresh, in bridge enumeration order.
pub type RegisterSnapshot = IndexMap<String, RegisterEntry>;

/// Compares register values across consecutive refreshes.
///
/// The previous snapshot is the baseline for the next call; the very first
/// call only establishes the baseline, so nothing is marked changed. Values
/// are normalized before comparison, a formatting difference alone never
/// flags a register.
pub struct RegisterDiff {
    baseline: RegisterSnapshot,
    hex_pad: usize,
}

impl RegisterDiff {
    /// # Arguments
    ///
    /// * `hex_pad`: zero padding width of hex values, in digits (8 for 32-bit
    ///   targets, 16 for 64-bit ones)
    pub fn new(hex_pad: usize) -> Self {
        Self {
            baseline: IndexMap::new(),
            hex_pad,
        }
    }

    pub fn refresh(&mut self, bridge: &mut dyn Bridge) -> Result<RegisterSnapshot, Error> {
        let raw = bridge.read_registers()?;
        let first_refresh = self.baseline.is_empty();

        let mut snapshot = IndexMap::with_capacity(raw.len());
        for (name, raw_value) in raw {
            let value = normalize(&raw_value, self.hex_pad);
            let changed = if first_refresh {
                false
            } else {
                match self.baseline.get(&name) {
                    Some(prev) => prev.value != value,
                    None => return Err(Error::RegisterAppeared(name)),
                }
            };
            snapshot.insert(
                name.clone(),
                RegisterEntry {
                    name,
                    value,
                    changed,
                },
            );
        }

        // the register set of an architecture is stable within a session
        if !first_refresh {
            if let Some(gone) = self.baseline.keys().find(|k| !snapshot.contains_key(*k)) {
                return Err(Error::RegisterVanished(gone.clone()));
            }
        }

        self.baseline = snapshot.clone();
        Ok(snapshot)
    }
}

/// Bring raw register value text to its fixed display width.
///
/// Hex values are zero padded so that `0xf` and `0x0000000f` compare equal,
/// anything else (flag lists and the like) is left justified and compared
/// verbatim.
fn normalize(raw: &str, hex_pad: usize) -> String {
    let raw = raw.trim();
    match raw.strip_prefix("0x") {
        Some(digits) => format!("0x{:0>pad$}", digits.to_ascii_lowercase(), pad = hex_pad),
        None => format!("{raw:<width$}", width = hex_pad + 10),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bridge::testing::MockBridge;

    fn bridge(regs: &[(&str, &str)]) -> MockBridge {
        let mut bridge = MockBridge::default();
        for (name, value) in regs {
            bridge.set_register(name, value);
        }
        bridge
    }

    fn changed_names(snapshot: &RegisterSnapshot) -> Vec<&str> {
        snapshot
            .values()
            .filter(|e| e.changed)
            .map(|e| e.name.as_str())
            .collect()
    }

    #[test]
    fn test_first_refresh_establishes_baseline() {
        let mut bridge = bridge(&[("r0", "0x0"), ("r1", "0xffffffff"), ("pc", "0x1000")]);
        let mut differ = RegisterDiff::new(8);

        let snapshot = differ.refresh(&mut bridge).unwrap();

        assert!(changed_names(&snapshot).is_empty());
        assert_eq!(
            snapshot.keys().collect::<Vec<_>>(),
            vec!["r0", "r1", "pc"],
            "snapshot preserves enumeration order"
        );
    }

    #[test]
    fn test_identical_values_stay_unchanged() {
        let mut bridge = bridge(&[("r0", "0x2004"), ("r1", "0x0")]);
        let mut differ = RegisterDiff::new(8);

        differ.refresh(&mut bridge).unwrap();
        let second = differ.refresh(&mut bridge).unwrap();
        let third = differ.refresh(&mut bridge).unwrap();

        assert!(changed_names(&second).is_empty());
        assert!(changed_names(&third).is_empty());
    }

    #[test]
    fn test_single_changed_register_is_flagged() {
        let mut bridge = bridge(&[("r0", "0x2004"), ("r1", "0x10"), ("pc", "0x1000")]);
        let mut differ = RegisterDiff::new(8);
        differ.refresh(&mut bridge).unwrap();

        bridge.set_register("r1", "0x11");
        let snapshot = differ.refresh(&mut bridge).unwrap();

        assert_eq!(changed_names(&snapshot), vec!["r1"]);
        assert_eq!(snapshot["r1"].value, "0x00000011");

        // and it settles back once the value stops moving
        let snapshot = differ.refresh(&mut bridge).unwrap();
        assert!(changed_names(&snapshot).is_empty());
    }

    #[test]
    fn test_formatting_difference_is_not_a_change() {
        let mut bridge = bridge(&[("r0", "0xf")]);
        let mut differ = RegisterDiff::new(8);
        differ.refresh(&mut bridge).unwrap();

        bridge.set_register("r0", "0x0000000F");
        let snapshot = differ.refresh(&mut bridge).unwrap();

        assert!(changed_names(&snapshot).is_empty());
        assert_eq!(snapshot["r0"].value, "0x0000000f");
    }

    #[test]
    fn test_non_hex_values_pass_through() {
        let mut bridge = bridge(&[("cpsr", "[ N Z C ]")]);
        let mut differ = RegisterDiff::new(8);

        let snapshot = differ.refresh(&mut bridge).unwrap();
        assert_eq!(snapshot["cpsr"].value, "[ N Z C ]         ");

        bridge.set_register("cpsr", "[ N Z ]");
        let snapshot = differ.refresh(&mut bridge).unwrap();
        assert_eq!(changed_names(&snapshot), vec!["cpsr"]);
    }

    #[test]
    fn test_wide_padding() {
        let mut bridge = bridge(&[("x0", "0x1f")]);
        let mut differ = RegisterDiff::new(16);

        let snapshot = differ.refresh(&mut bridge).unwrap();
        assert_eq!(snapshot["x0"].value, "0x000000000000001f");
    }

    #[test]
    fn test_register_set_must_stay_stable() {
        let mut bridge = bridge(&[("r0", "0x0"), ("r1", "0x0")]);
        let mut differ = RegisterDiff::new(8);
        differ.refresh(&mut bridge).unwrap();

        bridge.set_register("r2", "0x0");
        assert!(matches!(
            differ.refresh(&mut bridge),
            Err(Error::RegisterAppeared(name)) if name == "r2"
        ));

        let mut shrunk = bridge_without_r1();
        assert!(matches!(
            differ.refresh(&mut shrunk),
            Err(Error::RegisterVanished(name)) if name == "r1"
        ));
    }

    fn bridge_without_r1() -> MockBridge {
        bridge(&[("r0", "0x0")])
    }
}
