//! Panel views over inspection reports.
//!
//! All layout math happens on plain text; color is applied cell by cell after
//! a cell is already padded, so styled and unstyled output line up the same.

use crate::inspect::asm::Instruction;
use crate::inspect::panel;
use crate::inspect::registers::RegisterSnapshot;
use crate::inspect::stack::StackRow;
use crate::ui::console::print::style::{
    AddressView, AnnotationView, BorderView, ChangedValueView, CurrentInsnView, RegisterNameView,
};
use itertools::Itertools;

/// Spaces on each side of a register cell.
const CELL_MARGIN: usize = 5;

pub fn register_panel(snapshot: &RegisterSnapshot, width: usize) -> String {
    let name_width = snapshot
        .keys()
        .map(|name| name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let value_width = snapshot
        .values()
        .map(|e| e.value.len())
        .max()
        .unwrap_or(10);
    let cell = 2 * CELL_MARGIN + name_width + 1 + value_width;
    let (per_line, padding) = panel::grid(cell, width);

    let margin = " ".repeat(CELL_MARGIN);
    let pad = " ".repeat(padding);
    let mut body = vec![];
    for chunk in &snapshot.values().chunks(per_line) {
        let mut line = String::new();
        for entry in chunk {
            let name = RegisterNameView::from(format!("{:>name_width$}", entry.name));
            let value = if entry.changed {
                ChangedValueView::from(&entry.value).to_string()
            } else {
                entry.value.clone()
            };
            line.push_str(&format!("{margin}{name}-{value}{margin}{pad}"));
        }
        body.push(line.trim_end().to_string());
    }

    bordered("Register", &body, width)
}

pub fn asm_panel(listing: &[Instruction], width: usize) -> String {
    let mut body = vec![String::new()];
    for insn in listing {
        let addr = format!("{:#x}:", insn.address);
        let mut line = if insn.is_current {
            format!(
                "{}\t{}",
                AddressView::from(format!("-->\t{addr}")),
                CurrentInsnView::from(&insn.text),
            )
        } else {
            format!("\t{}\t{}", AddressView::from(addr), insn.text)
        };
        if let Some(signature) = insn.annotation {
            line.push_str(&format!("\t{}", AnnotationView::from(format!("; {signature}"))));
        }
        body.push(line);
    }
    body.push(String::new());

    bordered("Assembly", &body, width)
}

pub fn stack_panel(rows: &[StackRow], width: usize) -> String {
    let body: Vec<String> = rows
        .iter()
        .map(|row| {
            let bytes = row.bytes.iter().map(|b| format!("0x{b:02x}")).join("   ");
            let ascii: String = row.ascii.iter().collect();
            format!(
                "\t{}\t\t{bytes}   {} {ascii}",
                AddressView::from(format!("{:#010x}:", row.address)),
                BorderView::from("│"),
            )
        })
        .collect();

    bordered("Stack", &body, width)
}

/// Compose a panel and colorize its border lines.
fn bordered(title: &str, body: &[String], width: usize) -> String {
    let plain = panel::compose(title, body, width);
    let mut lines: Vec<String> = plain.lines().map(ToString::to_string).collect();
    if let Some(top) = lines.first_mut() {
        *top = BorderView::from(&*top).to_string();
    }
    if let Some(bottom) = lines.last_mut() {
        *bottom = BorderView::from(&*bottom).to_string();
    }
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::inspect::registers::RegisterEntry;
    use crate::inspect::stack;
    use indexmap::IndexMap;

    fn entry(name: &str, value: &str, changed: bool) -> (String, RegisterEntry) {
        (
            name.to_string(),
            RegisterEntry {
                name: name.to_string(),
                value: value.to_string(),
                changed,
            },
        )
    }

    #[test]
    fn test_register_panel_layout() {
        let snapshot: RegisterSnapshot = IndexMap::from_iter([
            entry("r0", "0x00002004", false),
            entry("r1", "0x00000011", true),
            entry("r2", "0x00000000", false),
            entry("r3", "0x00000000", false),
        ]);

        let panel = register_panel(&snapshot, 80);
        let lines: Vec<&str> = panel.lines().collect();

        assert!(lines[0].starts_with("┌─ Register "));
        // cell is 25 columns wide, so 3 registers fit an 80 column line
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("     r0-0x00002004"));
        assert!(lines[1].contains("r2-0x00000000"));
        assert!(lines[2].trim_start().starts_with("r3-"));
        assert!(lines[3].ends_with('┘'));
    }

    #[test]
    fn test_asm_panel_marks_current_and_annotates() {
        let listing = vec![
            Instruction {
                address: 0xffc,
                text: "mov\tr0, r1".to_string(),
                is_current: false,
                annotation: None,
            },
            Instruction {
                address: 0x1000,
                text: "blx\tr0".to_string(),
                is_current: true,
                annotation: Some("jclass      (*DefineClass)(JNIEnv*, const char*, jobject, const jbyte*, jsize);"),
            },
        ];

        let panel = asm_panel(&listing, 100);

        assert!(panel.contains("\t0xffc:\tmov\tr0, r1"));
        assert!(panel.contains("-->\t0x1000:\tblx\tr0"));
        assert!(panel
            .contains("blx\tr0\t; jclass      (*DefineClass)(JNIEnv*, const char*, jobject, const jbyte*, jsize);"));
    }

    #[test]
    fn test_stack_panel_rows() {
        let rows = vec![StackRow {
            address: 0xbeffe5a0,
            bytes: b"Hi\x00\x01\x02\x03\x04\x05".to_vec(),
            ascii: b"Hi\x00\x01\x02\x03\x04\x05"
                .iter()
                .map(|&b| stack::glyph(b))
                .collect(),
        }];

        let panel = stack_panel(&rows, 90);

        assert!(panel.contains("0xbeffe5a0:"));
        assert!(panel.contains("0x48   0x69   0x00"));
        assert!(panel.contains("│ Hi······"));
    }
}
