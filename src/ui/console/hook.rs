use crate::bridge::{Bridge, StopEvent};
use crate::inspect::Inspector;
use crate::ui::console::print::style::{AddressView, KeywordView};
use crate::ui::console::print::Printer;
use crate::ui::console::view;

/// Receiver of debuggee halt notifications.
///
/// Called synchronously from the session loop; the debuggee stays stopped for
/// the whole call, so the hook may freely query the bridge.
pub trait StopHook {
    fn on_stop(&mut self, bridge: &mut dyn Bridge, event: &StopEvent) -> anyhow::Result<()>;
}

/// The production hook: repaint the inspection view on every stop.
pub struct InspectHook {
    inspector: Inspector,
    printer: Printer,
}

impl InspectHook {
    pub fn new(inspector: Inspector) -> Self {
        Self {
            inspector,
            printer: Printer::default(),
        }
    }

    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    pub fn inspector_mut(&mut self) -> &mut Inspector {
        &mut self.inspector
    }

    fn stop_report(&self, event: &StopEvent) -> String {
        let mut report = "Stopped".to_string();
        if let Some(reason) = &event.reason {
            report.push_str(&format!(" ({})", KeywordView::from(reason)));
        }
        if let Some(addr) = event.addr {
            report.push_str(&format!(" at {}", AddressView::from(format!("{addr:#x}"))));
        }
        if let Some(func) = &event.func {
            report.push_str(&format!(" in {func}"));
        }
        report
    }
}

impl StopHook for InspectHook {
    fn on_stop(&mut self, bridge: &mut dyn Bridge, event: &StopEvent) -> anyhow::Result<()> {
        let report = self.inspector.refresh(bridge)?;
        let width = bridge.terminal_width();

        self.printer.clear_screen();
        self.printer.println(self.stop_report(event));
        self.printer.print(view::register_panel(&report.registers, width));
        self.printer.print(view::asm_panel(&report.asm, width));
        self.printer.print(view::stack_panel(&report.stack, width));
        Ok(())
    }
}
