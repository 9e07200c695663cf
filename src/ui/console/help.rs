use crate::ui::console::command;

pub const HELP: &str = r#"
Available session commands:

jnienv <address>        -- set the JNIEnv function table base pointer for this session
jnienv                  -- show the current table base pointer
vmmap <>|-f <pattern>   -- list debuggee memory mappings, optionally filtered by path
h, help <>|<command>    -- show help
q, quit                 -- exit the session

Any other input is forwarded to gdb unchanged (run, continue, break, stepi, ...).
Every time the debuggee stops, the register, assembly and stack panels repaint;
once a table base is set, indirect `blx rN` calls into the JNIEnv table are
annotated with the signature of the slot they target.
"#;

pub const HELP_JNIENV: &str = r#"
jnienv - manage the JNIEnv function table base pointer.

The table base is the value of a JNIEnv* in the debuggee (for example the
first argument of any JNI entry point). It starts out unset; set it once per
session and the table is read and indexed on the next stop. Addresses are
accepted in hex (0x...) or decimal.

Examples:
jnienv 0xb6f00120
jnienv
"#;

pub const HELP_VMMAP: &str = r#"
vmmap - list of mapped memory regions of the debuggee.

vmmap            - print all mappings
vmmap -f libart  - print only mapping lines whose path contains `libart`
"#;

/// Return help about a command, or the full summary.
pub fn help_for_command(command: Option<&str>) -> &str {
    match command {
        Some(command::JNIENV_COMMAND) => HELP_JNIENV,
        Some(command::VMMAP_COMMAND) => HELP_VMMAP,
        _ => HELP,
    }
}
