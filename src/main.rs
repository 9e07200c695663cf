use clap::Parser;
use jniscope::ui::config::{self, FileConfig, UIConfig, WordWidth};
use jniscope::ui::console::AppBuilder;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Debugger binary to drive
    #[arg(long, env = "JNS_GDB")]
    gdb: Option<String>,

    /// Connect to a remote stub (`host:port`) right after start
    #[arg(long)]
    remote: Option<String>,

    /// Target word width in bits (32 or 64)
    #[arg(long, value_parser = WordWidth::from_str)]
    word_width: Option<WordWidth>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Program to debug
    debugee: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let file = FileConfig::load();

    let word_width = args
        .word_width
        .or(file.word_width)
        .unwrap_or(WordWidth::Bits32);
    let colors = !args.no_color && file.colors.unwrap_or(true);
    config::set(UIConfig { word_width, colors });

    let gdb = args.gdb.or(file.gdb).unwrap_or_else(|| "gdb".to_string());
    let mut builder = AppBuilder::new(gdb);
    if let Some(debugee) = args.debugee {
        builder = builder.with_debugee(debugee);
    }
    if let Some(remote) = args.remote {
        builder = builder.with_remote(remote);
    }

    let app = builder.build()?;
    app.run()
}
