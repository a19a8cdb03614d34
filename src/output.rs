//! Coloured user-facing console lines.
//! Colours are used only when the target stream is a TTY; otherwise plain
//! `prefix: message` lines are printed so output stays greppable.

use owo_colors::OwoColorize;

#[derive(Clone, Copy)]
enum Kind {
    Info,
    Ok,
    Warn,
    Error,
}

impl Kind {
    fn prefix(self) -> &'static str {
        match self {
            Kind::Info => "info:",
            Kind::Ok => "ok:",
            Kind::Warn => "warn:",
            Kind::Error => "error:",
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Kind::Warn | Kind::Error)
    }
}

fn emit(kind: Kind, msg: &str) {
    let stream = if kind.to_stderr() { atty::Stream::Stderr } else { atty::Stream::Stdout };
    let line = if atty::is(stream) {
        let p = kind.prefix();
        let coloured = match kind {
            Kind::Info => p.cyan().bold().to_string(),
            Kind::Ok => p.green().bold().to_string(),
            Kind::Warn => p.yellow().bold().to_string(),
            Kind::Error => p.red().bold().to_string(),
        };
        format!("{coloured} {msg}")
    } else {
        format!("{} {msg}", kind.prefix())
    };
    if kind.to_stderr() {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

pub fn print_info(msg: &str) {
    emit(Kind::Info, msg);
}

pub fn print_success(msg: &str) {
    emit(Kind::Ok, msg);
}

pub fn print_warn(msg: &str) {
    emit(Kind::Warn, msg);
}

pub fn print_error(msg: &str) {
    emit(Kind::Error, msg);
}
