//! One-line status messages for the interactive commands.
//!
//! Lines are tagged (`ok:`, `warning:`, ...) so they stay readable when piped
//! into a file; colour is only added when the stream is a terminal. The
//! server logs through `tracing` instead.

use std::fmt::Display;
use std::io::{self, IsTerminal};

#[derive(Clone, Copy)]
enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

impl Tone {
    fn tag(self) -> &'static str {
        match self {
            Tone::Info => "info",
            Tone::Success => "ok",
            Tone::Warning => "warning",
            Tone::Error => "error",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Tone::Info => "\x1b[1;34m",
            Tone::Success => "\x1b[1;32m",
            Tone::Warning => "\x1b[1;33m",
            Tone::Error => "\x1b[1;31m",
        }
    }
}

const RESET: &str = "\x1b[0m";

fn line(tone: Tone, msg: impl Display, colour: bool) -> String {
    if colour {
        format!("{}{}:{} {}", tone.ansi(), tone.tag(), RESET, msg)
    } else {
        format!("{}: {}", tone.tag(), msg)
    }
}

pub fn info(msg: impl Display) {
    println!("{}", line(Tone::Info, msg, io::stdout().is_terminal()));
}

pub fn success(msg: impl Display) {
    println!("{}", line(Tone::Success, msg, io::stdout().is_terminal()));
}

pub fn warning(msg: impl Display) {
    println!("{}", line(Tone::Warning, msg, io::stdout().is_terminal()));
}

/// Errors go to stderr, coloured only if stderr is a terminal.
pub fn error(msg: impl Display) {
    eprintln!("{}", line(Tone::Error, msg, io::stderr().is_terminal()));
}

/// Section title above a listing, underlined to its own width.
pub fn header(msg: impl Display) {
    let title = msg.to_string();
    let rule = "-".repeat(title.chars().count());
    if io::stdout().is_terminal() {
        println!("\x1b[1m{title}{RESET}");
    } else {
        println!("{title}");
    }
    println!("{rule}");
}
