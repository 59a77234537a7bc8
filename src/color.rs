extern crate termcolor;

use std::io::{self, Write};
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

/// Right-aligned colored label in front of a message line.
pub fn write_label(stdout: &mut StandardStream, color: Color, label: &str) -> io::Result<()> {
    stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_intense(true))?;
    write!(stdout, "{:>7}: ", label)?;
    stdout.set_color(ColorSpec::new().set_fg(None).set_intense(true))
}

macro_rules! write_color {
    ($dest:expr, $color:expr, $label:expr, $($arg:tt)*) => {{
        let _ = $crate::color::write_label($dest, $color, $label);
        let _ = writeln!($dest, $($arg)*);
    }};
}

macro_rules! write_error {
    ($dest:expr, $label:expr, $($arg:tt)*) => {
        write_color!($dest, Color::Red, $label, $($arg)*)
    };
}

macro_rules! write_info {
    ($dest:expr, $label:expr, $($arg:tt)*) => {
        write_color!($dest, Color::Blue, $label, $($arg)*)
    };
}

macro_rules! write_ok {
    ($dest:expr, $label:expr, $($arg:tt)*) => {
        write_color!($dest, Color::Green, $label, $($arg)*)
    };
}

macro_rules! write_progress {
    ($dest:expr, $label:expr, $($arg:tt)*) => {
        write_color!($dest, Color::Cyan, $label, $($arg)*)
    };
}
