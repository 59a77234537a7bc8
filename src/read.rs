extern crate termcolor;

use std::{
    fs,
    io::{self, stdin, Write},
};
use termcolor::{Color, StandardStream, WriteColor};

#[allow(unused_must_use)]
pub fn read_line_to(stdout: &mut StandardStream, prompt: &[u8], dest: &mut String) {
    dest.clear();
    loop {
        stdout.write(prompt);
        stdout.flush();
        match stdin().read_line(dest) {
            Ok(_) => {
                dest.truncate(dest.trim_end().len());
                return;
            }
            Err(e) => write_error!(stdout, "Error", "Read: {}", e.to_string()),
        }
        stdout.reset();
    }
}
pub fn read_line(stdout: &mut StandardStream, prompt: &[u8]) -> String {
    let mut ret = String::new();
    read_line_to(stdout, prompt, &mut ret);
    ret
}
#[allow(unused_must_use)]
pub fn read_choice<'a>(stdout: &mut StandardStream, prompt: &[u8], choices: &[&'a str]) -> &'a str {
    let mut buf = String::new();
    loop {
        read_line_to(stdout, prompt, &mut buf);
        if let Some(v) = choices.iter().find(|c| c.eq_ignore_ascii_case(buf.trim())) {
            return *v;
        }
        write_error!(
            stdout,
            "Error",
            "parse: Unknown value {}. Expected one of {}",
            buf,
            choices.join(", ")
        );
        stdout.reset();
    }
}

#[allow(unused_must_use)]
fn read_file_path<F: Fn(&String) -> Result<Ret, io::Error>, Ret>(
    stdout: &mut StandardStream,
    prompt: &[u8],
    fun: F,
) -> Ret {
    let mut path = String::new();
    loop {
        read_line_to(stdout, prompt, &mut path);
        match fun(&path) {
            Ok(v) => break v,
            Err(e) => write_error!(stdout, "Error", "Error open {}: {}", path, e),
        }
        stdout.reset();
    }
}

pub fn read_file(stdout: &mut StandardStream, prompt: &[u8]) -> String {
    read_file_path(stdout, prompt, |p| fs::read_to_string(p))
}
