use std::io::{self, BufRead, Write};

use reggie::{Key, Regex};

fn main() -> io::Result<()> {
    env_logger::init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    repl(stdin.lock(), stdout.lock())
}

/// Reads a pattern, then subjects to run it on, until end of input or an
/// empty pattern. I/O errors, including failed flushes, end the session.
fn repl(mut input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    writeln!(output, "reggie REPL")?;
    writeln!(
        output,
        "Type a delimited pattern (e.g. ~(\\w+)=(\\w+)~i), or an empty line to exit."
    )?;

    loop {
        write!(output, "regex> ")?;
        output.flush()?;
        let mut pattern = String::new();
        if input.read_line(&mut pattern)? == 0 {
            return Ok(());
        }
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Ok(());
        }

        let regex = Regex::new(pattern);
        if let Err(e) = reggie::compile(regex.as_str()) {
            writeln!(output, "{e}")?;
            continue;
        }

        loop {
            writeln!(output, "Type return to go back to the regex prompt.")?;
            write!(output, "input> ")?;
            output.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            let subject = line.trim_end_matches(['\r', '\n']);
            if subject == "return" {
                break;
            }

            match regex.find_all(subject) {
                Ok(Some(all)) => {
                    writeln!(output, "Matched {} time(s)!", all.len())?;
                    for (number, match_data) in all.iter().enumerate() {
                        writeln!(output, "Match {number}:")?;
                        for (key, value) in match_data.iter() {
                            match key {
                                Key::Index(index) => writeln!(output, "  Group {index}: {value:?}")?,
                                Key::Name(name) => writeln!(output, "  Group <{name}>: {value:?}")?,
                            }
                        }
                    }
                }
                Ok(None) => writeln!(output, "No match.")?,
                Err(e) => {
                    writeln!(output, "{e}")?;
                    break;
                }
            }
        }
    }
}
