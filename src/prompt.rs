use std::io::{self, BufRead, Write};

/// Ask a yes/no question until the answer is `Y` or `N` (any case).
///
/// End of input counts as "no".
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    let mut line = String::new();
    loop {
        write!(output, "{question} [Y/N]: ")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }
        match line.trim().to_ascii_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            _ => writeln!(output, "Please answer Y or N.")?,
        }
    }
}
