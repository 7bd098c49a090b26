use anyhow::{Context, Result};
use std::fmt::Display;
use std::io::{BufRead, Write};
use thiserror::Error;

pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 10.0;

/// Standard input was closed while a prompt was waiting.
#[derive(Debug, Error)]
#[error("input closed")]
pub struct InputClosed;

/// Line-oriented prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.output, "{}", message).context("Failed to write to output")
    }

    /// Print `prompt` and read one trimmed line.
    pub fn line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush output")?;
        let mut buf = String::new();
        let read = self
            .input
            .read_line(&mut buf)
            .context("Failed to read input")?;
        if read == 0 {
            return Err(InputClosed.into());
        }
        Ok(buf.trim().to_string())
    }

    pub fn nonempty(&mut self, prompt: &str) -> Result<String> {
        loop {
            let value = self.line(prompt)?;
            if !value.is_empty() {
                return Ok(value);
            }
            self.say("Input cannot be empty. Try again.")?;
        }
    }

    /// Ask until a number within `[min, max]` is entered.
    pub fn float_in_range(&mut self, prompt: &str, min: f64, max: f64) -> Result<f64> {
        loop {
            let value = self.line(prompt)?;
            match value.parse::<f64>() {
                Ok(n) if (min..=max).contains(&n) => return Ok(n),
                Ok(_) => self.say(format!("Please enter a number between {} and {}.", min, max))?,
                Err(_) => self.say("Invalid input. Please enter a number.")?,
            }
        }
    }

    pub fn rating(&mut self, prompt: &str) -> Result<f64> {
        self.float_in_range(prompt, RATING_MIN, RATING_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn rating_rejects_out_of_range_and_garbage() {
        let mut p = prompter("11\n-1\nabc\n7.5\n");
        assert_eq!(p.rating("Rating: ").unwrap(), 7.5);
        let out = output(p);
        assert_eq!(out.matches("Rating: ").count(), 4);
        assert_eq!(out.matches("Please enter a number between 0 and 10.").count(), 2);
        assert_eq!(out.matches("Invalid input. Please enter a number.").count(), 1);
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        let mut p = prompter("0\n10\n");
        assert_eq!(p.rating("> ").unwrap(), 0.0);
        assert_eq!(p.rating("> ").unwrap(), 10.0);
    }

    #[test]
    fn nonempty_reprompts_on_blank() {
        let mut p = prompter("\n   \n  Heat  \n");
        assert_eq!(p.nonempty("Title: ").unwrap(), "Heat");
        assert_eq!(output(p).matches("Input cannot be empty").count(), 2);
    }

    #[test]
    fn closed_input_is_reported() {
        let mut p = prompter("");
        let err = p.nonempty("Title: ").unwrap_err();
        assert!(err.is::<InputClosed>());
    }
}
