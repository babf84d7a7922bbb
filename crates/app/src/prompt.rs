use std::{
    fmt,
    io::{BufRead, Write},
    str::FromStr,
};

use engine::MoneyCents;

use crate::error::{InputError, Result};

/// Line based questions over any reader/writer pair.
///
/// Every answer is trimmed. Reaching the end of the input is reported as
/// [`InputError::EndOfInput`] so the caller can leave the shell cleanly.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: impl fmt::Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Raw answer, possibly empty.
    pub fn line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(InputError::EndOfInput.into());
        }
        Ok(buf.trim().to_string())
    }

    /// Non empty answer.
    pub fn text(&mut self, prompt: &str) -> Result<String> {
        let answer = self.line(prompt)?;
        if answer.is_empty() {
            return Err(InputError::Invalid("an answer is required".to_string()).into());
        }
        Ok(answer)
    }

    pub fn number<T: FromStr>(&mut self, prompt: &str) -> Result<T> {
        let answer = self.line(prompt)?;
        Ok(parse_number(&answer)?)
    }

    /// Quantity in liters, `,` accepted as decimal separator.
    pub fn liters(&mut self, prompt: &str) -> Result<f64> {
        let answer = self.line(prompt)?;
        Ok(parse_liters(&answer)?)
    }

    pub fn money(&mut self, prompt: &str) -> Result<MoneyCents> {
        let answer = self.line(prompt)?;
        answer
            .parse::<MoneyCents>()
            .map_err(|err| InputError::Invalid(err.to_string()).into())
    }

    /// Index into a numbered listing of `count` entries.
    pub fn pick(&mut self, prompt: &str, count: usize) -> Result<usize> {
        let answer = self.line(prompt)?;
        Ok(parse_index(&answer, count)?)
    }

    /// Comma separated indexes into a numbered listing of `count` entries.
    pub fn pick_many(&mut self, prompt: &str, count: usize) -> Result<Vec<usize>> {
        let answer = self.line(prompt)?;
        let mut picked = Vec::new();
        for token in answer.split(',').map(str::trim) {
            let index = parse_index(token, count)?;
            if !picked.contains(&index) {
                picked.push(index);
            }
        }
        Ok(picked)
    }
}

fn parse_number<T: FromStr>(raw: &str) -> std::result::Result<T, InputError> {
    raw.parse()
        .map_err(|_| InputError::NotANumber(raw.to_string()))
}

fn parse_liters(raw: &str) -> std::result::Result<f64, InputError> {
    raw.replace(',', ".")
        .parse()
        .map_err(|_| InputError::NotANumber(raw.to_string()))
}

fn parse_index(raw: &str, count: usize) -> std::result::Result<usize, InputError> {
    let index: usize = parse_number(raw)?;
    if index < count {
        Ok(index)
    } else {
        Err(InputError::OutOfRange(index))
    }
}

/// Resolve an ingredient answer: numbers pick from `known`, anything else is a
/// new ingredient name. Order is kept, repeats are dropped.
pub fn parse_ingredient_choice(
    raw: &str,
    known: &[String],
) -> std::result::Result<Vec<String>, InputError> {
    let mut chosen: Vec<String> = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let name = if token.chars().all(|c| c.is_ascii_digit()) {
            known[parse_index(token, known.len())?].clone()
        } else {
            token.to_string()
        };
        if !chosen.contains(&name) {
            chosen.push(name);
        }
    }

    if chosen.is_empty() {
        return Err(InputError::Invalid("no ingredient selected".to_string()));
    }
    Ok(chosen)
}
