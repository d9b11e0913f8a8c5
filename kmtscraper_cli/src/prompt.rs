//! Interactive choice of how many collections to crawl.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use kmtscraper_lib::validation::{validate_limit, CollectionLimit};

/// Asks on stderr and reads stdin until a usable answer arrives.
pub fn ask_limit(available: usize) -> Result<CollectionLimit> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    ask_limit_from(&mut input, &mut io::stderr(), available)
}

/// Re-asks on non-numeric or non-positive answers; answers above
/// `available` are accepted and clamped by the caller's report.
pub fn ask_limit_from<R, W>(input: &mut R, out: &mut W, available: usize) -> Result<CollectionLimit>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(
            out,
            "How many collections do you want to scrape? (1-{}): ",
            available
        )?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed before a number of collections was given");
        }
        match validate_limit(&line, available) {
            Ok(limit) => return Ok(limit),
            Err(e) => writeln!(out, "{}", e)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(answers: &str, available: usize) -> (Result<CollectionLimit>, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = ask_limit_from(&mut input, &mut out, available);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn accepts_first_valid_answer() {
        let (result, out) = ask("2\n", 5);
        assert_eq!(result.unwrap(), CollectionLimit { count: 2, clamped: false });
        assert_eq!(out.matches("How many").count(), 1);
    }

    #[test]
    fn reprompts_until_positive_number() {
        let (result, out) = ask("abc\n0\n-3\n4\n", 5);
        assert_eq!(result.unwrap().count, 4);
        assert_eq!(out.matches("How many").count(), 4);
        assert!(out.contains("not a valid number"));
        assert!(out.contains("positive"));
    }

    #[test]
    fn clamps_answer_above_available() {
        let (result, _) = ask("12\n", 3);
        assert_eq!(result.unwrap(), CollectionLimit { count: 3, clamped: true });
    }

    #[test]
    fn closed_input_is_an_error() {
        let (result, _) = ask("nope\n", 3);
        assert!(result.is_err());
    }
}
