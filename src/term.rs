//! Line oriented prompts for the interactive menus.

use std::io::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::common::Result;
use crate::sys::EchoGuard;

pub struct Prompt<R> {
    lines: Lines<R>,
}

impl Prompt<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Prompt::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> Prompt<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Ask and return the trimmed answer. `None` once input is exhausted.
    pub async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        show(question);
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_owned()))
    }

    /// Ask without echoing the answer. The answer is not trimmed.
    pub async fn ask_secret(&mut self, question: &str) -> Result<Option<String>> {
        show(question);
        let answer = {
            let _echo = EchoGuard::disable();
            self.lines.next_line().await?
        };
        println!();
        Ok(answer)
    }

    /// `y` (any case) is yes, everything else is no.
    pub async fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self
            .ask(question)
            .await?
            .map_or(false, |a| a.eq_ignore_ascii_case("y")))
    }

    /// Ask for a number, falling back to `default` for anything else.
    pub async fn ask_count(&mut self, question: &str, default: usize) -> Result<usize> {
        Ok(self
            .ask(question)
            .await?
            .and_then(|a| a.parse().ok())
            .unwrap_or(default))
    }

    pub async fn pause(&mut self) -> Result<()> {
        self.ask("\nPress Enter to continue...").await?;
        Ok(())
    }
}

fn show(question: &str) {
    print!("{}", question);
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(input: &'static str) -> Prompt<&'static [u8]> {
        Prompt::new(input.as_bytes())
    }

    #[tokio::test]
    async fn answers_are_trimmed_and_eof_is_none() {
        let mut p = prompt("  alice \n");
        assert_eq!(p.ask("name: ").await.unwrap().as_deref(), Some("alice"));
        assert_eq!(p.ask("name: ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn secrets_keep_spaces() {
        let mut p = prompt(" pass word \n");
        assert_eq!(
            p.ask_secret("password: ").await.unwrap().as_deref(),
            Some(" pass word ")
        );
    }

    #[tokio::test]
    async fn counts_fall_back_to_default() {
        let mut p = prompt("100\nlots\n\n");
        assert_eq!(p.ask_count("lines: ", 50).await.unwrap(), 100);
        assert_eq!(p.ask_count("lines: ", 50).await.unwrap(), 50);
        assert_eq!(p.ask_count("lines: ", 50).await.unwrap(), 50);
    }

    #[tokio::test]
    async fn confirm_only_on_y() {
        let mut p = prompt("Y\nyes\nn\n");
        assert!(p.confirm("? ").await.unwrap());
        assert!(!p.confirm("? ").await.unwrap());
        assert!(!p.confirm("? ").await.unwrap());
    }
}
