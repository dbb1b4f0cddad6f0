use crate::core::{Confirmation, CredentialProvider};
use crate::utils::error::Result;
use std::io::{self, BufRead, Cursor, IsTerminal, Stdin, Write};
use std::sync::Mutex;

/// Where prompt answers come from. Stdin keeps its own buffer, so several prompts
/// can read from it in turn without losing piped input.
pub trait LineReader: Send {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;

    /// Reads an answer that must not be echoed back.
    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut answer = String::new();
        self.read_line(&mut answer)?;
        Ok(answer)
    }
}

impl LineReader for Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        Stdin::read_line(self, buf)
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        if self.is_terminal() {
            rpassword::prompt_password(prompt)
        } else {
            // piped input has nothing to echo
            let mut answer = String::new();
            Stdin::read_line(self, &mut answer)?;
            Ok(answer)
        }
    }
}

impl<T: AsRef<[u8]> + Send> LineReader for Cursor<T> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// Asks a question on stdout and reads one line of answer.
pub struct ConsolePrompt<R: LineReader> {
    input: Mutex<R>,
}

impl ConsolePrompt<Stdin> {
    pub fn stdin() -> Self {
        Self::new(io::stdin())
    }
}

impl<R: LineReader> ConsolePrompt<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }

    fn lock_input(&self) -> Result<std::sync::MutexGuard<'_, R>> {
        Ok(self
            .input
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "console input poisoned"))?)
    }

    pub fn ask(&self, question: &str) -> Result<String> {
        print!("{}", question);
        io::stdout().flush()?;

        let mut answer = String::new();
        self.lock_input()?.read_line(&mut answer)?;
        Ok(answer.trim().to_string())
    }

    /// Like [`ask`](Self::ask) but without echoing what is typed on a terminal.
    pub fn ask_secret(&self, question: &str) -> Result<String> {
        let answer = self.lock_input()?.read_secret(question)?;
        Ok(answer.trim().to_string())
    }
}

impl<R: LineReader> Confirmation for ConsolePrompt<R> {
    fn confirm(&self, question: &str) -> Result<bool> {
        Ok(self.ask(question)?.eq_ignore_ascii_case("y"))
    }
}

/// Confirmation for unattended runs (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&self, question: &str) -> Result<bool> {
        tracing::info!("{}y (assumed)", question);
        Ok(true)
    }
}

/// Reads the access token interactively.
pub struct PromptToken<R: LineReader> {
    prompt: ConsolePrompt<R>,
}

impl PromptToken<Stdin> {
    pub fn stdin() -> Self {
        Self {
            prompt: ConsolePrompt::stdin(),
        }
    }
}

impl<R: LineReader> PromptToken<R> {
    pub fn new(input: R) -> Self {
        Self {
            prompt: ConsolePrompt::new(input),
        }
    }
}

impl<R: LineReader> CredentialProvider for PromptToken<R> {
    fn access_token(&self) -> Result<Option<String>> {
        let token = self
            .prompt
            .ask_secret("Please provide your Hubspot API key and press Enter: ")?;
        Ok(Some(token).filter(|token| !token.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_y_confirms() {
        assert!(ConsolePrompt::new(Cursor::new("y\n")).confirm("go? ").unwrap());
        assert!(ConsolePrompt::new(Cursor::new(" Y \n")).confirm("go? ").unwrap());
        assert!(!ConsolePrompt::new(Cursor::new("yes\n")).confirm("go? ").unwrap());
        assert!(!ConsolePrompt::new(Cursor::new("n\n")).confirm("go? ").unwrap());
        assert!(!ConsolePrompt::new(Cursor::new("")).confirm("go? ").unwrap());
    }

    #[test]
    fn prompted_token_is_trimmed_and_empty_means_none() {
        let token = PromptToken::new(Cursor::new("  pat-abc  \n")).access_token().unwrap();
        assert_eq!(token.as_deref(), Some("pat-abc"));

        let none = PromptToken::new(Cursor::new("\n")).access_token().unwrap();
        assert!(none.is_none());
    }

    /// Fails the test if the plain, echoing read path is used.
    struct SecretOnly(Cursor<&'static str>);

    impl LineReader for SecretOnly {
        fn read_line(&mut self, _buf: &mut String) -> io::Result<usize> {
            panic!("token must be read through read_secret");
        }

        fn read_secret(&mut self, _prompt: &str) -> io::Result<String> {
            let mut answer = String::new();
            BufRead::read_line(&mut self.0, &mut answer)?;
            Ok(answer)
        }
    }

    #[test]
    fn token_prompt_reads_through_secret_path() {
        let token = PromptToken::new(SecretOnly(Cursor::new("pat-hidden\n")))
            .access_token()
            .unwrap();
        assert_eq!(token.as_deref(), Some("pat-hidden"));
    }

    #[test]
    fn assume_yes_always_confirms() {
        assert!(AssumeYes.confirm("go? ").unwrap());
    }
}
