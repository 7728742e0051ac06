//! Terminal operator console

use crate::output::console::ConsoleFormatter;
use crate::output::formatter::OutputFormatter;
use async_trait::async_trait;
use noa_application::{OperatorConsole, OperatorError};
use noa_domain::Message;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Reads operator lines from stdin and prints messages to stdout
pub struct ConsoleOperator {
    formatter: ConsoleFormatter,
    input: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleOperator {
    pub fn new(formatter: ConsoleFormatter) -> Self {
        Self {
            formatter,
            input: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Print the startup banner.
    pub fn welcome(&self) {
        println!("{}", self.formatter.format_welcome());
    }
}

#[async_trait]
impl OperatorConsole for ConsoleOperator {
    async fn read_line(&self) -> Result<Option<String>, OperatorError> {
        let mut input = self.input.lock().await;

        let mut stdout = std::io::stdout();
        write!(stdout, "{}", self.formatter.format_prompt())?;
        stdout.flush()?;

        Ok(input.next_line().await?)
    }

    fn show(&self, message: &Message) {
        println!("{}", self.formatter.format_message(message));
    }
}
