//! Line-oriented dialogs for the command line
//!
//! Prompts are written to the output and answered one line at a time. End of
//! input cancels every prompt.

use super::{Dialogs, InputBoxOptions, Message, MessageLevel, OpenDialogOptions};
use crate::primitives::path_utils::absolutize;
use async_trait::async_trait;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

pub struct TerminalDialogs<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl TerminalDialogs<io::BufReader<io::Stdin>, io::Stderr> {
    /// Prompts on stderr so stdout stays clean for command output
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead + Send, W: Write + Send> TerminalDialogs<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    pub fn into_output(self) -> W {
        self.output
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, text: &str) {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = write!(output, "{text}").and_then(|_| output.flush()) {
            tracing::warn!("Failed to write prompt: {}", e);
        }
    }

    /// Next line without its line ending, `None` at end of input
    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        let read = self
            .input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .read_line(&mut line);
        match read {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
            Err(e) => {
                tracing::warn!("Failed to read answer: {}", e);
                None
            }
        }
    }
}

fn level_tag(level: MessageLevel) -> &'static str {
    match level {
        MessageLevel::Info => "info",
        MessageLevel::Warning => "warning",
        MessageLevel::Error => "error",
    }
}

/// Match an answer against the offered items, by number or by name
fn pick_item(items: &[String], answer: &str) -> Option<String> {
    let answer = answer.trim();
    if let Ok(index) = answer.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| items.get(i)).cloned();
    }
    items
        .iter()
        .find(|item| item.eq_ignore_ascii_case(answer))
        .cloned()
}

#[async_trait]
impl<R: BufRead + Send, W: Write + Send> Dialogs for TerminalDialogs<R, W> {
    async fn show_open_dialog(&self, options: &OpenDialogOptions) -> Option<Vec<PathBuf>> {
        self.write(&format!("{}: ", options.open_label));
        let answer = self.read_line()?;
        let answer = answer.trim();
        if answer.is_empty() {
            return None;
        }
        Some(vec![absolutize(answer)])
    }

    async fn show_input_box(&self, options: InputBoxOptions) -> Option<String> {
        let mut prompt = options.prompt.clone();
        match (&options.value, &options.placeholder) {
            (Some(value), _) => prompt.push_str(&format!(" [{value}]")),
            (None, Some(placeholder)) => prompt.push_str(&format!(" (e.g. {placeholder})")),
            (None, None) => {}
        }
        prompt.push_str(": ");

        loop {
            self.write(&prompt);
            let mut answer = self.read_line()?;
            if answer.is_empty() {
                match &options.value {
                    Some(value) => answer = value.clone(),
                    None => return None,
                }
            }

            match options.check(&answer) {
                Some(problem) => self.write(&format!("  {problem}\n")),
                None => return Some(answer),
            }
        }
    }

    async fn show_message(&self, message: Message) -> Option<String> {
        self.write(&format!("[{}] {}\n", level_tag(message.level), message.text));
        if message.items.is_empty() {
            return None;
        }

        let choices: Vec<String> = message
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}) {}", i + 1, item))
            .collect();
        self.write(&format!("{}: ", choices.join("  ")));

        let answer = self.read_line()?;
        pick_item(&message.items, &answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn dialogs(input: &str) -> TerminalDialogs<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalDialogs::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[tokio::test]
    async fn test_input_box_reprompts_until_valid() {
        let dialogs = dialogs("bad\ngood\n");
        let options = InputBoxOptions::new("Enter file name")
            .validate(|value| (value == "bad").then(|| "Name is bad".to_string()));

        assert_eq!(dialogs.show_input_box(options).await, Some("good".to_string()));
        let output = String::from_utf8(dialogs.into_output()).unwrap();
        assert!(output.contains("Name is bad"));
        assert_eq!(output.matches("Enter file name").count(), 2);
    }

    #[tokio::test]
    async fn test_input_box_empty_line_uses_prefilled_value() {
        let dialogs = dialogs("\n");
        let options = InputBoxOptions::new("Enter new name").value("notes.md", (0, 5));
        assert_eq!(
            dialogs.show_input_box(options).await,
            Some("notes.md".to_string())
        );
    }

    #[tokio::test]
    async fn test_input_box_cancelled_by_empty_line_or_eof() {
        assert_eq!(
            dialogs("\n")
                .show_input_box(InputBoxOptions::new("Enter file name"))
                .await,
            None
        );
        assert_eq!(
            dialogs("")
                .show_input_box(InputBoxOptions::new("Enter file name"))
                .await,
            None
        );
    }

    #[tokio::test]
    async fn test_message_items_by_number_or_name() {
        let message = Message::new(MessageLevel::Warning, "Delete?")
            .modal()
            .with_items(["Delete", "Cancel"]);

        assert_eq!(
            dialogs("1\n").show_message(message.clone()).await,
            Some("Delete".to_string())
        );
        assert_eq!(
            dialogs("cancel\n").show_message(message.clone()).await,
            Some("Cancel".to_string())
        );
        assert_eq!(dialogs("7\n").show_message(message).await, None);
    }

    #[tokio::test]
    async fn test_plain_message_does_not_read_input() {
        let dialogs = dialogs("unused\n");
        let result = dialogs
            .show_message(Message::new(MessageLevel::Error, "Failed"))
            .await;

        assert_eq!(result, None);
        let output = String::from_utf8(dialogs.into_output()).unwrap();
        assert_eq!(output, "[error] Failed\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_open_dialog_absolutizes_answer() {
        let options = OpenDialogOptions {
            can_select_files: false,
            can_select_folders: true,
            can_select_many: false,
            open_label: "Add Folder".to_string(),
        };
        let picked = dialogs("/tmp/notes/\n").show_open_dialog(&options).await;
        assert_eq!(picked, Some(vec![PathBuf::from("/tmp/notes")]));
        assert_eq!(dialogs("\n").show_open_dialog(&options).await, None);
    }
}
