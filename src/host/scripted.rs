//! Host services driven by a script
//!
//! `ScriptedDialogs` answers prompts from pre-loaded queues and records what
//! was asked; `RecordingWorkbench` records opens and reveals instead of
//! launching anything. Both are used for headless runs and tests.

use super::{Dialogs, InputBoxOptions, Message, MessageLevel, OpenDialogOptions, Workbench};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An input box as it was presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub prompt: String,
    pub value: Option<String>,
    pub value_selection: Option<(usize, usize)>,
    /// Inline validation messages shown for rejected answers
    pub rejections: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ScriptedDialogs {
    folders: Mutex<VecDeque<Option<PathBuf>>>,
    inputs: Mutex<VecDeque<Option<String>>>,
    choices: Mutex<VecDeque<Option<String>>>,
    messages: Mutex<Vec<Message>>,
    input_records: Mutex<Vec<InputRecord>>,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer to the next folder picker; `None` cancels
    pub fn push_folder(&self, folder: Option<PathBuf>) -> &Self {
        lock(&self.folders).push_back(folder);
        self
    }

    /// Queue the answer to the next input box; `None` cancels
    pub fn push_input(&self, input: Option<&str>) -> &Self {
        lock(&self.inputs).push_back(input.map(str::to_string));
        self
    }

    /// Queue the item picked on the next message that offers items
    pub fn push_choice(&self, choice: Option<&str>) -> &Self {
        lock(&self.choices).push_back(choice.map(str::to_string));
        self
    }

    pub fn messages(&self) -> Vec<Message> {
        lock(&self.messages).clone()
    }

    pub fn messages_at(&self, level: MessageLevel) -> Vec<String> {
        lock(&self.messages)
            .iter()
            .filter(|message| message.level == level)
            .map(|message| message.text.clone())
            .collect()
    }

    pub fn input_records(&self) -> Vec<InputRecord> {
        lock(&self.input_records).clone()
    }

    /// Answers still queued, across all prompt kinds
    pub fn pending(&self) -> usize {
        lock(&self.folders).len() + lock(&self.inputs).len() + lock(&self.choices).len()
    }
}

#[async_trait]
impl Dialogs for ScriptedDialogs {
    async fn show_open_dialog(&self, options: &OpenDialogOptions) -> Option<Vec<PathBuf>> {
        tracing::debug!("Scripted open dialog: {}", options.open_label);
        lock(&self.folders).pop_front().flatten().map(|path| vec![path])
    }

    async fn show_input_box(&self, options: InputBoxOptions) -> Option<String> {
        let mut record = InputRecord {
            prompt: options.prompt.clone(),
            value: options.value.clone(),
            value_selection: options.value_selection,
            rejections: Vec::new(),
        };

        // Rejected answers are re-prompted with the next queued one
        let answer = loop {
            let Some(answer) = lock(&self.inputs).pop_front().flatten() else {
                break None;
            };
            match options.check(&answer) {
                Some(problem) => record.rejections.push(problem),
                None => break Some(answer),
            }
        };

        lock(&self.input_records).push(record);
        answer
    }

    async fn show_message(&self, message: Message) -> Option<String> {
        let choice = if message.items.is_empty() {
            None
        } else {
            lock(&self.choices)
                .pop_front()
                .flatten()
                .filter(|choice| message.items.contains(choice))
        };
        lock(&self.messages).push(message);
        choice
    }
}

/// Workbench that only records what it was asked to do
#[derive(Debug, Default)]
pub struct RecordingWorkbench {
    opened: Mutex<Vec<PathBuf>>,
    revealed: Mutex<Vec<PathBuf>>,
    external: Mutex<Vec<PathBuf>>,
    failure: Mutex<Option<io::ErrorKind>>,
}

impl RecordingWorkbench {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following request fail with `kind`
    pub fn fail_with(&self, kind: Option<io::ErrorKind>) {
        *lock(&self.failure) = kind;
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        lock(&self.opened).clone()
    }

    pub fn revealed(&self) -> Vec<PathBuf> {
        lock(&self.revealed).clone()
    }

    pub fn external(&self) -> Vec<PathBuf> {
        lock(&self.external).clone()
    }

    fn record(&self, list: &Mutex<Vec<PathBuf>>, path: &Path) -> io::Result<()> {
        if let Some(kind) = *lock(&self.failure) {
            return Err(io::Error::new(kind, format!("cannot open {}", path.display())));
        }
        lock(list).push(path.to_path_buf());
        Ok(())
    }
}

#[async_trait]
impl Workbench for RecordingWorkbench {
    async fn open_document(&self, path: &Path) -> io::Result<()> {
        self.record(&self.opened, path)
    }

    async fn reveal_in_os(&self, path: &Path) -> io::Result<()> {
        self.record(&self.revealed, path)
    }

    async fn open_external(&self, path: &Path) -> io::Result<()> {
        self.record(&self.external, path)
    }
}
