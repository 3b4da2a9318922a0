//! Test doubles for driving the migration without a network or terminal.

#![allow(dead_code)]

use quiz_uploader::api::QuestionStore;
use quiz_uploader::error::MigrateError;
use quiz_uploader::question::{Question, RemoteRecord};
use quiz_uploader::ui::{is_affirmative, Operator, Pause};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::time::Duration;

/// What a faked request should answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
    Ok,
    Status(u16),
    Transport,
}

impl Reply {
    fn into_result(self) -> Result<(), MigrateError> {
        match self {
            Reply::Ok => Ok(()),
            Reply::Status(status) => Err(MigrateError::HttpStatus {
                status,
                body: format!("{{\"error\":\"status {}\"}}", status),
            }),
            Reply::Transport => Err(MigrateError::Transport("connection refused".into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(Value),
    List,
    Delete(String),
}

/// In-memory collection. Creates assign string ids the way MockAPI does.
#[derive(Default)]
pub struct MemoryStore {
    records: RefCell<Vec<RemoteRecord>>,
    next_id: RefCell<u64>,
    create_replies: RefCell<VecDeque<Reply>>,
    list_replies: RefCell<VecDeque<Reply>>,
    delete_replies: RefCell<HashMap<String, Reply>>,
    calls: RefCell<Vec<Call>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the collection; each value is stored as listed by the service.
    pub fn with_records(self, records: Vec<Value>) -> Self {
        {
            let mut stored = self.records.borrow_mut();
            for value in records {
                stored.push(serde_json::from_value(value).unwrap());
            }
        }
        *self.next_id.borrow_mut() = 100;
        self
    }

    /// Replies for the next creates, in order; later creates succeed.
    pub fn with_create_replies(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.create_replies.borrow_mut().extend(replies);
        self
    }

    /// Replies for the next list calls, in order; later lists succeed.
    pub fn with_list_replies(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.list_replies.borrow_mut().extend(replies);
        self
    }

    pub fn with_delete_reply(self, id: &str, reply: Reply) -> Self {
        self.delete_replies.borrow_mut().insert(id.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn creates(&self) -> usize {
        self.count(|c| matches!(c, Call::Create(_)))
    }

    pub fn deletes(&self) -> usize {
        self.count(|c| matches!(c, Call::Delete(_)))
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }
}

impl QuestionStore for MemoryStore {
    fn create(&self, question: &Question) -> Result<(), MigrateError> {
        let body = serde_json::to_value(question).unwrap();
        self.calls.borrow_mut().push(Call::Create(body.clone()));
        let reply = self.create_replies.borrow_mut().pop_front().unwrap_or(Reply::Ok);
        reply.into_result()?;

        let mut next_id = self.next_id.borrow_mut();
        *next_id += 1;
        let mut record: RemoteRecord = serde_json::from_value(body).unwrap();
        record.id = Some(json!(next_id.to_string()));
        self.records.borrow_mut().push(record);
        Ok(())
    }

    fn list(&self) -> Result<Vec<RemoteRecord>, MigrateError> {
        self.calls.borrow_mut().push(Call::List);
        let reply = self.list_replies.borrow_mut().pop_front().unwrap_or(Reply::Ok);
        reply.into_result()?;
        Ok(self.records.borrow().clone())
    }

    fn delete(&self, id: &str) -> Result<(), MigrateError> {
        self.calls.borrow_mut().push(Call::Delete(id.to_string()));
        let reply = self
            .delete_replies
            .borrow()
            .get(id)
            .copied()
            .unwrap_or(Reply::Ok);
        reply.into_result()?;
        self.records
            .borrow_mut()
            .retain(|r| r.id_segment().as_deref() != Some(id));
        Ok(())
    }
}

/// Scripted answer that behaves like Ctrl-C pressed inside the prompt.
pub const CTRL_C: &str = "^C";

/// Answers prompts from a script and remembers what it was asked.
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedOperator {
    pub fn answering(answers: &[&str]) -> Self {
        ScriptedOperator {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            prompts: Vec::new(),
        }
    }
}

impl Operator for ScriptedOperator {
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        self.prompts.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(answer) if answer == CTRL_C => Err(std::io::Error::new(
                std::io::ErrorKind::Interrupted,
                "read interrupted",
            )
            .into()),
            Some(answer) => Ok(is_affirmative(&answer)),
            None => anyhow::bail!("unexpected prompt: {}", prompt),
        }
    }
}

/// Records requested pauses instead of sleeping.
#[derive(Default)]
pub struct RecordingPause {
    pub pauses: Vec<Duration>,
}

impl Pause for RecordingPause {
    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

pub fn question(stage: Value, number: u64) -> Question {
    serde_json::from_value(json!({
        "stage": stage,
        "questionNumber": number,
        "question": format!("Question {}?", number),
        "options": ["A", "B", "C", "D"],
        "answer": "A",
    }))
    .unwrap()
}

/// Write `records` as a template file and keep it alive for the test.
pub fn template_file(records: &Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(records.to_string().as_bytes()).unwrap();
    file
}
