//! In-memory fakes of the ports, shared by the use case tests.

use crate::ports::decision_engine::DecisionEngine;
use crate::ports::operator::{OperatorConsole, OperatorError};
use crate::ports::responder::{Responder, ResponderError, ResponseRequest};
use crate::ports::transport::{Subscription, Transport, TransportError};
use async_trait::async_trait;
use noa_domain::{Decision, DecisionError, DecisionRequest, Message, decode, encode};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, mpsc};

/// Transport that records publishes and lets the test inject deliveries.
pub struct RecordingTransport {
    published: Mutex<Vec<Vec<u8>>>,
    incoming: Mutex<Option<mpsc::Receiver<Vec<u8>>>>,
    publish_notify: Notify,
    fail_publish: bool,
}

impl RecordingTransport {
    pub fn new() -> (Self, mpsc::Sender<Vec<u8>>) {
        let (tx, rx) = mpsc::channel(64);
        let transport = Self {
            published: Mutex::new(Vec::new()),
            incoming: Mutex::new(Some(rx)),
            publish_notify: Notify::new(),
            fail_publish: false,
        };
        (transport, tx)
    }

    pub fn failing() -> (Self, mpsc::Sender<Vec<u8>>) {
        let (mut transport, tx) = Self::new();
        transport.fail_publish = true;
        (transport, tx)
    }

    pub fn published(&self) -> Vec<Message> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|p| decode(p).unwrap())
            .collect()
    }

    /// Wait until at least `count` messages have been published.
    pub async fn wait_for_publishes(&self, count: usize) -> Vec<Message> {
        loop {
            let notified = self.publish_notify.notified();
            let published = self.published();
            if published.len() >= count {
                return published;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn initialize(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn publish(&self, payload: Vec<u8>) -> Result<(), TransportError> {
        if self.fail_publish {
            return Err(TransportError::Closed);
        }
        self.published.lock().unwrap().push(payload);
        self.publish_notify.notify_waiters();
        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription, TransportError> {
        let rx = self
            .incoming
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| TransportError::Protocol("already subscribed".to_string()))?;
        Ok(Subscription::new(rx))
    }
}

/// Decision engine that replays scripted outcomes and tracks concurrency.
pub struct ScriptedEngine {
    script: Mutex<VecDeque<Result<Decision, DecisionError>>>,
    requests: Mutex<Vec<DecisionRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
}

impl ScriptedEngine {
    pub fn new(script: Vec<Result<Decision, DecisionError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Engine that fails every invocation.
    pub fn always_failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<DecisionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DecisionEngine for ScriptedEngine {
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, DecisionError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DecisionError::new("Invalid JSON output: expected value")));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

/// Responder that answers with a fixed text, or fails.
pub struct FixedResponder {
    answer: Option<String>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl FixedResponder {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// History passed on each call.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Responder for FixedResponder {
    async fn respond(&self, request: &ResponseRequest<'_>) -> Result<String, ResponderError> {
        self.calls.lock().unwrap().push(request.history.to_vec());
        self.answer
            .clone()
            .ok_or_else(|| ResponderError::Generation("model unavailable".to_string()))
    }
}

/// Operator that types scripted lines and records what it was shown.
pub struct ScriptedOperator {
    lines: tokio::sync::Mutex<VecDeque<String>>,
    shown: Mutex<Vec<Message>>,
    reads: AtomicUsize,
    read_notify: Notify,
}

impl ScriptedOperator {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: tokio::sync::Mutex::new(lines.iter().map(|l| l.to_string()).collect()),
            shown: Mutex::new(Vec::new()),
            reads: AtomicUsize::new(0),
            read_notify: Notify::new(),
        }
    }

    pub fn shown(&self) -> Vec<Message> {
        self.shown.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Wait until the operator has been prompted at least `count` times.
    pub async fn wait_for_reads(&self, count: usize) {
        loop {
            let notified = self.read_notify.notified();
            if self.reads() >= count {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl OperatorConsole for ScriptedOperator {
    async fn read_line(&self) -> Result<Option<String>, OperatorError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.read_notify.notify_waiters();
        Ok(self.lines.lock().await.pop_front())
    }

    fn show(&self, message: &Message) {
        self.shown.lock().unwrap().push(message.clone());
    }
}

pub fn payload(message: &Message) -> Vec<u8> {
    encode(message)
}
