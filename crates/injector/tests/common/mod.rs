//! Общие test fixtures для integration тестов

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use injector::Initializable;

/// Включить tracing вывод в тестах (`RUST_LOG=injector=debug`)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueGreeter {
    pub greeting: String,
}

impl Initializable for ValueGreeter {
    fn init(&mut self) {
        self.greeting = "value provided inside ValueGreeter".to_string();
    }
}

impl Greeter for ValueGreeter {
    fn greet(&self) -> String {
        self.greeting.clone()
    }
}

injector::initializable!(ValueGreeter);
injector::implements!(ValueGreeter => dyn Greeter);

#[derive(Debug, Default)]
pub struct ReferenceGreeter {
    pub greeting: String,
}

impl Initializable for ReferenceGreeter {
    fn init(&mut self) {
        self.greeting = "value provided inside ReferenceGreeter".to_string();
    }
}

impl Greeter for ReferenceGreeter {
    fn greet(&self) -> String {
        self.greeting.clone()
    }
}

injector::initializable!(ReferenceGreeter);
injector::implements!(ReferenceGreeter => dyn Greeter);

#[derive(Debug)]
pub struct FixedGreeter(pub String);

impl Greeter for FixedGreeter {
    fn greet(&self) -> String {
        self.0.clone()
    }
}

/// Сколько раз вызывался init у [`CountingGreeter`]
pub static INIT_CALLS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Default)]
pub struct CountingGreeter {
    pub call: usize,
}

impl Initializable for CountingGreeter {
    fn init(&mut self) {
        self.call = INIT_CALLS.fetch_add(1, Ordering::SeqCst) + 1;
    }
}

impl Greeter for CountingGreeter {
    fn greet(&self) -> String {
        format!("call {}", self.call)
    }
}

injector::initializable!(CountingGreeter);
injector::implements!(CountingGreeter => dyn Greeter);

pub fn reset_init_calls() {
    INIT_CALLS.store(0, Ordering::SeqCst);
}

pub fn init_calls() -> usize {
    INIT_CALLS.load(Ordering::SeqCst)
}

pub fn fixed(text: &str) -> Arc<dyn Greeter> {
    Arc::new(FixedGreeter(text.to_string()))
}
