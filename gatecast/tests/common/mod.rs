#![allow(dead_code)]

use gatecast::{BoxError, Dispatcher, HandlerError};
use std::sync::{Arc, Mutex};

// ============================================================================
// Test State
// ============================================================================

/// The state handle used by every test dispatcher.
#[derive(Clone, Debug, Default)]
pub struct Bot {
    pub name: &'static str,
}

// ============================================================================
// Reports
// ============================================================================

/// Collects what reached the error and panic handlers.
#[derive(Clone, Default)]
pub struct Reports {
    pub errors: Arc<Mutex<Vec<String>>>,
    pub panics: Arc<Mutex<Vec<String>>>,
}

impl Reports {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn panics(&self) -> Vec<String> {
        self.panics.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.errors().is_empty() && self.panics().is_empty()
    }
}

/// A dispatcher whose error and panic handlers feed the returned reports.
pub fn dispatcher() -> (Dispatcher<Bot>, Reports) {
    let reports = Reports::default();
    let errors = reports.errors.clone();
    let panics = reports.panics.clone();

    let dispatcher = Dispatcher::builder(Bot { name: "test" })
        .error_handler(move |err: BoxError| errors.lock().unwrap().push(err.to_string()))
        .panic_handler(move |payload| {
            let HandlerError::Panic(msg) = HandlerError::from_panic(&payload) else {
                unreachable!("from_panic always yields a panic error");
            };
            panics.lock().unwrap().push(msg);
        })
        .build();

    (dispatcher, reports)
}
