//! Toolkit independent form models.
//!
//! A form owns its raw text inputs and its local feedback. Submitting runs in
//! three steps: `prepare` validates locally and builds the request (no network
//! traffic on failure), `execute` calls the store, and `finish` turns the
//! outcome into feedback, resetting the inputs on success.

use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::api::RequestError;

pub mod nodes;
pub mod relationships;
pub mod values;

pub use values::ValuePolicy;

/// Success and error text shown under a form. Both can be set at once when
/// a bulk call partially fails.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Feedback {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl Feedback {
    pub fn clear(&mut self) {
        self.message = None;
        self.error = None;
    }

    pub fn success(&mut self, msg: impl Into<String>) { self.message = Some(msg.into()); }

    pub fn fail(&mut self, msg: impl Into<String>) { self.error = Some(msg.into()); }

    /// Per-item failures reported next to a successful bulk call.
    pub fn partial_errors(&mut self, errors: &[String]) {
        if !errors.is_empty() {
            self.error = Some(errors.join(" ; "));
        }
    }
}

pub trait SubmitForm {
    type Store: Clone + Send + 'static;
    type Request: Send + 'static;
    type Response: Send + 'static;

    fn feedback(&self) -> &Feedback;
    fn feedback_mut(&mut self) -> &mut Feedback;

    /// Local validation. The error string is shown as-is.
    fn prepare(&self) -> Result<Self::Request, String>;

    fn execute(store: &Self::Store, request: Self::Request) -> Result<Self::Response, RequestError>;

    /// Builds the confirmation message and resets the inputs.
    fn on_success(&mut self, response: Self::Response);

    fn on_failure(&mut self, error: RequestError) { self.feedback_mut().fail(error.message()); }

    fn finish(&mut self, outcome: Result<Self::Response, RequestError>) {
        match outcome {
            Ok(resp) => self.on_success(resp),
            Err(e) => self.on_failure(e),
        }
    }

    /// Validates and, if valid, calls the store on the current thread.
    /// Returns false when validation stopped the call.
    fn submit(&mut self, store: &Self::Store) -> bool {
        self.feedback_mut().clear();
        match self.prepare() {
            Ok(req) => {
                let outcome = Self::execute(store, req);
                self.finish(outcome);
                true
            }
            Err(msg) => {
                self.feedback_mut().fail(msg);
                false
            }
        }
    }
}

/// A form plus its in-flight request. The call runs on a worker thread and
/// the outcome is collected by `poll`.
pub struct Submission<F: SubmitForm> {
    pub form: F,
    pending: Option<Receiver<Result<F::Response, RequestError>>>,
}

impl<F: SubmitForm> Submission<F> {
    pub fn new(form: F) -> Self { Self { form, pending: None } }

    pub fn in_flight(&self) -> bool { self.pending.is_some() }

    /// Starts a submission. `notify` runs on the worker once the outcome is
    /// ready (the GUI uses it to request a repaint).
    pub fn start<N>(&mut self, store: &F::Store, notify: N) -> bool
    where
        N: FnOnce() + Send + 'static,
    {
        self.form.feedback_mut().clear();
        let request = match self.form.prepare() {
            Ok(r) => r,
            Err(msg) => {
                self.form.feedback_mut().fail(msg);
                return false;
            }
        };
        let (tx, rx) = mpsc::channel();
        let store = store.clone();
        std::thread::spawn(move || {
            // The receiver may be gone if the window closed meanwhile
            let _ = tx.send(F::execute(&store, request));
            notify();
        });
        self.pending = Some(rx);
        true
    }

    /// Applies a finished outcome, if any. Returns true when one was applied.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.pending else { return false };
        match rx.try_recv() {
            Ok(outcome) => {
                self.pending = None;
                self.form.finish(outcome);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.form.feedback_mut().fail("request worker stopped before answering");
                true
            }
        }
    }

    /// Blocks until the pending outcome arrives and applies it.
    pub fn wait(&mut self) {
        if let Some(rx) = self.pending.take() {
            match rx.recv() {
                Ok(outcome) => self.form.finish(outcome),
                Err(_) => self.form.feedback_mut().fail("request worker stopped before answering"),
            }
        }
    }
}
