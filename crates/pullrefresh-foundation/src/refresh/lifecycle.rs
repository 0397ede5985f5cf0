//! Refresh lifecycle: runs the host's refresh operation and guarantees the
//! completion hook fires exactly once, on the UI thread.
//!
//! The operation receives a [`RefreshCompletion`]. Completing it, or simply
//! dropping it (an early return, a panic unwinding through a worker, a
//! cancelled task), reports back. Completion is always queued onto the
//! runtime's local task queue, never invoked re-entrantly from `start`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use pullrefresh_core::{RuntimeHandle, UiDispatcher};

/// How long the demo refresh pretends to work.
pub const SIMULATED_REFRESH_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// The operation reported a failure.
    Failed(String),
    /// The completion handle was dropped without reporting a result.
    Abandoned,
}

impl fmt::Display for RefreshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshError::Failed(reason) => write!(f, "refresh failed: {reason}"),
            RefreshError::Abandoned => write!(f, "refresh ended without reporting a result"),
        }
    }
}

impl std::error::Error for RefreshError {}

pub type RefreshResult = Result<(), RefreshError>;

type CompletionHook = Box<dyn FnOnce(RefreshResult) + 'static>;

/// One-shot completion handle for a running refresh.
pub struct RefreshCompletion {
    runtime: RuntimeHandle,
    hook: Option<CompletionHook>,
}

impl RefreshCompletion {
    fn new(runtime: RuntimeHandle, hook: CompletionHook) -> Self {
        Self {
            runtime,
            hook: Some(hook),
        }
    }

    pub fn runtime(&self) -> &RuntimeHandle {
        &self.runtime
    }

    pub fn succeed(self) {
        self.complete(Ok(()));
    }

    pub fn fail(self, reason: impl Into<String>) {
        self.complete(Err(RefreshError::Failed(reason.into())));
    }

    pub fn complete(mut self, result: RefreshResult) {
        self.deliver(result);
    }

    /// Converts into a `Send` handle for work running on another thread.
    ///
    /// The result travels back through the runtime's dispatcher and is
    /// delivered when the UI thread next drains its queue.
    pub fn into_send(mut self) -> SendCompletion {
        let hook = self.hook.take();
        let Some(hook) = hook else {
            return SendCompletion::detached(self.runtime.dispatcher());
        };
        let runtime = self.runtime.clone();
        let continuation = {
            let runtime = runtime.clone();
            move |result: RefreshResult| {
                RefreshCompletion::new(runtime, hook).complete(result);
            }
        };
        match runtime.register_ui_cont(continuation) {
            Some(id) => SendCompletion {
                dispatcher: runtime.dispatcher(),
                id: Some(id),
            },
            None => {
                log::debug!("runtime gone before background refresh started");
                SendCompletion::detached(runtime.dispatcher())
            }
        }
    }

    fn deliver(&mut self, result: RefreshResult) {
        if let Some(hook) = self.hook.take() {
            self.runtime
                .enqueue_ui_task(Box::new(move || hook(result)));
        }
    }
}

impl Drop for RefreshCompletion {
    fn drop(&mut self) {
        self.deliver(Err(RefreshError::Abandoned));
    }
}

/// Thread-safe completion handle produced by [`RefreshCompletion::into_send`].
pub struct SendCompletion {
    dispatcher: UiDispatcher,
    id: Option<u64>,
}

impl SendCompletion {
    fn detached(dispatcher: UiDispatcher) -> Self {
        Self {
            dispatcher,
            id: None,
        }
    }

    pub fn succeed(self) {
        self.complete(Ok(()));
    }

    pub fn fail(self, reason: impl Into<String>) {
        self.complete(Err(RefreshError::Failed(reason.into())));
    }

    pub fn complete(mut self, result: RefreshResult) {
        self.deliver(result);
    }

    fn deliver(&mut self, result: RefreshResult) {
        if let Some(id) = self.id.take() {
            self.dispatcher.post_invoke(id, result);
        }
    }
}

impl Drop for SendCompletion {
    fn drop(&mut self) {
        self.deliver(Err(RefreshError::Abandoned));
    }
}

/// The host's refresh work.
///
/// `perform` is called on the UI thread once per refresh and must not block.
/// Report through `completion`, now or later, from any thread via
/// [`RefreshCompletion::into_send`].
pub trait RefreshOperation {
    fn perform(&mut self, completion: RefreshCompletion);
}

impl<F> RefreshOperation for F
where
    F: FnMut(RefreshCompletion),
{
    fn perform(&mut self, completion: RefreshCompletion) {
        self(completion)
    }
}

/// Waits a fixed interval of frame time, then succeeds. Touches no data.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedRefresh {
    delay: Duration,
}

impl SimulatedRefresh {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedRefresh {
    fn default() -> Self {
        Self::new(SIMULATED_REFRESH_DELAY)
    }
}

impl RefreshOperation for SimulatedRefresh {
    fn perform(&mut self, completion: RefreshCompletion) {
        let runtime = completion.runtime().clone();
        let scheduled = runtime.post_delayed(self.delay, move || completion.succeed());
        if scheduled.is_none() {
            log::debug!("runtime gone; simulated refresh abandoned");
        }
    }
}

/// Runs a blocking closure on a worker thread per refresh.
pub struct ThreadedRefresh {
    work: Arc<dyn Fn() -> RefreshResult + Send + Sync + 'static>,
    name: String,
}

impl ThreadedRefresh {
    pub fn new(work: impl Fn() -> RefreshResult + Send + Sync + 'static) -> Self {
        Self {
            work: Arc::new(work),
            name: "refresh-worker".to_string(),
        }
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl RefreshOperation for ThreadedRefresh {
    fn perform(&mut self, completion: RefreshCompletion) {
        let completion = completion.into_send();
        let work = Arc::clone(&self.work);
        let spawned = std::thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || {
                // A panic in `work` drops `completion`, which reports Abandoned.
                let result = work();
                completion.complete(result);
            });
        if let Err(err) = spawned {
            // The closure (and the completion inside it) is dropped with the
            // error, so the refresh still ends.
            log::warn!("could not spawn refresh worker: {err}");
        }
    }
}

/// Runs a future on the UI thread per refresh.
pub struct AsyncRefresh<F> {
    make_future: F,
}

impl<F, Fut> AsyncRefresh<F>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = RefreshResult> + 'static,
{
    pub fn new(make_future: F) -> Self {
        Self { make_future }
    }
}

impl<F, Fut> RefreshOperation for AsyncRefresh<F>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = RefreshResult> + 'static,
{
    fn perform(&mut self, completion: RefreshCompletion) {
        let runtime = completion.runtime().clone();
        let future = (self.make_future)();
        let task = runtime.spawn_ui(async move {
            let result = future.await;
            completion.complete(result);
        });
        if task.is_none() {
            log::debug!("runtime gone; async refresh abandoned");
        }
    }
}

/// Wraps the host's refresh operation for the state machine.
pub struct RefreshLifecycle {
    runtime: RuntimeHandle,
    operation: RefCell<Box<dyn RefreshOperation>>,
    in_flight: Rc<Cell<bool>>,
    started: Cell<u64>,
    last_result: Rc<RefCell<Option<RefreshResult>>>,
}

impl RefreshLifecycle {
    pub fn new(operation: impl RefreshOperation + 'static, runtime: RuntimeHandle) -> Self {
        Self {
            runtime,
            operation: RefCell::new(Box::new(operation)),
            in_flight: Rc::new(Cell::new(false)),
            started: Cell::new(0),
            last_result: Rc::new(RefCell::new(None)),
        }
    }

    /// Starts the operation; `on_complete` runs exactly once after it ends,
    /// successful or not.
    pub fn start(&self, on_complete: impl FnOnce() + 'static) {
        self.in_flight.set(true);
        self.started.set(self.started.get() + 1);
        let in_flight = Rc::clone(&self.in_flight);
        let last_result = Rc::clone(&self.last_result);
        let hook: CompletionHook = Box::new(move |result: RefreshResult| {
            match &result {
                Ok(()) => log::debug!("refresh operation finished"),
                Err(err) => log::warn!("{err}; returning to idle"),
            }
            in_flight.set(false);
            *last_result.borrow_mut() = Some(result);
            on_complete();
        });
        let completion = RefreshCompletion::new(self.runtime.clone(), hook);

        match self.operation.try_borrow_mut() {
            Ok(mut operation) => operation.perform(completion),
            // Only reachable if `perform` itself starts another refresh; the
            // dropped completion still reports.
            Err(_) => log::warn!("refresh operation re-entered; abandoning nested start"),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Number of times the operation was started.
    pub fn started_count(&self) -> u64 {
        self.started.get()
    }

    pub fn last_result(&self) -> Option<RefreshResult> {
        self.last_result.borrow().clone()
    }
}

#[cfg(test)]
#[path = "tests/lifecycle_tests.rs"]
mod tests;
