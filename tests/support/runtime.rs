//! Tokio runtime and Wiremock helpers shared by the behavioural tests.

use std::cell::RefCell;
use std::rc::Rc;

use prdigest::DigestError;
use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// Runtime wrapper that can be stored in an `rstest-bdd` Slot.
#[derive(Clone)]
pub struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    /// Drives `future` to completion on the shared runtime.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// Ensures a Tokio runtime and Wiremock server are initialised.
///
/// # Errors
///
/// Returns [`DigestError::Io`] if the runtime cannot be created.
pub fn ensure_runtime_and_server(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
) -> Result<SharedRuntime, DigestError> {
    if runtime.with_ref(|_| ()).is_none() {
        let created = Runtime::new()
            .map_err(|error| DigestError::io("create Tokio runtime", &error))?;
        runtime.set(SharedRuntime::new(created));
    }

    let shared_runtime = runtime.get().ok_or_else(|| DigestError::Api {
        message: "runtime not initialised after set".to_owned(),
    })?;

    if server.with_ref(|_| ()).is_none() {
        server.set(shared_runtime.block_on(MockServer::start()));
    }

    Ok(shared_runtime)
}

/// Mounts `mock` on the stored server.
///
/// # Errors
///
/// Returns [`DigestError::Api`] when the server has not been started.
pub fn mount(
    runtime: &SharedRuntime,
    server: &Slot<MockServer>,
    mock: Mock,
) -> Result<(), DigestError> {
    server
        .with_ref(|started| runtime.block_on(mock.mount(started)))
        .ok_or_else(|| DigestError::Api {
            message: "mock server not initialised".to_owned(),
        })
}
