//! AsyncResource - supersession-safe controller around one producer.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch};

use super::{DataChanged, Invocation, ResourceState, Settlement};
use crate::error::ErrorInfo;

type ProducerFuture<T> = Pin<Box<dyn Future<Output = Result<T, ErrorInfo>> + Send>>;
type Producer<T> = Arc<dyn Fn() -> ProducerFuture<T> + Send + Sync>;

const EVENT_CAPACITY: usize = 16;

/// Turns an asynchronous producer into observable [`ResourceState`].
///
/// Cloning yields another handle to the same resource.
///
/// Every invocation runs on its own Tokio task, so binding with `auto_start`
/// and calling [`refetch`](Self::refetch) must happen inside a Tokio runtime.
pub struct AsyncResource<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for AsyncResource<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

struct Shared<T> {
    producer: Producer<T>,
    gate: Mutex<Gate>,
    state: watch::Sender<ResourceState<T>>,
    events: broadcast::Sender<DataChanged<T>>,
}

/// Decides which invocation may write. State writes happen while it is held.
#[derive(Default)]
struct Gate {
    latest: u64,
    torn_down: bool,
}

impl<T> Shared<T> {
    fn gate(&self) -> MutexGuard<'_, Gate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone + Send + Sync + 'static> Shared<T> {
    /// Apply a completed invocation if it is still the latest one.
    fn settle(&self, generation: u64, outcome: &Result<T, ErrorInfo>) -> bool {
        let gate = self.gate();
        if gate.torn_down || gate.latest != generation {
            tracing::debug!(
                generation,
                latest = gate.latest,
                torn_down = gate.torn_down,
                "discarding superseded result"
            );
            return false;
        }

        match outcome {
            Ok(data) => {
                self.state.send_replace(ResourceState::Success(data.clone()));
                // No subscribers is fine.
                let _ = self.events.send(DataChanged {
                    generation,
                    data: data.clone(),
                });
            }
            Err(error) => {
                tracing::warn!(generation, %error, "producer failed");
                self.state.send_replace(ResourceState::Failure(error.clone()));
            }
        }
        true
    }
}

impl<T: Clone + Send + Sync + 'static> AsyncResource<T> {
    /// Bind `producer`. The resource starts `Idle`; with `auto_start` an
    /// invocation begins immediately and the state is `Loading` on return.
    pub fn bind<F, Fut, E>(producer: F, auto_start: bool) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display,
    {
        let producer: Producer<T> = Arc::new(move || -> ProducerFuture<T> {
            let call = producer();
            Box::pin(async move { call.await.map_err(ErrorInfo::from_display) })
        });
        let (state, _) = watch::channel(ResourceState::Idle);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let resource = Self {
            shared: Arc::new(Shared {
                producer,
                gate: Mutex::new(Gate::default()),
                state,
                events,
            }),
        };

        if auto_start {
            // Observed through state; the handle is not needed.
            let _ = resource.refetch();
        }
        resource
    }

    /// Start a new invocation, superseding any in flight.
    ///
    /// After teardown no producer runs and the returned invocation resolves
    /// at once as non-authoritative.
    pub fn refetch(&self) -> Invocation<T> {
        let generation = {
            let mut gate = self.shared.gate();
            if gate.torn_down {
                let generation = gate.latest;
                drop(gate);
                return Invocation::new(
                    generation,
                    tokio::spawn(async move {
                        Settlement {
                            generation,
                            authoritative: false,
                            outcome: Err(ErrorInfo::new("resource was torn down")),
                        }
                    }),
                );
            }
            gate.latest += 1;
            self.shared.state.send_replace(ResourceState::Loading);
            gate.latest
        };
        tracing::debug!(generation, "starting invocation");

        let call = (self.shared.producer)();
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            // A panicking producer becomes a failure instead of a stuck `Loading`.
            let outcome = match tokio::spawn(call).await {
                Ok(outcome) => outcome,
                Err(err) => Err(ErrorInfo::new(format!("producer aborted: {}", err))),
            };
            let authoritative = shared.settle(generation, &outcome);
            Settlement {
                generation,
                authoritative,
                outcome,
            }
        });

        Invocation::new(generation, handle)
    }

    /// Return to `Idle` and disown every invocation in flight.
    pub fn reset(&self) {
        let mut gate = self.shared.gate();
        if gate.torn_down {
            return;
        }
        gate.latest += 1;
        self.shared.state.send_replace(ResourceState::Idle);
        tracing::debug!(generation = gate.latest, "reset");
    }

    /// Stop all further state changes. In-flight results are discarded on
    /// arrival and later `refetch`/`reset` calls do nothing.
    pub fn teardown(&self) {
        self.shared.gate().torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.gate().torn_down
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ResourceState<T> {
        self.shared.state.borrow().clone()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.shared.state.subscribe()
    }

    /// Receive a [`DataChanged`] for every authoritative success from now on.
    pub fn events(&self) -> broadcast::Receiver<DataChanged<T>> {
        self.shared.events.subscribe()
    }

    /// Generation of the latest started invocation (0 before the first).
    pub fn generation(&self) -> u64 {
        self.shared.gate().latest
    }
}
