use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::error::ErrorInfo;

/// How one invocation ended.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement<T> {
    pub generation: u64,
    /// Whether this invocation was still the latest when it completed and so
    /// wrote the resource's state.
    pub authoritative: bool,
    pub outcome: Result<T, ErrorInfo>,
}

impl<T> Settlement<T> {
    /// The data, if this invocation both succeeded and was allowed to write it.
    pub fn authoritative_data(&self) -> Option<&T> {
        match (&self.outcome, self.authoritative) {
            (Ok(data), true) => Some(data),
            _ => None,
        }
    }
}

/// Handle to a started invocation. Resolves once that invocation completes,
/// whether or not a later one superseded it.
///
/// Dropping the handle does not stop the invocation.
#[must_use = "an invocation runs regardless; await it to observe its settlement"]
pub struct Invocation<T> {
    generation: u64,
    handle: JoinHandle<Settlement<T>>,
}

impl<T> Invocation<T> {
    pub(crate) fn new(generation: u64, handle: JoinHandle<Settlement<T>>) -> Self {
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<T> Future for Invocation<T> {
    type Output = Settlement<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let generation = self.generation;
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Ready(Ok(settlement)) => Poll::Ready(settlement),
            Poll::Ready(Err(err)) => Poll::Ready(Settlement {
                generation,
                authoritative: false,
                outcome: Err(ErrorInfo::new(format!("invocation did not complete: {}", err))),
            }),
            Poll::Pending => Poll::Pending,
        }
    }
}
