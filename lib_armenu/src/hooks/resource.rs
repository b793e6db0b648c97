//! Shared state machinery behind every hook.
//!
//! A `Resource` remembers the dependency value of the last load, publishes
//! its `FetchState` on a `watch` channel, and tags each load with a
//! generation so a slow response cannot overwrite the result of a newer one.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::watch;
use tracing::debug;

use super::fetch_state::FetchState;
use crate::retrieve::errors::MenuResult;

#[derive(Debug)]
pub struct Resource<D, T> {
    deps: Mutex<D>,
    generation: AtomicU64,
    state: watch::Sender<FetchState<T>>,
}

impl<D, T> Resource<D, T>
where
    D: Clone + PartialEq,
    T: Clone,
{
    pub fn new(deps: D) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            deps: Mutex::new(deps),
            generation: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    pub fn state(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    pub fn deps(&self) -> D {
        match self.deps.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Stores `deps`; returns whether they differ from the previous value.
    pub fn replace_deps(&self, deps: D) -> bool {
        let mut guard = match self.deps.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *guard == deps {
            return false;
        }
        *guard = deps;
        true
    }

    /// Runs `fetch`, publishing `Loading` and then the outcome.
    ///
    /// If another load started meanwhile, the outcome is dropped and the
    /// current state is returned instead.
    pub async fn load<F, Fut>(&self, fetch: F) -> FetchState<T>
    where
        F: FnOnce(D) -> Fut,
        Fut: Future<Output = MenuResult<T>>,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(FetchState::Loading);

        let result = fetch(self.deps()).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding result of a superseded fetch");
            return self.state();
        }

        let next = match result {
            Ok(data) => FetchState::Ready(data),
            Err(e) => FetchState::Failed(e),
        };
        self.state.send_replace(next.clone());
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieve::errors::ApiError;
    use std::time::Duration;

    #[tokio::test]
    async fn publishes_loading_then_ready() {
        let res: Resource<u32, String> = Resource::new(1);
        let mut rx = res.subscribe();
        assert_eq!(*rx.borrow(), FetchState::Idle);

        let out = res.load(|d| async move { Ok(format!("item {}", d)) }).await;
        assert_eq!(out, FetchState::Ready("item 1".to_string()));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), FetchState::Ready("item 1".to_string()));
    }

    #[tokio::test]
    async fn failure_is_published() {
        let res: Resource<(), u8> = Resource::new(());
        let out = res.load(|_| async { Err(ApiError::not_found("nope").into()) }).await;
        assert!(out.is_not_found());
        assert!(res.state().is_not_found());
    }

    #[test]
    fn equal_deps_are_not_a_change() {
        let res: Resource<Option<String>, u8> = Resource::new(None);
        assert!(!res.replace_deps(None));
        assert!(res.replace_deps(Some("Tatlı".into())));
        assert!(!res.replace_deps(Some("Tatlı".into())));
        assert_eq!(res.deps(), Some("Tatlı".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_superseded_fetch_does_not_overwrite_newer_result() {
        let res: Resource<u32, &'static str> = Resource::new(0);

        let slow = res.load(|_| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok("stale")
        });
        let fast = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            res.load(|_| async { Ok("fresh") }).await
        };

        let (slow_out, fast_out) = tokio::join!(slow, fast);
        assert_eq!(fast_out, FetchState::Ready("fresh"));
        assert_eq!(slow_out, FetchState::Ready("fresh"));
        assert_eq!(res.state(), FetchState::Ready("fresh"));
    }
}
