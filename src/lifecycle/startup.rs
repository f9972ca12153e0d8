//! Startup orchestration: readiness gates.
//!
//! # Responsibilities
//! - Hold asynchronous readiness futures (e.g. translation loading)
//! - Await all of them once, between route composition and binding
//! - Remember a failure so later starts fail the same way
//!
//! # Design Decisions
//! - Fail fast: any gate error is fatal to `start`
//! - Gates run concurrently; none is awaited before `start`

use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;
use std::future::Future;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type Gate = BoxFuture<'static, Result<(), BoxError>>;

/// Phase 2 readiness state.
pub enum Readiness {
    /// Gates registered and not yet awaited.
    Pending(Vec<Gate>),
    Ready,
    Failed(String),
}

impl Readiness {
    pub fn new() -> Self {
        Readiness::Pending(Vec::new())
    }

    /// Register a gate. Ignored once a gate has failed.
    pub fn add<F>(&mut self, gate: F)
    where
        F: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        match self {
            Readiness::Pending(gates) => gates.push(gate.boxed()),
            Readiness::Ready => *self = Readiness::Pending(vec![gate.boxed()]),
            Readiness::Failed(_) => {
                tracing::warn!("Readiness already failed, ignoring new gate");
            }
        }
    }

    /// Await every pending gate.
    pub async fn wait(&mut self) -> Result<(), String> {
        match std::mem::replace(self, Readiness::Ready) {
            Readiness::Pending(gates) => {
                let count = gates.len();
                match future::try_join_all(gates).await {
                    Ok(_) => {
                        if count > 0 {
                            tracing::info!(gates = count, "Readiness gates resolved");
                        }
                        Ok(())
                    }
                    Err(e) => {
                        let message = e.to_string();
                        *self = Readiness::Failed(message.clone());
                        Err(message)
                    }
                }
            }
            Readiness::Ready => Ok(()),
            Readiness::Failed(message) => {
                *self = Readiness::Failed(message.clone());
                Err(message)
            }
        }
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Readiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Readiness::Pending(gates) => write!(f, "Pending({} gates)", gates.len()),
            Readiness::Ready => write!(f, "Ready"),
            Readiness::Failed(message) => write!(f, "Failed({})", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn gates_are_awaited_once() {
        let done = Arc::new(AtomicBool::new(false));
        let flag = done.clone();
        let mut readiness = Readiness::new();
        readiness.add(async move {
            tokio::task::yield_now().await;
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        assert!(!done.load(Ordering::SeqCst));
        readiness.wait().await.unwrap();
        assert!(done.load(Ordering::SeqCst));
        assert!(matches!(readiness, Readiness::Ready));
        readiness.wait().await.unwrap();
    }

    #[tokio::test]
    async fn failure_is_sticky() {
        let mut readiness = Readiness::new();
        readiness.add(async { Err::<(), BoxError>("translations missing".into()) });
        assert_eq!(readiness.wait().await.unwrap_err(), "translations missing");
        assert_eq!(readiness.wait().await.unwrap_err(), "translations missing");
    }
}
