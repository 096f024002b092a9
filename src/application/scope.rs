use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Lifetime of a view instance.
///
/// Async continuations check the scope before touching view state, so results
/// that arrive after [`ViewScope::dispose`] are dropped instead of written.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispose(&self) {
        self.token.cancel();
    }

    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Child token cancelled together with this scope.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub async fn disposed(&self) {
        self.token.cancelled().await
    }
}

/// Shared view state guarded by its owning scope.
#[derive(Debug)]
pub struct ViewState<T> {
    inner: Arc<Mutex<T>>,
    scope: ViewScope,
}

impl<T> Clone for ViewState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            scope: self.scope.clone(),
        }
    }
}

impl<T> ViewState<T> {
    pub fn new(value: T, scope: ViewScope) -> Self {
        Self {
            inner: Arc::new(Mutex::new(value)),
            scope,
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock())
    }

    /// Applies `f` unless the scope is disposed by the time the lock is held.
    /// Returns whether the write happened.
    pub fn apply(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut guard = self.lock();
        if !self.scope.is_live() {
            return false;
        }
        f(&mut guard);
        true
    }
}
