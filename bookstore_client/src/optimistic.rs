use std::future::Future;
use std::ops::Deref;

/// List shown to the user that is changed before the backend confirms the change.
///
/// A failed confirmation restores the list as it was right before the change.
/// Overlapping changes are not sequenced, each one only restores its own snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticList<T> {
    items: Vec<T>,
}

impl<T> Default for OptimisticList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Clone> OptimisticList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Replaces the whole list with the server state
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Applies `patch` right away, then awaits `confirm`.
    /// When `confirm` fails the snapshot taken before `patch` is restored and the error returned.
    pub async fn apply<P, F, R, E>(&mut self, patch: P, confirm: F) -> Result<R, E>
    where
        P: FnOnce(&mut Vec<T>),
        F: Future<Output = Result<R, E>>,
    {
        let snapshot = self.items.clone();
        patch(&mut self.items);
        match confirm.await {
            Ok(confirmed) => Ok(confirmed),
            Err(err) => {
                self.items = snapshot;
                Err(err)
            }
        }
    }
}

impl<T> Deref for OptimisticList<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}
