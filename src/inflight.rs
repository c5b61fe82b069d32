use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use uuid::Uuid;

use crate::error::AppError;

/// Forms whose submission is gated against duplicate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    ManualMeal,
    SearchMeal,
    Exercise,
    Workout,
    ProfilePicture,
}

/// Tracks which (user, form) submissions are currently being written.
#[derive(Clone, Default)]
pub struct InFlight {
    active: Arc<Mutex<HashSet<(Uuid, Form)>>>,
}

impl InFlight {
    fn lock(&self) -> MutexGuard<'_, HashSet<(Uuid, Form)>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks the submission as in flight. Fails with `Conflict` if the same
    /// user is already submitting this form.
    pub fn begin(&self, user_id: Uuid, form: Form) -> Result<SubmitGuard, AppError> {
        if !self.lock().insert((user_id, form)) {
            return Err(AppError::Conflict("Submission already in progress".into()));
        }
        Ok(SubmitGuard {
            owner: self.clone(),
            key: (user_id, form),
        })
    }
}

/// Clears the in-flight mark when dropped.
pub struct SubmitGuard {
    owner: InFlight,
    key: (Uuid, Form),
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.owner.lock().remove(&self.key);
    }
}
