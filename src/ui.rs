//! Prompt flags the front end renders from: which modal is open, and the last auth errors.

use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiFlags {
    pub is_login_open: bool,
    pub login_error: String,
    pub is_register_open: bool,
    pub register_error: String,
    pub is_profile_open: bool,
    pub is_delete_confirm_open: bool,
}

/// Shared prompt state. Login and register are mutually exclusive.
#[derive(Debug, Default)]
pub struct UiState {
    flags: Mutex<UiFlags>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> UiFlags {
        self.lock().clone()
    }

    pub fn open_login(&self) {
        let mut flags = self.lock();
        flags.is_login_open = true;
        flags.is_register_open = false;
    }

    pub fn open_register(&self) {
        let mut flags = self.lock();
        flags.is_register_open = true;
        flags.is_login_open = false;
    }

    pub fn open_delete_confirm(&self) {
        self.lock().is_delete_confirm_open = true;
    }

    pub fn close_modal(&self) {
        let mut flags = self.lock();
        flags.is_login_open = false;
        flags.is_register_open = false;
        flags.is_delete_confirm_open = false;
    }

    pub fn set_login_error(&self, message: impl Into<String>) {
        self.lock().login_error = message.into();
    }

    pub fn set_register_error(&self, message: impl Into<String>) {
        self.lock().register_error = message.into();
    }

    pub fn clear_errors(&self) {
        let mut flags = self.lock();
        flags.login_error.clear();
        flags.register_error.clear();
    }

    fn lock(&self) -> MutexGuard<'_, UiFlags> {
        match self.flags.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
