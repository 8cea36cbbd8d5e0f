//! Local Identity Cache
//!
//! The last submitted email, kept in `localStorage` so a returning visitor
//! sees their status instead of the form.

#[cfg(test)]
use std::cell::{Cell, RefCell};

/// localStorage key holding the email
pub const IDENTITY_KEY: &str = "waitlistEmail";

pub trait IdentityStore {
    fn load(&self) -> Option<String>;
    fn save(&self, email: &str);
    fn clear(&self);
}

/// Browser `localStorage` backed cache
#[derive(Clone, Copy, Default)]
pub struct LocalIdentity;

impl LocalIdentity {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl IdentityStore for LocalIdentity {
    fn load(&self) -> Option<String> {
        let email = Self::storage()?.get_item(IDENTITY_KEY).ok().flatten()?;
        normalize(&email)
    }

    fn save(&self, email: &str) {
        let Some(email) = normalize(email) else {
            return;
        };
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.set_item(IDENTITY_KEY, &email) {
                web_sys::console::warn_1(&format!("Could not cache email: {:?}", e).into());
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(IDENTITY_KEY);
        }
    }
}

/// In-memory cache
#[cfg(test)]
#[derive(Default)]
pub struct MemoryIdentity {
    email: RefCell<Option<String>>,
    clears: Cell<usize>,
}

#[cfg(test)]
impl MemoryIdentity {
    /// How many times `clear` removed a cached email
    pub fn clear_count(&self) -> usize {
        self.clears.get()
    }
}

#[cfg(test)]
impl IdentityStore for MemoryIdentity {
    fn load(&self) -> Option<String> {
        self.email.borrow().clone()
    }

    fn save(&self, email: &str) {
        *self.email.borrow_mut() = normalize(email);
    }

    fn clear(&self) {
        if self.email.borrow_mut().take().is_some() {
            self.clears.set(self.clears.get() + 1);
        }
    }
}

fn normalize(email: &str) -> Option<String> {
    let email = email.trim();
    (!email.is_empty()).then(|| email.to_string())
}
