//! Process-wide last-error description for the runtime entry points.
//!
//! Single writer at a time, last write wins; a subsequent call to the
//! error-description entry point retrieves why the prior call failed.

use parking_lot::Mutex;

pub struct ErrorState {
    description: Mutex<String>,
}

impl ErrorState {
    pub fn new() -> Self {
        ErrorState {
            description: Mutex::new(String::new()),
        }
    }

    pub fn set(&self, message: &str) {
        let mut desc = self.description.lock();
        desc.clear();
        desc.push_str(message);
    }

    pub fn get(&self) -> String {
        self.description.lock().clone()
    }

    pub fn clear(&self) {
        self.description.lock().clear();
    }
}

impl Default for ErrorState {
    fn default() -> Self {
        Self::new()
    }
}
