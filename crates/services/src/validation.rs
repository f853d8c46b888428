//! Input bounds for everything a user can type.
//!
//! Lengths are counted in characters after trimming surrounding whitespace.

use domains::{ForumError, Result};
use email_address::EmailAddress;

/// Inclusive character bounds for one input field.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub field: &'static str,
    pub min: usize,
    pub max: usize,
}

impl Bounds {
    pub const fn new(field: &'static str, min: usize, max: usize) -> Self {
        Self { field, min, max }
    }

    pub fn check(&self, value: &str) -> Result<()> {
        let len = value.trim().chars().count();
        if len < self.min {
            return Err(ForumError::validation(
                self.field,
                format!("must be at least {} characters", self.min),
            ));
        }
        if len > self.max {
            return Err(ForumError::validation(
                self.field,
                format!("cannot exceed {} characters", self.max),
            ));
        }
        Ok(())
    }
}

pub const SERVER_NAME: Bounds = Bounds::new("name", 3, 50);
pub const SERVER_DESCRIPTION: Bounds = Bounds::new("description", 10, 200);
pub const CATEGORY_NAME: Bounds = Bounds::new("name", 3, 50);
pub const CATEGORY_DESCRIPTION: Bounds = Bounds::new("description", 10, 200);
pub const THREAD_TITLE: Bounds = Bounds::new("title", 5, 150);
pub const THREAD_CONTENT: Bounds = Bounds::new("content", 20, 10_000);
pub const POST_CONTENT: Bounds = Bounds::new("content", 10, 5_000);
pub const USERNAME: Bounds = Bounds::new("username", 3, 32);

pub fn check_email(email: &str) -> Result<()> {
    if EmailAddress::is_valid(email.trim()) {
        Ok(())
    } else {
        Err(ForumError::validation("email", "invalid email address"))
    }
}
