//! Unique identifier generation.

use uuid::Uuid;

/// Produces random (v4) UUIDs as lowercase hyphenated strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidProducer;

impl UuidProducer {
    pub fn produce(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
