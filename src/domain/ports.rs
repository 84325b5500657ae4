use crate::domain::object::ObjectSet;
use anyhow::Result;

/// Where a batch of objects comes from (a file, a request body, a test).
pub trait ObjectSource {
    fn load(&self) -> Result<ObjectSet>;
}
