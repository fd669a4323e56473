use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies one mounted warehouse block.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(Uuid);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", &self.0.to_string()[..8])
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct() {
        assert_ne!(BlockId::new(), BlockId::new());
    }

    #[test]
    fn debug_is_short() {
        let id = BlockId::new();
        let debug = format!("{id:?}");
        assert!(debug.starts_with("BlockId("));
        assert_eq!(debug.len(), "BlockId()".len() + 8);
    }
}
