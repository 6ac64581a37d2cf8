//! Layer identifiers.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u32);

/// Monotonic allocator; ids are never reused within one blender.
#[derive(Default, Debug)]
pub struct LayerIdAllocator {
    next: u32,
}

impl LayerIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> LayerId {
        let id = LayerId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut ids = LayerIdAllocator::new();
        assert_eq!(ids.alloc(), LayerId(0));
        assert_eq!(ids.alloc(), LayerId(1));
    }
}
