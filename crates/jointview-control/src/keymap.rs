//! Static key → joint mapping.
//!
//! Number keys and the letter row below them form six pairs, one per
//! movable joint.  The first two pairs turn the same way as their letter;
//! the remaining four are mirrored.

use serde::{Deserialize, Serialize};

/// Which joint a key drives and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Index into the robot's non-fixed joints.
    pub joint_index: usize,
    /// `+1` or `-1`.
    pub direction: i8,
}

const DEFAULT_BINDINGS: [(&str, usize, i8); 12] = [
    ("1", 0, -1),
    ("q", 0, 1),
    ("2", 1, -1),
    ("w", 1, 1),
    ("3", 2, 1),
    ("e", 2, -1),
    ("4", 3, 1),
    ("r", 3, -1),
    ("5", 4, 1),
    ("t", 4, -1),
    ("6", 5, 1),
    ("y", 5, -1),
];

/// Fixed lookup table from lower-cased key to [`KeyBinding`].
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(String, KeyBinding)>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            bindings: DEFAULT_BINDINGS
                .iter()
                .map(|&(key, joint_index, direction)| {
                    (
                        key.to_string(),
                        KeyBinding {
                            joint_index,
                            direction,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl KeyMap {
    /// Look up `key`.  Matching is case-insensitive.
    pub fn binding(&self, key: &str) -> Option<KeyBinding> {
        let key = key.to_lowercase();
        self.bindings
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, b)| *b)
    }

    /// Mapped keys in table order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(k, _)| k.as_str())
    }
}
