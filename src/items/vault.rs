//! Vault storage
//!
//! Unequipped items as an ordered, capacity-bounded list of item codes.
//! Positions matter: the UI shows slot `i` at grid cell `i`, and an empty
//! position holds `ItemCode::EMPTY`.

use serde::{Deserialize, Serialize};

use super::item::ItemCode;

/// Slots in a vault unless configured otherwise
pub const DEFAULT_VAULT_CAPACITY: usize = 24;

fn default_capacity() -> usize {
    DEFAULT_VAULT_CAPACITY
}

/// Ordered item-code storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    /// Highest usable slot count
    #[serde(default = "default_capacity")]
    capacity: usize,
    /// Stored codes; may be shorter than `capacity`
    codes: Vec<ItemCode>,
}

impl Default for Vault {
    fn default() -> Self {
        Self::new(DEFAULT_VAULT_CAPACITY)
    }
}

impl Vault {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            codes: Vec::new(),
        }
    }

    /// Build a vault from existing codes. Codes past `capacity` are dropped.
    pub fn with_codes(capacity: usize, codes: impl IntoIterator<Item = ItemCode>) -> Self {
        let mut codes: Vec<ItemCode> = codes.into_iter().collect();
        if codes.len() > capacity {
            log::warn!("Vault holds {} codes but capacity is {}, truncating", codes.len(), capacity);
            codes.truncate(capacity);
        }
        Self { capacity, codes }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of positions currently materialised (occupied or not)
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// True when no position holds an item
    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(|c| c.is_empty())
    }

    /// Number of occupied positions
    pub fn count(&self) -> usize {
        self.codes.iter().filter(|c| !c.is_empty()).count()
    }

    /// False when more positions are stored than the capacity allows,
    /// which only a hand-edited document can produce
    pub fn within_capacity(&self) -> bool {
        self.codes.len() <= self.capacity
    }

    /// Free positions left
    pub fn free(&self) -> usize {
        self.capacity.saturating_sub(self.count())
    }

    /// Check if every slot is occupied
    pub fn is_full(&self) -> bool {
        self.count() >= self.capacity
    }

    /// Code at a position. Positions beyond the stored list but within
    /// capacity read as `EMPTY`; positions beyond capacity are `None`.
    pub fn get(&self, index: usize) -> Option<ItemCode> {
        if index >= self.capacity {
            return None;
        }
        Some(self.codes.get(index).copied().unwrap_or(ItemCode::EMPTY))
    }

    /// Store a code at a position, returning the previous occupant.
    /// `None` if the position is beyond capacity (nothing changes).
    pub fn set(&mut self, index: usize, code: ItemCode) -> Option<ItemCode> {
        if index >= self.capacity {
            return None;
        }
        if index >= self.codes.len() {
            self.codes.resize(index + 1, ItemCode::EMPTY);
        }
        Some(std::mem::replace(&mut self.codes[index], code))
    }

    /// Store a code in the first empty position.
    /// Returns the position used, or `None` if the vault is full.
    pub fn add(&mut self, code: ItemCode) -> Option<usize> {
        if let Some(index) = self.codes.iter().position(|c| c.is_empty()) {
            self.codes[index] = code;
            return Some(index);
        }
        if self.codes.len() < self.capacity {
            self.codes.push(code);
            return Some(self.codes.len() - 1);
        }
        None
    }

    /// Exchange two positions. `false` if either is beyond capacity.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= self.capacity || b >= self.capacity {
            return false;
        }
        let high = a.max(b);
        if high >= self.codes.len() {
            self.codes.resize(high + 1, ItemCode::EMPTY);
        }
        self.codes.swap(a, b);
        true
    }

    /// How many positions hold `code`
    pub fn count_of(&self, code: ItemCode) -> usize {
        self.codes.iter().filter(|&&c| c == code).count()
    }

    pub fn contains(&self, code: ItemCode) -> bool {
        !code.is_empty() && self.codes.contains(&code)
    }

    /// Stored codes in position order
    pub fn codes(&self) -> &[ItemCode] {
        &self.codes
    }

    /// Occupied positions with their codes
    pub fn occupied(&self) -> impl Iterator<Item = (usize, ItemCode)> + '_ {
        self.codes.iter().copied().enumerate().filter(|(_, c)| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_within_and_beyond_capacity() {
        let vault = Vault::with_codes(4, vec![ItemCode(2)]);
        assert_eq!(vault.get(0), Some(ItemCode(2)));
        assert_eq!(vault.get(3), Some(ItemCode::EMPTY));
        assert_eq!(vault.get(4), None);
    }

    #[test]
    fn test_set_pads_with_empty() {
        let mut vault = Vault::new(6);
        assert_eq!(vault.set(3, ItemCode(1)), Some(ItemCode::EMPTY));
        assert_eq!(vault.codes(), &[ItemCode::EMPTY, ItemCode::EMPTY, ItemCode::EMPTY, ItemCode(1)]);
        assert_eq!(vault.count(), 1);
        assert_eq!(vault.set(6, ItemCode(1)), None);
    }

    #[test]
    fn test_add_fills_gaps_first() {
        let mut vault = Vault::with_codes(3, vec![ItemCode(0), ItemCode::EMPTY]);
        assert_eq!(vault.add(ItemCode(5)), Some(1));
        assert_eq!(vault.add(ItemCode(6)), Some(2));
        assert_eq!(vault.add(ItemCode(7)), None);
        assert!(vault.is_full());
    }

    #[test]
    fn test_swap() {
        let mut vault = Vault::with_codes(5, vec![ItemCode(2), ItemCode(1)]);
        assert!(vault.swap(0, 4));
        assert_eq!(vault.get(0), Some(ItemCode::EMPTY));
        assert_eq!(vault.get(4), Some(ItemCode(2)));
        assert!(!vault.swap(0, 5));
    }

    #[test]
    fn test_duplicates_allowed() {
        let mut vault = Vault::new(4);
        vault.add(ItemCode(0));
        vault.add(ItemCode(0));
        assert_eq!(vault.count_of(ItemCode(0)), 2);
        assert!(vault.contains(ItemCode(0)));
        assert!(!vault.contains(ItemCode::EMPTY));
    }

    #[test]
    fn test_with_codes_truncates() {
        let vault = Vault::with_codes(2, vec![ItemCode(0), ItemCode(1), ItemCode(2)]);
        assert_eq!(vault.len(), 2);
        assert!(vault.within_capacity());
    }

    #[test]
    fn test_overfull_document() {
        let vault: Vault = serde_json::from_str(r#"{"capacity": 2, "codes": [2, 1, 0]}"#).unwrap();
        assert!(!vault.within_capacity());
        assert_eq!(vault.free(), 0);
        assert!(vault.is_full());
    }
}
