/// Manual override helpers.
///
/// These compute and validate a new ranking order without touching engine
/// state. `RankingEngine` applies the result atomically.
use std::collections::{HashMap, HashSet};

use crate::error::{RankError, Result};
use crate::types::Item;

/// Build a reordering of `current` from a list of IDs.
///
/// The items themselves are taken from `current`, so callers cannot smuggle in
/// modified copies under an existing ID.
pub fn permute_by_ids(current: &[Item], ids: &[i64]) -> Result<Vec<Item>> {
    if current.len() != ids.len() {
        return Err(RankError::LengthMismatch {
            expected: current.len(),
            actual: ids.len(),
        });
    }

    let by_id: HashMap<i64, &Item> = current.iter().map(|i| (i.id, i)).collect();
    let mut seen = HashSet::with_capacity(ids.len());
    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        let item = by_id.get(&id).ok_or(RankError::UnknownItem(id))?;
        if !seen.insert(id) {
            return Err(RankError::DuplicateItem(id));
        }
        out.push((*item).clone());
    }
    Ok(out)
}

/// `current` with the element at `from` removed and reinserted at `to`.
pub fn moved(current: &[Item], from: usize, to: usize) -> Result<Vec<Item>> {
    let len = current.len();
    for index in [from, to] {
        if index >= len {
            return Err(RankError::IndexOutOfRange { index, len });
        }
    }

    let mut out = current.to_vec();
    let item = out.remove(from);
    out.insert(to, item);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ids: &[i64]) -> Vec<Item> {
        ids.iter().map(|&id| Item::new(id, format!("item-{id}"))).collect()
    }

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_permute_rejects_length_mismatch() {
        assert_eq!(
            permute_by_ids(&items(&[1, 2, 3]), &[1, 2]),
            Err(RankError::LengthMismatch { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_moved_forward_and_back() {
        let current = items(&[1, 2, 3, 4]);
        assert_eq!(ids(&moved(&current, 0, 2).unwrap()), vec![2, 3, 1, 4]);
        assert_eq!(ids(&moved(&current, 3, 0).unwrap()), vec![4, 1, 2, 3]);
        assert_eq!(ids(&moved(&current, 1, 1).unwrap()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_moved_out_of_range() {
        let current = items(&[1, 2]);
        assert_eq!(
            moved(&current, 2, 0),
            Err(RankError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            moved(&current, 0, 5),
            Err(RankError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn test_permute_by_ids() {
        let current = items(&[10, 20, 30]);
        assert_eq!(ids(&permute_by_ids(&current, &[30, 10, 20]).unwrap()), vec![30, 10, 20]);
        assert_eq!(permute_by_ids(&current, &[30, 10, 10]), Err(RankError::DuplicateItem(10)));
        assert_eq!(permute_by_ids(&current, &[30, 10, 99]), Err(RankError::UnknownItem(99)));
    }
}
