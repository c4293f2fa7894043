//! Per-user ordering rules
//!
//! A bulk reorder replaces every order value of one user's assignments.
//! The submitted list must be a permutation of the user's current client set.

use std::collections::HashSet;

use super::entity::{DomainError, DomainResult};

/// Check that `submitted` is a permutation of `current`.
///
/// Rejects duplicates, unknown clients and missing clients with a
/// `DomainError::Validation` naming the first offending id.
pub fn validate_permutation(current: &[u32], submitted: &[u32]) -> DomainResult<()> {
    let current_set: HashSet<u32> = current.iter().copied().collect();
    let mut seen = HashSet::with_capacity(submitted.len());

    for id in submitted {
        if !seen.insert(*id) {
            return Err(DomainError::Validation(format!("client {} submitted more than once", id)));
        }
        if !current_set.contains(id) {
            return Err(DomainError::Validation(format!("client {} is not assigned to this user", id)));
        }
    }

    if let Some(missing) = current.iter().find(|id| !seen.contains(id)) {
        return Err(DomainError::Validation(format!("client {} is missing from the new order", missing)));
    }

    Ok(())
}

/// Dense zero-based order values for a validated permutation
pub fn dense_orders(submitted: &[u32]) -> Vec<(u32, i32)> {
    submitted
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, index as i32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_permutation() {
        assert!(validate_permutation(&[1, 2, 3], &[3, 1, 2]).is_ok());
        assert!(validate_permutation(&[], &[]).is_ok());
    }

    #[test]
    fn test_rejects_duplicate() {
        let err = validate_permutation(&[1, 2, 3], &[1, 1, 2]).unwrap_err();
        assert_eq!(err, DomainError::Validation("client 1 submitted more than once".to_string()));
    }

    #[test]
    fn test_rejects_addition() {
        let err = validate_permutation(&[1, 2], &[1, 2, 9]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("9")));
    }

    #[test]
    fn test_rejects_removal() {
        let err = validate_permutation(&[1, 2, 3], &[3, 1]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("2")));
    }

    #[test]
    fn test_dense_orders_follow_positions() {
        assert_eq!(dense_orders(&[30, 10, 20]), vec![(30, 0), (10, 1), (20, 2)]);
    }
}
