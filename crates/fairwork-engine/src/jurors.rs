//! # Juror Pool Collaborator
//!
//! The engine does not choose who sits on a panel; a [`JurorPool`]
//! collaborator does. Production deployments back this with the staked
//! juror registry. [`FixedPool`] is the built-in implementation used by the
//! CLI and tests: round-robin over a configured member list, skipping
//! excluded addresses.

use parking_lot::Mutex;

use fairwork_core::Address;

use crate::error::EngineError;

/// Panel size for every dispute.
pub const PANEL_SIZE: usize = 3;

/// Source of juror panels.
///
/// `excluded` carries the dispute's own parties; an implementation must
/// never seat them. Implementations also guarantee a panel of three
/// pairwise-distinct addresses.
pub trait JurorPool: Send + Sync {
    /// Draw a panel of three jurors, none of which appear in `excluded`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::JurorSelection`] if the pool cannot produce a
    /// full panel.
    fn select(&self, excluded: &[Address]) -> Result<[Address; PANEL_SIZE], EngineError>;
}

/// A static juror pool with round-robin selection.
///
/// Members are drawn in list order starting from a rotating cursor, so
/// consecutive disputes see different panels even with a small pool.
pub struct FixedPool {
    members: Vec<Address>,
    cursor: Mutex<usize>,
}

impl FixedPool {
    /// Build a pool from a member list.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::JurorSelection`] if the list holds fewer than
    /// three distinct members.
    pub fn new(members: Vec<Address>) -> Result<Self, EngineError> {
        let mut distinct = members.clone();
        distinct.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        distinct.dedup();
        if distinct.len() < PANEL_SIZE {
            return Err(EngineError::JurorSelection(format!(
                "pool needs at least {PANEL_SIZE} distinct members, got {}",
                distinct.len()
            )));
        }
        Ok(Self {
            members,
            cursor: Mutex::new(0),
        })
    }

    /// The configured member list, in pool order.
    pub fn members(&self) -> &[Address] {
        &self.members
    }
}

impl JurorPool for FixedPool {
    fn select(&self, excluded: &[Address]) -> Result<[Address; PANEL_SIZE], EngineError> {
        let mut cursor = self.cursor.lock();
        let start = *cursor;
        let mut panel: Vec<Address> = Vec::with_capacity(PANEL_SIZE);
        for offset in 0..self.members.len() {
            let candidate = &self.members[(start + offset) % self.members.len()];
            if excluded.contains(candidate) || panel.contains(candidate) {
                continue;
            }
            panel.push(candidate.clone());
            if panel.len() == PANEL_SIZE {
                break;
            }
        }
        if panel.len() < PANEL_SIZE {
            return Err(EngineError::JurorSelection(format!(
                "only {} eligible jurors after exclusions",
                panel.len()
            )));
        }
        *cursor = (start + 1) % self.members.len();
        let panel: [Address; PANEL_SIZE] = panel
            .try_into()
            .map_err(|_| EngineError::JurorSelection("panel assembly failed".into()))?;
        Ok(panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: &str) -> Address {
        Address::new(format!("0x{last:0>40}")).unwrap()
    }

    fn pool() -> FixedPool {
        FixedPool::new(vec![
            addr("a1"),
            addr("a2"),
            addr("a3"),
            addr("a4"),
            addr("a5"),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_undersized_pool() {
        assert!(FixedPool::new(vec![addr("a1"), addr("a2")]).is_err());
        // three entries but only two distinct
        assert!(FixedPool::new(vec![addr("a1"), addr("a1"), addr("a2")]).is_err());
    }

    #[test]
    fn selects_three_distinct_members() {
        let panel = pool().select(&[]).unwrap();
        assert_ne!(panel[0], panel[1]);
        assert_ne!(panel[0], panel[2]);
        assert_ne!(panel[1], panel[2]);
    }

    #[test]
    fn skips_excluded_parties() {
        let panel = pool().select(&[addr("a1"), addr("a2")]).unwrap();
        assert!(!panel.contains(&addr("a1")));
        assert!(!panel.contains(&addr("a2")));
    }

    #[test]
    fn fails_when_too_few_eligible() {
        let err = pool()
            .select(&[addr("a1"), addr("a2"), addr("a3")])
            .unwrap_err();
        assert!(matches!(err, EngineError::JurorSelection(_)));
    }

    #[test]
    fn cursor_rotates_between_draws() {
        let pool = pool();
        let first = pool.select(&[]).unwrap();
        let second = pool.select(&[]).unwrap();
        assert_ne!(first, second);
        assert_eq!(second[0], addr("a2"));
    }
}
