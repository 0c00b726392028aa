//! Set algebra for reconciling the local store against the orderbook.
//!
//! For one `(chain, owner)` key, with `R` the hashes the orderbook lists and `S` the hashes stored locally:
//!
//! * `R ∩ S` are *confirmed*: live remotely and known locally.
//! * `R − S` are *unconfirmed*: live remotely but not submitted through this gateway (or not stored yet).
//! * `S − R` are *stale*: the orderbook no longer lists them, so the local records should go.
//!
//! Nothing in here performs I/O.
use std::collections::HashSet;

use orderbook_tools::LimitOrder;

use crate::lop_api::order_objects::ListingPolicy;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    confirmed: Vec<String>,
    unconfirmed: Vec<String>,
    stale: Vec<String>,
}

impl ReconciliationPlan {
    /// `remote` is the orderbook's listing order. Repeated hashes are only counted once. Hashes are hex, so they
    /// are compared without regard to case.
    pub fn new<'a, I>(remote: I, stored: &HashSet<String>) -> Self
    where I: IntoIterator<Item = &'a str> {
        let stored_lower = stored.iter().map(|h| h.to_lowercase()).collect::<HashSet<String>>();
        let mut seen = HashSet::new();
        let mut confirmed = Vec::new();
        let mut unconfirmed = Vec::new();
        for hash in remote {
            let lower = hash.to_lowercase();
            if stored_lower.contains(&lower) {
                if seen.insert(lower) {
                    confirmed.push(hash.to_string());
                }
            } else if seen.insert(lower) {
                unconfirmed.push(hash.to_string());
            }
        }
        let mut stale = stored.iter().filter(|h| !seen.contains(&h.to_lowercase())).cloned().collect::<Vec<String>>();
        stale.sort();
        Self { confirmed, unconfirmed, stale }
    }

    pub fn for_orders(remote: &[LimitOrder], stored: &HashSet<String>) -> Self {
        Self::new(remote.iter().map(|o| o.order_hash.as_str()), stored)
    }

    /// Confirmed hashes, in listing order.
    pub fn confirmed(&self) -> &[String] {
        &self.confirmed
    }

    /// Unconfirmed hashes, in listing order.
    pub fn unconfirmed(&self) -> &[String] {
        &self.unconfirmed
    }

    /// Stale hashes, sorted.
    pub fn stale(&self) -> &[String] {
        &self.stale
    }

    pub fn stale_set(&self) -> HashSet<String> {
        self.stale.iter().cloned().collect()
    }

    /// Keeps the orders the policy asks for, preserving the listing order.
    pub fn select(&self, remote: Vec<LimitOrder>, policy: ListingPolicy) -> Vec<LimitOrder> {
        match policy {
            ListingPolicy::IncludeUnconfirmed => remote,
            ListingPolicy::ConfirmedOnly => {
                let confirmed = self.confirmed.iter().map(String::as_str).collect::<HashSet<&str>>();
                remote.into_iter().filter(|o| confirmed.contains(o.order_hash.as_str())).collect()
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn stored(hashes: &[&str]) -> HashSet<String> {
        hashes.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn partitions_remote_and_stored_hashes() {
        let plan = ReconciliationPlan::new(["h4", "h1", "h2"], &stored(&["h1", "h2", "h3"]));
        assert_eq!(plan.confirmed(), ["h1", "h2"]);
        assert_eq!(plan.unconfirmed(), ["h4"]);
        assert_eq!(plan.stale(), ["h3"]);
    }

    #[test]
    fn partitions_are_disjoint_and_cover_both_sets() {
        let remote = ["a", "b", "c", "d", "e"];
        let local = stored(&["c", "d", "e", "f", "g"]);
        let plan = ReconciliationPlan::new(remote, &local);
        let confirmed = plan.confirmed().iter().cloned().collect::<HashSet<String>>();
        let unconfirmed = plan.unconfirmed().iter().cloned().collect::<HashSet<String>>();
        let stale = plan.stale_set();
        assert!(confirmed.is_disjoint(&unconfirmed));
        assert!(confirmed.is_disjoint(&stale));
        assert!(unconfirmed.is_disjoint(&stale));
        let remote_set = remote.iter().map(|s| s.to_string()).collect::<HashSet<String>>();
        assert_eq!(confirmed.union(&unconfirmed).cloned().collect::<HashSet<String>>(), remote_set);
        assert_eq!(confirmed.union(&stale).cloned().collect::<HashSet<String>>(), local);
    }

    #[test]
    fn empty_remote_makes_everything_stale() {
        let plan = ReconciliationPlan::new([] as [&str; 0], &stored(&["z", "x", "y"]));
        assert!(plan.confirmed().is_empty());
        assert!(plan.unconfirmed().is_empty());
        assert_eq!(plan.stale(), ["x", "y", "z"]);
    }

    #[test]
    fn hash_case_is_ignored() {
        let plan = ReconciliationPlan::new(["0xabcd", "0xbeef"], &stored(&["0xABCD", "0xDEAD"]));
        assert_eq!(plan.confirmed(), ["0xabcd"]);
        assert_eq!(plan.unconfirmed(), ["0xbeef"]);
        // Stale hashes keep their stored spelling so they can be deleted
        assert_eq!(plan.stale(), ["0xDEAD"]);
        let plan = ReconciliationPlan::new(["0xAB", "0xab"], &HashSet::new());
        assert_eq!(plan.unconfirmed(), ["0xAB"]);
    }

    #[test]
    fn empty_store_makes_everything_unconfirmed() {
        let plan = ReconciliationPlan::new(["b", "a", "b"], &HashSet::new());
        assert!(plan.confirmed().is_empty());
        assert_eq!(plan.unconfirmed(), ["b", "a"]);
        assert!(plan.stale().is_empty());
    }
}
