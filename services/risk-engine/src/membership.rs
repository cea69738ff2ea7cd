//! Account membership index
//!
//! Two views kept in lockstep: the ordered list of markets per account and
//! the set of accounts per market. An account is in a market's set iff the
//! market is in the account's list, with no duplicates on either side.

use std::collections::{HashMap, HashSet};

use lending_types::ids::{AccountId, MarketId};

#[derive(Debug, Clone, Default)]
pub struct MembershipIndex {
    assets_in: HashMap<AccountId, Vec<MarketId>>,
    members: HashMap<MarketId, HashSet<AccountId>>,
}

impl MembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_member(&self, account: &AccountId, market: &MarketId) -> bool {
        self.members
            .get(market)
            .map_or(false, |set| set.contains(account))
    }

    /// Markets the account has entered, in entry order (until an exit
    /// swaps the last entry into the vacated slot).
    pub fn assets_in(&self, account: &AccountId) -> &[MarketId] {
        self.assets_in.get(account).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Add `account` to `market`. Returns `false` if already a member.
    pub fn join(&mut self, account: AccountId, market: MarketId) -> bool {
        if !self.members.entry(market).or_default().insert(account) {
            return false;
        }
        self.assets_in.entry(account).or_default().push(market);
        true
    }

    /// Remove `account` from `market`. Returns `false` if not a member.
    ///
    /// The list side uses swap-and-shrink, not ordered deletion.
    pub fn leave(&mut self, account: &AccountId, market: &MarketId) -> bool {
        let removed = self
            .members
            .get_mut(market)
            .map_or(false, |set| set.remove(account));
        if !removed {
            return false;
        }

        let list = self
            .assets_in
            .get_mut(account)
            .expect("membership views out of sync: account set without list");
        let index = list
            .iter()
            .position(|m| m == market)
            .expect("membership views out of sync: market missing from list");
        list.swap_remove(index);
        if list.is_empty() {
            self.assets_in.remove(account);
        }
        true
    }

    /// Both views agree and neither holds duplicates.
    pub fn is_consistent(&self) -> bool {
        let list_entries: usize = self.assets_in.values().map(Vec::len).sum();
        let set_entries: usize = self.members.values().map(HashSet::len).sum();
        if list_entries != set_entries {
            return false;
        }
        self.assets_in.iter().all(|(account, markets)| {
            let unique: HashSet<&MarketId> = markets.iter().collect();
            unique.len() == markets.len() && markets.iter().all(|m| self.is_member(account, m))
        })
    }
}
