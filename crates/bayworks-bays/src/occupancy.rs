//! Capped citizen rosters.
//!
//! A [`Roster`] is an insertion-ordered list of citizen ids with a fixed
//! limit. Bays use one for occupants, stations use one for worker seats,
//! and research bays use one for researchers. Order matters: stations walk
//! their workers in roster order every tick.

use bayworks_types::CitizenId;

use crate::error::BayError;

/// An ordered list of citizens capped at `limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    members: Vec<CitizenId>,
    limit: usize,
}

impl Roster {
    /// An empty roster holding at most `limit` citizens.
    pub const fn new(limit: usize) -> Self {
        Self {
            members: Vec::new(),
            limit,
        }
    }

    /// Maximum number of members.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Current number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nobody is on the roster.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the roster is at its limit.
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.limit
    }

    /// Whether `id` is on the roster.
    pub fn contains(&self, id: CitizenId) -> bool {
        self.members.contains(&id)
    }

    /// The member at `index`.
    pub fn get(&self, index: usize) -> Option<CitizenId> {
        self.members.get(index).copied()
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CitizenId> {
        self.members.iter()
    }

    /// Append a member.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::AlreadyPresent`] for a duplicate or
    /// [`BayError::RosterFull`] at the limit.
    pub fn add(&mut self, id: CitizenId) -> Result<(), BayError> {
        if self.contains(id) {
            return Err(BayError::AlreadyPresent(id));
        }
        if self.is_full() {
            return Err(BayError::RosterFull { limit: self.limit });
        }
        self.members.push(id);
        Ok(())
    }

    /// Append every id, or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::AlreadyPresent`] if any id is already listed (or
    /// repeated), or [`BayError::RosterFull`] if they would not all fit.
    pub fn add_all(&mut self, ids: &[CitizenId]) -> Result<(), BayError> {
        for (position, id) in ids.iter().enumerate() {
            let repeated = ids.iter().take(position).any(|earlier| earlier == id);
            if repeated || self.contains(*id) {
                return Err(BayError::AlreadyPresent(*id));
            }
        }
        let room = self.limit.saturating_sub(self.members.len());
        if ids.len() > room {
            return Err(BayError::RosterFull { limit: self.limit });
        }
        self.members.extend_from_slice(ids);
        Ok(())
    }

    /// Remove a member, preserving the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::NotPresent`] if `id` is not listed.
    pub fn remove(&mut self, id: CitizenId) -> Result<(), BayError> {
        let index = self
            .members
            .iter()
            .position(|m| *m == id)
            .ok_or(BayError::NotPresent(id))?;
        self.members.remove(index);
        Ok(())
    }

    /// Remove and return the member at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::RosterIndexOutOfRange`] past the end.
    pub fn remove_at(&mut self, index: usize) -> Result<CitizenId, BayError> {
        if index >= self.members.len() {
            return Err(BayError::RosterIndexOutOfRange {
                index,
                len: self.members.len(),
            });
        }
        Ok(self.members.remove(index))
    }
}
