//! Team roster and the add/drop mutator
//!
//! The roster check is the single "has roster space" gate every policy
//! references: a winning claim either drops a rostered player (add and
//! drop applied atomically) or needs the post-add size to fit under the
//! league maximum.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from applying an add/drop to a roster
///
/// These surface as claim failure reasons, not system errors.
#[derive(Debug, Error, PartialEq)]
pub enum RosterError {
    #[error("No roster space and no drop player specified")]
    NoSpace,

    #[error("Drop player {player_id} is not on the roster")]
    DropPlayerNotOnRoster { player_id: String },
}

/// One team's roster: player ids plus the league's configured maximum
///
/// # Example
/// ```
/// use waiver_engine_core::Roster;
///
/// let mut roster = Roster::new("team_a", vec!["p1".into(), "p2".into()], 3);
/// assert!(roster.has_space());
///
/// roster.apply_move("p3", None).unwrap();
/// assert!(!roster.has_space());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    team_id: String,
    player_ids: Vec<String>,
    max_size: usize,
}

impl Roster {
    pub fn new(team_id: impl Into<String>, player_ids: Vec<String>, max_size: usize) -> Self {
        Self {
            team_id: team_id.into(),
            player_ids,
            max_size,
        }
    }

    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    pub fn player_ids(&self) -> &[String] {
        &self.player_ids
    }

    pub fn size(&self) -> usize {
        self.player_ids.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Whether an add without a drop would fit under the league maximum
    pub fn has_space(&self) -> bool {
        self.player_ids.len() < self.max_size
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.player_ids.iter().any(|p| p == player_id)
    }

    /// Apply an add, optionally with a drop
    ///
    /// With a drop: the dropped player must currently be rostered; removal
    /// and add happen together or not at all. Without a drop: the post-add
    /// size must not exceed the maximum.
    pub fn apply_move(
        &mut self,
        add_player_id: &str,
        drop_player_id: Option<&str>,
    ) -> Result<(), RosterError> {
        match drop_player_id {
            Some(drop_id) => {
                let index = self
                    .player_ids
                    .iter()
                    .position(|p| p == drop_id)
                    .ok_or_else(|| RosterError::DropPlayerNotOnRoster {
                        player_id: drop_id.to_string(),
                    })?;
                self.player_ids.remove(index);
                self.player_ids.push(add_player_id.to_string());
            }
            None => {
                if !self.has_space() {
                    return Err(RosterError::NoSpace);
                }
                self.player_ids.push(add_player_id.to_string());
            }
        }
        Ok(())
    }
}
