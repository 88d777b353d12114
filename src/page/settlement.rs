//! Utilities to track the mutations that have been submitted to an event source

use std::fmt::{Display, Error, Formatter};

use uuid::Uuid;

use crate::editor::Mutation;
use crate::event::EventId;

/// Identifies a submitted mutation, until it settles
pub type MutationId = Uuid;

/// How a mutation has resolved
#[derive(Clone, Debug, PartialEq)]
pub enum MutationOutcome {
    /// The event has been created, with this ID
    Created(EventId),
    /// The update or deletion has been applied
    Done,
    /// The source refused the mutation, or could not be reached
    Failed(String),
}

/// A notification that a mutation has resolved
#[derive(Clone, Debug)]
pub struct Settlement {
    pub id: MutationId,
    pub mutation: Mutation,
    pub outcome: MutationOutcome,
}

impl Settlement {
    pub fn is_success(&self) -> bool {
        match self.outcome {
            MutationOutcome::Failed(_) => false,
            _ => true,
        }
    }
}

impl Display for Settlement {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match &self.outcome {
            MutationOutcome::Created(id) => write!(f, "[{}] {}: created event {}", self.id, self.mutation, id),
            MutationOutcome::Done => write!(f, "[{}] {}: done", self.id, self.mutation),
            MutationOutcome::Failed(err) => write!(f, "[{}] {}: failed ({})", self.id, self.mutation, err),
        }
    }
}


/// See [`settlement_channel`]
pub type SettlementSender = tokio::sync::mpsc::UnboundedSender<Settlement>;
/// See [`settlement_channel`]
pub type SettlementReceiver = tokio::sync::mpsc::UnboundedReceiver<Settlement>;

/// Create a channel, that carries the settlements of submitted mutations back to the page that submitted them
pub fn settlement_channel() -> (SettlementSender, SettlementReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
