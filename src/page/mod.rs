//! This module binds a [`ListView`] to an [`EventSource`]
//!
//! Mutations are optimistic: they are submitted in the background and the view does not wait for them.
//! Once a mutation has succeeded, the list is fetched again from the source.

use std::error::Error;
use std::sync::Arc;

use crate::editor::Mutation;
use crate::event::{EventId, FieldChange};
use crate::list_view::ListView;
use crate::traits::EventSource;

pub mod settlement;
use settlement::{MutationId, MutationOutcome, Settlement};
use settlement::{SettlementReceiver, SettlementSender};


/// The events page: a list view, fed by an event source
///
/// Submitting a mutation requires a running tokio runtime, since mutations are spawned in the background.
pub struct EventsPage<S>
where
    S: EventSource + ?Sized + 'static,
{
    source: Arc<S>,
    view: ListView,

    sender: SettlementSender,
    receiver: SettlementReceiver,
    /// How many submitted mutations have not settled yet
    in_flight: usize,
    /// The error of the last mutation, if it failed
    last_error: Option<String>,
}

impl<S> EventsPage<S>
where
    S: EventSource + ?Sized + 'static,
{
    /// Create a page. Nothing is fetched until [`Self::mount`] is called
    pub fn new(source: Arc<S>) -> Self {
        let (sender, receiver) = settlement::settlement_channel();
        Self {
            source,
            view: ListView::new(),
            sender, receiver,
            in_flight: 0,
            last_error: None,
        }
    }

    pub fn source(&self) -> &Arc<S> { &self.source }
    pub fn view(&self) -> &ListView { &self.view }
    pub fn in_flight(&self) -> usize { self.in_flight }
    pub fn last_error(&self) -> Option<&str> { self.last_error.as_deref() }

    /// Initial fetch of the events
    pub async fn mount(&mut self) -> bool {
        log::info!("Mounting the events page");
        self.refresh().await
    }

    /// Fetch the events again from the source. Returns whether this succeeded
    pub async fn refresh(&mut self) -> bool {
        log::debug!("Fetching the events...");
        let result = self.source.list().await;
        let success = result.is_ok();
        self.view.apply_fetch(result);
        success
    }

    pub fn edit(&mut self, id: &EventId) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.view.edit(id)
    }

    pub fn change(&mut self, change: FieldChange) -> bool {
        self.view.change(change)
    }

    pub fn cancel(&mut self) {
        self.view.cancel()
    }

    /// Submit the row being edited, and leave edit mode at once.
    /// Returns `None` if no row is being edited
    pub fn save(&mut self) -> Option<MutationId> {
        let mutation = self.view.save()?;
        Some(self.submit(mutation))
    }

    pub fn delete(&mut self, id: &EventId) -> Result<MutationId, Box<dyn Error + Send + Sync>> {
        let mutation = self.view.delete(id)?;
        Ok(self.submit(mutation))
    }

    pub fn change_new(&mut self, change: FieldChange) {
        self.view.change_new(change)
    }

    /// Submit the "new event" form. The form is reset at once
    pub fn create(&mut self) -> MutationId {
        let mutation = self.view.submit_new();
        self.submit(mutation)
    }

    /// Spawn a mutation in the background. Its settlement will be available from [`Self::next_settlement`]
    fn submit(&mut self, mutation: Mutation) -> MutationId {
        let id = MutationId::new_v4();
        log::info!("Submitting {} ({})", mutation, id);

        let source = Arc::clone(&self.source);
        let pending = PendingSettlement::new(id, mutation.clone(), self.sender.clone());
        self.in_flight += 1;

        tokio::spawn(async move {
            let outcome = apply_mutation(&*source, mutation).await;
            pending.settle(outcome);
        });
        id
    }

    /// Take a settlement into account. Returns whether the list should be fetched again
    fn record_settlement(&mut self, settlement: &Settlement) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        match &settlement.outcome {
            MutationOutcome::Failed(err) => {
                log::warn!("Unable to {}: {}", settlement.mutation, err);
                self.last_error = Some(format!("Unable to {}: {}", settlement.mutation, err));
                false
            },
            _ => {
                log::info!("{}", settlement);
                self.last_error = None;
                true
            },
        }
    }

    /// Wait for the next mutation to settle, and fetch the list again if it succeeded.
    ///
    /// Returns `None` at once if no mutation is in flight
    pub async fn next_settlement(&mut self) -> Option<Settlement> {
        if self.in_flight == 0 {
            return None;
        }
        let settlement = self.receiver.recv().await?;
        if self.record_settlement(&settlement) {
            self.refresh().await;
        }
        Some(settlement)
    }

    /// Wait until every mutation in flight has settled
    pub async fn settle_pending(&mut self) -> Vec<Settlement> {
        let mut settled = Vec::new();
        while let Some(settlement) = self.next_settlement().await {
            settled.push(settlement);
        }
        settled
    }

    /// Take into account the mutations that have already settled, without waiting for the others.
    /// The list is fetched again (once) if any of them succeeded
    pub async fn poll_settled(&mut self) -> Vec<Settlement> {
        let mut settled = Vec::new();
        let mut needs_refresh = false;
        while let Ok(settlement) = self.receiver.try_recv() {
            needs_refresh |= self.record_settlement(&settlement);
            settled.push(settlement);
        }
        if needs_refresh {
            self.refresh().await;
        }
        settled
    }
}

/// Sends the settlement of a spawned mutation.
///
/// In case the task ends without settling (e.g. the source panicked), a failure is sent when this is dropped, so that the page never waits for it forever.
struct PendingSettlement {
    id: MutationId,
    mutation: Mutation,
    sender: SettlementSender,
    settled: bool,
}

impl PendingSettlement {
    fn new(id: MutationId, mutation: Mutation, sender: SettlementSender) -> Self {
        Self { id, mutation, sender, settled: false }
    }

    fn send(&mut self, outcome: MutationOutcome) {
        self.settled = true;
        let settlement = Settlement{ id: self.id, mutation: self.mutation.clone(), outcome };
        if self.sender.send(settlement).is_err() {
            log::debug!("Mutation {} settled after its page was dropped", self.id);
        }
    }

    fn settle(mut self, outcome: MutationOutcome) {
        self.send(outcome)
    }
}

impl Drop for PendingSettlement {
    fn drop(&mut self) {
        if self.settled == false {
            log::warn!("Mutation {} ended without settling", self.id);
            self.send(MutationOutcome::Failed("the mutation was interrupted before it settled".to_string()));
        }
    }
}

async fn apply_mutation<S>(source: &S, mutation: Mutation) -> MutationOutcome
where
    S: EventSource + ?Sized,
{
    let result = match mutation {
        Mutation::Create(fields) => source.create(fields).await.map(MutationOutcome::Created),
        Mutation::Update(record) => source.update(record).await.map(|_| MutationOutcome::Done),
        Mutation::Delete(id) => source.delete(&id).await.map(|_| MutationOutcome::Done),
    };
    match result {
        Ok(outcome) => outcome,
        Err(err) => MutationOutcome::Failed(err.to_string()),
    }
}
