use std::collections::HashMap;
use std::sync::{Arc, Weak};

use shared::{Id, InvalidTransition, Language, MaterialSupply, SupplyAction, SupplyFilter, SupplyStatus};

use super::confirmation::{ConfirmReport, ConfirmRequest, ConfirmationWorkflow, SupplyBackend};
use crate::error::{ClientError, ClientResult};
use crate::listing::{ApplyOutcome, EntityListController, PageSource};
use crate::notify::{Notification, Notifier};
use crate::session::Session;

/// Display state of a supply row
#[derive(Debug, Clone, PartialEq)]
pub enum RowState {
    /// Matches the last server reply
    Settled(SupplyStatus),
    /// Shown ahead of the server while an action runs
    Optimistic(SupplyStatus),
    /// The last action failed; the row needs attention
    Failed { status: SupplyStatus, error: String },
}

impl RowState {
    pub fn status(&self) -> SupplyStatus {
        match self {
            RowState::Settled(s) | RowState::Optimistic(s) => *s,
            RowState::Failed { status, .. } => *status,
        }
    }

    pub fn needs_attention(&self) -> bool {
        matches!(self, RowState::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupplyRow {
    pub supply: MaterialSupply,
    pub state: RowState,
}

impl SupplyRow {
    /// Confirm and reject are offered only here
    pub fn is_actionable(&self) -> bool {
        self.state.status() == SupplyStatus::Pending && !matches!(self.state, RowState::Optimistic(_))
    }
}

/// A started row action.
///
/// The row shows [`RowState::Optimistic`] for as long as the ticket lives.
/// Dropping it without [`SupplyBoard::complete`] abandons the action and the
/// row falls back to the server status.
#[derive(Debug)]
pub struct ActionTicket {
    request: ConfirmRequest,
    action: SupplyAction,
    previous: SupplyStatus,
    next: SupplyStatus,
    live: Arc<()>,
}

impl ActionTicket {
    pub fn supply_id(&self) -> Id {
        self.request.supply_id
    }

    pub fn action(&self) -> SupplyAction {
        self.action
    }

    pub fn request(&self) -> ConfirmRequest {
        self.request
    }
}

/// Local state laid over a server row
#[derive(Debug, Clone)]
struct Overlay {
    state: RowState,
    /// List epoch the overlay was written in
    epoch: u64,
    /// Set while an action is in flight
    ticket: Option<Weak<()>>,
}

/// Supplies list with admin row actions.
///
/// Actions come in two halves so a UI loop can render the optimistic row
/// while the calls run:
///
/// ```ignore
/// let ticket = board.begin_confirm(id)?;
/// let workflow = board.workflow();
/// let result = workflow.confirm(ticket.request()).await;
/// board.complete(ticket, result)?;
/// board.refresh().await;
/// ```
pub struct SupplyBoard<S, B>
where
    S: PageSource<Item = MaterialSupply, Filter = SupplyFilter>,
    B: SupplyBackend + ?Sized,
{
    list: EntityListController<S>,
    workflow: Arc<ConfirmationWorkflow<B>>,
    session: Session,
    notifier: Arc<dyn Notifier>,
    language: Language,
    rows: HashMap<Id, Overlay>,
}

impl<S, B> SupplyBoard<S, B>
where
    S: PageSource<Item = MaterialSupply, Filter = SupplyFilter>,
    B: SupplyBackend + ?Sized,
{
    pub fn new(
        list: EntityListController<S>,
        workflow: ConfirmationWorkflow<B>,
        session: Session,
        notifier: Arc<dyn Notifier>,
        language: Language,
    ) -> Self {
        Self {
            list,
            workflow: Arc::new(workflow),
            session,
            notifier,
            language,
            rows: HashMap::new(),
        }
    }

    pub fn list(&self) -> &EntityListController<S> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut EntityListController<S> {
        &mut self.list
    }

    pub fn workflow(&self) -> Arc<ConfirmationWorkflow<B>> {
        Arc::clone(&self.workflow)
    }

    pub fn row_state(&self, supply_id: Id) -> Option<RowState> {
        let supply = self.list.items().iter().find(|s| s.id == supply_id)?;
        Some(self.state_of(supply))
    }

    /// Overlays hold only until the next page-0 reply, except for
    /// in-flight actions and failures. A failure keeps its flag but
    /// takes the server status once the list has been reloaded.
    fn state_of(&self, supply: &MaterialSupply) -> RowState {
        let server = RowState::Settled(supply.status);
        let Some(overlay) = self.rows.get(&supply.id) else {
            return server;
        };
        let current = overlay.epoch == self.list.epoch();
        match &overlay.state {
            RowState::Optimistic(_) => {
                let in_flight = overlay
                    .ticket
                    .as_ref()
                    .map_or(false, |t| t.strong_count() > 0);
                if in_flight {
                    overlay.state.clone()
                } else {
                    server
                }
            }
            RowState::Settled(_) if current => overlay.state.clone(),
            RowState::Settled(_) => server,
            RowState::Failed { .. } if current => overlay.state.clone(),
            RowState::Failed { error, .. } => RowState::Failed {
                status: supply.status,
                error: error.clone(),
            },
        }
    }

    /// Searched and sorted rows with their display state
    pub fn rows(&self) -> Vec<SupplyRow> {
        self.list
            .view()
            .into_iter()
            .map(|supply| {
                let state = self.state_of(&supply);
                SupplyRow { supply, state }
            })
            .collect()
    }

    /// Check the action locally and flip the row ahead of the server
    fn begin(&mut self, supply_id: Id, action: SupplyAction) -> ClientResult<ActionTicket> {
        self.session.require_admin()?;
        let supply = self
            .list
            .items()
            .iter()
            .find(|s| s.id == supply_id)
            .ok_or_else(|| ClientError::NotFound(format!("supply {}", supply_id)))?;

        let state = self.state_of(supply);
        let previous = state.status();
        if let RowState::Optimistic(_) = state {
            return Err(InvalidTransition {
                from: previous,
                action,
            }
            .into());
        }
        let next = previous.apply(action)?;

        let ticket = ActionTicket {
            request: ConfirmRequest::from(supply),
            action,
            previous,
            next,
            live: Arc::new(()),
        };
        self.rows.insert(
            supply_id,
            Overlay {
                state: RowState::Optimistic(next),
                epoch: self.list.epoch(),
                ticket: Some(Arc::downgrade(&ticket.live)),
            },
        );
        Ok(ticket)
    }

    pub fn begin_confirm(&mut self, supply_id: Id) -> ClientResult<ActionTicket> {
        self.begin(supply_id, SupplyAction::Confirm)
    }

    pub fn begin_reject(&mut self, supply_id: Id) -> ClientResult<ActionTicket> {
        self.begin(supply_id, SupplyAction::Reject)
    }

    /// Settle or flag the row with the action's result and notify
    pub fn complete<T>(&mut self, ticket: ActionTicket, result: ClientResult<T>) -> ClientResult<T> {
        let state = match &result {
            Ok(_) => {
                let message = match ticket.action {
                    SupplyAction::Confirm => {
                        self.language.pick("Поставку підтверджено", "Supply confirmed")
                    }
                    SupplyAction::Reject => self.language.pick("Поставку повернено", "Supply returned"),
                };
                self.notifier.notify(Notification::success(message));
                RowState::Settled(ticket.next)
            }
            Err(e) => {
                self.notifier.notify(Notification::from_error(e, self.language));
                RowState::Failed {
                    status: ticket.previous,
                    error: e.message(self.language),
                }
            }
        };
        self.rows.insert(
            ticket.supply_id(),
            Overlay {
                state,
                epoch: self.list.epoch(),
                ticket: None,
            },
        );
        result
    }

    /// Reload page 0 and forget overlays the server has caught up with
    pub async fn refresh(&mut self) -> ApplyOutcome {
        let outcome = self.list.refresh().await;
        if outcome == ApplyOutcome::Applied {
            let epoch = self.list.epoch();
            self.rows.retain(|_, overlay| match overlay.state {
                RowState::Failed { .. } => true,
                RowState::Optimistic(_) => overlay
                    .ticket
                    .as_ref()
                    .map_or(false, |t| t.strong_count() > 0),
                RowState::Settled(_) => overlay.epoch == epoch,
            });
        }
        outcome
    }

    /// Confirm a pending supply and reload the list
    pub async fn confirm(&mut self, supply_id: Id) -> ClientResult<ConfirmReport> {
        let ticket = self.begin_confirm(supply_id)?;
        let workflow = self.workflow();
        let result = workflow.confirm(ticket.request()).await;
        let result = self.complete(ticket, result);
        self.refresh().await;
        result
    }

    /// Return a pending supply and reload the list
    pub async fn reject(&mut self, supply_id: Id) -> ClientResult<()> {
        let ticket = self.begin_reject(supply_id)?;
        let workflow = self.workflow();
        let result = workflow.reject(ticket.supply_id()).await;
        let result = self.complete(ticket, result);
        self.refresh().await;
        result
    }
}
