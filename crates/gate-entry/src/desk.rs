use gate_log::{Clock, KeyValueStore, NewVisit, VisitLogStore, VisitRecord};
use gate_roster::Roster;
use tracing::{info, warn};

use crate::approval::{ApprovalError, ManualApprover, PendingApproval};
use crate::form::{EntryDetails, EntryForm};
use crate::EntryResult;

/// A validated entry waiting on an approve/deny decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingEntry {
    details: EntryDetails,
    approval: PendingApproval,
}

impl PendingEntry {
    pub fn details(&self) -> &EntryDetails {
        &self.details
    }

    pub fn approval(&self) -> &PendingApproval {
        &self.approval
    }

    pub fn select(self, authority_id: u32) -> Result<Self, ApprovalError> {
        Ok(Self {
            approval: self.approval.select(authority_id)?,
            details: self.details,
        })
    }

    /// Dial URL of the authority an approval would be recorded under.
    pub fn call_url(&self) -> Option<String> {
        self.approval.approver().ok().map(|authority| authority.dial_url())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Approve,
    ManualApprove(ManualApprover),
    Deny,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryOutcome {
    Approved(VisitRecord),
    Denied { vehicle_number: String },
}

/// Runs the gate entry flow against one roster and one visit log.
pub struct EntryDesk<'a, S, C> {
    roster: &'a Roster,
    log: &'a VisitLogStore<S, C>,
}

impl<'a, S: KeyValueStore, C: Clock> EntryDesk<'a, S, C> {
    pub fn new(roster: &'a Roster, log: &'a VisitLogStore<S, C>) -> Self {
        Self { roster, log }
    }

    pub fn begin(&self, form: &EntryForm) -> EntryResult<PendingEntry> {
        let details = form.validate()?;
        let matches = self
            .roster
            .resolve(&details.purpose)
            .into_iter()
            .cloned()
            .collect();
        let approval = PendingApproval::from_matches(matches);
        info!(
            vehicle = %details.vehicle_number,
            purpose = %details.purpose,
            candidates = approval.candidates().len(),
            "entry awaiting decision"
        );
        Ok(PendingEntry { details, approval })
    }

    pub fn decide(&self, pending: PendingEntry, decision: Decision) -> EntryResult<EntryOutcome> {
        let approved_by = match decision {
            Decision::Deny => {
                warn!(vehicle = %pending.details.vehicle_number, "entry denied");
                return Ok(EntryOutcome::Denied {
                    vehicle_number: pending.details.vehicle_number,
                });
            }
            Decision::Approve => Some(pending.approval.approver()?.name.clone()),
            Decision::ManualApprove(manual) => {
                if pending.approval != PendingApproval::NoMatch {
                    return Err(ApprovalError::OverrideNotAllowed.into());
                }
                manual.approved_by()
            }
        };

        let record = self.log.record_entry(NewVisit {
            vehicle_number: pending.details.vehicle_number,
            names: pending.details.names,
            number_of_people: pending.details.number_of_people,
            purpose: pending.details.purpose,
            approved_by,
        })?;
        Ok(EntryOutcome::Approved(record))
    }
}
