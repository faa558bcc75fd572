use gate_roster::AuthorityRecord;
use thiserror::Error;

/// Literal recorded as the approver of a manual override.
pub const SYSTEM_APPROVER: &str = "System";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("{candidates} authorities match; select one before approving")]
    SelectionRequired { candidates: usize },
    #[error("no authority matches this purpose; deny or approve manually")]
    NoAuthority,
    #[error("authority {0} is not a candidate for this entry")]
    NotACandidate(u32),
    #[error("an authority matched; manual approval is only available when none does")]
    OverrideNotAllowed,
}

/// Who must sign off on an entry, as resolved from its purpose.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingApproval {
    NoMatch,
    SingleMatch { authority: AuthorityRecord },
    MultiMatch { candidates: Vec<AuthorityRecord> },
    Resolved { authority: AuthorityRecord },
}

impl PendingApproval {
    pub fn from_matches(mut matches: Vec<AuthorityRecord>) -> Self {
        match matches.len() {
            0 => Self::NoMatch,
            1 => Self::SingleMatch {
                authority: matches.remove(0),
            },
            _ => Self::MultiMatch {
                candidates: matches,
            },
        }
    }

    pub fn candidates(&self) -> &[AuthorityRecord] {
        match self {
            Self::NoMatch => &[],
            Self::SingleMatch { authority } | Self::Resolved { authority } => {
                std::slice::from_ref(authority)
            }
            Self::MultiMatch { candidates } => candidates,
        }
    }

    /// Records the operator's choice. Reselecting the chosen authority is a
    /// no-op; choosing anyone outside the candidates is rejected.
    pub fn select(self, authority_id: u32) -> Result<Self, ApprovalError> {
        let missing = match self {
            Self::NoMatch => ApprovalError::NoAuthority,
            _ => ApprovalError::NotACandidate(authority_id),
        };
        let chosen = self
            .candidates()
            .iter()
            .find(|candidate| candidate.id == authority_id)
            .cloned()
            .ok_or(missing)?;
        Ok(Self::Resolved { authority: chosen })
    }

    /// The authority an approval would be recorded under.
    pub fn approver(&self) -> Result<&AuthorityRecord, ApprovalError> {
        match self {
            Self::SingleMatch { authority } | Self::Resolved { authority } => Ok(authority),
            Self::MultiMatch { candidates } => Err(ApprovalError::SelectionRequired {
                candidates: candidates.len(),
            }),
            Self::NoMatch => Err(ApprovalError::NoAuthority),
        }
    }
}

/// Manual override approver, used only when no authority matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManualApprover {
    /// Recorded as the literal `"System"`.
    System,
    /// Recorded with no approver at all.
    Unattributed,
}

impl ManualApprover {
    pub fn approved_by(self) -> Option<String> {
        match self {
            Self::System => Some(SYSTEM_APPROVER.to_string()),
            Self::Unattributed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use gate_roster::Roster;

    use super::*;

    fn pending(purpose: &str) -> PendingApproval {
        let roster = Roster::builtin();
        PendingApproval::from_matches(roster.resolve(purpose).into_iter().cloned().collect())
    }

    #[test]
    fn match_count_selects_state() {
        assert_eq!(pending("pizza"), PendingApproval::NoMatch);
        assert!(matches!(pending("medical"), PendingApproval::SingleMatch { .. }));
        assert!(matches!(
            pending("emergency"),
            PendingApproval::MultiMatch { ref candidates } if candidates.len() == 2
        ));
    }

    #[test]
    fn multi_match_requires_explicit_selection() {
        let state = pending("emergency");
        assert_eq!(
            state.approver().map(|a| a.id),
            Err(ApprovalError::SelectionRequired { candidates: 2 })
        );

        let resolved = state.select(4).expect("select");
        assert_eq!(resolved.approver().map(|a| a.id), Ok(4));
        assert!(matches!(resolved, PendingApproval::Resolved { .. }));
    }

    #[test]
    fn selecting_outside_candidates_fails() {
        assert_eq!(
            pending("emergency").select(7),
            Err(ApprovalError::NotACandidate(7))
        );
        assert_eq!(pending("pizza").select(1), Err(ApprovalError::NoAuthority));
    }

    #[test]
    fn single_match_is_usable_without_selection() {
        let state = pending("medical");
        assert_eq!(state.approver().map(|a| a.name.as_str()), Ok("Dr. Sunita Singh"));

        let reselected = state.select(4).expect("reselect");
        assert_eq!(reselected.approver().map(|a| a.id), Ok(4));
    }

    #[test]
    fn manual_approvers_stay_distinct() {
        assert_eq!(ManualApprover::System.approved_by().as_deref(), Some("System"));
        assert_eq!(ManualApprover::Unattributed.approved_by(), None);
    }
}
