//! Board mutation diffing
//!
//! Pure and synchronous: given the state before and after a mutation, decide
//! who should hear about it. Nobody is ever notified about their own action,
//! and a new assignee who was also added as a participant only gets the
//! assignment event.

use std::collections::HashSet;
use uuid::Uuid;

use crate::event::{BoardContext, NotificationEvent};

/// The notification-relevant fields of a board at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub assignee: Option<Uuid>,
    /// Stored order; treated as a set when diffing.
    pub participants: Vec<Uuid>,
}

impl BoardSnapshot {
    pub fn new(assignee: Option<Uuid>, participants: Vec<Uuid>) -> Self {
        Self {
            assignee,
            participants,
        }
    }
}

/// Which fields the caller explicitly asked to change.
///
/// A field that was not part of the request never produces events, even if
/// its value differs between snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedChanges {
    pub assignee: bool,
    pub participants: bool,
}

pub fn diff_board_mutation(
    actor_id: Uuid,
    before: &BoardSnapshot,
    after: &BoardSnapshot,
    changes: AppliedChanges,
    board: &BoardContext,
) -> Vec<NotificationEvent> {
    let mut events = Vec::new();

    if changes.assignee {
        if let Some(new_assignee) = after.assignee {
            if before.assignee != Some(new_assignee) && new_assignee != actor_id {
                events.push(NotificationEvent::board_assigned(
                    actor_id,
                    new_assignee,
                    board,
                ));
            }
        }
    }

    if changes.participants {
        let existing: HashSet<Uuid> = before.participants.iter().copied().collect();
        let mut seen = HashSet::new();

        for &participant in &after.participants {
            if existing.contains(&participant)
                || participant == actor_id
                || Some(participant) == after.assignee
                || !seen.insert(participant)
            {
                continue;
            }
            events.push(NotificationEvent::board_participant_added(
                actor_id,
                participant,
                board,
            ));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NotificationType;

    const BOTH: AppliedChanges = AppliedChanges {
        assignee: true,
        participants: true,
    };

    fn board() -> BoardContext {
        BoardContext::new(Uuid::new_v4(), Uuid::new_v4(), "Board", "Project")
    }

    fn summary(events: &[NotificationEvent]) -> Vec<(NotificationType, Uuid)> {
        events.iter().map(|e| (e.kind, e.target_user_id)).collect()
    }

    #[test]
    fn test_identical_snapshots_without_changes_produce_nothing() {
        let snapshot = BoardSnapshot::new(Some(Uuid::new_v4()), vec![Uuid::new_v4()]);

        let events = diff_board_mutation(
            Uuid::new_v4(),
            &snapshot,
            &snapshot,
            AppliedChanges::default(),
            &board(),
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_identical_snapshots_with_changes_produce_nothing() {
        let snapshot = BoardSnapshot::new(Some(Uuid::new_v4()), vec![Uuid::new_v4()]);

        let events = diff_board_mutation(Uuid::new_v4(), &snapshot, &snapshot, BOTH, &board());
        assert!(events.is_empty());
    }

    #[test]
    fn test_undeclared_changes_are_ignored() {
        let before = BoardSnapshot::default();
        let after = BoardSnapshot::new(Some(Uuid::new_v4()), vec![Uuid::new_v4()]);

        let events = diff_board_mutation(
            Uuid::new_v4(),
            &before,
            &after,
            AppliedChanges::default(),
            &board(),
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_self_assignment_is_silent() {
        let actor = Uuid::new_v4();
        let after = BoardSnapshot::new(Some(actor), vec![]);

        let events =
            diff_board_mutation(actor, &BoardSnapshot::default(), &after, BOTH, &board());
        assert!(events.is_empty());
    }

    #[test]
    fn test_unchanged_assignee_is_silent() {
        let assignee = Uuid::new_v4();
        let before = BoardSnapshot::new(Some(assignee), vec![]);
        let after = BoardSnapshot::new(Some(assignee), vec![]);

        let events = diff_board_mutation(Uuid::new_v4(), &before, &after, BOTH, &board());
        assert!(events.is_empty());
    }

    #[test]
    fn test_cleared_assignee_is_silent() {
        let before = BoardSnapshot::new(Some(Uuid::new_v4()), vec![]);

        let events = diff_board_mutation(
            Uuid::new_v4(),
            &before,
            &BoardSnapshot::default(),
            BOTH,
            &board(),
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_reassignment_notifies_new_assignee() {
        let new_assignee = Uuid::new_v4();
        let before = BoardSnapshot::new(Some(Uuid::new_v4()), vec![]);
        let after = BoardSnapshot::new(Some(new_assignee), vec![]);

        let events = diff_board_mutation(
            Uuid::new_v4(),
            &before,
            &after,
            AppliedChanges {
                assignee: true,
                participants: false,
            },
            &board(),
        );
        assert_eq!(
            summary(&events),
            vec![(NotificationType::BoardAssigned, new_assignee)]
        );
    }

    #[test]
    fn test_new_assignee_who_is_also_new_participant_gets_one_event() {
        let y = Uuid::new_v4();
        let after = BoardSnapshot::new(Some(y), vec![y]);

        let events = diff_board_mutation(
            Uuid::new_v4(),
            &BoardSnapshot::default(),
            &after,
            BOTH,
            &board(),
        );
        assert_eq!(summary(&events), vec![(NotificationType::BoardAssigned, y)]);
    }

    #[test]
    fn test_actor_adding_self_as_participant_is_silent() {
        let actor = Uuid::new_v4();
        let after = BoardSnapshot::new(None, vec![actor]);

        let events = diff_board_mutation(
            actor,
            &BoardSnapshot::default(),
            &after,
            BOTH,
            &board(),
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_duplicate_participants_notify_once() {
        let c = Uuid::new_v4();
        let after = BoardSnapshot::new(None, vec![c, c]);

        let events = diff_board_mutation(
            Uuid::new_v4(),
            &BoardSnapshot::default(),
            &after,
            BOTH,
            &board(),
        );
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_assign_and_add_participants_scenario() {
        let (a, b, c, z) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let before = BoardSnapshot::new(None, vec![a]);
        let after = BoardSnapshot::new(Some(b), vec![a, b, c]);
        let board = board();

        let events = diff_board_mutation(z, &before, &after, BOTH, &board);

        assert_eq!(
            summary(&events),
            vec![
                (NotificationType::BoardAssigned, b),
                (NotificationType::BoardParticipantAdded, c),
            ]
        );
        for event in &events {
            assert_eq!(event.actor_id, z);
            assert_eq!(event.resource_id, board.board_id);
            assert_eq!(event.workspace_id, board.workspace_id);
        }
    }
}
