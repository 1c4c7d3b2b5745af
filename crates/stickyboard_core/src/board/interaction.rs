//! Transient board interaction state machine.
//!
//! # Responsibility
//! - Track the in-progress create-drag, the note being moved, and whether
//!   that note currently hovers the trash target.
//! - Apply gesture transitions as a pure `reduce(state, action)` function.
//!
//! # Invariants
//! - Creating and moving are mutually exclusive by construction: the state
//!   is a single tagged mode, never independent flags.
//! - `over_trash` only exists while a note is being moved.
//! - Transitions that do not apply to the current mode return the state
//!   unchanged.

use crate::model::draft::CreateDraft;
use crate::model::note::NoteId;

/// Current interaction mode of the board.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    /// A create-drag is in progress.
    Creating(CreateDraft),
    /// A note is being move-dragged.
    Moving { note_id: NoteId, over_trash: bool },
}

/// Gesture transitions accepted by [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoardUiAction {
    /// Enters `Creating` with the given draft, replacing any prior mode.
    CreateStart(CreateDraft),
    /// Moves the live point of the active draft.
    CreateUpdate { current_x: f64, current_y: f64 },
    /// Ends a create gesture, with or without a note produced.
    CreateClear,
    /// Enters `Moving` for `note_id`, replacing any prior mode.
    DragStart { note_id: NoteId },
    /// Records whether the moving note currently hits the trash.
    DragOverTrash(bool),
    /// Ends a move gesture.
    DragStop,
}

impl Interaction {
    pub fn create_draft(&self) -> Option<&CreateDraft> {
        match self {
            Self::Creating(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn dragging_note_id(&self) -> Option<&NoteId> {
        match self {
            Self::Moving { note_id, .. } => Some(note_id),
            _ => None,
        }
    }

    pub fn is_over_trash(&self) -> bool {
        matches!(
            self,
            Self::Moving {
                over_trash: true,
                ..
            }
        )
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Applies one transition and returns the next state.
pub fn reduce(state: Interaction, action: BoardUiAction) -> Interaction {
    match (state, action) {
        (_, BoardUiAction::CreateStart(draft)) => Interaction::Creating(draft),
        (
            Interaction::Creating(draft),
            BoardUiAction::CreateUpdate {
                current_x,
                current_y,
            },
        ) => Interaction::Creating(draft.with_current(current_x, current_y)),
        (Interaction::Creating(_), BoardUiAction::CreateClear) => Interaction::Idle,
        (_, BoardUiAction::DragStart { note_id }) => Interaction::Moving {
            note_id,
            over_trash: false,
        },
        (Interaction::Moving { note_id, .. }, BoardUiAction::DragOverTrash(over_trash)) => {
            Interaction::Moving {
                note_id,
                over_trash,
            }
        }
        (Interaction::Moving { .. }, BoardUiAction::DragStop) => Interaction::Idle,
        (state, _) => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving(id: &str, over_trash: bool) -> Interaction {
        Interaction::Moving {
            note_id: NoteId::from(id),
            over_trash,
        }
    }

    #[test]
    fn initial_state_is_idle() {
        let state = Interaction::default();
        assert!(state.is_idle());
        assert_eq!(state.create_draft(), None);
        assert_eq!(state.dragging_note_id(), None);
        assert!(!state.is_over_trash());
    }

    #[test]
    fn create_gesture_cycles_back_to_idle() {
        let state = reduce(
            Interaction::Idle,
            BoardUiAction::CreateStart(CreateDraft::at(4.0, 8.0)),
        );
        let state = reduce(
            state,
            BoardUiAction::CreateUpdate {
                current_x: 40.0,
                current_y: 80.0,
            },
        );
        let draft = state.create_draft().copied().expect("draft should be active");
        assert_eq!((draft.start_x, draft.start_y), (4.0, 8.0));
        assert_eq!((draft.current_x, draft.current_y), (40.0, 80.0));

        assert_eq!(reduce(state, BoardUiAction::CreateClear), Interaction::Idle);
    }

    #[test]
    fn create_update_without_draft_leaves_state_unchanged() {
        let update = BoardUiAction::CreateUpdate {
            current_x: 1.0,
            current_y: 1.0,
        };
        assert_eq!(reduce(Interaction::Idle, update.clone()), Interaction::Idle);
        assert_eq!(reduce(moving("n1", true), update), moving("n1", true));
    }

    #[test]
    fn drag_stop_clears_note_and_trash_flag() {
        let state = reduce(
            Interaction::Idle,
            BoardUiAction::DragStart {
                note_id: NoteId::from("n1"),
            },
        );
        assert_eq!(state, moving("n1", false));

        let state = reduce(state, BoardUiAction::DragOverTrash(true));
        assert!(state.is_over_trash());

        let state = reduce(state, BoardUiAction::DragStop);
        assert_eq!(state.dragging_note_id(), None);
        assert!(!state.is_over_trash());
    }

    #[test]
    fn over_trash_is_ignored_outside_a_move() {
        assert_eq!(
            reduce(Interaction::Idle, BoardUiAction::DragOverTrash(true)),
            Interaction::Idle
        );
    }

    #[test]
    fn starting_one_gesture_replaces_the_other() {
        let creating = Interaction::Creating(CreateDraft::at(0.0, 0.0));
        let state = reduce(
            creating,
            BoardUiAction::DragStart {
                note_id: NoteId::from("n2"),
            },
        );
        assert_eq!(state, moving("n2", false));

        let state = reduce(state, BoardUiAction::CreateStart(CreateDraft::at(1.0, 1.0)));
        assert_eq!(state.dragging_note_id(), None);
        assert!(state.create_draft().is_some());
    }

    #[test]
    fn clears_do_not_cross_gestures() {
        assert_eq!(
            reduce(moving("n1", true), BoardUiAction::CreateClear),
            moving("n1", true)
        );
        let creating = Interaction::Creating(CreateDraft::at(3.0, 3.0));
        assert_eq!(
            reduce(creating.clone(), BoardUiAction::DragStop),
            creating
        );
    }
}
