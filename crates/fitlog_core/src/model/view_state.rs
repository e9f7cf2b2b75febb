//! Tracker screen view-state.
//!
//! One tagged state replaces independent edit/modal flags, so a modal can
//! never be open while the screen also claims to be in plain viewing mode.

use thiserror::Error;

/// In-progress observation entry held by the entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationDraft {
    /// `YYYY-MM-DD`, as picked by the date control.
    pub date: String,
    /// Raw text from the numeric field. Validated on record, not here.
    pub raw_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TrackerViewState {
    #[default]
    Viewing,
    /// Per-entry delete affordances are visible.
    Editing,
    ShowingModal(ObservationDraft),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {attempted} while {state}")]
pub struct ViewTransitionError {
    pub state: &'static str,
    pub attempted: &'static str,
}

impl TrackerViewState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Viewing => "viewing",
            Self::Editing => "editing",
            Self::ShowingModal(_) => "showing_modal",
        }
    }

    pub fn begin_edit(&mut self) -> Result<(), ViewTransitionError> {
        match self {
            Self::Viewing => {
                *self = Self::Editing;
                Ok(())
            }
            _ => Err(self.reject("begin_edit")),
        }
    }

    pub fn finish_edit(&mut self) -> Result<(), ViewTransitionError> {
        match self {
            Self::Editing => {
                *self = Self::Viewing;
                Ok(())
            }
            _ => Err(self.reject("finish_edit")),
        }
    }

    pub fn open_entry_form(&mut self, draft: ObservationDraft) -> Result<(), ViewTransitionError> {
        match self {
            Self::Viewing | Self::Editing => {
                *self = Self::ShowingModal(draft);
                Ok(())
            }
            Self::ShowingModal(_) => Err(self.reject("open_entry_form")),
        }
    }

    pub fn update_draft(
        &mut self,
        edit: impl FnOnce(&mut ObservationDraft),
    ) -> Result<(), ViewTransitionError> {
        match self {
            Self::ShowingModal(draft) => {
                edit(draft);
                Ok(())
            }
            _ => Err(self.reject("update_draft")),
        }
    }

    pub fn cancel(&mut self) -> Result<(), ViewTransitionError> {
        match self {
            Self::ShowingModal(_) => {
                *self = Self::Viewing;
                Ok(())
            }
            _ => Err(self.reject("cancel")),
        }
    }

    /// Closes the entry form and hands back the draft for recording.
    pub fn submit(&mut self) -> Result<ObservationDraft, ViewTransitionError> {
        match std::mem::take(self) {
            Self::ShowingModal(draft) => Ok(draft),
            other => {
                *self = other;
                Err(self.reject("submit"))
            }
        }
    }

    fn reject(&self, attempted: &'static str) -> ViewTransitionError {
        ViewTransitionError {
            state: self.label(),
            attempted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ObservationDraft, TrackerViewState};

    #[test]
    fn edit_mode_round_trip() {
        let mut state = TrackerViewState::default();
        state.begin_edit().unwrap();
        assert_eq!(state, TrackerViewState::Editing);
        state.finish_edit().unwrap();
        assert_eq!(state, TrackerViewState::Viewing);
    }

    #[test]
    fn submit_returns_draft_and_goes_back_to_viewing() {
        let mut state = TrackerViewState::Editing;
        state
            .open_entry_form(ObservationDraft {
                date: "2024-01-05".to_string(),
                raw_value: String::new(),
            })
            .unwrap();
        state
            .update_draft(|draft| draft.raw_value = "72.5".to_string())
            .unwrap();

        let draft = state.submit().unwrap();
        assert_eq!(draft.raw_value, "72.5");
        assert_eq!(state, TrackerViewState::Viewing);
    }

    #[test]
    fn illegal_transitions_leave_state_untouched() {
        let mut state = TrackerViewState::Editing;
        let err = state.submit().unwrap_err();
        assert_eq!(err.to_string(), "cannot submit while editing");
        assert_eq!(state, TrackerViewState::Editing);

        state
            .open_entry_form(ObservationDraft::default())
            .unwrap();
        assert!(state.begin_edit().is_err());
        assert!(state.open_entry_form(ObservationDraft::default()).is_err());
        assert!(matches!(state, TrackerViewState::ShowingModal(_)));

        state.cancel().unwrap();
        assert!(state.cancel().is_err());
    }
}
