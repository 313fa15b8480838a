use strum_macros::{Display, EnumIter};

/// Phases of the mission, in flight order.
///
/// Only the mission sequencer ever writes the active phase. Transitions run forward only;
/// `Insertion` and `Correction` are alternative branches out of `Coast`.
#[derive(Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionPhase {
    Ascent,
    Transfer,
    Coast,
    Insertion,
    Correction,
    Reentry,
    Descent,
    Landed,
}

impl MissionPhase {
    /// Whether `next` may directly follow `self`.
    pub fn can_transition_to(self, next: MissionPhase) -> bool {
        matches!(
            (self, next),
            (Self::Ascent, Self::Transfer)
                | (Self::Transfer, Self::Coast)
                | (Self::Coast, Self::Insertion | Self::Correction | Self::Reentry)
                | (Self::Correction, Self::Reentry)
                | (Self::Reentry, Self::Descent)
                | (Self::Descent, Self::Landed)
        )
    }
}
