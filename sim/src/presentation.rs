//! Fire-and-forget requests from the simulation to the presentation side.
//!
//! The simulation never waits on or reads back anything it sends here. The
//! only thing flowing the other way is a bounce completion, reported through
//! [`crate::Simulation::finish_bounce`].

/// Identifier of a content entry (the owner name of the picked object).
pub type ContentId = String;

/// Sound cue ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Hop,
    /// Per-creature call, keyed by creature name.
    Creature(String),
    ModalOpen,
    ModalClose,
}

/// Pointer affordance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
}

/// Requests the core sends to its collaborators.
pub trait Presentation {
    fn show_modal(&mut self, content: &ContentId);
    fn hide_modal(&mut self);
    fn play_cue(&mut self, cue: Cue);
    fn set_cursor(&mut self, style: CursorStyle);
    /// Cosmetic hop on the character model.
    fn play_hop(&mut self);
    /// Start a creature's bounce; completion must be reported exactly once.
    fn play_bounce(&mut self, creature: &str);
}

/// A recorded presentation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresentationRequest {
    ShowModal(ContentId),
    HideModal,
    PlayCue(Cue),
    SetCursor(CursorStyle),
    PlayHop,
    PlayBounce(String),
}

/// Outbox: queue every request for the caller to drain after the tick.
impl Presentation for Vec<PresentationRequest> {
    fn show_modal(&mut self, content: &ContentId) {
        self.push(PresentationRequest::ShowModal(content.clone()));
    }

    fn hide_modal(&mut self) {
        self.push(PresentationRequest::HideModal);
    }

    fn play_cue(&mut self, cue: Cue) {
        self.push(PresentationRequest::PlayCue(cue));
    }

    fn set_cursor(&mut self, style: CursorStyle) {
        self.push(PresentationRequest::SetCursor(style));
    }

    fn play_hop(&mut self) {
        self.push(PresentationRequest::PlayHop);
    }

    fn play_bounce(&mut self, creature: &str) {
        self.push(PresentationRequest::PlayBounce(creature.to_owned()));
    }
}
