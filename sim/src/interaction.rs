/*!
Interaction dispatcher: routes a resolved pick to a creature bounce or a content modal.

State machine, run synchronously in the tick that resolved the pick:

```text
Idle ─pick→ Dispatching ─creature, lock free→ CreatureBounce ─BounceFinished→ Idle
                        ─content, modal hidden→ ContentModal ─ModalClosed→ Idle
                        ─anything else→ Idle
```

Notes
- One creature animates at a time across all creatures. Picks that arrive
  while the lock is held are dropped, never queued.
- Opening content that is already shown is a no-op.
*/

use std::collections::{BTreeMap, BTreeSet};

use crate::presentation::{ContentId, Cue, Presentation};

/// Single-flight gate for creature bounce animations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreatureAnimationLock {
    held_by: Option<String>,
}

impl CreatureAnimationLock {
    #[inline]
    pub fn is_free(&self) -> bool {
        self.held_by.is_none()
    }

    /// Creature whose bounce currently holds the lock.
    #[inline]
    pub fn holder(&self) -> Option<&str> {
        self.held_by.as_deref()
    }

    /// Take the lock for `creature`. Returns `false` if it was already held.
    pub fn try_acquire(&mut self, creature: &str) -> bool {
        if self.held_by.is_some() {
            return false;
        }
        self.held_by = Some(creature.to_owned());
        true
    }

    /// Free the lock. Releasing a free lock is logged and otherwise ignored.
    pub fn release(&mut self) {
        match self.held_by.take() {
            Some(creature) => log::debug!("bounce finished for {creature}"),
            None => log::warn!("creature animation lock released while free"),
        }
    }
}

/// Whether a content overlay is up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Hidden,
    Shown(ContentId),
}

impl ModalState {
    #[inline]
    pub fn is_shown(&self) -> bool {
        matches!(self, ModalState::Shown(_))
    }
}

/// Text shown by the modal collaborator for one content object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Content {
    pub title: String,
    pub body: String,
    /// Optional outbound link (project page, repository).
    pub link: Option<String>,
}

/// Owner name → content entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentCatalog {
    entries: BTreeMap<ContentId, Content>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the entry for `id`.
    pub fn insert(&mut self, id: impl Into<ContentId>, content: Content) -> &mut Self {
        self.entries.insert(id.into(), content);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Content> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<I: Into<ContentId>> FromIterator<(I, Content)> for ContentCatalog {
    fn from_iter<T: IntoIterator<Item = (I, Content)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(id, c)| (id.into(), c)).collect(),
        }
    }
}

/// How a picked name is classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Creature,
    Content,
    Ignored,
}

/// Result of one dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing was picked, or the name is not interactive.
    Ignored,
    BounceStarted(String),
    /// The lock was held by another bounce; the pick was dropped.
    BounceDropped(String),
    ModalOpened(ContentId),
    /// Content was already showing.
    ModalAlreadyShown,
}

/// Creature lock, modal state and the routing tables.
#[derive(Clone, Debug, Default)]
pub struct InteractionDispatcher {
    creatures: BTreeSet<String>,
    catalog: ContentCatalog,
    lock: CreatureAnimationLock,
    modal: ModalState,
}

impl InteractionDispatcher {
    pub fn new(creatures: impl IntoIterator<Item = impl Into<String>>, catalog: ContentCatalog) -> Self {
        Self {
            creatures: creatures.into_iter().map(Into::into).collect(),
            catalog,
            lock: CreatureAnimationLock::default(),
            modal: ModalState::Hidden,
        }
    }

    /// Creature names take precedence over content with the same name.
    pub fn route(&self, name: &str) -> Route {
        if self.creatures.contains(name) {
            Route::Creature
        } else if self.catalog.contains(name) {
            Route::Content
        } else {
            Route::Ignored
        }
    }

    /// Handle a resolved pick (`None` for an empty pick).
    pub fn dispatch(
        &mut self,
        picked: Option<&str>,
        presentation: &mut impl Presentation,
    ) -> DispatchOutcome {
        let Some(name) = picked else {
            return DispatchOutcome::Ignored;
        };

        match self.route(name) {
            Route::Creature => {
                if !self.lock.try_acquire(name) {
                    log::debug!(
                        "dropping pick on {name}: {} is still bouncing",
                        self.lock.holder().unwrap_or("another creature")
                    );
                    return DispatchOutcome::BounceDropped(name.to_owned());
                }
                presentation.play_cue(Cue::Creature(name.to_owned()));
                presentation.play_bounce(name);
                DispatchOutcome::BounceStarted(name.to_owned())
            }
            Route::Content => {
                if self.modal.is_shown() {
                    return DispatchOutcome::ModalAlreadyShown;
                }
                let id: ContentId = name.to_owned();
                presentation.show_modal(&id);
                presentation.play_cue(Cue::ModalOpen);
                self.modal = ModalState::Shown(id.clone());
                DispatchOutcome::ModalOpened(id)
            }
            Route::Ignored => DispatchOutcome::Ignored,
        }
    }

    /// The tween collaborator finished a bounce.
    pub fn finish_bounce(&mut self) {
        self.lock.release();
    }

    /// Hide the modal. Returns whether one was shown.
    pub fn close_modal(&mut self, presentation: &mut impl Presentation) -> bool {
        if !self.modal.is_shown() {
            return false;
        }
        self.modal = ModalState::Hidden;
        presentation.hide_modal();
        presentation.play_cue(Cue::ModalClose);
        true
    }

    #[inline]
    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    #[inline]
    pub fn lock(&self) -> &CreatureAnimationLock {
        &self.lock
    }

    #[inline]
    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }
}
