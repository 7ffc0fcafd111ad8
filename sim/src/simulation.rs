/*!
The simulation context and its per-frame tick.

[`Simulation`] owns every piece of gameplay state: the bound scene, the
character, input and pointer state, and the interaction dispatcher. Platform
events only write through its setters; asynchronous completions (scene load,
bounce finished, modal closed, respawn command) are queued as
[`BoundaryEvent`]s and applied at the start of the next tick.

Tick order
1. Apply queued boundary events.
2. Physics step and yaw smoothing. A respawn ends the character's update for
   this tick, so no movement impulse follows it.
3. Held-input movement impulse.
4. Pointer: resolve a queued click and dispatch it, then refresh the hover cursor.
5. Camera follow.

Until a scene is bound, ticks only apply events and discard queued clicks.
*/

use std::collections::VecDeque;

use nalgebra::Vector2;

use crate::{
    camera::{CameraPose, follow},
    character::CharacterState,
    collision::CollisionWorld,
    input::{Direction, InputState, PointerSource, PointerState},
    interaction::{DispatchOutcome, InteractionDispatcher, ModalState},
    movement::apply_held_input,
    physics::{StepOutcome, smooth_facing, step},
    picking::{CameraView, InteractableRegistry, pick},
    presentation::{Cue, CursorStyle, Presentation},
    scene::BoundScene,
    settings::ControllerSettings,
};

/// Completion or command delivered from outside the tick.
pub enum BoundaryEvent {
    /// Assets loaded and bound; replaces any previous scene.
    SceneLoaded(Box<BoundScene>),
    /// The tween collaborator finished the current creature bounce.
    BounceFinished,
    /// The user dismissed the content overlay.
    ModalClosed,
    /// Explicit respawn command.
    Respawn,
}

/// What one tick did, for logging and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub step: Option<StepOutcome>,
    /// A hop impulse was applied.
    pub hopped: bool,
    /// Result of dispatching this tick's click, if there was one.
    pub dispatch: Option<DispatchOutcome>,
}

struct LoadedScene {
    world: CollisionWorld,
    registry: InteractableRegistry,
    character: CharacterState,
}

/// Explicit simulation context driven by one `tick` per rendered frame.
pub struct Simulation {
    settings: ControllerSettings,
    scene: Option<LoadedScene>,
    dispatcher: InteractionDispatcher,
    input: InputState,
    pointer: PointerState,
    cursor: CursorStyle,
    camera: Option<CameraPose>,
    events: VecDeque<BoundaryEvent>,
}

impl Simulation {
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            settings,
            scene: None,
            dispatcher: InteractionDispatcher::default(),
            input: InputState::default(),
            pointer: PointerState::default(),
            cursor: CursorStyle::Default,
            camera: None,
            events: VecDeque::new(),
        }
    }

    /// Queue an event for the start of the next tick.
    pub fn push_event(&mut self, event: BoundaryEvent) {
        self.events.push_back(event);
    }

    pub fn load_scene(&mut self, scene: BoundScene) {
        self.push_event(BoundaryEvent::SceneLoaded(Box::new(scene)));
    }

    pub fn request_respawn(&mut self) {
        self.push_event(BoundaryEvent::Respawn);
    }

    pub fn finish_bounce(&mut self) {
        self.push_event(BoundaryEvent::BounceFinished);
    }

    pub fn close_modal(&mut self) {
        self.push_event(BoundaryEvent::ModalClosed);
    }

    #[inline]
    pub fn set_direction(&mut self, direction: Direction, held: bool) {
        self.input.set(direction, held);
    }

    /// Release every direction (focus loss).
    #[inline]
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    #[inline]
    pub fn set_pointer(&mut self, ndc: Vector2<f32>, source: PointerSource) {
        self.pointer.move_to(ndc, source);
    }

    /// Mouse click; returns `false` if it was swallowed as a tap echo.
    #[inline]
    pub fn click(&mut self, ndc: Vector2<f32>) -> bool {
        self.pointer.click(ndc)
    }

    #[inline]
    pub fn tap(&mut self, ndc: Vector2<f32>) {
        self.pointer.tap(ndc);
    }

    /// Keep the picking projection in sync with the viewport.
    pub fn set_viewport_aspect(&mut self, aspect: f32) {
        let camera = &mut self.settings.camera;
        camera.projection = camera.projection.with_aspect(aspect);
    }

    /// Advance one frame.
    pub fn tick(&mut self, presentation: &mut impl Presentation) -> TickReport {
        self.apply_events(presentation);

        let mut report = TickReport::default();
        let Some(scene) = self.scene.as_mut() else {
            self.pointer.take_click();
            return report;
        };
        let settings = &self.settings;

        let outcome = step(&mut scene.character, &scene.world, settings);
        report.step = Some(outcome);
        if outcome != StepOutcome::Respawned {
            smooth_facing(&mut scene.character, settings);
            if apply_held_input(&mut scene.character, &self.input, settings) {
                presentation.play_cue(Cue::Hop);
                presentation.play_hop();
                report.hopped = true;
            }
        }

        // Rays go through the camera the user is looking at, i.e. last frame's.
        let pose = self
            .camera
            .unwrap_or_else(|| follow(scene.character.position, &settings.camera));
        let view = CameraView::new(pose, settings.camera.projection);
        let reach = settings.camera.max_pick_distance;

        if let Some(ndc) = self.pointer.take_click() {
            if !self.dispatcher.modal().is_shown() {
                let picked = pick(ndc, &view, &scene.registry, reach);
                let outcome = self.dispatcher.dispatch(picked, presentation);
                log::debug!("click at {ndc:?} picked {picked:?}: {outcome:?}");
                report.dispatch = Some(outcome);
            }
        }

        let hover = if self.dispatcher.modal().is_shown() {
            CursorStyle::Default
        } else {
            match pick(self.pointer.ndc, &view, &scene.registry, reach) {
                Some(_) => CursorStyle::Pointer,
                None => CursorStyle::Default,
            }
        };
        if hover != self.cursor {
            self.cursor = hover;
            presentation.set_cursor(hover);
        }

        self.camera = Some(follow(scene.character.position, &settings.camera));
        report
    }

    fn apply_events(&mut self, presentation: &mut impl Presentation) {
        while let Some(event) = self.events.pop_front() {
            match event {
                BoundaryEvent::SceneLoaded(bound) => {
                    let BoundScene {
                        world,
                        character,
                        registry,
                        creatures,
                        catalog,
                    } = *bound;
                    self.dispatcher = InteractionDispatcher::new(creatures, catalog);
                    self.camera = Some(follow(character.position, &self.settings.camera));
                    self.scene = Some(LoadedScene {
                        world,
                        registry,
                        character,
                    });
                    log::debug!("scene loaded");
                }
                BoundaryEvent::BounceFinished => self.dispatcher.finish_bounce(),
                BoundaryEvent::ModalClosed => {
                    self.dispatcher.close_modal(presentation);
                }
                BoundaryEvent::Respawn => match self.scene.as_mut() {
                    Some(scene) => {
                        log::debug!("respawn requested");
                        scene.character.respawn();
                    }
                    None => log::debug!("respawn requested before the scene loaded"),
                },
            }
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.scene.is_some()
    }

    pub fn character(&self) -> Option<&CharacterState> {
        self.scene.as_ref().map(|scene| &scene.character)
    }

    /// Camera pose published by the last tick.
    pub fn camera_pose(&self) -> Option<CameraPose> {
        self.camera
    }

    #[inline]
    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    #[inline]
    pub fn modal(&self) -> &ModalState {
        self.dispatcher.modal()
    }

    #[inline]
    pub fn dispatcher(&self) -> &InteractionDispatcher {
        &self.dispatcher
    }

    #[inline]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[inline]
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(ControllerSettings::default())
    }
}
