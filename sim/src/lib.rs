/*!
Headless core of the islet scene: a hop-based character controller over a
static triangle mesh, a rigid follow camera, pointer picking, and the
interaction dispatcher that routes picks to creature bounces or content.

Everything here is deterministic and independent of the renderer. The client
crate feeds platform events into [`Simulation`], calls [`Simulation::tick`]
once per frame, and carries out the [`Presentation`] requests it receives.
*/

pub mod camera;
pub mod character;
pub mod collision;
pub mod constants;
pub mod input;
pub mod interaction;
pub mod movement;
pub mod orientation;
pub mod physics;
pub mod picking;
pub mod presentation;
pub mod scene;
pub mod settings;
pub mod simulation;

pub use camera::{CameraPose, Projection};
pub use character::CharacterState;
pub use collision::{Capsule, CollisionWorld, Iso, Point3, TriangleMesh, Vec3};
pub use input::{Direction, InputState, PointerSource, PointerState};
pub use interaction::{Content, ContentCatalog, DispatchOutcome, InteractionDispatcher, ModalState};
pub use presentation::{ContentId, Cue, CursorStyle, Presentation, PresentationRequest};
pub use scene::{BindError, BoundScene, SceneBindings, SceneNode, bind};
pub use settings::{CameraSettings, ControllerSettings};
pub use simulation::{BoundaryEvent, Simulation, TickReport};
