//! End-to-end ticks through `Simulation` over a small bound scene.

use approx::assert_relative_eq;
use islet_sim::{
    Content, ContentCatalog, ControllerSettings, Cue, CursorStyle, Direction, DispatchOutcome,
    Iso, ModalState, PresentationRequest, SceneBindings, SceneNode, Simulation, TriangleMesh,
    Vec3, bind, physics::StepOutcome,
};
use nalgebra::Vector2;
use rstest::{fixture, rstest};

/// Center of the default view when the character stands at the origin.
const LOOK_AT: [f32; 3] = [0.0, 1.0, 2.0];

fn unit_box() -> TriangleMesh {
    TriangleMesh::cuboid(Vec3::zeros(), Vec3::repeat(0.5))
}

fn at(p: [f32; 3]) -> Iso {
    Iso::translation(p[0], p[1], p[2])
}

/// Floor at y = 0, hero at the origin, `centered` straight down the view
/// axis and `behind` further along the same ray.
fn scene_with(centered: &str, behind: &str, creatures: &[&str]) -> Simulation {
    let nodes = vec![
        SceneNode::group("island", None, Iso::identity()),
        SceneNode::mesh("ground", Some("island"), Iso::identity(), TriangleMesh::horizontal_quad(0.0, 30.0)),
        SceneNode::group("hero", None, Iso::identity()),
        SceneNode::mesh(centered, None, at(LOOK_AT), unit_box()),
        SceneNode::mesh(behind, None, at([0.0, -3.25, 8.0]), unit_box()),
    ];
    let catalog: ContentCatalog = [centered, behind]
        .into_iter()
        .filter(|name| !creatures.contains(name))
        .map(|name| {
            (
                name,
                Content {
                    title: name.to_uppercase(),
                    body: format!("About {name}"),
                    link: None,
                },
            )
        })
        .collect();
    let bindings = SceneBindings {
        environment: "island".into(),
        character: "hero".into(),
        creatures: creatures.iter().map(|c| c.to_string()).collect(),
        catalog,
    };
    let settings = ControllerSettings::default();
    let bound = bind(&nodes, &bindings, &settings).expect("scene binds");

    let mut sim = Simulation::new(settings);
    sim.load_scene(bound);
    sim
}

#[fixture]
fn creatures() -> Simulation {
    scene_with("bunny", "chicken", &["bunny", "chicken"])
}

#[fixture]
fn content() -> Simulation {
    scene_with("sign", "bunny", &["bunny"])
}

/// Tick once with the pointer parked off every object and return what was emitted.
fn settle(sim: &mut Simulation) -> Vec<PresentationRequest> {
    let mut out = Vec::new();
    sim.set_pointer(Vector2::new(0.9, 0.9), Default::default());
    sim.tick(&mut out);
    out
}

#[rstest]
fn forward_from_rest_applies_one_hop(mut creatures: Simulation) {
    let sim = &mut creatures;
    settle(sim);
    let character = sim.character().unwrap();
    assert!(character.on_floor);
    assert!(character.position.y.abs() < 1.0e-3);

    sim.set_direction(Direction::Forward, true);
    let mut out = Vec::new();
    let report = sim.tick(&mut out);

    let character = sim.character().unwrap();
    let settings = sim.settings();
    assert!(report.hopped);
    assert_relative_eq!(character.velocity.x, 0.0);
    assert_relative_eq!(character.velocity.y, settings.jump_speed_mps);
    assert_relative_eq!(character.velocity.z, settings.move_speed_mps);
    assert_eq!(character.target_yaw, 0.0);
    assert!(character.is_moving);
    assert_eq!(
        out,
        vec![PresentationRequest::PlayCue(Cue::Hop), PresentationRequest::PlayHop]
    );

    // Held input does nothing more until the hop lands.
    let report = sim.tick(&mut out);
    assert!(!report.hopped);
}

#[rstest]
fn focus_loss_releases_held_directions(mut creatures: Simulation) {
    let sim = &mut creatures;
    settle(sim);
    sim.set_direction(Direction::Left, true);
    sim.clear_input();

    let report = sim.tick(&mut Vec::new());

    assert!(!report.hopped);
    assert!(!sim.character().unwrap().is_moving);
}

#[test]
fn falling_off_the_world_respawns_at_spawn() {
    // Spawn over the void; the floor is off to the side.
    let nodes = vec![
        SceneNode::mesh("island", None, at([100.0, 0.0, 0.0]), TriangleMesh::horizontal_quad(0.0, 5.0)),
        SceneNode::group("hero", None, at([0.0, 2.0, 0.0])),
    ];
    let bindings = SceneBindings {
        environment: "island".into(),
        character: "hero".into(),
        ..Default::default()
    };
    let settings = ControllerSettings::default();
    let mut sim = Simulation::new(settings);
    sim.load_scene(bind(&nodes, &bindings, &settings).unwrap());

    let mut lowest = f32::MAX;
    let mut respawned = false;
    for _ in 0..200 {
        let report = sim.tick(&mut Vec::new());
        if report.step == Some(StepOutcome::Respawned) {
            respawned = true;
            break;
        }
        lowest = lowest.min(sim.character().unwrap().position.y);
    }

    let character = sim.character().unwrap();
    assert!(respawned);
    assert!(lowest < settings.respawn_depth);
    assert_eq!(character.position, Vec3::new(0.0, 2.0, 0.0));
    assert_eq!(character.velocity, Vec3::zeros());
    assert!(!character.is_moving);
    assert_eq!(
        sim.camera_pose().unwrap().position,
        Vec3::new(0.0, 2.0, 0.0) + settings.camera.offset
    );
}

#[rstest]
fn explicit_respawn_is_applied_at_the_next_tick(mut creatures: Simulation) {
    let sim = &mut creatures;
    settle(sim);
    sim.set_direction(Direction::Back, true);
    for _ in 0..5 {
        sim.tick(&mut Vec::new());
    }
    assert!(sim.character().unwrap().position.z < 0.0);

    sim.set_direction(Direction::Back, false);
    sim.request_respawn();
    sim.tick(&mut Vec::new());

    let character = sim.character().unwrap();
    assert!(character.position.norm() < 0.05);
    assert!(!character.is_moving);
}

#[rstest]
fn empty_pointer_resets_cursor_and_dispatches_nothing(mut creatures: Simulation) {
    let sim = &mut creatures;
    let mut out = Vec::new();
    sim.set_pointer(Vector2::zeros(), Default::default());
    sim.tick(&mut out);
    assert_eq!(sim.cursor(), CursorStyle::Pointer);
    assert_eq!(out, vec![PresentationRequest::SetCursor(CursorStyle::Pointer)]);

    out.clear();
    let empty = Vector2::new(0.9, 0.9);
    sim.set_pointer(empty, Default::default());
    assert!(sim.click(empty));
    let report = sim.tick(&mut out);

    assert_eq!(report.dispatch, Some(DispatchOutcome::Ignored));
    assert_eq!(sim.cursor(), CursorStyle::Default);
    assert_eq!(out, vec![PresentationRequest::SetCursor(CursorStyle::Default)]);
}

#[rstest]
fn hover_only_emits_cursor_changes(mut creatures: Simulation) {
    let sim = &mut creatures;
    sim.set_pointer(Vector2::zeros(), Default::default());
    let mut out = Vec::new();

    for _ in 0..5 {
        sim.tick(&mut out);
    }

    assert_eq!(out, vec![PresentationRequest::SetCursor(CursorStyle::Pointer)]);
    assert!(sim.dispatcher().lock().is_free());
}

#[rstest]
fn nearest_creature_gets_the_bounce(mut creatures: Simulation) {
    let sim = &mut creatures;
    settle(sim);

    sim.click(Vector2::zeros());
    let report = sim.tick(&mut Vec::new());

    assert_eq!(report.dispatch, Some(DispatchOutcome::BounceStarted("bunny".into())));
}

#[rstest]
fn creature_picks_are_dropped_until_the_bounce_finishes(mut creatures: Simulation) {
    let sim = &mut creatures;
    settle(sim);
    let mut out = Vec::new();

    sim.click(Vector2::zeros());
    sim.tick(&mut out);
    sim.click(Vector2::zeros());
    let second = sim.tick(&mut out);

    assert_eq!(second.dispatch, Some(DispatchOutcome::BounceDropped("bunny".into())));
    let bounces = out
        .iter()
        .filter(|r| matches!(r, PresentationRequest::PlayBounce(_)))
        .count();
    assert_eq!(bounces, 1);

    sim.finish_bounce();
    sim.click(Vector2::zeros());
    let third = sim.tick(&mut out);
    assert_eq!(third.dispatch, Some(DispatchOutcome::BounceStarted("bunny".into())));
}

#[rstest]
fn tap_then_synthetic_click_fires_once(mut creatures: Simulation) {
    let sim = &mut creatures;
    settle(sim);

    sim.tap(Vector2::zeros());
    assert!(!sim.click(Vector2::zeros()));
    let first = sim.tick(&mut Vec::new());
    sim.finish_bounce();
    let second = sim.tick(&mut Vec::new());

    assert_eq!(first.dispatch, Some(DispatchOutcome::BounceStarted("bunny".into())));
    assert_eq!(second.dispatch, None);
}

#[rstest]
fn open_modal_suppresses_picking_until_closed(mut content: Simulation) {
    let sim = &mut content;
    settle(sim);
    sim.set_pointer(Vector2::zeros(), Default::default());
    let mut out = Vec::new();

    sim.click(Vector2::zeros());
    let opened = sim.tick(&mut out);
    assert_eq!(opened.dispatch, Some(DispatchOutcome::ModalOpened("sign".into())));
    assert_eq!(sim.modal(), &ModalState::Shown("sign".into()));
    assert_eq!(
        out,
        vec![
            PresentationRequest::ShowModal("sign".into()),
            PresentationRequest::PlayCue(Cue::ModalOpen),
        ]
    );
    assert_eq!(sim.cursor(), CursorStyle::Default);

    out.clear();
    sim.click(Vector2::zeros());
    let suppressed = sim.tick(&mut out);
    assert_eq!(suppressed.dispatch, None);
    assert!(out.is_empty());

    sim.close_modal();
    sim.tick(&mut out);
    assert_eq!(
        out,
        vec![
            PresentationRequest::HideModal,
            PresentationRequest::PlayCue(Cue::ModalClose),
            PresentationRequest::SetCursor(CursorStyle::Pointer),
        ]
    );
    assert_eq!(sim.modal(), &ModalState::Hidden);
    assert_eq!(
        sim.dispatcher().catalog().get("sign").map(|c| c.title.as_str()),
        Some("SIGN")
    );
}

#[rstest]
#[case(Direction::Forward, Vec3::new(0.0, 0.0, 1.0))]
#[case(Direction::Back, Vec3::new(0.0, 0.0, -1.0))]
#[case(Direction::Left, Vec3::new(1.0, 0.0, 0.0))]
#[case(Direction::Right, Vec3::new(-1.0, 0.0, 0.0))]
fn camera_follows_a_hop_rigidly(#[case] direction: Direction, #[case] axis: Vec3) {
    let mut sim = scene_with("bunny", "chicken", &["bunny", "chicken"]);
    settle(&mut sim);
    sim.set_direction(direction, true);

    for _ in 0..10 {
        sim.tick(&mut Vec::new());
    }

    let position = sim.character().unwrap().position;
    let pose = sim.camera_pose().unwrap();
    assert!(position.dot(&axis) > 0.5);
    assert_relative_eq!(pose.position, position + sim.settings().camera.offset, epsilon = 1.0e-5);
    assert_relative_eq!(pose.target.y, pose.position.y - sim.settings().camera.look_drop, epsilon = 1.0e-5);
}
