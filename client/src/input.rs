//! Platform input → simulation setters.
//!
//! Directions are level-triggered: every frame each direction is set to
//! whether its key or its on-screen d-pad button is held. Pointer moves,
//! clicks and taps are converted to NDC before they reach the simulation.

use bevy::{
    picking::{hover::HoverMap, pointer::PointerId},
    prelude::*,
    window::{CursorMoved, PrimaryWindow, WindowFocused},
};
use islet_sim::{Direction, PointerSource};
use leafwing_input_manager::prelude::*;
use nalgebra::Vector2;

use crate::simulation::{Sim, SimSet};

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    Forward,
    Back,
    Left,
    Right,
    Respawn,
    CloseModal,
    ToggleMute,
}

impl InputAction {
    fn held(direction: Direction) -> Self {
        match direction {
            Direction::Forward => InputAction::Forward,
            Direction::Back => InputAction::Back,
            Direction::Left => InputAction::Left,
            Direction::Right => InputAction::Right,
        }
    }
}

/// On-screen directional button.
#[derive(Component, Debug, Clone, Copy)]
pub struct DpadButton(pub Direction);

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let mut input_map = InputMap::<InputAction>::default();
    input_map.insert(InputAction::Forward, KeyCode::KeyW);
    input_map.insert(InputAction::Forward, KeyCode::ArrowUp);
    input_map.insert(InputAction::Back, KeyCode::KeyS);
    input_map.insert(InputAction::Back, KeyCode::ArrowDown);
    input_map.insert(InputAction::Left, KeyCode::KeyA);
    input_map.insert(InputAction::Left, KeyCode::ArrowLeft);
    input_map.insert(InputAction::Right, KeyCode::KeyD);
    input_map.insert(InputAction::Right, KeyCode::ArrowRight);
    input_map.insert(InputAction::Respawn, KeyCode::KeyR);
    input_map.insert(InputAction::CloseModal, KeyCode::Escape);
    input_map.insert(InputAction::ToggleMute, KeyCode::KeyM);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());

    app.add_systems(Startup, spawn_dpad);
    app.add_systems(
        Update,
        (
            apply_directions,
            release_on_focus_loss,
            apply_commands,
            track_pointer,
            apply_clicks,
        )
            .chain()
            .in_set(SimSet::Input),
    );
}

fn apply_directions(
    mut sim: ResMut<Sim>,
    actions: Res<ActionState<InputAction>>,
    dpad: Query<(&DpadButton, &Interaction)>,
) {
    for direction in Direction::ALL {
        let on_screen = dpad
            .iter()
            .any(|(button, interaction)| button.0 == direction && *interaction == Interaction::Pressed);
        sim.set_direction(direction, actions.pressed(&InputAction::held(direction)) || on_screen);
    }
}

fn release_on_focus_loss(mut sim: ResMut<Sim>, mut messages: MessageReader<WindowFocused>) {
    for message in messages.read() {
        if !message.focused {
            sim.clear_input();
        }
    }
}

fn apply_commands(mut sim: ResMut<Sim>, actions: Res<ActionState<InputAction>>) {
    if actions.just_pressed(&InputAction::Respawn) {
        sim.request_respawn();
    }
    if actions.just_pressed(&InputAction::CloseModal) {
        sim.close_modal();
    }
}

/// Window position (logical pixels, +Y down) to NDC (+Y up).
fn to_ndc(position: Vec2, window: &Window) -> Option<Vector2<f32>> {
    let (width, height) = (window.width(), window.height());
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some(Vector2::new(
        position.x / width * 2.0 - 1.0,
        1.0 - position.y / height * 2.0,
    ))
}

fn track_pointer(
    mut sim: ResMut<Sim>,
    mut moved: MessageReader<CursorMoved>,
    touches: Res<Touches>,
    window: Single<&Window, With<PrimaryWindow>>,
) {
    if let Some(ndc) = moved.read().last().and_then(|m| to_ndc(m.position, &window)) {
        sim.set_pointer(ndc, PointerSource::Mouse);
    }
    if let Some(ndc) = touches.iter().last().and_then(|t| to_ndc(t.position(), &window)) {
        sim.set_pointer(ndc, PointerSource::Touch);
    }
}

/// Whether `pointer` is over a UI button (or one of its children).
fn over_button(
    pointer: PointerId,
    hover: &HoverMap,
    buttons: &Query<(), With<Button>>,
    parents: &Query<&ChildOf>,
) -> bool {
    hover.get(&pointer).is_some_and(|hits| {
        hits.keys().any(|&hit| {
            std::iter::once(hit)
                .chain(parents.iter_ancestors(hit))
                .any(|entity| buttons.contains(entity))
        })
    })
}

fn apply_clicks(
    mut sim: ResMut<Sim>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    window: Single<&Window, With<PrimaryWindow>>,
    hover: Res<HoverMap>,
    buttons: Query<(), With<Button>>,
    parents: Query<&ChildOf>,
) {
    // Presses that land on UI buttons (d-pad, modal close) are not picks.
    // Each pointer is checked on its own, so a held d-pad doesn't block a tap elsewhere.
    for touch in touches.iter_just_pressed() {
        if over_button(PointerId::Touch(touch.id()), &hover, &buttons, &parents) {
            continue;
        }
        if let Some(ndc) = to_ndc(touch.position(), &window) {
            sim.tap(ndc);
        }
    }
    if mouse.just_pressed(MouseButton::Left)
        && !over_button(PointerId::Mouse, &hover, &buttons, &parents)
    {
        if let Some(ndc) = window.cursor_position().and_then(|p| to_ndc(p, &window)) {
            if !sim.click(ndc) {
                debug!("click swallowed after tap");
            }
        }
    }
}

fn spawn_dpad(mut commands: Commands) {
    let button = Node {
        width: Val::Px(56.0),
        height: Val::Px(56.0),
        align_items: AlignItems::Center,
        justify_content: JustifyContent::Center,
        ..default()
    };
    let font = TextFont::from_font_size(26.0);
    let layout = [
        (Direction::Forward, "▲", 0, 1),
        (Direction::Left, "◀", 1, 0),
        (Direction::Right, "▶", 1, 2),
        (Direction::Back, "▼", 2, 1),
    ];

    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: Val::Px(16.0),
            bottom: Val::Px(16.0),
            display: Display::Grid,
            grid_template_columns: RepeatedGridTrack::px(3, 56.0),
            grid_template_rows: RepeatedGridTrack::px(3, 56.0),
            row_gap: Val::Px(4.0),
            column_gap: Val::Px(4.0),
            ..default()
        })
        .with_children(|pad| {
            for (direction, label, row, column) in layout {
                pad.spawn((
                    Button,
                    DpadButton(direction),
                    Node {
                        grid_row: GridPlacement::start(row + 1),
                        grid_column: GridPlacement::start(column + 1),
                        ..button.clone()
                    },
                    BackgroundColor(Color::srgba(0.1, 0.12, 0.18, 0.55)),
                    BorderRadius::all(Val::Px(10.0)),
                ))
                .with_children(|b| {
                    b.spawn((Text::new(label), font.clone(), TextColor(Color::WHITE)));
                });
            }
        });
}
