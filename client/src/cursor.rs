use bevy::{
    prelude::*,
    window::{CursorEntered, CursorIcon, PrimaryWindow, SystemCursorIcon, WindowFocused},
};
use islet_sim::{CursorStyle, PresentationRequest};

use crate::simulation::{Presented, SimSet};

#[derive(Resource)]
struct CurrentCursor(CursorStyle);

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(CurrentCursor(CursorStyle::Default));

    app.add_systems(Update, read_cursor_requests.in_set(SimSet::Present));

    // Apply when our desired cursor changes
    app.add_systems(
        Update,
        apply_cursor
            .run_if(resource_changed::<CurrentCursor>)
            .after(read_cursor_requests),
    );

    // Re-apply on focus/enter to avoid OS/browser resets
    app.add_systems(Update, (reapply_on_focus, reapply_on_enter));
}

fn icon(style: CursorStyle) -> CursorIcon {
    match style {
        CursorStyle::Default => CursorIcon::System(SystemCursorIcon::Default),
        CursorStyle::Pointer => CursorIcon::System(SystemCursorIcon::Pointer),
    }
}

fn read_cursor_requests(mut presented: MessageReader<Presented>, mut current: ResMut<CurrentCursor>) {
    for Presented(request) in presented.read() {
        if let PresentationRequest::SetCursor(style) = request {
            current.0 = *style;
        }
    }
}

fn apply_cursor(
    mut commands: Commands,
    window: Single<Entity, With<PrimaryWindow>>,
    current: Res<CurrentCursor>,
) {
    commands.entity(*window).insert(icon(current.0));
}

fn reapply_on_focus(
    mut commands: Commands,
    mut messages: MessageReader<WindowFocused>,
    window: Single<Entity, With<PrimaryWindow>>,
    current: Res<CurrentCursor>,
) {
    for message in messages.read() {
        if message.focused {
            commands.entity(*window).insert(icon(current.0));
        }
    }
}

fn reapply_on_enter(
    mut commands: Commands,
    mut messages: MessageReader<CursorEntered>,
    window: Single<Entity, With<PrimaryWindow>>,
    current: Res<CurrentCursor>,
) {
    for _ in messages.read() {
        commands.entity(*window).insert(icon(current.0));
    }
}
