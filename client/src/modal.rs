//! Content overlay shown when a sign is picked.

use bevy::prelude::*;
use islet_sim::PresentationRequest;

use crate::simulation::{Presented, Sim, SimSet};

/// Root node of the overlay.
#[derive(Component)]
struct ModalRoot;

#[derive(Component)]
struct CloseButton;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, close_on_click.in_set(SimSet::Input));
    app.add_systems(Update, present_modal.in_set(SimSet::Present));
}

fn present_modal(
    mut commands: Commands,
    mut presented: MessageReader<Presented>,
    sim: Res<Sim>,
    open: Query<Entity, With<ModalRoot>>,
) {
    for Presented(request) in presented.read() {
        match request {
            PresentationRequest::ShowModal(id) => {
                let Some(content) = sim.dispatcher().catalog().get(id) else {
                    warn!("no content for {id}");
                    continue;
                };
                for entity in &open {
                    commands.entity(entity).despawn();
                }
                spawn_overlay(&mut commands, &content.title, &content.body, content.link.as_deref());
            }
            PresentationRequest::HideModal => {
                for entity in &open {
                    commands.entity(entity).despawn();
                }
            }
            _ => {}
        }
    }
}

fn spawn_overlay(commands: &mut Commands, title: &str, body: &str, link: Option<&str>) {
    commands
        .spawn((
            ModalRoot,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.45)),
        ))
        .with_children(|root| {
            root.spawn((
                Node {
                    max_width: Val::Px(480.0),
                    padding: UiRect::all(Val::Px(20.0)),
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(12.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.97, 0.95, 0.9, 1.0)),
                BorderRadius::all(Val::Px(12.0)),
            ))
            .with_children(|card| {
                let ink = TextColor(Color::srgb(0.12, 0.12, 0.15));
                card.spawn((Text::new(title), TextFont::from_font_size(28.0), ink));
                card.spawn((Text::new(body), TextFont::from_font_size(18.0), ink));
                if let Some(link) = link {
                    card.spawn((
                        Text::new(link),
                        TextFont::from_font_size(16.0),
                        TextColor(Color::srgb(0.15, 0.35, 0.8)),
                    ));
                }
                card.spawn((
                    Button,
                    CloseButton,
                    Node {
                        padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                        align_self: AlignSelf::End,
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.2, 0.45, 0.85)),
                    BorderRadius::all(Val::Px(6.0)),
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new("Close"),
                        TextFont::from_font_size(16.0),
                        TextColor(Color::WHITE),
                    ));
                });
            });
        });
}

fn close_on_click(mut sim: ResMut<Sim>, buttons: Query<&Interaction, (Changed<Interaction>, With<CloseButton>)>) {
    if buttons.iter().any(|interaction| *interaction == Interaction::Pressed) {
        sim.close_modal();
    }
}
