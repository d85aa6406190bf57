use std::time::Duration;

use iced::widget::{button, column, container, image, mouse_area, row, stack, text, Space};
use iced::{Color, Element, Length, Theme};
use iced_anim::transition::Easing;
use iced_anim::AnimationBuilder;

use facewatch_core::search::domain::types::FaceMatch;

use crate::app::{scaled, Message, PhotoState};
use crate::theme::surface_color;

const CORNER_RADIUS: f32 = 10.0;
const BORDER_WIDTH: f32 = 1.5;
const BADGE_RADIUS: f32 = 7.0;
const SCALE_GROW: f32 = 2.0;
const ANIMATION_DURATION: Duration = Duration::from_millis(180);

/// Outer footprint of one grid cell (fixed, never changes with hover).
pub const CELL_WIDTH: f32 = 136.0;
const IMG_SIZE: f32 = CELL_WIDTH - BORDER_WIDTH * 4.0 - 8.0;

/// One cell in the match grid: photo, similarity badge, person label.
/// A failed photo renders as a plain surface square; broken images are
/// hidden, never shown as a placeholder glyph.
pub fn match_card<'a>(
    index: usize,
    m: &FaceMatch,
    photo: Option<&PhotoState>,
    hovered: bool,
    fs: f32,
    theme: &Theme,
) -> Element<'a, Message> {
    let palette = theme.palette();
    let surface = surface_color(theme);
    let similarity = m.similarity;
    let label = m
        .person
        .as_ref()
        .map(|p| p.label())
        .unwrap_or_else(|| "Unidentified person".to_string());
    let handle = match photo {
        Some(PhotoState::Ready(handle)) => Some(handle.clone()),
        _ => None,
    };

    let target = if hovered { 1.0_f32 } else { 0.0 };

    let animated: Element<'a, Message> = AnimationBuilder::new(target, move |t: f32| {
        let t = t.clamp(0.0, 1.0);
        build_card(
            index,
            similarity,
            label.clone(),
            handle.clone(),
            t,
            palette,
            surface,
            fs,
        )
    })
    .animates_layout(true)
    .animation(Easing::EASE_OUT.with_duration(ANIMATION_DURATION))
    .into();

    // Fixed-size outer container establishes the grid footprint; the
    // animated card inside may overflow it slightly while hovered.
    container(
        mouse_area(animated)
            .on_enter(Message::MatchHover(index, true))
            .on_exit(Message::MatchHover(index, false)),
    )
    .width(CELL_WIDTH)
    .center_x(CELL_WIDTH)
    .into()
}

#[allow(clippy::too_many_arguments)]
fn build_card<'a>(
    index: usize,
    similarity: f32,
    label: String,
    handle: Option<image::Handle>,
    hover_amount: f32,
    palette: iced::theme::Palette,
    surface: Color,
    fs: f32,
) -> Element<'a, Message> {
    let grow = SCALE_GROW * hover_amount;
    let img_size = IMG_SIZE + grow * 2.0;

    let photo: Element<'a, Message> = match handle {
        Some(handle) => image(handle)
            .width(img_size)
            .height(img_size)
            .content_fit(iced::ContentFit::Cover)
            .border_radius(CORNER_RADIUS - BORDER_WIDTH)
            .into(),
        // Loading or failed: a plain dark square, no broken-image glyph.
        None => container(Space::new())
            .width(img_size)
            .height(img_size)
            .style(move |_theme: &Theme| container::Style {
                background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.35).into()),
                border: iced::border::Border {
                    radius: (CORNER_RADIUS - BORDER_WIDTH).into(),
                    ..iced::border::Border::default()
                },
                ..container::Style::default()
            })
            .into(),
    };

    let badge_color = if similarity > 80.0 {
        palette.success
    } else if similarity > 60.0 {
        palette.warning
    } else {
        Color {
            a: 0.85,
            ..palette.text
        }
    };

    let badge: Element<'a, Message> = container(
        text(format!("{}%", similarity.round() as u32))
            .size(scaled(11.0, fs))
            .color(Color::WHITE)
            .font(iced::Font {
                weight: iced::font::Weight::Semibold,
                ..iced::Font::DEFAULT
            }),
    )
    .padding([2, 6])
    .style(move |_theme: &Theme| container::Style {
        background: Some(badge_color.into()),
        border: iced::border::Border {
            radius: BADGE_RADIUS.into(),
            ..iced::border::Border::default()
        },
        ..container::Style::default()
    })
    .into();

    let badge_overlay = container(row![Space::new().width(Length::Fill), badge])
        .width(Length::Fill)
        .padding(5);

    let photo_stack = stack![photo, badge_overlay];

    let name = text(label)
        .size(scaled(12.0, fs))
        .align_x(iced::Alignment::Center)
        .width(Length::Fill);

    let content = column![photo_stack, name]
        .spacing(5)
        .align_x(iced::Alignment::Center);

    let btn = button(content)
        .on_press(Message::OpenMatch(index))
        .padding(4)
        .style(|_theme: &Theme, _status: button::Status| button::Style {
            background: None,
            border: iced::border::Border::default(),
            ..button::Style::default()
        });

    let border_alpha = 0.12 + 0.35 * hover_amount;
    container(btn)
        .style(move |_theme: &Theme| container::Style {
            background: Some(surface.into()),
            border: iced::border::Border {
                color: Color {
                    a: border_alpha,
                    ..palette.text
                },
                width: BORDER_WIDTH,
                radius: CORNER_RADIUS.into(),
            },
            ..container::Style::default()
        })
        .into()
}
