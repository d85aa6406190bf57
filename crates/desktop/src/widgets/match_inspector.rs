use iced::widget::{
    button, center, column, container, image, mouse_area, opaque, row, scrollable, text, Space,
};
use iced::{Color, Element, Length, Theme};

use facewatch_core::search::domain::types::{ContextMessage, FaceMatch, TextResult};

use crate::app::{scaled, App, Message, PhotoState};
use crate::theme::{muted_color, surface_color, tertiary_color};

const CARD_WIDTH: f32 = 900.0;
const CARD_MAX_HEIGHT: f32 = 640.0;
const PHOTO_WIDTH: f32 = 320.0;
const CONTEXT_PHOTO_WIDTH: f32 = 200.0;

/// What the inspector is projecting. Purely a copy of already-fetched data;
/// nothing here triggers another search.
#[derive(Debug, Clone)]
pub enum InspectorItem {
    Match(FaceMatch),
    Text(TextResult),
}

impl InspectorItem {
    /// Every stored photo path the expanded view can render: the full
    /// photo plus embedded photos across the context window.
    pub fn match_photo_paths(m: &FaceMatch) -> Vec<String> {
        let mut paths: Vec<String> = Vec::new();
        if let Some(path) = m.inspector_path() {
            paths.push(path.to_string());
        }
        if let Some(ctx) = &m.context {
            let messages = ctx
                .before
                .iter()
                .chain(std::iter::once(&ctx.message))
                .chain(ctx.after.iter());
            paths.extend(messages.filter_map(|msg| msg.photo_path.clone()));
        }
        paths
    }
}

/// Modal overlay: dimmed backdrop dismisses on click, the card itself is
/// opaque so interacting with it never falls through to the backdrop.
pub fn view<'a>(item: &'a InspectorItem, app: &'a App, theme: &Theme) -> Element<'a, Message> {
    let fs = app.settings.font_scale;
    let surface = surface_color(theme);

    let body: Element<'a, Message> = match item {
        InspectorItem::Match(m) => match_body(m, app, fs, theme),
        InspectorItem::Text(t) => text_body(t, fs, theme),
    };

    let close = button(text("\u{00d7}").size(scaled(20.0, fs)))
        .on_press(Message::CloseInspector)
        .padding([2, 10])
        .style(button::text);

    let card = container(
        column![
            row![Space::new().width(Length::Fill), close],
            scrollable(body).height(Length::Shrink),
        ]
        .spacing(4),
    )
    .width(CARD_WIDTH)
    .max_height(CARD_MAX_HEIGHT)
    .padding(20)
    .style(move |_theme: &Theme| container::Style {
        background: Some(surface.into()),
        border: iced::border::Border {
            radius: 14.0.into(),
            ..iced::border::Border::default()
        },
        ..container::Style::default()
    });

    let backdrop = center(opaque(card)).style(|_theme: &Theme| container::Style {
        background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.8).into()),
        ..container::Style::default()
    });

    opaque(mouse_area(backdrop).on_press(Message::CloseInspector))
}

fn match_body<'a>(m: &'a FaceMatch, app: &'a App, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let palette = theme.palette();
    let muted = muted_color(theme);

    let mut left = column![].spacing(12).align_x(iced::Alignment::Center);

    if let Some(photo) = m.inspector_path().and_then(|p| app.photo_state(p)) {
        match photo {
            PhotoState::Ready(handle) => {
                left = left.push(
                    image(handle.clone())
                        .width(PHOTO_WIDTH)
                        .content_fit(iced::ContentFit::Contain),
                );
            }
            PhotoState::Loading => {
                left = left.push(loading_box(PHOTO_WIDTH));
            }
            // Failed loads are hidden entirely.
            PhotoState::Failed => {}
        }
    }

    let similarity_color = if m.similarity > 80.0 {
        palette.success
    } else {
        palette.warning
    };
    left = left.push(
        text(format!("Similarity: {}%", m.similarity.round() as u32))
            .size(scaled(20.0, fs))
            .color(similarity_color)
            .font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..iced::Font::DEFAULT
            }),
    );

    let person_label = m
        .person
        .as_ref()
        .map(|p| p.label())
        .unwrap_or_else(|| "Unidentified person".to_string());
    left = left.push(text(person_label).size(scaled(15.0, fs)).color(muted));

    let context: Element<'a, Message> = match &m.context {
        Some(ctx) => context_window(ctx, app, fs, theme),
        None => no_context_placeholder(fs, theme),
    };

    let right = column![
        text("Context")
            .size(scaled(16.0, fs))
            .font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..iced::Font::DEFAULT
            }),
        context,
    ]
    .spacing(10);

    row![
        container(left).width(Length::FillPortion(2)),
        container(right).width(Length::FillPortion(3)),
    ]
    .spacing(24)
    .into()
}

fn text_body<'a>(result: &'a TextResult, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);

    let mut header = row![].spacing(10).align_y(iced::Alignment::Center);
    if let Some(group) = &result.group_name {
        header = header.push(
            text(group.clone())
                .size(scaled(13.0, fs))
                .font(iced::Font {
                    weight: iced::font::Weight::Semibold,
                    ..iced::Font::DEFAULT
                }),
        );
    }
    if let Some(sender) = &result.sender_name {
        header = header.push(text(sender.clone()).size(scaled(13.0, fs)));
    }
    if let Some(timestamp) = result.timestamp {
        header = header.push(
            text(timestamp.format("%Y-%m-%d %H:%M").to_string())
                .size(scaled(12.0, fs))
                .color(tertiary),
        );
    }

    // Text hits carry no similarity and no context payload.
    column![
        header,
        text(result.text.clone()).size(scaled(14.0, fs)),
        no_context_placeholder(fs, theme),
    ]
    .spacing(14)
    .into()
}

fn context_window<'a>(
    ctx: &'a facewatch_core::search::domain::types::MessageContext,
    app: &'a App,
    fs: f32,
    theme: &Theme,
) -> Element<'a, Message> {
    let palette = theme.palette();

    let mut body = column![].spacing(10);

    if let Some(group) = &ctx.group_name {
        body = body.push(
            container(
                text(format!("Group: {group}"))
                    .size(scaled(12.0, fs))
                    .color(Color::WHITE),
            )
            .padding([3, 9])
            .style(move |_theme: &Theme| container::Style {
                background: Some(palette.primary.into()),
                border: iced::border::Border {
                    radius: 7.0.into(),
                    ..iced::border::Border::default()
                },
                ..container::Style::default()
            }),
        );
    }

    for msg in &ctx.before {
        body = body.push(context_message(msg, app, false, fs, theme));
    }
    body = body.push(context_message(&ctx.message, app, true, fs, theme));
    for msg in &ctx.after {
        body = body.push(context_message(msg, app, false, fs, theme));
    }

    container(body)
        .width(Length::Fill)
        .padding(14)
        .style(|_theme: &Theme| container::Style {
            background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.15).into()),
            border: iced::border::Border {
                radius: 10.0.into(),
                ..iced::border::Border::default()
            },
            ..container::Style::default()
        })
        .into()
}

/// One message in the window. The anchor gets a tinted highlight; the
/// surrounding messages stay muted.
fn context_message<'a>(
    msg: &'a ContextMessage,
    app: &'a App,
    is_anchor: bool,
    fs: f32,
    theme: &Theme,
) -> Element<'a, Message> {
    let palette = theme.palette();
    let muted = muted_color(theme);

    let mut lines = column![].spacing(4);

    if let Some(timestamp) = msg.timestamp {
        lines = lines.push(
            text(timestamp.format("%H:%M").to_string())
                .size(scaled(11.0, fs))
                .color(tertiary_color(theme)),
        );
    }

    let mut body_line = row![].spacing(5);
    if is_anchor {
        body_line = body_line.push(text("\u{2605}").size(scaled(12.0, fs)).color(palette.success));
    }
    if let Some(sender) = &msg.sender_name {
        body_line = body_line.push(
            text(format!("{sender}:"))
                .size(scaled(13.0, fs))
                .font(iced::Font {
                    weight: iced::font::Weight::Semibold,
                    ..iced::Font::DEFAULT
                }),
        );
    }
    match &msg.text {
        Some(message_text) => {
            body_line = body_line.push(
                text(message_text.clone())
                    .size(scaled(13.0, fs))
                    .color(if is_anchor { palette.text } else { muted }),
            );
        }
        None if msg.photo_path.is_none() && msg.has_photo => {
            body_line = body_line.push(
                text("\u{1F4F7} Photo (not archived)")
                    .size(scaled(13.0, fs))
                    .color(muted),
            );
        }
        None => {}
    }
    lines = lines.push(body_line);

    if let Some(photo) = msg.photo_path.as_deref().and_then(|p| app.photo_state(p)) {
        match photo {
            PhotoState::Ready(handle) => {
                lines = lines.push(
                    image(handle.clone())
                        .width(CONTEXT_PHOTO_WIDTH)
                        .content_fit(iced::ContentFit::Contain),
                );
            }
            PhotoState::Loading => {
                lines = lines.push(loading_box(CONTEXT_PHOTO_WIDTH));
            }
            PhotoState::Failed => {}
        }
    }

    let style = move |_theme: &Theme| {
        if is_anchor {
            container::Style {
                background: Some(Color { a: 0.15, ..palette.success }.into()),
                border: iced::border::Border {
                    radius: 8.0.into(),
                    ..iced::border::Border::default()
                },
                ..container::Style::default()
            }
        } else {
            container::Style::default()
        }
    };

    container(lines)
        .width(Length::Fill)
        .padding(if is_anchor { [10, 12] } else { [4, 12] })
        .style(style)
        .into()
}

fn no_context_placeholder<'a>(fs: f32, theme: &Theme) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);
    container(
        text("No database context for this result")
            .size(scaled(13.0, fs))
            .color(tertiary),
    )
    .width(Length::Fill)
    .padding(20)
    .align_x(iced::Alignment::Center)
    .style(|_theme: &Theme| container::Style {
        background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.1).into()),
        border: iced::border::Border {
            radius: 10.0.into(),
            ..iced::border::Border::default()
        },
        ..container::Style::default()
    })
    .into()
}

fn loading_box<'a>(width: f32) -> Element<'a, Message> {
    container(Space::new())
        .width(width)
        .height(width * 0.6)
        .style(|_theme: &Theme| container::Style {
            background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.25).into()),
            border: iced::border::Border {
                radius: 8.0.into(),
                ..iced::border::Border::default()
            },
            ..container::Style::default()
        })
        .into()
}
