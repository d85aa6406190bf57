use iced::widget::{button, column, container, image, row, slider, text, Space};
use iced::{Color, Element, Length, Theme};

use facewatch_core::overlay::thumbnail;
use facewatch_core::search::domain::types::DetectedFace;
use facewatch_core::shared::constants::FACE_THUMB_EDGE;

use crate::app::{scaled, App, Message, PreviewImage};
use crate::theme::{muted_color, surface_color, tertiary_color};
use crate::widgets::face_overlay_card::face_overlay_card;
use crate::widgets::{drop_zone, match_card};

const PREVIEW_MAX: f32 = 380.0;
const CARD_SPACING: f32 = 12.0;
const GRID_WIDTH: f32 = 620.0;

pub fn view<'a>(app: &'a App, theme: &Theme) -> Element<'a, Message> {
    let fs = app.settings.font_scale;
    let session = &app.session;
    let muted = muted_color(theme);

    let mut page = column![drop_zone::view(
        fs,
        theme,
        app.drop_zone_hovered,
        app.browse_hovered,
        app.preview.is_some(),
    )]
    .spacing(18);

    page = page.push(threshold_row(app, fs, theme));

    if let Some(notice) = &app.upload_notice {
        page = page.push(error_card(notice, fs, theme));
    }

    if let Some(preview) = &app.preview {
        page = page.push(
            image(preview.handle.clone())
                .width(Length::Fixed(PREVIEW_MAX))
                .height(Length::Fixed(PREVIEW_MAX))
                .content_fit(iced::ContentFit::Contain),
        );

        if session.needs_disambiguation() {
            page = page.push(overlay_picker(app, preview, fs, theme));
        }
    }

    if session.is_searching() {
        let status = match session.selected_face() {
            Some(index) => format!("Searching matches for face #{}\u{2026}", index + 1),
            None => "Uploading photo and detecting faces\u{2026}".to_string(),
        };
        page = page.push(
            container(text(status).size(scaled(14.0, fs)).color(muted))
                .width(Length::Fill)
                .padding(24)
                .align_x(iced::Alignment::Center),
        );
        return page.into();
    }

    if let Some(message) = session.error_message() {
        page = page.push(error_card(message, fs, theme));
        return page.into();
    }

    if session.no_faces_found() {
        page = page.push(notice_card(
            "No face detected in this photo. Try another one.",
            fs,
            theme,
        ));
        return page.into();
    }

    if session.needs_disambiguation() {
        page = page.push(
            column![
                text(format!("Faces detected: {}", session.faces_detected()))
                    .size(scaled(13.0, fs))
                    .color(muted),
                notice_card(
                    "Several faces were detected. Pick one above to see its matches.",
                    fs,
                    theme,
                ),
            ]
            .spacing(10),
        );
        return page.into();
    }

    if let Some((index, face)) = session.grid_face() {
        page = page.push(
            text(format!("Faces detected: {}", session.faces_detected()))
                .size(scaled(13.0, fs))
                .color(muted),
        );
        page = page.push(results_section(app, index, face, fs, theme));
    }

    page.into()
}

fn threshold_row<'a>(app: &'a App, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let surface = surface_color(theme);
    let threshold = app.session.threshold();

    // The slider stays live during a search; its value is snapshot into
    // the next issued request, never applied retroactively.
    let control = slider(0..=100u8, threshold, Message::ThresholdChanged)
        .on_release(Message::ThresholdReleased)
        .width(Length::Fill);

    container(
        row![
            text("Similarity threshold")
                .size(scaled(13.0, fs)),
            control,
            text(format!("{threshold}%"))
                .size(scaled(13.0, fs))
                .font(iced::Font {
                    weight: iced::font::Weight::Semibold,
                    ..iced::Font::DEFAULT
                })
                .width(44),
        ]
        .spacing(14)
        .align_y(iced::Alignment::Center),
    )
    .width(Length::Fill)
    .padding([10, 14])
    .style(move |_theme: &Theme| container::Style {
        background: Some(surface.into()),
        border: iced::border::Border {
            radius: 10.0.into(),
            ..iced::border::Border::default()
        },
        ..container::Style::default()
    })
    .into()
}

/// The disambiguation picker: one square overlay thumbnail per detected
/// face, projected from geometric metadata over the local preview.
fn overlay_picker<'a>(
    app: &'a App,
    preview: &'a PreviewImage,
    fs: f32,
    theme: &Theme,
) -> Element<'a, Message> {
    let cards: Vec<Element<'a, Message>> = app
        .session
        .faces()
        .iter()
        .enumerate()
        .filter_map(|(index, face)| {
            let bbox = face.bbox?;
            let spec = thumbnail::project(
                preview.natural_width as f32,
                preview.natural_height as f32,
                &bbox,
                FACE_THUMB_EDGE,
            )?;
            Some(face_overlay_card(
                &preview.handle,
                spec,
                index,
                app.hovered_overlay == Some(index),
                fs,
                theme,
            ))
        })
        .collect();

    column![
        text("Several faces detected")
            .size(scaled(16.0, fs))
            .font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..iced::Font::DEFAULT
            }),
        text("Choose the person to search for:")
            .size(scaled(13.0, fs))
            .color(tertiary_color(theme)),
        wrap_cards(cards, FACE_THUMB_EDGE + 8.0),
    ]
    .spacing(10)
    .into()
}

fn results_section<'a>(
    app: &'a App,
    face_index: usize,
    face: &'a DetectedFace,
    fs: f32,
    theme: &Theme,
) -> Element<'a, Message> {
    let mut header = row![text(format!("Results for face #{}", face_index + 1))
        .size(scaled(16.0, fs))
        .font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..iced::Font::DEFAULT
        })]
    .align_y(iced::Alignment::Center);

    if app.session.faces_detected() > 1 {
        header = header.push(Space::new().width(Length::Fill));
        header = header.push(
            button(text("\u{2190} Back to face choice").size(scaled(12.0, fs)))
                .on_press(Message::BackToFaceChoice)
                .padding([5, 12])
                .style(button::secondary),
        );
    }

    if face.matches.is_empty() {
        return column![
            header,
            notice_card(
                "No matches in the database for this face. Try lowering the similarity threshold.",
                fs,
                theme,
            ),
        ]
        .spacing(12)
        .into();
    }

    let cards: Vec<Element<'a, Message>> = face
        .matches
        .iter()
        .enumerate()
        .map(|(index, m)| {
            let photo = m.grid_path().and_then(|p| app.photo_state(p));
            match_card::match_card(
                index,
                m,
                photo,
                app.hovered_match == Some(index),
                fs,
                theme,
            )
        })
        .collect();

    column![header, wrap_cards(cards, match_card::CELL_WIDTH)]
        .spacing(12)
        .into()
}

fn wrap_cards(cards: Vec<Element<'_, Message>>, cell_width: f32) -> Element<'_, Message> {
    let per_row = ((GRID_WIDTH / (cell_width + CARD_SPACING)).floor() as usize).max(1);

    let mut rows_col = column![].spacing(CARD_SPACING);
    let mut current_row = row![].spacing(CARD_SPACING);
    let mut count_in_row = 0;

    for card in cards {
        current_row = current_row.push(card);
        count_in_row += 1;
        if count_in_row >= per_row {
            rows_col = rows_col.push(current_row);
            current_row = row![].spacing(CARD_SPACING);
            count_in_row = 0;
        }
    }
    if count_in_row > 0 {
        rows_col = rows_col.push(current_row);
    }

    rows_col.into()
}

fn error_card<'a>(message: &str, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let palette = theme.palette();
    let surface = surface_color(theme);

    container(
        column![
            text("Search failed").size(scaled(14.0, fs)).color(palette.danger).font(
                iced::Font {
                    weight: iced::font::Weight::Bold,
                    ..iced::Font::DEFAULT
                }
            ),
            text(message.to_string()).size(scaled(13.0, fs)),
        ]
        .spacing(4),
    )
    .width(Length::Fill)
    .padding(16)
    .style(move |_theme: &Theme| container::Style {
        background: Some(surface.into()),
        border: iced::border::Border {
            color: Color { a: 0.6, ..palette.danger },
            width: 1.5,
            radius: 10.0.into(),
        },
        ..container::Style::default()
    })
    .into()
}

fn notice_card<'a>(message: &str, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let surface = surface_color(theme);
    container(
        text(message.to_string())
            .size(scaled(13.0, fs))
            .color(muted_color(theme)),
    )
    .width(Length::Fill)
    .padding(18)
    .align_x(iced::Alignment::Center)
    .style(move |_theme: &Theme| container::Style {
        background: Some(surface.into()),
        border: iced::border::Border {
            radius: 10.0.into(),
            ..iced::border::Border::default()
        },
        ..container::Style::default()
    })
    .into()
}
