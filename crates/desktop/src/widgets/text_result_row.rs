use iced::widget::{button, column, container, row, text, Space};
use iced::{Color, Element, Length, Theme};

use facewatch_core::search::domain::types::TextResult;

use crate::app::{scaled, Message};
use crate::theme::{surface_color, tertiary_color};

/// One clickable text-search hit: group badge, sender, timestamp, snippet.
pub fn view<'a>(index: usize, result: &TextResult, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let palette = theme.palette();
    let tertiary = tertiary_color(theme);
    let surface = surface_color(theme);

    let group: Element<'a, Message> = container(
        text(result.group_name.clone().unwrap_or_else(|| "\u{2014}".into()))
            .size(scaled(11.0, fs))
            .color(Color::WHITE),
    )
    .padding([2, 8])
    .style(move |_theme: &Theme| container::Style {
        background: Some(palette.primary.into()),
        border: iced::border::Border {
            radius: 7.0.into(),
            ..iced::border::Border::default()
        },
        ..container::Style::default()
    })
    .into();

    let mut header = row![group].spacing(8).align_y(iced::Alignment::Center);
    if let Some(sender) = &result.sender_name {
        header = header.push(
            text(sender.clone())
                .size(scaled(12.0, fs))
                .font(iced::Font {
                    weight: iced::font::Weight::Semibold,
                    ..iced::Font::DEFAULT
                }),
        );
    }
    header = header.push(Space::new().width(Length::Fill));
    if let Some(timestamp) = result.timestamp {
        header = header.push(
            text(timestamp.format("%Y-%m-%d %H:%M").to_string())
                .size(scaled(11.0, fs))
                .color(tertiary),
        );
    }

    let body = column![header, text(result.text.clone()).size(scaled(13.0, fs))].spacing(6);

    button(
        container(body)
            .width(Length::Fill)
            .padding(12)
            .style(move |_theme: &Theme| container::Style {
                background: Some(surface.into()),
                border: iced::border::Border {
                    radius: 10.0.into(),
                    ..iced::border::Border::default()
                },
                ..container::Style::default()
            }),
    )
    .on_press(Message::OpenTextResult(index))
    .padding(0)
    .style(|_theme: &Theme, _status: button::Status| button::Style {
        background: None,
        border: iced::border::Border::default(),
        ..button::Style::default()
    })
    .width(Length::Fill)
    .into()
}
