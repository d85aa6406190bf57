use iced::widget::{column, text, Space};
use iced::{Element, Theme};

use crate::app::{scaled, Message};
use crate::theme::tertiary_color;

pub fn view<'a>(fs: f32, theme: &Theme) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);

    column![
        text("FaceWatch").size(scaled(22.0, fs)).font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..iced::Font::DEFAULT
        }),
        text(format!("Version {}", env!("CARGO_PKG_VERSION")))
            .size(scaled(12.0, fs))
            .color(tertiary),
        Space::new().height(12),
        text("Operator console for searching an archived photo and message\ncollection by face or by text.")
            .size(scaled(13.0, fs)),
        Space::new().height(6),
        text("Face detection and matching run on the backend recognition\nservice; this console only uploads the query photo and renders\nthe ranked results.")
            .size(scaled(12.0, fs))
            .color(tertiary),
    ]
    .spacing(4)
    .into()
}
