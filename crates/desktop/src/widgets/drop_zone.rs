use iced::widget::{button, column, container, row, text, Space};
use iced::{Color, Element, Length, Theme};

use crate::app::{scaled, Message};
use crate::theme::{surface_color, tertiary_color};

/// Upload call-to-action: drop target plus a browse button. File drops land
/// through window events, so the whole zone only needs hover styling here.
pub fn view<'a>(
    fs: f32,
    theme: &Theme,
    drop_hovered: bool,
    browse_hovered: bool,
    compact: bool,
) -> Element<'a, Message> {
    let palette = theme.palette();
    let tertiary = tertiary_color(theme);
    let accent = palette.primary;

    let border_color = if drop_hovered {
        Color { a: 0.55, ..accent }
    } else {
        Color {
            a: 0.20,
            ..palette.text
        }
    };
    let bg_color = if drop_hovered {
        Color { a: 0.06, ..accent }
    } else {
        surface_color(theme)
    };

    let browse_btn = button(
        row![
            text("\u{1F4C2}").size(scaled(14.0, fs)),
            text("Browse Files")
                .size(scaled(14.0, fs))
                .color(Color::WHITE),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center),
    )
    .on_press(Message::BrowsePhoto)
    .padding([8, 20])
    .style(move |theme: &Theme, status: button::Status| {
        let status = if browse_hovered {
            button::Status::Hovered
        } else {
            status
        };
        let mut base = button::primary(theme, status);
        base.border.radius = 8.0.into();
        base
    });

    let browse_btn = iced::widget::mouse_area(browse_btn)
        .on_enter(Message::BrowseHover(true))
        .on_exit(Message::BrowseHover(false));

    let inner: Element<'a, Message> = if compact {
        // A photo is already loaded; keep the zone short.
        row![
            text("\u{1F4F8}").size(scaled(16.0, fs)),
            text("Drop another photo to start a new search")
                .size(scaled(14.0, fs))
                .color(tertiary),
            Space::new().width(Length::Fill),
            browse_btn,
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center)
        .into()
    } else {
        column![
            text("\u{1F4F8}").size(scaled(26.0, fs)),
            Space::new().height(10),
            text("Drop a photo here to search the face database")
                .size(scaled(17.0, fs))
                .font(iced::Font {
                    weight: iced::font::Weight::Bold,
                    ..iced::Font::DEFAULT
                }),
            Space::new().height(6),
            text("or click to browse your computer")
                .size(scaled(14.0, fs))
                .color(tertiary),
            Space::new().height(16),
            browse_btn,
            Space::new().height(12),
            text("JPG, PNG, BMP, TIFF, WEBP")
                .size(scaled(12.0, fs))
                .color(tertiary),
        ]
        .align_x(iced::Alignment::Center)
        .into()
    };

    let zone = container(inner)
        .width(Length::Fill)
        .padding(if compact { [14, 20] } else { [36, 40] })
        .style(move |_theme: &Theme| container::Style {
            background: Some(bg_color.into()),
            border: iced::border::Border {
                color: border_color,
                width: 2.0,
                radius: 14.0.into(),
            },
            ..container::Style::default()
        });

    iced::widget::mouse_area(zone)
        .on_enter(Message::DropZoneHover(true))
        .on_exit(Message::DropZoneHover(false))
        .into()
}
