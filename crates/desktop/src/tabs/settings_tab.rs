use iced::widget::{button, checkbox, column, pick_list, row, slider, text, text_input, toggler, Space};
use iced::{Element, Length};

use facewatch_core::auth::credential_context::CredentialContext;

use crate::app::{scaled, Message};
use crate::settings::{Appearance, Settings};

pub fn view<'a>(settings: &'a Settings, credential: &CredentialContext) -> Element<'a, Message> {
    let fs = settings.font_scale;

    let labeled = |label: &str, control: Element<'a, Message>| -> Element<'a, Message> {
        row![
            text(label.to_string()).size(scaled(13.0, fs)).width(220),
            control,
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center)
        .into()
    };

    let api_url = text_input("http://127.0.0.1:8000", &settings.api_url)
        .on_input(Message::ApiUrlChanged)
        .padding(8)
        .size(scaled(13.0, fs));

    let top_k = row![
        slider(1..=50u32, settings.top_k, Message::TopKChanged).width(Length::Fill),
        text(settings.top_k.to_string())
            .size(scaled(13.0, fs))
            .width(32),
    ]
    .spacing(10)
    .align_y(iced::Alignment::Center);

    let rerun = toggler(settings.rerun_on_threshold)
        .on_toggle(Message::RerunOnThresholdToggled)
        .size(scaled(18.0, fs));

    let appearance = pick_list(
        Appearance::ALL,
        Some(settings.appearance),
        Message::AppearanceChanged,
    )
    .text_size(scaled(13.0, fs));

    let high_contrast = checkbox(settings.high_contrast)
        .label("High contrast")
        .on_toggle(Message::HighContrastChanged)
        .text_size(scaled(13.0, fs));

    let font_scale = row![
        slider(0.8..=1.6f32, settings.font_scale, Message::FontScaleChanged)
            .step(0.05)
            .width(Length::Fill),
        text(format!("{:.2}\u{00d7}", settings.font_scale))
            .size(scaled(13.0, fs))
            .width(44),
    ]
    .spacing(10)
    .align_y(iced::Alignment::Center);

    let session_label = if credential.token().is_some() {
        "Signed in"
    } else {
        "Not signed in"
    };
    let account = row![
        text(session_label).size(scaled(13.0, fs)),
        Space::new().width(12),
        button(text("Sign out").size(scaled(12.0, fs)))
            .on_press(Message::SignOut)
            .padding([5, 12])
            .style(button::secondary),
    ]
    .align_y(iced::Alignment::Center);

    column![
        text("Search").size(scaled(15.0, fs)).font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..iced::Font::DEFAULT
        }),
        labeled("Backend URL", api_url.into()),
        labeled("Results per face (top-k)", top_k.into()),
        labeled("Re-search on threshold change", rerun.into()),
        text("Adjusting the slider re-runs the current photo at the new threshold. When off, the new value applies to the next search.")
            .size(scaled(11.0, fs)),
        Space::new().height(10),
        text("Appearance").size(scaled(15.0, fs)).font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..iced::Font::DEFAULT
        }),
        labeled("Theme", appearance.into()),
        labeled("Contrast", high_contrast.into()),
        labeled("Font scale", font_scale.into()),
        Space::new().height(10),
        text("Account").size(scaled(15.0, fs)).font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..iced::Font::DEFAULT
        }),
        account,
        Space::new().height(14),
        button(text("Restore Defaults").size(scaled(13.0, fs)))
            .on_press(Message::RestoreDefaults)
            .padding([7, 16])
            .style(button::secondary),
    ]
    .spacing(12)
    .into()
}
