use iced::widget::{button, column, container, row, text, text_input};
use iced::{Element, Length, Theme};

use crate::app::{scaled, App, Message};
use crate::theme::{muted_color, tertiary_color};
use crate::widgets::text_result_row;

pub fn view<'a>(app: &'a App, theme: &Theme) -> Element<'a, Message> {
    let fs = app.settings.font_scale;
    let session = &app.session;
    let muted = muted_color(theme);

    let input = text_input("Search message text\u{2026}", &app.text_query)
        .on_input(Message::TextQueryChanged)
        .on_submit(Message::TextSearchSubmitted)
        .padding(10)
        .size(scaled(14.0, fs));

    let submit = button(text("Search").size(scaled(14.0, fs)))
        .on_press(Message::TextSearchSubmitted)
        .padding([10, 22])
        .style(button::primary);

    let mut page = column![row![input, submit].spacing(8)].spacing(16);

    if session.is_searching() {
        page = page.push(
            container(
                text("Searching\u{2026}")
                    .size(scaled(14.0, fs))
                    .color(muted),
            )
            .width(Length::Fill)
            .padding(24)
            .align_x(iced::Alignment::Center),
        );
        return page.into();
    }

    if let Some(message) = session.error_message() {
        page = page.push(
            container(text(message.to_string()).size(scaled(13.0, fs)).color(theme.palette().danger))
                .width(Length::Fill)
                .padding(16)
                .align_x(iced::Alignment::Center),
        );
        return page.into();
    }

    let mut results = column![].spacing(8);
    for (index, result) in session.text_results().iter().enumerate() {
        results = results.push(text_result_row::view(index, result, fs, theme));
    }
    page = page.push(results);

    // The empty marker persists until a later non-empty query completes;
    // typing or clearing the input never removes it on its own.
    if session.text_results().is_empty() {
        if let Some(query) = session.empty_text_query() {
            page = page.push(
                container(
                    text(format!("Nothing found for \u{201c}{query}\u{201d}"))
                        .size(scaled(13.0, fs))
                        .color(tertiary_color(theme)),
                )
                .width(Length::Fill)
                .padding(24)
                .align_x(iced::Alignment::Center),
            );
        }
    }

    page.into()
}
