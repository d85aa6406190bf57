use iced::widget::canvas::{self, Canvas};
use iced::widget::{button, column, container, image, mouse_area, text};
use iced::{mouse, Color, Element, Point, Rectangle, Renderer, Size, Theme};

use facewatch_core::overlay::thumbnail::ThumbnailSpec;

use crate::app::{scaled, Message};

const CORNER_RADIUS: f32 = 10.0;
const BORDER_WIDTH: f32 = 2.0;

/// Selectable disambiguation thumbnail for one detected face.
///
/// The canvas draws the already loaded preview image scaled and translated
/// per the projector descriptor and clipped to the square viewport; the
/// face arrives centered without any re-crop round trip.
pub fn face_overlay_card<'a>(
    preview: &image::Handle,
    spec: ThumbnailSpec,
    index: usize,
    hovered: bool,
    fs: f32,
    theme: &Theme,
) -> Element<'a, Message> {
    let palette = theme.palette();

    let thumb = Canvas::new(ThumbProgram {
        handle: preview.clone(),
        spec,
    })
    .width(spec.edge)
    .height(spec.edge);

    let border_color = if hovered {
        palette.primary
    } else {
        Color {
            a: 0.25,
            ..palette.text
        }
    };

    // Transparent button inside a styled container: the container carries
    // the border and radius, the button only handles the click.
    let clickable = button(thumb)
        .on_press(Message::FaceOverlayPicked(index))
        .padding(0)
        .style(|_theme: &Theme, _status: button::Status| button::Style {
            background: None,
            border: iced::border::Border::default(),
            ..button::Style::default()
        });

    let framed = container(clickable)
        .padding(BORDER_WIDTH)
        .style(move |_theme: &Theme| container::Style {
            border: iced::border::Border {
                color: border_color,
                width: BORDER_WIDTH,
                radius: CORNER_RADIUS.into(),
            },
            ..container::Style::default()
        });

    let card = column![
        framed,
        text(format!("Face #{}", index + 1))
            .size(scaled(12.0, fs))
            .align_x(iced::Alignment::Center)
            .width(spec.edge + BORDER_WIDTH * 2.0),
    ]
    .spacing(4)
    .align_x(iced::Alignment::Center);

    mouse_area(card)
        .on_enter(Message::OverlayHover(index, true))
        .on_exit(Message::OverlayHover(index, false))
        .into()
}

struct ThumbProgram {
    handle: image::Handle,
    spec: ThumbnailSpec,
}

impl<Message> canvas::Program<Message> for ThumbProgram {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        // The frame clips to the widget bounds, so drawing the scaled image
        // at the descriptor offset leaves exactly the centered face visible.
        frame.draw_image(
            Rectangle::new(
                Point::new(self.spec.offset_x, self.spec.offset_y),
                Size::new(self.spec.scaled_width, self.spec.scaled_height),
            ),
            canvas::Image::new(self.handle.clone()),
        );
        vec![frame.into_geometry()]
    }
}
