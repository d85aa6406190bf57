use crate::shared::bounding_box::BoundingBox;

/// Rendering descriptor for a square face thumbnail.
///
/// Describes how to draw the *full* source image inside an `edge x edge`
/// viewport so that one face lands centered and fully visible: the image is
/// scaled uniformly by `scale` and translated by `(offset_x, offset_y)`,
/// then clipped to the viewport. Everything is derived from the image's
/// natural pixel dimensions, so the result is unaffected by however the
/// on-screen preview happens to be scaled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThumbnailSpec {
    pub edge: f32,
    pub scale: f32,
    pub scaled_width: f32,
    pub scaled_height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Project a detected face into a thumbnail descriptor.
///
/// Returns `None` for boxes with non-positive extent on either axis; those
/// are skipped rather than rendered (and never divided by).
pub fn project(
    natural_w: f32,
    natural_h: f32,
    bbox: &BoundingBox,
    edge: f32,
) -> Option<ThumbnailSpec> {
    if !bbox.is_renderable() {
        return None;
    }

    let face_w = bbox.width();
    let face_h = bbox.height();

    // Uniform scale that makes the face's longer side exactly fill the edge.
    let scale = edge / face_w.max(face_h);

    let scaled_width = natural_w * scale;
    let scaled_height = natural_h * scale;

    // Shift the scaled image so the face rectangle sits centered in the
    // viewport; the shorter face axis gets symmetric padding.
    let offset_x = -(bbox.x1 * scale) + (edge - face_w * scale) / 2.0;
    let offset_y = -(bbox.y1 * scale) + (edge - face_h * scale) / 2.0;

    Some(ThumbnailSpec {
        edge,
        scale,
        scaled_width,
        scaled_height,
        offset_x,
        offset_y,
    })
}
