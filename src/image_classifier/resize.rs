use crate::image_classifier::interface::ResizeMethod;
use image::DynamicImage;

/// Stretches the image to exactly `(width, height)`; aspect ratio is not preserved.
pub fn resize_to_input(image: &DynamicImage, input_size: (u32, u32), method: ResizeMethod) -> DynamicImage {
    let (width, height) = input_size;
    if image.width() == width && image.height() == height {
        return image.clone();
    }
    image.resize_exact(width, height, method.filter_type())
}
