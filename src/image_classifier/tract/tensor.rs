use image::DynamicImage;
use tract_onnx::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// [batch, channels, height, width], the usual ONNX export layout.
    Nchw,
    /// [batch, height, width, channels], the usual TFLite layout.
    Nhwc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    ZeroToOne,
    MinusOneToOne,
}

impl Normalization {
    fn apply(self, value: u8) -> f32 {
        match self {
            Normalization::ZeroToOne => value as f32 / 255.0,
            Normalization::MinusOneToOne => value as f32 / 127.5 - 1.0,
        }
    }
}

pub fn image_to_tensor(image: &DynamicImage, layout: TensorLayout, normalization: Normalization) -> Tensor {
    let rgb = image.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);

    match layout {
        TensorLayout::Nchw => {
            tract_ndarray::Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
                normalization.apply(rgb.get_pixel(x as u32, y as u32)[c])
            })
            .into_tensor()
        }
        TensorLayout::Nhwc => {
            tract_ndarray::Array4::from_shape_fn((1, height, width, 3), |(_, y, x, c)| {
                normalization.apply(rgb.get_pixel(x as u32, y as u32)[c])
            })
            .into_tensor()
        }
    }
}
