use image::imageops::FilterType;
use image::DynamicImage;
use tract_onnx::prelude::tract_ndarray::Array4;

/// Fixed, model-dictated transform: exact resize to the model's spatial
/// dimensions (no aspect-ratio preservation), grayscale conversion, [0,1]
/// scaling, the single intensity channel replicated three times, and a batch
/// dimension of 1. Layout is channels-last (1, H, W, 3).
pub fn to_tensor(image: &DynamicImage, height: usize, width: usize) -> Array4<f32> {
    let gray = image
        .resize_exact(width as u32, height as u32, FilterType::CatmullRom)
        .to_luma8();
    Array4::from_shape_fn((1, height, width, 3), |(_, y, x, _)| {
        f32::from(gray.get_pixel(x as u32, y as u32)[0]) / 255.0
    })
}
