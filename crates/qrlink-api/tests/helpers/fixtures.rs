use image::ImageFormat;

/// Decode the single QR symbol contained in a PNG.
pub fn decode_qr_png(png: &[u8]) -> String {
    let img = image::load_from_memory_with_format(png, ImageFormat::Png)
        .expect("stored object is not a PNG")
        .to_luma8();
    let (width, height) = img.dimensions();
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
            img.get_pixel(x as u32, y as u32).0[0]
        });
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR symbol");
    let (_meta, content) = grids[0].decode().expect("QR symbol could not be decoded");
    content
}

/// Public URL the service should return for `key` in the test bucket.
pub fn expected_url(key: &str) -> String {
    format!(
        "https://storage.googleapis.com/{}/{}",
        super::TEST_BUCKET,
        key
    )
}
