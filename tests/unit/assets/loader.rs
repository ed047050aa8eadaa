use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn loader() -> TextureLoader {
    TextureLoader::new(TextureLoaderOpts::default().with_threads(Some(1))).unwrap()
}

#[test]
fn request_resolves_with_decoded_image() {
    let l = loader();
    let pending = l.request(&ImageSource::memory("red", png_bytes(3, 2, [255, 0, 0, 255])));
    assert_eq!(pending.label(), "red");

    let img = pending.wait().unwrap();
    assert_eq!((img.width, img.height), (3, 2));
    assert_eq!(&img.rgba8_premul[0..4], &[255, 0, 0, 255]);
}

#[test]
fn failures_are_reported_as_decode_errors() {
    let l = loader();
    let err = l
        .request(&ImageSource::memory("junk", b"nope".to_vec()))
        .wait()
        .unwrap_err();
    assert!(matches!(err, LumenError::Decode(_)));
    assert!(err.to_string().contains("'junk'"));

    let err = l
        .load_blocking(&ImageSource::path("../escape.png"))
        .unwrap_err();
    assert!(matches!(err, LumenError::Decode(_)));
}

#[test]
fn ready_handle_resolves_once() {
    let p = PendingDecode::ready("x", Err(LumenError::decode("boom")));
    assert!(matches!(p.try_take(), Some(Err(LumenError::Decode(_)))));
    // The sender was dropped after the single send.
    let again = p.try_take().unwrap().unwrap_err();
    assert!(again.to_string().contains("without a result"));
}

#[test]
fn zero_threads_is_rejected() {
    let err = TextureLoader::new(TextureLoaderOpts::default().with_threads(Some(0))).unwrap_err();
    assert!(matches!(err, LumenError::Validation(_)));
}
