use super::*;
use crate::render::surface::RasterSurface;

fn solid_texture(px: [u8; 4], w: u32, h: u32) -> Texture {
    let bytes = px.repeat((w * h) as usize);
    Texture::from_surface(RasterSurface::from_rgba8_premul(bytes, w, h).unwrap())
}

#[test]
fn new_framebuffer_uses_clear_color() {
    let opts = CpuFramebufferOpts::default().with_clear_rgba(Some([0, 0, 255, 255]));
    let fb = CpuFramebuffer::new(3, 2, opts).unwrap();
    assert_eq!(fb.data().len(), 3 * 2 * 4);
    assert_eq!(fb.pixel(2, 1).unwrap().to_array(), [0, 0, 255, 255]);
    assert!(CpuFramebuffer::new(70_000, 1, CpuFramebufferOpts::default()).is_err());
}

#[test]
fn draws_texture_into_destination_rect_only() {
    let tex = solid_texture([255, 255, 255, 255], 4, 4);
    let mut fb = CpuFramebuffer::new(8, 8, CpuFramebufferOpts::default()).unwrap();
    fb.render_texture(&tex, 2.0, 2.0, 4.0, 4.0).unwrap();

    assert!(fb.pixel(3, 3).unwrap().a >= 250);
    assert_eq!(fb.pixel(0, 0).unwrap(), Rgba8Premul::transparent());
    assert_eq!(fb.pixel(7, 7).unwrap(), Rgba8Premul::transparent());
}

#[test]
fn unloaded_texture_draws_nothing() {
    let mut fb = CpuFramebuffer::new(4, 4, CpuFramebufferOpts::default()).unwrap();
    fb.render_texture(&Texture::empty(), 0.0, 0.0, 4.0, 4.0)
        .unwrap();
    assert!(fb.data().iter().all(|&b| b == 0));
}

#[test]
fn texture_offset_shifts_the_draw() {
    let tex = solid_texture([255, 255, 255, 255], 2, 2).with_offset(Vec2::new(4.0, 0.0));
    let mut fb = CpuFramebuffer::new(8, 4, CpuFramebufferOpts::default()).unwrap();
    fb.render_texture(&tex, 0.0, 0.0, 2.0, 2.0).unwrap();

    assert_eq!(fb.pixel(0, 0).unwrap(), Rgba8Premul::transparent());
    assert!(fb.pixel(4, 0).unwrap().a >= 250);
}

#[test]
fn additive_mode_accumulates_more_than_over() {
    let tex = solid_texture([100, 0, 0, 100], 4, 4);
    let mut over_fb = CpuFramebuffer::new(4, 4, CpuFramebufferOpts::default()).unwrap();
    let mut add_fb = CpuFramebuffer::new(
        4,
        4,
        CpuFramebufferOpts::default().with_mode(CompositeMode::Additive),
    )
    .unwrap();

    for _ in 0..2 {
        over_fb.render_texture(&tex, 0.0, 0.0, 4.0, 4.0).unwrap();
        add_fb.render_texture(&tex, 0.0, 0.0, 4.0, 4.0).unwrap();
    }

    let o = over_fb.pixel(1, 1).unwrap();
    let a = add_fb.pixel(1, 1).unwrap();
    assert!(a.r > o.r, "additive {a:?} should exceed over {o:?}");
    assert!(a.a > o.a);
}

#[test]
fn straight_frame_undoes_premultiplication() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
        premultiplied: true,
    };
    assert_eq!(frame.to_straight_rgba8(), vec![128, 0, 0, 128]);
}
