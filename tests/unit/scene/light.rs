use super::*;
use crate::scene::entity::SceneObject;

fn light(radius: f64) -> LightSource {
    LightSource::new(LightSourceDesc::new(100.0, 100.0, radius)).unwrap()
}

#[test]
fn defaults_are_white_full_intensity_point_core() {
    let l = light(10.0);
    assert_eq!(l.inner_radius(), 0.0);
    assert_eq!(l.intensity(), 1.0);
    assert_eq!(l.hue(), Color::WHITE);
    assert_eq!(l.effective_color(), Color::WHITE);
    assert_eq!(l.dimensions(), Size::new(20.0, 20.0));
}

#[test]
fn explicit_zero_intensity_is_honored() {
    let l = LightSource::new(LightSourceDesc::new(0.0, 0.0, 4.0).with_intensity(0.0)).unwrap();
    assert_eq!(l.intensity(), 0.0);
    let px = l.light_map().pixel_data().unwrap();
    assert!(px.data().iter().all(|&b| b == 0));
}

#[test]
fn light_map_surface_rounds_fractional_diameter_up() {
    let l = light(2.25);
    let map = l.light_map();
    assert_eq!(map.width(), Some(4.5));
    assert_eq!(map.surface().unwrap().width(), 5);
}

#[test]
fn fractional_diameter_keeps_gradient_centered_on_the_surface() {
    let l = LightSource::new(LightSourceDesc::new(0.0, 0.0, 2.25).with_inner_radius(0.9)).unwrap();
    let g = l.gradient();
    assert_eq!(g.center(), Point::new(2.5, 2.5));
    assert!((g.outer_radius() - 2.5).abs() < 1e-12);
    assert!((g.inner_radius() - 1.0).abs() < 1e-12);

    let px = l.light_map().pixel_data().unwrap();
    assert_eq!(px.pixel(0, 2), px.pixel(4, 2));
    assert_eq!(px.pixel(2, 0), px.pixel(2, 4));
}

#[test]
fn radius_above_limit_is_invalid_geometry() {
    let err = LightSource::new(LightSourceDesc::new(0.0, 0.0, MAX_RADIUS + 1.0)).unwrap_err();
    assert!(matches!(err, LumenError::InvalidGeometry(_)), "{err}");

    let mut l = light(4.0);
    assert!(matches!(
        l.set_radius(MAX_RADIUS * 2.0),
        Err(LumenError::InvalidGeometry(_))
    ));
    assert_eq!(l.radius(), 4.0);
}

#[test]
fn bake_stops_carry_correction_and_fade_to_transparent() {
    let l = LightSource::new(
        LightSourceDesc::new(0.0, 0.0, 8.0)
            .with_hue(Color::rgb(200.0, 100.0, 0.0))
            .with_intensity(0.5),
    )
    .unwrap();
    let stops = l.gradient().stops();
    assert_eq!(stops.len(), 2);
    assert!((stops[0].color.r - 200.0 * BAKE_CORRECTION).abs() < 1e-9);
    assert!((stops[0].color.g - 100.0 * BAKE_CORRECTION).abs() < 1e-9);
    assert_eq!(stops[0].color.a, 0.5);
    assert_eq!(stops[1].color.a, 0.0);
    assert_eq!(stops[1].color.r, stops[0].color.r);
}

#[test]
fn light_map_is_brightest_at_center() {
    let l = light(10.0);
    let px = l.light_map().pixel_data().unwrap();
    let center = px.pixel(10, 10).unwrap();
    let edge = px.pixel(10, 1).unwrap();
    let corner = px.pixel(0, 0).unwrap();
    assert!(center.a > 200);
    assert!(edge.a < center.a);
    assert_eq!(corner, crate::foundation::core::Rgba8Premul::transparent());
}

#[test]
fn failed_setter_leaves_light_unchanged() {
    let mut l = light(10.0);
    assert!(matches!(
        l.set_inner_radius(11.0),
        Err(LumenError::InvalidGeometry(_))
    ));
    assert!(l.set_radius(f64::INFINITY).is_err());
    assert!(l.set_radius(40_000.0).is_err());
    assert_eq!(l.radius(), 10.0);
    assert_eq!(l.light_map().width(), Some(20.0));
}

#[test]
fn follow_center_moves_anchor() {
    let target = Rc::new(RefCell::new(SceneObject::new(
        "t",
        Point::new(50.0, 50.0),
        Size::new(40.0, 40.0),
    )));
    let mut l = light(20.0);
    l.follow_object(&target);
    assert!(l.is_following());
    assert_eq!(l.render_anchor(0.0, 0.0), Point::new(-30.0, -30.0));

    target.borrow_mut().translate(Vec2::new(10.0, 0.0));
    assert_eq!(l.render_anchor(0.0, 0.0), Point::new(-20.0, -30.0));
}

#[test]
fn mutably_borrowed_target_counts_as_absent() {
    let target = Rc::new(RefCell::new(SceneObject::new(
        "t",
        Point::new(50.0, 50.0),
        Size::new(40.0, 40.0),
    )));
    let mut l = light(20.0);
    l.follow_object(&target);
    let _guard = target.borrow_mut();
    assert_eq!(l.render_anchor(5.0, 5.0), Point::new(5.0, 5.0));
}

#[test]
fn set_position_does_not_rebake() {
    let mut l = light(6.0);
    let before = l.light_map().pixel_data().cloned();
    l.set_position(Point::new(1.0, 2.0));
    assert_eq!(l.position(), Point::new(1.0, 2.0));
    assert_eq!(l.light_map().pixel_data().cloned(), before);
}

#[test]
fn desc_deserializes_with_defaults() {
    let d: LightSourceDesc = serde_json::from_str(
        r##"{ "tag": "lamp", "position": [3, 4], "radius": 12, "hue": "#ff8000" }"##,
    )
    .unwrap();
    assert_eq!(d.tag, "lamp");
    assert_eq!(d.position, Point::new(3.0, 4.0));
    assert_eq!(d.inner_radius, None);
    assert_eq!(d.hue, Some(Color::rgb(255.0, 128.0, 0.0)));
}
