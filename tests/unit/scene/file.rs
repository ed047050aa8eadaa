use super::*;
use crate::assets::loader::TextureLoaderOpts;

fn loader() -> TextureLoader {
    TextureLoader::new(TextureLoaderOpts::default().with_threads(Some(1))).unwrap()
}

#[test]
fn parses_lights_with_follow_tags() {
    let scene = SceneFile::from_json_str(
        r#"{
            "width": 32, "height": 16, "mode": "additive",
            "objects": [{ "tag": "ship", "position": [0, 0], "dimensions": [4, 4] }],
            "lights": [{ "tag": "l", "position": [2, 2], "radius": 3, "follow": "ship" }]
        }"#,
    )
    .unwrap();
    assert_eq!(scene.mode, CompositeMode::Additive);
    assert_eq!(scene.lights[0].follow.as_deref(), Some("ship"));
    assert_eq!(scene.lights[0].light.radius, 3.0);
}

#[test]
fn rejects_unknown_follow_and_empty_canvas() {
    let err = SceneFile::from_json_str(
        r#"{ "width": 8, "height": 8, "lights": [{ "radius": 2, "follow": "ghost" }] }"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("ghost"));

    assert!(SceneFile::from_json_str(r#"{ "width": 0, "height": 8 }"#).is_err());
    assert!(SceneFile::from_json_str("not json").is_err());
}

#[test]
fn renders_a_light_centered_on_its_anchor() {
    let scene = SceneFile::from_json_str(
        r#"{ "width": 20, "height": 20, "lights": [{ "position": [10, 10], "radius": 5 }] }"#,
    )
    .unwrap();
    let frame = scene.render(&loader()).unwrap();
    assert_eq!((frame.width, frame.height), (20, 20));
    let at = |x: usize, y: usize| frame.data[(y * 20 + x) * 4 + 3];
    assert!(at(10, 10) > 150);
    assert_eq!(at(0, 0), 0);
    assert_eq!(at(19, 19), 0);
}

#[test]
fn followed_light_lands_on_target_center_not_offset_by_its_position() {
    let scene = SceneFile::from_json_str(
        r#"{
            "width": 32, "height": 32,
            "objects": [{ "tag": "box", "position": [10, 10], "dimensions": [8, 8] }],
            "lights": [{ "position": [6, 6], "radius": 3, "follow": "box" }]
        }"#,
    )
    .unwrap();
    let frame = scene.render(&loader()).unwrap();
    let at = |x: usize, y: usize| frame.data[(y * 32 + x) * 4 + 3];
    assert!(at(14, 14) > 150);
    assert_eq!(at(20, 20), 0);
    assert_eq!(at(6, 6), 0);
}

#[test]
fn missing_background_is_left_out() {
    let scene = SceneFile::from_json_str(
        r##"{ "width": 8, "height": 8, "clear": "#000000", "background": "missing.png" }"##,
    )
    .unwrap();
    let frame = scene.render(&loader()).unwrap();
    assert_eq!(&frame.data[0..4], &[0, 0, 0, 255]);
}
