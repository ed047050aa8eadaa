use super::*;
use serde_json::json;

#[test]
fn display_is_css_rgba_without_rounding() {
    let c = Color::WHITE.scale_rgb(254.0 / 255.0);
    assert_eq!(
        c.to_string(),
        format!("rgba({0}, {0}, {0}, 1)", 255.0 * (254.0 / 255.0))
    );
    assert_eq!(Color::rgba(10.0, 20.0, 30.0, 0.5).to_string(), "rgba(10, 20, 30, 0.5)");
}

#[test]
fn parses_css_and_hex_forms() {
    let c: Color = "rgba(10, 20, 30, 0.25)".parse().unwrap();
    assert_eq!(c, Color::rgba(10.0, 20.0, 30.0, 0.25));

    let c: Color = "RGB(1,2,3)".parse().unwrap();
    assert_eq!(c, Color::rgb(1.0, 2.0, 3.0));

    let c: Color = "#ff000080".parse().unwrap();
    assert_eq!(c.r, 255.0);
    assert!((c.a - 128.0 / 255.0).abs() < 1e-12);

    assert!("hsl(0, 1, 1)".parse::<Color>().is_err());
    assert!("rgba(1, 2, 3)".parse::<Color>().is_err());
    assert!("#12345".parse::<Color>().is_err());
}

#[test]
fn display_output_parses_back() {
    let c = Color::rgba(253.00392156862746, 0.5, 17.0, 0.75);
    let back: Color = c.to_string().parse().unwrap();
    assert_eq!(back, c);
}

#[test]
fn deserializes_object_array_and_string() {
    let c: Color = serde_json::from_value(json!({"r": 255, "g": 128, "b": 0})).unwrap();
    assert_eq!(c, Color::rgb(255.0, 128.0, 0.0));

    let c: Color = serde_json::from_value(json!([1, 2, 3, 0.5])).unwrap();
    assert_eq!(c, Color::rgba(1.0, 2.0, 3.0, 0.5));

    let c: Color = serde_json::from_value(json!("#00ff00")).unwrap();
    assert_eq!(c, Color::rgb(0.0, 255.0, 0.0));

    assert!(serde_json::from_value::<Color>(json!([1, 2])).is_err());
}

#[test]
fn premul_quantization_clamps_channels() {
    assert_eq!(
        Color::rgba(300.0, -5.0, 127.5, 2.0).to_rgba8_premul(),
        Rgba8Premul {
            r: 255,
            g: 0,
            b: 128,
            a: 255
        }
    );
    assert_eq!(
        Color::rgba(255.0, 255.0, 255.0, 0.5).to_rgba8_premul().to_array(),
        [128, 128, 128, 128]
    );
}

#[test]
fn premul_lerp_keeps_rgb_when_only_alpha_fades() {
    let inner = Color::rgba(200.0, 100.0, 50.0, 1.0);
    let outer = inner.with_alpha(0.0);
    let mid = inner.lerp_premul(outer, 0.5);
    assert!((mid.r - 200.0).abs() < 1e-9);
    assert!((mid.g - 100.0).abs() < 1e-9);
    assert!((mid.a - 0.5).abs() < 1e-12);

    let end = inner.lerp_premul(outer, 1.0);
    assert_eq!(end.a, 0.0);
}
