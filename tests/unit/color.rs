use super::*;

fn rgba(spec: &str) -> RgbaColor {
    ColorSpec::new(spec).resolve().unwrap()
}

#[test]
fn parses_hex_forms() {
    assert_eq!(rgba("#FF0000"), RgbaColor::rgba(1.0, 0.0, 0.0, 1.0));
    assert_eq!(rgba("#0000ff"), RgbaColor::rgba(0.0, 0.0, 1.0, 1.0));
    assert_eq!(rgba("#f00"), RgbaColor::rgba(1.0, 0.0, 0.0, 1.0));
    assert_eq!(rgba("  #00FF0080 ").a, 128.0 / 255.0);
    assert_eq!(rgba("#0f08").a, 136.0 / 255.0);
}

#[test]
fn parses_functional_forms() {
    assert_eq!(rgba("rgb(255, 0, 0)"), RgbaColor::rgba(1.0, 0.0, 0.0, 1.0));
    let c = rgba("rgba(0, 51, 102, 0.5)");
    assert_eq!(c.g, 0.2);
    assert_eq!(c.b, 0.4);
    assert_eq!(c.a, 128.0 / 255.0);
    assert_eq!(rgba("RGBA(0,0,0,100%)").a, 1.0);
}

#[test]
fn parses_named_colors_case_insensitively() {
    assert_eq!(rgba("red"), RgbaColor::rgba(1.0, 0.0, 0.0, 1.0));
    assert_eq!(rgba("Blue"), RgbaColor::rgba(0.0, 0.0, 1.0, 1.0));
    let c = rgba("cornflowerblue");
    assert_eq!(c.to_rgba8(), [100, 149, 237, 255]);
}

#[test]
fn rejects_malformed_specs() {
    for bad in [
        "not-a-color",
        "",
        "#",
        "#12345",
        "#gg0000",
        "rgb(256, 0, 0)",
        "rgb(1, 2)",
        "rgba(1, 2, 3, 1.5)",
        "rgb(-1, 0, 0)",
    ] {
        let err = ColorSpec::new(bad).resolve().unwrap_err();
        assert!(
            matches!(err, ForgeError::InvalidColorSpec(_)),
            "{bad:?} -> {err}"
        );
    }
}

#[test]
fn map_colors_keeps_order_and_reversal_swaps() {
    let ends = map_colors(&"#FF0000".into(), &"#0000FF".into()).unwrap();
    assert_eq!(ends.start, RgbaColor::rgba(1.0, 0.0, 0.0, 1.0));
    assert_eq!(ends.end, RgbaColor::rgba(0.0, 0.0, 1.0, 1.0));

    let swapped = map_colors(&"#0000FF".into(), &"#FF0000".into()).unwrap();
    assert_eq!(swapped, ends.reversed());
}

#[test]
fn map_colors_propagates_failure_of_either_side() {
    assert!(map_colors(&"not-a-color".into(), &"red".into()).is_err());
    assert!(map_colors(&"red".into(), &"not-a-color".into()).is_err());
}
