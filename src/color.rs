//! Colors.

/// A color with straight (non-premultiplied) alpha, components between 0 and 1.
///
/// The default is fully transparent, which controls treat as "use the native background".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0., 0., 0., 0.);
    pub const BLACK: Color = Color::rgb(0., 0., 0.);
    pub const WHITE: Color = Color::rgb(1., 1., 1.);

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Color {
        Color { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color::rgba(r, g, b, 1.)
    }

    /// Parses a packed `0xAARRGGBB` value.
    pub fn from_argb(argb: u32) -> Color {
        let channel = |shift: u32| f64::from((argb >> shift) & 0xff) / 255.;
        Color::rgba(channel(16), channel(8), channel(0), channel(24))
    }

    /// Packs the color as `0xAARRGGBB`, clamping components.
    pub fn to_argb(self) -> u32 {
        let channel = |v: f64| (v.clamp(0., 1.) * 255.).round() as u32;
        channel(self.a) << 24 | channel(self.r) << 16 | channel(self.g) << 8 | channel(self.b)
    }

    pub fn is_transparent(self) -> bool {
        self.a <= 0.
    }
}

#[test]
fn test_argb() {
    assert_eq!(Color::from_argb(0xff00_00ff), Color::rgb(0., 0., 1.));
    assert_eq!(Color::WHITE.to_argb(), 0xffff_ffff);
    assert_eq!(Color::from_argb(0x80ff_8000).to_argb(), 0x80ff_8000);
    assert!(Color::default().is_transparent());
}
