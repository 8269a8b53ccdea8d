/// Straight-alpha RGBA color with `f32` channels in `[0, 1]`.
///
/// Every color in this crate is opaque, so the straight/premultiplied
/// distinction never changes a value.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    /// Creates an opaque color.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates an opaque color from sRGB-encoded components in `[0, 1]`.
    ///
    /// Channels are converted to linear, which is what wgpu expects for clear
    /// colors and blending on `*Srgb` targets.
    #[inline]
    pub fn from_srgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgb(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
    }

    /// Layout expected by `Float32x4` vertex attributes.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

/// sRGB electro-optical transfer function (IEC 61966-2-1).
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(0.2, 0.4, 0.6).a, 1.0);
    }

    #[test]
    fn to_array_keeps_channel_order() {
        assert_eq!(Color { r: 0.1, g: 0.2, b: 0.3, a: 0.4 }.to_array(), [0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn srgb_dark_gray_is_linearized() {
        let c = Color::from_srgb(0.1, 0.1, 0.1);
        assert!((c.r - 0.010_022).abs() < 1e-5, "{}", c.r);
        assert_eq!((c.r, c.a), (c.b, 1.0));
    }

    #[test]
    fn srgb_endpoints_are_unchanged() {
        let c = Color::from_srgb(0.0, 1.0, 0.0);
        assert_eq!(c.r, 0.0);
        assert!((c.g - 1.0).abs() < 1e-6);
    }

    #[test]
    fn srgb_linear_segment_near_black() {
        let c = Color::from_srgb(0.04, 0.0, 0.0);
        assert!((c.r - 0.04 / 12.92).abs() < 1e-7);
    }

    #[test]
    fn to_wgpu_widens_channels() {
        let c = Color::rgb(0.5, 0.25, 1.0).to_wgpu();
        assert_eq!((c.r, c.g, c.b, c.a), (0.5, 0.25, 1.0, 1.0));
    }
}
