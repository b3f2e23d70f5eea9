//! Color helpers shared by the verse animations

/// Linear RGBA color as uploaded to the GPU
pub type Rgba = [f32; 4];

pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
pub const DIM_GRAY: Rgba = [0.45, 0.45, 0.5, 0.6];
pub const WAVE_BLUE: Rgba = [0.3, 0.6, 1.0, 1.0];
pub const PARTICLE_GOLD: Rgba = [1.0, 0.8, 0.3, 1.0];
pub const STATE_ZERO: Rgba = [0.2, 0.5, 1.0, 1.0];
pub const STATE_ONE: Rgba = [1.0, 0.3, 0.3, 1.0];
pub const SUPERPOSITION: Rgba = [0.75, 0.4, 1.0, 1.0];
pub const HOT: Rgba = [1.0, 0.45, 0.15, 1.0];
pub const COLD: Rgba = [0.3, 0.85, 1.0, 1.0];

/// Component-wise linear interpolation, `t` clamped to [0, 1]
pub fn lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Replace the alpha channel
pub fn with_alpha(c: Rgba, alpha: f32) -> Rgba {
    [c[0], c[1], c[2], alpha.clamp(0.0, 1.0)]
}

/// HSV to RGB conversion, hue in [0, 1)
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let h = h.rem_euclid(1.0) * 6.0;
    let i = h.floor() as i32;
    let f = h - i as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match i % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Map a phase angle in radians onto the color wheel
pub fn phase_color(phase: f32, alpha: f32) -> Rgba {
    let hue = (phase + std::f32::consts::PI) / std::f32::consts::TAU;
    let (r, g, b) = hsv_to_rgb(hue, 0.85, 1.0);
    [r, g, b, alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_clamps_parameter() {
        assert_eq!(lerp(HOT, COLD, -1.0), HOT);
        assert_eq!(lerp(HOT, COLD, 2.0), COLD);
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), (1.0, 0.0, 0.0));
        let (r, g, b) = hsv_to_rgb(1.0 / 3.0, 1.0, 1.0);
        assert!(r < 1e-4 && (g - 1.0).abs() < 1e-4 && b < 1e-4);
    }
}
