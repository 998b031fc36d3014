use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(v: u32) -> Self {
        Self((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub const WHITE: Rgb = Rgb::hex(0xffffff);
pub const INK: Rgb = Rgb::hex(0x1f2937);
pub const MUTED_INK: Rgb = Rgb::hex(0x6b7280);

pub const INACTIVE_FILL: Rgb = Rgb::hex(0xf3f4f6);
pub const INACTIVE_STROKE: Rgb = Rgb::hex(0xd1d5db);
pub const INACTIVE_LABEL: Rgb = Rgb::hex(0x9ca3af);

pub const BASE_GRADIENT: (Rgb, Rgb) = (Rgb::hex(0xf87171), Rgb::hex(0xef4444));
pub const BASE_STROKE: Rgb = Rgb::hex(0xdc2626);
pub const ORCHESTRATOR_GRADIENT: (Rgb, Rgb) = (Rgb::hex(0xa78bfa), Rgb::hex(0x8b5cf6));
pub const ORCHESTRATOR_STROKE: Rgb = Rgb::hex(0x7c3aed);
pub const PROPOSAL_DARK_STROKE: Rgb = Rgb::hex(0x374151);

pub const COORDINATION: (Rgb, Rgb) = (Rgb::hex(0x3b82f6), Rgb::hex(0x60a5fa));
pub const INSTRUCTION: (Rgb, Rgb) = (Rgb::hex(0x10b981), Rgb::hex(0x34d399));
pub const FEEDBACK: (Rgb, Rgb) = (Rgb::hex(0xf59e0b), Rgb::hex(0xfbbf24));

pub const LEGEND_BORDER: Rgb = Rgb::hex(0xe5e7eb);

// plasma colormap sampled at t = 0.0, 0.1, ..., 1.0
const PLASMA: [Rgb; 11] = [
    Rgb::hex(0x0d0887),
    Rgb::hex(0x41049d),
    Rgb::hex(0x6a00a8),
    Rgb::hex(0x8f0da4),
    Rgb::hex(0xb12a90),
    Rgb::hex(0xcc4778),
    Rgb::hex(0xe16462),
    Rgb::hex(0xf2844b),
    Rgb::hex(0xfca636),
    Rgb::hex(0xfcce25),
    Rgb::hex(0xf0f921),
];

/// Plasma colormap, `t` clamped to `[0, 1]`.
pub fn plasma(t: f32) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (PLASMA.len() - 1) as f32;
    let lo = (scaled.floor() as usize).min(PLASMA.len() - 2);
    PLASMA[lo].lerp(PLASMA[lo + 1], scaled - lo as f32)
}
