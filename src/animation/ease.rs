use std::fmt;
use std::str::FromStr;

/// Easing functions used to map normalized tween progress.
///
/// Names follow the `family.direction` convention used by scroll animation tooling
/// (`"power2.inOut"`, `"back.out"`, `"none"`). The `Back` family overshoots `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    /// Identity mapping (`"none"` / `"linear"`).
    Linear,
    /// Polynomial ease of the given power (1..=4): `t^(p+1)` style curves.
    Power(u8, EaseDir),
    /// Sinusoidal ease.
    Sine(EaseDir),
    /// Exponential ease.
    Expo(EaseDir),
    /// Overshooting ease with the standard 1.70158 overshoot constant.
    Back(EaseDir),
}

/// Which end(s) of the curve are eased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EaseDir {
    /// Slow start.
    In,
    /// Slow end.
    Out,
    /// Slow start and end.
    InOut,
}

const BACK_OVERSHOOT: f64 = 1.701_58;

impl Ease {
    /// Apply this easing function to normalized progress `t`, clamped to `[0, 1]`.
    ///
    /// The output is `0` at `t = 0` and `1` at `t = 1`; `Back` may leave `[0, 1]` in between.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power(p, dir) => {
                let exp = i32::from(p.clamp(1, 4)) + 1;
                directed(dir, t, |x| x.powi(exp))
            }
            Self::Sine(dir) => directed(dir, t, |x| 1.0 - (x * std::f64::consts::FRAC_PI_2).cos()),
            Self::Expo(dir) => directed(dir, t, |x| {
                if x <= 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * (x - 1.0))
                }
            }),
            Self::Back(dir) => directed(dir, t, |x| {
                x * x * ((BACK_OVERSHOOT + 1.0) * x - BACK_OVERSHOOT)
            }),
        }
    }
}

/// Build the out/inOut variants from an ease-in curve `f`.
fn directed(dir: EaseDir, t: f64, f: impl Fn(f64) -> f64) -> f64 {
    match dir {
        EaseDir::In => f(t),
        EaseDir::Out => 1.0 - f(1.0 - t),
        EaseDir::InOut => {
            if t < 0.5 {
                f(t * 2.0) / 2.0
            } else {
                1.0 - f((1.0 - t) * 2.0) / 2.0
            }
        }
    }
}

impl FromStr for Ease {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("linear") {
            return Ok(Self::Linear);
        }

        let (family, dir) = match s.split_once('.') {
            Some((f, d)) => (f, d),
            None => (s, "out"),
        };
        let dir = match dir {
            "in" => EaseDir::In,
            "out" => EaseDir::Out,
            "inOut" | "inout" => EaseDir::InOut,
            other => return Err(format!("unknown ease direction \"{other}\" in \"{s}\"")),
        };

        match family {
            "power0" => Ok(Self::Linear),
            "power1" | "quad" => Ok(Self::Power(1, dir)),
            "power2" | "cubic" => Ok(Self::Power(2, dir)),
            "power3" | "quart" => Ok(Self::Power(3, dir)),
            "power4" | "quint" => Ok(Self::Power(4, dir)),
            "sine" => Ok(Self::Sine(dir)),
            "expo" => Ok(Self::Expo(dir)),
            "back" => Ok(Self::Back(dir)),
            other => Err(format!("unknown ease \"{other}\"")),
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = |d: &EaseDir| match d {
            EaseDir::In => "in",
            EaseDir::Out => "out",
            EaseDir::InOut => "inOut",
        };
        match self {
            Self::Linear => f.write_str("none"),
            Self::Power(p, d) => write!(f, "power{}.{}", p, dir(d)),
            Self::Sine(d) => write!(f, "sine.{}", dir(d)),
            Self::Expo(d) => write!(f, "expo.{}", dir(d)),
            Self::Back(d) => write!(f, "back.{}", dir(d)),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(value: Ease) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
