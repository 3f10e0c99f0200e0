/// Element type of an [`Image`](super::Image).
///
/// Samples convert losslessly enough to `f64` for all processing; writing
/// back rounds and saturates for integer types.
pub trait Sample: Copy + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// Whether the type only holds integral values.
    const INTEGRAL: bool;
    /// Short type label used in log messages.
    const LABEL: &'static str;

    fn to_f64(self) -> f64;
    fn from_f64(v: f64) -> Self;
}

impl Sample for u8 {
    const INTEGRAL: bool = true;
    const LABEL: &'static str = "u8";

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v.round().clamp(0.0, u8::MAX as f64) as u8
    }
}

impl Sample for u16 {
    const INTEGRAL: bool = true;
    const LABEL: &'static str = "u16";

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v.round().clamp(0.0, u16::MAX as f64) as u16
    }
}

impl Sample for f32 {
    const INTEGRAL: bool = false;
    const LABEL: &'static str = "f32";

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

#[cfg(test)]
mod tests {
    use super::Sample;

    #[test]
    fn integer_samples_round_and_saturate() {
        assert_eq!(u8::from_f64(12.6), 13);
        assert_eq!(u8::from_f64(-4.0), 0);
        assert_eq!(u8::from_f64(300.0), 255);
        assert_eq!(u16::from_f64(70000.0), u16::MAX);
        assert_eq!(f32::from_f64(0.25), 0.25f32);
    }
}
