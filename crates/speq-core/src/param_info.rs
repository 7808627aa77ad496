//! Parameter introspection for host automation and control surfaces.
//!
//! Index-based parameter access, with each parameter described by a
//! [`ParamDescriptor`]: display metadata, plain-value range, default, a
//! stable [`ParamId`], and the [`ParamScale`] used to map between plain
//! values and the normalized `[0.0, 1.0]` space a plugin host automates in.
//!
//! # Example
//!
//! ```rust
//! use speq_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct Trim {
//!     gain_db: f64,
//! }
//!
//! impl ParameterInfo for Trim {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::gain_db("Trim", "Trim", -12.0, 12.0, 0.0)
//!                 .with_id(ParamId(0), "trim")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f64 {
//!         match index {
//!             0 => self.gain_db,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f64) {
//!         if index == 0 {
//!             self.gain_db = value.clamp(-12.0, 12.0);
//!         }
//!     }
//! }
//!
//! let mut t = Trim { gain_db: 0.0 };
//! t.set_normalized(0, 1.0);
//! assert_eq!(t.get_param(0), 12.0);
//! ```

use libm::{log10, pow};

/// Scaling curve for parameter normalization.
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Logarithmic**: `normalized = (log10(value) - log10(min)) / (log10(max) - log10(min))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamScale {
    /// Equal resolution across the range.
    #[default]
    Linear,
    /// More resolution at low values. Requires `min > 0`.
    Logarithmic,
}

/// Unit of a parameter's plain value, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamUnit {
    /// Decibels.
    Decibels,
    /// Hertz.
    Hertz,
    /// Dimensionless (Q).
    Ratio,
    /// On/off switch.
    Boolean,
}

impl ParamUnit {
    /// Display suffix for the unit.
    pub fn suffix(self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Ratio | ParamUnit::Boolean => "",
        }
    }
}

/// Stable parameter identifier that survives reordering.
///
/// Maps directly to a VST3 `ParamID`. Once assigned it must never change for
/// a given parameter: hosts record automation against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags for host communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter has discrete steps (switches).
    pub const STEPPED: Self = Self(1 << 1);
    /// Parameter is the host-facing bypass switch.
    pub const BYPASS: Self = Self(1 << 2);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Metadata for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name (e.g., "Band 2 Frequency").
    pub name: &'static str,
    /// Short name, 8 characters or less.
    pub short_name: &'static str,
    /// Unit of the plain value.
    pub unit: ParamUnit,
    /// Minimum plain value.
    pub min: f64,
    /// Maximum plain value.
    pub max: f64,
    /// Default plain value.
    pub default: f64,
    /// Stable host-facing identifier. Default `ParamId(0)`.
    pub id: ParamId,
    /// Human-readable stable ID (e.g., `"b2_freq"`).
    pub string_id: &'static str,
    /// Normalization curve.
    pub scale: ParamScale,
    /// Capability flags.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Gain in decibels, linear scale.
    pub fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f64,
        max: f64,
        default: f64,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Frequency in Hz, logarithmic scale.
    pub fn frequency_hz(
        name: &'static str,
        short_name: &'static str,
        min: f64,
        max: f64,
        default: f64,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Hertz,
            min,
            max,
            default,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Logarithmic,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Filter Q, logarithmic scale.
    pub fn q_factor(
        name: &'static str,
        short_name: &'static str,
        min: f64,
        max: f64,
        default: f64,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Ratio,
            min,
            max,
            default,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Logarithmic,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// On/off switch stored as `0.0` / `1.0`.
    pub fn switch(name: &'static str, short_name: &'static str, default: bool) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Boolean,
            min: 0.0,
            max: 1.0,
            default: if default { 1.0 } else { 0.0 },
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
        }
    }

    /// Sets the stable parameter ID and string ID.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the parameter flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Clamps a plain value to this parameter's range.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Converts a plain value to `[0.0, 1.0]`, respecting the scale.
    ///
    /// Values outside the range are clamped first.
    pub fn normalize(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        let value = self.clamp(value);
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return 0.0;
                }
                let log_min = log10(self.min);
                (log10(value) - log_min) / (log10(self.max) - log_min)
            }
        }
    }

    /// Converts a normalized value back to the plain range.
    ///
    /// `normalized` is clamped to `[0.0, 1.0]`. Stepped parameters snap to
    /// `min` below `0.5` and to `max` above it.
    pub fn denormalize(&self, normalized: f64) -> f64 {
        let n = normalized.clamp(0.0, 1.0);
        if self.flags.contains(ParamFlags::STEPPED) {
            return if n > 0.5 { self.max } else { self.min };
        }
        let plain = match self.scale {
            ParamScale::Linear => self.min + n * (self.max - self.min),
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return self.min;
                }
                let log_min = log10(self.min);
                pow(10.0, log_min + n * (log10(self.max) - log_min))
            }
        };
        self.clamp(plain)
    }
}

/// Trait for processors that expose introspectable parameters.
///
/// Indices are `0..param_count()` and stable for the lifetime of the
/// instance. Out-of-range indices are ignored by setters and read as `0.0`.
pub trait ParameterInfo {
    /// Number of parameters.
    fn param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`, `None` if out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current plain value of the parameter at `index`.
    fn get_param(&self, index: usize) -> f64;

    /// Sets the plain value of the parameter at `index`, clamped to range.
    fn set_param(&mut self, index: usize, value: f64);

    /// Finds a parameter index by its stable [`ParamId`].
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }

    /// Current value of the parameter at `index` in normalized space.
    fn get_normalized(&self, index: usize) -> f64 {
        self.param_info(index)
            .map_or(0.0, |d| d.normalize(self.get_param(index)))
    }

    /// Sets the parameter at `index` from a normalized host value.
    fn set_normalized(&mut self, index: usize, normalized: f64) {
        if let Some(desc) = self.param_info(index) {
            self.set_param(index, desc.denormalize(normalized));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_roundtrip() {
        let d = ParamDescriptor::gain_db("Gain", "Gain", -12.0, 12.0, 0.0);
        assert_eq!(d.normalize(-12.0), 0.0);
        assert_eq!(d.normalize(0.0), 0.5);
        assert_eq!(d.normalize(12.0), 1.0);
        assert_eq!(d.denormalize(0.25), -6.0);
    }

    #[test]
    fn test_log_frequency_mapping() {
        let d = ParamDescriptor::frequency_hz("Freq", "Freq", 20.0, 20000.0, 1000.0);
        assert!(d.denormalize(0.0) - 20.0 < 1e-9);
        assert!((d.denormalize(1.0) - 20000.0).abs() < 1e-6);
        // log10 midpoint of 20..20000 is sqrt(20 * 20000)
        assert!((d.denormalize(0.5) - (20.0f64 * 20000.0).sqrt()).abs() < 1e-6);
        assert!((d.normalize(d.denormalize(0.37)) - 0.37).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let d = ParamDescriptor::q_factor("Q", "Q", 0.1, 10.0, 0.707);
        assert_eq!(d.normalize(100.0), 1.0);
        assert_eq!(d.denormalize(-3.0), d.denormalize(0.0));
        assert_eq!(d.clamp(0.0), 0.1);
    }

    #[test]
    fn test_switch_snaps() {
        let d = ParamDescriptor::switch("Bypass", "Bypass", false);
        assert!(d.flags.contains(ParamFlags::STEPPED));
        assert_eq!(d.denormalize(0.5), 0.0);
        assert_eq!(d.denormalize(0.51), 1.0);
        assert_eq!(d.default, 0.0);
    }

    #[test]
    fn test_flags_union() {
        let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::BYPASS);
        assert!(flags.contains(ParamFlags::BYPASS));
        assert!(!flags.contains(ParamFlags::STEPPED));
    }
}
