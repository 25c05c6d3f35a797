//! Plotted quantities and their fixed color scales.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IbmError;

/// Number of contour levels used by every filled-contour plot.
pub const CONTOUR_LEVELS: usize = 100;

/// Color scale of pressure plots.
pub const PRESSURE_RANGE: ColorRange = ColorRange::new(-0.5, 0.5);
/// Color scale of velocity-magnitude plots.
pub const VELOCITY_RANGE: ColorRange = ColorRange::new(0.0, 1.0);
/// Color scale of vorticity plots.
pub const VORTICITY_RANGE: ColorRange = ColorRange::new(-1.0, 1.0);

/// A physical quantity that can be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Pressure,
    Velocity,
    Vorticity,
}

impl Quantity {
    /// All quantities in rendering order.
    pub const ALL: [Quantity; 3] = [Quantity::Pressure, Quantity::Velocity, Quantity::Vorticity];

    /// Name used in titles, colorbar labels and image file names.
    pub fn name(self) -> &'static str {
        match self {
            Quantity::Pressure => "pressure",
            Quantity::Velocity => "velocity",
            Quantity::Vorticity => "vorticity",
        }
    }

    /// Fixed color scale, independent of the data.
    pub fn color_range(self) -> ColorRange {
        match self {
            Quantity::Pressure => PRESSURE_RANGE,
            Quantity::Velocity => VELOCITY_RANGE,
            Quantity::Vorticity => VORTICITY_RANGE,
        }
    }

    /// Whether the velocity components must be loaded.
    pub fn needs_velocity(self) -> bool {
        matches!(self, Quantity::Velocity | Quantity::Vorticity)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quantity {
    type Err = IbmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pressure" => Ok(Quantity::Pressure),
            "velocity" => Ok(Quantity::Velocity),
            "vorticity" => Ok(Quantity::Vorticity),
            other => Err(IbmError::InvalidConfig(format!("unknown quantity '{other}'"))),
        }
    }
}

/// Deduplicated quantity selection, always iterated in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuantitySet {
    pressure: bool,
    velocity: bool,
    vorticity: bool,
}

impl QuantitySet {
    pub fn all() -> Self {
        Self {
            pressure: true,
            velocity: true,
            vorticity: true,
        }
    }

    /// Parses the trailing command-line tokens.
    ///
    /// No tokens, or any `all` token, selects every quantity.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> crate::Result<Self> {
        if names.is_empty() || names.iter().any(|n| n.as_ref() == "all") {
            return Ok(Self::all());
        }
        let mut set = Self::default();
        for name in names {
            set.insert(name.as_ref().parse()?);
        }
        Ok(set)
    }

    pub fn insert(&mut self, quantity: Quantity) {
        match quantity {
            Quantity::Pressure => self.pressure = true,
            Quantity::Velocity => self.velocity = true,
            Quantity::Vorticity => self.vorticity = true,
        }
    }

    pub fn contains(&self, quantity: Quantity) -> bool {
        match quantity {
            Quantity::Pressure => self.pressure,
            Quantity::Velocity => self.velocity,
            Quantity::Vorticity => self.vorticity,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.pressure || self.velocity || self.vorticity)
    }

    pub fn iter(&self) -> impl Iterator<Item = Quantity> + '_ {
        Quantity::ALL.into_iter().filter(|q| self.contains(*q))
    }
}

impl FromIterator<Quantity> for QuantitySet {
    fn from_iter<I: IntoIterator<Item = Quantity>>(iter: I) -> Self {
        let mut set = Self::default();
        for q in iter {
            set.insert(q);
        }
        set
    }
}

/// Closed value interval mapped onto a color map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRange {
    pub min: f64,
    pub max: f64,
}

impl ColorRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range spanned by the finite values of a field, `None` if there are none.
    pub fn of_data(values: &[f64]) -> Option<Self> {
        values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some(Self::new(v, v)),
                Some(r) => Some(Self::new(r.min.min(v), r.max.max(v))),
            })
    }
}
