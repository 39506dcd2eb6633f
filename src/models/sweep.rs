use serde::{Deserialize, Serialize};

/// Absorber thickness in whole micrometers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thickness(u32);

impl Thickness {
    pub const fn from_micrometers(micrometers: u32) -> Self {
        Self(micrometers)
    }

    pub const fn micrometers(self) -> u32 {
        self.0
    }

    pub fn millimeters(self) -> f64 {
        f64::from(self.0) / 1000.0
    }

    /// Half-length in millimeters, which is what Geant4 box solids take
    pub fn half_length_mm(self) -> f64 {
        self.millimeters() / 2.0
    }
}

impl std::fmt::Display for Thickness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} μm", self.0)
    }
}

/// Values scraped from one simulator run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub photons_created: u64,
    pub photons_detected: u64,
    pub electrons: f64,

    /// Detected over created photons, in percent
    pub detection_efficiency: f64,
}

impl Measurement {
    pub fn new(photons_created: u64, photons_detected: u64, electrons: f64) -> Self {
        Self {
            photons_created,
            photons_detected,
            electrons,
            detection_efficiency: detection_efficiency(photons_created, photons_detected),
        }
    }
}

/// Percentage of created photons that reached the photodetector.
///
/// Zero created photons gives exactly 0.
pub fn detection_efficiency(created: u64, detected: u64) -> f64 {
    if created == 0 {
        return 0.0;
    }
    detected as f64 * 100.0 / created as f64
}

/// A thickness that made it through build, run and parse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub thickness: Thickness,
    #[serde(flatten)]
    pub measurement: Measurement,
}

/// Shape of the electron curve at the end of the sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Last point sits below the midpoint: thicker absorber stopped paying off
    PeakFound,
    NoClearPeak,
}

/// Recorded points in the order they were measured
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepResults {
    points: Vec<SweepPoint>,
}

impl SweepResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: SweepPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[SweepPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn thicknesses_um(&self) -> Vec<u32> {
        self.points.iter().map(|p| p.thickness.micrometers()).collect()
    }

    pub fn electrons(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.measurement.electrons).collect()
    }

    /// Index of the highest electron estimate, first one on ties
    pub fn optimal_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, point) in self.points.iter().enumerate() {
            let electrons = point.measurement.electrons;
            match best {
                Some((_, value)) if electrons <= value => {}
                _ => best = Some((idx, electrons)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    pub fn optimal(&self) -> Option<&SweepPoint> {
        self.optimal_index().map(|idx| &self.points[idx])
    }

    /// Coarse peak check: compares the last point against the one at `len / 2`.
    ///
    /// Returns `None` for five points or fewer.
    pub fn trend(&self) -> Option<Trend> {
        if self.points.len() <= 5 {
            return None;
        }

        let mid = self.points[self.points.len() / 2].measurement.electrons;
        let last = self.points[self.points.len() - 1].measurement.electrons;

        if last < mid {
            Some(Trend::PeakFound)
        } else {
            Some(Trend::NoClearPeak)
        }
    }
}
