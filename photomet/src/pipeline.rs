//! Per-pixel correction over a whole cube.
//!
//! Each pixel goes through a fixed sequence of checks; the first that applies
//! decides the output:
//!
//! 1. special input value: copied unchanged
//! 2. no view of the target: null
//! 3. unusable geometry: null
//! 4. incidence or emission at or beyond 90 degrees: null
//! 5. incidence or emission above the configured maxima: null
//! 6. otherwise the engine's correction, or null if it has none
//!
//! Steps 4 and 5 look at the local angles when DEM use is enabled and at the
//! ellipsoid angles otherwise.

use crate::config::PipelineOptions;
use crate::engine::CorrectionEngine;
use crate::geometry::{GeometryProvider, Pixel};
use cube::{is_special, process_by_line, Cube, CubeError, NULL8};
use std::fmt;

/// Hard limit for incidence and emission, degrees
pub const HORIZON: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelOutcome {
    Copy(f64),
    Null,
    Corrected { multiplier: f64, base: f64 },
}

impl PixelOutcome {
    /// Output value for an input DN
    pub fn value(&self, dn: f64) -> f64 {
        match *self {
            PixelOutcome::Copy(v) => v,
            PixelOutcome::Null => NULL8,
            PixelOutcome::Corrected { multiplier, base } => dn * multiplier + base,
        }
    }
}

/// Pixel counts by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub copied: usize,
    pub nulled: usize,
    pub corrected: usize,
}

impl PipelineStats {
    fn count(&mut self, outcome: &PixelOutcome) {
        match outcome {
            PixelOutcome::Copy(_) => self.copied += 1,
            PixelOutcome::Null => self.nulled += 1,
            PixelOutcome::Corrected { .. } => self.corrected += 1,
        }
    }

    fn merge(mut self, other: PipelineStats) -> Self {
        self.copied += other.copied;
        self.nulled += other.nulled;
        self.corrected += other.corrected;
        self
    }

    pub fn total(&self) -> usize {
        self.copied + self.nulled + self.corrected
    }
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pixels: {} corrected, {} nulled, {} copied",
            self.total(),
            self.corrected,
            self.nulled,
            self.copied
        )
    }
}

pub struct PixelPipeline<'a> {
    engine: &'a CorrectionEngine,
    provider: &'a dyn GeometryProvider,
    options: PipelineOptions,
}

impl<'a> PixelPipeline<'a> {
    pub fn new(
        engine: &'a CorrectionEngine,
        provider: &'a dyn GeometryProvider,
        options: PipelineOptions,
    ) -> Self {
        Self {
            engine,
            provider,
            options,
        }
    }

    /// Decide what happens to one pixel
    pub fn classify(&self, pixel: Pixel, dn: f64) -> PixelOutcome {
        if is_special(dn) {
            return PixelOutcome::Copy(dn);
        }
        let Some(sample) = self.provider.sample(pixel) else {
            return PixelOutcome::Null;
        };
        if !sample.valid {
            return PixelOutcome::Null;
        }

        let (incidence, emission) = sample.surface_angles(self.options.use_dem);
        if incidence >= HORIZON || emission >= HORIZON {
            return PixelOutcome::Null;
        }
        if incidence > self.options.max_incidence || emission > self.options.max_emission {
            return PixelOutcome::Null;
        }

        match self.engine.compute(&sample, dn) {
            Some(c) => PixelOutcome::Corrected {
                multiplier: c.multiplier,
                base: c.base,
            },
            None => PixelOutcome::Null,
        }
    }

    /// Correct every pixel of `input`, lines in parallel.
    ///
    /// The output has the input's dimensions and label.
    pub fn run(&self, input: &Cube) -> Result<(Cube, PipelineStats), CubeError> {
        let mut output = input.like(NULL8);
        let line_stats = process_by_line(input, &mut output.data, |index, in_row, mut out_row| {
            let mut stats = PipelineStats::default();
            for (i, (out, &dn)) in out_row.iter_mut().zip(in_row.iter()).enumerate() {
                let pixel = Pixel::new(index.sample(i), index.line, index.band);
                let outcome = self.classify(pixel, dn);
                stats.count(&outcome);
                *out = outcome.value(dn);
            }
            stats
        })?;

        let stats = line_stats
            .into_iter()
            .fold(PipelineStats::default(), PipelineStats::merge);
        log::info!("Processed {stats}");
        Ok((output, stats))
    }
}
