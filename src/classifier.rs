use anyhow::Result;
use rand::Rng;

use crate::analysis::{severity_band, SeverityBand, SEVERITY_MAX, SEVERITY_MIN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub severity: u8,
    pub summary: String,
}

/// The seam where a real image model plugs in. Implementations score the
/// photo bytes on the 1-10 scale and supply a short human-readable note;
/// everything downstream (history, aggregates, storage) is model-agnostic.
pub trait SeverityClassifier: Send + Sync {
    fn classify(&self, image_bytes: &[u8]) -> Result<Classification>;
}

/// Placeholder classifier: draws a uniform severity and describes the band.
/// Stands in until a real model is wired up behind the trait.
pub struct SimulatedClassifier;

impl SeverityClassifier for SimulatedClassifier {
    fn classify(&self, _image_bytes: &[u8]) -> Result<Classification> {
        let severity = rand::thread_rng().gen_range(SEVERITY_MIN..=SEVERITY_MAX);

        let summary = match severity_band(f64::from(severity)) {
            SeverityBand::Low => "Limited plaque involvement.",
            SeverityBand::Medium => "Moderate plaque involvement.",
            SeverityBand::High => "Extensive plaque involvement.",
        };

        Ok(Classification {
            severity,
            summary: summary.to_string(),
        })
    }
}
