//! Conversion driver: features to CZML packets with adaptive simplification
//!
//! This module orchestrates the pipeline over all features: part extraction,
//! tolerance selection, simplification, ring closure, radian conversion, and
//! entity assembly, while accumulating run statistics. It also hosts the
//! re-optimizer for documents that were already converted.

use crate::czml::{DocumentPacket, EntityPacket, LineStyle, Packet};
use crate::feature::Feature;
use crate::{ring, simplify};
use geo::Coord;

/// Parts at or below this size bypass simplification
const MIN_SIMPLIFY_POINTS: usize = 20;

/// Parts with fewer points than this are not renderable and are skipped.
const MIN_PART_POINTS: usize = 2;

/// Configuration for one conversion run
#[derive(Clone, Debug)]
pub struct Config {
    /// Name written into the CZML document header packet
    pub document_name: String,
    /// Base simplification tolerance in degrees, scaled per part size
    pub base_epsilon: f64,
    /// Rendering style shared by every emitted polyline
    pub line_style: LineStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_name: "Country Borders".to_owned(),
            base_epsilon: 0.001,
            line_style: LineStyle::default(),
        }
    }
}

/// Aggregate statistics of one conversion run
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConversionSummary {
    /// Features examined, including ones skipped for empty geometry
    pub features_processed: usize,
    /// Entity packets emitted
    pub entities_emitted: usize,
    /// Part points entering simplification
    pub points_before: usize,
    /// Part points surviving simplification
    pub points_after: usize,
}

impl ConversionSummary {
    /// Percentage of points removed by simplification
    pub fn point_reduction_percent(&self) -> f64 {
        if self.points_before == 0 {
            return 0.0;
        }
        (self.points_before - self.points_after) as f64 / self.points_before as f64 * 100.0
    }
}

/// Statistics of one document re-optimization
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OptimizeSummary {
    /// Entity polylines visited
    pub polylines: usize,
    /// Positions before simplification
    pub points_before: usize,
    /// Positions after simplification
    pub points_after: usize,
}

/// Progress observer invoked at feature- and run-completion boundaries.
///
/// Injected into [`BorderConverter::convert`] so progress reporting stays
/// out of the core pipeline; both methods default to doing nothing.
pub trait Reporter {
    /// Called after each feature has been processed
    fn feature_converted(&mut self, feature_index: usize, entities_emitted: usize) {
        let _ = (feature_index, entities_emitted);
    }

    /// Called once when the run completes
    fn run_completed(&mut self, summary: &ConversionSummary) {
        let _ = summary;
    }
}

/// Reporter that ignores all events
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Select the simplification tolerance for a part of the given size.
///
/// Larger parts tolerate coarser simplification without visible distortion
/// at typical render scale, so the base tolerance is scaled up with size.
fn epsilon_for_part(base_epsilon: f64, point_count: usize) -> f64 {
    match point_count {
        n if n > 1000 => base_epsilon * 2.0,
        n if n > 500 => base_epsilon * 1.5,
        n if n > 100 => base_epsilon,
        _ => base_epsilon * 0.5,
    }
}

/// Pipeline driver converting source features into a CZML packet sequence
pub struct BorderConverter {
    config: Config,
}

impl BorderConverter {
    /// Create a converter with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convert all features into a packet sequence plus a run summary.
    ///
    /// The packet sequence starts with the document header. Entities are
    /// emitted in feature order, then part order within each feature; this
    /// ordering is part of the output contract.
    pub fn convert(
        &self,
        features: &[Feature],
        reporter: &mut dyn Reporter,
    ) -> (Vec<Packet>, ConversionSummary) {
        let mut packets = vec![Packet::Document(DocumentPacket::new(
            &self.config.document_name,
        ))];
        let mut summary = ConversionSummary::default();

        for (feature_index, feature) in features.iter().enumerate() {
            summary.features_processed += 1;

            if feature.is_empty() {
                tracing::warn!(feature_index, "skipping feature with empty point buffer");
                reporter.feature_converted(feature_index, summary.entities_emitted);
                continue;
            }

            let display_name = feature.attributes().display_name(feature_index);

            for (part_index, part) in feature.parts().enumerate() {
                if let Some(packet) =
                    self.convert_part(&display_name, feature_index, part_index, part, &mut summary)
                {
                    packets.push(Packet::Entity(packet));
                    summary.entities_emitted += 1;
                }
            }

            reporter.feature_converted(feature_index, summary.entities_emitted);
        }

        reporter.run_completed(&summary);
        (packets, summary)
    }

    /// Run one part through the pipeline, or skip it if degenerate
    fn convert_part(
        &self,
        display_name: &str,
        feature_index: usize,
        part_index: usize,
        part: &[Coord<f64>],
        summary: &mut ConversionSummary,
    ) -> Option<EntityPacket> {
        if part.len() < MIN_PART_POINTS {
            tracing::debug!(
                feature_index,
                part_index,
                points = part.len(),
                "skipping degenerate part"
            );
            return None;
        }

        summary.points_before += part.len();

        let mut outline = if part.len() > MIN_SIMPLIFY_POINTS {
            let epsilon = epsilon_for_part(self.config.base_epsilon, part.len());
            simplify::simplify(part, epsilon)
        } else {
            part.to_vec()
        };
        summary.points_after += outline.len();

        ring::close_ring(&mut outline);
        if outline.len() < MIN_PART_POINTS {
            return None;
        }

        let positions = ring::to_cartographic_radians(&outline);
        Some(EntityPacket::new(
            display_name,
            feature_index,
            part_index,
            positions,
            self.config.line_style,
        ))
    }
}

/// Re-simplify the polylines of an already-converted document in place.
///
/// `tolerance` is in radians, matching the stored coordinate encoding. The
/// document header, styling, and labels are left untouched; each entity's
/// positions buffer is un-flattened, simplified, and re-flattened with the
/// fixed ground height. Closed rings stay closed because simplification
/// preserves both endpoints.
pub fn optimize_document(packets: &mut [Packet], tolerance: f64) -> OptimizeSummary {
    let mut summary = OptimizeSummary::default();

    for packet in packets {
        let Packet::Entity(entity) = packet else {
            continue;
        };
        let positions = &mut entity.polyline.positions.cartographic_radians;

        let points = ring::unflatten(positions);
        summary.polylines += 1;
        summary.points_before += points.len();

        let simplified = simplify::simplify(&points, tolerance);
        summary.points_after += simplified.len();

        *positions = ring::flatten(&simplified);
    }

    summary
}
