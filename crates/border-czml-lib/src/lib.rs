//! Border CZML Library - Shapefile Borders to CZML Polylines
//!
//! This library converts vector border geometry (country/state outlines stored
//! as multi-part shapefile polygons with dBASE attributes) into CZML documents
//! rendered as ground-clamped polylines by 3D globe viewers.
//!
//! # Architecture
//!
//! - **[`Feature`]**: Immutable storage for one source record (flat point
//!   buffer, part offsets, attributes)
//! - **[`simplify`]**: Ramer-Douglas-Peucker polyline simplification
//! - **[`ring`]**: Ring closure and cartographic radian conversion
//! - **[`EntityPacket`]** and friends: the serialized CZML packet model
//! - **[`BorderConverter`]**: Pipeline driver with adaptive tolerance
//!   selection and run statistics

mod convert;
mod czml;
mod feature;
mod reader;
pub mod ring;
pub mod simplify;

// Public API exports
pub use convert::{
    BorderConverter, Config, ConversionSummary, NullReporter, OptimizeSummary, Reporter,
    optimize_document,
};
pub use czml::{
    Color, DocumentPacket, EntityPacket, Label, LineStyle, Material, Packet, PolylineGraphics,
    Positions, SolidColor, read_document, write_document,
};
pub use feature::{AttributeRecord, Feature};
pub use reader::read_features;

/// Error types for the conversion pipeline
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("CZML document error: {0}")]
    Document(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn(Config) -> BorderConverter = BorderConverter::new;
        let _: fn() -> Config = Config::default;
        let _: fn() -> LineStyle = LineStyle::default;
    }
}
