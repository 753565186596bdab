//! Source feature storage: flat point buffers, part offsets, and attributes
//!
//! A [`Feature`] mirrors one shapefile record: a single point buffer shared
//! by all of the record's parts, a list of part-start offsets into that
//! buffer, and the record's named attributes.

use geo::Coord;
use std::collections::HashMap;

/// Attribute fields tried in order when deriving a display name.
const NAME_FIELDS: &[&str] = &["NAME", "ADMIN"];

/// Named attribute fields of one source record
#[derive(Clone, Debug, Default)]
pub struct AttributeRecord {
    fields: HashMap<String, String>,
}

impl AttributeRecord {
    /// Create an empty attribute record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, replacing any previous value
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Look up a field by exact name
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Derive the display name for labels and entity identifiers.
    ///
    /// Tries each field in [`NAME_FIELDS`] in order and falls back to a
    /// synthetic name built from the feature's index when none is present.
    pub fn display_name(&self, feature_index: usize) -> String {
        NAME_FIELDS
            .iter()
            .find_map(|field| self.get(field))
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Country_{feature_index}"))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}

/// One source geometric record with its attributes
///
/// Immutable after construction; a single feature may yield multiple output
/// entities, one per renderable part.
#[derive(Clone, Debug)]
pub struct Feature {
    /// Degree coordinates of every point, across all parts
    points: Vec<Coord<f64>>,
    /// Start offset of each part into `points`; strictly increasing, first 0
    part_offsets: Vec<usize>,
    /// Attributes of the source record
    attributes: AttributeRecord,
}

impl Feature {
    /// Create a new feature from its point buffer, part offsets, and
    /// attributes
    pub fn new(
        points: Vec<Coord<f64>>,
        part_offsets: Vec<usize>,
        attributes: AttributeRecord,
    ) -> Self {
        Self {
            points,
            part_offsets,
            attributes,
        }
    }

    /// Access the full point buffer
    #[inline]
    pub fn points(&self) -> &[Coord<f64>] {
        &self.points
    }

    /// Access the record's attributes
    #[inline]
    pub fn attributes(&self) -> &AttributeRecord {
        &self.attributes
    }

    /// Total number of points across all parts
    #[inline]
    pub fn total_points(&self) -> usize {
        self.points.len()
    }

    /// Whether the feature declares no points at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of declared parts
    #[inline]
    pub fn part_count(&self) -> usize {
        self.part_offsets.len()
    }

    /// Iterate over the feature's parts, in part order.
    ///
    /// Each part spans from its start offset to the next part's start offset
    /// (exclusive), or to the end of the buffer for the final part. Offsets
    /// pointing past the buffer are clamped, so a malformed record yields
    /// empty parts rather than panicking; callers skip parts that are too
    /// small to render.
    pub fn parts(&self) -> impl Iterator<Item = &[Coord<f64>]> {
        (0..self.part_offsets.len()).map(move |i| {
            let end = self
                .part_offsets
                .get(i + 1)
                .copied()
                .unwrap_or(self.points.len())
                .min(self.points.len());
            let start = self.part_offsets[i].min(end);
            &self.points[start..end]
        })
    }
}
