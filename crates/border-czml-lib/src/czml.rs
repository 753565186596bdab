//! CZML packet model and document I/O
//!
//! Models the subset of the CZML schema needed for ground-clamped border
//! polylines: the document header packet and entity packets carrying a
//! polyline with solid-color material and an optional label. Documents are
//! written as compact JSON arrays with the header packet first.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// CZML format version written into the document header packet
pub const CZML_VERSION: &str = "1.0";

/// One element of a CZML document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Packet {
    Document(DocumentPacket),
    Entity(EntityPacket),
}

/// The document header packet, always the first element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentPacket {
    pub id: String,
    pub name: String,
    pub version: String,
}

impl DocumentPacket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: "document".to_owned(),
            name: name.into(),
            version: CZML_VERSION.to_owned(),
        }
    }
}

/// One renderable polyline entity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityPacket {
    pub id: String,
    pub polyline: PolylineGraphics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolylineGraphics {
    pub positions: Positions,
    pub material: Material,
    pub width: f64,
    pub clamp_to_ground: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Positions {
    /// Flat (longitude, latitude, height) triples in radians/meters
    pub cartographic_radians: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub solid_color: SolidColor,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolidColor {
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub rgba: [u8; 4],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
}

/// Rendering style shared by every polyline of one conversion run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    pub rgba: [u8; 4],
    pub width: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            rgba: [255, 255, 255, 255],
            width: 1.0,
        }
    }
}

impl EntityPacket {
    /// Build the packet for one converted polygon part.
    ///
    /// The identifier combines display name, feature index, and part index,
    /// which makes it unique across the run. The label rides on the first
    /// part of each feature only; remaining parts render unlabeled.
    pub fn new(
        display_name: &str,
        feature_index: usize,
        part_index: usize,
        cartographic_radians: Vec<f64>,
        style: LineStyle,
    ) -> Self {
        Self {
            id: format!("{display_name}_{feature_index}_{part_index}"),
            polyline: PolylineGraphics {
                positions: Positions {
                    cartographic_radians,
                },
                material: Material {
                    solid_color: SolidColor {
                        color: Color { rgba: style.rgba },
                    },
                },
                width: style.width,
                clamp_to_ground: true,
            },
            label: (part_index == 0).then(|| Label {
                text: display_name.to_owned(),
            }),
        }
    }
}

/// Write a document as a compact JSON array
pub fn write_document<W: Write>(writer: W, packets: &[Packet]) -> Result<()> {
    serde_json::to_writer(writer, packets)?;
    Ok(())
}

/// Read a document back into its packet list
pub fn read_document<R: Read>(reader: R) -> Result<Vec<Packet>> {
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(part_index: usize) -> EntityPacket {
        EntityPacket::new(
            "France",
            2,
            part_index,
            vec![0.1, 0.2, 0.0, 0.3, 0.4, 0.0],
            LineStyle::default(),
        )
    }

    #[test]
    fn test_document_packet_fields() {
        let value = serde_json::to_value(DocumentPacket::new("Borders")).unwrap();
        assert_eq!(value["id"], "document");
        assert_eq!(value["name"], "Borders");
        assert_eq!(value["version"], "1.0");
    }

    #[test]
    fn test_entity_packet_field_names() {
        let value = serde_json::to_value(entity(0)).unwrap();
        assert_eq!(value["id"], "France_2_0");
        assert_eq!(
            value["polyline"]["positions"]["cartographicRadians"]
                .as_array()
                .unwrap()
                .len(),
            6
        );
        assert_eq!(
            value["polyline"]["material"]["solidColor"]["color"]["rgba"],
            serde_json::json!([255, 255, 255, 255])
        );
        assert_eq!(value["polyline"]["width"], 1.0);
        assert_eq!(value["polyline"]["clampToGround"], true);
        assert_eq!(value["label"]["text"], "France");
    }

    #[test]
    fn test_label_only_on_first_part() {
        assert!(entity(0).label.is_some());
        assert!(entity(1).label.is_none());

        // The label key must be absent on later parts, not serialized as null
        let value = serde_json::to_value(entity(1)).unwrap();
        assert!(value.get("label").is_none());
    }

    #[test]
    fn test_document_roundtrip() {
        let packets = vec![
            Packet::Document(DocumentPacket::new("Borders")),
            Packet::Entity(entity(0)),
            Packet::Entity(entity(1)),
        ];

        let mut buffer = Vec::new();
        write_document(&mut buffer, &packets).unwrap();
        let restored = read_document(buffer.as_slice()).unwrap();
        assert_eq!(restored, packets);
    }

    #[test]
    fn test_written_json_is_compact() {
        let packets = vec![Packet::Document(DocumentPacket::new("Borders"))];
        let mut buffer = Vec::new();
        write_document(&mut buffer, &packets).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(!text.contains('\n'));
        assert!(text.starts_with("[{"));
    }
}
