//! Host exchange shapes: inbound arguments and the outbound result.
//!
//! The host reads these as JSON, so field names follow the host's
//! camelCase convention.

use crate::color::Color;
use crate::config::EditorConfig;
use crate::error::HostArgsError;
use crate::model::{Bbox, Bounds};
use serde::{Deserialize, Serialize};

/// One rectangle as the host sees it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RectRecord {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub label: String,
}

impl From<&Bbox> for RectRecord {
    fn from(b: &Bbox) -> Self {
        Self {
            top: b.bounds.top,
            left: b.bounds.left,
            width: b.bounds.width,
            height: b.bounds.height,
            label: b.label.clone(),
        }
    }
}

impl From<&RectRecord> for Bbox {
    fn from(r: &RectRecord) -> Self {
        Bbox::new(Bounds::new(r.left, r.top, r.width, r.height), r.label.clone())
    }
}

fn default_box_color() -> String {
    "#FF0000".to_string()
}

/// Arguments supplied by the host on every property-set change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostArgs {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub rects: Vec<RectRecord>,
    #[serde(default = "default_box_color")]
    pub box_color: String,
    /// Raw RGBA bytes, `canvas_width × canvas_height × 4` long. May be
    /// empty when the bytes travel out of band.
    #[serde(default)]
    pub image_data: Vec<u8>,
    #[serde(default)]
    pub config: EditorConfig,
}

impl HostArgs {
    pub fn new(canvas_width: u32, canvas_height: u32, rects: Vec<RectRecord>) -> Self {
        Self {
            canvas_width,
            canvas_height,
            rects,
            box_color: default_box_color(),
            image_data: Vec::new(),
            config: EditorConfig::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, HostArgsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check everything geometry math depends on. Returns the parsed
    /// outline colour.
    ///
    /// An empty `rects` list is valid. The image buffer is not checked here:
    /// a bad buffer degrades to a blank background instead of failing.
    pub fn validate(&self) -> Result<Color, HostArgsError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(HostArgsError::InvalidDimensions {
                width: self.canvas_width as f64,
                height: self.canvas_height as f64,
            });
        }
        for (index, r) in self.rects.iter().enumerate() {
            let bounds = Bounds::new(r.left, r.top, r.width, r.height);
            if !bounds.is_finite() {
                return Err(HostArgsError::InvalidRect {
                    index,
                    reason: "non-finite coordinate".into(),
                });
            }
            if r.width < 0.0 || r.height < 0.0 {
                return Err(HostArgsError::InvalidRect {
                    index,
                    reason: format!("negative size {}x{}", r.width, r.height),
                });
            }
        }
        let color = Color::parse(&self.box_color)
            .ok_or_else(|| HostArgsError::InvalidColor(self.box_color.clone()))?;
        log::debug!(
            "host args ok: {}x{}, {} rects, {} image bytes",
            self.canvas_width,
            self.canvas_height,
            self.rects.len(),
            self.image_data.len()
        );
        Ok(color)
    }

    pub fn initial_boxes(&self) -> Vec<Bbox> {
        self.rects.iter().map(Bbox::from).collect()
    }
}

/// The component's value as pushed back to the host after every mutation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HostResult {
    pub rects: Vec<RectRecord>,
}

impl HostResult {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"rects":[]}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ARGS: &str = r#"{
        "canvasWidth": 4,
        "canvasHeight": 2,
        "rects": [
            {"top": 1, "left": 2, "width": 3, "height": 4, "label": "dog"},
            {"top": 0, "left": 0, "width": 1, "height": 1}
        ],
        "boxColor": "blue"
    }"#;

    #[test]
    fn parse_and_validate() {
        let args = HostArgs::from_json(ARGS).unwrap();
        let color = args.validate().unwrap();
        assert_eq!(color.to_rgba8(), [0, 0, 255, 255]);
        assert_eq!(
            args.initial_boxes(),
            vec![
                Bbox::new(Bounds::new(2.0, 1.0, 3.0, 4.0), "dog"),
                Bbox::new(Bounds::new(0.0, 0.0, 1.0, 1.0), ""),
            ]
        );
        assert!(args.image_data.is_empty());
    }

    #[test]
    fn missing_rects_fails_fast() {
        let err = HostArgs::from_json(r#"{"canvasWidth": 4, "canvasHeight": 2}"#).unwrap_err();
        assert!(matches!(err, HostArgsError::Malformed(_)));
        assert!(err.to_string().contains("rects"));
    }

    #[test]
    fn empty_rects_is_valid() {
        let args = HostArgs::new(10, 10, Vec::new());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn rejects_zero_canvas_and_negative_rects() {
        let args = HostArgs::new(0, 10, Vec::new());
        assert!(matches!(
            args.validate(),
            Err(HostArgsError::InvalidDimensions { .. })
        ));

        let bad = RectRecord {
            width: -1.0,
            ..RectRecord::default()
        };
        let args = HostArgs::new(10, 10, vec![RectRecord::default(), bad]);
        assert!(matches!(
            args.validate(),
            Err(HostArgsError::InvalidRect { index: 1, .. })
        ));
    }

    #[test]
    fn rejects_unknown_color() {
        let mut args = HostArgs::new(10, 10, Vec::new());
        args.box_color = "not-a-colour".into();
        assert!(matches!(args.validate(), Err(HostArgsError::InvalidColor(_))));
    }

    #[test]
    fn result_serializes_in_host_field_order() {
        let result = HostResult {
            rects: vec![RectRecord::from(&Bbox::new(
                Bounds::new(2.0, 1.0, 3.0, 4.0),
                "cat",
            ))],
        };
        assert_eq!(
            result.to_json(),
            r#"{"rects":[{"top":1.0,"left":2.0,"width":3.0,"height":4.0,"label":"cat"}]}"#
        );
    }
}
