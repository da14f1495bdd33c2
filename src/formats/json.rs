//! JSON documents holding a palette or gradients.
//!
//! Colors are written as
//! `{"name": "...", "colorSpace": "RGB", "colorComponents": [1, 0, 0]}`,
//! with optional `colorType` and `alpha` entries.

use serde_json::Value;
use crate::coder::{expect_gradients, expect_palette, Coder, Model, ModelKind};
use crate::error::{Error, Result};
use crate::gradient::{Gradient, Gradients};
use crate::io::text::decode_text;
use crate::io::ByteReader;
use crate::palette::Palette;

fn read_document(s: &mut ByteReader<'_>) -> Result<Value> {
    let text = decode_text(s.read_bytes(s.remaining())?)?;
    Ok(serde_json::from_str(&text)?)
}

/// Coder for palettes stored as `{"name", "colors", "groups"}` objects.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonPaletteCoder;

impl Coder for JsonPaletteCoder {
    fn name(&self) -> &'static str { "json-palette" }

    fn extensions(&self) -> &'static [&'static str] { &["jsoncolorpalette"] }

    fn kind(&self) -> ModelKind { ModelKind::Palette }

    fn decode_stream(&self, s: &mut ByteReader<'_>) -> Result<Model> {
        let palette: Palette = serde_json::from_value(read_document(s)?)?;
        Ok(palette.with_format(self.name()).into())
    }

    fn encode(&self, model: &Model) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(expect_palette(self, model)?)?)
    }
}

/// Coder for gradients stored as `{"gradients": [...]}`.  A document
/// holding a single gradient object is also accepted.  Every gradient
/// must have at least one color stop.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonGradientCoder;

impl Coder for JsonGradientCoder {
    fn name(&self) -> &'static str { "json-gradient" }

    fn extensions(&self) -> &'static [&'static str] { &["jsongradient"] }

    fn kind(&self) -> ModelKind { ModelKind::Gradients }

    fn decode_stream(&self, s: &mut ByteReader<'_>) -> Result<Model> {
        let doc = read_document(s)?;
        let gradients: Gradients = if doc.get("gradients").is_some() {
            serde_json::from_value(doc)?
        } else {
            serde_json::from_value::<Gradient>(doc)?.into()
        };
        if gradients.is_empty() {
            return Err(Error::invalid("json-gradient: no gradient"))
        }
        if let Some(i) = gradients.iter().position(|g| g.stops.is_empty()) {
            return Err(Error::invalid(format!(
                "json-gradient: gradient {i} has no color stop")))
        }
        Ok(gradients.into())
    }

    fn encode(&self, model: &Model) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(expect_gradients(self, model)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, ColorType};
    use crate::error::{Error, ErrorKind};
    use crate::gradient::{Stop, TransparencyStop};
    use crate::palette::Group;

    #[test]
    fn palette_document() {
        let doc = br#"{
            "name": "Brand",
            "colors": [
                {"name": "Ink", "colorSpace": "CMYK",
                 "colorComponents": [0, 0, 0, 1], "colorType": "spot"}
            ],
            "groups": [
                {"name": "Accents",
                 "colors": [{"colorSpace": "RGB", "colorComponents": [1, 0.5, 0],
                             "alpha": 0.5}]}
            ]
        }"#;
        let p = JsonPaletteCoder.decode_palette(doc).unwrap();
        assert_eq!(p.format, Some("json-palette"));
        assert_eq!(p.name, "Brand");
        assert_eq!(p.colors, [Color::cmyk(0., 0., 0., 1.).with_name("Ink")
                              .with_color_type(ColorType::Spot)]);
        assert_eq!(p.groups, [Group::new("Accents",
                                         vec![Color::rgba(1., 0.5, 0., 0.5)])]);
        let bytes = JsonPaletteCoder.encode(&p.clone().into()).unwrap();
        assert_eq!(JsonPaletteCoder.decode_palette(&bytes).unwrap(), p);
    }

    #[test]
    fn component_count_is_checked() {
        let doc = br#"{"colors": [{"colorSpace": "RGB", "colorComponents": [1]}]}"#;
        let e = JsonPaletteCoder.decode(doc).unwrap_err();
        assert!(matches!(e, Error::Json(_)));
        assert_eq!(e.kind(), ErrorKind::Format);
    }

    #[test]
    fn gradient_documents() {
        let mut g = Gradient::named("fade", vec![
            Stop::new(0., Color::rgb(1., 0., 0.)),
            Stop::new(1., Color::gray(1.))]);
        g.transparency_stops = Some(vec![TransparencyStop::new(0., 1.),
                                         TransparencyStop::new(1., 0.)]);
        let model = Model::from(g.clone());
        let bytes = JsonGradientCoder.encode(&model).unwrap();
        assert_eq!(JsonGradientCoder.decode(&bytes).unwrap(), model);

        let single = serde_json::to_vec(&g).unwrap();
        assert_eq!(JsonGradientCoder.decode(&single).unwrap(), model);
    }

    #[test]
    fn documents_without_stops_are_rejected() {
        let palette = br#"{"name": "Brand", "colors": []}"#;
        assert!(matches!(JsonGradientCoder.decode(palette),
                         Err(Error::InvalidData(_))));
        assert!(JsonGradientCoder.decode(b"{}").is_err());
        assert!(JsonGradientCoder.decode(br#"{"gradients": []}"#).is_err());
        let doc = br#"{"gradients": [{"stops": [{"position": 0,
            "color": {"colorSpace": "Gray", "colorComponents": [0]}}]},
            {"name": "empty"}]}"#;
        assert!(JsonGradientCoder.decode(doc).is_err());
    }

    #[test]
    fn wrong_model() {
        let e = JsonGradientCoder.encode(&Palette::new().into()).unwrap_err();
        assert!(matches!(e, Error::UnsupportedModel { .. }));
        assert!(JsonPaletteCoder.decode(b"not json").is_err());
    }
}
