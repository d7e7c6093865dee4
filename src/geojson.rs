//! GeoJSON features as accepted by the transaction actions.

use crate::conversions::{deserialize_id, deserialize_layer};
use crate::error::{Result, WfstError};
use crate::gml::Geometry;
use crate::types::Properties;
use serde::{Deserialize, Deserializer};

/// A GeoJSON feature plus the foreign members understood by the WFS-T
/// builders (`layer`, `ns`, `geometry_name`, ...).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Feature {
    /// Either a bare local id (`"1"`) or one already qualified with its layer
    /// (`"roads.1"`). Numeric ids are converted to strings.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    pub geometry: Option<Geometry>,
    pub properties: Option<Properties>,
    #[serde(deserialize_with = "deserialize_layer")]
    pub layer: Option<String>,
    pub ns: Option<String>,
    pub geometry_name: Option<String>,
    #[serde(rename = "srsName")]
    pub srs_name: Option<String>,
    pub whitelist: Option<Vec<String>>,
    pub filter: Option<String>,
    #[serde(rename = "typeName")]
    pub type_name: Option<String>,
    #[serde(rename = "inputFormat")]
    pub input_format: Option<String>,
    pub handle: Option<String>,
}

impl Feature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn with_ns(mut self, ns: impl Into<String>) -> Self {
        self.ns = Some(ns.into());
        self
    }

    /// Name of the field the geometry is written to. Without it, the
    /// geometry is left out of the generated XML.
    pub fn with_geometry_name(mut self, geometry_name: impl Into<String>) -> Self {
        self.geometry_name = Some(geometry_name.into());
        self
    }

    pub fn with_srs_name(mut self, srs_name: impl Into<String>) -> Self {
        self.srs_name = Some(srs_name.into());
        self
    }

    pub fn with_whitelist<I, S>(mut self, whitelist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = Some(whitelist.into_iter().map(Into::into).collect());
        self
    }
}

/// A GeoJSON feature collection.
///
/// `ns`, `layer` and `srsName` given on the collection are fallbacks for the
/// features that don't set them.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeatureCollection {
    #[serde(deserialize_with = "deserialize_features")]
    pub features: Vec<Feature>,
    pub ns: Option<String>,
    #[serde(deserialize_with = "deserialize_layer")]
    pub layer: Option<String>,
    #[serde(rename = "srsName")]
    pub srs_name: Option<String>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            ..Default::default()
        }
    }

    /// The features with the collection-level fallbacks applied.
    pub fn into_features(self) -> Vec<Feature> {
        let FeatureCollection {
            features,
            ns,
            layer,
            srs_name,
        } = self;
        features
            .into_iter()
            .map(|mut feature| {
                fill_missing(&mut feature.ns, &ns);
                fill_missing(&mut feature.layer, &layer);
                fill_missing(&mut feature.srs_name, &srs_name);
                feature
            })
            .collect()
    }
}

fn fill_missing(target: &mut Option<String>, fallback: &Option<String>) {
    if target.as_deref().is_none_or(str::is_empty) && fallback.is_some() {
        target.clone_from(fallback);
    }
}

fn deserialize_features<'de, D>(deserializer: D) -> std::result::Result<Vec<Feature>, D::Error>
where
    D: Deserializer<'de>,
{
    let features = Option::<Vec<Option<Feature>>>::deserialize(deserializer)?;
    Ok(features.into_iter().flatten().flatten().collect())
}

/// Anything the actions accept as "features".
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureInput {
    Feature(Box<Feature>),
    Features(Vec<Feature>),
    Collection(FeatureCollection),
}

impl Default for FeatureInput {
    fn default() -> Self {
        FeatureInput::Features(Vec::new())
    }
}

impl FeatureInput {
    /// Normalize to a list of features.
    pub fn into_features(self) -> Vec<Feature> {
        match self {
            FeatureInput::Feature(feature) => vec![*feature],
            FeatureInput::Features(features) => features,
            FeatureInput::Collection(collection) => collection.into_features(),
        }
    }

    /// Classify a JSON document.
    ///
    /// - an array is a list of features (`null` entries are dropped)
    /// - an object with `"type": "FeatureCollection"` or a `features` array is
    ///   a collection
    /// - any other object is a single feature
    /// - `null` is an empty list
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;

        match value {
            Json::Null => Ok(FeatureInput::default()),
            Json::Array(entries) => {
                let features = entries
                    .into_iter()
                    .filter(|entry| !entry.is_null())
                    .map(serde_json::from_value::<Feature>)
                    .collect::<std::result::Result<Vec<Feature>, _>>()?;
                Ok(FeatureInput::Features(features))
            }
            Json::Object(ref object) => {
                let is_collection = object.get("type").and_then(Json::as_str)
                    == Some("FeatureCollection")
                    || object.get("features").is_some_and(Json::is_array);
                if is_collection {
                    Ok(FeatureInput::Collection(serde_json::from_value(value)?))
                } else {
                    Ok(FeatureInput::Feature(Box::new(serde_json::from_value(value)?)))
                }
            }
            other => Err(WfstError::InvalidFeatureInput(other.to_string())),
        }
    }

    /// Parse and classify a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json(serde_json::from_str(json)?)
    }
}

impl From<Feature> for FeatureInput {
    fn from(feature: Feature) -> Self {
        FeatureInput::Feature(Box::new(feature))
    }
}

impl From<Vec<Feature>> for FeatureInput {
    fn from(features: Vec<Feature>) -> Self {
        FeatureInput::Features(features)
    }
}

impl From<&[Feature]> for FeatureInput {
    fn from(features: &[Feature]) -> Self {
        FeatureInput::Features(features.to_vec())
    }
}

impl From<FeatureCollection> for FeatureInput {
    fn from(collection: FeatureCollection) -> Self {
        FeatureInput::Collection(collection)
    }
}

impl<'de> Deserialize<'de> for FeatureInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        FeatureInput::from_json(value).map_err(serde::de::Error::custom)
    }
}
