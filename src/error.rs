use std::error::Error;
use std::fmt;

/// Crate error type for GML / WFS-T generation.
#[derive(Debug)]
pub enum WfstError {
    /// Wraps errors returned by `serde_json`.
    Json(serde_json::Error),
    /// Wraps errors returned by the `wkb` crate.
    Wkb(wkb::error::WkbError),
    /// WKT text could not be parsed.
    #[cfg(feature = "wkt")]
    Wkt(String),
    /// A tag was requested without a tag name.
    MissingTagName { ns: String },
    /// A geometry `type` is not one of the GML-mappable kinds.
    UnsupportedGeometryType(String),
    /// The geometry is structurally unusable (wrong coordinate nesting, no rings, ...).
    InvalidGeometry {
        geometry_type: &'static str,
        reason: String,
    },
    /// Neither an explicit `typeName` nor both `ns` and `layer` are available.
    MissingTypeName { ns: String, layer: String },
    /// A namespace prefix is used in the generated XML without a URI.
    UnassignedNamespace(String),
    /// The actions passed to a transaction have none of the accepted shapes.
    InvalidActions(String),
    /// A property value is NaN.
    NanProperty { property: String },
    /// A JSON document is neither a feature, an array of features, nor a
    /// feature collection.
    InvalidFeatureInput(String),
}

impl fmt::Display for WfstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "{err}"),
            Self::Wkb(err) => write!(f, "{err}"),
            #[cfg(feature = "wkt")]
            Self::Wkt(err) => write!(f, "invalid wkt: {err}"),
            Self::MissingTagName { ns } => {
                if ns.is_empty() {
                    write!(f, "no tag name supplied")
                } else {
                    write!(f, "no tag name supplied for namespace '{ns}'")
                }
            }
            Self::UnsupportedGeometryType(ty) => write!(f, "unsupported geometry type: {ty}"),
            Self::InvalidGeometry {
                geometry_type,
                reason,
            } => write!(f, "invalid {geometry_type} geometry: {reason}"),
            Self::MissingTypeName { ns, layer } => write!(
                f,
                "no typeName possible: typeName is missing and ns ('{ns}') or layer ('{layer}') is empty"
            ),
            Self::UnassignedNamespace(ns) => write!(f, "unassigned namespace {ns}"),
            Self::InvalidActions(input) => write!(f, "unexpected transaction actions: {input}"),
            Self::NanProperty { property } => {
                write!(f, "NaN is not allowed (property '{property}')")
            }
            Self::InvalidFeatureInput(input) => write!(
                f,
                "expected a Feature, an array of Features, or a FeatureCollection, got {input}"
            ),
        }
    }
}

impl Error for WfstError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Wkb(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WfstError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<wkb::error::WkbError> for WfstError {
    fn from(err: wkb::error::WkbError) -> Self {
        Self::Wkb(err)
    }
}

pub type Result<T> = std::result::Result<T, WfstError>;
