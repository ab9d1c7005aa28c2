use crate::shared::domain::model::value_objects::metadata_version::MetadataVersion;

/// Steps of resolving the version a datasource is built for. A lookup miss
/// moves to `Unknown`; a recompute runs once, after which the version is
/// either `Resolved` or `StillUnknown`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetadataVersionResolution {
    Unknown,
    Recomputing,
    Resolved(MetadataVersion),
    StillUnknown,
}

impl MetadataVersionResolution {
    pub fn from_lookup(version: Option<MetadataVersion>) -> Self {
        match version {
            Some(version) => Self::Resolved(version),
            None => Self::Unknown,
        }
    }

    pub fn after_recompute_lookup(version: Option<MetadataVersion>) -> Self {
        match version {
            Some(version) => Self::Resolved(version),
            None => Self::StillUnknown,
        }
    }
}
