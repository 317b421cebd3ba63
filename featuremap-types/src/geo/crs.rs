use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cartesian::Point2d;
use crate::error::GeometryError;
use crate::geo::projection::{
    ChainProjection, IdentityProjection, InvertedProjection, Projection, WebMercator,
};

/// Boxed projection between two coordinate reference systems.
pub type BoxedProjection = Box<dyn Projection<InPoint = Point2d, OutPoint = Point2d>>;

/// Coordinate reference descriptor.
///
/// The descriptor is an immutable value holding a normalized definition string. Two descriptors are equal when their
/// normalized definitions are equal. Three definition forms are accepted:
/// * authority codes, e.g. `EPSG:4326` (the authority name is case-insensitive),
/// * PROJ strings, e.g. `+proj=longlat +datum=WGS84 +no_defs`,
/// * `geodesy` operator definitions, e.g. `utm zone=32`.
///
/// A descriptor only tells how coordinates should be interpreted. Replacing the descriptor of a collection never
/// changes the coordinates, use reprojection for that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Crs {
    definition: Cow<'static, str>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CrsKind {
    Geographic,
    WebMercator,
    Other,
}

impl Crs {
    /// Geographic WGS84 coordinates (longitude, latitude) in degrees. Defined, but not projected.
    pub const WGS84: Crs = Crs {
        definition: Cow::Borrowed("EPSG:4326"),
    };

    /// Web mercator projection.
    pub const EPSG3857: Crs = Crs {
        definition: Cow::Borrowed("EPSG:3857"),
    };

    /// Parses and normalizes a definition.
    pub fn parse(definition: &str) -> Result<Self, GeometryError> {
        let invalid = || GeometryError::InvalidCrs(definition.to_string());
        let tokens: Vec<&str> = definition.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            return Err(invalid());
        };

        let normalized = if first.starts_with('+') {
            let is_valid = tokens.iter().all(|t| t.len() > 1 && t.starts_with('+'))
                && tokens
                    .iter()
                    .any(|t| t.strip_prefix("+proj=").is_some_and(|v| !v.is_empty()));
            if !is_valid {
                return Err(invalid());
            }
            tokens.join(" ")
        } else if tokens.len() == 1 && first.contains(':') {
            let (authority, code) = first.split_once(':').ok_or_else(invalid)?;
            let is_valid = !authority.is_empty()
                && !code.is_empty()
                && authority.chars().all(|c| c.is_ascii_alphanumeric())
                && code.chars().all(|c| c.is_ascii_alphanumeric());
            if !is_valid {
                return Err(invalid());
            }
            format!("{}:{}", authority.to_ascii_uppercase(), code)
        } else {
            let is_valid = first
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic())
                && first.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !is_valid {
                return Err(invalid());
            }
            tokens.join(" ")
        };

        Ok(Self {
            definition: Cow::Owned(normalized),
        })
    }

    /// Normalized definition string.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Returns true for geographic (longitude/latitude) systems on the WGS84 datum.
    ///
    /// PROJ strings with `+proj=longlat` count as geographic only if they name no datum or ellipsoid, or name
    /// `WGS84`. Longitude/latitude on other datums is converted through the `geodesy` backend like any other system.
    pub fn is_geographic(&self) -> bool {
        self.kind() == CrsKind::Geographic
    }

    fn kind(&self) -> CrsKind {
        match self.definition() {
            "EPSG:4326" | "OGC:CRS84" => CrsKind::Geographic,
            "EPSG:3857" | "EPSG:900913" | "EPSG:3785" => CrsKind::WebMercator,
            def if def.starts_with('+') => {
                if def
                    .split_whitespace()
                    .any(|t| t == "+proj=longlat" || t == "+proj=latlong")
                    && is_wgs84_datum(def)
                {
                    CrsKind::Geographic
                } else if def.split_whitespace().any(|t| t == "+proj=webmerc") {
                    CrsKind::WebMercator
                } else {
                    CrsKind::Other
                }
            }
            _ => CrsKind::Other,
        }
    }

    /// Returns the projection converting coordinates from this system into `target`.
    ///
    /// Returns `None` if the conversion is not known. Conversions between geographic coordinates and web mercator are
    /// always available, others require the `geodesy` feature and a PROJ string or `geodesy` operator definition.
    pub fn projection_to(&self, target: &Crs) -> Option<BoxedProjection> {
        if self == target {
            return Some(Box::new(IdentityProjection::<Point2d, Point2d>::new()));
        }

        match (self.kind(), target.kind()) {
            (CrsKind::Geographic, CrsKind::Geographic)
            | (CrsKind::WebMercator, CrsKind::WebMercator) => {
                Some(Box::new(IdentityProjection::<Point2d, Point2d>::new()))
            }
            (CrsKind::Geographic, CrsKind::WebMercator) => Some(Box::new(WebMercator::<Point2d, Point2d>::default())),
            (CrsKind::WebMercator, CrsKind::Geographic) => Some(Box::new(
                InvertedProjection::new(WebMercator::<Point2d, Point2d>::default()),
            )),
            (CrsKind::Geographic, CrsKind::Other) => target.projection_from_geographic(),
            (CrsKind::Other, CrsKind::Geographic) => self.projection_to_geographic(),
            (CrsKind::WebMercator, CrsKind::Other) => Some(Box::new(ChainProjection::new(
                InvertedProjection::new(WebMercator::<Point2d, Point2d>::default()),
                target.projection_from_geographic()?,
            ))),
            (CrsKind::Other, CrsKind::WebMercator) => Some(Box::new(ChainProjection::new(
                self.projection_to_geographic()?,
                WebMercator::<Point2d, Point2d>::default(),
            ))),
            (CrsKind::Other, CrsKind::Other) => Some(Box::new(ChainProjection::new(
                self.projection_to_geographic()?,
                target.projection_from_geographic()?,
            ))),
        }
    }

    #[cfg(feature = "geodesy")]
    fn projection_from_geographic(&self) -> Option<BoxedProjection> {
        let projection =
            crate::geo::projection::GeodesyProjection::<Point2d, Point2d>::new(&self.geodesy_definition()?)?;
        Some(Box::new(projection))
    }

    #[cfg(feature = "geodesy")]
    fn projection_to_geographic(&self) -> Option<BoxedProjection> {
        let projection =
            crate::geo::projection::GeodesyProjection::<Point2d, Point2d>::new(&self.geodesy_definition()?)?;
        Some(Box::new(InvertedProjection::new(projection)))
    }

    #[cfg(not(feature = "geodesy"))]
    fn projection_from_geographic(&self) -> Option<BoxedProjection> {
        None
    }

    #[cfg(not(feature = "geodesy"))]
    fn projection_to_geographic(&self) -> Option<BoxedProjection> {
        None
    }

    /// Definition in `geodesy` syntax. Authority codes cannot be resolved without a database.
    #[cfg(feature = "geodesy")]
    fn geodesy_definition(&self) -> Option<String> {
        let def = self.definition();
        if !def.starts_with('+') {
            return (!def.contains(':')).then(|| def.to_string());
        }

        let mut operator = None;
        let mut params = vec![];
        for token in def.split_whitespace().map(|t| t.trim_start_matches('+')) {
            match token.split_once('=') {
                Some(("proj", name)) => operator = Some(name),
                None if matches!(token, "no_defs" | "wktext") => {}
                Some(("type", "crs")) | Some(("units", "m")) => {}
                // Datum shifts are not supported, only the WGS84 datum maps to its ellipsoid
                Some(("datum", "WGS84")) => params.push("ellps=WGS84"),
                Some(("datum", _)) => return None,
                _ => params.push(token),
            }
        }

        let mut result = operator?.to_string();
        for param in params {
            result.push(' ');
            result.push_str(param);
        }

        Some(result)
    }
}

fn is_wgs84_datum(def: &str) -> bool {
    def.split_whitespace()
        .filter_map(|t| t.trim_start_matches('+').split_once('='))
        .filter(|(key, _)| *key == "datum" || *key == "ellps")
        .all(|(_, value)| value == "WGS84")
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.definition())
    }
}

impl FromStr for Crs {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Crs {
    type Error = GeometryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Crs> for String {
    fn from(value: Crs) -> Self {
        value.definition.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::CartesianPoint2d;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    #[test]
    fn parse_and_normalize() {
        assert_eq!(Crs::parse("epsg:4326").unwrap(), Crs::WGS84);
        assert_eq!(Crs::parse("  EPSG:3857 ").unwrap(), Crs::EPSG3857);
        assert_eq!(
            Crs::parse("+proj=longlat   +datum=WGS84 +no_defs")
                .unwrap()
                .definition(),
            "+proj=longlat +datum=WGS84 +no_defs"
        );
        assert_eq!(
            "utm zone=32".parse::<Crs>().unwrap().definition(),
            "utm zone=32"
        );
    }

    #[test]
    fn invalid_definitions() {
        assert_matches!(Crs::parse(""), Err(GeometryError::InvalidCrs(_)));
        assert_matches!(Crs::parse("   "), Err(GeometryError::InvalidCrs(_)));
        assert_matches!(Crs::parse("EPSG:"), Err(GeometryError::InvalidCrs(_)));
        assert_matches!(Crs::parse("+datum=WGS84"), Err(GeometryError::InvalidCrs(_)));
        assert_matches!(
            Crs::parse("+proj=merc datum=WGS84"),
            Err(GeometryError::InvalidCrs(_))
        );
        assert_matches!(Crs::parse("4326"), Err(GeometryError::InvalidCrs(_)));
    }

    #[test]
    fn geographic() {
        assert!(Crs::WGS84.is_geographic());
        assert!(Crs::parse("+proj=longlat +datum=WGS84")
            .unwrap()
            .is_geographic());
        assert!(!Crs::EPSG3857.is_geographic());
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&Crs::EPSG3857).unwrap();
        assert_eq!(json, "\"EPSG:3857\"");
        let crs: Crs = serde_json::from_str("\"epsg:3857\"").unwrap();
        assert_eq!(crs, Crs::EPSG3857);
        assert!(serde_json::from_str::<Crs>("\"\"").is_err());
    }

    #[test]
    fn projection_between_descriptors() {
        let identity = Crs::WGS84.projection_to(&Crs::WGS84).unwrap();
        let point = Point2d::new(10.0, 20.0);
        assert_eq!(identity.project(&point), Some(point));

        let to_mercator = Crs::WGS84.projection_to(&Crs::EPSG3857).unwrap();
        let projected = to_mercator.project(&point).unwrap();
        assert_relative_eq!(projected.x(), 1_113_194.9, epsilon = 0.1);

        let to_geo = Crs::EPSG3857.projection_to(&Crs::WGS84).unwrap();
        let back = to_geo.project(&projected).unwrap();
        assert_relative_eq!(back.x(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(back.y(), 20.0, epsilon = 1e-9);

        let crs84 = Crs::parse("OGC:CRS84").unwrap();
        assert!(crs84.projection_to(&Crs::WGS84).is_some());
        assert!(Crs::parse("EPSG:2056")
            .unwrap()
            .projection_to(&Crs::WGS84)
            .is_none());
    }

    #[test]
    fn longlat_on_other_datums() {
        let nad27 = Crs::parse("+proj=longlat +datum=NAD27 +no_defs").unwrap();
        assert!(!nad27.is_geographic());
        assert!(nad27.projection_to(&Crs::WGS84).is_none());
        assert!(Crs::parse("+proj=longlat +ellps=WGS84")
            .unwrap()
            .is_geographic());
        assert!(Crs::parse("+proj=longlat").unwrap().is_geographic());
    }

    #[cfg(feature = "geodesy")]
    #[test]
    fn utm_round_trip() {
        let utm = Crs::parse("utm zone=32").unwrap();
        let to_utm = Crs::WGS84.projection_to(&utm).unwrap();
        let point = Point2d::new(9.0, 48.0);
        let projected = to_utm.project(&point).unwrap();
        assert_relative_eq!(projected.x(), 500_000.0, epsilon = 1e-3);
        assert!(projected.y() > 5_300_000.0 && projected.y() < 5_330_000.0);

        let back = utm.projection_to(&Crs::WGS84).unwrap().project(&projected).unwrap();
        assert_relative_eq!(back.x(), 9.0, epsilon = 1e-8);
        assert_relative_eq!(back.y(), 48.0, epsilon = 1e-8);
    }

    #[cfg(feature = "geodesy")]
    #[test]
    fn utm_proj_string() {
        let utm = Crs::parse("+proj=utm +zone=32 +datum=WGS84 +units=m +no_defs").unwrap();
        let to_utm = Crs::WGS84.projection_to(&utm).unwrap();
        let projected = to_utm.project(&Point2d::new(9.0, 48.0)).unwrap();
        assert_relative_eq!(projected.x(), 500_000.0, epsilon = 1e-3);

        let mercator_to_utm = Crs::EPSG3857.projection_to(&utm).unwrap();
        let from_mercator = mercator_to_utm
            .project(&Point2d::new(1_001_875.4, 6_106_854.8))
            .unwrap();
        assert_relative_eq!(from_mercator.x(), 500_000.0, epsilon = 1.0);

        let nad27 = Crs::parse("+proj=utm +zone=32 +datum=NAD27").unwrap();
        assert!(Crs::WGS84.projection_to(&nad27).is_none());
    }

    #[cfg(not(feature = "geodesy"))]
    #[test]
    fn no_geodesy_backend() {
        let utm = Crs::parse("utm zone=32").unwrap();
        assert!(Crs::WGS84.projection_to(&utm).is_none());
        assert!(Crs::WGS84.projection_to(&Crs::EPSG3857).is_some());
    }
}
