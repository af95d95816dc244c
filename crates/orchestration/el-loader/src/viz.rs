//! Visualization boundary.
//!
//! Rendering a map is a downstream concern; this module only assembles
//! the payload a plotting tool needs — a country's located events plus
//! labeled reference points inside a bounding box — and serializes it.

use el_error::{ElError, Result};
use serde::{Deserialize, Serialize};

use crate::results::EventDetailsTable;

/// A geographic bounding box (south-west and north-east corners,
/// longitude/latitude order).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south_west: (f64, f64),
    pub north_east: (f64, f64),
}

impl GeoBounds {
    /// True if the coordinate lies inside the box.
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        longitude >= self.south_west.0
            && longitude <= self.north_east.0
            && latitude >= self.south_west.1
            && latitude <= self.north_east.1
    }
}

/// A labeled reference coordinate (e.g. a city center).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub label: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl Landmark {
    /// Parse a `label:longitude:latitude` spec.
    pub fn parse(spec: &str) -> Result<Self> {
        let parts: Vec<&str> = spec.split(':').collect();
        if parts.len() != 3 {
            return Err(ElError::Config(format!(
                "invalid landmark '{spec}', expected label:longitude:latitude"
            )));
        }
        let longitude = parts[1]
            .parse()
            .map_err(|_| ElError::Config(format!("invalid longitude in landmark '{spec}'")))?;
        let latitude = parts[2]
            .parse()
            .map_err(|_| ElError::Config(format!("invalid latitude in landmark '{spec}'")))?;
        Ok(Self {
            label: parts[0].to_string(),
            longitude,
            latitude,
        })
    }
}

/// One plottable event point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// The assembled payload for a country scatter plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryScatter {
    /// Country code the events were filtered by
    pub country: String,

    /// Bounding box for the plot
    pub bounds: GeoBounds,

    /// Located events inside the bounds
    pub points: Vec<ScatterPoint>,

    /// Reference points to label
    pub landmarks: Vec<Landmark>,
}

impl CountryScatter {
    /// Build the scatter payload for `country` from a details table.
    ///
    /// Events without coordinates, and events outside the bounds, are
    /// dropped.
    pub fn build(
        table: &EventDetailsTable,
        country: &str,
        bounds: GeoBounds,
        landmarks: Vec<Landmark>,
    ) -> Self {
        let points = table
            .for_country(country)
            .into_iter()
            .filter_map(|r| match (r.longitude, r.latitude) {
                (Some(lon), Some(lat)) if bounds.contains(lon, lat) => Some(ScatterPoint {
                    longitude: lon,
                    latitude: lat,
                }),
                _ => None,
            })
            .collect();

        Self {
            country: country.to_string(),
            bounds,
            points,
            landmarks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains() {
        let bounds = GeoBounds {
            south_west: (26.0, 36.0),
            north_east: (45.0, 42.0),
        };
        assert!(bounds.contains(29.0, 41.0));
        assert!(!bounds.contains(13.4, 52.5));
    }

    #[test]
    fn test_landmark_parse() {
        let landmark = Landmark::parse("Istanbul:28.97:41.01").unwrap();
        assert_eq!(landmark.label, "Istanbul");
        assert_eq!(landmark.longitude, 28.97);
        assert_eq!(landmark.latitude, 41.01);

        assert!(Landmark::parse("Istanbul").is_err());
        assert!(Landmark::parse("Istanbul:x:41.01").is_err());
    }

    #[test]
    fn test_build_filters_by_country_location_and_bounds() {
        use crate::results::{EventDetailRecord, EventDetailsTable};

        let record = |country: &str, lon: Option<f64>, lat: Option<f64>| EventDetailRecord {
            device_id: "dev".to_string(),
            event_time: "2020-01-01 10:00:00".to_string(),
            country: country.to_string(),
            longitude: lon,
            latitude: lat,
            user_id: "u".to_string(),
        };

        let table = EventDetailsTable::from_records(
            vec![],
            vec![
                record("TR", Some(29.0), Some(41.0)),  // kept
                record("TR", None, None),              // no coordinates
                record("DE", Some(13.4), Some(52.5)),  // wrong country
                record("TR", Some(120.0), Some(41.0)), // outside bounds
            ],
        );

        let bounds = GeoBounds {
            south_west: (26.0, 36.0),
            north_east: (45.0, 42.0),
        };
        let scatter = CountryScatter::build(&table, "TR", bounds, vec![]);

        assert_eq!(scatter.points.len(), 1);
        assert_eq!(scatter.points[0].longitude, 29.0);
    }

    #[test]
    fn test_scatter_serializes() {
        let scatter = CountryScatter {
            country: "TR".to_string(),
            bounds: GeoBounds {
                south_west: (26.0, 36.0),
                north_east: (45.0, 42.0),
            },
            points: vec![ScatterPoint {
                longitude: 29.0,
                latitude: 41.0,
            }],
            landmarks: vec![],
        };

        let json = serde_json::to_string(&scatter).unwrap();
        assert!(json.contains("\"country\":\"TR\""));
        assert!(json.contains("\"points\""));
    }
}
