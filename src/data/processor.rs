//! Data Processor Module
//! Flattens raw feed features into uniform earthquake records.

use thiserror::Error;

use crate::data::loader::FeedDocument;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("Feature {index} has no magnitude")]
    MissingMagnitude { index: usize },
    #[error("Feature {index} has {len} coordinate values, expected 3")]
    ShortCoordinates { index: usize, len: usize },
}

/// One flattened earthquake event.
#[derive(Debug, Clone, PartialEq)]
pub struct Earthquake {
    /// Longitude, latitude, depth in km.
    pub coordinates: [f64; 3],
    pub magnitude: f64,
    /// Event time, epoch milliseconds.
    pub time: i64,
}

impl Earthquake {
    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn depth_km(&self) -> f64 {
        self.coordinates[2]
    }
}

/// Maps the feed's feature list into flat records.
pub struct DataProcessor;

impl DataProcessor {
    /// Map every feature to one record, preserving feed order.
    ///
    /// Pure function: no filtering, no deduplication, output length always
    /// equals the feature count. The feed occasionally omits a magnitude or
    /// ships a short coordinate triple; both are reported as errors instead
    /// of being carried through as holes in the chart data.
    pub fn flatten(feed: &FeedDocument) -> Result<Vec<Earthquake>, ProcessorError> {
        feed.features
            .iter()
            .enumerate()
            .map(|(index, feature)| {
                let coords = &feature.geometry.coordinates;
                if coords.len() < 3 {
                    return Err(ProcessorError::ShortCoordinates {
                        index,
                        len: coords.len(),
                    });
                }
                let magnitude = feature
                    .properties
                    .mag
                    .ok_or(ProcessorError::MissingMagnitude { index })?;
                Ok(Earthquake {
                    coordinates: [coords[0], coords[1], coords[2]],
                    magnitude,
                    time: feature.properties.time,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{Feature, Geometry, Properties};

    fn feature(coordinates: Vec<f64>, mag: Option<f64>, time: i64) -> Feature {
        Feature {
            geometry: Geometry { coordinates },
            properties: Properties { mag, time },
        }
    }

    fn sample_feed() -> FeedDocument {
        FeedDocument {
            features: vec![
                feature(vec![10.0, 20.0, 5.0], Some(4.5), 1700000000000),
                feature(vec![11.0, 21.0, 7.0], Some(6.0), 1700003600000),
            ],
        }
    }

    #[test]
    fn flattens_features_in_order() {
        let quakes = DataProcessor::flatten(&sample_feed()).unwrap();
        assert_eq!(
            quakes,
            vec![
                Earthquake {
                    coordinates: [10.0, 20.0, 5.0],
                    magnitude: 4.5,
                    time: 1700000000000,
                },
                Earthquake {
                    coordinates: [11.0, 21.0, 7.0],
                    magnitude: 6.0,
                    time: 1700003600000,
                },
            ]
        );
    }

    #[test]
    fn output_length_matches_feature_count() {
        let feed = FeedDocument {
            features: (0..100)
                .map(|i| feature(vec![i as f64, 0.0, 1.0], Some(1.0), i))
                .collect(),
        };
        let quakes = DataProcessor::flatten(&feed).unwrap();
        assert_eq!(quakes.len(), feed.features.len());
    }

    #[test]
    fn preserves_fields_per_record() {
        let feed = sample_feed();
        let quakes = DataProcessor::flatten(&feed).unwrap();
        for (q, f) in quakes.iter().zip(&feed.features) {
            assert_eq!(Some(q.magnitude), f.properties.mag);
            assert_eq!(q.time, f.properties.time);
            assert_eq!(q.longitude(), f.geometry.coordinates[0]);
            assert_eq!(q.latitude(), f.geometry.coordinates[1]);
            assert_eq!(q.depth_km(), f.geometry.coordinates[2]);
        }
    }

    #[test]
    fn flatten_is_idempotent() {
        let feed = sample_feed();
        let first = DataProcessor::flatten(&feed).unwrap();
        let second = DataProcessor::flatten(&feed).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_feed_yields_empty_sequence() {
        let feed = FeedDocument { features: vec![] };
        assert!(DataProcessor::flatten(&feed).unwrap().is_empty());
    }

    #[test]
    fn missing_magnitude_is_reported() {
        let feed = FeedDocument {
            features: vec![
                feature(vec![0.0, 0.0, 0.0], Some(2.0), 0),
                feature(vec![1.0, 1.0, 1.0], None, 1),
            ],
        };
        assert_eq!(
            DataProcessor::flatten(&feed),
            Err(ProcessorError::MissingMagnitude { index: 1 })
        );
    }

    #[test]
    fn short_coordinates_are_reported() {
        let feed = FeedDocument {
            features: vec![feature(vec![10.0, 20.0], Some(3.0), 0)],
        };
        assert_eq!(
            DataProcessor::flatten(&feed),
            Err(ProcessorError::ShortCoordinates { index: 0, len: 2 })
        );
    }
}
