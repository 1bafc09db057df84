//! Input validation for visit records.
//!
//! The remote log store applies these same checks independently before
//! appending a row; the client runs them first so a bad record is rejected
//! locally, before any network call.

use thiserror::Error;

use crate::constants::{LAT_MAX, LAT_MIN, LNG_MAX, LNG_MIN};
use crate::types::VisitRecord;

/// A record failed validation. Never sent over the wire.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("buildingId must not be empty")]
    EmptyBuildingId,

    #[error("buildingName must not be empty")]
    EmptyBuildingName,

    #[error("entrance must be >= 1")]
    EntranceOutOfRange,

    #[error("latitude out of range: {0}")]
    LatitudeOutOfRange(f64),

    #[error("longitude out of range: {0}")]
    LongitudeOutOfRange(f64),

    #[error("accuracy must be >= 0, got {0}")]
    NegativeAccuracy(f64),
}

/// Check a record against the rules the remote endpoint enforces.
pub fn validate_record(record: &VisitRecord) -> Result<(), ValidationError> {
    if record.building_id.trim().is_empty() {
        return Err(ValidationError::EmptyBuildingId);
    }
    if record.building_name.trim().is_empty() {
        return Err(ValidationError::EmptyBuildingName);
    }
    if record.entrance < 1 {
        return Err(ValidationError::EntranceOutOfRange);
    }
    if !(LAT_MIN..=LAT_MAX).contains(&record.lat) || record.lat.is_nan() {
        return Err(ValidationError::LatitudeOutOfRange(record.lat));
    }
    if !(LNG_MIN..=LNG_MAX).contains(&record.lng) || record.lng.is_nan() {
        return Err(ValidationError::LongitudeOutOfRange(record.lng));
    }
    if record.accuracy < 0.0 || record.accuracy.is_nan() {
        return Err(ValidationError::NegativeAccuracy(record.accuracy));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Building, Position, VisitRecord};

    fn valid_record() -> VisitRecord {
        VisitRecord::new(
            "device-1",
            &Building::new("LIB-01", "Main Library"),
            1,
            Position::new(40.0, -75.0, 8.0),
            false,
        )
    }

    #[test]
    fn accepts_valid_record() {
        assert_eq!(validate_record(&valid_record()), Ok(()));
    }

    #[test]
    fn rejects_latitude_91() {
        let record = VisitRecord {
            lat: 91.0,
            ..valid_record()
        };
        assert_eq!(
            validate_record(&record),
            Err(ValidationError::LatitudeOutOfRange(91.0))
        );
    }

    #[test]
    fn rejects_longitude_200() {
        let record = VisitRecord {
            lng: 200.0,
            ..valid_record()
        };
        assert_eq!(
            validate_record(&record),
            Err(ValidationError::LongitudeOutOfRange(200.0))
        );
    }

    #[test]
    fn rejects_entrance_zero() {
        let record = VisitRecord {
            entrance: 0,
            ..valid_record()
        };
        assert_eq!(
            validate_record(&record),
            Err(ValidationError::EntranceOutOfRange)
        );
    }

    #[test]
    fn rejects_blank_building_id() {
        let record = VisitRecord {
            building_id: "  ".into(),
            ..valid_record()
        };
        assert_eq!(
            validate_record(&record),
            Err(ValidationError::EmptyBuildingId)
        );
    }

    #[test]
    fn rejects_negative_accuracy() {
        let record = VisitRecord {
            accuracy: -1.0,
            ..valid_record()
        };
        assert_eq!(
            validate_record(&record),
            Err(ValidationError::NegativeAccuracy(-1.0))
        );
    }
}
