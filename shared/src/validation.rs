//! Validation utilities for location input

use crate::types::Coordinates;

/// Longest place name accepted for geocoding
pub const MAX_PLACE_NAME_LEN: usize = 100;

// ============================================================================
// Location Validations
// ============================================================================

/// Validate a free-text place name and return it trimmed
pub fn validate_place_name(name: &str) -> Result<&str, &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Place name cannot be empty");
    }
    if trimmed.chars().count() > MAX_PLACE_NAME_LEN {
        return Err("Place name must be at most 100 characters");
    }
    if trimmed.chars().any(char::is_control) {
        return Err("Place name contains invalid characters");
    }
    Ok(trimmed)
}

/// Validate latitude/longitude ranges
pub fn validate_coordinates(coordinates: &Coordinates) -> Result<(), &'static str> {
    if !coordinates.latitude.is_finite() || !coordinates.longitude.is_finite() {
        return Err("Coordinates must be finite numbers");
    }
    if !(-90.0..=90.0).contains(&coordinates.latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !(-180.0..=180.0).contains(&coordinates.longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

// ============================================================================
// Configuration Validations
// ============================================================================

/// An API key is usable when it is present and not blank
pub fn has_usable_api_key(api_key: Option<&str>) -> bool {
    api_key.map(|key| !key.trim().is_empty()).unwrap_or(false)
}
