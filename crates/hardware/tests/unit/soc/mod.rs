

/// Physical memory bounds and properties.
pub mod physical;
