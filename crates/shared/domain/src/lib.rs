//! # Domain Models
//!
//! Pure data for the data library: configuration sections, shared constants, the slice
//! registry types and the static catalog of published resource types.
//! Keep it lean: no I/O, networking, or async here.

pub mod config;
pub mod constants;
pub mod registry;
pub mod resource;
