//! Domain types and DTOs

pub mod estimate;

pub use estimate::{
    EstimateRequest, LaborItem, Material, ProjectDetails, RawEstimate, RawLaborItem, RawMaterial,
};
