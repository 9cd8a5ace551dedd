//! Typed read models and mutation requests
//!
//! Each read model owns its collection name, the fields it projects and the
//! mapper turning a [`RawRecord`](crate::core::RawRecord) into the typed
//! value. Raw records never leave these mappers.

pub mod division;
pub mod location;
pub mod partner;

pub use division::{DIVISION_FIELDS, DIVISION_MODEL, DivisionResponse};
pub use location::{LOCATION_FIELDS, LOCATION_MODEL, LocationListResponse, LocationResponse};
pub use partner::{
    CreatePartnerRequest, PARTNER_FIELDS, PARTNER_MODEL, PartnerResponse, UpdatePartnerRequest,
};
