//! Typed query and mutation functions exposed to the HTTP layer

pub mod location;
pub mod partner;

pub use location::LocationQuery;
pub use partner::PartnerService;
