pub mod client;
pub mod error;
pub mod model;

pub use client::ProfilesApi;
pub use error::ProfilesError;
pub use model::{
    GeoPoint, LawyerProfilePatch, LocationInput, NewRegistration, Profile, ProfilePatch,
    ProfileState, Role,
};
