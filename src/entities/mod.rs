pub mod privacy;
pub mod profile;

pub use crate::entities::privacy::{flip, PrivacyField, PrivacyFlags};
pub use crate::entities::profile::{format_full_name, get_initials, HobbiesValue, PartialProfile, ProfileId, ProfileRecord};

pub type Tag = String;

pub enum InsertResult<T> {
    Existing(T),
    New(T),
}

