use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const UNKNOWN_USER: &str = "Unknown User";
const UNKNOWN_INITIALS: &str = "U";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProfileId(Uuid);

impl ProfileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ProfileId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl Display for ProfileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hobbies as they come out of the store: older rows hold a single `;`-delimited
/// string, newer rows hold a list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum HobbiesValue {
    List(Vec<String>),
    Delimited(String),
}

/// A stored profile row. Only `id` is required; every other field may be absent.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct ProfileRecord {
    pub id: ProfileId,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix_name: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<String>,
    pub phone_number: Option<String>,
    pub profession: Option<String>,
    pub company: Option<String>,
    pub hobbies_interests: Option<HobbiesValue>,
    pub spouse_name: Option<String>,
    pub children: Option<String>,
    pub profile_picture_url: Option<String>,
    pub then_picture_url: Option<String>,
    /// Visibility per privacy field. `null` or a missing key means the value was never set.
    #[serde(default)]
    pub privacy: BTreeMap<String, Option<bool>>,
}

impl ProfileRecord {
    pub fn new(id: ProfileId) -> Self {
        Self { id, ..Default::default() }
    }

    pub fn full_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name, &self.suffix_name]
            .into_iter()
            .flatten()
            .filter(|x| !x.is_empty())
            .map(String::as_str)
            .collect::<Vec<&str>>()
            .join(" ")
    }

    pub fn initials(&self) -> String {
        let first = first_char(&self.first_name);
        let last = first_char(&self.last_name);
        let initials = match (first, last) {
            (Some(first), Some(last)) => format!("{}{}", first, last),
            (Some(first), None) => first.to_string(),
            _ => match first_char(&self.email) {
                Some(c) => c.to_string(),
                None => return UNKNOWN_INITIALS.to_string(),
            },
        };
        initials.to_uppercase()
    }

    /// Merges a partial update into the record. Fields absent from `partial` are left alone.
    pub fn apply(&mut self, partial: PartialProfile) {
        if let Some(v) = partial.profession { self.profession = Some(v); }
        if let Some(v) = partial.email { self.email = Some(v); }
        if let Some(v) = partial.phone_number { self.phone_number = Some(v); }
        if let Some(v) = partial.spouse_name { self.spouse_name = Some(v); }
        if let Some(v) = partial.children { self.children = Some(v); }
        if let Some(v) = partial.hobbies_interests { self.hobbies_interests = Some(HobbiesValue::List(v)); }
        if let Some(privacy) = partial.privacy {
            for (field, visible) in privacy {
                self.privacy.insert(field, Some(visible));
            }
        }
    }
}

pub fn format_full_name(profile: Option<&ProfileRecord>) -> String {
    let full_name = profile.map(ProfileRecord::full_name).unwrap_or_default();
    if full_name.is_empty() {
        return UNKNOWN_USER.to_string();
    }
    full_name
}

pub fn get_initials(profile: Option<&ProfileRecord>) -> String {
    match profile {
        Some(profile) => profile.initials(),
        None => UNKNOWN_INITIALS.to_string(),
    }
}

fn first_char(value: &Option<String>) -> Option<char> {
    value.as_deref().and_then(|x| x.chars().next())
}

/// The subset of profile fields a save or a toggle writes back.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct PartialProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spouse_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hobbies_interests: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<BTreeMap<String, bool>>,
}
