use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::HobbytagError;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyField {
    Phone,
    Email,
    Address,
    Spouse,
    Children,
}

impl PrivacyField {
    pub const ALL: [PrivacyField; 5] = [
        PrivacyField::Phone,
        PrivacyField::Email,
        PrivacyField::Address,
        PrivacyField::Spouse,
        PrivacyField::Children,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PrivacyField::Phone => "phone",
            PrivacyField::Email => "email",
            PrivacyField::Address => "address",
            PrivacyField::Spouse => "spouse",
            PrivacyField::Children => "children",
        }
    }
}

impl Display for PrivacyField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PrivacyField {
    type Err = HobbytagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        PrivacyField::ALL.into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| HobbytagError::InvalidField(s.to_string()))
    }
}

/// Visibility of every privacy field: `true` is visible to others, `false` is private.
///
/// The key set is fixed to [`PrivacyField::ALL`]; only values change.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct PrivacyFlags(BTreeMap<PrivacyField, bool>);

impl PrivacyFlags {
    pub fn all_private() -> Self {
        Self(PrivacyField::ALL.into_iter().map(|field| (field, false)).collect())
    }

    /// Builds flags from the persisted map. Unknown keys are ignored; missing or
    /// unset values are private.
    pub fn from_persisted(persisted: &BTreeMap<String, Option<bool>>) -> Self {
        let mut flags = Self::all_private();
        for field in PrivacyField::ALL {
            let visible = persisted.get(field.key()).copied().flatten().unwrap_or(false);
            flags.set(field, visible);
        }
        flags
    }

    pub fn get(&self, field: PrivacyField) -> bool {
        self.0.get(&field).copied().unwrap_or(false)
    }

    pub(crate) fn set(&mut self, field: PrivacyField, visible: bool) {
        self.0.insert(field, visible);
    }

    pub fn iter(&self) -> impl Iterator<Item = (PrivacyField, bool)> + '_ {
        self.0.iter().map(|(field, visible)| (*field, *visible))
    }

    pub fn to_persisted(&self) -> BTreeMap<String, bool> {
        self.iter().map(|(field, visible)| (field.key().to_string(), visible)).collect()
    }
}

impl Default for PrivacyFlags {
    fn default() -> Self {
        Self::all_private()
    }
}

/// Returns a copy of `flags` with only `field` negated.
pub fn flip(flags: &PrivacyFlags, field: PrivacyField) -> PrivacyFlags {
    let mut next = flags.clone();
    next.set(field, !flags.get(field));
    next
}
