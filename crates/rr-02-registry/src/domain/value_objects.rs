//! # Value Objects
//!
//! Identities, enumerations and the keep-or-set `Patch` used by every
//! partial update.

use rr_01_derivation::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds since UNIX epoch.
pub type Timestamp = u64;

/// Highest accepted risk score.
pub const MAX_RISK_SCORE: u8 = 10;

// =============================================================================
// IDENTITY (32 bytes)
// =============================================================================

/// A 32-byte account identity asserted by the signing layer.
///
/// Also used for token references and escrow accounts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Identity(pub [u8; 32]);

impl Identity {
    /// The zero identity.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates an identity from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parses a 64-character hex identity, with or without `0x`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let trimmed = text.strip_prefix("0x").unwrap_or(text);
        let bytes = hex::decode(trimmed).ok()?;
        let bytes: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns true for the zero identity.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{}...{}",
            hex::encode(&self.0[..4]),
            hex::encode(&self.0[30..])
        )
    }
}

impl From<Location> for Identity {
    fn from(location: Location) -> Self {
        Self(location.0)
    }
}

/// Token reference (stake or reward token).
pub type TokenId = Identity;

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Reporter role. Drives the capability table in `policy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReporterRole {
    #[default]
    Validator,
    Tracer,
    Publisher,
    Authority,
    Appraiser,
}

impl fmt::Display for ReporterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validator => "Validator",
            Self::Tracer => "Tracer",
            Self::Publisher => "Publisher",
            Self::Authority => "Authority",
            Self::Appraiser => "Appraiser",
        };
        f.write_str(name)
    }
}

/// Reporter stake status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReporterStatus {
    #[default]
    Inactive,
    Active,
    Unstaking,
}

/// Case status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CaseStatus {
    #[default]
    Closed,
    Open,
}

/// Risk category of a flagged address or asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Category {
    #[default]
    None = 0,
    WalletService,
    MerchantService,
    MiningPool,
    Exchange,
    DeFi,
    OTCBroker,
    ATM,
    Gambling,
    IllicitOrganization,
    Mixer,
    DarknetService,
    Scam,
    Ransomware,
    Theft,
    Counterfeit,
    TerroristFinancing,
    Sanctions,
    ChildAbuse,
    Hacker,
    HighRiskJurisdiction,
}

impl Category {
    /// All categories in discriminant order.
    pub const ALL: [Category; 21] = [
        Self::None,
        Self::WalletService,
        Self::MerchantService,
        Self::MiningPool,
        Self::Exchange,
        Self::DeFi,
        Self::OTCBroker,
        Self::ATM,
        Self::Gambling,
        Self::IllicitOrganization,
        Self::Mixer,
        Self::DarknetService,
        Self::Scam,
        Self::Ransomware,
        Self::Theft,
        Self::Counterfeit,
        Self::TerroristFinancing,
        Self::Sanctions,
        Self::ChildAbuse,
        Self::Hacker,
        Self::HighRiskJurisdiction,
    ];
}

impl TryFrom<u8> for Category {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL.get(value as usize).copied().ok_or(value)
    }
}

// =============================================================================
// PATCH
// =============================================================================

/// Keep-or-set update of a single field.
///
/// `Set(current)` behaves exactly like `Keep`: callers that re-supply an
/// unchanged value are not treated as changing it. Authorization checks
/// that depend on a field changing use [`Patch::changes`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Patch<T> {
    Keep,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Keep, Self::Set)
    }
}

impl<T: PartialEq> Patch<T> {
    /// True if applying this patch would change `current`.
    pub fn changes(&self, current: &T) -> bool {
        matches!(self, Self::Set(value) if value != current)
    }

    /// The new value, if one was supplied.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Keep => None,
            Self::Set(value) => Some(value),
        }
    }

    /// Write the new value into `current`. Returns true if it changed.
    pub fn apply(self, current: &mut T) -> bool {
        match self {
            Self::Keep => false,
            Self::Set(value) => {
                let changed = *current != value;
                *current = value;
                changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_discriminants() {
        assert_eq!(Category::None as u8, 0);
        assert_eq!(Category::ChildAbuse as u8, 18);
        assert_eq!(Category::Hacker as u8, 19);
        assert_eq!(Category::try_from(19), Ok(Category::Hacker));
        assert_eq!(Category::try_from(21), Err(21));
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(*category as usize, i);
        }
    }

    #[test]
    fn test_patch_keep_leaves_value() {
        let mut risk = 5u8;
        assert!(!Patch::Keep.apply(&mut risk));
        assert_eq!(risk, 5);
    }

    #[test]
    fn test_patch_set_same_value_is_no_change() {
        let mut risk = 5u8;
        let patch = Patch::Set(5);
        assert!(!patch.changes(&risk));
        assert!(!patch.apply(&mut risk));
        assert_eq!(risk, 5);
    }

    #[test]
    fn test_patch_set_new_value() {
        let mut category = Category::Hacker;
        let patch = Patch::Set(Category::ChildAbuse);
        assert!(patch.changes(&category));
        assert_eq!(patch.value(), Some(&Category::ChildAbuse));
        assert!(patch.apply(&mut category));
        assert_eq!(category, Category::ChildAbuse);
    }

    #[test]
    fn test_patch_from_option() {
        assert_eq!(Patch::<u8>::from(None), Patch::Keep);
        assert_eq!(Patch::from(Some(3u8)), Patch::Set(3));
    }

    #[test]
    fn test_identity_hex() {
        let id = Identity::new([0xAB; 32]);
        let text = format!("{id:?}");
        assert_eq!(Identity::from_hex(&text), Some(id));
        assert_eq!(Identity::from_hex("0x1234"), None);
        assert_eq!(id.to_string(), "0xabababab...abab");
    }
}
