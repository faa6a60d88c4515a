//! Lifecycle enums shared by the engine, the API layer, and reports.
//!
//! `AssetState` is a position in the build/issue lifecycle; `AssetStatus` is
//! the coarse custody stage (holding -> stock -> active -> recycled). The two
//! are independent axes and must not be conflated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hardware categories tracked by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Desktop,
    Laptop,
    Monitor,
    MobilePhone,
    Tablet,
}

impl AssetType {
    /// Every known type, in report order. Aggregate endpoints iterate this
    /// so absent categories still appear with a zero count.
    pub const ALL: [AssetType; 5] = [
        AssetType::Desktop,
        AssetType::Laptop,
        AssetType::Monitor,
        AssetType::MobilePhone,
        AssetType::Tablet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Desktop => "DESKTOP",
            AssetType::Laptop => "LAPTOP",
            AssetType::Monitor => "MONITOR",
            AssetType::MobilePhone => "MOBILE_PHONE",
            AssetType::Tablet => "TABLET",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "DESKTOP" => Ok(AssetType::Desktop),
            "LAPTOP" => Ok(AssetType::Laptop),
            "MONITOR" => Ok(AssetType::Monitor),
            "MOBILE_PHONE" => Ok(AssetType::MobilePhone),
            "TABLET" => Ok(AssetType::Tablet),
            other => Err(format!("unknown asset type: {}", other)),
        }
    }
}

/// Position in the build/issue lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetState {
    Available,
    Building,
    Built,
    ReadyToGo,
    Issued,
    SignedOut,
}

impl AssetState {
    pub const ALL: [AssetState; 6] = [
        AssetState::Available,
        AssetState::Building,
        AssetState::Built,
        AssetState::ReadyToGo,
        AssetState::Issued,
        AssetState::SignedOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetState::Available => "AVAILABLE",
            AssetState::Building => "BUILDING",
            AssetState::Built => "BUILT",
            AssetState::ReadyToGo => "READY_TO_GO",
            AssetState::Issued => "ISSUED",
            AssetState::SignedOut => "SIGNED_OUT",
        }
    }

    /// Transition-validity table. Every state can fall back to AVAILABLE so
    /// no asset can be stranded; forward edges follow the build/issue flow.
    pub fn can_transition_to(&self, next: AssetState) -> bool {
        if *self == next {
            return false;
        }
        if next == AssetState::Available {
            return true;
        }
        matches!(
            (self, next),
            (AssetState::Available, AssetState::Building)
                | (AssetState::Available, AssetState::Issued)
                | (AssetState::Available, AssetState::SignedOut)
                | (AssetState::Building, AssetState::Built)
                | (AssetState::Built, AssetState::ReadyToGo)
                | (AssetState::ReadyToGo, AssetState::Issued)
                | (AssetState::ReadyToGo, AssetState::SignedOut)
                | (AssetState::Issued, AssetState::SignedOut)
                | (AssetState::SignedOut, AssetState::Issued)
        )
    }
}

impl fmt::Display for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "AVAILABLE" => Ok(AssetState::Available),
            "BUILDING" => Ok(AssetState::Building),
            "BUILT" => Ok(AssetState::Built),
            "READY_TO_GO" => Ok(AssetState::ReadyToGo),
            "ISSUED" => Ok(AssetState::Issued),
            "SIGNED_OUT" => Ok(AssetState::SignedOut),
            other => Err(format!("unknown asset state: {}", other)),
        }
    }
}

/// Coarse custody stage. Lowercase on the wire and in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Holding,
    Stock,
    Active,
    Recycled,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Holding => "holding",
            AssetStatus::Stock => "stock",
            AssetStatus::Active => "active",
            AssetStatus::Recycled => "recycled",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "holding" => Ok(AssetStatus::Holding),
            "stock" => Ok(AssetStatus::Stock),
            "active" => Ok(AssetStatus::Active),
            "recycled" => Ok(AssetStatus::Recycled),
            other => Err(format!("unknown asset status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentType {
    Individual,
    Shared,
}

impl AssignmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentType::Individual => "INDIVIDUAL",
            AssignmentType::Shared => "SHARED",
        }
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INDIVIDUAL" => Ok(AssignmentType::Individual),
            "SHARED" => Ok(AssignmentType::Shared),
            other => Err(format!("unknown assignment type: {}", other)),
        }
    }
}

/// Account roles. ADMIN gates user/location/department/settings mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_roundtrip() {
        for t in AssetType::ALL {
            assert_eq!(t.as_str().parse::<AssetType>().unwrap(), t);
        }
        assert!("TOASTER".parse::<AssetType>().is_err());
    }

    #[test]
    fn test_type_parse_is_lenient_about_case_and_separators() {
        assert_eq!("mobile phone".parse::<AssetType>().unwrap(), AssetType::MobilePhone);
        assert_eq!("Mobile-Phone".parse::<AssetType>().unwrap(), AssetType::MobilePhone);
        assert_eq!(" laptop ".parse::<AssetType>().unwrap(), AssetType::Laptop);
    }

    #[test]
    fn test_transition_table() {
        assert!(AssetState::Available.can_transition_to(AssetState::Building));
        assert!(AssetState::Building.can_transition_to(AssetState::Built));
        assert!(AssetState::Built.can_transition_to(AssetState::ReadyToGo));
        assert!(AssetState::ReadyToGo.can_transition_to(AssetState::Issued));
        // every state can fall back to AVAILABLE
        for s in AssetState::ALL {
            if s != AssetState::Available {
                assert!(s.can_transition_to(AssetState::Available), "{} -> AVAILABLE", s);
            }
        }
        // self-loops and skipping the build flow are rejected
        assert!(!AssetState::Issued.can_transition_to(AssetState::Issued));
        assert!(!AssetState::Building.can_transition_to(AssetState::Issued));
        assert!(!AssetState::Available.can_transition_to(AssetState::ReadyToGo));
    }

    #[test]
    fn test_status_is_lowercase_on_the_wire() {
        assert_eq!(AssetStatus::Stock.to_string(), "stock");
        assert_eq!("RECYCLED".parse::<AssetStatus>().unwrap(), AssetStatus::Recycled);
    }
}
