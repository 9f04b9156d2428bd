//! Member document
//!
//! Member registry records: identity, membership lifecycle, farming
//! profile, PDPA consent, and beneficiaries.

use serde::{Deserialize, Serialize};

use crate::domain::common::Address;
use crate::store::{TenantDocument, Timestamps};

pub const MEMBER_COLLECTION: &str = "members";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MemberType {
    /// Full member with voting rights
    Regular,
    /// Associate member
    Associate,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Resigned,
    Deceased,
    Expelled,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LandOwnership {
    Owned,
    Rented,
    Mixed,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CropInfo {
    pub crop_type: String,
    /// Planted area in rai
    pub area: f64,
    pub harvest_month: Vec<u8>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FarmingInfo {
    pub land_area: f64,
    pub land_ownership: LandOwnership,
    pub crops: Vec<CropInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub livestock: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PdpaConsent {
    pub consent_given: bool,
    pub consent_date: String,
    pub consent_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biometric_consent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_consent: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    pub name: String,
    pub relationship: String,
    pub id_card_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Share of benefits, percent
    pub percentage: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub coop_id: String,
    /// Unique per cooperative
    pub member_id: String,
    pub member_no: String,

    pub prefix: String,
    pub first_name: String,
    pub last_name: String,
    pub id_card_no: String,
    pub birth_date: String,
    pub gender: Gender,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address: Address,

    pub occupation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farming_info: Option<FarmingInfo>,

    pub member_type: MemberType,
    pub join_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resign_date: Option<String>,
    pub status: MemberStatus,

    pub pdpa_consent: PdpaConsent,
    #[serde(default)]
    pub beneficiaries: Vec<Beneficiary>,

    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl TenantDocument for Member {
    const COLLECTION: &'static str = MEMBER_COLLECTION;

    fn coop_id(&self) -> &str {
        &self.coop_id
    }

    fn doc_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_doc_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }
}

impl Member {
    /// Full display name with prefix.
    pub fn full_name(&self) -> String {
        format!("{}{} {}", self.prefix, self.first_name, self.last_name)
    }
}
