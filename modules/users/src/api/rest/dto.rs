use serde::{Deserialize, Serialize};

use crate::contract::model::{LookupQuery, SchemaDescriptor, UserRecord};

/// v1/v3 write body: the legacy column pair.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyUserReq {
    pub full_name: Option<String>,
    pub email_addr: Option<String>,
}

impl From<LegacyUserReq> for UserRecord {
    fn from(req: LegacyUserReq) -> Self {
        Self {
            full_name: req.full_name,
            email_addr: req.email_addr,
            ..Self::default()
        }
    }
}

/// v2 write body; any combination of fields may be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserReq {
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_addr: Option<String>,
}

impl From<UserReq> for UserRecord {
    fn from(req: UserReq) -> Self {
        Self {
            full_name: req.full_name,
            first_name: req.first_name,
            last_name: req.last_name,
            email_addr: req.email_addr,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupParams {
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<LookupParams> for LookupQuery {
    fn from(p: LookupParams) -> Self {
        Self {
            full_name: p.full_name,
            first_name: p.first_name,
            last_name: p.last_name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionParams {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailDto {
    pub email: String,
}

/// One row of the v3 listing; split name columns appear once the table is wide.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDto {
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_name: Option<String>,
    pub email_addr: Option<String>,
}

impl From<UserRecord> for UserDto {
    fn from(r: UserRecord) -> Self {
        Self {
            full_name: r.full_name,
            first_name: r.first_name,
            last_name: r.last_name,
            email_addr: r.email_addr,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaDto {
    pub shape: String,
    pub columns: Vec<String>,
    pub generation: u64,
}

impl From<SchemaDescriptor> for SchemaDto {
    fn from(d: SchemaDescriptor) -> Self {
        Self {
            shape: d.shape.as_str().to_string(),
            columns: d.shape.columns().iter().map(|c| c.to_string()).collect(),
            generation: d.generation,
        }
    }
}
