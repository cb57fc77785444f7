//! Classification of an inbound record into exactly one write path.

use crate::contract::model::{present, SchemaShape, UserRecord, WriteKind};

/// A record after classification. Each variant carries only the columns its
/// insert will touch; email is passed through untouched (possibly absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadShape {
    AllFields {
        full_name: String,
        first_name: String,
        last_name: String,
        email_addr: Option<String>,
    },
    FirstLastOnly {
        first_name: String,
        last_name: String,
        email_addr: Option<String>,
    },
    FullOnly {
        full_name: String,
        email_addr: Option<String>,
    },
    /// Neither a full name nor a complete split name. `full_name` keeps
    /// whatever the client sent; an absent one is stored as `""`.
    Incomplete {
        full_name: String,
        email_addr: Option<String>,
    },
}

impl PayloadShape {
    /// Priority order: all three names, then first+last, then full name alone.
    pub fn classify(record: UserRecord) -> Self {
        let full = present(&record.full_name).is_some();
        let first = present(&record.first_name).is_some();
        let last = present(&record.last_name).is_some();

        let UserRecord {
            full_name,
            first_name,
            last_name,
            email_addr,
        } = record;

        match (full_name, first_name, last_name) {
            (Some(full_name), Some(first_name), Some(last_name)) if full && first && last => {
                Self::AllFields {
                    full_name,
                    first_name,
                    last_name,
                    email_addr,
                }
            }
            (_, Some(first_name), Some(last_name)) if first && last => Self::FirstLastOnly {
                first_name,
                last_name,
                email_addr,
            },
            (Some(full_name), _, _) if full => Self::FullOnly {
                full_name,
                email_addr,
            },
            (full_name, _, _) => Self::Incomplete {
                full_name: full_name.unwrap_or_default(),
                email_addr,
            },
        }
    }

    pub fn kind(&self) -> WriteKind {
        match self {
            Self::AllFields { .. } => WriteKind::AllFields,
            Self::FirstLastOnly { .. } => WriteKind::FirstLastOnly,
            Self::FullOnly { .. } => WriteKind::FullOnly,
            Self::Incomplete { .. } => WriteKind::Incomplete,
        }
    }

    /// Table shape the insert needs to succeed.
    pub fn required_schema(&self) -> SchemaShape {
        match self {
            Self::AllFields { .. } | Self::FirstLastOnly { .. } => SchemaShape::Wide,
            Self::FullOnly { .. } | Self::Incomplete { .. } => SchemaShape::Narrow,
        }
    }

    /// Column list of the insert, in bind order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::AllFields { .. } => &["full_name", "first_name", "last_name", "email_addr"],
            Self::FirstLastOnly { .. } => &["first_name", "last_name", "email_addr"],
            Self::FullOnly { .. } | Self::Incomplete { .. } => &["full_name", "email_addr"],
        }
    }

    /// Bind values matching [`Self::columns`]; `None` binds NULL.
    pub fn values(&self) -> Vec<Option<&str>> {
        match self {
            Self::AllFields {
                full_name,
                first_name,
                last_name,
                email_addr,
            } => vec![
                Some(full_name.as_str()),
                Some(first_name.as_str()),
                Some(last_name.as_str()),
                email_addr.as_deref(),
            ],
            Self::FirstLastOnly {
                first_name,
                last_name,
                email_addr,
            } => vec![
                Some(first_name.as_str()),
                Some(last_name.as_str()),
                email_addr.as_deref(),
            ],
            Self::FullOnly {
                full_name,
                email_addr,
            } => vec![Some(full_name.as_str()), email_addr.as_deref()],
            Self::Incomplete {
                full_name,
                email_addr,
            } => vec![Some(full_name.as_str()), email_addr.as_deref()],
        }
    }
}
