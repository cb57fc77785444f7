use std::fmt;

/// A user row as clients see it: every field is optional and the set of
/// populated fields depends on which API version wrote it.
///
/// A field counts as *present* only when it is `Some` and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserRecord {
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_addr: Option<String>,
}

impl UserRecord {
    /// Record carrying only the legacy pair.
    pub fn legacy(full_name: impl Into<String>, email_addr: impl Into<String>) -> Self {
        Self {
            full_name: Some(full_name.into()),
            email_addr: Some(email_addr.into()),
            ..Self::default()
        }
    }
}

/// Raw lookup parameters as received from a client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LookupQuery {
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// One recognized lookup strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupCriteria {
    FullName(String),
    FirstLast { first: String, last: String },
}

impl LookupCriteria {
    /// Pick the lookup strategy for a query.
    ///
    /// A present full name wins even when first and last are supplied too.
    /// Returns `None` when no recognized shape is present.
    pub fn from_query(query: &LookupQuery) -> Option<Self> {
        Self::from_parts(
            query.full_name.as_deref(),
            query.first_name.as_deref(),
            query.last_name.as_deref(),
        )
    }

    pub fn from_parts(full: Option<&str>, first: Option<&str>, last: Option<&str>) -> Option<Self> {
        fn given(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.is_empty())
        }

        if let Some(full) = given(full) {
            return Some(Self::FullName(full.to_owned()));
        }
        match (given(first), given(last)) {
            (Some(first), Some(last)) => Some(Self::FirstLast {
                first: first.to_owned(),
                last: last.to_owned(),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for LookupCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullName(name) => write!(f, "full_name='{name}'"),
            Self::FirstLast { first, last } => {
                write!(f, "first_name='{first}', last_name='{last}'")
            }
        }
    }
}

/// Column set of the backing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaShape {
    /// `{full_name, email_addr}`
    Narrow,
    /// `{full_name, first_name, last_name, email_addr}`
    Wide,
}

impl SchemaShape {
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Narrow => &["full_name", "email_addr"],
            Self::Wide => &["full_name", "first_name", "last_name", "email_addr"],
        }
    }

    /// Classify a live column list. A table holding only one of the split
    /// name columns is still narrow; widening completes it.
    pub fn from_columns<S: AsRef<str>>(columns: &[S]) -> Self {
        let has = |name: &str| columns.iter().any(|c| c.as_ref().eq_ignore_ascii_case(name));
        if has("first_name") && has("last_name") {
            Self::Wide
        } else {
            Self::Narrow
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Narrow => "narrow",
            Self::Wide => "wide",
        }
    }
}

/// Snapshot of the table shape as last observed by this process.
///
/// `generation` grows by one on every observed change of shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub shape: SchemaShape,
    pub generation: u64,
}

/// Which write path a stored record took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// full, first and last name all present
    AllFields,
    /// first and last name present, full name absent
    FirstLastOnly,
    /// full name present, split name incomplete
    FullOnly,
    /// nothing usable; written through the legacy columns as-is
    Incomplete,
}

/// Acknowledgement of a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreReceipt {
    pub kind: WriteKind,
    /// The write moved this service's view of the table from narrow (or
    /// unknown) to wide.
    pub widened: bool,
}

pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(full: Option<&str>, first: Option<&str>, last: Option<&str>) -> LookupQuery {
        LookupQuery {
            full_name: full.map(Into::into),
            first_name: first.map(Into::into),
            last_name: last.map(Into::into),
        }
    }

    #[test]
    fn full_name_takes_precedence() {
        let c = LookupCriteria::from_query(&query(Some("Ana Gubska"), Some("Ana"), Some("Gubska")));
        assert_eq!(c, Some(LookupCriteria::FullName("Ana Gubska".into())));
    }

    #[test]
    fn empty_full_name_falls_through_to_first_last() {
        let c = LookupCriteria::from_query(&query(Some(""), Some("Ana"), Some("Gubska")));
        assert_eq!(
            c,
            Some(LookupCriteria::FirstLast {
                first: "Ana".into(),
                last: "Gubska".into()
            })
        );
    }

    #[test]
    fn incomplete_queries_are_unrecognized() {
        assert_eq!(LookupCriteria::from_query(&query(None, None, None)), None);
        assert_eq!(LookupCriteria::from_query(&query(None, Some("Ana"), None)), None);
        assert_eq!(LookupCriteria::from_query(&query(None, Some("Ana"), Some(""))), None);
        assert_eq!(LookupCriteria::from_query(&query(Some(""), None, Some("Gubska"))), None);
    }

    #[test]
    fn schema_shape_from_columns() {
        assert_eq!(SchemaShape::from_columns(&["full_name", "email_addr"]), SchemaShape::Narrow);
        assert_eq!(
            SchemaShape::from_columns(&["full_name", "email_addr", "first_name"]),
            SchemaShape::Narrow
        );
        assert_eq!(
            SchemaShape::from_columns(&["FULL_NAME", "EMAIL_ADDR", "FIRST_NAME", "LAST_NAME"]),
            SchemaShape::Wide
        );
        assert_eq!(SchemaShape::Wide.columns().len(), 4);
    }

    #[test]
    fn criteria_display_names_columns() {
        let c = LookupCriteria::FirstLast {
            first: "Ana".into(),
            last: "Gubska".into(),
        };
        assert_eq!(c.to_string(), "first_name='Ana', last_name='Gubska'");
    }
}
