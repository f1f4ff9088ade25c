use serde::{Deserialize, Serialize};

/// Content-type discriminator accepted by `metadata/list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetadataType {
    QuestionAnswerBook,
    PinboardAnswerBook,
    LogicalTable,
    LogicalColumn,
    User,
    UserGroup,
    Tag,
    DataSource,
}

impl MetadataType {
    /// Content which can be exported, in the order it is listed.
    pub const DOWNLOADABLE: [MetadataType; 3] = [
        MetadataType::QuestionAnswerBook,
        MetadataType::PinboardAnswerBook,
        MetadataType::LogicalTable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataType::QuestionAnswerBook => "QUESTION_ANSWER_BOOK",
            MetadataType::PinboardAnswerBook => "PINBOARD_ANSWER_BOOK",
            MetadataType::LogicalTable => "LOGICAL_TABLE",
            MetadataType::LogicalColumn => "LOGICAL_COLUMN",
            MetadataType::User => "USER",
            MetadataType::UserGroup => "USER_GROUP",
            MetadataType::Tag => "TAG",
            MetadataType::DataSource => "DATA_SOURCE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [
            MetadataType::QuestionAnswerBook,
            MetadataType::PinboardAnswerBook,
            MetadataType::LogicalTable,
            MetadataType::LogicalColumn,
            MetadataType::User,
            MetadataType::UserGroup,
            MetadataType::Tag,
            MetadataType::DataSource,
        ]
        .into_iter()
        .find(|t| t.as_str() == value)
    }

    /// A name end users recognise from the platform UI.
    pub fn friendly_name(&self) -> &'static str {
        match self {
            MetadataType::QuestionAnswerBook => "saved answer",
            MetadataType::PinboardAnswerBook => "liveboard",
            MetadataType::LogicalTable => "worksheet",
            MetadataType::LogicalColumn => "column",
            MetadataType::User => "user",
            MetadataType::UserGroup => "group",
            MetadataType::Tag => "tag",
            MetadataType::DataSource => "connection",
        }
    }
}

impl std::fmt::Display for MetadataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subtypes reported on logical tables and logical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetadataSubtype {
    OneToOneLogical,
    UserDefined,
    Worksheet,
    AggrWorksheet,
    MaterializedView,
    SqlView,
    Formula,
    CalendarTable,
}

impl MetadataSubtype {
    pub const ALL: [MetadataSubtype; 8] = [
        MetadataSubtype::OneToOneLogical,
        MetadataSubtype::UserDefined,
        MetadataSubtype::Worksheet,
        MetadataSubtype::AggrWorksheet,
        MetadataSubtype::MaterializedView,
        MetadataSubtype::SqlView,
        MetadataSubtype::Formula,
        MetadataSubtype::CalendarTable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataSubtype::OneToOneLogical => "ONE_TO_ONE_LOGICAL",
            MetadataSubtype::UserDefined => "USER_DEFINED",
            MetadataSubtype::Worksheet => "WORKSHEET",
            MetadataSubtype::AggrWorksheet => "AGGR_WORKSHEET",
            MetadataSubtype::MaterializedView => "MATERIALIZED_VIEW",
            MetadataSubtype::SqlView => "SQL_VIEW",
            MetadataSubtype::Formula => "FORMULA",
            MetadataSubtype::CalendarTable => "CALENDAR_TABLE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// The top-level type the security endpoints expect for this subtype.
    pub fn object_type(&self) -> MetadataType {
        match self {
            MetadataSubtype::Formula | MetadataSubtype::CalendarTable => {
                MetadataType::LogicalColumn
            }
            _ => MetadataType::LogicalTable,
        }
    }
}

/// Either a top-level type or a subtype; the permissions call accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Type(MetadataType),
    Subtype(MetadataSubtype),
}

impl ObjectKind {
    pub fn object_type(&self) -> MetadataType {
        match self {
            ObjectKind::Type(t) => *t,
            ObjectKind::Subtype(s) => s.object_type(),
        }
    }
}

impl From<MetadataType> for ObjectKind {
    fn from(value: MetadataType) -> Self {
        ObjectKind::Type(value)
    }
}

impl From<MetadataSubtype> for ObjectKind {
    fn from(value: MetadataSubtype) -> Self {
        ObjectKind::Subtype(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataCategory {
    #[default]
    All,
    Yours,
    Favorites,
}

impl MetadataCategory {
    /// Value expected by the REST API.
    pub fn api_value(&self) -> &'static str {
        match self {
            MetadataCategory::All => "ALL",
            MetadataCategory::Yours => "MY",
            MetadataCategory::Favorites => "FAVORITE",
        }
    }
}

impl std::fmt::Display for MetadataCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataCategory::All => write!(f, "all"),
            MetadataCategory::Yours => write!(f, "yours"),
            MetadataCategory::Favorites => write!(f, "favorites"),
        }
    }
}

impl std::str::FromStr for MetadataCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(MetadataCategory::All),
            "yours" | "my" => Ok(MetadataCategory::Yours),
            "favorites" | "favorite" => Ok(MetadataCategory::Favorites),
            other => Err(format!(
                "unknown category '{}', expected one of: all, yours, favorites",
                other
            )),
        }
    }
}
