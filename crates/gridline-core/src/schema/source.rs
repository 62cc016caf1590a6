use super::EntityRef;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type ArgumentName = String;

/// What a view is executed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ViewSource {
    /// An ad-hoc query text.
    Anonymous { query: String },

    /// A view stored under a name in a schema.
    Named { view: EntityRef },
}

/// A view source together with the arguments it is executed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewArguments {
    pub source: ViewSource,
    pub args: Option<IndexMap<ArgumentName, serde_json::Value>>,
}

impl ViewSource {
    /// The schema a named view lives in.
    pub fn home_schema(&self) -> Option<&str> {
        match self {
            Self::Named { view } => Some(&view.schema),
            Self::Anonymous { .. } => None,
        }
    }
}

impl ViewArguments {
    pub fn new(source: ViewSource) -> Self {
        Self { source, args: None }
    }

    pub fn named(schema: &str, name: &str) -> Self {
        Self::new(ViewSource::Named {
            view: EntityRef::new(schema, name),
        })
    }

    pub fn anonymous(query: impl Into<String>) -> Self {
        Self::new(ViewSource::Anonymous {
            query: query.into(),
        })
    }

    pub fn arg(mut self, name: impl Into<ArgumentName>, value: serde_json::Value) -> Self {
        self.args
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value);
        self
    }
}
