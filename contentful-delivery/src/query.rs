//! Structured collection queries rendered into flat request parameters.

use crate::error::{DeliveryError, DeliveryResult};
use chrono::{DateTime, Utc};
use contentful_types::timestamp;
use std::fmt;

/// Largest page the API returns.
pub const MAX_LIMIT: u32 = 1000;

/// Deepest link inclusion the API supports.
pub const MAX_INCLUDE: u32 = 10;

const MIME_TYPE_GROUPS: [&str; 12] = [
    "attachment",
    "plaintext",
    "image",
    "audio",
    "video",
    "richtext",
    "presentation",
    "spreadsheet",
    "pdfdocument",
    "archive",
    "code",
    "markup",
];

/// Filter operator appended to a field path as `field[op]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Ne,
    All,
    In,
    Nin,
    Exists,
    Lt,
    Lte,
    Gt,
    Gte,
    Match,
    Near,
    Within,
}

impl Operator {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operator::Ne => "ne",
            Operator::All => "all",
            Operator::In => "in",
            Operator::Nin => "nin",
            Operator::Exists => "exists",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Match => "match",
            Operator::Near => "near",
            Operator::Within => "within",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter operand.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    List(Vec<String>),
}

impl QueryValue {
    fn render(&self) -> String {
        match self {
            QueryValue::Text(s) => s.clone(),
            QueryValue::Integer(i) => i.to_string(),
            QueryValue::Number(n) => n.to_string(),
            QueryValue::Boolean(b) => b.to_string(),
            QueryValue::Date(d) => timestamp::format(d),
            QueryValue::List(items) => items.join(","),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Number(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for QueryValue {
    fn from(value: DateTime<Utc>) -> Self {
        QueryValue::Date(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(value: Vec<String>) -> Self {
        QueryValue::List(value)
    }
}

impl From<&[&str]> for QueryValue {
    fn from(value: &[&str]) -> Self {
        QueryValue::List(value.iter().map(|s| s.to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Filter {
    field: String,
    operator: Option<Operator>,
    value: QueryValue,
}

/// A collection query for entries, assets or content types.
///
/// ```
/// use contentful_delivery::{Operator, Query};
///
/// let query = Query::new()
///     .content_type("cat")
///     .limit(10)?
///     .where_op("fields.lives", Operator::Gte, 3i64)
///     .order_by("sys.createdAt", true);
/// assert!(query.to_params().contains(&("order".into(), "-sys.createdAt".into())));
/// # Ok::<(), contentful_delivery::DeliveryError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    content_type: Option<String>,
    locale: Option<String>,
    limit: Option<u32>,
    skip: Option<u32>,
    include: Option<u32>,
    order: Vec<String>,
    mime_type_group: Option<String>,
    select: Vec<String>,
    filters: Vec<Filter>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn content_type(mut self, content_type_id: impl Into<String>) -> Self {
        self.content_type = Some(content_type_id.into());
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn get_locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn limit(mut self, limit: u32) -> DeliveryResult<Self> {
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(DeliveryError::InvalidQuery(format!(
                "limit must be between 1 and {MAX_LIMIT}, {limit} given"
            )));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    #[must_use]
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Depth of linked resources embedded in `includes`.
    pub fn include(mut self, depth: u32) -> DeliveryResult<Self> {
        if depth > MAX_INCLUDE {
            return Err(DeliveryError::InvalidQuery(format!(
                "include depth must be between 0 and {MAX_INCLUDE}, {depth} given"
            )));
        }
        self.include = Some(depth);
        Ok(self)
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, reverse: bool) -> Self {
        let field = field.into();
        self.order.push(if reverse { format!("-{field}") } else { field });
        self
    }

    pub fn mime_type_group(mut self, group: &str) -> DeliveryResult<Self> {
        if !MIME_TYPE_GROUPS.contains(&group) {
            return Err(DeliveryError::InvalidQuery(format!(
                "unknown MIME type group `{group}`"
            )));
        }
        self.mime_type_group = Some(group.to_string());
        Ok(self)
    }

    /// Restricts the returned fields. `sys` is always selected.
    pub fn select<I, S>(mut self, fields: I) -> DeliveryResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            if field.split('.').count() > 2 {
                return Err(DeliveryError::InvalidQuery(format!(
                    "select supports at most two levels, `{field}` given"
                )));
            }
            if !self.select.contains(&field) {
                self.select.push(field);
            }
        }
        Ok(self)
    }

    /// Equality filter: `field=value`.
    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            operator: None,
            value: value.into(),
        });
        self
    }

    /// Operator filter: `field[op]=value`.
    #[must_use]
    pub fn where_op(
        mut self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<QueryValue>,
    ) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            operator: Some(operator),
            value: value.into(),
        });
        self
    }

    /// Renders the query into request parameters, in a stable order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(content_type) = &self.content_type {
            params.push(("content_type".to_string(), content_type.clone()));
        }
        if let Some(locale) = &self.locale {
            params.push(("locale".to_string(), locale.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("skip".to_string(), skip.to_string()));
        }
        if let Some(include) = self.include {
            params.push(("include".to_string(), include.to_string()));
        }
        if !self.order.is_empty() {
            params.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(group) = &self.mime_type_group {
            params.push(("mimetype_group".to_string(), group.clone()));
        }
        if !self.select.is_empty() {
            let mut select = vec!["sys".to_string()];
            select.extend(self.select.iter().filter(|f| *f != "sys").cloned());
            params.push(("select".to_string(), select.join(",")));
        }
        for filter in &self.filters {
            let key = match filter.operator {
                Some(operator) => format!("{}[{operator}]", filter.field),
                None => filter.field.clone(),
            };
            params.push((key, filter.value.render()));
        }
        params
    }
}
