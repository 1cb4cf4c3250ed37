use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "contains")]
    Contains,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Eq,
        Operator::Gt,
        Operator::Lt,
        Operator::Gte,
        Operator::Lte,
        Operator::Ne,
        Operator::Contains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Ne => "!=",
            Operator::Contains => "contains",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("Unknown operator '{}'. Expected one of =, >, <, >=, <=, !=, contains", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    pub column: String,
    pub operator: Operator,
    pub value: String,
}

impl FilterClause {
    pub fn new(column: &str, operator: Operator, value: &str) -> Self {
        Self {
            column: column.to_string(),
            operator,
            value: value.to_string(),
        }
    }

    /// Incomplete clauses are skipped when building. Only an empty string
    /// counts as missing; whitespace is a value.
    pub fn is_complete(&self) -> bool {
        !self.column.is_empty() && !self.value.is_empty()
    }
}

static CONTAINS_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(.+?)\s+contains\s+(.*?)\s*$").unwrap());
static SYMBOL_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^=<>!]+?)\s*(>=|<=|!=|=|>|<)\s*(.*?)\s*$").unwrap());

/// Parses the command-line clause syntax: `age>=30`, `status != rejected`,
/// `name contains Sam`.
impl FromStr for FilterClause {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(caps) = CONTAINS_CLAUSE.captures(s) {
            return Ok(FilterClause::new(&caps[1], Operator::Contains, &caps[2]));
        }
        if let Some(caps) = SYMBOL_CLAUSE.captures(s) {
            let operator: Operator = caps[2].parse()?;
            return Ok(FilterClause::new(&caps[1], operator, &caps[3]));
        }
        Err(format!(
            "Could not parse filter '{}'. Use COLUMN OP VALUE, e.g. 'age>=30' or 'name contains Sam'",
            s
        ))
    }
}

/// Integers stay integers, other finite numbers become floats, everything
/// else is sent as text.
pub fn coerce_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

/// Request body of the shortlisting endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShortlistQuery {
    pub filters: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    clauses: Vec<FilterClause>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, clause: FilterClause) -> &mut Self {
        self.clauses.push(clause);
        self
    }

    /// Returns false when `index` is out of range.
    pub fn update(&mut self, index: usize, clause: FilterClause) -> bool {
        match self.clauses.get_mut(index) {
            Some(slot) => {
                *slot = clause;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<FilterClause> {
        if index < self.clauses.len() {
            Some(self.clauses.remove(index))
        } else {
            None
        }
    }

    pub fn limit(&mut self, limit: Option<u32>) -> &mut Self {
        self.limit = limit;
        self
    }

    pub fn offset(&mut self, offset: Option<u32>) -> &mut Self {
        self.offset = offset;
        self
    }

    /// Folds the clauses into `{column: {operator: value}}`. Column names are
    /// used verbatim, so `"age "` and `"age"` are separate keys. A later clause
    /// with the same column and operator replaces the earlier value.
    pub fn filters(&self) -> Map<String, Value> {
        let mut filters = Map::new();
        for clause in self.clauses.iter().filter(|c| c.is_complete()) {
            let entry = filters
                .entry(clause.column.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(ops) = entry {
                ops.insert(clause.operator.as_str().to_string(), coerce_value(&clause.value));
            }
        }
        filters
    }

    pub fn build(&self) -> ShortlistQuery {
        ShortlistQuery {
            filters: self.filters(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RecruitingApi;
    use crate::api::testing::FakeApi;
    use crate::models::ShortlistResult;
    use serde_json::json;

    fn builder(clauses: &[(&str, Operator, &str)]) -> FilterBuilder {
        let mut b = FilterBuilder::new();
        for (column, op, value) in clauses {
            b.add(FilterClause::new(column, *op, value));
        }
        b
    }

    #[test]
    fn test_merges_operators_per_column() {
        let b = builder(&[
            ("age", Operator::Gt, "30"),
            ("age", Operator::Lt, "50"),
            ("name", Operator::Contains, "Sam"),
        ]);
        assert_eq!(
            Value::Object(b.filters()),
            json!({ "age": { ">": 30, "<": 50 }, "name": { "contains": "Sam" } })
        );
    }

    #[test]
    fn test_same_column_and_operator_overwrites() {
        let b = builder(&[("age", Operator::Gt, "30"), ("age", Operator::Gt, "40")]);
        assert_eq!(Value::Object(b.filters()), json!({ "age": { ">": 40 } }));
    }

    #[test]
    fn test_incomplete_clauses_are_skipped() {
        let b = builder(&[("", Operator::Eq, "1"), ("age", Operator::Eq, ""), ("city", Operator::Eq, "Pune")]);
        assert_eq!(Value::Object(b.filters()), json!({ "city": { "=": "Pune" } }));
    }

    #[test]
    fn test_columns_kept_verbatim_and_blank_values_sent() {
        let b = builder(&[
            ("age", Operator::Gte, "30"),
            ("age ", Operator::Lte, "40"),
            ("notes", Operator::Eq, "  "),
        ]);
        assert_eq!(
            Value::Object(b.filters()),
            json!({ "age": { ">=": 30 }, "age ": { "<=": 40 }, "notes": { "=": "  " } })
        );
    }

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value("30"), json!(30));
        assert_eq!(coerce_value(" 4.5 "), json!(4.5));
        assert_eq!(coerce_value("-2"), json!(-2));
        assert_eq!(coerce_value("Sam"), json!("Sam"));
        assert_eq!(coerce_value("NaN"), json!("NaN"));
        assert_eq!(coerce_value("inf"), json!("inf"));
    }

    #[test]
    fn test_build_with_pagination() {
        let mut b = builder(&[("Years of Experience", Operator::Gte, "3")]);
        b.limit(Some(10)).offset(Some(20));
        let body = serde_json::to_value(b.build()).unwrap();
        assert_eq!(
            body,
            json!({ "filters": { "Years of Experience": { ">=": 3 } }, "limit": 10, "offset": 20 })
        );
    }

    #[test]
    fn test_build_omits_absent_pagination() {
        let body = serde_json::to_value(FilterBuilder::new().build()).unwrap();
        assert_eq!(body, json!({ "filters": {} }));
    }

    #[test]
    fn test_update_and_remove() {
        let mut b = builder(&[("age", Operator::Gt, "30"), ("name", Operator::Eq, "Sam")]);
        assert!(b.update(0, FilterClause::new("age", Operator::Lte, "45")));
        assert!(!b.update(5, FilterClause::new("x", Operator::Eq, "y")));
        assert_eq!(b.remove(1).unwrap().column, "name");
        assert!(b.remove(1).is_none());
        assert_eq!(Value::Object(b.filters()), json!({ "age": { "<=": 45 } }));
    }

    #[test]
    fn test_parse_clause_syntax() {
        let c: FilterClause = "age>=30".parse().unwrap();
        assert_eq!(c, FilterClause::new("age", Operator::Gte, "30"));

        let c: FilterClause = "Years of Experience <= 5".parse().unwrap();
        assert_eq!(c, FilterClause::new("Years of Experience", Operator::Lte, "5"));

        let c: FilterClause = "status != rejected".parse().unwrap();
        assert_eq!(c.operator, Operator::Ne);

        let c: FilterClause = "Skills contains Rust".parse().unwrap();
        assert_eq!(c, FilterClause::new("Skills", Operator::Contains, "Rust"));

        let c: FilterClause = "age>3".parse().unwrap();
        assert_eq!(c.operator, Operator::Gt);

        assert!("just words".parse::<FilterClause>().is_err());
    }

    #[test]
    fn test_query_sent_as_built_and_result_passed_through() {
        let api = FakeApi::new();
        let rows = ShortlistResult {
            headers: vec!["Full Name".to_string(), "Age".to_string()],
            rows: vec![vec!["Sam".to_string(), "19".to_string()]],
            message: "Shortlisted 1".to_string(),
        };
        *api.shortlist_result.borrow_mut() = Some(Ok(rows.clone()));

        let mut b = builder(&[("Age", Operator::Gt, "30")]);
        b.limit(Some(5));
        let result = api.shortlist(&b.build()).unwrap();

        // Rows the filter would exclude are still shown as returned.
        assert_eq!(result, rows);
        let sent = api.last_shortlist.borrow().clone().unwrap();
        assert_eq!(sent, b.build());
        assert_eq!(sent.offset, None);
    }

    #[test]
    fn test_operator_serializes_as_symbol() {
        assert_eq!(serde_json::to_value(Operator::Gte).unwrap(), json!(">="));
        assert_eq!("CONTAINS".parse::<Operator>().unwrap(), Operator::Contains);
    }
}
