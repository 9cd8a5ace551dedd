//! In-memory backend for testing and development
//!
//! Implements [`RpcTransport`] over seeded records with the same method set
//! and domain semantics the real backend applies to the calls this crate
//! makes. Every call is recorded so tests can assert how many remote calls
//! an operation issued, and individual methods can be made to fail.

use super::transport::{RpcCall, RpcTransport};
use crate::core::error::RemoteError;
use crate::core::filter::{Direction, FilterCondition, Operator, SortOrder};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

type Table = BTreeMap<i64, Map<String, Value>>;

#[derive(Default)]
struct State {
    tables: HashMap<String, Table>,
    calls: Vec<RpcCall>,
    failures: HashMap<(Option<String>, String), RemoteError>,
}

/// In-memory backend
///
/// Cloning shares the underlying records and call log.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<RwLock<State>>,
}

impl InMemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert records; each must be an object with an integer `id`
    pub fn seed(&self, model: &str, records: impl IntoIterator<Item = Value>) -> &Self {
        if let Ok(mut state) = self.state.write() {
            let table = state.tables.entry(model.to_string()).or_default();
            for record in records {
                if let Value::Object(fields) = record
                    && let Some(id) = fields.get("id").and_then(Value::as_i64)
                {
                    table.insert(id, fields);
                }
            }
        }
        self
    }

    /// Make every later call to `method` fail with `error`
    pub fn fail_on(&self, method: &str, error: RemoteError) -> &Self {
        self.insert_failure(None, method, error)
    }

    /// Make later calls to `method` on `model` only fail with `error`
    pub fn fail_on_model(&self, model: &str, method: &str, error: RemoteError) -> &Self {
        self.insert_failure(Some(model), method, error)
    }

    fn insert_failure(&self, model: Option<&str>, method: &str, error: RemoteError) -> &Self {
        if let Ok(mut state) = self.state.write() {
            state
                .failures
                .insert((model.map(str::to_string), method.to_string()), error);
        }
        self
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<RpcCall> {
        self.state
            .read()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.state.read().map(|state| state.calls.len()).unwrap_or(0)
    }

    /// Stored record, if present
    pub fn record(&self, model: &str, id: i64) -> Option<Map<String, Value>> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.tables.get(model)?.get(&id).cloned())
    }

    fn execute(state: &mut State, call: &RpcCall) -> Result<Value, RemoteError> {
        match call.method.as_str() {
            "search_read" => {
                let matched = search(state, call)?;
                let fields = field_list(call)?;
                let rows = matched
                    .into_iter()
                    .map(|record| Value::Object(project(record, fields.as_deref())))
                    .collect();
                Ok(Value::Array(rows))
            }
            "search_count" => {
                let conditions = parse_domain(call)?;
                let count = table(state, &call.model)
                    .values()
                    .filter(|record| conditions.iter().all(|c| matches(record, c)))
                    .count();
                Ok(json!(count))
            }
            "create" => {
                let Some(Value::Object(fields)) = call.args.first() else {
                    return Err(call.protocol_error("create expects a field map"));
                };
                let table = state.tables.entry(call.model.clone()).or_default();
                let id = table.keys().next_back().copied().unwrap_or(0) + 1;
                let mut record = fields.clone();
                record.insert("id".to_string(), json!(id));
                table.insert(id, record);
                Ok(json!(id))
            }
            "write" => {
                let ids = ids_arg(call)?;
                let Some(Value::Object(fields)) = call.args.get(1) else {
                    return Err(call.protocol_error("write expects a field map"));
                };
                let table = state.tables.entry(call.model.clone()).or_default();
                for id in &ids {
                    if !table.contains_key(id) {
                        return Err(call.protocol_error(format!("record {} does not exist", id)));
                    }
                }
                for id in ids {
                    if let Some(record) = table.get_mut(&id) {
                        for (key, value) in fields {
                            record.insert(key.clone(), value.clone());
                        }
                    }
                }
                Ok(json!(true))
            }
            "unlink" => {
                let ids = ids_arg(call)?;
                let table = state.tables.entry(call.model.clone()).or_default();
                for id in &ids {
                    if !table.contains_key(id) {
                        return Err(call.protocol_error(format!("record {} does not exist", id)));
                    }
                }
                for id in ids {
                    table.remove(&id);
                }
                Ok(json!(true))
            }
            "name_get" => {
                let ids = ids_arg(call)?;
                let table = table(state, &call.model);
                let pairs = ids
                    .into_iter()
                    .filter_map(|id| {
                        let name = table.get(&id)?.get("name").cloned()?;
                        Some(json!([id, name]))
                    })
                    .collect();
                Ok(Value::Array(pairs))
            }
            other => Err(call.protocol_error(format!("unknown method '{}'", other))),
        }
    }
}

#[async_trait]
impl RpcTransport for InMemoryBackend {
    async fn execute_kw(&self, call: RpcCall) -> Result<Value, RemoteError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| RemoteError::unavailable(format!("backend lock poisoned: {}", e)))?;

        state.calls.push(call.clone());
        let failure = state
            .failures
            .get(&(Some(call.model.clone()), call.method.clone()))
            .or_else(|| state.failures.get(&(None, call.method.clone())));
        if let Some(error) = failure {
            return Err(error.clone());
        }
        Self::execute(&mut state, &call)
    }
}

fn table<'a>(state: &'a State, model: &str) -> &'a Table {
    static EMPTY: Table = BTreeMap::new();
    state.tables.get(model).unwrap_or(&EMPTY)
}

fn parse_domain(call: &RpcCall) -> Result<Vec<FilterCondition>, RemoteError> {
    let Some(Value::Array(domain)) = call.args.first() else {
        return Err(call.protocol_error("expected a domain as first argument"));
    };
    domain
        .iter()
        .map(|term| {
            let parsed = term.as_array().filter(|t| t.len() == 3).and_then(|t| {
                let field = t[0].as_str()?;
                let operator = Operator::parse(t[1].as_str()?)?;
                Some(FilterCondition::new(field, operator, t[2].clone()))
            });
            parsed.ok_or_else(|| call.protocol_error(format!("invalid domain term {}", term)))
        })
        .collect()
}

fn field_list(call: &RpcCall) -> Result<Option<Vec<String>>, RemoteError> {
    match call.kwargs.get("fields") {
        None => Ok(None),
        Some(Value::Array(fields)) => fields
            .iter()
            .map(|f| {
                f.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| call.protocol_error("field names must be text"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(call.protocol_error("fields must be a list")),
    }
}

fn ids_arg(call: &RpcCall) -> Result<Vec<i64>, RemoteError> {
    call.args
        .first()
        .and_then(Value::as_array)
        .and_then(|ids| ids.iter().map(Value::as_i64).collect::<Option<Vec<_>>>())
        .ok_or_else(|| call.protocol_error("expected a list of ids as first argument"))
}

fn search<'a>(
    state: &'a State,
    call: &RpcCall,
) -> Result<Vec<&'a Map<String, Value>>, RemoteError> {
    let conditions = parse_domain(call)?;
    let mut matched: Vec<_> = table(state, &call.model)
        .values()
        .filter(|record| conditions.iter().all(|c| matches(record, c)))
        .collect();

    if let Some(order) = call.kwargs.get("order").and_then(Value::as_str) {
        let sort = SortOrder::parse(order)
            .ok_or_else(|| call.protocol_error(format!("invalid order '{}'", order)))?;
        matched.sort_by(|a, b| {
            let ordering = sort_key_cmp(a.get(&sort.field), b.get(&sort.field));
            match sort.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        });
    }

    let offset = call
        .kwargs
        .get("offset")
        .and_then(Value::as_u64)
        .unwrap_or(0) as usize;
    let limit = call
        .kwargs
        .get("limit")
        .and_then(Value::as_u64)
        .map(|l| l as usize);

    Ok(matched
        .into_iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .collect())
}

fn project(record: &Map<String, Value>, fields: Option<&[String]>) -> Map<String, Value> {
    let Some(fields) = fields else {
        return record.clone();
    };
    let mut projected = Map::new();
    if let Some(id) = record.get("id") {
        projected.insert("id".to_string(), id.clone());
    }
    for field in fields {
        let value = record.get(field).cloned().unwrap_or(Value::Bool(false));
        projected.insert(field.clone(), value);
    }
    projected
}

/// Many-to-one pairs compare by their id
fn comparable(value: &Value) -> &Value {
    match value {
        Value::Array(pair) if pair.len() == 2 && pair[0].is_number() => &pair[0],
        other => other,
    }
}

fn matches(record: &Map<String, Value>, condition: &FilterCondition) -> bool {
    let stored = record
        .get(&condition.field)
        .map(comparable)
        .unwrap_or(&Value::Null);
    match condition.operator {
        Operator::Eq => values_equal(stored, &condition.value),
        Operator::Gt => compare(stored, &condition.value) == Some(Ordering::Greater),
        Operator::In => condition
            .value
            .as_array()
            .is_some_and(|values| values.iter().any(|v| values_equal(stored, v))),
        Operator::ILike => match (stored.as_str(), condition.value.as_str()) {
            (Some(haystack), Some(needle)) => haystack
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => false,
        },
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    compare(a, b).map_or(a == b, |o| o == Ordering::Equal)
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn sort_key_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.map(comparable);
    let b = b.map(comparable);
    match (a, b) {
        (Some(a), Some(b)) => compare(a, b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
