//! Query execution: binds variables, dispatches root fields to the pipeline,
//! resolver and filter-option deriver, and projects results onto the
//! requested selection sets.
//!
//! A failing field resolves to `null` and adds an error carrying its path;
//! sibling fields still resolve.

use std::collections::{HashMap, HashSet};

use pokedex_core::config::DEFAULT_MAX_QUERY_DEPTH;
use pokedex_resolve::paginate::clamp_count;
use pokedex_resolve::{ListQuery, QueryPipeline};
use pokedex_store::{Dataset, FilterOptions, Filters, Pokemon};
use serde_json::{json, Value as Json};
use tracing::debug;

use super::parser::{self, Field, Operation, OperationKind, Value};
use super::types::{GraphQLError, GraphQLRequest, GraphQLResponse};

/// Executes requests against one dataset. Cheap to build per request.
pub struct Executor<'a> {
    dataset: &'a Dataset,
    pipeline: &'a QueryPipeline,
    max_depth: usize,
}

/// Per-request state threaded through resolution.
struct Context {
    variables: HashMap<String, Json>,
    errors: Vec<GraphQLError>,
    path: Vec<Json>,
}

impl Context {
    fn field_error(&mut self, field: &Field, message: impl Into<String>) {
        let mut path = self.path.clone();
        path.push(json!(field.response_key()));
        self.errors.push(
            GraphQLError::new(message)
                .at(field.location)
                .with_path(path),
        );
    }
}

impl<'a> Executor<'a> {
    pub fn new(dataset: &'a Dataset, pipeline: &'a QueryPipeline) -> Self {
        Self {
            dataset,
            pipeline,
            max_depth: DEFAULT_MAX_QUERY_DEPTH,
        }
    }

    /// Reject queries nested deeper than `max_depth` before executing them.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Execute a request and build the response. Never panics on bad input.
    pub fn execute(&self, request: GraphQLRequest) -> GraphQLResponse {
        if request.query.trim().is_empty() {
            return GraphQLResponse::error(GraphQLError::new("Query cannot be empty"));
        }

        let document = match parser::parse_with_max_depth(&request.query, self.max_depth) {
            Ok(doc) => doc,
            Err(err) => return GraphQLResponse::error(err),
        };

        let operation_name = request.operation_name.as_deref();
        let operation = match select_operation(&document.operations, operation_name) {
            Ok(op) => op,
            Err(err) => return GraphQLResponse::error(err),
        };

        match operation.kind {
            OperationKind::Query => {}
            OperationKind::Mutation => {
                return GraphQLResponse::error(
                    GraphQLError::new("Mutations are not supported: the dataset is read-only")
                        .at(operation.location),
                );
            }
            OperationKind::Subscription => {
                return GraphQLResponse::error(
                    GraphQLError::new("Subscriptions are not supported").at(operation.location),
                );
            }
        }

        if let Err(err) = check_response_keys(&operation.selections) {
            return GraphQLResponse::error(err);
        }

        let variables = match bind_variables(operation, request.variables.unwrap_or_default()) {
            Ok(vars) => vars,
            Err(err) => return GraphQLResponse::error(err),
        };

        debug!(
            operation = operation.name.as_deref().unwrap_or("<anonymous>"),
            fields = operation.selections.len(),
            "executing query"
        );

        let mut ctx = Context {
            variables,
            errors: Vec::new(),
            path: Vec::new(),
        };
        let data = self.resolve_query(&operation.selections, &mut ctx);

        GraphQLResponse {
            data: Some(data),
            errors: ctx.errors,
        }
    }

    // -----------------------------------------------------------------------
    // Root fields
    // -----------------------------------------------------------------------

    fn resolve_query(&self, fields: &[Field], ctx: &mut Context) -> Json {
        let mut data = serde_json::Map::new();

        for field in fields {
            let value = match self.resolve_root_field(field, ctx) {
                Ok(value) => value,
                Err(message) => {
                    ctx.field_error(field, message);
                    Json::Null
                }
            };
            data.insert(field.response_key().to_string(), value);
        }

        Json::Object(data)
    }

    fn resolve_root_field(&self, field: &Field, ctx: &mut Context) -> Result<Json, String> {
        match field.name.as_str() {
            "__typename" => {
                no_arguments(field, "Query")?;
                scalar(field, json!("Query"))
            }
            "pokemonFilters" => {
                arguments(field, &[], ctx)?;
                needs_selection(field, "FilterOptions")?;
                let options = self.dataset.filter_options();
                Ok(self.with_key(field, ctx, |this, ctx| {
                    this.project_filter_options(&options, &field.selections, ctx)
                }))
            }
            "pokemonMany" => {
                let args = arguments(field, &["skip", "limit", "searchTerm", "filters"], ctx)?;
                needs_selection(field, "Pokemon")?;
                let query = ListQuery {
                    skip: clamp_count(opt_int(&args, "skip")?).unwrap_or(0),
                    limit: clamp_count(opt_int(&args, "limit")?),
                    search_term: opt_string(&args, "searchTerm")?,
                    filters: filters_arg(args.get("filters"))?,
                };
                let records = self.pipeline.list(self.dataset, &query);
                Ok(self.with_key(field, ctx, |this, ctx| {
                    this.project_pokemon_list(&records, &field.selections, ctx)
                }))
            }
            "pokemonSearch" => {
                let args = arguments(field, &["skip", "limit", "searchTerm"], ctx)?;
                needs_selection(field, "Pokemon")?;
                let search_term = opt_string(&args, "searchTerm")?;
                let records = self.pipeline.search_only(
                    self.dataset,
                    clamp_count(opt_int(&args, "skip")?).unwrap_or(0),
                    clamp_count(opt_int(&args, "limit")?),
                    search_term.as_deref(),
                );
                Ok(self.with_key(field, ctx, |this, ctx| {
                    this.project_pokemon_list(&records, &field.selections, ctx)
                }))
            }
            "pokemonOne" => {
                let args = arguments(field, &["id"], ctx)?;
                needs_selection(field, "Pokemon")?;
                let id = id_arg(&args, "id")?;
                match self.dataset.get(&id) {
                    Some(record) => Ok(self.with_key(field, ctx, |this, ctx| {
                        this.project_pokemon(record, &field.selections, ctx)
                    })),
                    None => Ok(Json::Null),
                }
            }
            "__schema" | "__type" => Err(
                "Introspection is not supported; the schema is served at /graphql/schema".into(),
            ),
            other => Err(format!("Cannot query field '{}' on type 'Query'", other)),
        }
    }

    /// Run `f` with the field's response key pushed onto the error path.
    fn with_key<F>(&self, field: &Field, ctx: &mut Context, f: F) -> Json
    where
        F: FnOnce(&Self, &mut Context) -> Json,
    {
        ctx.path.push(json!(field.response_key()));
        let value = f(self, ctx);
        ctx.path.pop();
        value
    }

    // -----------------------------------------------------------------------
    // Object projection
    // -----------------------------------------------------------------------

    fn project_filter_options(
        &self,
        options: &FilterOptions,
        fields: &[Field],
        ctx: &mut Context,
    ) -> Json {
        let mut out = serde_json::Map::new();
        for field in fields {
            let value = no_arguments(field, "FilterOptions").and_then(|_| {
                match field.name.as_str() {
                    "__typename" => scalar(field, json!("FilterOptions")),
                    "types" => scalar(field, json!(options.types)),
                    "weaknesses" => scalar(field, json!(options.weaknesses)),
                    other => Err(format!("Cannot query field '{}' on type 'FilterOptions'", other)),
                }
            });
            out.insert(field.response_key().to_string(), self.or_null(field, value, ctx));
        }
        Json::Object(out)
    }

    fn project_pokemon_list(
        &self,
        records: &[&Pokemon],
        fields: &[Field],
        ctx: &mut Context,
    ) -> Json {
        let items = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                ctx.path.push(json!(idx));
                let value = self.project_pokemon(record, fields, ctx);
                ctx.path.pop();
                value
            })
            .collect();
        Json::Array(items)
    }

    fn project_pokemon(&self, record: &Pokemon, fields: &[Field], ctx: &mut Context) -> Json {
        let mut out = serde_json::Map::new();
        for field in fields {
            let value = if let Err(message) = no_arguments(field, "Pokemon") {
                Err(message)
            } else {
                match field.name.as_str() {
                    "__typename" => scalar(field, json!("Pokemon")),
                    "id" => scalar(field, json!(record.id)),
                    "num" => scalar(field, json!(record.num)),
                    "name" => scalar(field, json!(record.name)),
                    "img" => scalar(field, json!(record.img)),
                    "types" => scalar(field, json!(record.types)),
                    "weaknesses" => scalar(field, json!(record.weaknesses)),
                    "height" => scalar(field, json!(record.height)),
                    "weight" => scalar(field, json!(record.weight)),
                    "egg" => scalar(field, json!(record.egg)),
                    "candy" => scalar(field, json!(record.candy)),
                    "candyCount" => scalar(field, json!(record.candy_count)),
                    "prevEvolutions" => needs_selection(field, "Pokemon").map(|_| {
                        let resolved = self.dataset.prev_evolutions_of(record);
                        self.with_key(field, ctx, |this, ctx| {
                            this.project_pokemon_list(&resolved, &field.selections, ctx)
                        })
                    }),
                    "nextEvolutions" => needs_selection(field, "Pokemon").map(|_| {
                        let resolved = self.dataset.next_evolutions_of(record);
                        self.with_key(field, ctx, |this, ctx| {
                            this.project_pokemon_list(&resolved, &field.selections, ctx)
                        })
                    }),
                    other => Err(format!("Cannot query field '{}' on type 'Pokemon'", other)),
                }
            };
            out.insert(field.response_key().to_string(), self.or_null(field, value, ctx));
        }
        Json::Object(out)
    }

    fn or_null(&self, field: &Field, value: Result<Json, String>, ctx: &mut Context) -> Json {
        value.unwrap_or_else(|message| {
            ctx.field_error(field, message);
            Json::Null
        })
    }
}

// ---------------------------------------------------------------------------
// Operation selection and variables
// ---------------------------------------------------------------------------

fn select_operation<'d>(
    operations: &'d [Operation],
    name: Option<&str>,
) -> Result<&'d Operation, GraphQLError> {
    match name {
        Some(wanted) => operations
            .iter()
            .find(|op| op.name.as_deref() == Some(wanted))
            .ok_or_else(|| GraphQLError::new(format!("Unknown operation named '{}'", wanted))),
        None if operations.len() == 1 => Ok(&operations[0]),
        None => Err(GraphQLError::new(
            "Must provide operation name if query contains multiple operations",
        )),
    }
}

/// Merge provided variables with declared defaults. Undeclared variables are ignored.
fn bind_variables(
    operation: &Operation,
    mut provided: serde_json::Map<String, Json>,
) -> Result<HashMap<String, Json>, GraphQLError> {
    let mut bound = HashMap::new();
    for def in &operation.variables {
        let value = match provided.remove(&def.name) {
            Some(v) => v,
            None => match &def.default {
                Some(default) => to_json(default, &HashMap::new()).map_err(GraphQLError::new)?,
                None => Json::Null,
            },
        };
        if value.is_null() && def.type_ref.is_non_null() {
            return Err(GraphQLError::new(format!(
                "Variable '${}' of required type '{}' was not provided",
                def.name, def.type_ref
            ))
            .at(operation.location));
        }
        bound.insert(def.name.clone(), value);
    }
    Ok(bound)
}

/// Convert a parsed value to JSON, substituting bound variables.
fn to_json(value: &Value, variables: &HashMap<String, Json>) -> Result<Json, String> {
    Ok(match value {
        Value::Variable(name) => variables
            .get(name)
            .cloned()
            .ok_or_else(|| format!("Variable '${}' is not defined", name))?,
        Value::Null => Json::Null,
        Value::Int(n) => json!(n),
        Value::Float(n) => json!(n),
        Value::String(s) | Value::Enum(s) => json!(s),
        Value::Boolean(b) => json!(b),
        Value::List(items) => Json::Array(
            items
                .iter()
                .map(|item| to_json(item, variables))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(entries) => {
            let mut map = serde_json::Map::new();
            for (key, item) in entries {
                map.insert(key.clone(), to_json(item, variables)?);
            }
            Json::Object(map)
        }
    })
}

// ---------------------------------------------------------------------------
// Argument coercion
// ---------------------------------------------------------------------------

fn arguments(
    field: &Field,
    allowed: &[&str],
    ctx: &Context,
) -> Result<HashMap<String, Json>, String> {
    let mut args = HashMap::new();
    for (name, value) in &field.arguments {
        if !allowed.contains(&name.as_str()) {
            return Err(format!(
                "Unknown argument '{}' on field 'Query.{}'",
                name, field.name
            ));
        }
        args.insert(name.clone(), to_json(value, &ctx.variables)?);
    }
    Ok(args)
}

fn opt_int(args: &HashMap<String, Json>, name: &str) -> Result<Option<i64>, String> {
    match args.get(name) {
        None | Some(Json::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .map(Some)
            .ok_or_else(|| format!("Argument '{}' must be an Int, got {}", name, v)),
    }
}

fn opt_string(args: &HashMap<String, Json>, name: &str) -> Result<Option<String>, String> {
    match args.get(name) {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(s)) => Ok(Some(s.clone())),
        Some(v) => Err(format!("Argument '{}' must be a String, got {}", name, v)),
    }
}

/// `ID!` accepts a string or an integer.
fn id_arg(args: &HashMap<String, Json>, name: &str) -> Result<String, String> {
    match args.get(name) {
        Some(Json::String(s)) => Ok(s.clone()),
        Some(Json::Number(n)) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        None | Some(Json::Null) => Err(format!("Argument '{}' of type 'ID!' is required", name)),
        Some(v) => Err(format!("Argument '{}' must be an ID, got {}", name, v)),
    }
}

/// Coerce a `FiltersInput`. Null list entries are skipped and a lone string
/// counts as a one-element list.
fn filters_arg(value: Option<&Json>) -> Result<Filters, String> {
    let map = match value {
        None | Some(Json::Null) => return Ok(Filters::default()),
        Some(Json::Object(map)) => map,
        Some(v) => return Err(format!("Argument 'filters' must be a FiltersInput, got {}", v)),
    };

    let mut filters = Filters::default();
    for (key, raw) in map {
        let target = match key.as_str() {
            "types" => &mut filters.types,
            "weaknesses" => &mut filters.weaknesses,
            other => return Err(format!("Unknown field '{}' in FiltersInput", other)),
        };
        *target = string_list(key, raw)?;
    }
    Ok(filters)
}

fn string_list(key: &str, raw: &Json) -> Result<Vec<String>, String> {
    match raw {
        Json::Null => Ok(Vec::new()),
        Json::String(s) => Ok(vec![s.clone()]),
        Json::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        format!("FiltersInput.{} entries must be Strings, got {}", key, item)
                    })
            })
            .collect(),
        other => Err(format!("FiltersInput.{} must be a list of Strings, got {}", key, other)),
    }
}

// ---------------------------------------------------------------------------
// Selection checks
// ---------------------------------------------------------------------------

/// Every selection set must use each response key once.
fn check_response_keys(fields: &[Field]) -> Result<(), GraphQLError> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.response_key()) {
            return Err(GraphQLError::new(format!(
                "Response key '{}' is used more than once in the same selection set; \
                 use an alias",
                field.response_key()
            ))
            .at(field.location));
        }
        check_response_keys(&field.selections)?;
    }
    Ok(())
}

fn no_arguments(field: &Field, type_name: &str) -> Result<(), String> {
    match field.arguments.first() {
        None => Ok(()),
        Some((name, _)) => Err(format!(
            "Unknown argument '{}' on field '{}.{}'",
            name, type_name, field.name
        )),
    }
}

fn scalar(field: &Field, value: Json) -> Result<Json, String> {
    no_selection(field)?;
    Ok(value)
}

fn no_selection(field: &Field) -> Result<(), String> {
    if field.selections.is_empty() {
        Ok(())
    } else {
        Err(format!("Field '{}' is a leaf and cannot have a selection", field.name))
    }
}

fn needs_selection(field: &Field, type_name: &str) -> Result<(), String> {
    if field.selections.is_empty() {
        Err(format!(
            "Field '{}' of type '{}' must have a selection of subfields",
            field.name, type_name
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"{
        "1": {
            "id": "1", "num": "001", "name": "Bulbasaur",
            "img": "http://www.serebii.net/pokemongo/pokemon/001.png",
            "types": ["Grass", "Poison"],
            "weaknesses": ["Fire", "Ice", "Flying", "Psychic"],
            "height": "0.71 m", "weight": "6.9 kg", "egg": "2 km",
            "candy": "Bulbasaur Candy", "candyCount": 25,
            "nextEvolutions": [
                {"num": "002", "name": "Ivysaur"},
                {"num": "003", "name": "Venusaur"}
            ]
        },
        "2": {
            "id": "2", "num": "002", "name": "Ivysaur",
            "img": "http://www.serebii.net/pokemongo/pokemon/002.png",
            "types": ["Grass", "Poison"],
            "weaknesses": ["Fire", "Ice", "Flying", "Psychic"],
            "height": "0.99 m", "weight": "13.0 kg", "egg": "Not in Eggs",
            "candy": "Bulbasaur Candy", "candyCount": 100,
            "prevEvolutions": [{"num": "001", "name": "Bulbasaur"}]
        },
        "4": {
            "id": "4", "num": "004", "name": "Charmander",
            "types": ["Fire"],
            "weaknesses": ["Water", "Ground", "Rock"]
        }
    }"#;

    fn run(query: &str) -> GraphQLResponse {
        run_request(GraphQLRequest::new(query))
    }

    fn run_request(request: GraphQLRequest) -> GraphQLResponse {
        let dataset = Dataset::from_json_str(DATA).unwrap();
        let pipeline = QueryPipeline::default();
        Executor::new(&dataset, &pipeline).execute(request)
    }

    fn data(resp: &GraphQLResponse) -> &Json {
        assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
        resp.data.as_ref().expect("data")
    }

    #[test]
    fn test_filter_options() {
        let resp = run("{ pokemonFilters { types weaknesses } }");
        let d = data(&resp);
        assert_eq!(d["pokemonFilters"]["types"], json!(["Fire", "Grass", "Poison"]));
        assert_eq!(
            d["pokemonFilters"]["weaknesses"],
            json!(["Fire", "Flying", "Ground", "Ice", "Psychic", "Rock", "Water"])
        );
    }

    #[test]
    fn test_many_projects_only_selected_fields() {
        let resp = run(r#"{ pokemonMany(filters: {types: ["Grass"]}) { id name } }"#);
        let d = data(&resp);
        assert_eq!(
            d["pokemonMany"],
            json!([{"id": "1", "name": "Bulbasaur"}, {"id": "2", "name": "Ivysaur"}])
        );
    }

    #[test]
    fn test_many_with_variables_and_defaults() {
        let resp = run_request(
            GraphQLRequest::new(
                "query Page($skip: Int = 1, $limit: Int, $filters: FiltersInput) {
                    pokemonMany(skip: $skip, limit: $limit, filters: $filters) { name }
                }",
            )
            .variables(json!({
                "limit": 1,
                "filters": {"types": ["Grass", null], "weaknesses": null}
            })),
        );
        assert_eq!(data(&resp)["pokemonMany"], json!([{"name": "Ivysaur"}]));
    }

    #[test]
    fn test_search_term_combines_with_filters() {
        let resp = run(
            r#"{ pokemonMany(searchTerm: "saur", filters: {weaknesses: ["Ice"]}) { name } }"#,
        );
        assert_eq!(
            data(&resp)["pokemonMany"],
            json!([{"name": "Bulbasaur"}, {"name": "Ivysaur"}])
        );
    }

    #[test]
    fn test_split_search_operation() {
        let resp = run(r#"{ pokemonSearch(searchTerm: "bulb") { id } }"#);
        assert_eq!(data(&resp)["pokemonSearch"], json!([{"id": "1"}]));
    }

    #[test]
    fn test_negative_pagination_clamped() {
        let resp = run("{ a: pokemonMany(skip: -4) { id } b: pokemonMany(limit: -1) { id } }");
        let d = data(&resp);
        assert_eq!(d["a"].as_array().map(Vec::len), Some(3));
        assert_eq!(d["b"], json!([]));
    }

    #[test]
    fn test_one_resolves_evolutions() {
        let resp = run(
            r#"{ pokemonOne(id: "1") {
                    id candyCount
                    nextEvolutions { id name prevEvolutions { name } }
                    prevEvolutions { id }
               } }"#,
        );
        let d = data(&resp);
        assert_eq!(d["pokemonOne"]["candyCount"], json!(25));
        // Venusaur (003) is absent from the data and is dropped.
        assert_eq!(
            d["pokemonOne"]["nextEvolutions"],
            json!([{"id": "2", "name": "Ivysaur", "prevEvolutions": [{"name": "Bulbasaur"}]}])
        );
        assert_eq!(d["pokemonOne"]["prevEvolutions"], json!([]));
    }

    #[test]
    fn test_one_accepts_integer_id_and_missing_is_null() {
        let resp =
            run("{ found: pokemonOne(id: 4) { name } missing: pokemonOne(id: \"999\") { name } }");
        let d = data(&resp);
        assert_eq!(d["found"]["name"], "Charmander");
        assert!(d["missing"].is_null());
    }

    #[test]
    fn test_optional_scalars_are_null() {
        let resp = run(r#"{ pokemonOne(id: "4") { candy candyCount } }"#);
        let d = data(&resp);
        assert!(d["pokemonOne"]["candy"].is_null());
        assert!(d["pokemonOne"]["candyCount"].is_null());
    }

    #[test]
    fn test_typename() {
        let resp = run("{ __typename pokemonOne(id: 1) { __typename } }");
        let d = data(&resp);
        assert_eq!(d["__typename"], "Query");
        assert_eq!(d["pokemonOne"]["__typename"], "Pokemon");
    }

    #[test]
    fn test_unknown_field_nulls_only_that_field() {
        let resp = run(r#"{ pokemonOne(id: "1") { name nickname } pokemonFilters { types } }"#);
        assert_eq!(resp.errors.len(), 1);
        assert_eq!(resp.errors[0].path, vec![json!("pokemonOne"), json!("nickname")]);
        let d = resp.data.as_ref().unwrap();
        assert_eq!(d["pokemonOne"]["name"], "Bulbasaur");
        assert!(d["pokemonOne"]["nickname"].is_null());
        assert!(d["pokemonFilters"]["types"].is_array());
    }

    #[test]
    fn test_error_path_includes_list_index() {
        let resp = run(r#"{ pokemonMany(limit: 1) { bogus } }"#);
        assert_eq!(
            resp.errors[0].path,
            vec![json!("pokemonMany"), json!(0), json!("bogus")]
        );
    }

    #[test]
    fn test_missing_required_id() {
        let resp = run("{ pokemonOne { id } }");
        assert!(resp.errors[0].message.contains("'ID!' is required"));
        assert!(resp.data.as_ref().unwrap()["pokemonOne"].is_null());
    }

    #[test]
    fn test_wrong_argument_type() {
        let resp = run(r#"{ pokemonMany(skip: "two") { id } }"#);
        assert!(resp.errors[0].message.contains("must be an Int"));
    }

    #[test]
    fn test_unknown_argument() {
        let resp = run(r#"{ pokemonSearch(filters: {}) { id } }"#);
        assert!(resp.errors[0].message.contains("Unknown argument 'filters'"));
    }

    #[test]
    fn test_selection_rules() {
        let resp = run("{ pokemonMany }");
        assert!(resp.errors[0].message.contains("must have a selection"));

        let resp = run(r#"{ pokemonOne(id: "1") { name { first } } }"#);
        assert!(resp.errors[0].message.contains("leaf"));
    }

    #[test]
    fn test_undeclared_variable() {
        let resp = run("{ pokemonMany(limit: $n) { id } }");
        assert!(resp.errors[0].message.contains("'$n' is not defined"));
    }

    #[test]
    fn test_required_variable_missing_is_request_error() {
        let resp = run("query($id: ID!) { pokemonOne(id: $id) { id } }");
        assert!(resp.data.is_none());
        assert!(resp.errors[0].message.contains("required type 'ID!'"));
    }

    #[test]
    fn test_mutation_rejected() {
        let resp = run(r#"mutation { deletePokemon(id: "1") }"#);
        assert!(resp.data.is_none());
        assert!(resp.errors[0].message.contains("read-only"));
    }

    #[test]
    fn test_operation_name_selection() {
        let query = "query A { pokemonOne(id: 1) { name } } query B { pokemonOne(id: 2) { name } }";
        let resp = run_request(GraphQLRequest::new(query).operation_name("B"));
        assert_eq!(data(&resp)["pokemonOne"]["name"], "Ivysaur");

        let resp = run(query);
        assert!(resp.errors[0].message.contains("Must provide operation name"));

        let resp = run_request(GraphQLRequest::new(query).operation_name("C"));
        assert!(resp.errors[0].message.contains("Unknown operation"));
    }

    #[test]
    fn test_empty_and_malformed_queries() {
        assert_eq!(run("  ").errors[0].message, "Query cannot be empty");
        let resp = run("{ pokemonOne(id: \"1\" { id } }");
        assert!(resp.data.is_none());
        assert!(!resp.errors[0].locations.is_empty());
    }

    #[test]
    fn test_deeply_nested_input_fails_request_on_small_stack() {
        let depth = 100_000;
        let query = format!(
            "{{ pokemonMany(filters: {{types: {}{}}}) {{ id }} }}",
            "[".repeat(depth),
            "]".repeat(depth)
        );
        // Same stack size as a tokio worker thread.
        let resp = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || run(&query))
            .unwrap()
            .join()
            .unwrap();
        assert!(resp.data.is_none());
        assert!(resp.errors[0].message.contains("exceeds maximum depth"));
    }

    #[test]
    fn test_evolution_nesting_past_limit_rejected() {
        let nested = |levels: usize| {
            let mut selection = "id".to_string();
            for level in 0..levels {
                let field = if level % 2 == 0 { "prevEvolutions" } else { "nextEvolutions" };
                selection = format!("{} {{ {} }}", field, selection);
            }
            format!("{{ pokemonOne(id: \"1\") {{ {} }} }}", selection)
        };

        let dataset = Dataset::from_json_str(DATA).unwrap();
        let pipeline = QueryPipeline::default();
        let executor = Executor::new(&dataset, &pipeline).with_max_depth(6);

        // Root and pokemonOne sets plus four evolution levels.
        let resp = executor.execute(GraphQLRequest::new(nested(4)));
        assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);

        let resp = executor.execute(GraphQLRequest::new(nested(5)));
        assert!(resp.data.is_none());
        assert_eq!(resp.errors[0].message, "Query exceeds maximum depth of 6");
    }

    #[test]
    fn test_default_depth_limit_applies() {
        let selection = format!(
            "{}id{}",
            "nextEvolutions { ".repeat(DEFAULT_MAX_QUERY_DEPTH),
            " }".repeat(DEFAULT_MAX_QUERY_DEPTH)
        );
        let resp = run(&format!("{{ pokemonOne(id: 1) {{ {} }} }}", selection));
        assert!(resp.errors[0].message.contains("maximum depth"));
    }

    #[test]
    fn test_arguments_on_filter_option_fields_rejected() {
        let resp = run("{ pokemonFilters { types(first: 2) weaknesses } }");
        assert_eq!(resp.errors.len(), 1);
        assert!(resp.errors[0]
            .message
            .contains("Unknown argument 'first' on field 'FilterOptions.types'"));
        let d = resp.data.as_ref().unwrap();
        assert!(d["pokemonFilters"]["types"].is_null());
        assert!(d["pokemonFilters"]["weaknesses"].is_array());
    }

    #[test]
    fn test_arguments_on_typename_rejected() {
        let resp = run("{ __typename(x: 1) }");
        assert!(resp.errors[0].message.contains("'Query.__typename'"));
    }

    #[test]
    fn test_duplicate_response_keys_rejected() {
        let resp = run(r#"{ pokemonOne(id: "1") { name name: id } }"#);
        assert!(resp.data.is_none());
        assert!(resp.errors[0].message.contains("Response key 'name'"));

        let resp = run(r#"{ pokemonOne(id: "1") { id } pokemonOne(id: "2") { id } }"#);
        assert!(resp.data.is_none());
        assert!(resp.errors[0].message.contains("Response key 'pokemonOne'"));
    }

    #[test]
    fn test_aliases_keep_same_field_distinct() {
        let resp = run(r#"{ a: pokemonOne(id: "1") { name } b: pokemonOne(id: "2") { name } }"#);
        let d = data(&resp);
        assert_eq!(d["a"]["name"], "Bulbasaur");
        assert_eq!(d["b"]["name"], "Ivysaur");
    }
}
