use anyhow::Context;
use clap::{Args, Subcommand};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::cli::utils::{output_json, output_success, table};
use crate::cli::{CliContext, OutputFormat, Remote};
use crate::client::{refresh, InMemorySource, RemoteSource};
use crate::entities::{Coupon, Job, PortalUser, Resource};
use crate::permission::Role;
use crate::record::{DynamicRecord, ListRecord};
use crate::session::Session;
use crate::types::Operation;
use crate::view::{ColumnVisibility, FilterSpec, ListViewState, SortSpec, ViewOutput, ACTIONS_COLUMN};

#[derive(Subcommand)]
pub enum DataCommands {
    #[command(about = "List records with filters, search, sort and paging")]
    List(ListArgs),

    #[command(about = "Show a single record")]
    Get {
        #[arg(help = "Resource name (jobs, users, coupons, employers, ...)")]
        resource: String,
        #[arg(help = "Record ID")]
        id: String,
    },

    #[command(about = "Delete a record")]
    Delete {
        #[arg(help = "Resource name (jobs, users, coupons, employers, ...)")]
        resource: String,
        #[arg(help = "Record ID")]
        id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(help = "Resource name (jobs, users, coupons, employers, ...)")]
    pub resource: String,

    #[arg(long, help = "Case-insensitive text search")]
    pub search: Option<String>,

    #[arg(long = "filter", value_name = "FIELD=VALUE", help = "Exact-match filter; 'all' disables it")]
    pub filters: Vec<String>,

    #[arg(long, value_name = "KEY[:asc|desc]", help = "Sort key and optional direction")]
    pub sort: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, help = "Rows per page")]
    pub rows: Option<usize>,

    #[arg(long, value_delimiter = ',', help = "Show only these columns")]
    pub columns: Vec<String>,

    #[arg(long = "hide", help = "Hide a column")]
    pub hidden: Vec<String>,

    #[arg(long, help = "Run the list locally over a JSON or YAML file instead of the server")]
    pub file: Option<PathBuf>,
}

impl ListArgs {
    /// Page state for these flags. The page goes last since filter changes reset it.
    pub fn to_state(&self) -> anyhow::Result<ListViewState> {
        let rows = self
            .rows
            .unwrap_or(crate::config::config().list.default_rows_per_page);
        let mut state = ListViewState::new(rows);

        for raw in &self.filters {
            let (name, value) = FilterSpec::parse_pair(raw)?;
            state.set_filter(name, value);
        }
        if let Some(search) = &self.search {
            state.set_search(search.clone());
        }
        if let Some(sort) = &self.sort {
            state.set_sort(Some(SortSpec::parse(sort)?));
        }
        state.set_page(self.page);
        Ok(state)
    }

    /// Column flags applied once the column list is known
    fn apply_columns(&self, state: &mut ListViewState, columns: &[String]) {
        if !self.columns.is_empty() {
            state.set_columns(ColumnVisibility::only(columns.iter().cloned(), &self.columns));
        }
        for column in &self.hidden {
            state.set_column_visible(column.clone(), false);
        }
    }
}

pub async fn handle(cmd: DataCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        DataCommands::List(args) => list(args, ctx).await,
        DataCommands::Get { resource, id } => get(ctx, &resource, &id).await,
        DataCommands::Delete { resource, id } => delete(ctx, &resource, &id).await,
    }
}

/// The name permissions are granted under; `job_seekers` and `job-seekers` are one resource
fn permission_name(resource: &str) -> String {
    resource
        .parse::<Resource>()
        .map(|r| r.as_str().to_string())
        .unwrap_or_else(|_| resource.to_string())
}

fn require(session: &Session, resource: &str, operation: Operation) -> anyhow::Result<()> {
    let resource = permission_name(resource);
    if !session.can(&resource, operation) {
        anyhow::bail!("Missing permission {}:{}", resource, operation);
    }
    Ok(())
}

/// Records for `resource` from a local file: a bare array, or an object of
/// collections keyed by resource (account resources fall back to `users`
/// narrowed by role)
pub fn load_local_records(path: &Path, resource: &str) -> anyhow::Result<Vec<DynamicRecord>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let value: Value = if is_json {
        serde_json::from_str(&raw)?
    } else {
        serde_yaml::from_str(&raw)?
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut collections) => {
            if let Some(Value::Array(items)) = collections.remove(resource) {
                items
            } else if let Some(role) = resource.parse::<Resource>().ok().and_then(|r| r.implied_role()) {
                match collections.remove("users") {
                    Some(Value::Array(users)) => users
                        .into_iter()
                        .filter(|user| has_role(user, role))
                        .collect(),
                    _ => Vec::new(),
                }
            } else {
                anyhow::bail!("{} has no '{}' collection", path.display(), resource);
            }
        }
        _ => anyhow::bail!("{} must hold an array or an object of collections", path.display()),
    };

    items
        .into_iter()
        .map(|item| DynamicRecord::from_json(item).map_err(anyhow::Error::from))
        .collect()
}

fn has_role(user: &Value, role: Role) -> bool {
    user.get("role")
        .and_then(Value::as_str)
        .and_then(|r| r.parse::<Role>().ok())
        == Some(role)
}

/// Display order: the typed field list for known resources, else the first row's keys
fn column_order(resource: &str, rows: &[DynamicRecord]) -> Vec<String> {
    let names: Vec<String> = match resource.parse::<Resource>() {
        Ok(Resource::Jobs) => Job::field_names().into_iter().map(str::to_string).collect(),
        Ok(Resource::Coupons) => Coupon::field_names().into_iter().map(str::to_string).collect(),
        Ok(_) => PortalUser::field_names().into_iter().map(str::to_string).collect(),
        Err(_) => rows.first().map(|r| r.columns()).unwrap_or_default(),
    };
    let mut columns = names;
    columns.push(ACTIONS_COLUMN.to_string());
    columns
}

fn actions(session: Option<&Session>, resource: &str) -> String {
    let Some(session) = session else {
        return "view".to_string();
    };
    let resource = permission_name(resource);
    [(Operation::Read, "view"), (Operation::Delete, "delete")]
        .into_iter()
        .filter(|(op, _)| session.can(&resource, *op))
        .map(|(_, label)| label)
        .collect::<Vec<_>>()
        .join(" ")
}

async fn list(args: ListArgs, ctx: &CliContext) -> anyhow::Result<()> {
    let state = Mutex::new(args.to_state()?);
    let mut remote: Option<Remote> = None;

    let fetched = match &args.file {
        Some(path) => {
            let source = InMemorySource::new(load_local_records(path, &args.resource)?);
            refresh(&source, &state).await?
        }
        None => {
            let conn = ctx.remote()?;
            require(&conn.session, &args.resource, Operation::Read)?;
            let source = RemoteSource::new(conn.client.clone(), args.resource.clone());
            let result = refresh(&source, &state).await.map_err(|e| conn.fail(e))?;
            remote = Some(conn);
            result
        }
    };
    let output: ViewOutput<DynamicRecord> =
        fetched.ok_or_else(|| anyhow::anyhow!("list result was superseded by a newer fetch"))?;

    let columns = column_order(&args.resource, &output.rows);
    let mut state = state.into_inner();
    args.apply_columns(&mut state, &columns);
    let visible = state.columns().visible(&columns);
    let session = remote.as_ref().map(|r| &r.session);

    match ctx.output_format {
        OutputFormat::Json => {
            let data: Vec<Value> = output
                .rows
                .iter()
                .map(|row| {
                    let object: Map<String, Value> = visible
                        .iter()
                        .filter(|c| **c != ACTIONS_COLUMN)
                        .map(|c| (c.to_string(), row.get(c).cloned().unwrap_or(Value::Null)))
                        .collect();
                    Value::Object(object)
                })
                .collect();
            output_json(&json!({
                "resource": args.resource,
                "data": data,
                "page": output.current_page,
                "total_pages": output.total_pages,
                "total": output.total_count,
            }))
        }
        OutputFormat::Text => {
            if output.rows.is_empty() {
                println!("No {} match the current filters", args.resource);
                return Ok(());
            }
            let row_actions = actions(session, &args.resource);
            let rows: Vec<Vec<String>> = output
                .rows
                .iter()
                .map(|row| {
                    visible
                        .iter()
                        .map(|c| {
                            if *c == ACTIONS_COLUMN {
                                row_actions.clone()
                            } else {
                                row.field(c).map(|v| v.to_text()).unwrap_or_default()
                            }
                        })
                        .collect()
                })
                .collect();
            println!("{}", table(&visible, rows));
            println!(
                "Page {} of {} ({} {})",
                output.current_page, output.total_pages, output.total_count, args.resource
            );
            Ok(())
        }
    }
}

async fn get(ctx: &CliContext, resource: &str, id: &str) -> anyhow::Result<()> {
    let remote = ctx.remote()?;
    require(&remote.session, resource, Operation::Read)?;
    let record: Value = remote.client.get(resource, id).await.map_err(|e| remote.fail(e))?;

    match ctx.output_format {
        OutputFormat::Json => output_json(&json!({ "data": record })),
        OutputFormat::Text => {
            if let Value::Object(fields) = &record {
                let width = fields.keys().map(|k| k.len()).max().unwrap_or(0);
                for (key, value) in fields {
                    let text = match value {
                        Value::String(s) => s.clone(),
                        Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    println!("{:<width$}  {}", key, text, width = width);
                }
            } else {
                println!("{}", record);
            }
            Ok(())
        }
    }
}

async fn delete(ctx: &CliContext, resource: &str, id: &str) -> anyhow::Result<()> {
    let remote = ctx.remote()?;
    require(&remote.session, resource, Operation::Delete)?;
    remote.client.delete(resource, id).await.map_err(|e| remote.fail(e))?;

    output_success(
        &ctx.output_format,
        &format!("Deleted {} '{}'", resource, id),
        Some(json!({ "resource": resource, "id": id })),
    )
}
