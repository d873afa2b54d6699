use serde_json::{json, Value};
use std::collections::HashMap;
use tabled::{builder::Builder, settings::Style};

use crate::cli::OutputFormat;
use crate::client::ClientError;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print a JSON value as is
pub fn output_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `field: message` pairs, sorted by field
pub fn describe_field_errors(field_errors: &HashMap<String, String>) -> String {
    let mut pairs: Vec<_> = field_errors.iter().collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Turn a client error into a user-facing message, keeping field errors
pub fn client_error(err: ClientError) -> anyhow::Error {
    match err.field_errors() {
        Some(fields) if !fields.is_empty() => anyhow::anyhow!("{} ({})", err, describe_field_errors(fields)),
        _ => anyhow::Error::new(err),
    }
}

/// Text table of `rows` under the visible column headers
pub fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for row in rows {
        builder.push_record(row);
    }
    builder.build().with(Style::psql()).to_string()
}
