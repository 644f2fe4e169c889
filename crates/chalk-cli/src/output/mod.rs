use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Text => render_text(value),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.sentiment_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    match serde_json::to_value(value)? {
        Value::Array(items) => Ok(render_array_table(&items)),
        Value::Object(map) => {
            let rows = map
                .into_iter()
                .map(|(key, value)| vec![key, value_to_cell(&value)])
                .collect::<Vec<_>>();
            Ok(table::render_table(&["key", "value"], &rows, table_options()))
        }
        scalar => Ok(value_to_cell(&scalar)),
    }
}

/// Columns come from the keys of the first row.
fn render_array_table(items: &[Value]) -> String {
    let Some(first) = items.first().and_then(Value::as_object) else {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_table(&["value"], &rows, table_options());
    };

    let headers = first.keys().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| {
                    map.get(*header)
                        .map_or_else(|| String::from("-"), value_to_cell)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_table(&headers, &rows, table_options())
}

/// `key: value` lines; arrays become blank-line separated blocks.
fn render_text<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(match serde_json::to_value(value)? {
        Value::Array(items) => items
            .iter()
            .map(text_block)
            .collect::<Vec<_>>()
            .join("\n\n"),
        other => text_block(&other),
    })
}

fn text_block(value: &Value) -> String {
    match value {
        Value::Object(map) => map
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| format!("{key}: {}", value_to_cell(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => value_to_cell(other),
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        id: &'static str,
        sentiment: Option<&'static str>,
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Example {
            id: "jrn-1",
            sentiment: Some("Positive"),
        };
        let out = render(&value, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "jrn-1");
        assert_eq!(parsed["sentiment"], "Positive");
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let value = vec![
            Example {
                id: "jrn-1",
                sentiment: None,
            },
            Example {
                id: "jrn-2",
                sentiment: None,
            },
        ];
        let out = render(&value, OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed[1]["id"], "jrn-2");
    }

    #[test]
    fn table_render_for_array_has_header_row() {
        let value = vec![Example {
            id: "jrn-1",
            sentiment: Some("Negative"),
        }];
        let out = render(&value, OutputFormat::Table).expect("table render should work");
        let header = out.lines().next().unwrap();
        assert!(header.contains("id") && header.contains("sentiment"));
        assert!(out.contains("Negative"));
    }

    #[test]
    fn text_render_skips_null_fields() {
        let value = Example {
            id: "jrn-1",
            sentiment: None,
        };
        let out = render(&value, OutputFormat::Text).expect("text render should work");
        assert_eq!(out, "id: jrn-1");
    }
}
