//! Built-in generators producing pandas code for common table operations.

use super::{CodeGenerator, GeneratedCode, NodeContext};
use crate::error::GenerateError;
use ahash::AHashMap;
use serde_json::Value;
use std::fmt::Write;
use std::sync::Arc;

/// Type identifiers of the built-in generators.
pub mod node_types {
    pub const CSV_READER: &str =
        "org.knime.base.node.io.filehandling.csv.reader.CSVTableReaderNodeFactory";
    pub const CSV_WRITER: &str =
        "org.knime.base.node.io.filehandling.csv.writer.CSVWriter2NodeFactory";
    pub const COLUMN_FILTER: &str =
        "org.knime.base.node.preproc.filter.column.DataColumnSpecFilterNodeFactory";
    pub const ROW_FILTER: &str = "org.knime.base.node.preproc.filter.row.RowFilterNodeFactory";
    pub const SORTER: &str = "org.knime.base.node.preproc.sorter.SorterNodeFactory";
    pub const JOINER: &str = "org.knime.base.node.preproc.joiner3.Joiner3NodeFactory";
    pub const COLUMN_RENAME: &str = "org.knime.base.node.preproc.rename.RenameNodeFactory";
    pub const MISSING_VALUE: &str =
        "org.knime.base.node.preproc.pmml.missingval.compute.MissingValueHandlerNodeFactory";
    pub const GROUP_BY: &str = "org.knime.base.node.preproc.groupby.GroupByNodeFactory";
}

const IMPORT_PANDAS: &str = "import pandas as pd";
const IMPORT_PATH: &str = "from pathlib import Path";

/// Renders a Rust string as a Python string literal.
///
/// A JSON string literal is also a valid Python literal, escapes included.
fn py_str(s: &str) -> String {
    Value::from(s).to_string()
}

fn py_str_list(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| py_str(s)).collect();
    format!("[{}]", quoted.join(", "))
}

fn py_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

/// Renders a scalar configuration value as a Python literal.
fn py_scalar(key: &str, value: &Value) -> Result<String, GenerateError> {
    match value {
        Value::Null => Ok("None".to_string()),
        Value::Bool(b) => Ok(py_bool(*b).to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(py_str(s)),
        Value::Array(_) | Value::Object(_) => Err(GenerateError::InvalidConfig {
            key: key.to_string(),
            expected: "a scalar value",
        }),
    }
}

fn py_dict(entries: &[(&str, &str)]) -> String {
    let pairs: Vec<String> = entries
        .iter()
        .map(|(k, v)| format!("{}: {}", py_str(k), py_str(v)))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}

/// Appends one `context[...] = df` line per published output.
fn publish(source: &mut String, ctx: &NodeContext<'_>) {
    for key in ctx.output_keys() {
        // Writing into a String cannot fail.
        let _ = writeln!(source, "context[{}] = df", py_str(&key));
    }
}

fn read_input(ctx: &NodeContext<'_>, index: usize) -> Result<String, GenerateError> {
    Ok(format!("context[{}]", py_str(&ctx.input_key(index)?)))
}

fn pandas(source: String) -> GeneratedCode {
    GeneratedCode {
        source,
        imports: vec![IMPORT_PANDAS.to_string()],
    }
}

fn one_of(
    key: &str,
    value: &str,
    allowed: &[&str],
    expected: &'static str,
) -> Result<(), GenerateError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(GenerateError::InvalidConfig {
            key: key.to_string(),
            expected,
        })
    }
}

fn csv_reader(ctx: &NodeContext<'_>) -> Result<GeneratedCode, GenerateError> {
    let path = ctx.config_str("path")?;
    let separator = ctx.config_str_or("separator", ",")?;
    let mut source = format!("df = pd.read_csv({}, sep={})\n", py_str(path), py_str(separator));
    publish(&mut source, ctx);
    Ok(pandas(source))
}

fn csv_writer(ctx: &NodeContext<'_>) -> Result<GeneratedCode, GenerateError> {
    let path = ctx.config_str("path")?;
    let separator = ctx.config_str_or("separator", ",")?;
    let input = read_input(ctx, 0)?;
    let source = format!(
        "df = {input}\nout_path = Path({path})\nout_path.parent.mkdir(parents=True, exist_ok=True)\ndf.to_csv(out_path, sep={sep}, index=False)\n",
        path = py_str(path),
        sep = py_str(separator),
    );
    Ok(GeneratedCode {
        source,
        imports: vec![IMPORT_PANDAS.to_string(), IMPORT_PATH.to_string()],
    })
}

fn column_filter(ctx: &NodeContext<'_>) -> Result<GeneratedCode, GenerateError> {
    let include = ctx.config_str_list("include")?;
    let mut source = format!("df = {}[{}]\n", read_input(ctx, 0)?, py_str_list(&include));
    publish(&mut source, ctx);
    Ok(pandas(source))
}

fn row_filter(ctx: &NodeContext<'_>) -> Result<GeneratedCode, GenerateError> {
    let column = ctx.config_str("column")?;
    let operator = ctx.config_str_or("operator", "==")?;
    one_of(
        "operator",
        operator,
        &["==", "!=", "<", "<=", ">", ">="],
        "one of ==, !=, <, <=, >, >=",
    )?;
    let value = ctx
        .config("value")
        .ok_or_else(|| GenerateError::MissingConfig("value".to_string()))?;
    let input = read_input(ctx, 0)?;
    let mut source = format!(
        "df = {input}\ndf = df[df[{column}] {operator} {value}]\n",
        column = py_str(column),
        value = py_scalar("value", value)?,
    );
    publish(&mut source, ctx);
    Ok(pandas(source))
}

fn sorter(ctx: &NodeContext<'_>) -> Result<GeneratedCode, GenerateError> {
    let columns = ctx.config_str_list("columns")?;
    let ascending = ctx.config_bool_or("ascending", true)?;
    let mut source = format!(
        "df = {}.sort_values(by={}, ascending={}, kind=\"mergesort\")\n",
        read_input(ctx, 0)?,
        py_str_list(&columns),
        py_bool(ascending),
    );
    publish(&mut source, ctx);
    Ok(pandas(source))
}

fn joiner(ctx: &NodeContext<'_>) -> Result<GeneratedCode, GenerateError> {
    let left_on = ctx.config_str("left_on")?;
    let right_on = ctx.config_str("right_on")?;
    let how = ctx.config_str_or("how", "inner")?;
    one_of(
        "how",
        how,
        &["inner", "left", "right", "outer"],
        "one of inner, left, right, outer",
    )?;
    let mut source = format!(
        "left = {left}\nright = {right}\ndf = left.merge(right, how={how}, left_on={left_on}, right_on={right_on})\n",
        left = read_input(ctx, 0)?,
        right = read_input(ctx, 1)?,
        how = py_str(how),
        left_on = py_str(left_on),
        right_on = py_str(right_on),
    );
    publish(&mut source, ctx);
    Ok(pandas(source))
}

fn column_rename(ctx: &NodeContext<'_>) -> Result<GeneratedCode, GenerateError> {
    let mapping = ctx.config_str_map("mapping")?;
    let mut source = format!(
        "df = {}.rename(columns={})\n",
        read_input(ctx, 0)?,
        py_dict(&mapping)
    );
    publish(&mut source, ctx);
    Ok(pandas(source))
}

fn missing_values(ctx: &NodeContext<'_>) -> Result<GeneratedCode, GenerateError> {
    let input = read_input(ctx, 0)?;
    let mut source = match ctx.config("value") {
        Some(value) => format!("df = {}.fillna({})\n", input, py_scalar("value", value)?),
        None => format!("df = {}.dropna()\n", input),
    };
    publish(&mut source, ctx);
    Ok(pandas(source))
}

fn group_by(ctx: &NodeContext<'_>) -> Result<GeneratedCode, GenerateError> {
    let keys = ctx.config_str_list("group_by")?;
    let aggregations = ctx.config_str_map("aggregations")?;
    let mut source = format!(
        "df = {}.groupby({}, as_index=False, sort=True).agg({})\n",
        read_input(ctx, 0)?,
        py_str_list(&keys),
        py_dict(&aggregations),
    );
    publish(&mut source, ctx);
    Ok(pandas(source))
}

/// Defines the built-in generator types, their default registration and
/// lookup by type identifier.
macro_rules! builtin_generators {
    ( $( ($struct_name:ident, $node_type:path, $generate:path) ),* $(,)? ) => {
        $(
            pub(super) struct $struct_name;
            impl CodeGenerator for $struct_name {
                fn node_type(&self) -> &str { $node_type }
                fn generate(&self, ctx: &NodeContext<'_>) -> Result<GeneratedCode, GenerateError> {
                    $generate(ctx)
                }
            }
        )*

        pub(super) fn register_default_generators(
            registry: &mut AHashMap<String, Arc<dyn CodeGenerator>>,
        ) {
            $( registry.insert($node_type.to_string(), Arc::new($struct_name)); )*
        }

        pub(super) fn create_generator_by_name(name: &str) -> Option<Arc<dyn CodeGenerator>> {
            match name {
                $( $node_type => Some(Arc::new($struct_name)), )*
                _ => None,
            }
        }
    };
}

builtin_generators! {
    (CsvReaderGenerator, node_types::CSV_READER, csv_reader),
    (CsvWriterGenerator, node_types::CSV_WRITER, csv_writer),
    (ColumnFilterGenerator, node_types::COLUMN_FILTER, column_filter),
    (RowFilterGenerator, node_types::ROW_FILTER, row_filter),
    (SorterGenerator, node_types::SORTER, sorter),
    (JoinerGenerator, node_types::JOINER, joiner),
    (ColumnRenameGenerator, node_types::COLUMN_RENAME, column_rename),
    (MissingValueGenerator, node_types::MISSING_VALUE, missing_values),
    (GroupByGenerator, node_types::GROUP_BY, group_by),
}
