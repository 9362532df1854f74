//! Output formatting for the CLI tools.
//!
//! Supports human-readable, JSON and raw output. Bindings that came from a
//! walk are grouped under their root OID.

use crate::cli::args::OutputFormat;
use crate::cli::hints;
use crate::typed::{NativeValue, SnmpType, TypedValue};
use crate::{Oid, VarBind, VarBindList, Version};
use serde::Serialize;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::time::Duration;

/// Operation type for verbose output.
#[derive(Debug, Clone, Copy)]
pub enum OperationType {
    Get,
    GetNext,
    Walk,
    BulkWalk { max_repetitions: i32 },
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::GetNext => write!(f, "GETNEXT"),
            Self::Walk => write!(f, "WALK (GETNEXT)"),
            Self::BulkWalk { .. } => write!(f, "WALK (GETBULK)"),
        }
    }
}

/// Request metadata for verbose output.
#[derive(Debug)]
pub struct RequestInfo {
    pub target: SocketAddr,
    pub version: Version,
    pub community: String,
    pub operation: OperationType,
    pub oids: Vec<Oid>,
}

/// Write the request description to stderr.
pub fn write_verbose_request(info: &RequestInfo) {
    let mut stderr = io::stderr().lock();
    let _ = write_request(&mut stderr, info);
}

fn write_request<W: Write>(w: &mut W, info: &RequestInfo) -> io::Result<()> {
    writeln!(w, "--- Request ---")?;
    writeln!(w, "Target:    {}", info.target)?;
    writeln!(w, "Version:   {}", info.version)?;
    writeln!(w, "Community: {}", info.community)?;
    writeln!(w, "Operation: {}", info.operation)?;
    if let OperationType::BulkWalk { max_repetitions } = info.operation {
        writeln!(w, "  Max-repetitions:  {}", max_repetitions)?;
    }
    writeln!(w, "OIDs:      {} total", info.oids.len())?;
    for oid in &info.oids {
        match hints::lookup(oid) {
            Some(hint) => writeln!(w, "  {} ({})", oid, hint)?,
            None => writeln!(w, "  {}", oid)?,
        }
    }
    writeln!(w)
}

/// Write the response summary to stderr.
pub fn write_verbose_response(varbinds: &VarBindList, elapsed: Duration, show_hints: bool) {
    let mut stderr = io::stderr().lock();
    let _ = write_response(&mut stderr, varbinds, elapsed, show_hints);
}

fn write_response<W: Write>(
    w: &mut W,
    varbinds: &VarBindList,
    elapsed: Duration,
    show_hints: bool,
) -> io::Result<()> {
    writeln!(w, "--- Response ---")?;
    writeln!(w, "Results:   {} varbind(s)", varbinds.len())?;
    writeln!(w, "Time:      {:.2}ms", elapsed.as_secs_f64() * 1000.0)?;
    writeln!(w)?;

    for vb in varbinds {
        match hint_for(vb.oid(), show_hints) {
            Some(hint) => writeln!(w, "  {} ({})", vb.oid(), hint)?,
            None => writeln!(w, "  {}", vb.oid())?,
        }
        writeln!(w, "    Type:    {}", vb.value().snmp_type())?;
        writeln!(w, "    Value:   {}", vb.value().raw())?;
        writeln!(w, "    Index:   {}", vb.oid_index())?;
        if let Some(root) = vb.root_oid() {
            writeln!(w, "    Root:    {}", root)?;
        }
        if vb.value().snmp_type().is_integer_family() {
            match vb.value().native_value() {
                Ok(native) => writeln!(w, "    Native:  {}", native)?,
                Err(e) => writeln!(w, "    Native:  ({})", e)?,
            }
        }
    }

    if !varbinds.is_empty() {
        writeln!(w)?;
    }
    Ok(())
}

/// Result of a GET or WALK, ready for output.
#[derive(Debug, Serialize)]
pub struct OperationResult {
    pub target: String,
    pub version: String,
    /// Bindings that belong to no walk.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<VarBindResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub walks: Vec<WalkResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing_ms: Option<f64>,
}

/// Bindings walked from one root.
#[derive(Debug, Serialize)]
pub struct WalkResult {
    pub root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub results: Vec<VarBindResult>,
}

/// A single binding.
#[derive(Debug, Serialize)]
pub struct VarBindResult {
    pub oid: String,
    pub index: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(rename = "type")]
    pub value_type: String,
    /// Native value: a number for the integer family, text otherwise and
    /// null for NULL and exceptions.
    pub value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

/// Output settings.
pub struct OutputContext {
    pub format: OutputFormat,
    pub show_hints: bool,
    pub show_timing: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            show_hints: true,
            show_timing: false,
        }
    }

    /// Write results to stdout.
    pub fn write_results(
        &self,
        target: SocketAddr,
        version: Version,
        varbinds: &VarBindList,
        elapsed: Option<Duration>,
    ) -> io::Result<()> {
        let result = self.build_result(target, version, varbinds, elapsed);
        let mut stdout = io::stdout().lock();
        self.write_to(&mut stdout, &result)
    }

    pub fn write_to<W: Write>(&self, w: &mut W, result: &OperationResult) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => self.write_human(w, result),
            OutputFormat::Json => write_json(w, result),
            OutputFormat::Raw => write_raw(w, result),
        }
    }

    pub fn build_result(
        &self,
        target: SocketAddr,
        version: Version,
        varbinds: &VarBindList,
        elapsed: Option<Duration>,
    ) -> OperationResult {
        let mut results = Vec::new();
        let mut walks = Vec::new();

        for (root, members) in varbinds.group_by_root() {
            let formatted = members.into_iter().map(|vb| self.format_varbind(vb));
            match root {
                Some(root) => walks.push(WalkResult {
                    root: root.to_string(),
                    hint: hint_for(root, self.show_hints),
                    results: formatted.collect(),
                }),
                None => results.extend(formatted),
            }
        }

        OperationResult {
            target: target.to_string(),
            version: version.to_string(),
            results,
            walks,
            timing_ms: elapsed.map(|d| d.as_secs_f64() * 1000.0),
        }
    }

    fn format_varbind(&self, vb: &VarBind) -> VarBindResult {
        let (value, formatted) = format_value(vb.value());
        VarBindResult {
            oid: vb.oid().to_string(),
            index: vb.oid_index().to_string(),
            hint: hint_for(vb.oid(), self.show_hints),
            value_type: vb.value().snmp_type().to_string(),
            value,
            formatted,
        }
    }

    fn write_human<W: Write>(&self, w: &mut W, result: &OperationResult) -> io::Result<()> {
        for vb in &result.results {
            write_human_line(w, vb)?;
        }

        let show_headers = result.walks.len() > 1 || !result.results.is_empty();
        for walk in &result.walks {
            if show_headers {
                match &walk.hint {
                    Some(hint) => writeln!(w, "# {} ({})", walk.root, hint)?,
                    None => writeln!(w, "# {}", walk.root)?,
                }
            }
            for vb in &walk.results {
                write_human_line(w, vb)?;
            }
        }

        if self.show_timing
            && let Some(ms) = result.timing_ms
        {
            writeln!(w, "\nTiming: {:.1}ms", ms)?;
        }

        Ok(())
    }
}

fn write_human_line<W: Write>(w: &mut W, vb: &VarBindResult) -> io::Result<()> {
    match &vb.hint {
        Some(hint) => write!(w, "{} ({})", vb.oid, hint)?,
        None => write!(w, "{}", vb.oid)?,
    }
    write!(w, " = {}: ", vb.value_type)?;

    if let Some(formatted) = &vb.formatted {
        return writeln!(w, "{}", formatted);
    }
    match &vb.value {
        serde_json::Value::String(s) if vb.value_type == SnmpType::OctetStr.name() => {
            writeln!(w, "\"{}\"", s)
        }
        serde_json::Value::String(s) => writeln!(w, "{}", s),
        serde_json::Value::Null => writeln!(w),
        other => writeln!(w, "{}", other),
    }
}

fn write_json<W: Write>(w: &mut W, result: &OperationResult) -> io::Result<()> {
    let json = serde_json::to_string_pretty(result).map_err(io::Error::other)?;
    writeln!(w, "{}", json)
}

fn write_raw<W: Write>(w: &mut W, result: &OperationResult) -> io::Result<()> {
    let all = result
        .results
        .iter()
        .chain(result.walks.iter().flat_map(|walk| walk.results.iter()));
    for vb in all {
        let value = match &vb.value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        writeln!(w, "{}\t{}", vb.oid, value)?;
    }
    Ok(())
}

fn hint_for(oid: &Oid, show_hints: bool) -> Option<String> {
    if show_hints { hints::lookup(oid) } else { None }
}

/// Convert a value to (json_value, formatted_string).
fn format_value(value: &TypedValue) -> (serde_json::Value, Option<String>) {
    match value.snmp_type() {
        SnmpType::Null => return (serde_json::Value::Null, None),
        SnmpType::NoSuchObject => {
            return (
                serde_json::Value::Null,
                Some("No Such Object available".into()),
            );
        }
        SnmpType::NoSuchInstance => {
            return (
                serde_json::Value::Null,
                Some("No Such Instance currently exists".into()),
            );
        }
        SnmpType::EndOfMibView => {
            return (
                serde_json::Value::Null,
                Some("No more variables left in this MIB View".into()),
            );
        }
        _ => {}
    }

    match value.native_value() {
        Ok(NativeValue::Signed(v)) => (v.into(), None),
        Ok(NativeValue::Unsigned(v)) => {
            let formatted = match (value.snmp_type(), u32::try_from(v)) {
                (SnmpType::Ticks, Ok(ticks)) => {
                    Some(format!("({}) {}", ticks, format_timeticks(ticks)))
                }
                _ => None,
            };
            (v.into(), formatted)
        }
        Ok(NativeValue::Text(s)) => (serde_json::Value::String(s.to_string()), None),
        // Keep the agent's text when it does not parse.
        Err(_) => (serde_json::Value::String(value.raw().to_string()), None),
    }
}

/// Format TimeTicks as a human-readable duration.
fn format_timeticks(centiseconds: u32) -> String {
    let total_seconds = centiseconds / 100;
    let cs = centiseconds % 100;

    let days = total_seconds / 86400;
    let hours = (total_seconds % 86400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        format!(
            "{}d {:02}:{:02}:{:02}.{:02}",
            days, hours, minutes, seconds, cs
        )
    } else {
        format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, seconds, cs)
    }
}

/// Write an error message to stderr.
pub fn write_error(err: &crate::Error) {
    eprintln!("Error: {}", err);
}
