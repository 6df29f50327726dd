use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

const CORS_ALLOW_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";

/// The HTTP gateway response shape: the report travels as a JSON string in `body`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub status_code: u16,
    pub headers: BTreeMap<&'static str, &'static str>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl Envelope {
    pub fn ok(body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS);
        headers.insert("Access-Control-Allow-Origin", "*");
        Self {
            status_code: 200,
            headers,
            body,
            is_base64_encoded: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub envelope: bool,
    pub compact: bool,
}

pub fn render<T: Serialize>(report: &T, opts: RenderOptions) -> serde_json::Result<String> {
    if opts.envelope {
        let envelope = Envelope::ok(serde_json::to_string(report)?);
        to_json(&envelope, opts.compact)
    } else {
        to_json(report, opts.compact)
    }
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}

/// Write to `out_path`, or stdout when none is given.
pub fn write_report(rendered: &str, out_path: Option<&Path>) -> io::Result<()> {
    match out_path {
        Some(p) => {
            let mut f = File::create(p)?;
            writeln!(f, "{}", rendered)
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            writeln!(lock, "{}", rendered)
        }
    }
}
