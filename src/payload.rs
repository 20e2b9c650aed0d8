use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde_json::Value;

pub const SITE_ORIGIN: &str = "https://www.espn.com";

const REQUEST_TIMEOUT_SECS: u64 = 10;

// The site serializes its page state into the HTML under a browser global;
// any of these assignment spellings may appear.
const STATE_MARKERS: &[&str] = &[
    "window['__espnfitt__']=",
    "window[\"__espnfitt__\"]=",
    "window.__espnfitt__=",
];

static CLIENT: OnceCell<Client> = OnceCell::new();

static NULL: Value = Value::Null;

/// Capability for fetching a page's embedded state payload. Extractors take
/// this by reference so tests can substitute a canned source.
pub trait PayloadSource {
    /// Returns the parsed payload, or `None` when the page carries no
    /// extractable state.
    fn fetch(&self, url: &str) -> Result<Option<Value>>;
}

/// Production source: plain HTTP fetch plus embedded-state extraction.
#[derive(Debug, Default)]
pub struct PageSource;

impl PayloadSource for PageSource {
    fn fetch(&self, url: &str) -> Result<Option<Value>> {
        let client = http_client()?;
        let resp = client
            .get(url)
            .header(USER_AGENT, "Mozilla/5.0")
            .send()
            .context("request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("http {status} for {url}"));
        }
        Ok(parse_embedded_state(&body))
    }
}

fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// Pulls the embedded state object out of a rendered page. Returns `None`
/// when no marker is present or the object is truncated.
pub fn parse_embedded_state(html: &str) -> Option<Value> {
    let raw = extract_embedded_json(html)?;
    serde_json::from_str(raw).ok()
}

fn extract_embedded_json(html: &str) -> Option<&str> {
    for marker in STATE_MARKERS {
        if let Some(start) = html.find(marker) {
            let tail = &html[start + marker.len()..];
            if let Some(end) = balanced_object_end(tail) {
                return Some(&tail[..end]);
            }
        }
    }
    None
}

/// Byte offset one past the closing brace of the JSON object opening at the
/// start of `s`. String literals and escapes are respected so braces inside
/// quoted values do not unbalance the scan.
fn balanced_object_end(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'{') {
        return None;
    }
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (idx, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Walks a key path through nested objects, `None` at the first missing hop.
pub fn dig<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

/// `dig` with a null fallback, for call sites that chain further lookups.
pub fn dig_or_null<'a>(value: &'a Value, path: &[&str]) -> &'a Value {
    dig(value, path).unwrap_or(&NULL)
}

pub fn pick_str(value: &Value, key: &str) -> String {
    value.get(key).and_then(as_string).unwrap_or_default()
}

pub fn pick_f64(value: &Value, key: &str) -> f64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn pick_bool(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// String list from a JSON array, preserving positions: entries that are not
/// strings or numbers become empty strings rather than being dropped.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| as_string(item).unwrap_or_default())
        .collect()
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn matchup_url(game_id: &str) -> String {
    format!("{SITE_ORIGIN}/nfl/matchup/_/gameId/{game_id}")
}

pub fn boxscore_url(game_id: &str) -> String {
    format!("{SITE_ORIGIN}/nfl/boxscore/_/gameId/{game_id}")
}

pub fn schedule_url(week: i64, year: i64, game_type: i64) -> String {
    format!("{SITE_ORIGIN}/nfl/schedule/_/week/{week}/year/{year}/seasontype/{game_type}")
}
