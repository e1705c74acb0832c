pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;
use std::error::Error;

/// Read a request from `--input`, falling back to piped stdin.
pub fn load_request<T: DeserializeOwned>(path: Option<&str>, what: &str) -> Result<T, Box<dyn Error>> {
    if let Some(path) = path {
        return file::read_json(path);
    }
    match stdin::read_stdin()? {
        Some(request) => Ok(request),
        None => Err(format!("--input <file.json> or stdin required for {what}").into()),
    }
}
