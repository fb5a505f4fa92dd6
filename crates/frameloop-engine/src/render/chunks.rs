//! Process-wide registry of named WGSL source chunks.
//!
//! Shader sources pull chunks in with a line of the form `#include <name>`.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use thiserror::Error;

static CHUNKS: LazyLock<Mutex<HashMap<String, String>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShaderChunkError {
    #[error("shader chunk `{name}` is not registered")]
    Unknown { name: String },
    #[error("shader chunk `{name}` includes itself")]
    Cycle { name: String },
}

/// Registers `source` under `name`, returning the chunk it replaced.
pub fn register_chunk(name: impl Into<String>, source: impl Into<String>) -> Option<String> {
    let name = name.into();
    log::debug!("registering shader chunk `{name}`");
    CHUNKS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name, source.into())
}

pub fn chunk(name: &str) -> Option<String> {
    CHUNKS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

pub fn is_registered(name: &str) -> bool {
    CHUNKS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(name)
}

/// Expands every `#include <name>` line of `source`, recursively.
pub fn resolve_includes(source: &str) -> Result<String, ShaderChunkError> {
    let mut out = String::with_capacity(source.len());
    let mut stack = Vec::new();
    expand(source, &mut stack, &mut out)?;
    Ok(out)
}

fn expand(source: &str, stack: &mut Vec<String>, out: &mut String) -> Result<(), ShaderChunkError> {
    for line in source.lines() {
        let Some(name) = include_target(line) else {
            out.push_str(line);
            out.push('\n');
            continue;
        };

        if stack.iter().any(|open| open == name) {
            return Err(ShaderChunkError::Cycle { name: name.to_string() });
        }

        let body = chunk(name).ok_or_else(|| ShaderChunkError::Unknown { name: name.to_string() })?;

        stack.push(name.to_string());
        expand(&body, stack, out)?;
        stack.pop();
    }

    Ok(())
}

fn include_target(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix("#include")?
        .trim()
        .strip_prefix('<')?
        .strip_suffix('>')
        .map(str::trim)
}
