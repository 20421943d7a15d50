//! CLI shim: a small shell script on `PATH` that starts the artifact
//! detached from the invoking terminal.

use std::path::Path;

use super::{check_embedded, write_file, Integration, IntegrationState};
use crate::error::Result;

const PATH_VAR: &str = "APPIMAGE_PATH";

pub fn render_shim(integration: &Integration, artifact: &Path) -> String {
    let quoted = shell_quote(&artifact.to_string_lossy());
    format!(
        "#!/bin/sh\n\
         {var}={quoted}\n\
         if [ ! -x \"${var}\" ]; then\n\
         \x20   echo \"{app}: ${var} is missing; run appup --install\" >&2\n\
         \x20   exit 1\n\
         fi\n\
         nohup \"${var}\" {flag} \"$@\" >/dev/null 2>&1 &\n",
        var = PATH_VAR,
        app = integration.app_name,
        flag = integration.launch_flag,
    )
}

/// The artifact path assigned in the shim, unquoted.
pub fn parse_shim_path(content: &str) -> Option<String> {
    let prefix = format!("{PATH_VAR}=");
    let raw = content
        .lines()
        .find_map(|l| l.trim().strip_prefix(prefix.as_str()))?;
    let path = shell_unquote(raw.trim())?;
    (!path.is_empty()).then_some(path)
}

pub fn write_shim(path: &Path, content: &str) -> Result<()> {
    write_file(path, content, 0o755)
}

pub fn check(shim: &Path, artifact: &Path) -> IntegrationState {
    check_embedded(shim, artifact, parse_shim_path)
}

/// Double-quote `s` for POSIX sh.
fn shell_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Inverse of [`shell_quote`]; also accepts bare and single-quoted words.
fn shell_unquote(s: &str) -> Option<String> {
    if let Some(inner) = s.strip_prefix('\'') {
        return inner.strip_suffix('\'').map(str::to_string);
    }
    let Some(inner) = s.strip_prefix('"') else {
        return Some(s.to_string());
    };
    let inner = inner.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(n @ ('"' | '\\' | '$' | '`')) => out.push(n),
                Some(n) => {
                    out.push('\\');
                    out.push(n);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}
