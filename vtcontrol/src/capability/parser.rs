//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Terminfo-source capability parser.

use super::{Capability, TerminalEntry};
use crate::{TerminalError, TerminalResult};
use std::collections::HashMap;

/// An entry as written, before `use=` inheritance is resolved.
#[derive(Clone, Debug)]
pub(super) struct RawEntry {
    pub(super) line: usize,
    pub(super) names: Vec<String>,
    pub(super) description: String,
    pub(super) fields: Vec<Field>,
}

#[derive(Clone, Debug, PartialEq)]
pub(super) enum Field {
    Set(String, Capability),
    Cancel(String),
    Use(String),
}

/// Splits source text into entries.
///
/// A line ending in an unescaped backslash continues directly on the next line.
pub(super) fn parse_entries(source: &str) -> TerminalResult<Vec<RawEntry>> {
    let mut entries = Vec::new();
    let mut current: Option<(usize, String)> = None;
    let mut joining = false;

    for (index, line) in source.lines().enumerate() {
        let number = index + 1;
        let trimmed = line.trim();
        if joining {
            let (text, more) = strip_continuation(trimmed);
            if let Some((_, entry)) = current.as_mut() {
                entry.push_str(text);
                if !more {
                    entry.push(' ');
                }
            }
            joining = more;
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (text, more) = strip_continuation(trimmed);
        if line.starts_with(char::is_whitespace) {
            match current.as_mut() {
                Some((_, entry)) => entry.push_str(text),
                None => return Err(syntax(number, "continuation line before any entry")),
            }
        } else {
            if let Some((start, entry)) = current.take() {
                entries.push(parse_entry(start, &entry)?);
            }
            current = Some((number, text.to_string()));
        }
        if !more {
            if let Some((_, entry)) = current.as_mut() {
                entry.push(' ');
            }
        }
        joining = more;
    }
    if let Some((start, text)) = current {
        entries.push(parse_entry(start, &text)?);
    }
    Ok(entries)
}

/// Drops a trailing line-continuation backslash, leaving an escaped `\\` alone.
fn strip_continuation(line: &str) -> (&str, bool) {
    let trailing = line.bytes().rev().take_while(|&b| b == b'\\').count();
    if trailing % 2 == 1 {
        (&line[..line.len() - 1], true)
    } else {
        (line, false)
    }
}

fn parse_entry(line: usize, text: &str) -> TerminalResult<RawEntry> {
    let mut fields = split_fields(text).into_iter();
    let header = fields
        .next()
        .ok_or_else(|| syntax(line, "entry has no header"))?;

    let mut parts: Vec<&str> = header.split('|').map(str::trim).collect();
    let description = if parts.len() > 1 {
        parts.pop().unwrap_or_default().to_string()
    } else {
        String::new()
    };
    let names: Vec<String> = parts
        .into_iter()
        .filter(|name| !name.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    if names.is_empty() {
        return Err(syntax(line, "entry has no name"));
    }

    let fields = fields
        .map(|field| parse_field(line, &field))
        .collect::<TerminalResult<Vec<_>>>()?;

    Ok(RawEntry {
        line,
        names,
        description,
        fields,
    })
}

/// Splits on commas not preceded by a backslash escape.
fn split_fields(text: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                field.push(c);
                if let Some(next) = chars.next() {
                    field.push(next);
                }
            }
            ',' => {
                let done = field.trim();
                if !done.is_empty() {
                    fields.push(done.to_string());
                }
                field.clear();
            }
            _ => field.push(c),
        }
    }
    let rest = field.trim();
    if !rest.is_empty() {
        fields.push(rest.to_string());
    }
    fields
}

fn parse_field(line: usize, field: &str) -> TerminalResult<Field> {
    if let Some((name, value)) = field.split_once('=') {
        let name = check_name(line, name)?;
        if name == "use" {
            return Ok(Field::Use(value.trim().to_ascii_lowercase()));
        }
        let value = unescape(value).map_err(|message| syntax(line, &format!("{name}: {message}")))?;
        return Ok(Field::Set(name, Capability::String(value)));
    }
    if let Some((name, value)) = field.split_once('#') {
        let name = check_name(line, name)?;
        let number = parse_number(value)
            .ok_or_else(|| syntax(line, &format!("{name}: invalid number '{value}'")))?;
        return Ok(Field::Set(name, Capability::Number(number)));
    }
    if let Some(name) = field.strip_suffix('@') {
        return Ok(Field::Cancel(check_name(line, name)?));
    }
    Ok(Field::Set(check_name(line, field)?, Capability::Flag))
}

fn check_name(line: usize, name: &str) -> TerminalResult<String> {
    let name = name.trim();
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(syntax(line, &format!("invalid capability name '{name}'")));
    }
    Ok(name.to_string())
}

fn parse_number(value: &str) -> Option<u32> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok()
    } else if value.len() > 1 && value.starts_with('0') {
        u32::from_str_radix(&value[1..], 8).ok()
    } else {
        value.parse().ok()
    }
}

/// Decodes `\E`, `^X`, octal and the other terminfo string escapes.
pub(super) fn unescape(value: &str) -> Result<Vec<u8>, String> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                let escape = *bytes.get(i + 1).ok_or("trailing backslash")?;
                i += 2;
                match escape {
                    b'E' | b'e' => out.push(0x1B),
                    b'n' | b'l' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0C),
                    b's' => out.push(b' '),
                    b'0'..=b'7' => {
                        let mut code = u32::from(escape - b'0');
                        let mut digits = 1;
                        while digits < 3 {
                            match bytes.get(i) {
                                Some(&d @ b'0'..=b'7') => {
                                    code = code * 8 + u32::from(d - b'0');
                                    i += 1;
                                    digits += 1;
                                }
                                _ => break,
                            }
                        }
                        let code = u8::try_from(code).map_err(|_| format!("octal escape {code:o} out of range"))?;
                        // terminfo writes NUL as \0 but stores it as 0x80
                        out.push(if code == 0 { 0x80 } else { code });
                    }
                    b'\\' | b',' | b'^' | b':' => out.push(escape),
                    other => return Err(format!("unknown escape '\\{}'", other as char)),
                }
            }
            b'^' => {
                let control = *bytes.get(i + 1).ok_or("trailing caret")?;
                i += 2;
                out.push(match control {
                    b'?' => 0x7F,
                    c => c.to_ascii_uppercase() & 0x1F,
                });
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    Ok(out)
}

/// Flattens `use=` chains. Fields written before a `use=` override the inherited ones.
pub(super) fn resolve(raw: &[RawEntry]) -> TerminalResult<Vec<TerminalEntry>> {
    let mut by_name = HashMap::new();
    for (index, entry) in raw.iter().enumerate() {
        for name in &entry.names {
            by_name.insert(name.as_str(), index);
        }
    }

    raw.iter()
        .map(|entry| {
            let mut capabilities = HashMap::new();
            let mut cancelled = Vec::new();
            apply(raw, &by_name, entry, &mut capabilities, &mut cancelled, 0)?;
            Ok(TerminalEntry {
                names: entry.names.clone(),
                description: entry.description.clone(),
                capabilities,
            })
        })
        .collect()
}

const MAX_USE_DEPTH: usize = 16;

fn apply(
    raw: &[RawEntry],
    by_name: &HashMap<&str, usize>,
    entry: &RawEntry,
    capabilities: &mut HashMap<String, Capability>,
    cancelled: &mut Vec<String>,
    depth: usize,
) -> TerminalResult<()> {
    if depth > MAX_USE_DEPTH {
        return Err(syntax(entry.line, "use= chain is too deep"));
    }
    for field in &entry.fields {
        match field {
            Field::Set(name, value) => {
                if !cancelled.contains(name) && !capabilities.contains_key(name) {
                    capabilities.insert(name.clone(), value.clone());
                }
            }
            Field::Cancel(name) => {
                if !capabilities.contains_key(name) {
                    cancelled.push(name.clone());
                }
            }
            Field::Use(target) => {
                let parent = by_name.get(target.as_str()).map(|&index| &raw[index]).ok_or_else(|| {
                    TerminalError::UnresolvedUse {
                        entry: entry.names[0].clone(),
                        target: target.clone(),
                    }
                })?;
                apply(raw, by_name, parent, capabilities, cancelled, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn syntax(line: usize, message: &str) -> TerminalError {
    TerminalError::CapabilitySyntax {
        line,
        message: message.to_string(),
    }
}
