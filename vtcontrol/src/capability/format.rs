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


//! Parameterised string expansion.
//!
//! Supports the subset of terminfo `%` directives the built-in descriptions use:
//! `%p1`..`%p9`, `%d` (with an optional zero-padded width), `%c`, `%i` and `%%`.

use crate::{TerminalError, TerminalResult};

/// Expands `template` with `params`.
pub fn expand(capability: &str, template: &[u8], params: &[i32]) -> TerminalResult<Vec<u8>> {
    let fail = |message: String| TerminalError::CapabilityFormat {
        capability: capability.to_string(),
        message,
    };

    let mut params: [i32; 9] = {
        let mut slots = [0; 9];
        for (slot, value) in slots.iter_mut().zip(params) {
            *slot = *value;
        }
        slots
    };
    let mut stack: Vec<i32> = Vec::new();
    let mut out = Vec::with_capacity(template.len() + 8);
    let mut i = 0;

    while i < template.len() {
        let byte = template[i];
        i += 1;
        if byte != b'%' {
            out.push(byte);
            continue;
        }
        let directive = *template
            .get(i)
            .ok_or_else(|| fail("template ends inside a % directive".to_string()))?;
        i += 1;
        match directive {
            b'%' => out.push(b'%'),
            b'i' => {
                params[0] += 1;
                params[1] += 1;
            }
            b'p' => {
                let digit = template
                    .get(i)
                    .copied()
                    .filter(|d| (b'1'..=b'9').contains(d))
                    .ok_or_else(|| fail("%p needs a parameter number 1-9".to_string()))?;
                i += 1;
                stack.push(params[usize::from(digit - b'1')]);
            }
            b'c' => {
                let value = stack
                    .pop()
                    .ok_or_else(|| fail("%c with an empty stack".to_string()))?;
                // terminfo sends a zero %c as 0x80 so it survives NUL stripping
                out.push(match value.rem_euclid(256) {
                    0 => 0x80,
                    v => v as u8,
                });
            }
            b'0'..=b'9' | b'd' => {
                let mut width = 0usize;
                let mut zero_pad = false;
                let mut current = directive;
                if current == b'0' {
                    zero_pad = true;
                    current = *template
                        .get(i)
                        .ok_or_else(|| fail("template ends inside a % directive".to_string()))?;
                    i += 1;
                }
                while current.is_ascii_digit() {
                    width = width * 10 + usize::from(current - b'0');
                    current = *template
                        .get(i)
                        .ok_or_else(|| fail("template ends inside a % directive".to_string()))?;
                    i += 1;
                }
                if current != b'd' {
                    return Err(fail(format!("unsupported directive %{}", current as char)));
                }
                let value = stack
                    .pop()
                    .ok_or_else(|| fail("%d with an empty stack".to_string()))?;
                let text = if zero_pad {
                    format!("{value:0width$}")
                } else {
                    format!("{value:width$}")
                };
                out.extend_from_slice(text.as_bytes());
            }
            other => {
                return Err(fail(format!("unsupported directive %{}", other as char)));
            }
        }
    }
    Ok(out)
}
