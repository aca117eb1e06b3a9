// Copyright 2025 strigo contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::{ErrorContext, StrigoError};

pub fn format_error_chain(error: &StrigoError) -> String {
    let context = ErrorContext::new(error);
    context.to_string()
}

/// Format error for display to user with colors and formatting
pub fn format_error_with_color(error: &StrigoError, use_color: bool) -> String {
    let red = if use_color { "\x1b[31m" } else { "" };
    let yellow = if use_color { "\x1b[33m" } else { "" };
    let cyan = if use_color { "\x1b[36m" } else { "" };
    let reset = if use_color { "\x1b[0m" } else { "" };
    let bold = if use_color { "\x1b[1m" } else { "" };

    let context = ErrorContext::new(error);
    let mut output = String::new();

    // Error header
    output.push_str(&format!("{red}{bold}Error:{reset} {error}\n"));

    // Details
    if let Some(details) = &context.details {
        output.push_str(&format!("\n{details}\n"));
    }

    // Suggestions
    if let Some(suggestion) = &context.suggestion {
        output.push_str(&format!("\n{yellow}{bold}Suggestions:{reset}\n"));
        // Split suggestion by newlines and add cyan bullet points
        for line in suggestion.lines() {
            if !line.trim().is_empty() {
                output.push_str(&format!("{cyan}• {line}{reset}\n"));
            }
        }
    }

    // Always end with a reset to ensure no color bleeding
    if use_color && !output.is_empty() {
        output.push_str(reset);
    }

    output
}
