//! Test-script formatting.
//!
//! Pure transformations from an accumulated action sequence, or from raw
//! generator output, to a presentable/exportable test file. No state machine;
//! the control surface calls these at display and download time.

use crate::actions::{Action, ActionKind};
use chrono::Local;

const IMPORT_HEADER: &str = "import { test, expect } from '@playwright/test';";

/// Raw generator output lines that belong to browser bootstrap rather than
/// the test body.
const BOILERPLATE_MARKERS: &[&str] = &[
    "chromium",
    "launch",
    "newContext",
    "newPage",
    "async ()",
    "browser.close",
    "context.close",
    "-----",
];

/// `test_<YYYYMMDD_HHMMSS>`, used when the user supplies no name.
pub fn default_test_name() -> String {
    format!("test_{}", Local::now().format("%Y%m%d_%H%M%S"))
}

/// User-supplied test names may only contain letters, digits and underscores.
pub fn is_valid_test_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

fn statement_for(action: &Action) -> String {
    match &action.kind {
        ActionKind::Navigate { url } => format!("await page.goto('{}');", escape(url)),
        ActionKind::Click { selector } => format!("await page.click('{}');", escape(selector)),
        ActionKind::Fill { selector, value } => {
            format!("await page.fill('{}', '{}');", escape(selector), escape(value))
        }
        ActionKind::Select { selector, value } => format!(
            "await page.selectOption('{}', '{}');",
            escape(selector),
            escape(value)
        ),
    }
}

fn wrap_body(test_name: &str, body: &str) -> String {
    format!("{IMPORT_HEADER}\n\ntest('{test_name}', async ({{ page }}) => {{\n{body}\n}});")
}

/// Render an accumulated action sequence as a complete test file.
pub fn render_actions(test_name: &str, actions: &[Action]) -> String {
    let body = actions
        .iter()
        .map(|action| format!("  {}", statement_for(action)))
        .collect::<Vec<_>>()
        .join("\n");
    wrap_body(test_name, &body)
}

/// Re-wrap raw generator output into the same test template, dropping
/// browser bootstrap lines and separators.
pub fn wrap_generated(test_name: &str, raw: &str) -> String {
    let body = raw
        .lines()
        .filter(|line| {
            !line.trim().is_empty() && !BOILERPLATE_MARKERS.iter().any(|m| line.contains(m))
        })
        .map(|line| format!("  {}", line.trim()))
        .collect::<Vec<_>>()
        .join("\n");
    wrap_body(test_name, &body)
}
