// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use core::fmt;

use serde::{Deserialize, Serialize};

/// How a zone report is printed.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "Text", alias = "text", alias = "TEXT")]
    Text,
    #[serde(rename = "Csv", alias = "csv", alias = "CSV")]
    Csv,
}
impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "Text",
            OutputFormat::Csv => "Csv",
        })
    }
}
impl From<bool> for OutputFormat {
    /// `true` selects CSV, matching the `-c` switch.
    fn from(csv: bool) -> Self {
        if csv { OutputFormat::Csv } else { OutputFormat::Text }
    }
}
