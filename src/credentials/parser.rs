//! Minimal INI reader for OCI configuration files
//!
//! Section names are case-sensitive, keys are lower-cased, and values in
//! `[DEFAULT]` are visible from every other section.

use std::collections::HashMap;
use std::fmt;

/// Name of the section whose values every profile inherits
pub(crate) const DEFAULT_SECTION: &str = "DEFAULT";

/// Syntax error in an INI document
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParseError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Parsed INI document
#[derive(Debug, Clone, Default)]
pub(crate) struct IniFile {
    defaults: HashMap<String, String>,
    sections: HashMap<String, HashMap<String, String>>,
}

impl IniFile {
    /// Parse an INI document
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let mut ini = Self::default();
        let mut current: Option<String> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| ParseError {
                        line: line_no,
                        message: format!("malformed section header '{line}'"),
                    })?;

                if name != DEFAULT_SECTION && ini.sections.contains_key(name) {
                    return Err(ParseError {
                        line: line_no,
                        message: format!("duplicate section '{name}'"),
                    });
                }
                if name != DEFAULT_SECTION {
                    ini.sections.insert(name.to_string(), HashMap::new());
                }
                current = Some(name.to_string());
                continue;
            }

            let Some(section) = current.as_deref() else {
                return Err(ParseError {
                    line: line_no,
                    message: "entry before any section header".to_string(),
                });
            };

            let sep = line.find(['=', ':']).ok_or_else(|| ParseError {
                line: line_no,
                message: format!("expected 'key=value', found '{line}'"),
            })?;
            let key = line[..sep].trim().to_lowercase();
            let value = line[sep + 1..].trim().to_string();

            if key.is_empty() {
                return Err(ParseError {
                    line: line_no,
                    message: "empty key".to_string(),
                });
            }

            let target = if section == DEFAULT_SECTION {
                &mut ini.defaults
            } else {
                ini.sections.entry(section.to_string()).or_default()
            };
            target.insert(key, value);
        }

        Ok(ini)
    }

    /// Whether a profile of that name can be resolved
    ///
    /// `DEFAULT` always resolves, even when the file has no such section.
    pub fn has_profile(&self, name: &str) -> bool {
        name == DEFAULT_SECTION || self.sections.contains_key(name)
    }

    /// Resolve a profile, layering its own values over `[DEFAULT]`
    pub fn profile(&self, name: &str) -> Option<HashMap<String, String>> {
        if !self.has_profile(name) {
            return None;
        }
        let mut values = self.defaults.clone();
        if let Some(own) = self.sections.get(name) {
            values.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Some(values)
    }

    /// Names of the non-default sections, sorted
    pub fn section_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
