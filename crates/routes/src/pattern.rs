//! Compiled route paths with `:name` parameter segments.

use std::collections::BTreeMap;

use crate::RegistryError;

/// Parameters captured by a pattern match, keyed by name.
pub type PathParams = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A route path split into literal and parameter segments.
///
/// `"/bookings/:id"` matches `"/bookings/42"` and captures `id = "42"`.
/// A parameter matches exactly one non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.split('/').filter(move |_| !trimmed.is_empty())
}

impl RoutePattern {
    pub fn parse(path: &str) -> Result<Self, RegistryError> {
        if path.is_empty() {
            return Err(RegistryError::EmptyPath);
        }
        if !path.starts_with('/') {
            return Err(RegistryError::NotAbsolute(path.to_string()));
        }

        let mut segments = Vec::new();
        for segment in split(path) {
            if segment.is_empty() {
                return Err(RegistryError::EmptySegment(path.to_string()));
            }
            match segment.strip_prefix(':') {
                Some("") => return Err(RegistryError::UnnamedParameter(path.to_string())),
                Some(name) => segments.push(Segment::Param(name.to_string())),
                None => segments.push(Segment::Literal(segment.to_string())),
            }
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn has_params(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Param(_)))
    }

    /// Normalised form used to detect paths that resolve identically:
    /// trailing slashes dropped and parameter names erased, so `/b/:id/`
    /// and `/b/:slug` share the key `/b/:`.
    pub fn canonical(&self) -> String {
        let mut key = String::new();
        for segment in &self.segments {
            key.push('/');
            match segment {
                Segment::Literal(lit) => key.push_str(lit),
                Segment::Param(_) => key.push(':'),
            }
        }
        if key.is_empty() {
            key.push('/');
        }
        key
    }

    /// Segment-wise match of a concrete path.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let parts: Vec<&str> = split(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Param(name) if !part.is_empty() => {
                    params.insert(name.clone(), part.to_string());
                }
                _ => return None,
            }
        }
        Some(params)
    }
}

impl core::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.raw)
    }
}
