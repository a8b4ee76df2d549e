//! Collected `Accept*` request headers.
//!
//! Every header whose name starts with `Accept` is kept (names lower-cased,
//! values in arrival order) so managers can negotiate on any of them.
//! [`AcceptHeaders::media_ranges`] parses the `Accept` header proper into
//! weighted ranges ordered by preference.

use std::collections::BTreeMap;

use http::HeaderMap;

/// One media range from an `Accept` header.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    /// `type/subtype`, lower-cased.
    pub media_type: String,
    /// Parameters other than `q`, in order.
    pub params: Vec<(String, String)>,
    /// Weight in `[0, 1]`.
    pub quality: f32,
}

impl MediaRange {
    /// Parse a single range such as `application/atom+xml;type=feed;q=0.5`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(';').map(str::trim);
        let media_type = parts.next().filter(|s| s.contains('/'))?.to_ascii_lowercase();

        let mut params = Vec::new();
        let mut quality = 1.0_f32;
        for part in parts {
            let Some((name, val)) = part.split_once('=') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let val = val.trim().trim_matches('"');
            if name == "q" {
                quality = val.parse::<f32>().unwrap_or(0.0).clamp(0.0, 1.0);
            } else {
                params.push((name, val.to_owned()));
            }
        }

        Some(Self {
            media_type,
            params,
            quality,
        })
    }

    /// Whether this range accepts `media_type` (parameters ignored).
    #[must_use]
    pub fn matches(&self, media_type: &str) -> bool {
        let candidate = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if self.media_type == "*/*" {
            return true;
        }
        match self.media_type.strip_suffix("/*") {
            Some(major) => candidate
                .split_once('/')
                .is_some_and(|(m, _)| m == major),
            None => self.media_type == candidate,
        }
    }

    /// Value of parameter `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn specificity(&self) -> u8 {
        if self.media_type == "*/*" {
            0
        } else if self.media_type.ends_with("/*") {
            1
        } else if self.params.is_empty() {
            2
        } else {
            3
        }
    }
}

/// All `Accept*` headers of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptHeaders {
    headers: BTreeMap<String, Vec<String>>,
}

impl AcceptHeaders {
    /// Collect from a header map.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut accept = Self::default();
        for (name, value) in headers {
            if let Ok(value) = value.to_str() {
                accept.insert(name.as_str(), value);
            }
        }
        accept
    }

    /// Record a header if its name starts with `Accept`.
    pub fn insert(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if name.starts_with("accept") {
            self.headers.entry(name).or_default().push(value.to_owned());
        }
    }

    /// First value of header `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Every collected header as `(name, values)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Whether no `Accept*` header was sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Ranges from every `Accept` header, most preferred first.
    ///
    /// Ordered by weight, then by specificity; ties keep arrival order.
    #[must_use]
    pub fn media_ranges(&self) -> Vec<MediaRange> {
        let mut ranges: Vec<MediaRange> = self
            .headers
            .get("accept")
            .into_iter()
            .flatten()
            .flat_map(|v| v.split(','))
            .filter_map(MediaRange::parse)
            .collect();
        ranges.sort_by(|a, b| {
            b.quality
                .total_cmp(&a.quality)
                .then_with(|| b.specificity().cmp(&a.specificity()))
        });
        ranges
    }

    /// The most preferred range with a non-zero weight.
    #[must_use]
    pub fn preferred(&self) -> Option<MediaRange> {
        self.media_ranges().into_iter().find(|r| r.quality > 0.0)
    }
}
