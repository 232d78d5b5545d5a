//! Comparison requests, including the `platform=&from=&to=` query form

use crate::error::SizeAnalyzerError;
use crate::index::AnalysisIndex;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// A version pair to compare on one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    /// Platform name
    pub platform: String,
    /// Baseline version
    pub from: String,
    /// Version compared against the baseline
    pub to: String,
}

impl ComparisonRequest {
    /// Create a request
    pub fn new(
        platform: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Parse `platform=...&from=...&to=...`
    ///
    /// A leading `?` is ignored, unknown keys are skipped, and the last
    /// occurrence of a repeated key wins. Values are form-url-decoded, so `+`
    /// reads as a space and malformed escapes pass through literally.
    ///
    /// # Examples
    ///
    /// ```
    /// use size_analyzer::request::ComparisonRequest;
    ///
    /// let req = ComparisonRequest::from_query_string("?platform=arm64%2Dandroid&from=1.0&to=1.1").unwrap();
    /// assert_eq!(req.platform, "arm64-android");
    /// assert_eq!(req.to, "1.1");
    /// ```
    pub fn from_query_string(query: &str) -> Result<Self, SizeAnalyzerError> {
        let (mut platform, mut from, mut to) = (None, None, None);
        let raw = query.trim_start_matches('?');
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "platform" => platform = Some(value.into_owned()),
                "from" => from = Some(value.into_owned()),
                "to" => to = Some(value.into_owned()),
                _ => {}
            }
        }

        let require = |value: Option<String>, key: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| SizeAnalyzerError::InvalidRequest {
                    query: query.to_string(),
                    reason: format!("missing '{}'", key),
                })
        };

        Ok(Self {
            platform: require(platform, "platform")?,
            from: require(from, "from")?,
            to: require(to, "to")?,
        })
    }

    /// Render back into query-string form
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("platform", &self.platform)
            .append_pair("from", &self.from)
            .append_pair("to", &self.to)
            .finish()
    }

    /// Reject identical versions, and unknown platforms or versions when an
    /// index is available
    ///
    /// Versions are identifiers here: `1.2` and `1.2.0` are different
    /// snapshots even though they order equally.
    pub fn validate(&self, index: Option<&AnalysisIndex>) -> Result<(), SizeAnalyzerError> {
        if self.from.trim() == self.to.trim() {
            return Err(SizeAnalyzerError::SameVersion {
                version: self.from.clone(),
            });
        }

        let Some(index) = index else {
            return Ok(());
        };

        if index.versions(&self.platform).is_none() {
            return Err(SizeAnalyzerError::UnknownPlatform {
                platform: self.platform.clone(),
                available: index.platforms().map(str::to_string).collect(),
            });
        }
        for version in [&self.from, &self.to] {
            if !index.contains(&self.platform, version) {
                return Err(SizeAnalyzerError::UnknownVersion {
                    platform: self.platform.clone(),
                    version: version.clone(),
                });
            }
        }
        Ok(())
    }
}
