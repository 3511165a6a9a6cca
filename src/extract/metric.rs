//! Counters located in a page's visible text.

use crate::normalize::normalize_count;
use crate::{Result, ScrapeError};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// A count, optionally abbreviated: `1,500`, `1.2K`, `3 M`.
///
/// The suffix must end a word so that `500 Monthly` is read as `500`.
pub const NUMBER: &str = r"(\d[\d,]*(?:\.\d+)?(?:\s?[KMB]\b)?)";

static LINE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| compile(NUMBER).expect("number pattern is valid"));

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(&pattern.replace("{n}", NUMBER))
        .case_insensitive(true)
        .build()
        .map_err(|e| ScrapeError::Parse(format!("invalid metric pattern {pattern}: {e}")))
}

/// Fallback that reads a number next to a keyword line.
///
/// Used where the label is ambiguous (`Plays` vs `Playlist Adds`) and no
/// exact pattern matched. The first line containing `keyword` and none of
/// the `excluded` words is checked, then the line before it, then the line
/// after it. Neighbours containing an excluded word are skipped.
#[derive(Debug, Clone)]
pub struct LineContext {
    keyword: &'static str,
    excluded: &'static [&'static str],
}

impl LineContext {
    pub const fn new(keyword: &'static str, excluded: &'static [&'static str]) -> Self {
        Self { keyword, excluded }
    }

    fn is_excluded(&self, line: &str) -> bool {
        self.excluded.iter().any(|word| line.contains(word))
    }

    fn is_keyword_line(&self, line: &str) -> bool {
        line.contains(self.keyword) && !self.is_excluded(line)
    }

    /// The raw number found around the first usable keyword line.
    pub fn find(&self, text: &str) -> Option<String> {
        let lines: Vec<&str> = text.lines().collect();
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| self.is_keyword_line(line))
            .find_map(|(index, _)| self.number_near(&lines, index))
    }

    fn number_near(&self, lines: &[&str], index: usize) -> Option<String> {
        let own = lines.get(index).copied();
        let neighbours = [index.checked_sub(1), Some(index + 1)]
            .into_iter()
            .flatten()
            .filter_map(|i| lines.get(i).copied())
            .filter(|line| !self.is_excluded(line));

        own.into_iter()
            .chain(neighbours)
            .find_map(|line| LINE_NUMBER.captures(line).map(|c| c[1].to_string()))
    }
}

/// One numeric metric and the ordered ways to find it.
#[derive(Debug, Clone)]
pub struct MetricField {
    name: &'static str,
    patterns: Vec<Regex>,
    line_context: Option<LineContext>,
}

impl MetricField {
    /// Build a metric from label patterns.
    ///
    /// Each pattern must contain `{n}` where the number sits; patterns match
    /// case-insensitively and are tried in order.
    pub fn new(name: &'static str, patterns: &[&str]) -> Result<Self> {
        Ok(Self {
            name,
            patterns: patterns
                .iter()
                .map(|p| compile(p))
                .collect::<Result<_>>()?,
            line_context: None,
        })
    }

    pub fn with_line_context(mut self, context: LineContext) -> Self {
        self.line_context = Some(context);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn builtin(name: &'static str, patterns: &[&str]) -> Self {
        Self::new(name, patterns).expect("built-in metric pattern is valid")
    }

    pub fn followers() -> Self {
        Self::builtin(
            "followers",
            &[r"{n}\s*followers?", r"followers?\s*[:\-]?\s*{n}", r"{n}\s*fans?\b"],
        )
    }

    pub fn total_account_plays() -> Self {
        Self::builtin(
            "total_plays",
            &[
                r"{n}\s*total\s*account\s*plays?",
                r"total\s*account\s*plays?\s*[:\-]?\s*{n}",
            ],
        )
    }

    pub fn monthly_listeners() -> Self {
        Self::builtin(
            "monthly_listeners",
            &[
                r"{n}\s*monthly\s*listeners?",
                r"monthly\s*listeners?\s*[:\-]?\s*{n}",
            ],
        )
    }

    pub fn plays() -> Self {
        Self::builtin(
            "plays",
            &[r"{n}\s*total\s*plays?", r"total\s*plays?\s*[:\-]?\s*{n}"],
        )
        .with_line_context(LineContext::new("Plays", &["Playlist", "Added"]))
    }

    pub fn likes() -> Self {
        Self::builtin(
            "likes",
            &[
                r"{n}\s*favorites?",
                r"{n}\s*likes?",
                r"favorites?\s*[:\-]?\s*{n}",
                r"likes?\s*[:\-]?\s*{n}",
            ],
        )
    }

    pub fn reposts() -> Self {
        Self::builtin(
            "reposts",
            &[r"{n}\s*reposts?", r"{n}\s*shares?", r"reposts?\s*[:\-]?\s*{n}"],
        )
    }

    pub fn playlist_adds() -> Self {
        Self::builtin(
            "playlist_adds",
            &[r"{n}\s*playlist\s*adds?", r"playlist\s*adds?\s*[:\-]?\s*{n}"],
        )
    }

    /// Find this metric in `text`, expanded to a plain count.
    pub fn extract(&self, text: &str) -> Option<String> {
        let exact = self
            .patterns
            .iter()
            .find_map(|pattern| pattern.captures(text).map(|c| c[1].to_string()));

        if let Some(raw) = &exact {
            log::debug!("Found {} '{}' by label", self.name, raw.trim());
        }

        let raw = exact.or_else(|| {
            let context = self.line_context.as_ref()?;
            let raw = context.find(text)?;
            log::debug!("Found {} '{}' from line context", self.name, raw.trim());
            Some(raw)
        })?;

        Some(normalize_count(raw.trim()))
    }
}
