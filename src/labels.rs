//! Display strings. Pure lookups, no state.

use crate::types::{Grade, Severity, ViewMode};
use crate::view::DetailTab;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Tr,
}

impl Locale {
    pub fn from_tag(tag: &str) -> Option<Locale> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "tr" => Some(Locale::Tr),
            _ => None,
        }
    }
}

pub fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "🔴",
        Severity::Warning => "🟡",
        Severity::Info => "🔵",
    }
}

pub fn severity_label(locale: Locale, severity: Severity) -> &'static str {
    match (locale, severity) {
        (Locale::En, Severity::Error) => "Error",
        (Locale::En, Severity::Warning) => "Warning",
        (Locale::En, Severity::Info) => "Info",
        (Locale::Tr, Severity::Error) => "Hata",
        (Locale::Tr, Severity::Warning) => "Uyarı",
        (Locale::Tr, Severity::Info) => "Bilgi",
    }
}

/// Plural heading used in the statistics block.
pub fn severity_heading(locale: Locale, severity: Severity) -> &'static str {
    match (locale, severity) {
        (Locale::En, Severity::Error) => "Errors",
        (Locale::En, Severity::Warning) => "Warnings",
        (Locale::En, Severity::Info) => "Infos",
        (Locale::Tr, Severity::Error) => "Hatalar",
        (Locale::Tr, Severity::Warning) => "Uyarılar",
        (Locale::Tr, Severity::Info) => "Bilgiler",
    }
}

pub fn grade_label(locale: Locale, grade: Grade) -> &'static str {
    match (locale, grade) {
        (Locale::En, Grade::A) => "Excellent",
        (Locale::En, Grade::B) => "Good",
        (Locale::En, Grade::C) => "Average",
        (Locale::En, Grade::D) => "Weak",
        (Locale::En, Grade::F) => "Failing",
        (Locale::Tr, Grade::A) => "Mükemmel",
        (Locale::Tr, Grade::B) => "İyi",
        (Locale::Tr, Grade::C) => "Orta",
        (Locale::Tr, Grade::D) => "Zayıf",
        (Locale::Tr, Grade::F) => "Başarısız",
    }
}

/// Unknown keys are shown as-is.
pub fn evaluation_label(locale: Locale, key: &str) -> String {
    let known = match (locale, key.trim().to_ascii_lowercase().as_str()) {
        (Locale::En, "excellent") => "Excellent code quality",
        (Locale::En, "good") => "Good code quality with minor issues",
        (Locale::En, "fair") => "Acceptable, but needs attention",
        (Locale::En, "poor") => "Poor code quality",
        (Locale::En, "critical") => "Critical problems found",
        (Locale::Tr, "excellent") => "Mükemmel kod kalitesi",
        (Locale::Tr, "good") => "Küçük sorunlarla iyi kod kalitesi",
        (Locale::Tr, "fair") => "Kabul edilebilir, dikkat gerekiyor",
        (Locale::Tr, "poor") => "Zayıf kod kalitesi",
        (Locale::Tr, "critical") => "Kritik sorunlar bulundu",
        _ => return key.to_string(),
    };
    known.to_string()
}

pub fn view_mode_label(locale: Locale, mode: ViewMode) -> &'static str {
    match (locale, mode) {
        (Locale::En, ViewMode::All) => "All",
        (Locale::En, ViewMode::Sequential) => "One by one",
        (Locale::Tr, ViewMode::All) => "Tümü",
        (Locale::Tr, ViewMode::Sequential) => "Sırayla",
    }
}

pub fn tab_label(locale: Locale, tab: DetailTab) -> &'static str {
    match (locale, tab) {
        (Locale::En, DetailTab::Explanation) => "Explanation",
        (Locale::En, DetailTab::Comparison) => "Comparison",
        (Locale::En, DetailTab::Fix) => "Fix",
        (Locale::Tr, DetailTab::Explanation) => "Açıklama",
        (Locale::Tr, DetailTab::Comparison) => "Karşılaştırma",
        (Locale::Tr, DetailTab::Fix) => "Çözüm",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_keys_are_case_insensitive() {
        assert_eq!(evaluation_label(Locale::En, "GOOD"), "Good code quality with minor issues");
    }

    #[test]
    fn unknown_evaluation_key_falls_back_to_key() {
        assert_eq!(evaluation_label(Locale::Tr, "mystery"), "mystery");
    }

    #[test]
    fn locale_tags() {
        assert_eq!(Locale::from_tag("TR"), Some(Locale::Tr));
        assert_eq!(Locale::from_tag("de"), None);
    }

    #[test]
    fn labels_differ_by_locale() {
        assert_ne!(
            severity_label(Locale::En, Severity::Error),
            severity_label(Locale::Tr, Severity::Error)
        );
        assert_eq!(grade_label(Locale::En, Grade::B), "Good");
    }
}
