//! Service alerts attached to legs, and the display denylist.

/// Severity reported by the planner for an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    UnknownSeverity,
    Info,
    Minor,
    Warning,
    Severe,
    NoService,
    Emergency,
}

/// How prominently an alert is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Error,
    Warning,
    Info,
}

impl AlertSeverity {
    /// Parse a severity tag. Unrecognised tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "UNKNOWN_SEVERITY" => Some(AlertSeverity::UnknownSeverity),
            "INFO" => Some(AlertSeverity::Info),
            "MINOR" => Some(AlertSeverity::Minor),
            "WARNING" => Some(AlertSeverity::Warning),
            "SEVERE" => Some(AlertSeverity::Severe),
            "NO_SERVICE" => Some(AlertSeverity::NoService),
            "EMERGENCY" => Some(AlertSeverity::Emergency),
            _ => None,
        }
    }
}

/// A service alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub severity: Option<AlertSeverity>,
    pub header: Option<String>,
    pub description: Option<String>,
}

impl Alert {
    /// Display level. Alerts without a known severity render as warnings.
    pub fn level(&self) -> AlertLevel {
        match self.severity {
            Some(AlertSeverity::Severe | AlertSeverity::NoService | AlertSeverity::Emergency) => {
                AlertLevel::Error
            }
            Some(AlertSeverity::Info | AlertSeverity::UnknownSeverity) => AlertLevel::Info,
            Some(AlertSeverity::Warning | AlertSeverity::Minor) | None => AlertLevel::Warning,
        }
    }
}

/// One suppressed header/description combination.
///
/// Matching is case-insensitive on trimmed text: the header must equal
/// `header` and the description must contain `description_fragment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressionRule {
    pub header: String,
    pub description_fragment: String,
}

impl SuppressionRule {
    pub fn new(header: impl Into<String>, description_fragment: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            description_fragment: description_fragment.into(),
        }
    }

    fn matches(&self, header: &str, description: &str) -> bool {
        header == self.header.trim().to_lowercase()
            && description.contains(&self.description_fragment.trim().to_lowercase())
    }
}

/// Denylist of known-noisy alerts hidden from every view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertFilter {
    rules: Vec<SuppressionRule>,
}

impl AlertFilter {
    /// A filter that suppresses nothing.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// A filter with the given rules.
    pub fn new(rules: Vec<SuppressionRule>) -> Self {
        Self { rules }
    }

    /// Add a rule.
    pub fn with_rule(mut self, rule: SuppressionRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[SuppressionRule] {
        &self.rules
    }

    /// Returns true unless a rule suppresses this alert.
    pub fn should_display(&self, alert: &Alert) -> bool {
        let header = alert
            .header
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        let description = alert
            .description
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        !self.rules.iter().any(|r| r.matches(&header, &description))
    }

    /// Returns the displayable alerts, in order.
    pub fn visible<'a>(&self, alerts: &'a [Alert]) -> Vec<&'a Alert> {
        alerts.iter().filter(|a| self.should_display(a)).collect()
    }
}

impl Default for AlertFilter {
    /// Suppresses the generic Straszewskiego tram-closure notice.
    fn default() -> Self {
        Self::empty().with_rule(SuppressionRule::new(
            "Ogólny tekst specjalny",
            "wyłączenie ruchu tramwajowego na ulicy straszewskiego",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(header: &str, description: &str) -> Alert {
        Alert {
            severity: None,
            header: Some(header.into()),
            description: Some(description.into()),
        }
    }

    #[test]
    fn severity_levels() {
        let mut a = alert("h", "d");
        assert_eq!(a.level(), AlertLevel::Warning);

        a.severity = AlertSeverity::parse("severe");
        assert_eq!(a.level(), AlertLevel::Error);
        a.severity = AlertSeverity::parse("NO_SERVICE");
        assert_eq!(a.level(), AlertLevel::Error);
        a.severity = AlertSeverity::parse("MINOR");
        assert_eq!(a.level(), AlertLevel::Warning);
        a.severity = AlertSeverity::parse("UNKNOWN_SEVERITY");
        assert_eq!(a.level(), AlertLevel::Info);
        a.severity = AlertSeverity::parse("bogus");
        assert_eq!(a.severity, None);
    }

    #[test]
    fn default_filter_suppresses_known_notice() {
        let filter = AlertFilter::default();
        let noisy = alert(
            "  OGÓLNY TEKST SPECJALNY ",
            "Uwaga: wyłączenie ruchu tramwajowego na ulicy Straszewskiego do odwołania",
        );
        assert!(!filter.should_display(&noisy));
    }

    #[test]
    fn default_filter_keeps_other_alerts() {
        let filter = AlertFilter::default();
        // Same header, different description.
        assert!(filter.should_display(&alert("Ogólny tekst specjalny", "Objazd linii 4")));
        // Same description, different header.
        assert!(filter.should_display(&alert(
            "Utrudnienia",
            "wyłączenie ruchu tramwajowego na ulicy Straszewskiego"
        )));
        assert!(filter.should_display(&Alert {
            severity: None,
            header: None,
            description: None,
        }));
    }

    #[test]
    fn empty_filter_shows_everything() {
        let filter = AlertFilter::empty();
        let alerts = vec![alert("a", "b"), alert("c", "d")];
        assert_eq!(filter.visible(&alerts).len(), 2);
    }

    #[test]
    fn custom_rule() {
        let filter = AlertFilter::empty().with_rule(SuppressionRule::new("Test", "ignore me"));
        let alerts = vec![alert("test", "please IGNORE ME now"), alert("test", "keep")];
        let visible = filter.visible(&alerts);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].description.as_deref(), Some("keep"));
    }
}
