//! JSON output formatting

use crate::output::formatter::ActionOutput;

pub fn format_json(result: &ActionOutput) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::CleanupReport;
    use serde_json::Value;

    #[test]
    fn test_cleanup_json() {
        let output = ActionOutput::Cleanup(CleanupReport {
            container: "roc".to_string(),
            stopped: true,
            removed: false,
        });
        let value: Value = serde_json::from_str(&format_json(&output)).unwrap();
        assert_eq!(value["container"], "roc");
        assert_eq!(value["stopped"], true);
        assert_eq!(value["removed"], false);
    }
}
