// Mon Feb 02 2026 - Alex

use crate::error::LeakError;
use crate::report::{LeakRecord, Report};
use serde_json::{to_string, to_string_pretty};

impl Report {
    /// Single-line JSON, as served to a transport.
    pub fn to_json_compact(&self) -> Result<String, LeakError> {
        Ok(to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, LeakError> {
        Ok(to_string_pretty(self)?)
    }

    /// Reads a report written by [`Report::to_json_compact`] or
    /// [`Report::to_json_pretty`]. Record raw lines are not part of the
    /// document and come back empty.
    pub fn from_json(text: &str) -> Result<Report, LeakError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl LeakRecord {
    pub fn to_json_pretty(&self) -> Result<String, LeakError> {
        Ok(to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::LeakParser;
    use crate::report::{InvocationParams, LeakKind, Report};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    const SAMPLE: &str = "Process 4242: 2 leaks for 480 total leaked bytes.\n\
        32 (3.66K) ROOT LEAK: <ToolbarMiddleware 0x1049065c0> [432]\n   \
        13 (1.42K) windowManager --> <MockWindowManager 0x600000c6cc90> [48]\n\
        Physical footprint: 12.3M\n\
        Path: /private/var/App\n";

    fn sample() -> Report {
        LeakParser::new().with_test_name("testToolbar").parse(
            SAMPLE,
            InvocationParams::new("4242").with_excluded_symbols(["swift_once"]),
            Utc.with_ymd_and_hms(2026, 2, 2, 9, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_top_level_field_order() {
        let json = sample().to_json_compact().unwrap();

        let positions: Vec<usize> = ["\"params\"", "\"invocationTime\"", "\"leaks\"", "\"summary\"", "\"rawOutput\""]
            .iter()
            .map(|key| json.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_leak_entry_shape() {
        let value: Value = serde_json::from_str(&sample().to_json_pretty().unwrap()).unwrap();
        let leak = &value["leaks"][0];

        assert_eq!(leak["leakType"], "ROOT_LEAK");
        assert_eq!(leak["rootCount"], 32);
        assert_eq!(leak["rootSizeHumanReadable"], "3.66K");
        assert_eq!(leak["rootTypeName"], "ToolbarMiddleware");
        assert_eq!(leak["rootInstanceSizeBytes"], 432);
        assert_eq!(leak["testName"], "testToolbar");
        assert!(leak.get("rawLines").is_none());

        let child = &leak["children"][0];
        assert_eq!(child["count"], 13);
        assert_eq!(child["sizeHumanReadable"], "1.42K");
        assert_eq!(child["fieldName"], "windowManager");
        assert_eq!(child["typeName"], "MockWindowManager");
        assert_eq!(child["instanceSizeBytes"], 48);
    }

    #[test]
    fn test_params_and_timestamp() {
        let value: Value = serde_json::from_str(&sample().to_json_compact().unwrap()).unwrap();

        assert_eq!(value["params"]["targetProcess"], "4242");
        assert_eq!(value["params"]["deviceId"], Value::Null);
        assert_eq!(value["params"]["excludedSymbols"][0], "swift_once");
        assert!(value["invocationTime"].as_str().unwrap().starts_with("2026-02-02T09:30:00"));
        assert_eq!(value["rawOutput"], SAMPLE);
    }

    #[test]
    fn test_summary_keeps_insertion_order() {
        let json = sample().to_json_compact().unwrap();
        let footprint = json.find("\"Physical footprint\"").unwrap();
        let path = json.find("\"Path\"").unwrap();
        assert!(footprint < path);
    }

    #[test]
    fn test_read_back() {
        let report = sample();
        let restored = Report::from_json(&report.to_json_pretty().unwrap()).unwrap();

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.leaks()[0].kind, LeakKind::Leak);
        assert_eq!(restored.leaks()[0].children, report.leaks()[0].children);
        assert!(restored.leaks()[0].raw_lines.is_empty());
        assert_eq!(restored.summary(), report.summary());
        assert_eq!(restored.invocation_time(), report.invocation_time());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Report::from_json("{\"leaks\": 3}").is_err());
    }
}
