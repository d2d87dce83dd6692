// Mon Feb 02 2026 - Alex

use crate::report::{LeakRecord, Report};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct HtmlRenderer {
    title: String,
    include_raw_output: bool,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self {
            title: "Memory Leak Report".to_string(),
            include_raw_output: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_raw_output(mut self, include: bool) -> Self {
        self.include_raw_output = include;
        self
    }

    pub fn render(&self, report: &Report) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape(&self.title)));
        html.push_str("<style>\n");
        html.push_str("body { font-family: -apple-system, 'Helvetica Neue', sans-serif; margin: 24px; color: #222; }\n");
        html.push_str("table { border-collapse: collapse; margin: 12px 0; }\n");
        html.push_str("th, td { border: 1px solid #ccc; padding: 6px 10px; text-align: left; }\n");
        html.push_str("th { background: #f2f2f2; }\n");
        html.push_str(".leak h2 { color: #b00020; }\n");
        html.push_str(".cycle h2 { color: #8a4b00; }\n");
        html.push_str("code, pre { font-family: Menlo, monospace; font-size: 12px; }\n");
        html.push_str("</style>\n</head>\n<body>\n");

        let params = report.params();
        html.push_str(&format!("<h1>{}</h1>\n", escape(&self.title)));
        html.push_str(&format!(
            "<p>Target: <code>{}</code>{} | Captured: {}</p>\n",
            escape(&params.target),
            params
                .device_id
                .as_deref()
                .map(|d| format!(" on <code>{}</code>", escape(d)))
                .unwrap_or_default(),
            report.invocation_time().to_rfc3339()
        ));
        html.push_str(&format!(
            "<p>{} root leak(s), {} root cycle(s)</p>\n",
            report.leak_count(),
            report.cycle_count()
        ));

        if !report.summary().is_empty() {
            html.push_str("<h2>Summary</h2>\n<table>\n");
            for (key, value) in report.summary() {
                html.push_str(&format!(
                    "<tr><th>{}</th><td>{}</td></tr>\n",
                    escape(key),
                    escape(value)
                ));
            }
            html.push_str("</table>\n");
        }

        if report.is_empty() {
            html.push_str("<p>No leaks found.</p>\n");
        }

        for (index, record) in report.leaks().iter().enumerate() {
            self.render_record(&mut html, index + 1, record);
        }

        if self.include_raw_output {
            html.push_str("<h2>Raw output</h2>\n");
            html.push_str(&format!("<pre>{}</pre>\n", escape(report.raw_output())));
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    pub fn render_to_file<P: AsRef<Path>>(&self, report: &Report, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(self.render(report).as_bytes())?;
        writer.flush()
    }

    fn render_record(&self, html: &mut String, index: usize, record: &LeakRecord) {
        let class = if record.is_cycle() { "cycle" } else { "leak" };

        html.push_str(&format!("<section class=\"{}\">\n", class));
        html.push_str(&format!(
            "<h2>#{} {}: <code>{}</code></h2>\n",
            index,
            record.kind,
            escape(&record.root_type_name)
        ));
        html.push_str(&format!(
            "<p>{} instance(s), {} total, {} bytes each</p>\n",
            record.root_count,
            escape(&record.root_human_size),
            record.root_instance_size_bytes
        ));
        if let Some(test_name) = &record.test_name {
            html.push_str(&format!("<p>Test: <code>{}</code></p>\n", escape(test_name)));
        }

        if !record.children.is_empty() {
            html.push_str("<table>\n<tr><th>Count</th><th>Size</th><th>Field</th><th>Type</th><th>Instance bytes</th></tr>\n");
            for child in &record.children {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td><code>{}</code></td><td><code>{}</code></td><td>{}</td></tr>\n",
                    child.count,
                    escape(&child.human_size),
                    escape(&child.field_name),
                    escape(&child.type_name),
                    child.instance_size_bytes
                ));
            }
            html.push_str("</table>\n");
        }

        html.push_str("</section>\n");
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LeakParser;
    use crate::report::InvocationParams;
    use chrono::Utc;

    const OUTPUT: &str = "Path: /tmp/<App>\n\
        1 (32 bytes) ROOT LEAK: <Outer<Inner> 0x1> [32]\n   \
        1 (16 bytes) value --> <Box<Int> 0x2> [16]\n\
        1 (32 bytes) ROOT CYCLE: <Node 0x3> [32]\n";

    #[test]
    fn test_escape() {
        assert_eq!(escape("Outer<A & B>"), "Outer&lt;A &amp; B&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_render_lists_records_and_summary() {
        let report = LeakParser::new()
            .with_test_name("testHtml")
            .parse(OUTPUT, InvocationParams::new("App").with_device_id("SIM-1"), Utc::now());
        let html = HtmlRenderer::new().render(&report);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<code>Outer&lt;Inner&gt;</code>"));
        assert!(html.contains("<code>Box&lt;Int&gt;</code>"));
        assert!(html.contains("<td>/tmp/&lt;App&gt;</td>"));
        assert!(html.contains("class=\"cycle\""));
        assert!(html.contains("on <code>SIM-1</code>"));
        assert!(html.contains("1 root leak(s), 1 root cycle(s)"));
        assert!(!html.contains("<pre>"));
    }

    #[test]
    fn test_render_empty_report() {
        let report = LeakParser::new().parse("", InvocationParams::new("App"), Utc::now());
        let html = HtmlRenderer::new().with_raw_output(true).render(&report);

        assert!(html.contains("No leaks found."));
        assert!(html.contains("<pre></pre>"));
    }
}
