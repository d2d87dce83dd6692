// Mon Feb 02 2026 - Alex

use super::args::{Args, Command, OutputArgs, ParseArgs, RenderArgs, RunArgs, STDIN_MARKER};
use crate::config::Config;
use crate::output::{ArtifactWriter, HtmlRenderer};
use crate::parser::LeakParser;
use crate::report::{InvocationParams, Report};
use crate::runner::{capture_report, LeaksCommand};
use crate::utils::{logging, pluralize, sanitize_file_stem};
use anyhow::Context;
use chrono::{DateTime, Utc};
use colored::Colorize;
use rayon::prelude::*;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

pub const EXIT_OK: i32 = 0;
pub const EXIT_LEAKS_REPORTED: i32 = 2;

struct Input {
    label: String,
    text: String,
    captured_at: DateTime<Utc>,
}

pub struct CommandHandler {
    config: Config,
    quiet: bool,
}

impl CommandHandler {
    pub fn new(config: Config) -> Self {
        Self { config, quiet: false }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Loads config, sets up logging and dispatches. Returns the exit code.
    pub fn run(args: Args) -> anyhow::Result<i32> {
        let config = match &args.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        };

        let level = args.log_level.as_deref().unwrap_or(&config.log_level);
        logging::init(logging::level_from_str(level));

        if args.no_color {
            colored::control::set_override(false);
        }

        CommandHandler::new(config)
            .with_quiet(args.quiet)
            .execute(args.command)
    }

    pub fn execute(&self, command: Command) -> anyhow::Result<i32> {
        match command {
            Command::Parse(parse_args) => self.handle_parse(parse_args),
            Command::Run(run_args) => self.handle_run(run_args),
            Command::Render(render_args) => self.handle_render(render_args),
        }
    }

    fn handle_parse(&self, args: ParseArgs) -> anyhow::Result<i32> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let inputs = args
            .inputs
            .iter()
            .map(|path| read_input(path))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let parser = self.parser(&args.output);
        let target = args.target.clone();

        let reports: Vec<(String, Report)> = inputs
            .par_iter()
            .map(|input| {
                let params = self.params(target.clone().unwrap_or_else(|| input.label.clone()), None, &[]);
                (input.label.clone(), parser.parse(&input.text, params, input.captured_at))
            })
            .collect();

        log::info!("Parsed {}", pluralize(reports.len(), "input", "inputs"));

        let multiple = reports.len() > 1;
        let mut found = false;
        for (index, (label, report)) in reports.iter().enumerate() {
            let artifact_dir = self.artifact_dir(&args.output).map(|dir| {
                if multiple {
                    dir.join(input_artifact_dir(index, label))
                } else {
                    dir
                }
            });
            found |= self.emit(label, report, &args.output, artifact_dir)?;
        }

        Ok(self.exit_code(found, &args.output))
    }

    fn handle_run(&self, args: RunArgs) -> anyhow::Result<i32> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let params = self.params(args.target.clone(), args.device.clone(), &args.exclude);
        let source = LeaksCommand::from_config(&self.config);
        let parser = self.parser(&args.output);

        if !self.quiet {
            eprintln!("{} Running leaks against {}", "[*]".blue(), args.target.cyan());
        }

        let captured = capture_report(&source, &parser, params).context("Failed to capture leaks output")?;

        if !captured.completed_normally() {
            anyhow::bail!(
                "leaks exited with {:?}: {}",
                captured.exit_code,
                captured.stderr.trim()
            );
        }

        let found = self.emit(&args.target, &captured.report, &args.output, self.artifact_dir(&args.output))?;
        Ok(self.exit_code(found, &args.output))
    }

    fn handle_render(&self, args: RenderArgs) -> anyhow::Result<i32> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let text = fs::read_to_string(&args.report)
            .with_context(|| format!("Failed to read {}", args.report.display()))?;
        let report = Report::from_json(&text).context("Report file is not a valid leak report")?;

        let mut renderer = HtmlRenderer::new().with_raw_output(args.raw);
        if let Some(title) = &args.title {
            renderer = renderer.with_title(title.clone());
        }
        renderer
            .render_to_file(&report, &args.output)
            .with_context(|| format!("Failed to write {}", args.output.display()))?;

        if !self.quiet {
            eprintln!("{} HTML report saved to: {}", "[+]".green(), args.output.display());
        }
        Ok(EXIT_OK)
    }

    fn parser(&self, output: &OutputArgs) -> LeakParser {
        match &output.test_name {
            Some(name) => LeakParser::new().with_test_name(name.clone()),
            None => LeakParser::new(),
        }
    }

    fn params(&self, target: String, device: Option<String>, excluded: &[String]) -> InvocationParams {
        let mut params = InvocationParams::new(target)
            .with_excluded_symbols(self.config.excluded_symbols.iter().cloned())
            .with_excluded_symbols(excluded.iter().cloned());
        params.device_id = device;
        params
    }

    fn artifact_dir(&self, output: &OutputArgs) -> Option<PathBuf> {
        output.artifacts.clone().or_else(|| self.config.artifact_dir.clone())
    }

    fn exit_code(&self, found: bool, output: &OutputArgs) -> i32 {
        if found && output.fail_on_leaks {
            EXIT_LEAKS_REPORTED
        } else {
            EXIT_OK
        }
    }

    /// Writes every requested view of `report`. Returns whether it has records.
    fn emit(
        &self,
        label: &str,
        report: &Report,
        output: &OutputArgs,
        artifact_dir: Option<PathBuf>,
    ) -> anyhow::Result<bool> {
        let report = match output.only {
            Some(filter) => report.filter_by_kind(filter.kind()),
            None => report.clone(),
        };

        let json = if output.compact || !self.config.pretty_json {
            report.to_json_compact()?
        } else {
            report.to_json_pretty()?
        };

        match &output.output {
            Some(path) => {
                fs::write(path, json.as_bytes())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if !self.quiet {
                    eprintln!("{} Report saved to: {}", "[+]".green(), path.display());
                }
            }
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                writeln!(handle, "{}", json)?;
            }
        }

        if let Some(dir) = artifact_dir {
            let written = ArtifactWriter::new(&dir)
                .write(&report)
                .with_context(|| format!("Failed to write artifacts to {}", dir.display()))?;
            if !self.quiet {
                eprintln!(
                    "{} {} written to: {}",
                    "[+]".green(),
                    pluralize(written.file_count(), "artifact", "artifacts"),
                    dir.display()
                );
            }
        }

        if let Some(path) = &output.html {
            HtmlRenderer::new()
                .render_to_file(&report, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !self.quiet {
                eprintln!("{} HTML report saved to: {}", "[+]".green(), path.display());
            }
        }

        if !self.quiet {
            print_summary(label, &report);
        }

        Ok(!report.is_empty())
    }
}

// Stems can repeat across directories, so the input position keeps them apart.
fn input_artifact_dir(index: usize, label: &str) -> String {
    format!("{:02}-{}", index + 1, sanitize_file_stem(label, 80))
}

fn read_input(path: &Path) -> anyhow::Result<Input> {
    if path.as_os_str() == STDIN_MARKER {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
        return Ok(Input {
            label: "stdin".to_string(),
            text,
            captured_at: Utc::now(),
        });
    }

    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let captured_at = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());
    let label = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Input { label, text, captured_at })
}

fn print_summary(label: &str, report: &Report) {
    eprintln!("{}", format!("Leak Summary: {}", label).cyan().bold());
    eprintln!("{}", "-".repeat(40).cyan());

    if report.is_empty() {
        eprintln!("  {}", "No leaks found".green());
        return;
    }

    eprintln!("  Root leaks:  {}", report.leak_count().to_string().red());
    eprintln!("  Root cycles: {}", report.cycle_count().to_string().yellow());

    for record in report.leaks() {
        eprintln!(
            "  {} {} x{} ({}) [{} bytes]",
            record.kind.to_string().red(),
            record.root_type_name.cyan(),
            record.root_count,
            record.root_human_size,
            record.root_instance_size_bytes
        );
        for child in &record.children {
            let field = if child.field_name.is_empty() { "-" } else { child.field_name.as_str() };
            let type_name = if child.type_name.is_empty() { "?" } else { child.type_name.as_str() };
            eprintln!("      {} --> {} ({})", field, type_name, child.human_size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::KindFilter;

    const OUTPUT: &str = "1 (32 bytes) ROOT LEAK: <Blob 0x1> [32]\n1 (32 bytes) ROOT CYCLE: <Node 0x2> [32]\n";

    fn output_args(dir: &Path) -> OutputArgs {
        OutputArgs {
            output: Some(dir.join("report.json")),
            html: Some(dir.join("report.html")),
            artifacts: Some(dir.join("artifacts")),
            only: Some(KindFilter::Cycles),
            fail_on_leaks: true,
            ..OutputArgs::default()
        }
    }

    #[test]
    fn test_parse_command_writes_all_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("capture.txt");
        fs::write(&input, OUTPUT).unwrap();

        let handler = CommandHandler::new(Config::default()).with_quiet(true);
        let code = handler
            .execute(Command::Parse(ParseArgs {
                inputs: vec![input],
                target: Some("App".to_string()),
                output: output_args(dir.path()),
            }))
            .unwrap();

        assert_eq!(code, EXIT_LEAKS_REPORTED);

        let report = Report::from_json(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.leaks()[0].root_type_name, "Node");
        assert_eq!(report.params().target, "App");

        assert!(dir.path().join("report.html").exists());
        assert!(dir.path().join("artifacts").join("001-Node.txt").exists());
    }

    #[test]
    fn test_render_command() {
        let dir = tempfile::tempdir().unwrap();
        let report = LeakParser::new().parse(OUTPUT, InvocationParams::new("App"), Utc::now());
        let json_path = dir.path().join("in.json");
        fs::write(&json_path, report.to_json_pretty().unwrap()).unwrap();

        let html_path = dir.path().join("out.html");
        let code = CommandHandler::new(Config::default())
            .with_quiet(true)
            .execute(Command::Render(RenderArgs {
                report: json_path,
                output: html_path.clone(),
                raw: true,
                title: Some("Nightly <UI> tests".to_string()),
            }))
            .unwrap();

        assert_eq!(code, EXIT_OK);
        let html = fs::read_to_string(html_path).unwrap();
        assert!(html.contains("<code>Blob</code>"));
        assert!(html.contains("<h1>Nightly &lt;UI&gt; tests</h1>"));
    }

    #[test]
    fn test_same_stem_inputs_get_separate_artifact_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let mut inputs = Vec::new();
        for sub in ["a", "b"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
            let input = dir.path().join(sub).join("cap.txt");
            fs::write(&input, OUTPUT).unwrap();
            inputs.push(input);
        }

        let artifacts = dir.path().join("artifacts");
        let code = CommandHandler::new(Config::default().with_artifact_dir(artifacts.clone()))
            .with_quiet(true)
            .execute(Command::Parse(ParseArgs {
                inputs,
                target: None,
                output: OutputArgs::default(),
            }))
            .unwrap();

        assert_eq!(code, EXIT_OK);
        assert!(artifacts.join("01-cap").join("report.json").exists());
        assert!(artifacts.join("02-cap").join("report.json").exists());
    }

    #[test]
    fn test_config_exclusions_come_first() {
        let handler = CommandHandler::new(Config::default().with_excluded_symbol("swift_once"));
        let params = handler.params("App".to_string(), Some("SIM".to_string()), &["objc_msgSend".to_string()]);

        assert_eq!(params.excluded_symbols, vec!["swift_once".to_string(), "objc_msgSend".to_string()]);
        assert_eq!(params.device_id.as_deref(), Some("SIM"));
    }
}
