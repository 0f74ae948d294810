// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError,
    errors::Result,
    output::{OutputContext, OutputOpts},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use paracept_junit::Report;
use paracept_metadata::ParaceptExitCode;
use paracept_runner::{
    config::ParaceptConfig,
    file_finder::TestFileFinder,
    group_file::GroupFiles,
    helpers::plural,
    merge::{FailedTestsMerger, HtmlReportMerger, TimePolicy, XmlReportMerger},
    partition::{GroupCount, GroupPartitioner, Groups, TimeWeightedPartitioner},
    recorder::{FailedTestsRecorder, Recorder, TimeRecorder, read_failed_tests, record_junit_report},
    resolver::DependencyResolver,
    test_filter::{FilterChain, GroupFilter},
    test_id::{TestId, TestManifest, TestSource},
    time_report::TimeReport,
};
use regex::Regex;
use tracing::{debug, info, warn};

/// Split a test suite into groups for parallel workers, and merge the reports they produce.
///
/// Group files are written as `<prefix><index>`, one test per line, for each worker to pick up.
/// Once the workers finish, their JUnit, HTML and failed-tests reports are merged back into one.
#[derive(Debug, Parser)]
#[command(version, name = "paracept")]
pub struct ParaceptApp {
    #[command(flatten)]
    output: OutputOpts,

    #[command(flatten)]
    config_opts: ConfigOpts,

    #[command(subcommand)]
    command: Command,
}

impl ParaceptApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the exit code on success.
    pub fn exec(self) -> Result<i32> {
        let config = self.config_opts.make_config()?;
        self.command.exec(&config)?;
        Ok(ParaceptExitCode::OK)
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "CONFIG OPTIONS")]
struct ConfigOpts {
    /// Config file [default: project-root/.config/paracept.toml]
    #[arg(long, global = true, value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,

    /// Directory that relative paths are resolved against [default: current directory]
    #[arg(long, global = true, value_name = "DIR")]
    project_root: Option<Utf8PathBuf>,
}

impl ConfigOpts {
    fn make_config(&self) -> Result<ParaceptConfig> {
        let project_root = match &self.project_root {
            Some(project_root) => project_root.clone(),
            None => current_dir()?,
        };
        Ok(ParaceptConfig::from_sources(
            project_root,
            self.config_file.as_deref(),
        )?)
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let dir = std::env::current_dir().map_err(ExpectedError::current_dir_failed)?;
    Utf8PathBuf::try_from(dir)
        .map_err(|err| ExpectedError::CurrentDirInvalidUtf8 {
            path: err.into_path_buf(),
        })
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split tests into groups, keeping dependent tests together
    ///
    /// Tests are read from a manifest, optionally narrowed down by group tags, and ordered so that
    /// every test runs after the tests it depends on. A dependency chain is never split across
    /// group files.
    SplitByGroups {
        #[command(flatten)]
        split: SplitOpts,

        /// Test manifest: a JSON array of tests, or a plain list with one test per line
        #[arg(long, value_name = "PATH")]
        from: Utf8PathBuf,

        /// Only keep tests carrying this group (may be repeated; all must match)
        #[arg(long = "include-group", value_name = "GROUP", help_heading = "FILTER OPTIONS")]
        include_groups: Vec<String>,

        /// Drop tests carrying this group (may be repeated; all must match)
        #[arg(long = "exclude-group", value_name = "GROUP", help_heading = "FILTER OPTIONS")]
        exclude_groups: Vec<String>,
    },

    /// Split tests into groups with balanced expected run times
    ///
    /// Historical run times are read from a time report, as written by `paracept record`. Tests
    /// missing from the report count as taking no time.
    SplitByTime {
        #[command(flatten)]
        split: SplitOpts,

        /// Test manifest: a JSON array of tests, or a plain list with one test per line
        #[arg(long, value_name = "PATH")]
        from: Utf8PathBuf,

        /// Time report [default: from config]
        #[arg(long, value_name = "PATH")]
        stat_file: Option<Utf8PathBuf>,
    },

    /// Split whole test files into groups
    SplitFiles {
        #[command(flatten)]
        split: SplitOpts,

        /// Directory searched for test files, relative to the project root [default: from config]
        #[arg(long, value_name = "PATH")]
        tests_from: Option<Utf8PathBuf>,

        /// Skip files under a directory with this name [default: from config]
        #[arg(long, value_name = "DIR")]
        exclude_path: Option<String>,

        /// File name glob for test files (may be repeated) [default: from config]
        #[arg(long = "pattern", value_name = "GLOB")]
        patterns: Vec<String>,
    },

    /// Split the tests that failed in the last run into groups
    SplitFailed {
        #[command(flatten)]
        split: SplitOpts,

        /// Failed-tests report [default: from config]
        #[arg(long, value_name = "PATH")]
        report: Option<Utf8PathBuf>,
    },

    /// Merge JUnit XML reports
    MergeXml {
        /// Source reports; missing or malformed ones are skipped with a warning
        #[arg(long, value_name = "PATHS", num_args = 1.., required = true)]
        from: Vec<Utf8PathBuf>,

        /// Destination for the merged report
        #[arg(long, value_name = "PATH")]
        into: Utf8PathBuf,

        /// Replace test cases already seen in an earlier report, instead of appending them
        #[arg(long)]
        rewrite: bool,

        /// Use the longest suite time instead of the sum
        #[arg(long)]
        max_time: bool,
    },

    /// Merge Codeception HTML reports
    MergeHtml {
        /// Source reports; the first one that exists is the base for the merged page
        #[arg(long, value_name = "PATHS", num_args = 1.., required = true)]
        from: Vec<Utf8PathBuf>,

        /// Destination for the merged report
        #[arg(long, value_name = "PATH")]
        into: Utf8PathBuf,

        /// Use the longest execution time instead of the sum
        #[arg(long)]
        max_time: bool,
    },

    /// Merge failed-tests reports
    MergeFailed {
        /// Source reports
        #[arg(long, value_name = "PATHS", num_args = 1..)]
        from: Vec<Utf8PathBuf>,

        /// Directory searched recursively for reports matching --pattern (may be repeated)
        #[arg(long, value_name = "DIR")]
        from_dir: Vec<Utf8PathBuf>,

        /// File name regex for reports found in --from-dir [default: from config]
        #[arg(long, value_name = "REGEX")]
        pattern: Option<String>,

        /// Destination for the merged report
        #[arg(long, value_name = "PATH")]
        into: Utf8PathBuf,
    },

    /// Record failed tests and run times from JUnit reports
    ///
    /// The failed-tests report is replaced, and run times are merged into the existing time
    /// report.
    Record {
        /// JUnit reports from a test run
        #[arg(long, value_name = "PATHS", num_args = 1.., required = true)]
        from: Vec<Utf8PathBuf>,

        /// Time report to update [default: from config]
        #[arg(long, value_name = "PATH")]
        time_report: Option<Utf8PathBuf>,

        /// Failed-tests report to write [default: from config]
        #[arg(long, value_name = "PATH")]
        failed_report: Option<Utf8PathBuf>,
    },
}

#[derive(Debug, Args)]
struct SplitOpts {
    /// Number of groups to split tests into
    #[arg(value_name = "GROUPS")]
    count: GroupCount,

    /// Prefix for group files [default: from config]
    #[arg(long, value_name = "PREFIX")]
    to: Option<Utf8PathBuf>,
}

impl SplitOpts {
    fn write(&self, config: &ParaceptConfig, groups: &Groups) -> Result<()> {
        let prefix = match &self.to {
            Some(to) => config.resolve(to),
            None => config.groups_prefix(),
        };
        GroupFiles::new(prefix).write(groups)?;
        Ok(())
    }
}

impl Command {
    fn exec(self, config: &ParaceptConfig) -> Result<()> {
        match self {
            Self::SplitByGroups {
                split,
                from,
                include_groups,
                exclude_groups,
            } => {
                let manifest = TestManifest::from_path(&config.resolve(&from))?;
                let mut chain = FilterChain::new();
                if !include_groups.is_empty() || !exclude_groups.is_empty() {
                    let mut filter = GroupFilter::new();
                    filter
                        .include_groups(include_groups)?
                        .exclude_groups(exclude_groups)?;
                    chain.add_filter(filter);
                }
                let tests = apply_filters(&mut chain, &manifest);
                let resolved = DependencyResolver::from_source(&manifest, &tests).resolve()?;
                split.write(config, &GroupPartitioner::new(split.count).pack(&resolved))
            }
            Self::SplitByTime {
                split,
                from,
                stat_file,
            } => {
                let manifest = TestManifest::from_path(&config.resolve(&from))?;
                let stat_file = match stat_file {
                    Some(stat_file) => config.resolve(stat_file),
                    None => config.time_report(),
                };
                let report = TimeReport::load(&stat_file)?;
                let tests = apply_filters(&mut FilterChain::new(), &manifest);
                let groups = TimeWeightedPartitioner::new(split.count).partition(&tests, &report);
                split.write(config, &groups)
            }
            Self::SplitFiles {
                split,
                tests_from,
                exclude_path,
                patterns,
            } => {
                let tests_from = tests_from.unwrap_or_else(|| config.tests_from().to_owned());
                let mut finder = TestFileFinder::new(config.project_root(), tests_from);
                if patterns.is_empty() {
                    finder.set_patterns(config.file_patterns());
                } else {
                    finder.set_patterns(patterns);
                }
                finder.set_exclude_path(
                    exclude_path.unwrap_or_else(|| config.exclude_path().to_owned()),
                );
                let manifest = TestManifest::from_ids(finder.find()?);
                let tests = apply_filters(&mut FilterChain::new(), &manifest);
                split.write(
                    config,
                    &GroupPartitioner::new(split.count).round_robin(&tests),
                )
            }
            Self::SplitFailed { split, report } => {
                let report = match report {
                    Some(report) => report,
                    None => config.failed_report(),
                };
                // An empty path is reported as such rather than resolved to the project root.
                let report = if report.as_str().is_empty() {
                    report
                } else {
                    config.resolve(report)
                };
                let manifest = TestManifest::from_ids(read_failed_tests(&report)?);
                let tests = apply_filters(&mut FilterChain::new(), &manifest);
                split.write(
                    config,
                    &GroupPartitioner::new(split.count).round_robin(&tests),
                )
            }
            Self::MergeXml {
                from,
                into,
                rewrite,
                max_time,
            } => {
                let mut merger = XmlReportMerger::new();
                merger
                    .add_sources(from.iter().map(|path| config.resolve(path)))
                    .set_destination(config.resolve(&into))
                    .set_rewrite(rewrite)
                    .set_time_policy(time_policy(max_time));
                let report = merger.run()?;
                for suite in &report.testsuites {
                    debug!(
                        "suite {}: {} tests, {} failures, {} errors",
                        suite.name, suite.tests, suite.failures, suite.errors
                    );
                }
                Ok(())
            }
            Self::MergeHtml {
                from,
                into,
                max_time,
            } => {
                let mut merger = HtmlReportMerger::new();
                merger
                    .add_sources(from.iter().map(|path| config.resolve(path)))
                    .set_destination(config.resolve(&into))
                    .set_time_policy(time_policy(max_time));
                merger.run()?;
                Ok(())
            }
            Self::MergeFailed {
                from,
                from_dir,
                pattern,
                into,
            } => {
                let pattern = pattern.unwrap_or_else(|| config.failed_report_pattern().to_owned());
                let regex = Regex::new(&pattern)
                    .map_err(|err| ExpectedError::invalid_report_pattern(&pattern, err))?;

                let mut merger = FailedTestsMerger::new();
                merger
                    .add_sources(from.iter().map(|path| config.resolve(path)))
                    .set_pattern(regex)
                    .set_destination(config.resolve(&into));
                for dir in &from_dir {
                    merger.add_source_dir(config.resolve(dir));
                }
                let merged = merger.run()?;
                info!(
                    "Merged {merged} failed-tests {}",
                    plural::reports_str(merged)
                );
                Ok(())
            }
            Self::Record {
                from,
                time_report,
                failed_report,
            } => {
                let mut report = Report::new();
                for path in &from {
                    report.add_testsuites(read_junit_report(&config.resolve(path))?.testsuites);
                }

                let mut failed = FailedTestsRecorder::new(match failed_report {
                    Some(path) => config.resolve(path),
                    None => config.failed_report(),
                });
                let mut time = TimeRecorder::new(match time_report {
                    Some(path) => config.resolve(path),
                    None => config.time_report(),
                });
                let recorders: &mut [&mut dyn Recorder] = &mut [&mut failed, &mut time];
                let count = record_junit_report(&report, config.project_root(), recorders)?;
                info!(
                    "Recorded {count} {}, {} failed",
                    plural::tests_str(count),
                    failed.failed().len()
                );
                Ok(())
            }
        }
    }
}

fn apply_filters(chain: &mut FilterChain, source: &dyn TestSource) -> Vec<TestId> {
    let tests = chain.apply(source);
    if tests.is_empty() {
        warn!("no tests left to split, group files will be empty");
    } else {
        info!("Processing {} {}", tests.len(), plural::tests_str(tests.len()));
    }
    tests
}

fn read_junit_report(path: &Utf8Path) -> Result<Report> {
    let input = std::fs::read_to_string(path).map_err(|err| ExpectedError::JunitReadError {
        path: path.to_owned(),
        err,
    })?;
    Report::deserialize_from_str(&input).map_err(|err| ExpectedError::JunitParseError {
        path: path.to_owned(),
        err,
    })
}

fn time_policy(max_time: bool) -> TimePolicy {
    if max_time {
        TimePolicy::Max
    } else {
        TimePolicy::Sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use clap::CommandFactory;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::fs;
    use test_case::test_case;

    #[test]
    fn verify_app() {
        ParaceptApp::command().debug_assert();
    }

    #[test]
    fn test_argument_parsing() {
        use clap::error::ErrorKind::{self, *};

        let valid: &[&'static str] = &[
            // ---
            // Splitting
            // ---
            "paracept split-by-groups 3 --from tests.json",
            "paracept split-by-groups 3 --from tests.json --to _data/group_",
            "paracept split-by-groups 3 --from tests.json --include-group smoke --include-group ui",
            "paracept split-by-groups 3 --from tests.json --exclude-group slow",
            "paracept split-by-time 2 --from tests.txt",
            "paracept split-by-time 2 --from tests.txt --stat-file times.json",
            "paracept split-files 4",
            "paracept split-files 4 --tests-from tests/e2e --exclude-path '' --pattern *Cest.php",
            "paracept split-failed 2",
            "paracept split-failed 2 --report failed.txt",
            // ---
            // Merging
            // ---
            "paracept merge-xml --from a.xml b.xml --into merged.xml",
            "paracept merge-xml --from a.xml --from b.xml --into merged.xml --rewrite --max-time",
            "paracept merge-html --from a.html b.html --into merged.html",
            "paracept merge-html --from a.html --into merged.html --max-time",
            "paracept merge-failed --from a.txt --into failed.txt",
            "paracept merge-failed --from-dir _output --into failed.txt",
            "paracept merge-failed --from-dir _output --pattern ^failed.*$ --into failed.txt",
            "paracept record --from report.xml",
            "paracept record --from a.xml b.xml --time-report t.json --failed-report f.txt",
            // ---
            // Global options
            // ---
            "paracept --color never split-failed 2",
            "paracept split-failed 2 --config-file custom.toml --project-root /project -v",
        ];

        let invalid: &[(&'static str, ErrorKind)] = &[
            ("paracept split-by-groups 0 --from tests.json", ValueValidation),
            ("paracept split-by-groups two --from tests.json", ValueValidation),
            ("paracept split-by-groups 2", MissingRequiredArgument),
            ("paracept split-files", MissingRequiredArgument),
            ("paracept merge-xml --into merged.xml", MissingRequiredArgument),
            ("paracept merge-xml --from a.xml", MissingRequiredArgument),
            ("paracept merge-html --from a.html", MissingRequiredArgument),
            ("paracept merge-failed --from a.txt", MissingRequiredArgument),
            ("paracept record", MissingRequiredArgument),
            ("paracept --color sometimes split-failed 2", InvalidValue),
        ];

        for valid_args in valid {
            let args = shell_split(valid_args);
            if let Err(error) = ParaceptApp::try_parse_from(&args) {
                panic!("{valid_args} should have successfully parsed, but didn't: {error}");
            }
        }

        for &(invalid_args, kind) in invalid {
            let args = shell_split(invalid_args);
            match ParaceptApp::try_parse_from(&args) {
                Ok(_) => panic!("{invalid_args} should have errored out but successfully parsed"),
                Err(error) => {
                    let actual_kind = error.kind();
                    if kind != actual_kind {
                        panic!(
                            "{invalid_args} should error with {kind:?}, got {actual_kind:?}: {error}"
                        );
                    }
                }
            }
        }
    }

    // The argument lists above are simple enough to not need a full shell parser.
    fn shell_split(args: &str) -> Vec<String> {
        args.split_whitespace()
            .map(|arg| arg.trim_matches('\'').to_owned())
            .collect()
    }

    fn run(dir: &Utf8TempDir, args: &str) -> Result<i32> {
        let mut args = shell_split(args);
        args.extend(["--project-root".to_owned(), dir.path().to_string()]);
        ParaceptApp::try_parse_from(&args)
            .expect("arguments are valid")
            .exec()
    }

    fn read_lines(path: &Utf8Path) -> Vec<String> {
        fs::read_to_string(path)
            .expect("file is readable")
            .lines()
            .map(ToOwned::to_owned)
            .collect()
    }

    #[test]
    fn split_by_groups_writes_group_files() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        fs::write(
            dir.path().join("tests.json"),
            indoc! {r#"
                [
                    { "id": "a.php:one", "groups": ["smoke"] },
                    { "id": "a.php:two", "groups": ["smoke"], "depends": ["one"] },
                    { "id": "b.php:three", "groups": ["smoke"] },
                    { "id": "b.php:four", "groups": ["slow"] }
                ]
            "#},
        )
        .expect("wrote manifest");

        let code = run(
            &dir,
            "paracept split-by-groups 2 --from tests.json --include-group smoke",
        )
        .expect("split succeeds");
        assert_eq!(code, ParaceptExitCode::OK);

        let prefix = dir.path().join("tests/_data/paracept_");
        assert_eq!(
            read_lines(&Utf8PathBuf::from(format!("{prefix}1"))),
            vec!["a.php:one", "a.php:two"]
        );
        assert_eq!(
            read_lines(&Utf8PathBuf::from(format!("{prefix}2"))),
            vec!["b.php:three"]
        );
    }

    #[test]
    fn split_by_groups_cycle_writes_nothing() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        fs::write(
            dir.path().join("tests.json"),
            indoc! {r#"
                [
                  { "id": "a.php:one", "depends": ["two"] },
                  { "id": "a.php:two", "depends": ["one"] },
                  { "id": "b.php:three" }
                ]
            "#},
        )
        .expect("wrote manifest");
        fs::create_dir(dir.path().join("out")).expect("created out dir");

        let err = run(&dir, "paracept split-by-groups 2 --from tests.json --to out/g")
            .expect_err("cycle is an error");
        assert!(
            matches!(err, ExpectedError::DependencyResolveError { .. }),
            "{err:?}"
        );
        assert_eq!(
            err.process_exit_code(),
            ParaceptExitCode::DEPENDENCY_RESOLUTION_FAILED
        );
        for index in 1..=2 {
            let path = dir.path().join(format!("out/g{index}"));
            assert!(!path.exists(), "{path} not written");
        }
        assert_eq!(
            fs::read_dir(dir.path().join("out")).expect("out dir readable").count(),
            0,
            "no group files written"
        );
    }

    #[test]
    fn contradictory_group_filter() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        fs::write(dir.path().join("tests.txt"), "a.php:one\n").expect("wrote manifest");

        let err = run(
            &dir,
            "paracept split-by-groups 2 --from tests.txt --include-group x --exclude-group x",
        )
        .expect_err("contradictory filter");
        assert_eq!(err.process_exit_code(), ParaceptExitCode::SETUP_ERROR);
    }

    #[test_case("paracept split-by-time 2 --from tests.txt" ; "split by time")]
    #[test_case("paracept split-failed 2" ; "split failed")]
    fn missing_report(args: &str) {
        let dir = Utf8TempDir::new().expect("created temp dir");
        fs::write(dir.path().join("tests.txt"), "a.php:one\n").expect("wrote manifest");

        let err = run(&dir, args).expect_err("report is missing");
        assert_eq!(err.process_exit_code(), ParaceptExitCode::INPUT_READ_ERROR);
    }

    #[test]
    fn split_failed_empty_path() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let args = vec![
            "paracept".to_owned(),
            "split-failed".to_owned(),
            "2".to_owned(),
            "--report=".to_owned(),
            "--project-root".to_owned(),
            dir.path().to_string(),
        ];
        let err = ParaceptApp::try_parse_from(&args)
            .expect("arguments are valid")
            .exec()
            .expect_err("empty report path");
        assert_eq!(err.process_exit_code(), ParaceptExitCode::SETUP_ERROR);
    }

    #[test]
    fn split_files_round_robin() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        for file in [
            "tests/acceptance/LoginCest.php",
            "tests/acceptance/SignupCest.php",
            "tests/unit/CartTest.php",
            "tests/vendor/LibTest.php",
            "tests/unit/helper.php",
        ] {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().expect("has parent")).expect("created dirs");
            fs::write(&path, "<?php\n").expect("wrote test file");
        }

        run(&dir, "paracept split-files 2 --to groups/g").expect("split succeeds");
        assert_eq!(
            read_lines(&dir.path().join("groups/g1")),
            vec!["tests/acceptance/LoginCest.php", "tests/unit/CartTest.php"]
        );
        assert_eq!(
            read_lines(&dir.path().join("groups/g2")),
            vec!["tests/acceptance/SignupCest.php"]
        );
    }

    #[test]
    fn record_then_split_by_time() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        fs::write(
            dir.path().join("report.xml"),
            indoc! {r#"
                <?xml version="1.0" encoding="UTF-8"?>
                <testsuites>
                  <testsuite name="unit">
                    <testcase name="one" class="A" time="4.0"/>
                    <testcase name="two" class="A" time="3.0"><failure>boom</failure></testcase>
                    <testcase name="three" class="B" time="2.0"/>
                    <testcase name="four" class="B" time="2.0"/>
                  </testsuite>
                </testsuites>
            "#},
        )
        .expect("wrote report");

        run(&dir, "paracept record --from report.xml").expect("record succeeds");
        assert_eq!(
            read_lines(&dir.path().join("tests/_output/failedTests.txt")),
            vec!["A:two"]
        );

        fs::write(dir.path().join("tests.txt"), "A:one\nA:two\nB:three\nB:four\n")
            .expect("wrote manifest");
        run(&dir, "paracept split-by-time 2 --from tests.txt").expect("split succeeds");
        let prefix = dir.path().join("tests/_data/paracept_");
        assert_eq!(
            read_lines(&Utf8PathBuf::from(format!("{prefix}1"))),
            vec!["A:one", "B:four"]
        );
        assert_eq!(
            read_lines(&Utf8PathBuf::from(format!("{prefix}2"))),
            vec!["A:two", "B:three"]
        );
    }

    #[test]
    fn merge_failed_invalid_pattern() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let err = run(
            &dir,
            "paracept merge-failed --from-dir . --pattern failed( --into out.txt",
        )
        .expect_err("pattern is invalid");
        assert_eq!(err.process_exit_code(), ParaceptExitCode::SETUP_ERROR);
    }

    #[test]
    fn merge_html_no_sources() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let err = run(
            &dir,
            "paracept merge-html --from a.html b.html --into merged.html",
        )
        .expect_err("no sources exist");
        assert_eq!(err.process_exit_code(), ParaceptExitCode::MERGE_FAILED);
        assert!(!dir.path().join("merged.html").exists());
    }
}
