// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod dom;

use self::dom::{HtmlDocument, HtmlElement, HtmlNode};
use super::{TimePolicy, write_destination};
use crate::{errors::MergeError, helpers::plural};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::{fmt, fs, sync::LazyLock};
use tracing::{debug, info, warn};

static SECONDS_TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+\.\d+)s\)\s*$").expect("valid regex"));
static CLOCK_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((?:(\d+):)?(\d+):(\d+(?:\.\d+)?)\)\s*$").expect("valid regex")
});

const HEADLINE: &str = "Codeception Results";
const SUMMARY_ID: &str = "stepContainerSummary";
const TOOLBAR_ID: &str = "toolbar-filter";

/// Merges Codeception HTML reports.
///
/// The first source that exists is the base: the merged page keeps its layout, and scenario rows
/// from the other sources are spliced into its table. The summary block, toolbar and headline are
/// then recomputed from the merged rows.
#[derive(Clone, Debug, Default)]
pub struct HtmlReportMerger {
    sources: Vec<Utf8PathBuf>,
    destination: Option<Utf8PathBuf>,
    time_policy: TimePolicy,
}

impl HtmlReportMerger {
    /// Creates a new merger with no sources or destination, summing execution times.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source report.
    pub fn add_source(&mut self, path: impl Into<Utf8PathBuf>) -> &mut Self {
        self.sources.push(path.into());
        self
    }

    /// Adds several source reports.
    pub fn add_sources(
        &mut self,
        paths: impl IntoIterator<Item = impl Into<Utf8PathBuf>>,
    ) -> &mut Self {
        self.sources.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Sets the path the merged report is written to.
    pub fn set_destination(&mut self, path: impl Into<Utf8PathBuf>) -> &mut Self {
        self.destination = Some(path.into());
        self
    }

    /// Sets how the execution times of the sources are combined.
    pub fn set_time_policy(&mut self, time_policy: TimePolicy) -> &mut Self {
        self.time_policy = time_policy;
        self
    }

    /// Merges the sources and writes the result to the destination.
    pub fn run(&self) -> Result<ScenarioCounts, MergeError> {
        let destination = self
            .destination
            .as_deref()
            .ok_or(MergeError::MissingDestination)?;

        info!("Removing HTML reports that don't exist");
        let sources: Vec<&Utf8Path> = self
            .sources
            .iter()
            .filter(|source| {
                let exists = source.exists();
                if !exists {
                    warn!("HTML report {source} did not exist and was removed from merge list");
                }
                exists
            })
            .map(|source| source.as_path())
            .collect();
        let Some((base_path, rest)) = sources.split_first() else {
            return Err(MergeError::NoSources {
                count: self.sources.len(),
            });
        };

        info!(
            "Merging {} HTML {} into {destination}",
            sources.len(),
            plural::reports_str(sources.len())
        );

        let base = read_page(base_path)?;
        if base.layout_table().is_none() {
            return Err(MergeError::ParseSource {
                path: base_path.to_path_buf(),
                message: "page has no scenario table".to_owned(),
            });
        }

        let mut times = ExecutionTimes::new(self.time_policy);
        times.add(parse_execution_time(&base));

        let mut merged = base;
        for path in rest {
            let source = match read_page(path) {
                Ok(source) => source,
                Err(error) => {
                    warn!("skipping HTML report: {error}");
                    continue;
                }
            };
            times.add(parse_execution_time(&source));
            merged = splice_rows(merged, &source, path);
        }

        let counts = count_summary(&merged);
        let merged = move_summary_table(merged);
        let merged = update_summary_table(merged, &counts);
        let merged = update_toolbar_table(merged, &counts);
        let merged = update_buttons(merged);
        let merged = update_header_line(merged, &counts, times.total());

        write_destination(destination, merged.to_html().as_bytes())?;
        info!("Merged HTML report written to {destination}: {counts}");
        Ok(counts)
    }
}

fn read_page(path: &Utf8Path) -> Result<HtmlDocument, MergeError> {
    let input = fs::read_to_string(path).map_err(|error| MergeError::ReadSource {
        path: path.to_owned(),
        error,
    })?;
    HtmlDocument::parse(&input).map_err(|error| MergeError::ParseSource {
        path: path.to_owned(),
        message: format!("at byte {}: {}", error.position, error.error),
    })
}

/// Scenario counts derived from the rows of a merged page.
///
/// Each scenario is rendered as two rows, so every row counts as half a scenario.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScenarioCounts {
    /// Successful scenarios.
    pub success: f64,

    /// Failed scenarios.
    pub failed: f64,

    /// Skipped scenarios.
    pub skipped: f64,

    /// Incomplete scenarios.
    pub incomplete: f64,
}

impl fmt::Display for ScenarioCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} successful, {} failed, {} skipped, {} incomplete",
            format_count(self.success),
            format_count(self.failed),
            format_count(self.skipped),
            format_count(self.incomplete),
        )
    }
}

fn format_count(count: f64) -> String {
    if count.fract() == 0.0 {
        format!("{count:.0}")
    } else {
        format!("{count}")
    }
}

/// How a page renders its execution time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TimeFormat {
    /// `(12.34s)`
    Seconds,

    /// `(MM:SS.cc)`, or `(HH:MM:SS.cc)` past an hour.
    Clock,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ExecutionTime {
    secs: f64,
    format: TimeFormat,
}

impl ExecutionTime {
    fn render(self) -> String {
        match self.format {
            TimeFormat::Seconds => {
                let mut out = format!("{:.3}", self.secs);
                while out.ends_with('0') {
                    out.pop();
                }
                if out.ends_with('.') {
                    out.push('0');
                }
                format!("{out}s")
            }
            TimeFormat::Clock => {
                let centis = (self.secs * 100.0).round() as u64;
                let (hours, rest) = (centis / 360_000, centis % 360_000);
                let (minutes, rest) = (rest / 6_000, rest % 6_000);
                let (secs, centis) = (rest / 100, rest % 100);
                if hours > 0 {
                    format!("{hours:02}:{minutes:02}:{secs:02}.{centis:02}")
                } else {
                    format!("{minutes:02}:{secs:02}.{centis:02}")
                }
            }
        }
    }
}

/// Combines the execution times of the merged pages. The first page with a time decides the
/// format.
#[derive(Debug)]
struct ExecutionTimes {
    policy: TimePolicy,
    total: Option<ExecutionTime>,
}

impl ExecutionTimes {
    fn new(policy: TimePolicy) -> Self {
        Self {
            policy,
            total: None,
        }
    }

    fn add(&mut self, time: Option<ExecutionTime>) {
        let Some(time) = time else {
            return;
        };
        self.total = Some(match self.total {
            Some(total) => ExecutionTime {
                secs: self.policy.combine(total.secs, time.secs),
                format: total.format,
            },
            None => time,
        });
    }

    fn total(&self) -> Option<ExecutionTime> {
        self.total
    }
}

fn is_headline(element: &HtmlElement) -> bool {
    element.is("h1")
        && element
            .children
            .iter()
            .any(|child| matches!(child, HtmlNode::Text(text) if text.trim() == HEADLINE))
}

fn parse_execution_time(document: &HtmlDocument) -> Option<ExecutionTime> {
    let headline = document.find(is_headline)?.text_content();
    if let Some(captures) = SECONDS_TIME_REGEX.captures(&headline) {
        let secs = captures[1].parse().ok()?;
        return Some(ExecutionTime {
            secs,
            format: TimeFormat::Seconds,
        });
    }
    if let Some(captures) = CLOCK_TIME_REGEX.captures(&headline) {
        let hours: f64 = captures.get(1).map_or(Ok(0.0), |h| h.as_str().parse()).ok()?;
        let minutes: f64 = captures[2].parse().ok()?;
        let secs: f64 = captures[3].parse().ok()?;
        return Some(ExecutionTime {
            secs: hours * 3600.0 + minutes * 60.0 + secs,
            format: TimeFormat::Clock,
        });
    }
    debug!("no execution time found in headline {headline:?}");
    None
}

fn is_separator(row: &HtmlElement) -> bool {
    row.is("tr") && row.attr("class").is_none_or(str::is_empty)
}

/// Splices the classed rows of `source` into the table of `base`.
///
/// Classless rows separate environments. Rows are inserted before the base separator at the
/// cursor, which advances with every separator in the source. Rows past the base's last
/// separator are dropped.
fn splice_rows(
    mut base: HtmlDocument,
    source: &HtmlDocument,
    source_path: &Utf8Path,
) -> HtmlDocument {
    let Some(source_table) = source.layout_table() else {
        warn!("HTML report {source_path} has no scenario table, skipping");
        return base;
    };
    let rows: Vec<HtmlElement> = source_table
        .child_elements()
        .filter(|row| row.is("tr"))
        .cloned()
        .collect();

    let Some(table) = base.layout_table_mut() else {
        return base;
    };
    let separator_count = table
        .child_elements()
        .filter(|row| is_separator(row))
        .count();

    let mut cursor = 0;
    let mut spliced = 0;
    for row in rows {
        if is_separator(&row) {
            cursor += 1;
            if cursor >= separator_count {
                break;
            }
            continue;
        }
        let at = nth_separator_position(&table.children, cursor).unwrap_or(table.children.len());
        table.children.insert(at, HtmlNode::Element(row));
        spliced += 1;
    }

    debug!("spliced {spliced} rows from {source_path}");
    base
}

fn nth_separator_position(children: &[HtmlNode], n: usize) -> Option<usize> {
    children
        .iter()
        .enumerate()
        .filter(|(_, child)| child.as_element().is_some_and(is_separator))
        .nth(n)
        .map(|(i, _)| i)
}

fn count_summary(document: &HtmlDocument) -> ScenarioCounts {
    let mut tables = Vec::new();
    for element in document.elements() {
        element.find_all(|e| e.is("table"), &mut tables);
    }

    let mut counts = ScenarioCounts::default();
    let rows = tables
        .into_iter()
        .flat_map(|table| table.child_elements())
        .filter(|row| row.is("tr") && row.has_class("scenarioRow"));
    for row in rows {
        if row.has_class("scenarioSuccess") {
            counts.success += 0.5;
        } else if row.has_class("scenarioFailed") {
            counts.failed += 0.5;
        } else if row.has_class("scenarioSkipped") {
            counts.skipped += 0.5;
        } else if row.has_class("scenarioIncomplete") {
            counts.incomplete += 0.5;
        }
    }
    counts
}

fn is_summary(element: &HtmlElement) -> bool {
    element.is("div") && element.attr("id") == Some(SUMMARY_ID)
}

/// Moves the row holding the summary block to the end of the scenario table.
fn move_summary_table(mut document: HtmlDocument) -> HtmlDocument {
    let Some(table) = document.layout_table_mut() else {
        return document;
    };
    let position = table.children.iter().position(|child| {
        child
            .as_element()
            .is_some_and(|row| row.is("tr") && row.find(is_summary).is_some())
    });
    match position {
        Some(position) => {
            let row = table.children.remove(position);
            table.children.push(row);
        }
        None => warn!("merged HTML report has no summary row"),
    }
    document
}

fn update_summary_table(mut document: HtmlDocument, counts: &ScenarioCounts) -> HtmlDocument {
    let Some(summary) = document.find_mut(is_summary) else {
        warn!("merged HTML report has no summary block");
        return document;
    };
    for (class, count) in [
        ("scenarioSuccessValue", counts.success),
        ("scenarioFailedValue", counts.failed),
        ("scenarioSkippedValue", counts.skipped),
        ("scenarioIncompleteValue", counts.incomplete),
    ] {
        match summary.find_mut(|e| e.is("td") && e.attr("class") == Some(class)) {
            Some(cell) => cell.set_text(&format_count(count)),
            None => debug!("summary block has no {class} cell"),
        }
    }
    document
}

fn update_toolbar_table(mut document: HtmlDocument, counts: &ScenarioCounts) -> HtmlDocument {
    let Some(toolbar) = document.find_mut(|e| e.is("ul") && e.attr("id") == Some(TOOLBAR_ID))
    else {
        warn!("merged HTML report has no toolbar");
        return document;
    };
    for (title, symbol, count) in [
        ("Successful", "✔", counts.success),
        ("Failed", "✗", counts.failed),
        ("Skipped", "S", counts.skipped),
        ("Incomplete", "I", counts.incomplete),
    ] {
        match toolbar.find_mut(|e| e.is("a") && e.attr("title") == Some(title)) {
            Some(link) => link.set_text(&format!("{symbol} {}", format_count(count))),
            None => debug!("toolbar has no {title} filter"),
        }
    }
    document
}

/// Renumbers the toggle and step table of every pair of scenario rows, counting from 1.
fn update_buttons(mut document: HtmlDocument) -> HtmlDocument {
    let Some(table) = document.layout_table_mut() else {
        return document;
    };
    let mut rows: Vec<&mut HtmlElement> = table
        .child_elements_mut()
        .filter(|row| row.is("tr") && row.has_class("scenarioRow"))
        .collect();

    for (i, pair) in rows.chunks_mut(2).enumerate() {
        let n = i + 1;
        if let Some(toggle) = first_grandchild(pair[0]) {
            toggle.set_attr("onclick", format!("showHide('{n}', this)"));
        }
        if let Some(steps) = pair.get_mut(1).and_then(|row| first_grandchild(row)) {
            steps.set_attr("id", format!("stepContainer{n}"));
        }
    }
    document
}

fn first_grandchild(row: &mut HtmlElement) -> Option<&mut HtmlElement> {
    row.child_elements_mut().next()?.child_elements_mut().next()
}

/// Writes the combined execution time into the headline, and marks it as failed if any scenario
/// failed.
fn update_header_line(
    mut document: HtmlDocument,
    counts: &ScenarioCounts,
    time: Option<ExecutionTime>,
) -> HtmlDocument {
    let Some(headline) = document.find_mut(is_headline) else {
        warn!("merged HTML report has no headline");
        return document;
    };
    let Some(container) = headline.child_elements_mut().next() else {
        warn!("merged HTML report headline has no status");
        return document;
    };
    let Some(status_position) = container
        .children
        .iter()
        .position(|child| child.as_element().is_some())
    else {
        warn!("merged HTML report headline has no status");
        return document;
    };

    if counts.failed > 0.0
        && let Some(HtmlNode::Element(status)) = container.children.get_mut(status_position)
    {
        status.set_text("FAILED");
        status.set_attr("style", "color: red");
    }

    if let Some(time) = time {
        let text = HtmlNode::Text(format!(" ({})", time.render()));
        let time_position = status_position + 1;
        if matches!(container.children.get(time_position), Some(HtmlNode::Text(_))) {
            container.children[time_position] = text;
        } else {
            container.children.insert(time_position, text);
        }
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn scenario(status: &str, name: &str) -> String {
        format!(
            "<tr class=\"scenarioRow scenario{status}\">\n\
             <td><p class=\"scenario{status}\" onclick=\"showHide('9', this)\">{name}</p></td>\n\
             </tr>\n\
             <tr class=\"scenarioRow scenario{status}\">\n\
             <td><table class=\"scenarioStepsTable\" id=\"stepContainer9\"><tr><td>step</td></tr></table></td>\n\
             </tr>\n"
        )
    }

    fn page(time: &str, unit: &[(&str, &str)], acceptance: &[(&str, &str)]) -> String {
        let rows = |scenarios: &[(&str, &str)]| {
            scenarios
                .iter()
                .map(|(status, name)| scenario(status, name))
                .collect::<String>()
        };
        format!(
            r##"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Test results</title></head>
<body>
<h1>Codeception Results <small><span style="color: green">OK</span> ({time})</small></h1>
<ul id="toolbar-filter">
<li><a href="#" title="Successful">✔ 0</a></li>
<li><a href="#" title="Failed">✗ 0</a></li>
<li><a href="#" title="Skipped">S 0</a></li>
<li><a href="#" title="Incomplete">I 0</a></li>
</ul>
<div class="layout">
<table border="0" style="width: 100%;">
<tr><td><h2>Unit Tests</h2></td></tr>
{}<tr><td><h2>Acceptance Tests</h2></td></tr>
{}<tr><td><div id="stepContainerSummary"><table>
<tr><td class="scenarioSuccess">Successful scenarios:</td><td class="scenarioSuccessValue">0</td></tr>
<tr><td class="scenarioFailed">Failed scenarios:</td><td class="scenarioFailedValue">0</td></tr>
<tr><td class="scenarioSkipped">Skipped scenarios:</td><td class="scenarioSkippedValue">0</td></tr>
<tr><td class="scenarioIncomplete">Incomplete scenarios:</td><td class="scenarioIncompleteValue">0</td></tr>
</table></div></td></tr>
</table>
</div>
</body>
</html>
"##,
            rows(unit),
            rows(acceptance),
        )
    }

    fn write(dir: &Utf8TempDir, name: &str, contents: &str) -> Utf8PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("wrote source");
        path
    }

    fn read_merged(path: &Utf8Path) -> HtmlDocument {
        HtmlDocument::parse(&fs::read_to_string(path).expect("merged report written"))
            .expect("merged report parses")
    }

    fn cell_text(document: &HtmlDocument, pred: impl Fn(&HtmlElement) -> bool + Copy) -> String {
        document.find(pred).expect("element present").text_content()
    }

    #[test]
    fn merges_reports() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let first = write(
            &dir,
            "report_1.html",
            &page("10.5s", &[("Success", "unit one")], &[("Success", "acceptance one")]),
        );
        let second = write(
            &dir,
            "report_2.html",
            &page("5.75s", &[("Failed", "unit two")], &[("Skipped", "acceptance two")]),
        );
        let destination = dir.path().join("result/report.html");

        let mut merger = HtmlReportMerger::new();
        merger
            .add_sources([dir.path().join("report_0.html"), first, second])
            .set_destination(&destination);
        let counts = merger.run().expect("merge succeeds");
        assert_eq!(
            counts,
            ScenarioCounts {
                success: 2.0,
                failed: 1.0,
                skipped: 1.0,
                incomplete: 0.0,
            }
        );

        let merged = read_merged(&destination);

        // Rows land in their environment section, after the base's own rows.
        let table = merged.layout_table().expect("layout table present");
        let names: Vec<_> = table
            .child_elements()
            .filter_map(|row| {
                if row.has_class("scenarioRow") {
                    row.find(|e| e.is("p")).map(|p| p.text_content())
                } else if row.find(is_summary).is_some() {
                    Some("summary".to_owned())
                } else {
                    row.find(|e| e.is("h2")).map(|h| h.text_content())
                }
            })
            .collect();
        assert_eq!(
            names,
            vec![
                "Unit Tests",
                "unit one",
                "unit two",
                "Acceptance Tests",
                "acceptance one",
                "acceptance two",
                "summary",
            ]
        );

        // Toggles and step tables are renumbered in order.
        let mut toggles = Vec::new();
        let mut step_tables = Vec::new();
        for element in merged.elements() {
            element.find_all(|e| e.is("p") && e.attr("onclick").is_some(), &mut toggles);
            element.find_all(|e| e.has_class("scenarioStepsTable"), &mut step_tables);
        }
        assert_eq!(
            toggles
                .iter()
                .filter_map(|e| e.attr("onclick"))
                .collect::<Vec<_>>(),
            vec![
                "showHide('1', this)",
                "showHide('2', this)",
                "showHide('3', this)",
                "showHide('4', this)",
            ]
        );
        assert_eq!(
            step_tables
                .iter()
                .filter_map(|e| e.attr("id"))
                .collect::<Vec<_>>(),
            vec!["stepContainer1", "stepContainer2", "stepContainer3", "stepContainer4"]
        );

        assert_eq!(
            cell_text(&merged, |e| e.attr("class") == Some("scenarioSuccessValue")),
            "2"
        );
        assert_eq!(
            cell_text(&merged, |e| e.attr("class") == Some("scenarioFailedValue")),
            "1"
        );
        assert_eq!(
            cell_text(&merged, |e| e.attr("class") == Some("scenarioIncompleteValue")),
            "0"
        );
        assert_eq!(cell_text(&merged, |e| e.attr("title") == Some("Successful")), "✔ 2");
        assert_eq!(cell_text(&merged, |e| e.attr("title") == Some("Failed")), "✗ 1");
        assert_eq!(cell_text(&merged, |e| e.attr("title") == Some("Skipped")), "S 1");
        assert_eq!(cell_text(&merged, |e| e.attr("title") == Some("Incomplete")), "I 0");

        assert_eq!(
            cell_text(&merged, is_headline),
            "Codeception Results FAILED (16.25s)"
        );
        let status = merged.find(|e| e.is("span")).expect("status present");
        assert_eq!(status.attr("style"), Some("color: red"));
    }

    #[test_case(TimePolicy::Sum, "03:19.75"; "sum")]
    #[test_case(TimePolicy::Max, "02:09.25"; "max")]
    fn clock_times(policy: TimePolicy, expected: &str) {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let first = write(&dir, "1.html", &page("01:10.50", &[("Success", "a")], &[]));
        let second = write(&dir, "2.html", &page("02:09.25", &[("Success", "b")], &[]));
        let destination = dir.path().join("merged.html");

        let mut merger = HtmlReportMerger::new();
        merger
            .add_sources([first, second])
            .set_destination(&destination)
            .set_time_policy(policy);
        merger.run().expect("merge succeeds");

        let merged = read_merged(&destination);
        assert_eq!(
            cell_text(&merged, is_headline),
            format!("Codeception Results OK ({expected})")
        );
    }

    #[test]
    fn max_seconds() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let first = write(&dir, "1.html", &page("105.73s", &[("Success", "a")], &[]));
        let second = write(&dir, "2.html", &page("129.25s", &[("Success", "b")], &[]));
        let destination = dir.path().join("merged.html");

        let mut merger = HtmlReportMerger::new();
        merger
            .add_sources([first, second])
            .set_destination(&destination)
            .set_time_policy(TimePolicy::Max);
        merger.run().expect("merge succeeds");

        assert_eq!(
            cell_text(&read_merged(&destination), is_headline),
            "Codeception Results OK (129.25s)"
        );
    }

    #[test]
    fn counts_half_per_row() {
        let input = format!(
            "<table>{}{}{}</table>",
            scenario("Success", "a"),
            scenario("Failed", "b"),
            scenario("Skipped", "c"),
        );
        let document = HtmlDocument::parse(&input).expect("page parses");
        assert_eq!(
            count_summary(&document),
            ScenarioCounts {
                success: 1.0,
                failed: 1.0,
                skipped: 1.0,
                incomplete: 0.0,
            }
        );
    }

    #[test]
    fn extra_environments_are_dropped() {
        let base = HtmlDocument::parse(
            r#"<div class="layout"><table><tr><td>env 1</td></tr><tr class="scenarioRow scenarioSuccess"><td>a</td></tr></table></div>"#,
        )
        .expect("page parses");
        let source = HtmlDocument::parse(
            r#"<div class="layout"><table><tr><td>env 1</td></tr><tr class="scenarioRow scenarioFailed"><td>b</td></tr><tr><td>env 2</td></tr><tr class="scenarioRow scenarioFailed"><td>c</td></tr></table></div>"#,
        )
        .expect("page parses");

        let merged = splice_rows(base, &source, Utf8Path::new("source.html"));
        assert_eq!(
            merged.to_html(),
            r#"<div class="layout"><table><tr><td>env 1</td></tr><tr class="scenarioRow scenarioSuccess"><td>a</td></tr></table></div>"#,
            "with a single base separator, rows after the source's first separator are dropped"
        );
    }

    #[test_case(0.0, "0")]
    #[test_case(3.0, "3")]
    #[test_case(1.5, "1.5")]
    fn count_formatting(count: f64, expected: &str) {
        assert_eq!(format_count(count), expected);
    }

    #[test]
    fn no_sources() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let mut merger = HtmlReportMerger::new();
        merger
            .add_source(dir.path().join("missing.html"))
            .set_destination(dir.path().join("merged.html"));
        let err = merger.run().expect_err("no sources exist");
        assert!(matches!(err, MergeError::NoSources { count: 1 }), "{err:?}");
    }
}
