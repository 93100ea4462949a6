// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{ParsedReport, required_attribute, test_case_from_element};
use crate::{errors::ReportParseError, xml_tree::XmlElement};
use camino::Utf8Path;
use tracing::warn;

static TESTSUITES_TAG: &str = "testsuites";
static TESTSUITE_TAG: &str = "testsuite";
static TESTCASE_TAG: &str = "testcase";

pub(super) fn parse_junit(
    path: &Utf8Path,
    root: &XmlElement,
) -> Result<ParsedReport, ReportParseError> {
    // Most JUnit emitters write a single <testsuite> root; some wrap suites in <testsuites>.
    let suites: Vec<&XmlElement> = if root.name == TESTSUITE_TAG {
        vec![root]
    } else if root.name == TESTSUITES_TAG {
        root.children_named(TESTSUITE_TAG).collect()
    } else {
        return Err(ReportParseError::UnexpectedRoot {
            path: path.to_owned(),
            found: root.name.clone(),
            expected: "`<testsuite>` or `<testsuites>`",
        });
    };

    let mut report = ParsedReport::new(path);

    for suite in suites {
        for element in suite.children_named(TESTCASE_TAG) {
            let name = required_attribute(path, element, "testcase", "name")?;
            let qualified_name = match element.attribute("classname") {
                Some(classname) => format!("{classname}.{name}"),
                None => name.to_owned(),
            };

            let source_path = element.attribute("file").unwrap_or_else(|| {
                warn!(
                    "in report file `{path}`, test case `{qualified_name}` has no `file` \
                     attribute, grouping it under an empty path"
                );
                ""
            });

            let test_case = test_case_from_element(path, qualified_name, element)?;
            report.add_test_case(source_path, test_case);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use crate::{
        errors::ReportParseError,
        parse::{ParsedReport, ReportParser},
    };
    use camino::Utf8Path;
    use generic_test_report::{TestCase, TestMessage, TestOutcome};
    use indexmap::indexmap;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn parse(contents: &str) -> Result<ParsedReport, ReportParseError> {
        ReportParser::Junit.parse_str(Utf8Path::new("TEST-report.xml"), contents)
    }

    fn test_case(name: &str, millis: u64, message: Option<TestMessage>) -> TestCase {
        let mut test_case = TestCase::new(name, Duration::from_millis(millis));
        if let Some(message) = message {
            test_case.set_message(message);
        }
        test_case
    }

    #[test]
    fn single_passing_test() {
        let report = parse(indoc! {r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <testsuite name="Foo" tests="1">
                <testcase name="t1" classname="Foo" file="foo.cpp" time="0.125"/>
            </testsuite>
        "#})
        .unwrap();

        assert_eq!(report.path, "TEST-report.xml");
        assert_eq!(
            report.groups,
            indexmap! {
                "foo.cpp".to_owned() => vec![test_case("Foo.t1", 125, None)],
            }
        );
        assert!(report.unresolved_tests.is_empty());
    }

    #[test]
    fn messages_for_each_outcome() {
        let report = parse(indoc! {r#"
            <testsuite name="Suite">
                <testcase name="fails" classname="Suite" file="a.py" time="1.5">
                    <failure message="assert 1 == 2" type="AssertionError">Traceback: line 3</failure>
                </testcase>
                <testcase name="errors" classname="Suite" file="a.py" time="0.01">
                    <error message="boom"/>
                </testcase>
                <testcase name="skipped" classname="Suite" file="b.py" time="0">
                    <skipped/>
                </testcase>
                <testcase name="output_first" classname="Suite" file="b.py" time="0">
                    <system-out>some output</system-out>
                    <failure><![CDATA[x < y]]></failure>
                    <error message="ignored">only the first outcome counts</error>
                </testcase>
            </testsuite>
        "#})
        .unwrap();

        assert_eq!(
            report.groups,
            indexmap! {
                "a.py".to_owned() => vec![
                    test_case(
                        "Suite.fails",
                        1500,
                        Some(TestMessage::new(
                            TestOutcome::Failure,
                            "assert 1 == 2",
                            "Traceback: line 3",
                        )),
                    ),
                    test_case(
                        "Suite.errors",
                        10,
                        Some(TestMessage::new(TestOutcome::Error, "boom", "")),
                    ),
                ],
                "b.py".to_owned() => vec![
                    test_case(
                        "Suite.skipped",
                        0,
                        Some(TestMessage::new(TestOutcome::Skipped, "", "")),
                    ),
                    test_case(
                        "Suite.output_first",
                        0,
                        Some(TestMessage::new(TestOutcome::Failure, "", "x < y")),
                    ),
                ],
            }
        );
    }

    #[test]
    fn testsuites_wrapper_and_missing_attributes() {
        let report = parse(indoc! {r#"
            <testsuites>
                <testsuite name="first">
                    <testcase name="no_file" classname="pkg.First" time="0.002"/>
                    <testcase name="no_classname" file="second.rs" time="0.003"/>
                </testsuite>
                <properties/>
                <testsuite name="second">
                    <testcase name="again" classname="pkg.Second" file="second.rs" time="0.004"/>
                </testsuite>
            </testsuites>
        "#})
        .unwrap();

        assert_eq!(
            report.groups,
            indexmap! {
                "".to_owned() => vec![test_case("pkg.First.no_file", 2, None)],
                "second.rs".to_owned() => vec![
                    test_case("no_classname", 3, None),
                    test_case("pkg.Second.again", 4, None),
                ],
            }
        );
        assert_eq!(report.test_case_count(), 3);
    }

    #[test]
    fn duplicates_are_kept() {
        let report = parse(indoc! {r#"
            <testsuite name="Retry">
                <testcase name="flaky" classname="Retry" file="r.cpp" time="0.1">
                    <failure message="first attempt"/>
                </testcase>
                <testcase name="flaky" classname="Retry" file="r.cpp" time="0.2"/>
            </testsuite>
        "#})
        .unwrap();

        assert_eq!(report.test_case_count(), 2);
        assert_eq!(report.groups["r.cpp"][0].name, report.groups["r.cpp"][1].name);
    }

    #[test]
    fn empty_suite() {
        let report = parse(r#"<testsuite name="empty" tests="0"/>"#).unwrap();
        assert!(report.groups.is_empty());
    }

    #[test]
    fn whole_file_is_rejected() {
        let error = parse(r#"<testrun><testcase name="a"/></testrun>"#).unwrap_err();
        assert!(
            matches!(&error, ReportParseError::UnexpectedRoot { found, .. } if found == "testrun"),
            "unexpected error: {error:?}"
        );

        let error = parse(indoc! {r#"
            <testsuite>
                <testcase name="fine" classname="A" file="a.cpp" time="0.1"/>
                <testcase classname="A" file="a.cpp" time="0.1"/>
            </testsuite>
        "#})
        .unwrap_err();
        assert!(
            matches!(
                error,
                ReportParseError::MissingAttribute {
                    element: "testcase",
                    attribute: "name",
                    ..
                }
            ),
            "unexpected error: {error:?}"
        );

        let error = parse(indoc! {r#"
            <testsuite>
                <testcase name="slow" classname="A" file="a.cpp" time="forever"/>
            </testsuite>
        "#})
        .unwrap_err();
        assert!(
            matches!(&error, ReportParseError::InvalidTime { test_name, time, .. }
                if test_name == "A.slow" && time == "forever"),
            "unexpected error: {error:?}"
        );

        let error = parse(indoc! {r#"
            <testsuite>
                <testcase name="timed" classname="A" file="a.cpp" time="0.1"/>
                <testcase name="untimed" classname="A" file="a.cpp"/>
            </testsuite>
        "#})
        .unwrap_err();
        assert!(
            matches!(
                error,
                ReportParseError::MissingAttribute {
                    element: "testcase",
                    attribute: "time",
                    ..
                }
            ),
            "unexpected error: {error:?}"
        );

        let error = parse("<testsuite><testcase name=\"a\">").unwrap_err();
        assert!(
            matches!(error, ReportParseError::Xml { .. }),
            "unexpected error: {error:?}"
        );
    }
}
