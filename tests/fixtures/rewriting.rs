use crate::harness::read_tests;
use html_tamer::{
    absolutize, sterilize, thin, thin_for_capture, BalanceSettings, Balancer, CaptureFlags,
    CharCount, SanitizeFlags, ThinFlags, ThinSettings,
};
use serde_derive::Deserialize;

#[derive(Deserialize)]
struct RewritingTest {
    description: String,
    input: String,
    expected: String,
    /// Flag names; a missing list means the pass's default flags.
    #[serde(default)]
    flags: Option<Vec<String>>,
    #[serde(default)]
    max_cost: u32,
    #[serde(default)]
    ellipsis: bool,
    #[serde(default)]
    base: String,
}

macro_rules! parse_flags {
    ($test:expr, $Flags:ty) => {
        match &$test.flags {
            Some(names) => names.iter().fold(<$Flags>::empty(), |flags, name| {
                flags
                    | <$Flags>::from_name(name)
                        .unwrap_or_else(|| panic!("unknown flag `{name}` in {:?}", $test.description))
            }),
            None => <$Flags>::default(),
        }
    };
}

#[test]
fn balancer() {
    for test in read_tests::<RewritingTest>("rewriting/balancer.json") {
        let settings = BalanceSettings {
            ellipsis: test.ellipsis,
            ..BalanceSettings::<CharCount>::default()
        };

        let actual = Balancer::new(settings).balance(&test.input, test.max_cost);

        assert_eql!(actual, test.expected, test);
    }
}

#[test]
fn sanitizer() {
    for test in read_tests::<RewritingTest>("rewriting/sanitizer.json") {
        let actual = sterilize(&test.input, parse_flags!(test, SanitizeFlags));

        assert_eql!(actual, test.expected, test);
    }
}

#[test]
fn thinner() {
    for test in read_tests::<RewritingTest>("rewriting/thinner.json") {
        let settings = ThinSettings::new(parse_flags!(test, ThinFlags));

        assert_eql!(thin(&test.input, &settings), test.expected, test);
    }
}

#[test]
fn capture_thinner() {
    for test in read_tests::<RewritingTest>("rewriting/capture.json") {
        let actual = thin_for_capture(&test.input, parse_flags!(test, CaptureFlags));

        assert_eql!(actual, test.expected, test);
    }
}

#[test]
fn absolutizer() {
    for test in read_tests::<RewritingTest>("rewriting/absolutize.json") {
        let actual = absolutize(&test.input, &test.base).unwrap();

        assert_eql!(actual, test.expected, test);
    }
}
