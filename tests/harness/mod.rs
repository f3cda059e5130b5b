use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use serde_json::from_reader;
use std::fs::File;
use std::io::BufReader;

macro_rules! assert_eql {
    ($actual:expr, $expected:expr, $test:expr) => {
        assert!(
            $actual == $expected,
            "{}\n\
             input: {:?}\n\
             actual: {:#?}\n\
             expected: {:#?}",
            $test.description,
            $test.input,
            $actual,
            $expected
        );
    };
}

#[derive(Deserialize)]
struct Suite<T> {
    #[serde(default = "Vec::new")]
    tests: Vec<T>,
}

pub fn data_dir_path(path: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), path)
}

/// Reads the `tests` of every JSON suite matching `pattern` under
/// `tests/data`.
pub fn read_tests<T: DeserializeOwned>(pattern: &str) -> Vec<T> {
    let mut tests = Vec::new();

    for path in glob::glob(&data_dir_path(pattern)).unwrap() {
        let path = path.unwrap();
        let file = BufReader::new(File::open(&path).unwrap());

        let suite: Suite<T> = from_reader(file)
            .unwrap_or_else(|e| panic!("malformed suite {}: {e}", path.display()));

        tests.extend(suite.tests);
    }

    assert!(!tests.is_empty(), "no tests found for `{pattern}`");

    tests
}
