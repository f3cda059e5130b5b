use crate::harness::read_tests;
use html_tamer::parser::{token_kinds, Tokenizer};
use html_tamer::token::Serialize;
use serde_derive::Deserialize;

#[derive(Deserialize)]
struct TokenizerTest {
    description: String,
    input: String,
    kinds: Vec<String>,
}

#[test]
fn token_kinds_match_fixtures() {
    for test in read_tests::<TokenizerTest>("tokenizer.json") {
        assert_eql!(token_kinds(&test.input), test.kinds, test);
    }
}

#[test]
fn fixtures_serialize_back_to_their_input() {
    for test in read_tests::<TokenizerTest>("tokenizer.json") {
        let serialized: String = Tokenizer::new(&test.input).map(|t| t.to_html()).collect();

        assert_eql!(serialized, test.input, test);
    }
}
