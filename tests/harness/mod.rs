mod recorder;

pub use self::dom::{Dom, Node};
pub use self::recorder::{record, record_with_settings, Event, EventRecorder};

use tagscan::{Parser, ParserSettings, TagVisitor, TagVisitorChain, TagWriter};

/// Parses the input passing every event through `rewriter` before it is
/// serialized.
pub fn rewrite_with_settings(
    input: &str,
    settings: ParserSettings,
    rewriter: impl TagVisitor,
) -> String {
    let mut output = String::new();

    {
        let mut chain = TagVisitorChain::new();

        chain
            .push(rewriter)
            .push(TagWriter::new(|chunk: &str| output.push_str(chunk)));

        Parser::with_settings(input, settings)
            .parse(&mut chain)
            .unwrap();
    }

    output
}

pub fn rewrite(input: &str, rewriter: impl TagVisitor) -> String {
    rewrite_with_settings(input, ParserSettings::default(), rewriter)
}

/// Parses and serializes the input unchanged.
pub fn round_trip(input: &str) -> String {
    let mut output = String::new();
    let mut writer = TagWriter::new(|chunk: &str| output.push_str(chunk));

    Parser::new(input).parse(&mut writer).unwrap();

    output
}

macro_rules! assert_selects {
    ($dom:expr, $query:expr, [$($expected:expr),* $(,)?]) => {
        assert_eq!(
            $dom.select_described($query),
            Vec::<String>::from([$(String::from($expected)),*]),
            "query: {}",
            $query
        );
    };
}
