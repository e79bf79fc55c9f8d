#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use xmlmodem::{ReaderOptions, Token, XmlReader};

/// One call a consumer may make on the reader.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum Request {
    Peek,
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    HasNext,
    FieldName,
    NextString,
    Bool,
    Number,
    PeekValue,
    Skip,
}

#[derive(Arbitrary, Debug)]
struct Input {
    skip_root: bool,
    namespaces: bool,
    same_name_list: bool,
    primitive_arrays: bool,
    root_array_primitive: bool,
    pooled: bool,
    xml: String,
    requests: Vec<Request>,
}

fuzz_target!(|input: Input| {
    let options = ReaderOptions {
        skip_root: input.skip_root,
        namespaces: input.namespaces,
        same_name_list: input.same_name_list,
        primitive_arrays: input.primitive_arrays,
        root_array_primitive: input.root_array_primitive,
        value_pool_capacity: if input.pooled { 4 } else { 0 },
    };
    let Ok(mut reader) = XmlReader::from_str(&input.xml, options) else {
        // only inconsistent options are rejected up front
        assert!(input.root_array_primitive && !input.skip_root);
        return;
    };

    for request in input.requests {
        let result = match request {
            Request::Peek => reader.peek().map(drop),
            Request::BeginObject => reader.begin_object(),
            Request::EndObject => reader.end_object(),
            Request::BeginArray => reader.begin_array(),
            Request::EndArray => reader.end_array(),
            Request::HasNext => reader.has_next().map(drop),
            Request::FieldName => reader.next_field_name().map(drop),
            Request::NextString => reader.next_string().map(drop),
            Request::Bool => reader.next_bool().map(drop),
            Request::Number => reader.next_number::<f64>().map(drop),
            Request::PeekValue => reader.peek_value().map(drop),
            Request::Skip => reader.skip_value(),
        };
        if result.is_err() {
            // diagnostics must hold up in any state
            let _ = (reader.dump(), reader.scopes());
            return;
        }
    }

    // once reached, the end of the stream stays put
    if matches!(reader.peek(), Ok(Token::EndOfStream)) {
        assert!(matches!(reader.peek(), Ok(Token::EndOfStream)));
    }
});
