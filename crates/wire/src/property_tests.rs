// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property tests for framing under arbitrary read chunking and for the
//! precedence rules of frame classification.

use bytes::BytesMut;
use proptest::prelude::*;
use serde_json::{json, Value};
use tokio_util::codec::Decoder;

use super::*;

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<u32>().prop_map(|n| json!(n)),
        "[a-z:/ \\n\"]{0,12}".prop_map(Value::String),
        prop::collection::vec("[a-z]{0,6}".prop_map(Value::String), 0..3).prop_map(Value::Array),
    ]
}

fn arb_frame() -> impl Strategy<Value = Frame> {
    let key = prop_oneof![
        Just("clock".to_string()),
        Just("version".to_string()),
        Just("root".to_string()),
        Just("files".to_string()),
        Just("subscription".to_string()),
        Just("unilateral".to_string()),
        Just("log".to_string()),
        Just("error".to_string()),
        "[a-z_]{1,8}",
    ];
    prop::collection::vec((key, arb_value()), 0..6).prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn framing_is_independent_of_chunk_boundaries(
        frames in prop::collection::vec(arb_frame(), 0..8),
        chunk in 1usize..17,
    ) {
        let mut stream = Vec::new();
        for frame in &frames {
            stream.extend(serde_json::to_vec(frame).unwrap());
            stream.push(b'\n');
        }

        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        let mut decoded = Vec::new();
        for piece in stream.chunks(chunk) {
            buf.extend_from_slice(piece);
            while let Some(line) = codec.decode(&mut buf).unwrap() {
                decoded.push(parse_frame(&line).unwrap());
            }
        }
        prop_assert!(codec.decode_eof(&mut buf).unwrap().is_none());
        prop_assert_eq!(decoded, frames);
    }

    #[test]
    fn error_key_always_classifies_as_error(mut frame in arb_frame(), message in "[a-z ]{0,20}") {
        frame.insert("error".to_string(), Value::String(message.clone()));
        match classify(frame) {
            Inbound::Error(failure) => prop_assert_eq!(failure.message, message),
            other => prop_assert!(false, "expected error, got {:?}", other),
        }
    }

    #[test]
    fn frames_without_markers_are_replies(mut frame in arb_frame()) {
        for marker in ["error", "unilateral", "subscription", "log"] {
            frame.shift_remove(marker);
        }
        prop_assert_eq!(classify(frame).kind(), "reply");
    }
}
