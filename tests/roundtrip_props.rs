use std::io::Cursor;

use braid_put::{make_put_request, read_put_request, BraidError, Patch, PutRequest};
use bytes::Bytes;
use proptest::prelude::*;

fn header_value() -> impl Strategy<Value = String> {
    "[a-z0-9]([a-z0-9 .\\[\\]-]{0,12}[a-z0-9])?"
}

fn arb_patch() -> impl Strategy<Value = Patch> {
    (
        "[a-z][a-z0-9-]{0,10}",
        header_value(),
        prop::collection::btree_map("X-[A-Z][a-z]{1,8}", header_value(), 0..4),
        prop::collection::vec(any::<u8>(), 0..256),
    )
        .prop_map(|(name, content_range, extra_headers, body)| Patch {
            name,
            content_range,
            content_length: 0,
            extra_headers,
            body: Bytes::from(body),
        })
}

fn arb_put_request() -> impl Strategy<Value = PutRequest> {
    (
        "[a-z0-9]{1,12}",
        prop::collection::vec("[a-z0-9]{1,8}", 1..4),
        prop::collection::vec(arb_patch(), 0..5),
    )
        .prop_map(|(version, parents, patches)| PutRequest {
            content_type: "application/octet-stream".to_string(),
            accept: String::new(),
            version,
            parents,
            patches,
        })
}

fn with_length(mut patch: Patch) -> Patch {
    patch.content_length = patch.body.len() as u64;
    patch
}

proptest! {
    #[test]
    fn patch_survives_marshal_and_unmarshal(patch in arb_patch()) {
        let wire = patch.marshal().unwrap();
        let decoded = Patch::unmarshal(&mut &wire[..]).unwrap();
        prop_assert_eq!(decoded, with_length(patch));
    }

    #[test]
    fn put_request_survives_make_and_read(put in arb_put_request()) {
        let request = make_put_request("http://braid.org/doc", &put).unwrap();
        let decoded = read_put_request(&mut request.map(Cursor::new)).unwrap();

        let mut expected = put;
        expected.patches = expected.patches.into_iter().map(with_length).collect();
        prop_assert_eq!(decoded, expected);
    }
}

proptest! {
    #[test]
    fn line_breaks_in_header_values_are_rejected(
        patch in arb_patch(),
        head in header_value(),
        tail in header_value(),
        line_break in prop::sample::select(vec!["\n", "\r", "\r\n"]),
    ) {
        let value = format!("{head}{line_break}{tail}");
        let result = patch.with_header("X-Injected", value).marshal();
        prop_assert!(matches!(result, Err(BraidError::InvalidPatchHeader(_))));
    }

    #[test]
    fn reserved_or_malformed_header_names_are_rejected(
        patch in arb_patch(),
        name in prop_oneof![
            prop::sample::select(vec!["content-length", "Content-Range", "PATCH-NAME", "Patch-name"])
                .prop_map(String::from),
            "X-[a-z]{1,4}[: \t][a-z]{0,4}",
        ],
        value in header_value(),
    ) {
        let result = patch.with_header(name, value).marshal();
        prop_assert!(matches!(result, Err(BraidError::InvalidPatchHeader(_))));
    }
}
