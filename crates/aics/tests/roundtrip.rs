//! Property tests over whole captures: encode/decode round trips, size
//! accounting, and prefix recovery at every truncation point.

use aics::codec::ByteReader;
use aics::{
    peek_kind, ActivityRecord, BroadcastRecord, CaptureError, CaptureFile, DecodeOptions,
    FileHeader, IntentRecord, Payload, RecordCommon, RecordKind, ServiceRecord, FILE_HEADER_LEN,
};
use aics_test_utils::{record_ends, CaptureGenerator};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────

fn arb_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        Just(Vec::new()),
        prop::collection::vec(any::<u8>(), 1..48),
    ]
}

fn arb_payload() -> impl Strategy<Value = Payload> {
    (
        any::<i32>(),
        [arb_bytes(), arb_bytes(), arb_bytes(), arb_bytes(), arb_bytes(), arb_bytes()],
    )
        .prop_map(|(flags, [action, data, category, mime, clip, extras])| {
            Payload::new()
                .with_flags(flags)
                .with_action(action)
                .with_data(data)
                .with_category(category)
                .with_mime_type(mime)
                .with_clip_data(clip)
                .with_extras(extras)
        })
}

fn arb_common() -> impl Strategy<Value = RecordCommon> {
    (any::<u32>(), 0i32..1000, any::<[i32; 5]>()).prop_map(|(ts, offset, ids)| {
        let [caller_uid, caller_pid, receiver_uid, receiver_pid, user_id] = ids;
        RecordCommon::new()
            .with_timestamp(ts)
            .with_offset_millis(offset)
            .unwrap()
            .with_caller(caller_uid, caller_pid)
            .with_receiver(receiver_uid, receiver_pid)
            .with_user_id(user_id)
    })
}

type RecordParts = (RecordCommon, [i32; 2], [Vec<u8>; 3], Payload);

fn arb_parts() -> impl Strategy<Value = RecordParts> {
    (
        arb_common(),
        any::<[i32; 2]>(),
        [arb_bytes(), arb_bytes(), arb_bytes()],
        arb_payload(),
    )
}

fn arb_record() -> impl Strategy<Value = IntentRecord> {
    prop_oneof![
        arb_parts().prop_map(|(common, [code, flags], [recv, caller, options], payload)| {
            ActivityRecord::new()
                .with_common(common)
                .with_request_code(code)
                .with_start_flags(flags)
                .with_receiver_component(recv)
                .with_caller_component(caller)
                .with_options(options)
                .with_payload(payload)
                .into()
        }),
        arb_parts().prop_map(|(common, [code, flags], [recv, caller, perm], payload)| {
            BroadcastRecord::new()
                .with_common(common)
                .with_request_code(code)
                .with_flags(flags)
                .with_receiver_component(recv)
                .with_caller_component(caller)
                .with_required_permission(perm)
                .with_payload(payload)
                .into()
        }),
        arb_parts().prop_map(|(common, [_, flags], [recv, caller, action], payload)| {
            ServiceRecord::new()
                .with_common(common)
                .with_flags(flags)
                .with_receiver_component(recv)
                .with_caller_component(caller)
                .with_action(action)
                .with_payload(payload)
                .into()
        }),
    ]
}

fn arb_capture() -> impl Strategy<Value = CaptureFile> {
    (
        any::<(u16, u8, u8)>(),
        prop::collection::vec(arb_record(), 0..8),
    )
        .prop_map(|((major, minor, patch), records)| {
            let mut file = CaptureFile::new(FileHeader::new(major, minor, patch));
            file.extend(records);
            file
        })
}

// ── Round trips ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn record_roundtrip(record in arb_record()) {
        let mut bytes = record.encode();
        prop_assert_eq!(bytes.len(), record.size());
        bytes.extend(record.payload().encode());
        prop_assert_eq!(bytes.len(), record.encoded_len());

        let mut r = ByteReader::new(&bytes);
        prop_assert_eq!(peek_kind(&r).unwrap(), record.kind());
        let decoded = IntentRecord::decode(&mut r).unwrap();
        prop_assert_eq!(r.remaining(), 0);
        prop_assert_eq!(&decoded, &record);
    }

    #[test]
    fn capture_roundtrip(file in arb_capture()) {
        let bytes = file.encode();
        prop_assert_eq!(bytes.len(), file.encoded_len());

        let report = CaptureFile::decode_detailed(&bytes, &DecodeOptions::strict()).unwrap();
        prop_assert!(report.is_complete());
        prop_assert_eq!(&report.file, &file);
        prop_assert_eq!(report.file.encode(), bytes);
    }

    #[test]
    fn sizes_add_up(file in arb_capture()) {
        let mut total = FILE_HEADER_LEN;
        for record in &file {
            let expected = match record.kind() {
                RecordKind::Activity | RecordKind::Broadcast => 52,
                RecordKind::Service => 48,
            };
            let variable: usize = [record.receiver_component(), record.caller_component()]
                .iter()
                .map(|f| f.len())
                .sum();
            prop_assert!(record.size() >= expected + variable);
            prop_assert_eq!(record.encoded_len(), record.size() + record.payload().size());
            total += record.encoded_len();
        }
        prop_assert_eq!(total, file.encoded_len());
    }

    #[test]
    fn truncation_keeps_whole_records(file in arb_capture(), frac in 0.0f64..1.0) {
        let bytes = file.encode();
        let cut = (bytes.len() as f64 * frac) as usize;
        let ends = record_ends(&file);

        match CaptureFile::decode(&bytes[..cut]) {
            Ok(decoded) => {
                prop_assert!(cut >= FILE_HEADER_LEN);
                let whole = ends.iter().filter(|&&end| end <= cut).count();
                prop_assert_eq!(decoded.records(), &file.records()[..whole]);
            }
            Err(err) => {
                prop_assert!(cut < FILE_HEADER_LEN);
                let is_truncated = matches!(err, CaptureError::TruncatedInput { .. });
                prop_assert!(is_truncated);
            }
        }
    }

    #[test]
    fn strict_accepts_only_record_boundaries(file in arb_capture(), frac in 0.0f64..1.0) {
        let bytes = file.encode();
        let cut = (bytes.len() as f64 * frac) as usize;
        let on_boundary = cut == FILE_HEADER_LEN || record_ends(&file).contains(&cut);
        let result = CaptureFile::decode_with(&bytes[..cut], &DecodeOptions::strict());
        prop_assert_eq!(result.is_ok(), on_boundary);
    }
}

// ── Generated captures ──────────────────────────────────────────

#[test]
fn generated_capture_survives_every_cut() {
    let file = CaptureGenerator::new(0x5EED).capture(12);
    let bytes = file.encode();
    let ends = record_ends(&file);

    for cut in FILE_HEADER_LEN..=bytes.len() {
        let decoded = CaptureFile::decode(&bytes[..cut]).unwrap();
        let whole = ends.iter().filter(|&&end| end <= cut).count();
        assert_eq!(decoded.len(), whole, "cut at {cut}");
        assert_eq!(decoded.records(), &file.records()[..whole]);
    }
}

#[test]
fn decode_is_idempotent_on_generated_capture() {
    let file = CaptureGenerator::new(99).capture(200);
    let bytes = file.encode();
    let once = CaptureFile::decode(&bytes).unwrap();
    let twice = CaptureFile::decode(&once.encode()).unwrap();
    assert_eq!(once, twice);
    assert_eq!(twice.encode(), bytes);
}
