//! Reusable record fixtures.
//!
//! One representative record per kind, with every variable field present
//! so size and layout assertions exercise all of them:
//!
//! - [`sample_activity`]: the `component.caller` → `component.receiver`
//!   launch with payload action `action.one`.
//! - [`sample_broadcast`]: a boot-completed broadcast guarded by a
//!   permission.
//! - [`sample_service`]: a service bind with a non-UTF-8 action.

use aics::{ActivityRecord, BroadcastRecord, Payload, RecordCommon, ServiceRecord};

/// A payload with all six fields present.
pub fn sample_payload() -> Payload {
    Payload::new()
        .with_flags(0x1000_0000)
        .with_action("action.one")
        .with_data("content://contacts/people/1")
        .with_category("android.intent.category.LAUNCHER")
        .with_mime_type("vnd.android.cursor.item/person")
        .with_clip_data(vec![0x01, 0x02, 0x03, 0x04])
        .with_extras(vec![0xBE, 0xEF])
}

/// A common prefix with distinct values in every field.
pub fn sample_common(timestamp: u32) -> RecordCommon {
    RecordCommon::new()
        .with_timestamp(timestamp)
        .with_offset_millis(500)
        .expect("500 ms is in range")
        .with_caller(10_057, 2_311)
        .with_receiver(10_082, 2_790)
        .with_user_id(0)
}

pub fn sample_activity() -> ActivityRecord {
    ActivityRecord::new()
        .with_common(sample_common(1_460_000_000))
        .with_request_code(-1)
        .with_start_flags(0x1000_0000)
        .with_caller_component("component.caller")
        .with_receiver_component("component.receiver")
        .with_options(vec![0x0A, 0x0B, 0x0C])
        .with_payload(sample_payload())
}

pub fn sample_broadcast() -> BroadcastRecord {
    BroadcastRecord::new()
        .with_common(sample_common(1_460_000_001))
        .with_request_code(0)
        .with_flags(0x0800_0000)
        .with_caller_component("android")
        .with_receiver_component("com.example/.BootReceiver")
        .with_required_permission("android.permission.RECEIVE_BOOT_COMPLETED")
        .with_payload(Payload::new().with_action("android.intent.action.BOOT_COMPLETED"))
}

pub fn sample_service() -> ServiceRecord {
    ServiceRecord::new()
        .with_common(sample_common(1_460_000_002))
        .with_flags(1)
        .with_caller_component("com.example/.MainActivity")
        .with_receiver_component("com.example/.SyncService")
        .with_action(vec![b'b', b'i', b'n', b'd', 0xFF])
        .with_payload(Payload::new().with_extras(vec![0u8; 16]))
}
