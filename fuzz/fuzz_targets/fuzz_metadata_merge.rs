#![no_main]
use libfuzzer_sys::fuzz_target;
use note_render::{Post, ProfileStore};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let store = ProfileStore::new();
        let events: Vec<Post> = (0..3u64)
            .map(|created_at| Post {
                id: format!("{created_at}"),
                pubkey: "aa".to_string(),
                created_at,
                kind: 0,
                tags: Vec::new(),
                content: content.to_string(),
            })
            .collect();
        let report = store.merge_metadata(&events);
        assert_eq!(report.applied + report.stale + report.failures.len(), events.len());
        let _ = store.display_name_or_short("aa");
    }
});
