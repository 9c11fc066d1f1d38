#![no_main]
use libfuzzer_sys::fuzz_target;
use note_render::{ContentPipeline, ProfileStore, RenderConfig};

const PUBKEY: &str = "82341f882b6eabcd2ba7f1ef90aad961cf074af15b9ef44a09f9d2a8fbfbe6a2";
const EVENT_ID: &str = "a84c5de86efc2ec2cff7bad077c4171e09146b633b7ad117fffe088d9579ac33";

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let tags = vec![
            vec!["p".to_string(), PUBKEY.to_string()],
            vec!["e".to_string(), EVENT_ID.to_string()],
            vec!["a".to_string(), format!("30023:{PUBKEY}:{content}")],
            vec!["e".to_string(), content.to_string()],
        ];
        let pipeline = ContentPipeline::new(ProfileStore::new(), &RenderConfig::default());
        let once = pipeline.rewrite(content, &tags);
        let _ = pipeline.render_content(content, &tags);
        let _ = pipeline.rewrite(&once, &tags);
    }
});
