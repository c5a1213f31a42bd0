#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Either a typed error or a tree that serializes
        if let Ok(element) = jatsgen_xml::markup_element("p", s) {
            let xml = jatsgen_xml::to_string(&element).expect("reinjected tree serializes");

            // Plain text survives escaping unchanged
            if !s.contains(['<', '>', '&']) {
                assert_eq!(element.text_content(), s);
            }
            assert!(xml.starts_with("<p"));
        }
    }
});
