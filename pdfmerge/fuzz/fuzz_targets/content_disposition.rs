#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfmerge::client::filename_from_content_disposition;

fuzz_target!(|data: &[u8]| {
    let header = String::from_utf8_lossy(data);
    let name = filename_from_content_disposition(Some(&header));

    // Whatever the server sends, the download stays a single path component.
    assert!(!name.is_empty());
    assert!(!name.contains('/') && !name.contains('\\'));
    assert!(name != "." && name != "..");
});
