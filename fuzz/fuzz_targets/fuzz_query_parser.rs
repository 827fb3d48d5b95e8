#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing arbitrary input must never panic, and a parsed query must
    // execute against an index without panicking either
    let query = srcidx::parse_query(data);
    let index = srcidx::SearchIndex::new();
    index.index_file(srcidx::SourceDocument::new("A.java", data));
    let _ = index.search(&query);
});
