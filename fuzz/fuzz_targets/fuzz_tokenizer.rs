#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let tokens = srcidx::utils::tokenize(data, true);
    for token in &tokens {
        assert!(!token.is_empty());
        assert!(token.bytes().all(srcidx::utils::is_token_byte));
    }

    let indexed = srcidx::utils::extract_index_tokens(data, srcidx::utils::MIN_TOKEN_LENGTH);
    assert!(indexed.iter().all(|t| t.len() >= srcidx::utils::MIN_TOKEN_LENGTH));
});
