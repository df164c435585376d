#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbmp::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits::none().with_max_memory_bytes(256 * 1024 * 1024);

    // Must never panic, whatever the input.
    let _ = ImageInfo::from_bytes(data);
    let _ = ImageInfo::from_dib_bytes(data);
    let _ = DecodeRequest::bmp(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable);
    let _ = DecodeRequest::dib(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable);

    // First byte picks an embedding offset (exercises the offset-22 path).
    if let Some((&offset, rest)) = data.split_first() {
        let _ = DecodeRequest::dib(rest)
            .with_header_offset(usize::from(offset % 32))
            .with_limits(&limits)
            .decode(enough::Unstoppable);
    }
});
