#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbmp::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding and decoding again must produce identical pixels
    let limits = Limits::none().with_max_memory_bytes(256 * 1024 * 1024);
    let Ok(decoded) = DecodeRequest::bmp(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    let Ok(reencoded) = EncodeRequest::new().encode_image(&decoded, enough::Unstoppable) else {
        // Palettes over 256 entries cannot be written back.
        return;
    };
    let Ok(decoded2) = decode_bmp(&reencoded, enough::Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.width, decoded2.width);
    assert_eq!(decoded.height, decoded2.height);
    if decoded.mode == ColorMode::Rgba8 {
        // Plain 32 bpp output reads back without alpha.
        let rgb: Vec<u8> = decoded
            .pixels()
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect();
        assert_eq!(decoded2.pixels(), &rgb[..], "roundtrip pixel mismatch");
    } else {
        assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
    }
});
