
use pngwrite::{
    encode_apng, encode_png, Animation, BlendOp, Color, DisposeOp, Error, FilterStrategy,
    ImageView, PngOptions, Timestamp,
};
use support::{chunk_types, decode_image, decode_rows, find, header, read_chunks};

fn samples<T: Copy + Into<u16>>(data: &[T], cols: usize) -> Vec<Vec<u16>> {
    data.chunks(cols)
        .map(|row| row.iter().map(|&v| v.into()).collect())
        .collect()
}

#[test]
fn gray_low_bit_depths_round_trip() {
    for bit_depth in [1u8, 2, 4] {
        let max = (1u8 << bit_depth) - 1;
        let data: Vec<u8> = (0..7 * 5).map(|i| (i * 3 % 7) as u8 & max).collect();
        let image = ImageView::grayscale(&data, 7, 5).unwrap();
        let options = PngOptions {
            bit_depth: Some(bit_depth),
            ..Default::default()
        };
        let png = encode_png(&image, &options).unwrap();
        let (header, rows) = decode_image(&png);
        assert_eq!((header.bit_depth, header.color_type), (bit_depth, 0));
        assert_eq!(rows, samples(&data, 5));
        assert!(find(&read_chunks(&png), "tRNS").is_none());
    }
}

#[test]
fn gray_transparent_color_writes_trns() {
    let data = [0u8, 1, 2, 3, 3, 2, 1, 0];
    let image = ImageView::grayscale(&data, 2, 4).unwrap();
    let options = PngOptions {
        bit_depth: Some(2),
        transparent: Some(Color::Gray(1)),
        ..Default::default()
    };
    let png = encode_png(&image, &options).unwrap();
    let chunks = read_chunks(&png);
    assert_eq!(find(&chunks, "tRNS").unwrap().data, [0, 1]);
    assert_eq!(decode_image(&png).1, samples(&data, 4));
}

#[test]
fn samples_above_bit_depth_are_rejected() {
    let data = [0u8, 1, 2, 4];
    let image = ImageView::grayscale(&data, 2, 2).unwrap();
    let options = PngOptions {
        bit_depth: Some(2),
        ..Default::default()
    };
    assert!(matches!(
        encode_png(&image, &options),
        Err(Error::SampleOutOfRange {
            row: 1,
            column: 1,
            value: 4,
            ..
        })
    ));
}

#[test]
fn one_bit_rows_are_padded_with_zeros() {
    let data = [true; 11];
    let image = ImageView::grayscale(&data, 1, 11).unwrap();
    let png = encode_png(&image, &PngOptions::default()).unwrap();
    let chunks = read_chunks(&png);
    let header = header(&chunks);
    assert_eq!((header.width, header.bit_depth), (11, 1));
    let idat = find(&chunks, "IDAT").unwrap().data;
    let raw = miniz_oxide::inflate::decompress_to_vec_zlib(idat).unwrap();
    assert_eq!(raw, [0, 0b1111_1111, 0b1110_0000]);
}

#[test]
fn alpha_images_keep_every_channel() {
    let narrow: Vec<u8> = (0..3 * 4 * 2).map(|i| (i * 11) as u8).collect();
    let image = ImageView::new(&narrow, 3, 4, 2).unwrap();
    let png = encode_png(&image, &PngOptions::default()).unwrap();
    let (header, rows) = decode_image(&png);
    assert_eq!((header.color_type, header.bit_depth), (4, 8));
    assert_eq!(rows, samples(&narrow, 8));

    let wide: Vec<u16> = (0..2 * 3 * 4).map(|i| (i * 2749) as u16).collect();
    let image = ImageView::new(&wide, 2, 3, 4).unwrap();
    let png = encode_png(&image, &PngOptions::default()).unwrap();
    let (header, rows) = decode_image(&png);
    assert_eq!((header.color_type, header.bit_depth), (6, 16));
    assert_eq!(rows, samples(&wide, 12));
}

#[test]
fn alpha_images_cannot_declare_a_transparent_color() {
    let data = [0u8; 8];
    let image = ImageView::new(&data, 1, 2, 4).unwrap();
    let options = PngOptions {
        transparent: Some(Color::Rgb(0, 0, 0)),
        ..Default::default()
    };
    assert!(matches!(
        encode_png(&image, &options),
        Err(Error::InvalidAncillaryData { chunk: "tRNS", .. })
    ));
}

#[test]
fn rgb_transparent_color() {
    let data: Vec<u8> = (0..2 * 2 * 3).map(|i| i as u8 * 20).collect();
    let image = ImageView::new(&data, 2, 2, 3).unwrap();

    let png = encode_png(&image, &PngOptions::default()).unwrap();
    assert!(find(&read_chunks(&png), "tRNS").is_none());

    let options = PngOptions {
        transparent: Some(Color::Rgb(0, 0, 0)),
        ..Default::default()
    };
    let png = encode_png(&image, &options).unwrap();
    let chunks = read_chunks(&png);
    assert_eq!(find(&chunks, "tRNS").unwrap().data, [0; 6]);
    assert_eq!(header(&chunks).color_type, 2);
}

#[test]
fn palette_entries_follow_first_appearance() {
    let data: Vec<u8> = (1..=12).collect();
    let image = ImageView::new(&data, 2, 2, 3).unwrap();
    let options = PngOptions {
        use_palette: true,
        ..Default::default()
    };
    let png = encode_png(&image, &options).unwrap();
    let chunks = read_chunks(&png);
    let header = header(&chunks);
    assert_eq!((header.color_type, header.bit_depth), (3, 8));
    assert_eq!(find(&chunks, "PLTE").unwrap().data, &data[..]);
    assert!(find(&chunks, "tRNS").is_none());
    assert_eq!(decode_image(&png).1, [[0, 1], [2, 3]]);
}

#[test]
fn palette_with_twenty_colors() {
    let data: Vec<u8> = (0..60).collect();
    let image = ImageView::new(&data, 4, 5, 3).unwrap();
    let options = PngOptions {
        use_palette: true,
        ..Default::default()
    };
    let png = encode_png(&image, &options).unwrap();
    let chunks = read_chunks(&png);
    assert_eq!(find(&chunks, "PLTE").unwrap().data, &data[..]);
    let expected: Vec<Vec<u16>> = (0..4).map(|row| (row * 5..row * 5 + 5).collect()).collect();
    assert_eq!(decode_image(&png).1, expected);
}

#[test]
fn palette_is_identical_across_runs() {
    let data: Vec<u8> = (0..16 * 16 * 4).map(|i| (i * 37 % 5 * 50) as u8).collect();
    let image = ImageView::new(&data, 16, 16, 4).unwrap();
    let options = PngOptions {
        use_palette: true,
        ..Default::default()
    };
    let first = encode_png(&image, &options).unwrap();
    for _ in 0..5 {
        assert_eq!(encode_png(&image, &options).unwrap(), first);
    }
}

#[test]
fn palette_overflow_is_reported() {
    let data: Vec<u8> = (0..=255).chain(0..=255).collect();
    let image = ImageView::new(&data, 2, 256, 1).unwrap();
    let options = PngOptions {
        use_palette: true,
        bit_depth: Some(4),
        ..Default::default()
    };
    assert!(matches!(
        encode_png(&image, &options),
        Err(Error::TooManyColors { max: 16, .. })
    ));
}

#[test]
fn max_chunk_len_splits_image_data() {
    let data: Vec<u8> = (0..100 * 100 * 3).map(|i| (i * 7919 % 256) as u8).collect();
    let image = ImageView::new(&data, 100, 100, 3).unwrap();
    let options = PngOptions {
        max_chunk_len: Some(500),
        ..Default::default()
    };
    let png = encode_png(&image, &options).unwrap();
    let chunks = read_chunks(&png);
    let idat: Vec<_> = chunks.iter().filter(|c| c.kind == "IDAT").collect();
    assert!(idat.len() > 1);
    assert!(idat.iter().all(|c| c.data.len() <= 500));
    assert!(idat[..idat.len() - 1].iter().all(|c| c.data.len() == 500));
    assert_eq!(decode_image(&png).1, samples(&data, 300));
}

#[test]
fn time_and_gamma_chunks() {
    let data = [0u8; 6];
    let image = ImageView::grayscale(&data, 2, 3).unwrap();
    let options = PngOptions {
        timestamp: Some(Timestamp::new(1452, 4, 15, 8, 9, 10).unwrap()),
        gamma: Some(2.2),
        ..Default::default()
    };
    let png = encode_png(&image, &options).unwrap();
    insta::assert_snapshot!(chunk_types(&png).join(" "), @"IHDR tIME gAMA IDAT IEND");

    let chunks = read_chunks(&png);
    assert_eq!(find(&chunks, "tIME").unwrap().data, [0x05, 0xAC, 4, 15, 8, 9, 10]);
    assert_eq!(
        find(&chunks, "gAMA").unwrap().data,
        220_000u32.to_be_bytes()
    );
}

#[test]
fn adaptive_filtering_decodes_to_the_same_pixels() {
    let data: Vec<u8> = (0..32 * 32 * 3)
        .map(|i| ((i / 3 % 32) * 8 + (i / 96) * 3) as u8)
        .collect();
    let image = ImageView::new(&data, 32, 32, 3).unwrap();
    for filter in [
        FilterStrategy::Sub,
        FilterStrategy::Up,
        FilterStrategy::Average,
        FilterStrategy::Paeth,
        FilterStrategy::Adaptive,
    ] {
        let options = PngOptions {
            filter,
            ..Default::default()
        };
        let png = encode_png(&image, &options).unwrap();
        assert_eq!(decode_image(&png).1, samples(&data, 96), "{filter:?}");
    }
}

#[test]
fn every_crc_is_valid() {
    let data: Vec<u8> = (0..9 * 9 * 3).map(|i| (i % 7 * 30) as u8).collect();
    let image = ImageView::new(&data, 9, 9, 3).unwrap();
    let options = PngOptions {
        use_palette: true,
        transparent: Some(Color::Rgb(0, 0, 0)),
        background: Some(Color::Rgb(1, 2, 3)),
        gamma: Some(0.45455),
        timestamp: Some(Timestamp::new(2020, 1, 1, 0, 0, 0).unwrap()),
        max_chunk_len: Some(16),
        ..Default::default()
    };
    let png = encode_png(&image, &options).unwrap();
    for chunk in read_chunks(&png) {
        assert!(chunk.crc_is_valid(), "{} has a bad CRC", chunk.kind);
    }

    let frames = [image, image];
    let apng = encode_apng(&Animation::new(&frames), &options).unwrap();
    for chunk in read_chunks(&apng) {
        assert!(chunk.crc_is_valid(), "{} has a bad CRC", chunk.kind);
    }
}

fn rgba_frames() -> Vec<Vec<u8>> {
    (0..4u8)
        .map(|n| (0..8 * 8 * 4).map(|i| (i as u8).wrapping_mul(n + 1)).collect())
        .collect()
}

#[test]
fn animation_layout() {
    let frames = rgba_frames();
    let views: Vec<_> = frames
        .iter()
        .map(|frame| ImageView::new(frame, 8, 8, 4).unwrap())
        .collect();
    let apng = encode_apng(&Animation::new(&views), &PngOptions::default()).unwrap();
    insta::assert_snapshot!(
        chunk_types(&apng).join(" "),
        @"IHDR acTL fcTL IDAT fcTL fdAT fcTL fdAT fcTL fdAT IEND"
    );

    let chunks = read_chunks(&apng);
    let actl = find(&chunks, "acTL").unwrap();
    assert_eq!(actl.data, [0, 0, 0, 4, 0, 0, 0, 0]);

    let fctl = find(&chunks, "fcTL").unwrap();
    assert_eq!(fctl.data.len(), 26);
    assert_eq!(
        fctl.data,
        [
            0, 0, 0, 0, // sequence
            0, 0, 0, 8, 0, 0, 0, 8, // size
            0, 0, 0, 0, 0, 0, 0, 0, // offset
            0, 0, 0, 1, // delay
            DisposeOp::None as u8,
            BlendOp::Over as u8,
        ]
    );

    let sequence: Vec<u32> = chunks
        .iter()
        .filter(|c| c.kind == "fcTL" || c.kind == "fdAT")
        .map(|c| c.sequence_number())
        .collect();
    assert_eq!(sequence, (0..7).collect::<Vec<_>>());

    let (_, first) = decode_image(&apng);
    assert_eq!(first, samples(&frames[0], 32));
}

#[test]
fn split_frames_keep_numbering_and_pixels() {
    let frames = rgba_frames();
    let views: Vec<_> = frames
        .iter()
        .map(|frame| ImageView::new(frame, 8, 8, 4).unwrap())
        .collect();
    let options = PngOptions {
        max_chunk_len: Some(16),
        compression_level: 0,
        ..Default::default()
    };
    let apng = encode_apng(&Animation::new(&views), &options).unwrap();
    let chunks = read_chunks(&apng);
    let header = header(&chunks);

    let sequence: Vec<u32> = chunks
        .iter()
        .filter(|c| c.kind == "fcTL" || c.kind == "fdAT")
        .map(|c| c.sequence_number())
        .collect();
    assert!(sequence.len() > 2 * frames.len());
    assert_eq!(sequence, (0..sequence.len() as u32).collect::<Vec<_>>());

    let mut pieces: Vec<Vec<&[u8]>> = vec![];
    for chunk in &chunks {
        match chunk.kind.as_str() {
            "fcTL" => pieces.push(vec![]),
            "IDAT" => pieces.last_mut().unwrap().push(chunk.data),
            "fdAT" => {
                assert!(chunk.data.len() <= 4 + 16);
                pieces.last_mut().unwrap().push(&chunk.data[4..]);
            }
            _ => {}
        }
    }
    assert_eq!(pieces.len(), frames.len());
    for (frame, data) in frames.iter().zip(&pieces) {
        assert!(data.len() > 1);
        let expected: Vec<Vec<u8>> = frame.chunks(8 * 4).map(|row| row.to_vec()).collect();
        assert_eq!(decode_rows(&header, data), expected);
    }
}

#[test]
fn frame_delays_are_reduced_fractions() {
    let frames = rgba_frames();
    let views: Vec<_> = frames[..3]
        .iter()
        .map(|frame| ImageView::new(frame, 8, 8, 4).unwrap())
        .collect();
    let animation = Animation::new(&views)
        .with_delays_millis(&[100, 200, 300])
        .unwrap()
        .with_num_plays(3);
    let apng = encode_apng(&animation, &PngOptions::default()).unwrap();
    let chunks = read_chunks(&apng);
    assert_eq!(find(&chunks, "acTL").unwrap().data, [0, 0, 0, 3, 0, 0, 0, 3]);
    let delays: Vec<(u16, u16)> = chunks
        .iter()
        .filter(|c| c.kind == "fcTL")
        .map(|c| {
            let num = u16::from_be_bytes([c.data[20], c.data[21]]);
            let den = u16::from_be_bytes([c.data[22], c.data[23]]);
            (num, den)
        })
        .collect();
    assert_eq!(delays, [(1, 10), (1, 5), (3, 10)]);
}

#[test]
fn default_image_is_not_a_frame() {
    let frames = rgba_frames();
    let views: Vec<_> = frames
        .iter()
        .map(|frame| ImageView::new(frame, 8, 8, 4).unwrap())
        .collect();
    let still = vec![200u8; 8 * 8 * 4];
    let default_image = ImageView::new(&still, 8, 8, 4).unwrap();
    let animation = Animation::new(&views[..2]).with_default_image(&default_image);
    let apng = encode_apng(&animation, &PngOptions::default()).unwrap();
    insta::assert_snapshot!(
        chunk_types(&apng).join(" "),
        @"IHDR acTL IDAT fcTL fdAT fcTL fdAT IEND"
    );

    let chunks = read_chunks(&apng);
    assert_eq!(find(&chunks, "acTL").unwrap().data[..4], [0, 0, 0, 2]);
    let sequence: Vec<u32> = chunks
        .iter()
        .filter(|c| c.kind == "fcTL" || c.kind == "fdAT")
        .map(|c| c.sequence_number())
        .collect();
    assert_eq!(sequence, [0, 1, 2, 3]);
    assert_eq!(decode_image(&apng).1, samples(&still, 32));
}

#[test]
fn animated_palette_covers_every_frame() {
    let first = [10u8, 20, 30, 10, 20, 30];
    let second = [40u8, 50, 60, 10, 20, 30];
    let frames = [
        ImageView::new(&first, 1, 2, 3).unwrap(),
        ImageView::new(&second, 1, 2, 3).unwrap(),
    ];
    let options = PngOptions {
        use_palette: true,
        ..Default::default()
    };
    let apng = encode_apng(&Animation::new(&frames), &options).unwrap();
    let chunks = read_chunks(&apng);
    assert_eq!(
        find(&chunks, "PLTE").unwrap().data,
        [10, 20, 30, 40, 50, 60]
    );
}
