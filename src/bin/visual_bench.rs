use anyhow::Context;
use pngwrite::{
    encode_apng, encode_png, Animation, Color, DisposeOp, ImageView, PngOptions, TextEntry,
    Timestamp,
};
use std::{fs, path::Path};

const SIZE: usize = 64;

fn main() -> anyhow::Result<()> {
    let args: Vec<_> = std::env::args().skip(1).collect();
    let verbosity = if args.first().map(String::as_str) == Some("-v") {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Error
    };
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity)
        .parse_default_env()
        .init();
    let output_dir = Path::new(
        args.iter()
            .find(|arg| *arg != "-v")
            .map(String::as_str)
            .unwrap_or("benchmark"),
    );
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let mut written = vec![];
    let mut save = |name: &str, bytes: Vec<u8>| -> anyhow::Result<()> {
        let path = output_dir.join(format!("{name}.png"));
        fs::write(&path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(serde_json::json!({ "name": name, "bytes": bytes.len() }));
        Ok(())
    };

    for bit_depth in [1u8, 2, 4, 8] {
        let max = (1u16 << bit_depth) - 1;
        let data: Vec<u8> = gradient(1, |row, col, _| ((row + col) as u16 * max / (2 * SIZE as u16 - 2)) as u8);
        let image = ImageView::grayscale(&data, SIZE, SIZE)?;
        let options = PngOptions {
            bit_depth: Some(bit_depth),
            ..Default::default()
        };
        save(&format!("gray-{bit_depth}"), encode_png(&image, &options)?)?;
    }
    for channels in 1..=4 {
        let wide: Vec<u16> = gradient(channels, wide_sample);
        let image = ImageView::new(&wide, SIZE, SIZE, channels)?;
        save(&format!("{channels}ch-16"), encode_png(&image, &PngOptions::default())?)?;

        let narrow: Vec<u8> = gradient(channels, narrow_sample);
        let image = ImageView::new(&narrow, SIZE, SIZE, channels)?;
        save(&format!("{channels}ch-8"), encode_png(&image, &PngOptions::default())?)?;
    }

    let stripes: Vec<u8> = gradient(3, |_, col, channel| [255, 128, 0][(col / 8 + channel) % 3]);
    let image = ImageView::new(&stripes, SIZE, SIZE, 3)?;
    let options = PngOptions {
        use_palette: true,
        transparent: Some(Color::Rgb(0, 255, 128)),
        background: Some(Color::Rgb(255, 255, 255)),
        gamma: Some(1.0 / 2.2),
        timestamp: Some(Timestamp::now()?),
        text: vec![TextEntry::new("Software", "pngwrite visual-bench")?],
        ..Default::default()
    };
    save("palette-stripes", encode_png(&image, &options)?)?;

    let frames: Vec<Vec<u8>> = (0..8).map(bouncing_square).collect();
    let views = frames
        .iter()
        .map(|frame| ImageView::new(frame, SIZE, SIZE, 4))
        .collect::<Result<Vec<_>, _>>()?;
    let mut animation = Animation::new(&views).with_delay_millis(120)?;
    for control in animation.frame_controls_mut() {
        control.dispose_op = DisposeOp::Background;
    }
    save("bouncing-square", encode_apng(&animation, &PngOptions::default())?)?;

    let now = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Iso8601::DEFAULT)?;
    let results = serde_json::json!({
        "date": now,
        "written_images": written,
    });
    fs::write(output_dir.join("test_results.json"), results.to_string())?;
    Ok(())
}

fn gradient<T>(channels: usize, f: impl Fn(usize, usize, usize) -> T) -> Vec<T> {
    let mut data = Vec::with_capacity(SIZE * SIZE * channels);
    for row in 0..SIZE {
        for col in 0..SIZE {
            for channel in 0..channels {
                data.push(f(row, col, channel));
            }
        }
    }
    data
}

/// 16-bit ramp over the whole image, shifted a quarter turn per channel.
fn wide_sample(row: usize, col: usize, channel: usize) -> u16 {
    let step = (row * SIZE + col + channel * SIZE * SIZE / 4) % (SIZE * SIZE);
    (step * usize::from(u16::MAX) / (SIZE * SIZE - 1)) as u16
}

/// Vertical ramps per color channel; alpha ramps left to right.
fn narrow_sample(row: usize, col: usize, channel: usize) -> u8 {
    let step = if channel == 3 {
        col
    } else {
        (row + channel * SIZE / 3) % SIZE
    };
    (step * usize::from(u8::MAX) / (SIZE - 1)) as u8
}

fn bouncing_square(step: usize) -> Vec<u8> {
    let top = [0, 8, 20, 36, 44, 36, 20, 8][step];
    gradient(4, |row, col, channel| {
        let inside = (top..top + 16).contains(&row) && (24..40).contains(&col);
        match (inside, channel) {
            (true, 3) => 255,
            (true, _) => [220, 60, 40][channel],
            (false, _) => 0,
        }
    })
}
