use std::io::Write;

use log::debug;

use crate::{
    chunks::{
        actl::acTLChunk, fctl::fcTLChunk, fdat::fdATChunk, idat::IDATChunk, iend::IENDChunk,
        ChunkWriter,
    },
    error::{Error, Origin, Result},
    image_data::Compressor,
    pixel::PixelSource,
    png::{Encoder, PngOptions},
    utils::gcd,
};

/// What happens to a frame's region before the next frame is rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DisposeOp {
    #[default]
    None = 0,
    /// Clear to fully transparent black.
    Background = 1,
    /// Revert to the previous contents.
    Previous = 2,
}

/// How a frame is combined with the canvas.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BlendOp {
    /// Replace the region, alpha included.
    Source = 0,
    /// Alpha-composite over the region.
    #[default]
    Over = 1,
}

/// Frame duration in seconds, as a fraction.
///
/// A zero denominator is read by decoders as 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delay {
    pub numerator: u16,
    pub denominator: u16,
}
impl Default for Delay {
    fn default() -> Self {
        Self {
            numerator: 0,
            denominator: 1,
        }
    }
}
impl Delay {
    pub fn new(numerator: u16, denominator: u16) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// `millis / 1000` reduced to lowest terms, so 100ms becomes 1/10.
    pub fn from_millis(millis: u32) -> Result<Self> {
        let divisor = gcd(millis, 1000);
        let numerator = u16::try_from(millis / divisor).map_err(|_| {
            Error::animation(format!("a delay of {millis}ms cannot be stored exactly"))
        })?;
        Ok(Self {
            numerator,
            denominator: (1000 / divisor) as u16,
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameControl {
    pub delay: Delay,
    pub dispose_op: DisposeOp,
    pub blend_op: BlendOp,
}

/// Frames of an animation plus how they are played.
///
/// Every frame covers the whole canvas. Without a default image, the first
/// frame is also what viewers without APNG support show.
#[derive(Debug, Clone)]
pub struct Animation<'a, P> {
    frames: &'a [P],
    default_image: Option<&'a P>,
    controls: Vec<FrameControl>,
    num_plays: u32,
}
impl<'a, P: PixelSource> Animation<'a, P> {
    pub fn new(frames: &'a [P]) -> Self {
        Self {
            frames,
            default_image: None,
            controls: vec![FrameControl::default(); frames.len()],
            num_plays: 0,
        }
    }

    /// How many times to play the animation; 0 loops forever.
    pub fn with_num_plays(mut self, num_plays: u32) -> Self {
        self.num_plays = num_plays;
        self
    }

    /// An image shown only by viewers that cannot play the animation.
    pub fn with_default_image(mut self, image: &'a P) -> Self {
        self.default_image = Some(image);
        self
    }

    pub fn with_delay_millis(mut self, millis: u32) -> Result<Self> {
        let delay = Delay::from_millis(millis)?;
        for control in &mut self.controls {
            control.delay = delay;
        }
        Ok(self)
    }

    /// One delay per frame.
    pub fn with_delays_millis(mut self, delays: &[u32]) -> Result<Self> {
        if delays.len() != self.frames.len() {
            return Err(Error::animation(format!(
                "{} delays given for {} frames",
                delays.len(),
                self.frames.len()
            )));
        }
        for (control, &millis) in self.controls.iter_mut().zip(delays) {
            control.delay = Delay::from_millis(millis)?;
        }
        Ok(self)
    }

    pub fn frame_controls(&self) -> &[FrameControl] {
        &self.controls
    }

    pub fn frame_controls_mut(&mut self) -> &mut [FrameControl] {
        &mut self.controls
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }
}

/// Hands out the numbers shared by fcTL and fdAT chunks, from zero.
#[derive(Debug, Default)]
struct SequenceCounter(u32);
impl SequenceCounter {
    fn next(&mut self) -> u32 {
        let number = self.0;
        self.0 += 1;
        number
    }
}

impl<C: Compressor> Encoder<C> {
    /// Writes `animation` as a complete APNG file.
    pub fn write_apng<W: Write, P: PixelSource>(
        &self,
        writer: W,
        animation: &Animation<'_, P>,
    ) -> Result<()> {
        if animation.frames.is_empty() {
            return Err(Error::animation("an animation needs at least one frame"));
        }
        let num_frames = u32::try_from(animation.frames.len())
            .map_err(|_| Error::animation("too many frames"))?;

        let mut images: Vec<(Origin, &dyn PixelSource)> =
            Vec::with_capacity(animation.frames.len() + 1);
        if let Some(image) = animation.default_image {
            images.push((Origin::DefaultImage, image as &dyn PixelSource));
        }
        for (index, frame) in animation.frames.iter().enumerate() {
            images.push((Origin::Frame(index), frame as &dyn PixelSource));
        }
        let first_frame = images.len() - animation.frames.len();
        let prepared = self.prepare(images)?;
        let (width, height) = (prepared.desc.width, prepared.desc.height);

        let mut chunks = ChunkWriter::new(writer);
        self.write_header(&mut chunks, &prepared)?;
        chunks.write(&acTLChunk {
            num_frames,
            num_plays: animation.num_plays,
        })?;

        if first_frame > 0 {
            let data = self.compress(&prepared, 0)?;
            for piece in self.split(&data) {
                chunks.write(&IDATChunk { data: piece })?;
            }
        }

        let mut sequence = SequenceCounter::default();
        for (index, control) in animation.controls.iter().enumerate() {
            let data = self.compress(&prepared, first_frame + index)?;
            let sequence_number = sequence.next();
            debug!("Frame {index} starts at sequence number {sequence_number}");
            chunks.write(&fcTLChunk {
                sequence_number,
                width,
                height,
                x_offset: 0,
                y_offset: 0,
                control: *control,
            })?;
            if index == 0 && first_frame == 0 {
                for piece in self.split(&data) {
                    chunks.write(&IDATChunk { data: piece })?;
                }
            } else {
                for piece in self.split(&data) {
                    chunks.write(&fdATChunk {
                        sequence_number: sequence.next(),
                        data: piece,
                    })?;
                }
            }
        }

        chunks.write(&IENDChunk)?;
        chunks.flush()
    }
}

/// Writes `animation` as an APNG file to `writer`.
pub fn write_apng<W: Write, P: PixelSource>(
    writer: W,
    animation: &Animation<'_, P>,
    options: &PngOptions,
) -> Result<()> {
    Encoder::new(options.clone()).write_apng(writer, animation)
}

/// Encodes `animation` as an in-memory APNG file.
pub fn encode_apng<P: PixelSource>(
    animation: &Animation<'_, P>,
    options: &PngOptions,
) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    write_apng(&mut output, animation, options)?;
    Ok(output)
}
