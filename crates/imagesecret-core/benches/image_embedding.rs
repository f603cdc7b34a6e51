use criterion::{criterion_group, criterion_main, Criterion};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, ImageFormat, Rgba, RgbaImage};
use imagesecret_core::{DefaultImageStegoProcessor, FileCarrier, Payload};
use std::io::Cursor;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

fn jpeg_carrier() -> FileCarrier {
    let mut rng = fastrand::Rng::with_seed(5);
    let pixels: Vec<u8> = (0..WIDTH * HEIGHT * 3).map(|_| rng.u8(..)).collect();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, 90)
        .encode(&pixels, WIDTH, HEIGHT, ColorType::Rgb8)
        .unwrap();
    FileCarrier::new(jpeg, "bench.jpg")
}

fn png_carrier() -> FileCarrier {
    let mut rng = fastrand::Rng::with_seed(5);
    let image = RgbaImage::from_fn(WIDTH, HEIGHT, |_, _| {
        Rgba([rng.u8(..), rng.u8(..), rng.u8(..), 255])
    });
    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, ImageFormat::Png).unwrap();
    FileCarrier::new(png.into_inner(), "bench.png")
}

pub fn stego_benchmark(c: &mut Criterion) {
    let processor = DefaultImageStegoProcessor::default();
    let payload = Payload::text("Hello, World! ".repeat(64));

    for carrier in [jpeg_carrier(), png_carrier()] {
        let secret = processor.embed(&carrier, &payload).unwrap();

        c.bench_function(&format!("embed text into {}", carrier.filename), |b| {
            b.iter(|| processor.embed(&carrier, &payload))
        });
        c.bench_function(&format!("extract text from {}", carrier.filename), |b| {
            b.iter(|| processor.extract(&secret))
        });
        c.bench_function(&format!("capacity of {}", carrier.filename), |b| {
            b.iter(|| processor.max_payload_size(&carrier))
        });
    }
}

criterion_group!(benches, stego_benchmark);
criterion_main!(benches);
