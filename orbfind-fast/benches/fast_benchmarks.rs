use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orbfind_core::{Image, OrbConfig};
use orbfind_fast::{FastDetector, ImagePyramid, OrientationEstimator};

/// Create benchmark image with realistic corner patterns
fn create_benchmark_image(width: usize, height: usize, complexity: &str) -> Image {
    let mut img = vec![128u8; width * height];

    match complexity {
        "simple" => {
            let (cx, cy) = (width / 2, height / 2);
            for y in cy - 2..=cy + 2 {
                for x in cx - 2..=cx + 2 {
                    img[y * width + x] = 255;
                }
            }
        }
        "realistic" => {
            // Gradient with noise plus checkered blobs
            for y in 0..height {
                for x in 0..width {
                    let gradient = ((x as f32 / width as f32) * 50.0) as u8;
                    let noise = ((x + y) % 7) as u8;
                    img[y * width + x] = 100 + gradient + noise;
                }
            }
            for i in 0..40 {
                let cx = 8 + (i * 37) % (width - 16);
                let cy = 8 + (i * 53) % (height - 16);
                for dy in -3i32..=3 {
                    for dx in -3i32..=3 {
                        let x = (cx as i32 + dx) as usize;
                        let y = (cy as i32 + dy) as usize;
                        img[y * width + x] = if (dx + dy) % 2 == 0 { 30 } else { 230 };
                    }
                }
            }
        }
        _ => {}
    }

    Image::from_gray(width, height, img).unwrap()
}

/// Benchmark full detection pipeline
fn bench_full_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_detection");
    let detector = FastDetector::new(OrbConfig::default()).unwrap();

    for &(width, height) in &[(128, 128), (320, 240), (640, 480)] {
        for complexity in ["simple", "realistic"] {
            let img = create_benchmark_image(width, height, complexity);
            group.bench_with_input(
                BenchmarkId::new(format!("{}x{}", width, height), complexity),
                &img,
                |b, img| b.iter(|| black_box(detector.detect_image(black_box(img)).unwrap())),
            );
        }
    }

    group.finish();
}

/// Benchmark individual pipeline stages
fn bench_pipeline_stages(c: &mut Criterion) {
    let cfg = OrbConfig::default();
    let detector = FastDetector::new(cfg.clone()).unwrap();
    let img = create_benchmark_image(320, 240, "realistic");

    let mut group = c.benchmark_group("pipeline_stages");

    group.bench_function("build_pyramid", |b| {
        b.iter(|| black_box(ImagePyramid::build(black_box(&img), &cfg).unwrap()))
    });

    let pyramid = ImagePyramid::build(&img, &cfg).unwrap();
    group.bench_function("detect_level_0", |b| {
        b.iter(|| black_box(detector.detect_candidates(black_box(&pyramid.levels()[0]))))
    });

    let keypoints = detector.detect_keypoints(&pyramid);
    let estimator = OrientationEstimator::new(cfg.patch_size);
    group.bench_function("assign_orientation", |b| {
        b.iter(|| black_box(estimator.assign(&pyramid, black_box(&keypoints)).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_full_detection, bench_pipeline_stages);
criterion_main!(benches);
