use std::path::PathBuf;

use byteplot::{BinaryTable, ByteSource, CachePolicy, ChannelCaps, Error, Visualizer};
use tempfile::{tempdir, TempDir};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Writes `data` to `name` inside `dir`.
fn fixture(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, data).unwrap();
    path
}

/// Small header, a text section and a long run of padding.
fn sample_binary() -> Vec<u8> {
    let mut data = b"\x7fELF\x02\x01\x01\0".to_vec();
    for line in 0..200 {
        data.extend(format!("line {line}: the quick brown fox\n").bytes());
    }
    data.extend(std::iter::repeat(0).take(4096));
    data
}

#[test]
fn threshold_policy_picks_backing_from_file_size() {
    init();
    let data = sample_binary();
    let dir = tempdir().unwrap();
    let path = fixture(&dir, "threshold", &data);
    let len = data.len() as u64;

    let cached = Visualizer::open(&path, ChannelCaps::default(), CachePolicy::threshold(len + 1).unwrap())
        .unwrap();
    assert!(cached.is_cached());
    let streaming =
        Visualizer::open(&path, ChannelCaps::default(), CachePolicy::threshold(len).unwrap())
            .unwrap();
    assert!(!streaming.is_cached());
}

#[test]
fn cached_and_streaming_files_plot_identically() {
    init();
    let data = sample_binary();
    let dir = tempdir().unwrap();
    let path = fixture(&dir, "equivalence", &data);

    let mut cached = Visualizer::open(&path, ChannelCaps::new(0x20, 0xff, 0x80), CachePolicy::Always)
        .unwrap();
    let mut streaming =
        Visualizer::open(&path, ChannelCaps::new(0x20, 0xff, 0x80), CachePolicy::Never).unwrap();

    for (length, offset, brightness) in [(1, 0, 1), (500, 3, 10), (u64::MAX, 0, 256), (900, u64::MAX, 40)] {
        for visualizer in [&mut cached, &mut streaming] {
            visualizer.set_window_length(length);
            visualizer.set_offset(offset);
            visualizer.set_brightness(brightness);
        }
        assert_eq!(cached.window(), streaming.window());
        let a = cached.histogram().unwrap();
        let b = streaming.histogram().unwrap();
        assert!(a.iter().eq(b.iter()));
        assert_eq!(a.total(), cached.window().window_length());
        assert_eq!(cached.current_image().unwrap(), streaming.current_image().unwrap());
    }
}

#[test]
fn padding_lights_up_the_origin() {
    init();
    let data = sample_binary();
    let dir = tempdir().unwrap();
    let path = fixture(&dir, "padding", &data);
    let mut visualizer = Visualizer::open(&path, ChannelCaps::default(), CachePolicy::default()).unwrap();

    visualizer.set_window_length(1024);
    visualizer.set_offset(u64::MAX);
    let image = visualizer.current_image().unwrap();
    assert_eq!(image.pixel(0, 0), [0, 255, 0, 255]);
    assert_eq!(image.pixel(b'o', b'x'), [0, 0, 0, 255]);

    visualizer.set_offset(0);
    let image = visualizer.current_image().unwrap();
    assert_eq!(image.pixel(b'o', b'x'), [0, 255, 0, 255]);
}

#[test]
fn save_image_writes_png() {
    init();
    let dir = tempdir().unwrap();
    let path = fixture(&dir, "save-input", &sample_binary());
    let output = dir.path().join("plot.png");
    let mut visualizer = Visualizer::open(&path, ChannelCaps::default(), CachePolicy::Never).unwrap();

    visualizer.save_image(&output).unwrap();
    let saved = image::open(&output).unwrap().into_rgba8();
    assert_eq!(saved.dimensions(), (256, 256));
    assert_eq!(saved.into_raw(), visualizer.current_image().unwrap().into_rgba());
}

#[test]
fn tiny_and_missing_files_are_rejected() {
    init();
    let dir = tempdir().unwrap();
    let path = fixture(&dir, "tiny", b"x");
    assert!(matches!(
        Visualizer::open(&path, ChannelCaps::default(), CachePolicy::default()),
        Err(Error::FileTooSmall(1))
    ));
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(
        Visualizer::open(&path, ChannelCaps::default(), CachePolicy::default()),
        Err(Error::Io(_))
    ));
}

#[test]
fn engine_runs_directly_on_a_file_source() {
    init();
    let dir = tempdir().unwrap();
    let path = fixture(&dir, "direct", &[0x00, 0x01, 0x00, 0x01]);
    let mut source = ByteSource::open(&path, CachePolicy::Never).unwrap();
    let mut window = byteplot::ViewWindow::new(source.len()).unwrap();
    window.set_window_length(3);

    let table = BinaryTable::compute(&mut source, &window).unwrap();
    assert_eq!(table.get(0, 1), 2);
    assert_eq!(table.get(1, 0), 1);
    assert_eq!(table.total(), 3);
}

#[test]
fn zero_cache_threshold_is_rejected() {
    init();
    let dir = tempdir().unwrap();
    let path = fixture(&dir, "zero-threshold", &sample_binary());
    assert!(matches!(
        Visualizer::open(&path, ChannelCaps::default(), CachePolicy::Threshold(0)),
        Err(Error::InvalidConfiguration(_))
    ));
}
