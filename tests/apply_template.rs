use std::path::{Path, PathBuf};

use frame_compositor::{
    apply_snapshot, apply_template, plan_template, FrameProfile, FramerError, LimitingAxis,
    Placement, SharedFrameProfile, TemplateRequest,
};
use image::{ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "frame_compositor_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

/// Opaque blue frame with a transparent window inset by `border` pixels
fn write_frame(path: &Path, width: u32, height: u32, border: u32) {
    let frame: RgbaImage = ImageBuffer::from_fn(width, height, |x, y| {
        let inside = x >= border && y >= border && x < width - border && y < height - border;
        if inside {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });
    frame.save(path).unwrap();
}

fn write_content(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    let content: RgbImage = ImageBuffer::from_pixel(width, height, Rgb(color));
    content.save(path).unwrap();
}

fn close_to(pixel: &Rgb<u8>, want: [u8; 3]) -> bool {
    pixel.0.iter().zip(want).all(|(got, want)| got.abs_diff(want) <= 2)
}

#[test]
fn composites_wide_content_into_square_frame() {
    let tmp = temp_dir("wide_content");
    std::fs::create_dir_all(&tmp).unwrap();

    let frame_path = tmp.join("frame.png");
    let content_path = tmp.join("q1.png");
    write_frame(&frame_path, 512, 512, 40);
    write_content(&content_path, 800, 300, [220, 30, 30]);

    let out_dir = tmp.join("out/");
    let mut profile = FrameProfile::with_frame(&frame_path, &out_dir).unwrap();
    profile.set_placement(Some(10), None, None);

    let result = apply_template(&profile, &content_path, &TemplateRequest::new()).unwrap();

    assert_eq!(result.output_path, tmp.join("out").join("q1.png"));
    assert_eq!(result.layout.axis, LimitingAxis::Width);
    assert_eq!((result.layout.width, result.layout.height), (492, 184));
    assert_eq!((result.layout.x, result.layout.y), (10, 164));

    let rendered = image::open(&result.output_path).unwrap().to_rgb8();
    assert_eq!(rendered.dimensions(), (512, 512));
    // Border from the frame, content in the window, white background above the band
    assert!(close_to(rendered.get_pixel(2, 2), [0, 0, 255]));
    assert!(close_to(rendered.get_pixel(256, 256), [220, 30, 30]));
    assert!(close_to(rendered.get_pixel(256, 100), [255, 255, 255]));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn overrides_apply_to_one_call_only() {
    let tmp = temp_dir("overrides");
    std::fs::create_dir_all(&tmp).unwrap();

    let frame_path = tmp.join("frame.png");
    let content_path = tmp.join("tall.png");
    write_frame(&frame_path, 200, 100, 5);
    write_content(&content_path, 50, 100, [0, 200, 0]);

    let mut profile = FrameProfile::with_frame(&frame_path, tmp.join("default")).unwrap();
    profile.set_placement(Some(10), Some(3), Some(4));

    let request = TemplateRequest::new()
        .margin(0)
        .right(-7)
        .output_dir(tmp.join("override"))
        .file_name("moved.png");
    let overridden = apply_template(&profile, &content_path, &request).unwrap();

    assert_eq!(overridden.output_path, tmp.join("override").join("moved.png"));
    assert_eq!(
        overridden.placement,
        Placement {
            margin: 0,
            right: -7,
            bottom: 4
        }
    );
    assert_eq!(overridden.layout.height, 100);
    assert_eq!(overridden.layout.x, (200 - 50) / 2 - 7);

    // Defaults untouched
    assert_eq!(
        profile.placement(),
        Placement {
            margin: 10,
            right: 3,
            bottom: 4
        }
    );
    assert_eq!(profile.output_dir(), tmp.join("default").as_path());

    let plain = apply_template(&profile, &content_path, &TemplateRequest::new()).unwrap();
    assert_eq!(plain.output_path, tmp.join("default").join("tall.png"));
    assert_eq!(plain.layout.height, 80);
    assert_eq!(plain.layout.y, 10 + 4);
    assert_eq!(plain.layout.x, (200 - 40) / 2 + 3);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn setting_same_frame_twice_is_idempotent() {
    let tmp = temp_dir("idempotent");
    std::fs::create_dir_all(&tmp).unwrap();
    let frame_path = tmp.join("frame.png");
    write_frame(&frame_path, 64, 32, 4);

    let mut profile = FrameProfile::new();
    profile.set_frame(&frame_path).unwrap();
    let once = profile.frame_size();
    let once_blank = profile.canvas().unwrap().blank().dimensions();

    profile.set_frame(&frame_path).unwrap();

    assert_eq!(profile.frame_size(), once);
    assert_eq!(profile.canvas().unwrap().blank().dimensions(), once_blank);
    assert_eq!(once, Some((64, 32)));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn output_directory_is_created_and_reused() {
    let tmp = temp_dir("mkdir");
    let frame_path = tmp.join("frames").join("frame.png");
    std::fs::create_dir_all(frame_path.parent().unwrap()).unwrap();
    write_frame(&frame_path, 32, 32, 2);
    let content_path = tmp.join("c.png");
    write_content(&content_path, 10, 10, [9, 9, 9]);

    let out_dir = tmp.join("a").join("b").join("c");
    let profile = FrameProfile::with_frame(&frame_path, &out_dir).unwrap();
    assert!(!out_dir.exists());

    apply_template(&profile, &content_path, &TemplateRequest::new()).unwrap();
    assert!(out_dir.join("c.png").is_file());

    // Second run overwrites in an existing directory
    apply_template(&profile, &content_path, &TemplateRequest::new()).unwrap();
    assert!(out_dir.join("c.png").is_file());
    let leftovers: Vec<_> = std::fs::read_dir(&out_dir).unwrap().collect();
    assert_eq!(leftovers.len(), 1);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn output_format_follows_file_name() {
    let tmp = temp_dir("format");
    std::fs::create_dir_all(&tmp).unwrap();
    let frame_path = tmp.join("frame.png");
    let content_path = tmp.join("c.png");
    write_frame(&frame_path, 40, 40, 4);
    write_content(&content_path, 20, 20, [100, 100, 100]);

    let profile = FrameProfile::with_frame(&frame_path, &tmp).unwrap();
    let result = apply_template(
        &profile,
        &content_path,
        &TemplateRequest::new().file_name("c.jpg"),
    )
    .unwrap();

    let format = image::ImageFormat::from_path(&result.output_path).unwrap();
    assert_eq!(format, image::ImageFormat::Jpeg);
    let bytes = std::fs::read(&result.output_path).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn errors_are_named() {
    let tmp = temp_dir("errors");
    std::fs::create_dir_all(&tmp).unwrap();
    let frame_path = tmp.join("frame.png");
    let content_path = tmp.join("c.png");
    write_frame(&frame_path, 40, 40, 4);
    write_content(&content_path, 20, 20, [1, 1, 1]);

    // Not configured: nothing is written
    let unconfigured = FrameProfile::new();
    let err = apply_template(
        &unconfigured,
        &content_path,
        &TemplateRequest::new().output_dir(tmp.join("never")),
    )
    .unwrap_err();
    assert!(matches!(err, FramerError::NotConfigured));
    assert!(!tmp.join("never").exists());

    let profile = FrameProfile::with_frame(&frame_path, tmp.join("out")).unwrap();

    let err =
        apply_template(&profile, tmp.join("missing.png"), &TemplateRequest::new()).unwrap_err();
    assert!(matches!(err, FramerError::Decode { .. }));

    let not_an_image = tmp.join("notes.png");
    std::fs::write(&not_an_image, b"definitely not a png").unwrap();
    let err = apply_template(&profile, &not_an_image, &TemplateRequest::new()).unwrap_err();
    assert!(matches!(err, FramerError::Decode { .. }));

    let err =
        apply_template(&profile, &content_path, &TemplateRequest::new().margin(20)).unwrap_err();
    assert!(matches!(err, FramerError::Geometry(_)));

    let err = apply_template(
        &profile,
        &content_path,
        &TemplateRequest::new().file_name("c.unknownext"),
    )
    .unwrap_err();
    assert!(matches!(err, FramerError::Write { .. }));

    // Output directory blocked by a regular file
    let blocker = tmp.join("blocker");
    std::fs::write(&blocker, b"x").unwrap();
    let err = apply_template(
        &profile,
        &content_path,
        &TemplateRequest::new().output_dir(&blocker),
    )
    .unwrap_err();
    assert!(matches!(err, FramerError::Write { .. }));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn plan_matches_apply_without_writing() {
    let tmp = temp_dir("plan");
    std::fs::create_dir_all(&tmp).unwrap();
    let frame_path = tmp.join("frame.png");
    let content_path = tmp.join("c.png");
    write_frame(&frame_path, 300, 200, 10);
    write_content(&content_path, 120, 90, [5, 5, 5]);

    let mut profile = FrameProfile::with_frame(&frame_path, tmp.join("planned")).unwrap();
    profile.set_placement(Some(6), Some(-2), Some(1));

    let planned = plan_template(&profile, &content_path, &TemplateRequest::new()).unwrap();
    assert!(!tmp.join("planned").exists());

    let applied = apply_template(&profile, &content_path, &TemplateRequest::new()).unwrap();
    assert_eq!(planned.layout, applied.layout);
    assert_eq!(planned.output_path, applied.output_path);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn shared_profile_composites_from_threads() {
    let tmp = temp_dir("shared");
    std::fs::create_dir_all(&tmp).unwrap();
    let frame_path = tmp.join("frame.png");
    write_frame(&frame_path, 64, 64, 4);
    for i in 0..4 {
        write_content(&tmp.join(format!("c{i}.png")), 30 + i * 10, 20, [i as u8, 0, 0]);
    }

    let profile = FrameProfile::with_frame(&frame_path, tmp.join("out")).unwrap();
    let shared = SharedFrameProfile::new(profile);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let shared = shared.clone();
            let content = tmp.join(format!("c{i}.png"));
            std::thread::spawn(move || {
                let snapshot = shared.snapshot().unwrap();
                apply_snapshot(&snapshot, &content, &TemplateRequest::new()).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap();
        assert!(result.output_path.is_file());
        assert_eq!(result.frame_size, (64, 64));
    }

    std::fs::remove_dir_all(&tmp).ok();
}
