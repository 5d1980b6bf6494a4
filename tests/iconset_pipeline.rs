use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use vibeicon::iconset::{build_iconset, plan};
use vibeicon::packer::PackOutcome;
use vibeicon::{pipeline, Config};
use vibeicon_core::render::DirectBackend;
use vibeicon_core::Style;

fn scratch_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let dir = std::env::temp_dir().join(format!("vibeicon-it-{}-{}-{}", tag, std::process::id(), nanos));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn test_config(root: &Path, sizes: &[u32]) -> Config {
    Config {
        staging_dir: root.join("icon.iconset"),
        icns_output: root.join("out").join("icon.icns"),
        packer: "vibeicon-no-such-packer".into(),
        sizes: sizes.to_vec(),
        retina: false,
        supersample: 2,
        ..Config::default()
    }
}

fn names_in(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect()
}

#[test]
fn two_sizes_without_packer_leave_two_pngs_and_a_warning() {
    let root = scratch_dir("e2e");
    let cfg = test_config(&root, &[128, 256]);

    let summary = pipeline::run(&cfg).unwrap();

    assert!(summary.succeeded());
    assert!(!summary.iconset_removed);
    assert_eq!(summary.pack, Some(PackOutcome::Unavailable("vibeicon-no-such-packer".into())));
    assert_eq!(summary.warnings().len(), 1);
    let expected: BTreeSet<String> = ["icon_128x128.png", "icon_256x256.png"].iter().map(|s| s.to_string()).collect();
    assert_eq!(names_in(&cfg.staging_dir), expected);
    for (name, px) in [("icon_128x128.png", 128), ("icon_256x256.png", 256)] {
        let img = image::open(cfg.staging_dir.join(name)).unwrap();
        assert_eq!(img.color(), image::ColorType::Rgba8);
        assert_eq!((img.width(), img.height()), (px, px));
    }
    assert!(!cfg.icns_output.exists());
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn rerun_overwrites_and_prunes_stale_files() {
    let root = scratch_dir("rerun");
    let cfg = Config { retina: true, ..test_config(&root, &[16, 32]) };
    fs::create_dir_all(&cfg.staging_dir).unwrap();
    fs::write(cfg.staging_dir.join("icon_999x999.png"), b"old").unwrap();
    fs::write(cfg.staging_dir.join(".icon_16x16.png.partial"), b"half").unwrap();
    fs::write(cfg.staging_dir.join("notes.txt"), b"keep me").unwrap();

    let first = pipeline::run(&cfg).unwrap();
    assert_eq!(first.report.pruned.len(), 2);
    let after_first = names_in(&cfg.staging_dir);
    let bytes_first = fs::read(cfg.staging_dir.join("icon_32x32.png")).unwrap();

    let second = pipeline::run(&cfg).unwrap();
    assert!(second.report.pruned.is_empty());
    assert_eq!(names_in(&cfg.staging_dir), after_first);
    assert_eq!(fs::read(cfg.staging_dir.join("icon_32x32.png")).unwrap(), bytes_first);

    let expected: BTreeSet<String> = [
        "icon_16x16.png",
        "icon_16x16@2x.png",
        "icon_32x32.png",
        "icon_32x32@2x.png",
        "notes.txt",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(after_first, expected);
    // The @2x of 16 is the same 32px raster as icon_32x32.png.
    assert_eq!(fs::read(cfg.staging_dir.join("icon_16x16@2x.png")).unwrap(), bytes_first);
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn full_size_set_renders_up_to_1024() {
    let root = scratch_dir("full");
    let dir = root.join("icon.iconset");
    let backend = DirectBackend::new(Style::default(), 1);
    let sizes = vibeicon::models::DEFAULT_SIZES;

    let report = build_iconset(&dir, &sizes, true, true, &backend).unwrap();

    assert!(report.is_complete());
    let entries = plan(&sizes, true).unwrap();
    assert_eq!(report.written.len(), entries.len());
    for e in &entries {
        let (w, h) = image::image_dimensions(dir.join(&e.file_name)).unwrap();
        assert_eq!((w, h), (e.pixels, e.pixels), "{}", e.file_name);
    }
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn sequential_build_matches_parallel_build() {
    let root = scratch_dir("sequential");
    let backend = DirectBackend::new(Style::default(), 1);
    let sizes = [16, 32, 128];

    let seq = build_iconset(&root.join("seq.iconset"), &sizes, true, false, &backend).unwrap();
    let par = build_iconset(&root.join("par.iconset"), &sizes, true, true, &backend).unwrap();

    assert!(seq.is_complete());
    assert_eq!(seq.written.len(), plan(&sizes, true).unwrap().len());
    assert_eq!(names_in(&root.join("seq.iconset")), names_in(&root.join("par.iconset")));
    for name in names_in(&root.join("seq.iconset")) {
        assert_eq!(
            fs::read(root.join("seq.iconset").join(&name)).unwrap(),
            fs::read(root.join("par.iconset").join(&name)).unwrap(),
            "{}",
            name
        );
    }
    assert!(par.is_complete());
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn one_failing_size_does_not_stop_the_others() {
    let root = scratch_dir("partial");
    let cfg = test_config(&root, &[16, 32, 64]);
    // A directory squatting on the target name makes the final rename fail.
    fs::create_dir_all(cfg.staging_dir.join("icon_32x32.png")).unwrap();

    let backend = DirectBackend::new(Style::default(), 1);
    let report = build_iconset(&cfg.staging_dir, &cfg.sizes, false, false, &backend).unwrap();
    assert_eq!(report.written.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, "icon_32x32.png");
    assert!(!report.is_complete());
    for name in ["icon_16x16.png", "icon_64x64.png"] {
        assert!(cfg.staging_dir.join(name).is_file(), "{}", name);
    }
    assert!(!cfg.staging_dir.join(".icon_32x32.png.partial").exists());

    let summary = pipeline::run(&cfg).unwrap();
    assert!(!summary.succeeded());
    assert_eq!(summary.pack, None);
    assert!(!summary.iconset_removed);
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn unusable_staging_dir_is_fatal() {
    let root = scratch_dir("blocked");
    let blocker = root.join("file-not-dir");
    fs::write(&blocker, b"x").unwrap();
    let cfg = Config { staging_dir: blocker.join("icon.iconset"), ..test_config(&root, &[16]) };
    assert!(pipeline::run(&cfg).is_err());
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn broken_style_file_is_fatal() {
    let root = scratch_dir("style");
    let style = root.join("style.json");
    fs::write(&style, r#"{ "gradient": [] }"#).unwrap();
    let cfg = Config { style_file: Some(style), ..test_config(&root, &[16]) };
    assert!(pipeline::run(&cfg).is_err());
    assert!(!cfg.staging_dir.exists());
    fs::remove_dir_all(root).unwrap();
}

#[cfg(unix)]
#[test]
fn successful_pack_can_drop_the_staging_dir() {
    use std::os::unix::fs::PermissionsExt;

    let root = scratch_dir("pack");
    let script = root.join("fake-iconutil");
    // Same argument layout as iconutil: -c icns <dir> -o <out>
    fs::write(&script, "#!/bin/sh\n[ -d \"$3\" ] && printf icns > \"$5\"\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let cfg = Config {
        packer: script.to_string_lossy().to_string(),
        keep_iconset: false,
        ..test_config(&root, &[16])
    };
    let summary = pipeline::run(&cfg).unwrap();

    assert_eq!(summary.pack, Some(PackOutcome::Packed(cfg.icns_output.clone())));
    assert!(summary.warnings().is_empty());
    assert_eq!(fs::read(&cfg.icns_output).unwrap(), b"icns");
    assert!(!cfg.staging_dir.exists());
    assert!(summary.iconset_removed);
    fs::remove_dir_all(root).unwrap();
}
