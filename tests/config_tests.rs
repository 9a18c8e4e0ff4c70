use std::path::PathBuf;

use natural_bg::config::{Configuration, SourceConfig};
use natural_bg::frame::Resolution;
use natural_bg::matting::ColorKey;
use natural_bg::source::DEFAULT_COLOR_FRAME_CAP;

#[test]
fn defaults_to_fixed_black_background() {
    let cfg: Configuration = serde_yaml::from_str("{}").unwrap();
    assert_eq!(cfg.resolution, Resolution::new(84, 84));
    assert!(!cfg.grayscale);
    assert!(cfg.seed.is_none());
    assert!(matches!(cfg.source, SourceConfig::FixedColor { color: [0, 0, 0] }));
    assert!(cfg.validated().is_ok());
}

#[test]
fn parse_kebab_case_video_config() {
    let yaml = r#"
resolution: { height: 64, width: 96 }
seed: 7
mask-color: [10, 20, 30]
source:
  type: random-video
  paths: ["/videos"]
  max-videos: 4
  random-bg: true
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.resolution, Resolution::new(64, 96));
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.mask_color, Some(ColorKey::Rgb([10, 20, 30])));
    match &cfg.source {
        SourceConfig::RandomVideo {
            paths,
            max_videos,
            random_bg,
            frame_cap,
            recursive,
        } => {
            assert_eq!(paths, &vec![PathBuf::from("/videos")]);
            assert_eq!(*max_videos, 4);
            assert!(*random_bg);
            assert!(frame_cap.is_none());
            assert!(*recursive);
        }
        other => panic!("unexpected source {other:?}"),
    }
    let opts = cfg.source.video_options(false).unwrap();
    assert_eq!(opts.frame_cap, Some(DEFAULT_COLOR_FRAME_CAP));
    assert_eq!(cfg.source.video_options(true).unwrap().frame_cap, None);
}

#[test]
fn explicit_frame_cap_wins_over_default() {
    let yaml = r#"
grayscale: true
source:
  type: random-video
  paths: ["/videos"]
  frame-cap: 250
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    let opts = cfg.source.video_options(cfg.grayscale).unwrap();
    assert_eq!(opts.frame_cap, Some(250));
    assert_eq!(opts.max_videos, 20);
    assert!(opts.grayscale);
}

#[test]
fn parse_simple_sources_with_defaults() {
    let noise: Configuration = serde_yaml::from_str("source: { type: noise }").unwrap();
    assert!(matches!(
        noise.source,
        SourceConfig::Noise { strength } if (strength - 255.0).abs() < f32::EPSILON
    ));

    let colors: Configuration =
        serde_yaml::from_str("source: { type: random-color }").unwrap();
    assert!(matches!(colors.source, SourceConfig::RandomColor { max_images: 10 }));

    let yaml = "source: { type: random-image, paths: [a, b], total-frames: 5 }";
    let images: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!(matches!(
        images.source,
        SourceConfig::RandomImage { ref paths, total_frames: Some(5), .. } if paths.len() == 2
    ));
    assert!(images.source.scan_options().unwrap().recursive);
    assert!(colors.source.scan_options().is_none());
}

#[test]
fn recursive_scan_can_be_disabled() {
    let yaml = "source: { type: random-image, paths: [a], recursive: false }";
    let images: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!(!images.source.scan_options().unwrap().recursive);

    let yaml = "source: { type: random-video, paths: [v], recursive: false }";
    let videos: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!(!videos.source.scan_options().unwrap().recursive);
}

#[test]
fn unknown_source_type_is_rejected() {
    assert!(serde_yaml::from_str::<Configuration>("source: { type: hologram }").is_err());
}

#[test]
fn validation_rejects_degenerate_values() {
    let zero_res: Configuration =
        serde_yaml::from_str("resolution: { height: 0, width: 8 }").unwrap();
    assert!(zero_res.validated().is_err());

    let no_paths: Configuration =
        serde_yaml::from_str("source: { type: random-image, paths: [] }").unwrap();
    assert!(no_paths.validated().is_err());

    let yaml = "source: { type: random-video, paths: [v], max-videos: 0 }";
    let no_videos: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!(no_videos.validated().is_err());

    let no_colors: Configuration =
        serde_yaml::from_str("source: { type: random-color, max-images: 0 }").unwrap();
    assert!(no_colors.validated().is_err());
}

#[test]
fn loads_from_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bg.yaml");
    std::fs::write(&path, "source: { type: fixed-color, color: [1, 2, 3] }\n").unwrap();
    let cfg = Configuration::from_yaml_file(&path).unwrap();
    assert!(matches!(cfg.source, SourceConfig::FixedColor { color: [1, 2, 3] }));
}
