// tests/codecs.rs
//
// Выбор кодека по расширению, "плоские" матрицы для >4 каналов и
// поведение при ошибке кодека.

use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};

use regrr::codec::ArrayCodec;
use regrr::{Depth, Mat, Recorder, RecorderConfig, RegrrError};

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("regrr-{prefix}-{pid}-{t}"))
}

#[test]
fn yaml_extension_from_config() -> Result<()> {
    let root = unique_root("yml");
    let rec = Recorder::new(
        RecorderConfig::default()
            .with_output_root(Some(&root))
            .with_extension("yml"),
    );
    rec.save(&Mat::zeros(1, 2, 1, Depth::F32), "v", true)?;

    assert_eq!(fs::read_to_string(root.join("lists.txt"))?, ".yml\nv.1\n");
    let text = fs::read_to_string(root.join("v.1.yml"))?;
    assert!(text.starts_with("%YAML:1.0\n"));
    assert!(text.contains("root: !!opencv-matrix"));
    assert!(text.contains("data: [ 0., 0. ]"), "{text}");
    Ok(())
}

#[test]
fn json_flattens_wide_matrices() -> Result<()> {
    let root = unique_root("json");
    let rec = Recorder::new(
        RecorderConfig::default()
            .with_output_root(Some(&root))
            .with_extension(".json"),
    );

    let data = (0..2 * 2 * 5).map(|i| i as f64).collect();
    let wide = Mat::from_vec(2, 2, 5, Depth::I16, data)?;
    let narrow = Mat::zeros(2, 2, 4, Depth::F32);
    rec.save(&wide, "wide", true)?;
    rec.save(&narrow, "narrow", true)?;

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(root.join("wide.1.json"))?)?;
    assert_eq!(v["root"]["rows"], 2);
    assert_eq!(v["root"]["cols"], 10);
    assert_eq!(v["root"]["dt"], "s");
    assert_eq!(v["root"]["data"][19], 19);

    let v: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("narrow.1.json"))?)?;
    assert_eq!(v["root"]["cols"], 2);
    assert_eq!(v["root"]["dt"], "4f");
    Ok(())
}

/// Кодек, который всегда падает (для проверки пути ошибок).
struct BrokenCodec;

impl ArrayCodec for BrokenCodec {
    fn name(&self) -> &'static str {
        "broken"
    }
    fn max_channels(&self) -> Option<usize> {
        None
    }
    fn write(&self, _path: &Path, _mat: &Mat) -> Result<()> {
        Err(anyhow!("disk on fire"))
    }
}

#[test]
fn codec_failure_is_reported() -> Result<()> {
    let root = unique_root("broken");
    let rec = Recorder::with_codec(
        RecorderConfig::default().with_output_root(Some(&root)),
        Box::new(BrokenCodec),
    );

    let err = rec
        .save(&Mat::zeros(1, 1, 1, Depth::F32), "d", true)
        .unwrap_err();
    match err {
        RegrrError::Codec { path, detail } => {
            assert_eq!(path, root.join("d.1.xml"));
            assert!(detail.contains("disk on fire"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // Ordinal потрачен, но строка в manifest не записана: запись не состоялась.
    assert_eq!(rec.last_ordinal("d"), 1);
    assert_eq!(fs::read_to_string(root.join("lists.txt"))?, ".xml\n");

    // Release с ошибкой оставляет артефакт в реестре: данные не потеряны.
    rec.store("m", Mat::zeros(1, 1, 1, Depth::F32))?;
    assert!(matches!(rec.release("m"), Err(RegrrError::Codec { .. })));
    assert_eq!(rec.live_artifacts(), vec!["m".to_string()]);
    assert!(matches!(
        rec.store("m", Mat::zeros(1, 1, 1, Depth::F32)),
        Err(RegrrError::IdentityConflict { .. })
    ));
    assert_eq!(rec.last_ordinal("m"), 1);
    Ok(())
}

#[test]
fn names_are_used_verbatim() -> Result<()> {
    let root = unique_root("verbatim");
    let rec = Recorder::new(RecorderConfig::default().with_output_root(Some(&root)));
    rec.enter_scope("main%%-hi!!%%")?;
    rec.save(&Mat::zeros(1, 1, 1, Depth::F32), "a%%%", true)?;
    rec.exit_scope()?;

    assert!(root.join("main%%-hi!!%%").join("a%%%.1.xml").is_file());
    assert_eq!(
        fs::read_to_string(root.join("lists.txt"))?,
        ".xml\n+ main%%-hi!!%%\na%%%.1\n-\n"
    );
    Ok(())
}

#[test]
fn absolute_and_parent_names_stay_under_root() -> Result<()> {
    let root = unique_root("escape");
    let tag = root
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let outside = std::env::temp_dir().join(format!("{tag}-outside"));
    let rec = Recorder::new(RecorderConfig::default().with_output_root(Some(&root)));

    let abs_scope = format!("/{tag}-abs");
    rec.enter_scope(&abs_scope)?;
    rec.save(&Mat::zeros(1, 1, 1, Depth::F32), &format!("{}/E", outside.display()), true)?;
    rec.save(&Mat::zeros(1, 1, 1, Depth::F32), "../../up", true)?;
    rec.exit_scope()?;

    let files = walk(&root);
    assert!(!outside.exists());
    assert!(!std::path::Path::new(&abs_scope).exists());
    assert!(!root.join("..").join("up.1.xml").exists());
    assert!(files.iter().all(|p| p.starts_with(&root)), "{files:?}");
    assert!(root.join(format!("{tag}-abs")).join("up.1.xml").is_file());
    // Manifest хранит имена как есть.
    let manifest = fs::read_to_string(root.join("lists.txt"))?;
    assert!(manifest.contains(&format!("+ {abs_scope}\n")), "{manifest}");
    assert!(manifest.contains("../../up.1\n"), "{manifest}");
    Ok(())
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let Ok(rd) = fs::read_dir(dir) else {
        return out;
    };
    for e in rd.flatten() {
        let p = e.path();
        if p.is_dir() {
            out.extend(walk(&p));
        } else {
            out.push(p);
        }
    }
    out
}
