use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DUMP: &str = "booster[0]:\n\
                    0:[pt<30] yes=1,no=2,missing=1\n\
                    \t1:leaf=0.125\n\
                    \t2:[nJets<2.5] yes=3,no=4,missing=3\n\
                    \t\t3:leaf=-0.25\n\
                    \t\t4:leaf=0.5\n\
                    booster[1]:\n\
                    0:leaf=nan\n";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn fixture() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let dump = write(dir.path(), "model.txt", DUMP);
    let features = write(dir.path(), "features.txt", "pt F\nnJets I\n");
    (dir, dump, features)
}

#[test]
fn convert_writes_weight_file() {
    let (dir, dump, features) = fixture();
    let output = dir.path().join("weights.xml");

    let mut cmd = cargo_bin_cmd!("xgb2tmva");
    cmd.arg("convert")
        .arg(&dump)
        .arg("--features")
        .arg(&features)
        .arg("--fillna")
        .arg("--output")
        .arg(&output);
    cmd.assert().success();

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\"?>\n<MethodSetup Method=\"BDT::BDT\">"));
    assert!(xml.contains("<Weights NTrees=\"2\" AnalysisType=\"1\">"));
    assert!(xml.contains("IVar=\"1\" Cut=\"2.5e+00\""));
    assert!(xml.contains("res=\"-9.99e+02\""));
}

#[test]
fn convert_fails_on_nan_without_fillna() {
    let (_dir, dump, features) = fixture();

    let mut cmd = cargo_bin_cmd!("xgb2tmva");
    cmd.arg("convert").arg(&dump).arg("--features").arg(&features);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("tree 1, line 1: malformed dump line `0:leaf=nan`"));
}

#[test]
fn convert_reports_unknown_variable() {
    let (dir, dump, _features) = fixture();
    let features = write(dir.path(), "features.json", r#"[{"name": "pt", "type": "F"}]"#);

    let mut cmd = cargo_bin_cmd!("xgb2tmva");
    cmd.arg("convert")
        .arg(&dump)
        .arg("--features")
        .arg(&features)
        .arg("--fillna");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown variable `nJets`"));
}

#[test]
fn convert_with_inferred_features_to_stdout() {
    let (_dir, dump, _features) = fixture();

    let mut cmd = cargo_bin_cmd!("xgb2tmva");
    cmd.arg("convert").arg(&dump).arg("--infer-features").arg("--fillna");
    cmd.assert().success().stdout(
        predicate::str::contains("<Variables NVar=\"2\">")
            .and(predicate::str::contains("Expression=\"nJets\""))
            .and(predicate::str::contains("Type=\"I\"").not()),
    );
}

#[test]
fn convert_requires_feature_source() {
    let (_dir, dump, _features) = fixture();

    let mut cmd = cargo_bin_cmd!("xgb2tmva");
    cmd.arg("convert").arg(&dump);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--infer-features"));
}

#[test]
fn config_file_sets_creator_and_analysis_type() {
    let (dir, dump, features) = fixture();
    let config = write(
        dir.path(),
        "xgb2tmva.toml",
        "[convert]\nnan_substitution = true\ncreator = \"trigger-study\"\n",
    );

    let mut cmd = cargo_bin_cmd!("xgb2tmva");
    cmd.arg("convert")
        .arg(&dump)
        .arg("--features")
        .arg(&features)
        .arg("--config")
        .arg(&config)
        .arg("--analysis-type")
        .arg("Regression");
    cmd.assert().success().stdout(
        predicate::str::contains("<Info name=\"Creator\" value=\"trigger-study\"/>")
            .and(predicate::str::contains("<Info name=\"AnalysisType\" value=\"Regression\"/>")),
    );
}

#[test]
fn inspect_prints_tree_view() {
    let dir = tempfile::tempdir().unwrap();
    let clean = write(dir.path(), "clean.txt", "0:[pt<30] yes=1,no=2\n\t1:leaf=0.1\n\t2:leaf=-0.2\n");
    let mut cmd = cargo_bin_cmd!("xgb2tmva");
    cmd.arg("inspect").arg(&clean).arg("--infer-features");
    cmd.assert().success().stdout(
        predicate::str::contains("tree 0: 1 splits, 2 leaves")
            .and(predicate::str::contains("└─ s #0 [pt < 3.0e+01]"))
            .and(predicate::str::contains("├─ l #1 leaf 1.0e-01")),
    );
}

#[test]
fn inspect_summary() {
    let (dir, dump, features) = fixture();
    let config = write(dir.path(), "fillna.toml", "[convert]\nnan_substitution = true\n");

    let mut cmd = cargo_bin_cmd!("xgb2tmva");
    cmd.arg("inspect")
        .arg(&dump)
        .arg("--features")
        .arg(&features)
        .arg("--config")
        .arg(&config)
        .arg("--summary");
    cmd.assert()
        .success()
        .stdout("2 trees, 2 splits, 4 leaves, max depth 2\n");
}

#[test]
fn inspect_fillna_flag() {
    let (_dir, dump, features) = fixture();

    let mut cmd = cargo_bin_cmd!("xgb2tmva");
    cmd.arg("inspect")
        .arg(&dump)
        .arg("--features")
        .arg(&features)
        .arg("--fillna")
        .arg("--summary");
    cmd.assert()
        .success()
        .stdout("2 trees, 2 splits, 4 leaves, max depth 2\n");
}

#[test]
fn inspect_fails_on_nan_without_fillna() {
    let (_dir, dump, features) = fixture();

    let mut cmd = cargo_bin_cmd!("xgb2tmva");
    cmd.arg("inspect").arg(&dump).arg("--features").arg(&features);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("malformed dump line `0:leaf=nan`"));
}

#[test]
fn list_formats_names_builtins() {
    let mut cmd = cargo_bin_cmd!("xgb2tmva");
    cmd.arg("list-formats");
    cmd.assert().success().stdout(
        predicate::str::contains("tmva-xml")
            .and(predicate::str::contains("treeviz"))
            .and(predicate::str::contains("json")),
    );
}

#[test]
fn unknown_format_is_rejected() {
    let (_dir, dump, features) = fixture();

    let mut cmd = cargo_bin_cmd!("xgb2tmva");
    cmd.arg("convert")
        .arg(&dump)
        .arg("--features")
        .arg(&features)
        .arg("--format")
        .arg("root");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format 'root'"));
}
