use std::fs;
use std::path::Path;

use kicad_laser_svg::{Error, kicad};

#[test]
fn test_load_board_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.kicad_pcb");
    fs::write(
        &path,
        r#"(kicad_pcb (version 20221018)
            (layers (0 "F.Cu" signal) (31 "B.Cu" signal) (44 "Edge.Cuts" user))
            (segment (start 0 0) (end 5 0) (width 0.25) (layer "F.Cu") (net 0)))"#,
    )
    .unwrap();

    let board = kicad::load_board(&path).unwrap();
    assert_eq!(board.tracks.len(), 1);
    assert!(board.has_layer("Edge.Cuts"));
}

#[test]
fn test_load_board_missing_file() {
    let err = kicad::load_board(Path::new("/nonexistent/board.kicad_pcb")).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
    assert!(err.to_string().contains("board.kicad_pcb"));
}

#[test]
fn test_load_board_wrong_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schematic.kicad_sch");
    fs::write(&path, "(kicad_sch (version 20230121))").unwrap();
    let err = kicad::load_board(&path).unwrap_err();
    assert!(matches!(err, Error::NotABoard { .. }));
}

#[test]
fn test_load_board_syntax_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.kicad_pcb");
    fs::write(&path, "(kicad_pcb (layers (0 \"F.Cu\" signal)").unwrap();
    let err = kicad::load_board(&path).unwrap_err();
    assert!(matches!(err, Error::Syntax(_)));
}
